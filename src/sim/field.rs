//! The playing field and everything in it
//!
//! The field is a `width x height` rectangle with the origin at the bottom
//! left. It owns the ship (always present) and the asteroid, missile and
//! explosion lists. Ids are handed out from a single counter and never reused.

use serde::{Deserialize, Serialize};

use super::collision::{impacting_pairs, missile_asteroid_hits, resolve_pairs};
use super::object::{ObjectKind, SpaceObject};
use super::ports::RandomGenerator;
use super::vector::{Point2D, Vector2D};
use crate::config::{BoundaryPolicy, Config};
use crate::consts::TICK_DT;

/// Rectangular arena owning every entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpaceField {
    width: f64,
    height: f64,
    config: Config,
    ship: SpaceObject,
    asteroids: Vec<SpaceObject>,
    missiles: Vec<SpaceObject>,
    explosions: Vec<SpaceObject>,
    next_id: u32,
}

impl SpaceField {
    /// Empty field with the ship resting at the center
    pub fn new(config: &Config) -> Self {
        let width = f64::from(config.engine.field_width);
        let height = f64::from(config.engine.field_height);
        let ship = SpaceObject::new(
            1,
            ObjectKind::Ship,
            Point2D::new(width / 2.0, height / 2.0),
            Vector2D::ZERO,
            config.ship.radius,
            config.ship.mass,
        );
        Self {
            width,
            height,
            config: config.clone(),
            ship,
            asteroids: Vec::new(),
            missiles: Vec::new(),
            explosions: Vec::new(),
            next_id: 2,
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn ship(&self) -> &SpaceObject {
        &self.ship
    }

    pub fn ship_mut(&mut self) -> &mut SpaceObject {
        &mut self.ship
    }

    pub fn asteroids(&self) -> &[SpaceObject] {
        &self.asteroids
    }

    pub fn missiles(&self) -> &[SpaceObject] {
        &self.missiles
    }

    pub fn explosions(&self) -> &[SpaceObject] {
        &self.explosions
    }

    /// Ship, asteroids, then missiles: the set taking part in elastic collisions
    pub fn space_objects(&self) -> Vec<SpaceObject> {
        let mut objects = Vec::with_capacity(1 + self.asteroids.len() + self.missiles.len());
        objects.push(self.ship);
        objects.extend_from_slice(&self.asteroids);
        objects.extend_from_slice(&self.missiles);
        objects
    }

    /// Everything, explosions included, in draw order
    pub fn all_objects(&self) -> impl Iterator<Item = &SpaceObject> {
        self.explosions
            .iter()
            .chain(&self.asteroids)
            .chain(&self.missiles)
            .chain(std::iter::once(&self.ship))
    }

    /// Allocate a new entity id
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Place an asteroid directly; returns its id
    pub fn add_asteroid(&mut self, center: Point2D, velocity: Vector2D, radius: f64, mass: f64) -> u32 {
        let id = self.next_entity_id();
        self.asteroids
            .push(SpaceObject::new(id, ObjectKind::Asteroid, center, velocity, radius, mass));
        id
    }

    /// Place a missile directly with the configured size; returns its id
    pub fn add_missile(&mut self, center: Point2D, velocity: Vector2D) -> u32 {
        let id = self.next_entity_id();
        self.missiles.push(SpaceObject::new(
            id,
            ObjectKind::Missile,
            center,
            velocity,
            self.config.missile.radius,
            self.config.missile.mass,
        ));
        id
    }

    /// Explosions sit still; nothing moves them
    fn add_explosion(&mut self, center: Point2D, radius: f64) -> u32 {
        let id = self.next_entity_id();
        let kind = ObjectKind::Explosion {
            remaining_ticks: self.config.explosion.duration_ticks,
        };
        self.explosions
            .push(SpaceObject::new(id, kind, center, Vector2D::ZERO, radius, 0.0));
        id
    }

    /// Spawn an asteroid on a random edge, heading roughly inward
    pub fn generate_asteroid<R: RandomGenerator + ?Sized>(&mut self, rng: &mut R) -> u32 {
        let cfg = self.config.asteroid.clone();

        let edge = (rng.generate_in_range(0.0, 4.0) as u32).min(3);
        let along = rng.generate_probability();
        let (center, inward) = match edge {
            0 => (Point2D::new(along * self.width, 0.0), Vector2D::UP),
            1 => (Point2D::new(along * self.width, self.height), Vector2D::DOWN),
            2 => (Point2D::new(0.0, along * self.height), Vector2D::RIGHT),
            _ => (Point2D::new(self.width, along * self.height), Vector2D::LEFT),
        };

        let spread = cfg.max_spread_degrees.to_radians();
        let heading = inward.rotated(rng.generate_in_range(-spread, spread));
        let speed = rng.generate_in_range(cfg.min_speed, cfg.max_speed);
        let radius = rng.generate_in_range(cfg.min_radius, cfg.max_radius);
        let mass = rng.generate_in_range(cfg.min_mass, cfg.max_mass);

        let id = self.add_asteroid(center, heading * speed, radius, mass);
        log::debug!(
            "Asteroid #{} spawned at ({:.1}, {:.1}) r={:.1}",
            id,
            center.x(),
            center.y(),
            radius
        );
        id
    }

    /// Launch a missile along the ship heading
    ///
    /// The heading is the ship's direction of travel, or straight up when it
    /// is at rest. The missile starts just clear of the hull.
    pub fn generate_missile(&mut self) -> u32 {
        let heading = self.ship.velocity.unit().unwrap_or(Vector2D::UP);
        let clearance = self.ship.radius + self.config.missile.radius + self.config.missile.launch_gap;
        let center = self.ship.center + heading * clearance;
        self.add_missile(center, heading * self.config.missile.speed)
    }

    /// Move the ship, then apply the configured edge policy
    pub fn move_ship(&mut self) {
        self.ship.advance(TICK_DT);
        apply_boundary(&mut self.ship, self.width, self.height, self.config.ship.boundary);
    }

    pub fn move_asteroids(&mut self) {
        for asteroid in &mut self.asteroids {
            asteroid.advance(TICK_DT);
        }
    }

    pub fn move_missiles(&mut self) {
        for missile in &mut self.missiles {
            missile.advance(TICK_DT);
        }
    }

    /// Drop asteroids that left the field; returns how many
    pub fn trim_asteroids(&mut self) -> usize {
        let (width, height) = (self.width, self.height);
        let before = self.asteroids.len();
        self.asteroids.retain(|a| !a.is_out_of_bounds(width, height));
        before - self.asteroids.len()
    }

    /// Drop missiles that left the field; returns how many
    pub fn trim_missiles(&mut self) -> usize {
        let (width, height) = (self.width, self.height);
        let before = self.missiles.len();
        self.missiles.retain(|m| !m.is_out_of_bounds(width, height));
        before - self.missiles.len()
    }

    /// Age explosions and remove the expired ones
    pub fn handle_explosions(&mut self) {
        self.explosions.retain_mut(|e| e.tick_explosion());
    }

    /// Elastic response for every overlapping pair; returns the pair count
    ///
    /// Each unordered pair of (ship, asteroids, missiles) is visited once,
    /// lower index first. Explosions never take part.
    pub fn handle_collisions(&mut self, restitution: f64) -> usize {
        let mut objects = self.space_objects();
        let pairs = impacting_pairs(&objects);
        if pairs.is_empty() {
            return 0;
        }
        resolve_pairs(&mut objects, &pairs, restitution);

        let asteroid_count = self.asteroids.len();
        self.ship = objects[0];
        self.asteroids.copy_from_slice(&objects[1..1 + asteroid_count]);
        self.missiles.copy_from_slice(&objects[1 + asteroid_count..]);
        pairs.len()
    }

    /// Destroy every overlapping missile/asteroid pair; returns the score earned
    ///
    /// Every body in any impacting pair is marked and removed once. Each
    /// destroyed asteroid scores once and leaves one explosion at its contact
    /// point with the first missile that hit it.
    pub fn handle_missile_asteroid_collisions(&mut self) -> f64 {
        let hits = missile_asteroid_hits(&self.missiles, &self.asteroids);
        if hits.is_empty() {
            return 0.0;
        }

        let mut dead_missiles = vec![false; self.missiles.len()];
        let mut dead_asteroids = vec![false; self.asteroids.len()];
        let mut score = 0.0;

        for &(mi, ai) in &hits {
            dead_missiles[mi] = true;
            if dead_asteroids[ai] {
                continue;
            }
            dead_asteroids[ai] = true;

            let missile = self.missiles[mi];
            let asteroid = self.asteroids[ai];
            score += self.config.scoring.points_for(asteroid.radius);

            let fraction = missile.radius / (missile.radius + asteroid.radius);
            let contact = missile.center + missile.center.to(asteroid.center) * fraction;
            let explosion = self.add_explosion(contact, asteroid.radius);
            log::debug!(
                "Missile #{} destroyed asteroid #{} (explosion #{})",
                missile.id,
                asteroid.id,
                explosion
            );
        }

        let mut flags = dead_missiles.into_iter();
        self.missiles.retain(|_| !flags.next().unwrap_or(false));
        let mut flags = dead_asteroids.into_iter();
        self.asteroids.retain(|_| !flags.next().unwrap_or(false));

        score
    }
}

fn apply_boundary(ship: &mut SpaceObject, width: f64, height: f64, policy: BoundaryPolicy) {
    let x = ship.center.x();
    let y = ship.center.y();
    let vx = ship.velocity.dx();
    let vy = ship.velocity.dy();

    match policy {
        BoundaryPolicy::Wrap => {
            ship.center = Point2D::new(x.rem_euclid(width), y.rem_euclid(height));
        }
        BoundaryPolicy::Clamp | BoundaryPolicy::Bounce => {
            let outward = |pos: f64, vel: f64, max: f64| (pos < 0.0 && vel < 0.0) || (pos > max && vel > 0.0);
            let respond = |vel: f64| match policy {
                BoundaryPolicy::Bounce => -vel,
                _ => 0.0,
            };
            let new_vx = if outward(x, vx, width) { respond(vx) } else { vx };
            let new_vy = if outward(y, vy, height) { respond(vy) } else { vy };
            ship.center = Point2D::new(x.clamp(0.0, width), y.clamp(0.0, height));
            ship.velocity = Vector2D::new(new_vx, new_vy);
        }
    }
}
