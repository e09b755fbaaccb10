//! Field occupants
//!
//! Ship, asteroids, missiles and explosions share one value type tagged by
//! [`ObjectKind`]. The field keeps them in plain indexed lists.

use serde::{Deserialize, Serialize};

use super::vector::{Point2D, Vector2D};

/// Variant tag, plus the little state that only one variant needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectKind {
    Ship,
    Asteroid,
    Missile,
    /// Removed once `remaining_ticks` reaches zero
    Explosion { remaining_ticks: u32 },
}

impl ObjectKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            ObjectKind::Ship => "SpaceShip",
            ObjectKind::Asteroid => "Asteroid",
            ObjectKind::Missile => "Missile",
            ObjectKind::Explosion { .. } => "Explosion",
        }
    }

    /// Character used by text visualizers
    pub fn glyph(&self) -> char {
        match self {
            ObjectKind::Ship => '^',
            ObjectKind::Asteroid => '.',
            ObjectKind::Missile => '|',
            ObjectKind::Explosion { .. } => '@',
        }
    }

    pub fn is_explosion(&self) -> bool {
        matches!(self, ObjectKind::Explosion { .. })
    }
}

/// A circular body in the field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpaceObject {
    /// Unique within a field, never reused
    pub id: u32,
    pub kind: ObjectKind,
    pub center: Point2D,
    pub velocity: Vector2D,
    pub radius: f64,
    pub mass: f64,
}

impl SpaceObject {
    pub fn new(
        id: u32,
        kind: ObjectKind,
        center: Point2D,
        velocity: Vector2D,
        radius: f64,
        mass: f64,
    ) -> Self {
        debug_assert!(radius > 0.0, "radius must be positive");
        debug_assert!(
            mass > 0.0 || kind.is_explosion(),
            "only explosions may be massless"
        );
        Self {
            id,
            kind,
            center,
            velocity,
            radius,
            mass,
        }
    }

    pub fn glyph(&self) -> char {
        self.kind.glyph()
    }

    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }

    /// Strict overlap: touching circles do not impact
    pub fn impacts(&self, other: &SpaceObject) -> bool {
        self.center.distance(other.center) < self.radius + other.radius
    }

    /// Exchange momentum along the line of centers
    ///
    /// Only the normal velocity components change; tangential components are
    /// kept. With `restitution == 1.0` kinetic energy is conserved. Positions
    /// are left alone, so overlapping bodies may collide again next tick.
    /// Coincident centers give no contact normal and are skipped.
    pub fn collide_with(&mut self, other: &mut SpaceObject, restitution: f64) {
        let Ok(normal) = self.center.to(other.center).unit() else {
            log::debug!(
                "Skipping collision of {} #{} and {} #{}: coincident centers",
                self.type_name(),
                self.id,
                other.type_name(),
                other.id
            );
            return;
        };

        let m1 = self.mass;
        let m2 = other.mass;
        let total = m1 + m2;
        if total <= 0.0 {
            return;
        }

        let v1n = self.velocity.dot(normal);
        let v2n = other.velocity.dot(normal);

        let v1n_after = (m1 * v1n + m2 * v2n + m2 * restitution * (v2n - v1n)) / total;
        let v2n_after = (m1 * v1n + m2 * v2n + m1 * restitution * (v1n - v2n)) / total;

        self.velocity += normal * (v1n_after - v1n);
        other.velocity += normal * (v2n_after - v2n);
    }

    /// Fully outside `[0, width] x [0, height]` by more than the radius
    pub fn is_out_of_bounds(&self, width: f64, height: f64) -> bool {
        let x = self.center.x();
        let y = self.center.y();
        x < -self.radius || x > width + self.radius || y < -self.radius || y > height + self.radius
    }

    /// Advance one step of `dt` ticks
    pub fn advance(&mut self, dt: f64) {
        self.center += self.velocity * dt;
    }

    pub fn momentum(&self) -> Vector2D {
        self.velocity * self.mass
    }

    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.velocity.dot(self.velocity)
    }

    pub fn boost_up(&mut self, boost: f64) {
        self.velocity += Vector2D::UP * boost;
    }

    pub fn boost_down(&mut self, boost: f64) {
        self.velocity += Vector2D::DOWN * boost;
    }

    pub fn boost_left(&mut self, boost: f64) {
        self.velocity += Vector2D::LEFT * boost;
    }

    pub fn boost_right(&mut self, boost: f64) {
        self.velocity += Vector2D::RIGHT * boost;
    }

    /// Count down an explosion; true while it should stay in the field
    pub fn tick_explosion(&mut self) -> bool {
        match &mut self.kind {
            ObjectKind::Explosion { remaining_ticks } => {
                *remaining_ticks = remaining_ticks.saturating_sub(1);
                *remaining_ticks > 0
            }
            _ => true,
        }
    }
}
