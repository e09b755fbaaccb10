//! Controllers
//!
//! Neither controller blocks: an empty queue or an idle autopilot simply
//! yields no command for the tick.

use std::collections::VecDeque;

use crate::sim::vector::{Point2D, Vector2D};
use crate::sim::{Controller, PlayerCommand, SpaceField};

/// Plays back a queue of per-tick inputs; `None` entries are idle ticks
#[derive(Debug, Clone, Default)]
pub struct ScriptedController {
    script: VecDeque<Option<PlayerCommand>>,
}

impl ScriptedController {
    pub fn new<I>(script: I) -> Self
    where
        I: IntoIterator<Item = Option<PlayerCommand>>,
    {
        Self {
            script: script.into_iter().collect(),
        }
    }

    /// Queue one command for a future tick
    pub fn push(&mut self, command: PlayerCommand) {
        self.script.push_back(Some(command));
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl Controller for ScriptedController {
    fn next_player_command(&mut self) -> Option<PlayerCommand> {
        self.script.pop_front().flatten()
    }
}

/// Demo pilot: chases the nearest asteroid and fires along its heading
///
/// Missiles leave along the ship's velocity, so flying toward a target is
/// also aiming at it.
#[derive(Debug, Clone)]
pub struct AutopilotController {
    fire_interval: u64,
    cruise_speed: f64,
    ticks: u64,
    ship_center: Point2D,
    ship_velocity: Vector2D,
    target: Option<Point2D>,
}

impl AutopilotController {
    pub fn new(fire_interval: u64, cruise_speed: f64) -> Self {
        Self {
            fire_interval: fire_interval.max(1),
            cruise_speed,
            ticks: 0,
            ship_center: Point2D::ORIGIN,
            ship_velocity: Vector2D::ZERO,
            target: None,
        }
    }

    pub fn target(&self) -> Option<Point2D> {
        self.target
    }

    fn steer(&self) -> Option<PlayerCommand> {
        let v = self.ship_velocity;
        let Some(target) = self.target else {
            return damp(v.dx(), v.dy(), 0.5);
        };

        let d = self.ship_center.to(target);
        if d.dx().abs() >= d.dy().abs() {
            let sign = d.dx().signum();
            if v.dx() * sign < self.cruise_speed {
                return Some(horizontal(sign));
            }
            damp(0.0, v.dy(), 0.5)
        } else {
            let sign = d.dy().signum();
            if v.dy() * sign < self.cruise_speed {
                return Some(vertical(sign));
            }
            damp(v.dx(), 0.0, 0.5)
        }
    }
}

impl Default for AutopilotController {
    fn default() -> Self {
        Self::new(15, 3.0)
    }
}

impl Controller for AutopilotController {
    fn next_player_command(&mut self) -> Option<PlayerCommand> {
        self.ticks += 1;
        if self.target.is_some() && self.ticks % self.fire_interval == 0 {
            return Some(PlayerCommand::LaunchMissile);
        }
        self.steer()
    }

    fn observe(&mut self, field: &SpaceField) {
        let ship = field.ship();
        self.ship_center = ship.center;
        self.ship_velocity = ship.velocity;
        self.target = field
            .asteroids()
            .iter()
            .min_by(|a, b| {
                let da = ship.center.distance(a.center);
                let db = ship.center.distance(b.center);
                da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|a| a.center);
    }
}

fn horizontal(sign: f64) -> PlayerCommand {
    if sign >= 0.0 {
        PlayerCommand::MoveRight
    } else {
        PlayerCommand::MoveLeft
    }
}

fn vertical(sign: f64) -> PlayerCommand {
    if sign >= 0.0 {
        PlayerCommand::MoveUp
    } else {
        PlayerCommand::MoveDown
    }
}

/// Push back against the larger velocity component above `threshold`
fn damp(vx: f64, vy: f64, threshold: f64) -> Option<PlayerCommand> {
    if vx.abs() < threshold && vy.abs() < threshold {
        return None;
    }
    if vx.abs() >= vy.abs() {
        Some(horizontal(-vx))
    } else {
        Some(vertical(-vy))
    }
}
