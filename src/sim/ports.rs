//! Interfaces the simulation consumes
//!
//! Input, output and randomness are injected so the core stays deterministic
//! under test. Concrete adapters live in `crate::platform`.

use serde::{Deserialize, Serialize};

use super::field::SpaceField;

/// Discrete player input, at most one per tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerCommand {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    LaunchMissile,
    PauseGame,
}

/// Source of randomness for spawning
pub trait RandomGenerator {
    /// Uniform draw in `[0, 1)`
    fn generate_probability(&mut self) -> f64;

    /// Uniform draw in `[min, max)`; returns `min` when the range is empty
    fn generate_in_range(&mut self, min: f64, max: f64) -> f64 {
        if max <= min {
            return min;
        }
        min + (max - min) * self.generate_probability()
    }
}

/// Non-blocking input source
pub trait Controller {
    /// `None` when no command is pending; must never block
    fn next_player_command(&mut self) -> Option<PlayerCommand>;

    /// Sees the field after each render; most controllers ignore it
    fn observe(&mut self, _field: &SpaceField) {}
}

/// Consumes the field once per tick
pub trait Visualizer {
    fn render_space_field(&mut self, field: &SpaceField);
}

/// Wall-clock source for score timestamps
pub trait Clock {
    /// Current local time as `HH:mm:ss`
    fn now_hms(&self) -> String;
}

impl<R: RandomGenerator + ?Sized> RandomGenerator for Box<R> {
    fn generate_probability(&mut self) -> f64 {
        (**self).generate_probability()
    }

    fn generate_in_range(&mut self, min: f64, max: f64) -> f64 {
        (**self).generate_in_range(min, max)
    }
}

impl<C: Controller + ?Sized> Controller for Box<C> {
    fn next_player_command(&mut self) -> Option<PlayerCommand> {
        (**self).next_player_command()
    }

    fn observe(&mut self, field: &SpaceField) {
        (**self).observe(field)
    }
}

impl<V: Visualizer + ?Sized> Visualizer for Box<V> {
    fn render_space_field(&mut self, field: &SpaceField) {
        (**self).render_space_field(field)
    }
}
