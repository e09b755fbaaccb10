//! Deterministic simulation module
//!
//! All gameplay logic lives here:
//! - Fixed tick length only
//! - Randomness only through the injected `RandomGenerator`
//! - Stable iteration order (insertion order within each collection)
//! - No rendering, input or storage dependencies

pub mod collision;
pub mod field;
pub mod object;
pub mod ports;
pub mod state;
pub mod vector;

pub use collision::{impacting_pairs, missile_asteroid_hits, unordered_pairs};
pub use field::SpaceField;
pub use object::{ObjectKind, SpaceObject};
pub use ports::{Clock, Controller, PlayerCommand, RandomGenerator, Visualizer};
pub use state::{GamePhase, GameState};
pub use vector::{Point2D, Vector2D};
