//! Platform adapters
//!
//! Concrete implementations of the simulation ports:
//! - Input (scripted playback, autopilot)
//! - Output (ASCII terminal, headless)
//! - Randomness (seeded PCG, fixed sequences)
//! - Time (local wall clock)

pub mod input;
pub mod output;
pub mod rng;
pub mod time;

pub use input::{AutopilotController, ScriptedController};
pub use output::{AsciiVisualizer, HeadlessVisualizer};
pub use rng::{PcgGenerator, SequenceGenerator};
pub use time::{FixedClock, SystemClock};
