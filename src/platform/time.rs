//! Wall-clock sources for score timestamps

use chrono::Local;

use crate::sim::Clock;

/// Local system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_hms(&self) -> String {
        Local::now().format("%H:%M:%S").to_string()
    }
}

/// Always reports the same instant
#[derive(Debug, Clone)]
pub struct FixedClock(pub String);

impl Clock for FixedClock {
    fn now_hms(&self) -> String {
        self.0.clone()
    }
}
