//! Simulated clock.
//!
//! Time only moves when an operator advances it. The clock is owned by the
//! session that executes commands; nothing reads a wall clock.

use chrono::{DateTime, TimeDelta, Utc};

use crate::value_object::Duration;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SimulatedClock {
    now: DateTime<Utc>,
}

impl SimulatedClock {
    /// A clock positioned at the simulation origin (midnight, hour 0).
    pub fn new() -> Self {
        Self {
            now: DateTime::<Utc>::default(),
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Whole hours elapsed since the simulation origin.
    pub fn elapsed_hours(&self) -> i64 {
        (self.now - DateTime::<Utc>::default()).num_hours()
    }

    /// Returns the clock as it would read after `hours`, without moving this one.
    ///
    /// Saturates at the latest representable instant.
    pub fn advanced_by(&self, hours: Duration) -> Self {
        let now = TimeDelta::try_hours(hours.value())
            .and_then(|delta| self.now.checked_add_signed(delta))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self { now }
    }

    pub fn advance(&mut self, hours: Duration) -> DateTime<Utc> {
        *self = self.advanced_by(hours);
        self.now
    }
}

impl Default for SimulatedClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders the time of day as `HH:00`.
impl core::fmt::Display for SimulatedClock {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.now.format("%H:00"))
    }
}
