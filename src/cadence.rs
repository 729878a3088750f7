//! Tick cadence for whoever owns the clock
//!
//! A fixed base timer fires every `tick_ms`. The game only advances on every
//! `period(level)`-th base tick, so higher levels fall faster. When a settle
//! leaves rows highlighted the counter restarts, which keeps the highlight on
//! screen for one whole game step before the flush.

use crate::score::MAX_LEVEL;
use std::time::Duration;

/// Default base timer period in milliseconds
pub const TICK_MS: u64 = 100;

/// Base ticks per game step at `level`: 10 at level 1 down to 1 at `MAX_LEVEL`
pub fn period(level: u32) -> u32 {
    MAX_LEVEL - level.clamp(1, MAX_LEVEL) + 1
}

#[derive(Debug, Clone)]
pub struct Cadence {
    counter: u32,
    tick: Duration,
}

impl Default for Cadence {
    fn default() -> Self {
        Self::new(Duration::from_millis(TICK_MS))
    }
}

impl Cadence {
    pub fn new(tick: Duration) -> Self {
        Self { counter: 0, tick }
    }

    /// Count one base tick. Returns true when the game should step.
    pub fn advance(&mut self, level: u32) -> bool {
        self.counter = self.counter.wrapping_add(1);
        self.counter % period(level) == 0
    }

    /// Restart the count so the next step is a full period away
    pub fn hiccup(&mut self) {
        self.counter = 0;
    }

    /// Wall-clock time between game steps at `level`
    pub fn step_interval(&self, level: u32) -> Duration {
        self.tick * period(level)
    }
}
