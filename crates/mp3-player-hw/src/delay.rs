//! Blocking delays between commands.
//!
//! The module needs time to process each command before the next one
//! arrives. Delays go through [`Delay`] so callers can swap the real sleep
//! for a recorder.

use std::time::Duration;

/// Blocking delay capability.
pub trait Delay {
    /// Blocks for `ms` milliseconds.
    fn delay_ms(&mut self, ms: u64);
}

/// Sleeps the current thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadDelay;

impl Delay for ThreadDelay {
    fn delay_ms(&mut self, ms: u64) {
        std::thread::sleep(Duration::from_millis(ms));
    }
}

/// Records requested delays without sleeping.
#[derive(Debug, Clone, Default)]
pub struct RecordingDelay {
    delays: Vec<u64>,
}

impl RecordingDelay {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every delay requested so far, in order.
    pub fn delays(&self) -> &[u64] {
        &self.delays
    }

    /// Returns the sum of all requested delays.
    pub fn total_ms(&self) -> u64 {
        self.delays.iter().sum()
    }
}

impl Delay for RecordingDelay {
    fn delay_ms(&mut self, ms: u64) {
        self.delays.push(ms);
    }
}
