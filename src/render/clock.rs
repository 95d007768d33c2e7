//! Lab clock: elapsed simulation time, advanced once per frame while running

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clock {
    elapsed: Duration,
    frames: u64,
    running: bool,
}

impl Clock {
    pub fn new() -> Self {
        Clock {
            elapsed: Duration::ZERO,
            frames: 0,
            running: true,
        }
    }

    /// Advance by one frame. Does nothing while paused.
    /// Returns whether time moved.
    pub fn advance(&mut self, dt: Duration) -> bool {
        if !self.running {
            return false;
        }
        self.elapsed += dt;
        self.frames += 1;
        true
    }

    #[inline]
    pub fn seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Frames advanced while running
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    pub fn resume(&mut self) {
        self.running = true;
    }

    /// Flip the running flag, returning the new state
    pub fn toggle(&mut self) -> bool {
        self.running = !self.running;
        self.running
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}
