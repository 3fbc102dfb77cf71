//! Fixed-step clock
//!
//! Converts wall-clock time fed by the embedding loop into a bounded
//! number of fixed simulation steps. Owning the step cadence here keeps
//! every timer in the crate a tick counter, so stopping or resetting a
//! session cancels all of them in one place.

use crate::consts::{MAX_CATCHUP_TICKS, TICK_SECONDS};

/// Accumulator-driven fixed-step clock.
///
/// `start()` begins producing ticks from [`FixedClock::advance`];
/// `stop()` is idempotent and no tick is produced after it returns.
#[derive(Debug, Clone)]
pub struct FixedClock {
    period: f32,
    accumulator: f32,
    running: bool,
    ticks_elapsed: u64,
}

impl Default for FixedClock {
    fn default() -> Self {
        Self::new(TICK_SECONDS)
    }
}

impl FixedClock {
    pub fn new(period: f32) -> Self {
        Self {
            period,
            accumulator: 0.0,
            running: false,
            ticks_elapsed: 0,
        }
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    /// Idempotent; discards any partially accumulated time.
    pub fn stop(&mut self) {
        self.running = false;
        self.accumulator = 0.0;
    }

    /// Stop and zero the tick counter (session restart path).
    pub fn reset(&mut self) {
        self.stop();
        self.ticks_elapsed = 0;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn ticks_elapsed(&self) -> u64 {
        self.ticks_elapsed
    }

    /// Feed elapsed wall time, returning how many fixed steps to run.
    ///
    /// Returns 0 while stopped. The result is capped at
    /// `MAX_CATCHUP_TICKS`; excess accumulated time is dropped so a long
    /// stall cannot trigger a catch-up spiral.
    pub fn advance(&mut self, elapsed: f32) -> u32 {
        if !self.running {
            return 0;
        }

        self.accumulator += elapsed.max(0.0);

        let mut ticks = 0;
        while self.accumulator >= self.period && ticks < MAX_CATCHUP_TICKS {
            self.accumulator -= self.period;
            ticks += 1;
        }
        if ticks == MAX_CATCHUP_TICKS {
            // Drop the backlog instead of replaying it
            self.accumulator = 0.0;
        }

        self.ticks_elapsed += ticks as u64;
        ticks
    }
}
