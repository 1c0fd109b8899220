//! Millisecond-level service over one raw countdown channel.

use crate::defs::TICKS_PER_MS;
use crate::hw::CountdownTimer;

/// Owns a single hardware channel. The channel is halted on construction
/// so leftover state from a previous run can't fire a stale expiration.
pub struct TimerService<T> {
    hw: T,
}

impl<T: CountdownTimer> TimerService<T> {
    pub fn new(mut hw: T) -> Self {
        hw.stop();
        Self { hw }
    }

    /// Start a countdown of `ms` milliseconds, auto-reloading if `repeat`.
    /// Re-arming a running channel replaces the pending countdown.
    pub fn arm_ms(&mut self, ms: u32, repeat: bool) {
        self.hw.program(ms.saturating_mul(TICKS_PER_MS), repeat);
    }

    /// Edge-triggered: true exactly once per expiration.
    pub fn expired(&mut self) -> bool {
        self.hw.read_and_clear_expired()
    }

    pub fn stop(&mut self) {
        self.hw.stop();
    }

    /// Free-running counter readback, used only to seed the spawner RNG.
    pub fn entropy(&mut self) -> u32 {
        self.hw.snapshot()
    }

    /// Raw channel access for tests that trigger expirations by hand.
    #[cfg(test)]
    pub(crate) fn hw_mut(&mut self) -> &mut T {
        &mut self.hw
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
