//! Round clock driven by the front end's tick loop.

use std::time::Duration;

/// Elapsed-time counter for one round.
///
/// A stopped timer ignores ticks; stopping twice is harmless. While frozen,
/// ticks are absorbed by the freeze before any time is counted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundTimer {
    running: bool,
    elapsed: Duration,
    frozen_for: Duration,
}

impl RoundTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from zero.
    pub fn start(&mut self) {
        self.running = true;
        self.elapsed = Duration::ZERO;
        self.frozen_for = Duration::ZERO;
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.frozen_for = Duration::ZERO;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Pause counting for `duration`. Stacks with an active freeze.
    pub fn freeze(&mut self, duration: Duration) {
        if self.running {
            self.frozen_for += duration;
        }
    }

    pub fn is_frozen(&self) -> bool {
        self.running && !self.frozen_for.is_zero()
    }

    pub fn freeze_remaining(&self) -> Duration {
        self.frozen_for
    }

    /// Advance by `delta`. Returns the new whole-second count when it changed.
    pub fn tick(&mut self, delta: Duration) -> Option<u32> {
        if !self.running {
            return None;
        }

        let absorbed = delta.min(self.frozen_for);
        self.frozen_for -= absorbed;

        let before = self.elapsed_seconds();
        self.elapsed += delta - absorbed;
        let after = self.elapsed_seconds();

        (after != before).then_some(after)
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.elapsed.as_secs().min(u32::MAX as u64) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn test_stopped_timer_ignores_ticks() {
        let mut timer = RoundTimer::new();
        assert_eq!(timer.tick(ms(5_000)), None);
        assert_eq!(timer.elapsed_seconds(), 0);
    }

    #[test]
    fn test_reports_whole_seconds_only() {
        let mut timer = RoundTimer::new();
        timer.start();

        for _ in 0..9 {
            assert_eq!(timer.tick(ms(100)), None);
        }
        assert_eq!(timer.tick(ms(100)), Some(1));
        assert_eq!(timer.tick(ms(2_500)), Some(3));
        assert_eq!(timer.elapsed_seconds(), 3);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut timer = RoundTimer::new();
        timer.start();
        timer.tick(ms(4_000));
        timer.stop();
        timer.stop();

        assert!(!timer.is_running());
        assert_eq!(timer.tick(ms(1_000)), None);
        assert_eq!(timer.elapsed_seconds(), 4);
    }

    #[test]
    fn test_freeze_absorbs_ticks() {
        let mut timer = RoundTimer::new();
        timer.start();
        timer.freeze(Duration::from_secs(10));
        assert!(timer.is_frozen());

        assert_eq!(timer.tick(ms(9_000)), None);
        assert_eq!(timer.elapsed_seconds(), 0);

        // One second of freeze left, then two seconds count.
        assert_eq!(timer.tick(ms(3_000)), Some(2));
        assert!(!timer.is_frozen());
    }

    #[test]
    fn test_freeze_ignored_when_stopped() {
        let mut timer = RoundTimer::new();
        timer.freeze(Duration::from_secs(10));
        assert!(!timer.is_frozen());
        assert_eq!(timer.freeze_remaining(), Duration::ZERO);
    }

    #[test]
    fn test_restart_resets() {
        let mut timer = RoundTimer::new();
        timer.start();
        timer.tick(ms(7_000));
        timer.start();
        assert_eq!(timer.elapsed_seconds(), 0);
    }
}
