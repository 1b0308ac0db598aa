//! # Heartbeat Pacer
//!
//! Fixed-timestep controller for the embedder's heartbeat driver. The
//! runtime itself is passive; whoever owns the authority thread calls
//! [`HeartbeatPacer::should_beat`] in its loop and wraps each
//! [`crate::CosmeticRuntime::heartbeat`] call in [`HeartbeatPacer::beat`].
//!
//! The first `warmup_ticks` due beats are swallowed, giving the host time to
//! finish loading worlds before cosmetics start rendering. Particle work is
//! tolerant of jitter, so the pacer only accumulates elapsed time; it never
//! sleeps or spins on the authority thread.

use std::time::{Duration, Instant};

/// Fixed-timestep heartbeat controller with startup warmup.
pub struct HeartbeatPacer {
    interval: Duration,
    last_observed: Instant,
    accumulator: Duration,
    warmup_remaining: u32,
    beat_count: u64,
    late_beats: u64,
    longest_beat: Duration,
}

impl HeartbeatPacer {
    /// Creates a pacer beating at `interval`, swallowing the first
    /// `warmup_ticks` due beats.
    #[must_use]
    pub fn new(interval: Duration, warmup_ticks: u32) -> Self {
        Self {
            interval,
            last_observed: Instant::now(),
            accumulator: Duration::ZERO,
            warmup_remaining: warmup_ticks,
            beat_count: 0,
            late_beats: 0,
            longest_beat: Duration::ZERO,
        }
    }

    /// Returns true when a heartbeat is due. Call in a loop until it returns
    /// false; warmup beats are consumed internally and never reported.
    #[must_use]
    pub fn should_beat(&mut self) -> bool {
        let now = Instant::now();
        self.accumulator += now.duration_since(self.last_observed);
        self.last_observed = now;

        while self.warmup_remaining > 0 && self.accumulator >= self.interval {
            self.accumulator -= self.interval;
            self.warmup_remaining -= 1;
        }
        self.warmup_remaining == 0 && self.accumulator >= self.interval
    }

    /// Runs one heartbeat, consuming one interval from the accumulator and
    /// recording whether the beat overran that interval.
    pub fn beat<T>(&mut self, heartbeat: impl FnOnce() -> T) -> T {
        self.accumulator = self.accumulator.saturating_sub(self.interval);
        self.beat_count += 1;

        let start = Instant::now();
        let result = heartbeat();
        let elapsed = start.elapsed();

        if elapsed > self.longest_beat {
            self.longest_beat = elapsed;
        }
        if elapsed > self.interval {
            self.late_beats += 1;
        }
        result
    }

    /// Heartbeats executed so far, warmup excluded.
    #[must_use]
    pub const fn beat_count(&self) -> u64 {
        self.beat_count
    }

    /// Heartbeats that ran longer than the interval.
    #[must_use]
    pub const fn late_beats(&self) -> u64 {
        self.late_beats
    }

    /// Longest heartbeat observed.
    #[must_use]
    pub const fn longest_beat(&self) -> Duration {
        self.longest_beat
    }

    /// Warmup beats still to swallow.
    #[must_use]
    pub const fn warmup_remaining(&self) -> u32 {
        self.warmup_remaining
    }

    /// Target heartbeat interval.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pacer_creation() {
        let pacer = HeartbeatPacer::new(Duration::from_millis(50), 20);
        assert_eq!(pacer.beat_count(), 0);
        assert_eq!(pacer.late_beats(), 0);
        assert_eq!(pacer.warmup_remaining(), 20);
        assert_eq!(pacer.interval(), Duration::from_millis(50));
    }

    #[test]
    fn test_beat_runs_closure_and_counts() {
        let mut pacer = HeartbeatPacer::new(Duration::from_millis(1), 0);
        std::thread::sleep(Duration::from_millis(5));
        assert!(pacer.should_beat());

        let mut ran = false;
        pacer.beat(|| ran = true);
        assert!(ran);
        assert_eq!(pacer.beat_count(), 1);
    }

    #[test]
    fn test_warmup_swallows_initial_beats() {
        let mut pacer = HeartbeatPacer::new(Duration::from_millis(1), 3);
        std::thread::sleep(Duration::from_millis(3));
        // The first few due beats drain the warmup allowance instead of
        // firing.
        let _ = pacer.should_beat();
        assert!(pacer.warmup_remaining() < 3);

        std::thread::sleep(Duration::from_millis(10));
        assert!(pacer.should_beat());
        assert_eq!(pacer.warmup_remaining(), 0);
    }

    #[test]
    fn test_overrunning_beat_is_late() {
        let mut pacer = HeartbeatPacer::new(Duration::from_millis(1), 0);
        std::thread::sleep(Duration::from_millis(3));
        assert!(pacer.should_beat());

        pacer.beat(|| std::thread::sleep(Duration::from_millis(3)));
        assert_eq!(pacer.late_beats(), 1);
        assert!(pacer.longest_beat() >= Duration::from_millis(3));
    }

    #[test]
    fn test_quick_beat_is_not_late() {
        let mut pacer = HeartbeatPacer::new(Duration::from_millis(50), 0);
        std::thread::sleep(Duration::from_millis(60));
        assert!(pacer.should_beat());

        pacer.beat(|| {});
        assert_eq!(pacer.late_beats(), 0);
        assert_eq!(pacer.beat_count(), 1);
    }
}
