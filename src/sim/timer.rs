/// Fixed-period timer polled from the frame loop.
///
/// An `Interval` is a plain owned value: whoever owns it decides whether it
/// keeps firing, and dropping the owner cancels it. Deadlines advance by whole
/// periods from the start instant, so slow frames delay a tick but never shift
/// the ones after it.

use std::time::{Duration, Instant};

#[derive(Clone, Debug)]
pub struct Interval {
    period: Duration,
    next: Instant,
}

impl Interval {
    pub fn new(period: Duration, start: Instant) -> Self {
        let period = period.max(Duration::from_millis(1));
        Interval { period, next: start + period }
    }

    /// Number of whole periods that elapsed since the last poll.
    pub fn poll(&mut self, now: Instant) -> u32 {
        if now < self.next {
            return 0;
        }
        let behind = now.duration_since(self.next);
        let missed = (behind.as_nanos() / self.period.as_nanos()) as u32;
        let fired = missed.saturating_add(1);
        self.next += self.period * fired;
        fired
    }

    #[allow(dead_code)]
    pub fn period(&self) -> Duration {
        self.period
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEC: Duration = Duration::from_secs(1);

    #[test]
    fn silent_before_first_period() {
        let t0 = Instant::now();
        let mut iv = Interval::new(SEC, t0);
        assert_eq!(iv.poll(t0), 0);
        assert_eq!(iv.poll(t0 + Duration::from_millis(999)), 0);
    }

    #[test]
    fn fires_once_per_period() {
        let t0 = Instant::now();
        let mut iv = Interval::new(SEC, t0);
        assert_eq!(iv.poll(t0 + SEC), 1);
        assert_eq!(iv.poll(t0 + SEC), 0);
        assert_eq!(iv.poll(t0 + Duration::from_millis(1999)), 0);
        assert_eq!(iv.poll(t0 + 2 * SEC), 1);
    }

    #[test]
    fn catches_up_after_a_stall() {
        let t0 = Instant::now();
        let mut iv = Interval::new(SEC, t0);
        assert_eq!(iv.poll(t0 + Duration::from_millis(3500)), 3);
        // Next deadline stays on the original grid.
        assert_eq!(iv.poll(t0 + Duration::from_millis(3999)), 0);
        assert_eq!(iv.poll(t0 + 4 * SEC), 1);
    }

    #[test]
    fn late_frames_do_not_drift() {
        let t0 = Instant::now();
        let mut iv = Interval::new(SEC, t0);
        let mut total = 0;
        for ms in (0..=10_000).step_by(7) {
            total += iv.poll(t0 + Duration::from_millis(ms));
        }
        assert_eq!(total, 9);
    }

    #[test]
    fn zero_period_is_bumped() {
        let iv = Interval::new(Duration::ZERO, Instant::now());
        assert_eq!(iv.period(), Duration::from_millis(1));
    }
}
