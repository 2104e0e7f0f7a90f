use std::time::{Duration, Instant};

/// Cooperative frame pacing.
///
/// [`FrameLimiter::throttle`] sleeps away whatever is left of the target
/// frame interval since the previous call. Backends call it immediately
/// before presenting, so the measured interval covers the whole frame.
#[derive(Debug, Clone)]
pub struct FrameLimiter {
    interval: Duration,
    last: Option<Instant>,
}

impl FrameLimiter {
    /// Creates a limiter targeting `fps` frames per second. Non-positive
    /// or non-finite rates disable throttling; rates so low that the
    /// interval overflows [`Duration`] wait for [`Duration::MAX`].
    #[must_use]
    pub fn new(fps: f64) -> Self {
        let interval = if fps.is_finite() && fps > 0.0 {
            Duration::try_from_secs_f64(1.0 / fps).unwrap_or(Duration::MAX)
        } else {
            Duration::ZERO
        };
        Self { interval, last: None }
    }

    /// Target time between frames.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Sleeps the remainder of the frame interval, then starts a new frame.
    pub fn throttle(&mut self) {
        if let Some(remaining) = self.remaining(Instant::now()) {
            std::thread::sleep(remaining);
        }
        self.last = Some(Instant::now());
    }

    fn remaining(&self, now: Instant) -> Option<Duration> {
        let elapsed = now.saturating_duration_since(self.last?);
        self.interval.checked_sub(elapsed).filter(|d| !d.is_zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_from_fps() {
        assert_eq!(FrameLimiter::new(50.0).interval(), Duration::from_millis(20));
        assert_eq!(FrameLimiter::new(0.0).interval(), Duration::ZERO);
        assert_eq!(FrameLimiter::new(f64::NAN).interval(), Duration::ZERO);
    }

    #[test]
    fn test_tiny_fps_saturates_interval() {
        assert_eq!(FrameLimiter::new(1e-30).interval(), Duration::MAX);
        assert_eq!(FrameLimiter::new(f64::MIN_POSITIVE).interval(), Duration::MAX);
    }

    #[test]
    fn test_first_frame_never_sleeps() {
        let limiter = FrameLimiter::new(1.0);
        assert_eq!(limiter.remaining(Instant::now()), None);
    }

    #[test]
    fn test_remaining_after_throttle() {
        let mut limiter = FrameLimiter::new(10.0);
        limiter.last = Some(Instant::now());
        let start = limiter.last.unwrap();

        let remaining = limiter.remaining(start + Duration::from_millis(30)).unwrap();
        assert_eq!(remaining, Duration::from_millis(70));
        assert_eq!(limiter.remaining(start + Duration::from_millis(150)), None);
    }

    #[test]
    fn test_throttle_waits_for_interval() {
        let mut limiter = FrameLimiter::new(100.0);
        limiter.throttle();
        let start = Instant::now();
        limiter.throttle();
        assert!(start.elapsed() >= Duration::from_millis(9));
    }
}
