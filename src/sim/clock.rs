use std::time::{Duration, Instant};

/// How often [`FrameStats`] reports.
pub const REPORT_PERIOD: Duration = Duration::from_secs(3);

/// Frame delta longer than this is clamped; a stalled window (drag,
/// breakpoint) must not fling the agent through the map in one step.
pub const MAX_DT: f64 = 0.25;

/// Monotonic per-frame clock.
///
/// `tick` gives the seconds since the previous tick (for integration),
/// `elapsed` the seconds since start (for the bob phase).
pub struct FrameClock {
    start: Instant,
    last: Instant,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last: now,
        }
    }

    /// Seconds since the last call, clamped to [`MAX_DT`].
    pub fn tick(&mut self) -> f64 {
        let now = Instant::now();
        let dt = now.duration_since(self.last).as_secs_f64();
        self.last = now;
        dt.min(MAX_DT)
    }

    #[inline]
    pub fn elapsed(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

/// Accumulates frame times and logs the average every [`REPORT_PERIOD`].
pub struct FrameStats {
    acc_time: Duration, // cumulated frame time
    acc_frames: usize,  // frames in the current window
    last_print: Instant,
}

impl Default for FrameStats {
    fn default() -> Self {
        Self {
            acc_time: Duration::ZERO,
            acc_frames: 0,
            last_print: Instant::now(),
        }
    }
}

impl FrameStats {
    pub fn record(&mut self, frame: Duration) {
        self.acc_time += frame;
        self.acc_frames += 1;
        if self.last_print.elapsed() >= REPORT_PERIOD {
            if let Some((avg_ms, fps)) = self.take_average() {
                log::info!("avg frame: {avg_ms:.2} ms  ({fps:.1} FPS)");
            }
            self.last_print = Instant::now();
        }
    }

    /// Average frame time in ms and the matching FPS, resetting the window.
    fn take_average(&mut self) -> Option<(f64, f64)> {
        if self.acc_frames == 0 || self.acc_time.is_zero() {
            return None;
        }
        let avg_ms = self.acc_time.as_secs_f64() * 1000.0 / self.acc_frames as f64;
        self.acc_time = Duration::ZERO;
        self.acc_frames = 0;
        Some((avg_ms, 1000.0 / avg_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_is_non_negative_and_clamped() {
        let mut c = FrameClock::new();
        let dt = c.tick();
        assert!((0.0..=MAX_DT).contains(&dt));
        assert!(c.elapsed() >= 0.0);
    }

    #[test]
    fn average_resets_window() {
        let mut s = FrameStats::default();
        s.acc_time = Duration::from_millis(40);
        s.acc_frames = 4;
        let (ms, fps) = s.take_average().unwrap();
        assert!((ms - 10.0).abs() < 1e-9);
        assert!((fps - 100.0).abs() < 1e-9);
        assert_eq!(s.take_average(), None);
    }
}
