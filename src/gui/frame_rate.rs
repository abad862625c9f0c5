use std::time::{Duration, Instant};

/// Frames per second, averaged over fixed sampling windows. The reading only
/// changes when a window closes, which keeps the on-screen number legible.
pub struct FrameRate {
    window: Duration,
    window_start: Instant,
    frames: u32,
    reading: f64,
}

impl FrameRate {
    pub fn new(window: Duration, now: Instant) -> Self {
        FrameRate {
            window,
            window_start: now,
            frames: 0,
            reading: 0.0,
        }
    }

    pub fn tick(&mut self, now: Instant) {
        self.frames += 1;
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed >= self.window {
            self.reading = self.frames as f64 / elapsed.as_secs_f64();
            self.window_start = now;
            self.frames = 0;
        }
    }

    pub fn reading(&self) -> f64 {
        self.reading
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn test_reading_updates_per_window() {
        let start = Instant::now();
        let frame = Duration::from_millis(20);
        let mut rate = FrameRate::new(Duration::from_secs(1), start);

        for i in 1..50 {
            rate.tick(start + frame * i);
        }
        // Window hasn't closed yet
        assert_eq!(rate.reading(), 0.0);

        rate.tick(start + frame * 50);
        assert_relative_eq!(rate.reading(), 50.0);

        // A slower second window replaces the reading
        let second = start + Duration::from_secs(1);
        for i in 1..=10 {
            rate.tick(second + Duration::from_millis(100) * i);
        }
        assert_relative_eq!(rate.reading(), 10.0);
    }
}
