use std::time::Instant;

/// Maps wall-clock instants to scene time.
///
/// Scene time is always computed from an anchor rather than accumulated frame
/// by frame. Every change of rate or pause state re-anchors at the current
/// instant, so scene time stays continuous across the change.
#[derive(Debug, Clone, Copy)]
pub struct SceneClock {
    anchor_wall: Instant,
    anchor_scene: f64,
    rate: f64,
    paused: bool,
}

impl SceneClock {
    pub fn new(start: Instant, rate: f64, paused: bool) -> Self {
        SceneClock {
            anchor_wall: start,
            anchor_scene: 0.0,
            rate,
            paused,
        }
    }

    /// Scene time, in seconds, at the given wall-clock instant.
    pub fn time_at(&self, now: Instant) -> f64 {
        if self.paused {
            return self.anchor_scene;
        }
        let elapsed = now.saturating_duration_since(self.anchor_wall).as_secs_f64();
        self.anchor_scene + self.rate * elapsed
    }

    pub fn now(&self) -> f64 {
        self.time_at(Instant::now())
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    fn reanchor(&mut self, now: Instant) {
        self.anchor_scene = self.time_at(now);
        self.anchor_wall = now;
    }

    pub fn set_paused(&mut self, paused: bool, now: Instant) {
        self.reanchor(now);
        self.paused = paused;
    }

    pub fn toggle_pause(&mut self, now: Instant) {
        self.set_paused(!self.paused, now);
    }

    pub fn set_rate(&mut self, rate: f64, now: Instant) {
        self.reanchor(now);
        self.rate = rate;
    }

    pub fn scale_rate(&mut self, factor: f64, now: Instant) {
        self.set_rate(self.rate * factor, now);
    }

    /// Runs time backwards (or forwards again). Also unpauses, since reversing a
    /// paused clock is almost never what you want.
    pub fn reverse(&mut self, now: Instant) {
        self.set_rate(-self.rate, now);
        self.paused = false;
    }
}
