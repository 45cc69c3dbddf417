use std::time::{Duration, Instant};

/// Upper bound on a single frame delta, in seconds
pub const DEFAULT_MAX_DELTA: f32 = 0.25;

/// Wall clock for the window loop - measures delta time between ticks
///
/// Deltas are clamped to `max_delta` so a stalled or minimized window
/// doesn't fast-forward the animation in one jump.
#[derive(Debug)]
pub struct Clock {
    last_tick: Instant,
    max_delta: Duration,
}

impl Clock {
    /// Create new clock starting now
    pub fn new(max_delta: f32) -> Self {
        Self {
            last_tick: Instant::now(),
            max_delta: Duration::from_secs_f32(max_delta.max(0.0)),
        }
    }

    /// Delta in seconds since the last tick, clamped; advances the clock
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let delta = now.saturating_duration_since(self.last_tick);
        self.last_tick = now;
        delta.min(self.max_delta).as_secs_f32()
    }

    /// Reset clock to current time
    pub fn reset(&mut self) {
        self.last_tick = Instant::now();
    }

    pub fn max_delta(&self) -> f32 {
        self.max_delta.as_secs_f32()
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DELTA)
    }
}
