/// Self-contained timers - each one accumulates what it's fed and decides
/// when to fire

/// Frame counter - fires every N ticks
#[derive(Debug, Clone, Copy)]
pub struct EveryNTicks {
    interval: u64,
    count: u64,
}

impl EveryNTicks {
    /// Create timer that fires every N ticks; zero behaves like one
    pub fn new(interval: u64) -> Self {
        Self {
            interval: interval.max(1),
            count: 0,
        }
    }

    /// Tick once, returns true if should fire
    pub fn tick(&mut self) -> bool {
        self.count += 1;
        if self.count >= self.interval {
            self.count = 0;
            true
        } else {
            false
        }
    }

    /// Reset counter
    pub fn reset(&mut self) {
        self.count = 0;
    }
}

/// Average frame rate over a reporting window
#[derive(Debug, Clone, Copy)]
pub struct FpsCounter {
    window: f32,
    elapsed: f32,
    frames: u32,
}

impl FpsCounter {
    pub fn new(window: f32) -> Self {
        Self {
            window,
            elapsed: 0.0,
            frames: 0,
        }
    }

    /// Count one frame; yields the average rate once per window
    pub fn tick(&mut self, delta: f32) -> Option<f32> {
        self.frames += 1;
        self.elapsed += delta;

        if self.elapsed < self.window || self.elapsed <= 0.0 {
            return None;
        }

        let fps = self.frames as f32 / self.elapsed;
        self.frames = 0;
        self.elapsed = 0.0;
        Some(fps)
    }
}
