/// Frame metadata - carries frame number and timing info
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInfo {
    pub number: u64,
    /// Seconds of animation time up to and including this frame
    pub time: f32,
    pub delta: f32,
}

impl FrameInfo {
    pub fn new(number: u64, time: f32, delta: f32) -> Self {
        Self { number, time, delta }
    }
}

/// Numbers frames and sums their deltas
#[derive(Debug, Clone, Default)]
pub struct FrameCounter {
    next: u64,
    time: f64,
}

impl FrameCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, delta: f32) -> FrameInfo {
        self.time += delta as f64;
        let info = FrameInfo::new(self.next, self.time as f32, delta);
        self.next += 1;
        info
    }

    pub fn frames(&self) -> u64 {
        self.next
    }
}

/// Finite iterator of frames spaced `delta` seconds apart, for headless runs
pub struct FixedStepFrames {
    counter: FrameCounter,
    delta: f32,
    remaining: u64,
}

impl FixedStepFrames {
    pub fn new(count: u64, delta: f32) -> Self {
        Self {
            counter: FrameCounter::new(),
            delta,
            remaining: count,
        }
    }
}

impl Iterator for FixedStepFrames {
    type Item = FrameInfo;

    fn next(&mut self) -> Option<FrameInfo> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(self.counter.advance(self.delta))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for FixedStepFrames {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_numbers_and_accumulates() {
        let mut counter = FrameCounter::new();
        let a = counter.advance(0.5);
        let b = counter.advance(0.25);
        assert_eq!(a, FrameInfo::new(0, 0.5, 0.5));
        assert_eq!(b.number, 1);
        assert!((b.time - 0.75).abs() < 1e-6);
        assert_eq!(counter.frames(), 2);
    }

    #[test]
    fn test_fixed_steps_are_finite() {
        let frames: Vec<_> = FixedStepFrames::new(3, 0.1).collect();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[2].number, 2);
        assert!((frames[2].time - 0.3).abs() < 1e-6);
        assert!(frames.iter().all(|f| f.delta == 0.1));
    }

    #[test]
    fn test_zero_frames() {
        let mut frames = FixedStepFrames::new(0, 1.0 / 60.0);
        assert_eq!(frames.len(), 0);
        assert!(frames.next().is_none());
    }
}
