/// RGBA8 colour buffer with a matching depth buffer
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    color: Vec<[u8; 4]>,
    depth: Vec<f32>,
}

impl FrameBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        let count = (width * height) as usize;
        Self {
            width,
            height,
            color: vec![[0, 0, 0, 255]; count],
            depth: vec![f32::INFINITY; count],
        }
    }

    /// Reallocate for a new size; contents are discarded
    pub fn resize(&mut self, width: u32, height: u32) {
        if (width, height) != (self.width, self.height) {
            *self = Self::new(width, height);
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Fill with `rgba` and reset depth to the far plane
    pub fn clear(&mut self, rgba: [u8; 4]) {
        self.color.fill(rgba);
        self.depth.fill(f32::INFINITY);
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.index(x, y).map(|i| self.color[i])
    }

    pub fn depth(&self, x: u32, y: u32) -> Option<f32> {
        self.index(x, y).map(|i| self.depth[i])
    }

    /// Depth-tested write; returns whether the fragment landed
    pub fn plot(&mut self, x: u32, y: u32, depth: f32, rgba: [u8; 4]) -> bool {
        match self.index(x, y) {
            Some(i) if depth < self.depth[i] => {
                self.depth[i] = depth;
                self.color[i] = rgba;
                true
            }
            _ => false,
        }
    }

    /// Whether a fragment at `depth` would pass the depth test
    pub fn passes_depth(&self, x: u32, y: u32, depth: f32) -> bool {
        self.index(x, y).is_some_and(|i| depth < self.depth[i])
    }

    /// Tightly packed RGBA bytes, row-major from the top-left corner
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.color)
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| (y * self.width + x) as usize)
    }
}
