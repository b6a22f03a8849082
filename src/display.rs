const LOW_RES: (usize, usize) = (64, 32);
const HIGH_RES: (usize, usize) = (128, 64);

// fixed horizontal scroll distance for 00FB / 00FC
pub const SCROLL_COLUMNS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Resolution {
    #[default]
    Low,
    High,
}

impl Resolution {
    pub fn width(self) -> usize {
        match self {
            Resolution::Low => LOW_RES.0,
            Resolution::High => HIGH_RES.0,
        }
    }

    pub fn height(self) -> usize {
        match self {
            Resolution::Low => LOW_RES.1,
            Resolution::High => HIGH_RES.1,
        }
    }
}

/// A read-only copy of the screen handed to the renderer, so the next
/// instruction batch can keep mutating the live buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<bool>,
}

impl Frame {
    pub fn is_set(&self, x: usize, y: usize) -> bool {
        self.pixels[y * self.width + x]
    }
}

pub struct FrameBuffer {
    bit_buffer: Vec<bool>,
    resolution: Resolution,
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    pub fn new() -> Self {
        let resolution = Resolution::Low;
        Self {
            bit_buffer: vec![false; resolution.width() * resolution.height()],
            resolution,
        }
    }

    pub fn width(&self) -> usize {
        self.resolution.width()
    }

    pub fn height(&self) -> usize {
        self.resolution.height()
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn pixels(&self) -> &[bool] {
        &self.bit_buffer
    }

    pub fn get(&self, x: usize, y: usize) -> bool {
        self.bit_buffer[y * self.width() + x]
    }

    /// Reallocates for the new mode. Never preserves the picture, even when
    /// the mode does not change.
    pub fn set_resolution(&mut self, resolution: Resolution) {
        self.resolution = resolution;
        self.bit_buffer = vec![false; resolution.width() * resolution.height()];
    }

    pub fn clear_buffer(&mut self) {
        self.bit_buffer.fill(false);
    }

    pub fn snapshot(&self) -> Frame {
        Frame {
            width: self.width(),
            height: self.height(),
            pixels: self.bit_buffer.clone(),
        }
    }

    /// XORs `sprite` onto the screen with its top-left corner at `(x, y)`.
    /// Each row is `row_bytes` bytes wide (1 for regular sprites, 2 for the
    /// 16x16 form). Anything past the right or bottom edge is clipped.
    /// Returns true if a lit pixel was switched off.
    pub fn paint(&mut self, x: usize, y: usize, sprite: &[u8], row_bytes: usize) -> bool {
        let (width, height) = (self.width(), self.height());
        let mut vf = false;
        for (i, row) in sprite.chunks(row_bytes).enumerate() {
            let ny = y + i;
            if ny >= height {
                break;
            }
            for (b, byte) in row.iter().enumerate() {
                for j in 0..8 {
                    let nx = x + b * 8 + j;
                    if nx >= width {
                        break;
                    }
                    if (byte >> (7 - j)) & 1 == 0 {
                        continue;
                    }
                    let index = ny * width + nx;
                    if self.bit_buffer[index] {
                        vf = true;
                    }
                    self.bit_buffer[index] = !self.bit_buffer[index];
                }
            }
        }
        vf
    }

    pub fn scroll_down(&mut self, rows: usize) {
        let width = self.width();
        let shift = (rows * width).min(self.bit_buffer.len());
        let len = self.bit_buffer.len();
        self.bit_buffer.copy_within(0..len - shift, shift);
        self.bit_buffer[..shift].fill(false);
    }

    pub fn scroll_right(&mut self) {
        let width = self.width();
        for row in self.bit_buffer.chunks_mut(width) {
            row.copy_within(0..width - SCROLL_COLUMNS, SCROLL_COLUMNS);
            row[..SCROLL_COLUMNS].fill(false);
        }
    }

    pub fn scroll_left(&mut self) {
        let width = self.width();
        for row in self.bit_buffer.chunks_mut(width) {
            row.copy_within(SCROLL_COLUMNS..width, 0);
            row[width - SCROLL_COLUMNS..].fill(false);
        }
    }
}
