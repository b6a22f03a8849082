use minifb::{Key, Scale, Window, WindowOptions};

use crate::{
    display::{Frame, Resolution},
    error::Chip8Error,
    frontend::Frontend,
    keyboard::{keys_to_latch, KEY_COUNT},
};

const ON: u32 = 0x00_7F_FF; // (0, 127, 255)
const OFF: u32 = 0x00_00_00;

/// minifb window whose size never changes. Each high-res pixel is a square
/// of `fine_cell(pixel_scale)` window pixels and each low-res pixel twice
/// that, so either grid fills the window exactly.
pub struct Screen {
    window: Window,
    pixel_buffer: Vec<u32>,
    width: usize,
    height: usize,
}

/// Window pixels per high-res cell. `pixel_scale` counts window pixels per
/// low-res cell, so odd scales round down and anything below 2 becomes 2.
pub fn fine_cell(pixel_scale: usize) -> usize {
    (pixel_scale / 2).max(1)
}

pub fn window_size(pixel_scale: usize) -> (usize, usize) {
    let high = Resolution::High;
    let cell = fine_cell(pixel_scale);
    (high.width() * cell, high.height() * cell)
}

/// Paints `frame` into a `width`-wide buffer sized by `window_size`.
pub fn rasterize(buffer: &mut [u32], width: usize, frame: &Frame) {
    let cell = width / frame.width;
    buffer.fill(OFF);
    for y in 0..frame.height {
        for x in 0..frame.width {
            if !frame.is_set(x, y) {
                continue;
            }
            for py in y * cell..(y + 1) * cell {
                let start = py * width + x * cell;
                buffer[start..start + cell].fill(ON);
            }
        }
    }
}

impl Screen {
    pub fn new(pixel_scale: usize) -> Result<Self, Chip8Error> {
        let (width, height) = window_size(pixel_scale);
        let mut window = Window::new(
            "superchip - ESC to exit",
            width,
            height,
            WindowOptions {
                scale: Scale::X1,
                ..WindowOptions::default()
            },
        )?;
        window.set_position(500, 300);

        Ok(Self {
            window,
            pixel_buffer: vec![OFF; width * height],
            width,
            height,
        })
    }
}

impl Frontend for Screen {
    fn poll_keys(&mut self) -> [bool; KEY_COUNT] {
        keys_to_latch(&self.window.get_keys())
    }

    fn present(&mut self, frame: &Frame) -> Result<(), Chip8Error> {
        rasterize(&mut self.pixel_buffer, self.width, frame);
        self.window
            .update_with_buffer(&self.pixel_buffer, self.width, self.height)?;
        Ok(())
    }

    // pumps window events so keys stay fresh between draws
    fn sync(&mut self) -> Result<(), Chip8Error> {
        self.window.update();
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.window.is_open() && !self.window.is_key_down(Key::Escape)
    }
}
