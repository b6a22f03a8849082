use std::collections::VecDeque;

use crate::{display::Frame, error::Chip8Error, keyboard::KEY_COUNT};

/// The outside world as the interpreter sees it: somewhere to put frames and
/// somewhere to read keys from.
pub trait Frontend {
    /// Current state of the 16 logical keys. Must not block.
    fn poll_keys(&mut self) -> [bool; KEY_COUNT];

    /// Repaint the whole grid from `frame`.
    fn present(&mut self, frame: &Frame) -> Result<(), Chip8Error>;

    /// Called once per instruction batch, whether or not anything was drawn.
    fn sync(&mut self) -> Result<(), Chip8Error> {
        Ok(())
    }

    fn is_open(&self) -> bool;
}

/// Frontend with no window. Replays a script of key states (the last one
/// sticks) and remembers the last frame it was given.
#[derive(Debug, Default)]
pub struct Headless {
    keys: VecDeque<[bool; KEY_COUNT]>,
    held: [bool; KEY_COUNT],
    pub last_frame: Option<Frame>,
    pub presents: usize,
    pub syncs: usize,
    /// Close after this many syncs; `None` runs until the program faults.
    pub sync_limit: Option<usize>,
}

impl Headless {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sync_limit(limit: usize) -> Self {
        Self {
            sync_limit: Some(limit),
            ..Self::default()
        }
    }

    pub fn queue_keys(&mut self, keys: [bool; KEY_COUNT]) {
        self.keys.push_back(keys);
    }
}

impl Frontend for Headless {
    fn poll_keys(&mut self) -> [bool; KEY_COUNT] {
        if let Some(keys) = self.keys.pop_front() {
            self.held = keys;
        }
        self.held
    }

    fn present(&mut self, frame: &Frame) -> Result<(), Chip8Error> {
        self.presents += 1;
        self.last_frame = Some(frame.clone());
        Ok(())
    }

    fn sync(&mut self) -> Result<(), Chip8Error> {
        self.syncs += 1;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.sync_limit.map_or(true, |limit| self.syncs < limit)
    }
}
