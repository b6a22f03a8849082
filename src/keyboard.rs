use minifb::Key;

pub const KEY_COUNT: usize = 16;

/// Instantaneous pressed/released state of the 16 logical keys, refreshed
/// before every instruction.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Keyboard {
    keys: [bool; KEY_COUNT],
}

impl Keyboard {
    pub fn new() -> Self {
        Self {
            keys: [false; KEY_COUNT],
        }
    }

    pub fn latch(&mut self, keys: [bool; KEY_COUNT]) {
        self.keys = keys;
    }

    // values past 0xF name no key
    pub fn get_key_status_from_num(&self, n: u8) -> bool {
        self.keys.get(n as usize).copied().unwrap_or(false)
    }

    /// Highest-numbered key currently held, if any.
    pub fn highest_pressed(&self) -> Option<u8> {
        self.keys.iter().rposition(|&down| down).map(|k| k as u8)
    }
}

// 1 2 3 4      1 2 3 C
// Q W E R  ->  4 5 6 D
// A S D F      7 8 9 E
// Z X C V      A 0 B F
pub fn key_to_num(key: Key) -> Option<u8> {
    match key {
        Key::Key1 => Some(0x1),
        Key::Key2 => Some(0x2),
        Key::Key3 => Some(0x3),
        Key::Key4 => Some(0xC),
        Key::Q => Some(0x4),
        Key::W => Some(0x5),
        Key::E => Some(0x6),
        Key::R => Some(0xD),
        Key::A => Some(0x7),
        Key::S => Some(0x8),
        Key::D => Some(0x9),
        Key::F => Some(0xE),
        Key::Z => Some(0xA),
        Key::X => Some(0x0),
        Key::C => Some(0xB),
        Key::V => Some(0xF),
        _ => None,
    }
}

/// Folds a set of physical keys into the logical latch layout.
pub fn keys_to_latch(keys: &[Key]) -> [bool; KEY_COUNT] {
    let mut latch = [false; KEY_COUNT];
    for n in keys.iter().copied().filter_map(key_to_num) {
        latch[n as usize] = true;
    }
    latch
}
