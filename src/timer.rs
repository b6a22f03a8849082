/// A countdown register aged by the driver once per instruction batch.
/// 16 bits wide, floors at zero.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    pub count: u16,
}

impl Timer {
    pub fn set(&mut self, value: u16) {
        self.count = value;
    }

    pub fn get(&self) -> u16 {
        self.count
    }

    pub fn tick(&mut self) {
        self.count = self.count.saturating_sub(1);
    }
}
