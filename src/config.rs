use std::time::Duration;

pub const DEFAULT_BATCH_SIZE: usize = 10;
pub const DEFAULT_BATCH_PAUSE_MS: u64 = 5;
pub const DEFAULT_PIXEL_SCALE: usize = 10;

/// Tunables for the run loop and the window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Instructions executed per timer tick.
    pub batch_size: usize,
    /// Sleep after each batch; bounds the loop rate.
    pub batch_pause: Duration,
    /// Window pixels per low-res cell; the window rounds this down to an
    /// even number, at least 2.
    pub pixel_scale: usize,
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            batch_pause: Duration::from_millis(DEFAULT_BATCH_PAUSE_MS),
            pixel_scale: DEFAULT_PIXEL_SCALE,
            seed: None,
        }
    }
}
