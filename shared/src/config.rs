use std::time::Duration;

pub const DEFAULT_ROWS: usize = 60;
pub const DEFAULT_COLUMNS: usize = 140;
pub const DEFAULT_CELL_SIZE: f32 = 20.0;
pub const DEFAULT_TICKS_PER_SECOND: u32 = 5;
pub const DEFAULT_WINDOW_SCALE: f64 = 0.8;
pub const DEFAULT_TITLE: &str = "Conway's Game of Life";
/// Used when the platform does not report a primary monitor.
pub const FALLBACK_WINDOW_SIZE: (u32, u32) = (1280, 720);

/// Compiled-in settings for the simulation and the window around it.
#[derive(Debug, Clone, PartialEq)]
pub struct LifeConfig {
    pub rows: usize,
    pub columns: usize,
    /// Edge length of one cell in physical pixels. Fixed for the process lifetime.
    pub cell_size: f32,
    pub ticks_per_second: u32,
    /// Fraction of the monitor resolution the window opens at.
    pub window_scale: f64,
    pub title: String,
    pub fallback_window_size: (u32, u32),
}

impl Default for LifeConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            columns: DEFAULT_COLUMNS,
            cell_size: DEFAULT_CELL_SIZE,
            ticks_per_second: DEFAULT_TICKS_PER_SECOND,
            window_scale: DEFAULT_WINDOW_SCALE,
            title: DEFAULT_TITLE.to_string(),
            fallback_window_size: FALLBACK_WINDOW_SIZE,
        }
    }
}

impl LifeConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(1) / self.ticks_per_second.max(1)
    }

    /// Initial window size for a monitor of the given resolution.
    pub fn window_size_for(&self, monitor: Option<(u32, u32)>) -> (u32, u32) {
        match monitor {
            Some((width, height)) if width > 0 && height > 0 => (
                ((width as f64 * self.window_scale) as u32).max(1),
                ((height as f64 * self.window_scale) as u32).max(1),
            ),
            _ => self.fallback_window_size,
        }
    }
}
