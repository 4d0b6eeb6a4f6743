/// Width and height of the square play field, in cells.
pub const MAP_SIZE: i32 = 30;

/// Number of segments a fresh snake starts with.
pub const SNAKE_SIZE: usize = 5;

/// Simulation ticks per second.
pub const SPEED: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    pub map_size: i32,
    pub snake_size: usize,
    pub speed: u32,
}

impl GameConfig {
    /// Milliseconds between two simulation ticks.
    pub fn tick_interval_ms(&self) -> f64 {
        1000.0 / self.speed as f64
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.map_size && y < self.map_size
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            map_size: MAP_SIZE,
            snake_size: SNAKE_SIZE,
            speed: SPEED,
        }
    }
}
