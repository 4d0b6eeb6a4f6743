use crate::entity::Direction;

/// Minimum travel in pixels for a touch to count as a swipe.
pub const SWIPE_THRESHOLD: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Direction(Direction),
    Restart,
    Quit, // Terminal only; the browser loop never exits
}

impl Input {
    /// Maps a host key identifier (as in `KeyboardEvent.key`) to an input.
    /// Each direction has an arrow key and a letter on the w/a/r/s cluster.
    pub fn from_key(key: &str) -> Option<Input> {
        match key {
            "ArrowDown" | "r" => Some(Input::Direction(Direction::Down)),
            "ArrowUp" | "w" => Some(Input::Direction(Direction::Up)),
            "ArrowLeft" | "a" => Some(Input::Direction(Direction::Left)),
            "ArrowRight" | "s" => Some(Input::Direction(Direction::Right)),
            " " | "Space" => Some(Input::Restart),
            _ => None,
        }
    }

    /// Maps a finished touch, given its travel in pixels. A swipe steers along
    /// its dominant axis; anything shorter is a tap, which asks for a restart.
    pub fn from_touch(dx: f64, dy: f64) -> Input {
        let (abs_dx, abs_dy) = (dx.abs(), dy.abs());
        if abs_dx <= SWIPE_THRESHOLD && abs_dy <= SWIPE_THRESHOLD {
            return Input::Restart;
        }

        let direction = if abs_dx > abs_dy {
            if dx > 0.0 { Direction::Right } else { Direction::Left }
        } else if dy > 0.0 {
            Direction::Down
        } else {
            Direction::Up
        };
        Input::Direction(direction)
    }
}
