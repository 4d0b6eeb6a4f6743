use crate::entity::Point;
use crate::game::Game;
use crate::input::Input;
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    White,
    Black,
    Red,
    DarkRed,
    Yellow,
    LightGreen,
}

impl Color {
    pub fn css(&self) -> &'static str {
        match self {
            Color::White => "white",
            Color::Black => "black",
            Color::Red => "red",
            Color::DarkRed => "darkred",
            Color::Yellow => "yellow",
            Color::LightGreen => "lightgreen",
        }
    }
}

const BACKGROUND: Color = Color::White;
const OUTLINE: Color = Color::Black;
const FOOD: Color = Color::Red;

/// Head and body colours for one game state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnakePalette {
    pub head: Color,
    pub body: Color,
}

pub const ALIVE_PALETTE: SnakePalette = SnakePalette {
    head: Color::Yellow,
    body: Color::LightGreen,
};

pub const DEAD_PALETTE: SnakePalette = SnakePalette {
    head: Color::Red,
    body: Color::DarkRed,
};

/// Drawing primitives a backend has to provide, in grid coordinates.
pub trait Surface {
    /// Wipe the whole board and draw its outline.
    fn clear(&mut self, background: Color, border: Color) -> io::Result<()>;

    fn draw_square(&mut self, cell: Point, fill: Color, stroke: Color) -> io::Result<()>;

    fn draw_circle(&mut self, cell: Point, fill: Color, stroke: Color) -> io::Result<()>;
}

/// Projects the game onto a surface: board, then food, then the snake.
pub fn draw_frame(game: &Game, surface: &mut impl Surface) -> io::Result<()> {
    surface.clear(BACKGROUND, OUTLINE)?;
    surface.draw_circle(game.food, FOOD, OUTLINE)?;

    let palette = if game.is_alive() {
        ALIVE_PALETTE
    } else {
        DEAD_PALETTE
    };

    surface.draw_square(game.head(), palette.head, OUTLINE)?;
    for &segment in game.snake.iter().skip(1) {
        surface.draw_square(segment, palette.body, OUTLINE)?;
    }

    Ok(())
}

pub fn score_text(score: u32) -> String {
    format!("Score: {}", score)
}

/// Trait that abstracts rendering implementation.
/// This allows for different rendering backends (CLI, Web, etc.)
pub trait Renderer {
    /// Initialize the renderer
    fn init(&mut self) -> io::Result<()>;

    /// Render the current game state
    fn render(&mut self, game: &Game) -> io::Result<()>;

    /// Show the score next to the board
    fn update_score_text(&mut self, score: u32) -> io::Result<()>;

    /// Clean up and restore terminal/display state
    fn cleanup(&mut self) -> io::Result<()>;

    /// Take the oldest input the user produced since the last call
    fn poll_input(&mut self) -> io::Result<Option<Input>>;
}
