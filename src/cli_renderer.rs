use crate::entity::Point;
use crate::game::Game;
use crate::input::Input;
use crate::renderer::{self, Color, Renderer, Surface};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{self, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use std::collections::VecDeque;
use std::io::{self, Write};
use std::time::Duration;

/// Terminal backend. Each grid cell is two columns wide and the board sits
/// inside a one-cell frame, so cell (x, y) starts at column `1 + 2x`, row `1 + y`.
pub struct CliRenderer {
    map_size: i32,
    pending_input: VecDeque<Input>,
}

impl CliRenderer {
    pub fn new(map_size: i32) -> Self {
        Self {
            map_size,
            pending_input: VecDeque::new(),
        }
    }

    /// Columns and rows needed for the board, its frame and two text lines.
    pub fn required_size(map_size: i32) -> (u16, u16) {
        ((map_size * 2 + 2) as u16, (map_size + 4) as u16)
    }

    fn cell_origin(cell: Point) -> (u16, u16) {
        ((1 + cell.x * 2) as u16, (1 + cell.y) as u16)
    }

    fn score_row(&self) -> u16 {
        (self.map_size + 2) as u16
    }

    fn draw_status(&self, alive: bool, stdout: &mut io::Stdout) -> io::Result<()> {
        let (text, color) = if !alive {
            ("GAME OVER! Press SPACE to restart, ESC to quit", style::Color::Red)
        } else {
            ("Arrows or W/A/R/S to steer | ESC to quit", style::Color::Reset)
        };

        queue!(
            stdout,
            cursor::MoveTo(0, self.score_row() + 1),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(color),
            Print(text),
            ResetColor
        )
    }
}

fn term_color(color: Color) -> style::Color {
    match color {
        Color::White => style::Color::White,
        Color::Black => style::Color::Black,
        Color::Red => style::Color::Red,
        Color::DarkRed => style::Color::DarkRed,
        Color::Yellow => style::Color::Yellow,
        Color::LightGreen => style::Color::Green,
    }
}

/// Translates a terminal key into the identifier a browser would report.
fn key_name(code: KeyCode) -> Option<String> {
    match code {
        KeyCode::Up => Some("ArrowUp".to_string()),
        KeyCode::Down => Some("ArrowDown".to_string()),
        KeyCode::Left => Some("ArrowLeft".to_string()),
        KeyCode::Right => Some("ArrowRight".to_string()),
        KeyCode::Char(c) => Some(c.to_string()),
        _ => None,
    }
}

fn map_key(key: KeyEvent) -> Option<Input> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Esc => Some(Input::Quit),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Input::Quit),
        code => key_name(code).and_then(|name| Input::from_key(&name)),
    }
}

// Outlines are not drawn: a terminal cell has no room for them.
impl Surface for CliRenderer {
    fn clear(&mut self, background: Color, border: Color) -> io::Result<()> {
        let mut stdout = io::stdout();
        let inner = (self.map_size * 2) as usize;
        let full = " ".repeat(inner + 2);

        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetBackgroundColor(term_color(border)),
            Print(&full)
        )?;
        for row in 0..self.map_size {
            queue!(
                stdout,
                cursor::MoveTo(0, (row + 1) as u16),
                SetBackgroundColor(term_color(border)),
                Print(" "),
                SetBackgroundColor(term_color(background)),
                Print(" ".repeat(inner)),
                SetBackgroundColor(term_color(border)),
                Print(" ")
            )?;
        }
        queue!(
            stdout,
            cursor::MoveTo(0, (self.map_size + 1) as u16),
            SetBackgroundColor(term_color(border)),
            Print(&full),
            ResetColor
        )?;
        Ok(())
    }

    fn draw_square(&mut self, cell: Point, fill: Color, _stroke: Color) -> io::Result<()> {
        let (col, row) = Self::cell_origin(cell);
        let mut stdout = io::stdout();
        queue!(
            stdout,
            cursor::MoveTo(col, row),
            SetBackgroundColor(term_color(fill)),
            Print("  "),
            ResetColor
        )
    }

    fn draw_circle(&mut self, cell: Point, fill: Color, _stroke: Color) -> io::Result<()> {
        let (col, row) = Self::cell_origin(cell);
        let mut stdout = io::stdout();
        queue!(
            stdout,
            cursor::MoveTo(col, row),
            SetBackgroundColor(style::Color::White),
            SetForegroundColor(term_color(fill)),
            Print("()"),
            ResetColor
        )
    }
}

impl Renderer for CliRenderer {
    fn init(&mut self) -> io::Result<()> {
        let (need_cols, need_rows) = Self::required_size(self.map_size);
        let (cols, rows) = terminal::size()?;
        if cols < need_cols || rows < need_rows {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                format!(
                    "terminal is {}x{}, the board needs at least {}x{}",
                    cols, rows, need_cols, need_rows
                ),
            ));
        }

        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            terminal::Clear(ClearType::All),
            cursor::Hide
        )?;
        Ok(())
    }

    fn render(&mut self, game: &Game) -> io::Result<()> {
        renderer::draw_frame(game, self)?;

        let mut stdout = io::stdout();
        self.draw_status(game.is_alive(), &mut stdout)?;
        stdout.flush()
    }

    fn update_score_text(&mut self, score: u32) -> io::Result<()> {
        let mut stdout = io::stdout();
        queue!(
            stdout,
            cursor::MoveTo(0, self.score_row()),
            terminal::Clear(ClearType::CurrentLine),
            ResetColor,
            Print(renderer::score_text(score))
        )?;
        stdout.flush()
    }

    fn cleanup(&mut self) -> io::Result<()> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            cursor::Show,
            terminal::LeaveAlternateScreen,
            ResetColor
        )?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    fn poll_input(&mut self) -> io::Result<Option<Input>> {
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                if let Some(input) = map_key(key) {
                    self.pending_input.push_back(input);
                }
            }
        }
        Ok(self.pending_input.pop_front())
    }
}

impl Drop for CliRenderer {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
