use crate::game::Game;
use crate::input::Input;
use crate::renderer::Renderer;
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Fixed-rate driver shared by the browser and terminal hosts. The host calls
/// [`GameLoop::frame`] once per display refresh with a monotonic timestamp in
/// milliseconds; simulation and drawing only happen when a full tick interval
/// has elapsed since the last tick.
pub struct GameLoop<R: Renderer> {
    pub game: Game,
    pub renderer: R,
    last_tick: f64,
    tick_interval: f64,
    shown_score: Option<u32>,
}

impl<R: Renderer> GameLoop<R> {
    pub fn new(game: Game, renderer: R, now: f64) -> Self {
        let tick_interval = game.config.tick_interval_ms();
        Self {
            game,
            renderer,
            last_tick: now,
            tick_interval,
            shown_score: None,
        }
    }

    pub fn frame(&mut self, now: f64) -> io::Result<Flow> {
        // Input is applied between ticks, never in the middle of one
        while let Some(input) = self.renderer.poll_input()? {
            if input == Input::Quit {
                return Ok(Flow::Quit);
            }
            self.game.handle_input(input);
        }

        if now - self.last_tick >= self.tick_interval {
            self.game.tick();
            self.renderer.render(&self.game)?;
            self.last_tick = now;
        }

        self.refresh_score()?;

        Ok(Flow::Continue)
    }

    /// Writes the score text if it changed since it was last shown.
    pub fn refresh_score(&mut self) -> io::Result<()> {
        let score = self.game.score();
        if self.shown_score != Some(score) {
            self.renderer.update_score_text(score)?;
            self.shown_score = Some(score);
        }
        Ok(())
    }
}
