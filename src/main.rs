use crossterm::event;
use log::info;
use simplelog::{Config, LevelFilter, WriteLogger};
use snake::{CliRenderer, Flow, Game, GameConfig, GameLoop, Renderer};
use std::fs::File;
use std::io;
use std::time::{Duration, Instant};

// How long to wait for a key before running a frame anyway (~60 frames/sec)
const FRAME_TIME: Duration = Duration::from_millis(16);

const LOG_FILE: &str = "snake.log";

fn main() -> io::Result<()> {
    // The terminal is in raw mode while playing, so logs go to a file
    WriteLogger::init(LevelFilter::Info, Config::default(), File::create(LOG_FILE)?)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    let config = GameConfig::default();
    let game = Game::new(config);
    let mut renderer = CliRenderer::new(config.map_size);

    renderer.init()?;
    info!("starting on a {0}x{0} board at {1} ticks/sec", config.map_size, config.speed);

    let start = Instant::now();
    let mut game_loop = GameLoop::new(game, renderer, 0.0);
    game_loop.refresh_score()?;

    loop {
        // Wake early on input so key presses are applied promptly
        event::poll(FRAME_TIME)?;

        let now = start.elapsed().as_secs_f64() * 1000.0;
        if game_loop.frame(now)? == Flow::Quit {
            break;
        }
    }

    info!("quit with score {}", game_loop.game.score());
    game_loop.renderer.cleanup()?;
    Ok(())
}
