use crate::{Game, GameConfig, GameLoop, Renderer, WebRenderer};
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

const CONTAINER_ID: &str = "container";
const SCORE_ID: &str = "score";

/// Forwards `log` records to the browser console.
struct ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Info
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = JsValue::from_str(&format!("[{}] {}", record.level(), record.args()));
        match record.level() {
            Level::Error => web_sys::console::error_1(&line),
            Level::Warn => web_sys::console::warn_1(&line),
            _ => web_sys::console::log_1(&line),
        }
    }

    fn flush(&self) {}
}

static LOGGER: ConsoleLogger = ConsoleLogger;

fn create_game_loop() -> Result<GameLoop<WebRenderer>, JsValue> {
    let config = GameConfig::default();
    let game = Game::new(config);

    let mut renderer = WebRenderer::new(CONTAINER_ID, SCORE_ID, config.map_size)?;
    renderer.init().map_err(|e| JsValue::from_str(&e.to_string()))?;

    let window = web_sys::window().ok_or("no window")?;
    let performance = window.performance().ok_or("no performance")?;

    let mut game_loop = GameLoop::new(game, renderer, performance.now());
    game_loop
        .refresh_score()
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    Ok(game_loop)
}

#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    // Set panic hook for better error messages
    console_error_panic_hook::set_once();
    // A second call (e.g. a page re-running the module) keeps the first logger
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Info);
    }

    log::info!("starting snake");

    let game_loop = match create_game_loop() {
        Ok(gl) => Rc::new(RefCell::new(gl)),
        Err(e) => {
            web_sys::console::error_1(&format!("failed to start snake: {:?}", e).into());
            return Err(e);
        }
    };

    let window = web_sys::window().ok_or("no window")?;

    // Create closure for animation frame; it reschedules itself forever
    let f: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();

    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |now: f64| {
        if let Err(e) = game_loop.borrow_mut().frame(now) {
            log::error!("frame failed: {}", e);
            return; // Stop loop on error
        }

        let scheduled = web_sys::window().and_then(|window| {
            let callback = f.borrow();
            let callback = callback.as_ref()?;
            window
                .request_animation_frame(callback.as_ref().unchecked_ref())
                .ok()
        });
        if scheduled.is_none() {
            log::error!("could not schedule the next frame");
        }
    }) as Box<dyn FnMut(f64)>));

    // Start the loop
    if let Some(callback) = g.borrow().as_ref() {
        window.request_animation_frame(callback.as_ref().unchecked_ref())?;
    }

    log::info!("game loop started");

    Ok(())
}
