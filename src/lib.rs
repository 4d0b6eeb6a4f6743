pub mod config;
pub mod entity;
pub mod game;
pub mod game_loop;
pub mod input;
pub mod renderer;

#[cfg(not(target_arch = "wasm32"))]
pub mod cli_renderer;

#[cfg(target_arch = "wasm32")]
pub mod web_main;
#[cfg(target_arch = "wasm32")]
pub mod web_renderer;

pub use config::GameConfig;
pub use entity::{Direction, Point};
pub use game::{Game, GameState, TickOutcome};
pub use game_loop::{Flow, GameLoop};
pub use input::Input;
pub use renderer::{draw_frame, Color, Renderer, Surface};

#[cfg(not(target_arch = "wasm32"))]
pub use cli_renderer::CliRenderer;

#[cfg(target_arch = "wasm32")]
pub use web_renderer::WebRenderer;
