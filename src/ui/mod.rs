//! Terminal UI: the game screen, with drop animations and a stats panel.

pub mod animation;
mod app;
pub mod game_view;

pub use app::App;
