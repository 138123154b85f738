//! Playback controller and client data layer for the CineStream web app.

pub mod config;
pub mod constants;
pub mod models;
pub mod player;
pub mod services;
pub mod ui;
pub mod utils;

#[cfg(test)]
mod test_utils;

pub use config::Config;
pub use player::{PlayerController, PlayerHandle, PlayerSnapshot};
pub use utils::{PlayerError, PlayerResult};
