use wasm_bindgen::prelude::*;
use dash_engine::*;

pub mod enemy;
pub mod error;
pub mod game;
pub mod player;
pub mod stage;
pub mod world;

pub use error::ConfigError;
pub use game::BrickDash;

dash_web::export_game!(BrickDash, "brick-dash", levels);
