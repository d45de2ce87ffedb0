//! Instruction handlers

pub mod admin;
pub mod player;
pub mod game;

pub use admin::*;
pub use player::*;
pub use game::*;
