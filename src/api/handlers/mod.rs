// src/api/handlers/mod.rs
mod health;
mod evaluate;
pub mod ws;

pub use health::health_check;
pub use evaluate::{get_state, update_input, run_evaluation, score};
pub use ws::ws_handler;
