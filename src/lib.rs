// src/lib.rs
pub mod config;
pub mod errors;
pub mod score;
pub mod models;
pub mod providers;
pub mod retry;
pub mod controller;
pub mod banner;
pub mod api;
