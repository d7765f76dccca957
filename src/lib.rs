// src/lib.rs

pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod state;
pub mod utils;

pub use error::AppError;
pub use state::AppState;
