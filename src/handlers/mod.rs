// src/handlers/mod.rs

pub mod admin;
pub mod auth;
pub mod bank;
pub mod config;
pub mod quiz;
pub mod scores;
