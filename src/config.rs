// src/config.rs

use std::env;
use std::path::PathBuf;

use dotenvy::dotenv;

/// Default cap written into a freshly created config resource.
pub const DEFAULT_QUESTIONS_PER_TOPIC: u32 = 10;

/// Scope name selecting the aggregate leaderboard.
pub const ALL_TOPICS: &str = "ALL";

/// Process-level settings, read once from the environment.
#[derive(Debug, Clone)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub log_dir: PathBuf,
    pub rust_log: String,
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
}

impl Settings {
    pub fn from_env() -> Self {
        dotenv().ok();

        let data_dir = env::var("QUIZ_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."));

        let log_dir = env::var("QUIZ_LOG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("logs"));

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let admin_username = env::var("ADMIN_USERNAME").ok().filter(|s| !s.is_empty());
        let admin_password = env::var("ADMIN_PASSWORD").ok().filter(|s| !s.is_empty());

        Self {
            data_dir,
            log_dir,
            rust_log,
            admin_username,
            admin_password,
        }
    }
}
