// src/state.rs

use crate::{
    config::Settings, error::AppError, handlers::config::load_config, models::quiz_config::QuizConfig,
    repository::{JsonFileStore, Store},
};

/// Everything an operation needs: the run's config and the injected store.
pub struct AppState {
    pub config: QuizConfig,
    pub store: Box<dyn Store>,
}

impl AppState {
    /// Loads the config from `store` once; it stays fixed for the run.
    pub fn new(store: impl Store + 'static) -> Result<Self, AppError> {
        let config = load_config(&store)?;
        Ok(Self {
            config,
            store: Box::new(store),
        })
    }

    /// File-backed state rooted at the configured data directory.
    pub fn open(settings: &Settings) -> Result<Self, AppError> {
        Self::new(JsonFileStore::new(&settings.data_dir))
    }
}
