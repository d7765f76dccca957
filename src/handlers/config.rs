// src/handlers/config.rs

use crate::{
    error::AppError, models::quiz_config::QuizConfig, repository::ConfigRepository,
    state::AppState,
};

/// Loads the quiz configuration, creating a default one on first run.
pub fn load_config(store: &dyn ConfigRepository) -> Result<QuizConfig, AppError> {
    let config = store.load_config()?;
    tracing::info!(
        "Loaded config: {} topics, {} questions per topic",
        config.topics.len(),
        config.questions_per_topic
    );
    Ok(config)
}

/// Topic names in configuration order.
pub fn list_topics(state: &AppState) -> Vec<String> {
    state.config.topics.clone()
}
