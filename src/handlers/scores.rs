// src/handlers/scores.rs

use chrono::Local;

use crate::{
    error::AppError,
    models::{
        score::{
            Analytics, LeaderboardEntry, LeaderboardScope, ProgressPoint, ScoreRecord,
            TopicHistory, append_record, progression, rank, summarize,
        },
        user::AuthenticatedUser,
    },
    state::AppState,
};

/// Appends a score to the user's history for `topic` and persists the whole history.
/// Earlier records are never touched.
pub fn record_score(
    state: &AppState,
    username: &str,
    topic: &str,
    score: u32,
    total: u32,
) -> Result<(), AppError> {
    state.config.require_topic(topic)?;
    let record = ScoreRecord::new(Local::now().naive_local(), score, total)?;

    let mut history = state.store.load_history()?;
    append_record(&mut history, username, topic, record);
    state.store.save_history(&history).map_err(|e| {
        tracing::error!("Failed to save score for '{}': {}", username, e);
        e
    })?;

    tracing::info!("Recorded {}/{} for '{}' on '{}'", score, total, username, topic);
    Ok(())
}

/// Best-score leaderboard, highest percentage first.
///
/// `"ALL"` ranks users by the sum of their per-topic bests; any other value
/// must be a configured topic and ranks by the single best record.
pub fn leaderboard(state: &AppState, topic: &str) -> Result<Vec<LeaderboardEntry>, AppError> {
    let scope = LeaderboardScope::from(topic);
    if let LeaderboardScope::Topic(name) = &scope {
        state.config.require_topic(name)?;
    }

    let history = state.store.load_history()?;
    Ok(rank(&history, &scope))
}

/// Participation counters across users and configured topics.
/// Admin only.
pub fn analytics(state: &AppState, actor: &AuthenticatedUser) -> Result<Analytics, AppError> {
    actor.require_admin()?;

    let users = state.store.load_users()?;
    let history = state.store.load_history()?;
    Ok(summarize(users.len(), &state.config.topics, &history))
}

/// One user's records, per topic, in insertion order. Empty if they never played.
pub fn user_score_history(state: &AppState, username: &str) -> Result<TopicHistory, AppError> {
    let mut history = state.store.load_history()?;
    Ok(history.remove(username).unwrap_or_default())
}

/// One user's percentages over time across all topics.
pub fn user_progress(state: &AppState, username: &str) -> Result<Vec<ProgressPoint>, AppError> {
    let topics = user_score_history(state, username)?;
    Ok(progression(&topics))
}
