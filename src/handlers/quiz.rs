// src/handlers/quiz.rs

use super::scores::record_score;
use crate::{
    error::AppError,
    models::{
        session::{AnswerOutcome, QuizSession, SessionResult},
        user::AuthenticatedUser,
    },
    state::AppState,
};

/// Starts a quiz over every question of `topic`, in a fresh random order.
///
/// Fails with `NoQuestions` when the topic has no bank or an empty one.
pub fn begin_session(state: &AppState, topic: &str) -> Result<QuizSession, AppError> {
    state.config.require_topic(topic)?;

    let bank = match state.store.load_bank(topic) {
        Ok(bank) => bank,
        Err(AppError::NotFound(_)) => return Err(AppError::NoQuestions(topic.to_string())),
        Err(e) => return Err(e),
    };

    let session = QuizSession::shuffled(topic, bank, &mut rand::thread_rng())?;
    tracing::debug!("Started '{}' quiz with {} questions", topic, session.total());
    Ok(session)
}

/// Scores one answer. Comparison is by option key.
pub fn submit_answer(
    session: &mut QuizSession,
    question_index: usize,
    chosen_key: &str,
) -> Result<AnswerOutcome, AppError> {
    session.answer(question_index, chosen_key)
}

/// Appends the session's result to the player's score history, then ends it.
///
/// If the score cannot be saved the session stays open and the call can be
/// retried.
pub fn finish_session(
    state: &AppState,
    player: &AuthenticatedUser,
    session: &mut QuizSession,
) -> Result<SessionResult, AppError> {
    let result = session.result()?;
    record_score(state, &player.username, &result.topic, result.score, result.total)?;
    session.finish()?;

    tracing::info!(
        "'{}' finished '{}' with {}/{}",
        player.username,
        result.topic,
        result.score,
        result.total
    );
    Ok(result)
}
