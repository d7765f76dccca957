// src/handlers/bank.rs

use uuid::Uuid;

use crate::{
    error::AppError,
    models::{
        question::{QuestionDraft, QuestionRecord},
        user::AuthenticatedUser,
    },
    state::AppState,
};

/// Adds a question to a topic's bank and returns its new id.
/// Admin only.
///
/// Rejections are checked in order: bank load failure, full bank, invalid draft.
/// The bank file is created on the first add and rewritten in full on success.
pub fn add_question(
    state: &AppState,
    actor: &AuthenticatedUser,
    topic: &str,
    draft: QuestionDraft,
) -> Result<String, AppError> {
    actor.require_admin()?;
    state.config.require_topic(topic)?;

    let mut bank = state.store.load_bank_or_create(topic)?;

    let limit = state.config.questions_per_topic;
    if bank.len() >= limit as usize {
        tracing::warn!("Rejected question for '{}': bank is full ({})", topic, limit);
        return Err(AppError::Capacity {
            topic: topic.to_string(),
            limit,
        });
    }

    let question = draft.into_question()?;

    let mut id = Uuid::new_v4().to_string();
    while bank.contains_key(&id) {
        id = Uuid::new_v4().to_string();
    }

    bank.insert(id.clone(), question);
    state.store.save_bank(topic, &bank)?;

    tracing::info!("Added question {} to '{}' ({}/{})", id, topic, bank.len(), limit);
    Ok(id)
}

/// Removes a question by id.
/// Admin only. An unknown topic or id is reported as `NotFound` and changes nothing.
pub fn delete_question(
    state: &AppState,
    actor: &AuthenticatedUser,
    topic: &str,
    question_id: &str,
) -> Result<(), AppError> {
    actor.require_admin()?;
    state.config.require_topic(topic)?;

    let mut bank = state.store.load_bank(topic)?;

    if bank.remove(question_id).is_none() {
        return Err(AppError::NotFound(format!(
            "Question ID '{}' not found in topic '{}'",
            question_id, topic
        )));
    }

    state.store.save_bank(topic, &bank)?;
    tracing::info!("Deleted question {} from '{}'", question_id, topic);
    Ok(())
}

/// All questions of a topic, ordered by id. Read-only.
/// A configured topic without a bank yet has no questions.
pub fn list_questions(state: &AppState, topic: &str) -> Result<Vec<QuestionRecord>, AppError> {
    state.config.require_topic(topic)?;

    let bank = match state.store.load_bank(topic) {
        Ok(bank) => bank,
        Err(AppError::NotFound(_)) => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };

    Ok(bank
        .into_iter()
        .map(|(id, question)| QuestionRecord { id, question })
        .collect())
}
