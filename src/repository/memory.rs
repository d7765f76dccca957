// src/repository/memory.rs

use std::cell::RefCell;
use std::collections::BTreeMap;

use validator::Validate;

use super::{ConfigRepository, QuestionRepository, ScoreRepository, UserRepository};
use crate::error::AppError;
use crate::models::{
    question::QuestionBank, quiz_config::QuizConfig, score::ScoreHistory, user::Users,
};

/// Volatile backend with the same policies as the JSON one.
/// Single-threaded, like the rest of the core.
#[derive(Debug, Default)]
pub struct MemoryStore {
    config: RefCell<Option<QuizConfig>>,
    banks: RefCell<BTreeMap<String, QuestionBank>>,
    users: RefCell<Option<Users>>,
    history: RefCell<Option<ScoreHistory>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: QuizConfig) -> Self {
        let store = Self::default();
        *store.config.borrow_mut() = Some(config);
        store
    }
}

impl ConfigRepository for MemoryStore {
    fn load_config(&self) -> Result<QuizConfig, AppError> {
        Ok(self
            .config
            .borrow_mut()
            .get_or_insert_with(QuizConfig::default)
            .clone())
    }

    fn save_config(&self, config: &QuizConfig) -> Result<(), AppError> {
        config.validate()?;
        *self.config.borrow_mut() = Some(config.clone());
        Ok(())
    }
}

impl QuestionRepository for MemoryStore {
    fn load_bank(&self, topic: &str) -> Result<QuestionBank, AppError> {
        self.banks
            .borrow()
            .get(topic)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("No question bank for topic '{}'", topic)))
    }

    fn load_bank_or_create(&self, topic: &str) -> Result<QuestionBank, AppError> {
        Ok(self.banks.borrow().get(topic).cloned().unwrap_or_default())
    }

    fn save_bank(&self, topic: &str, bank: &QuestionBank) -> Result<(), AppError> {
        self.banks
            .borrow_mut()
            .insert(topic.to_string(), bank.clone());
        Ok(())
    }
}

impl UserRepository for MemoryStore {
    fn load_users(&self) -> Result<Users, AppError> {
        Ok(self.users.borrow_mut().get_or_insert_with(Users::new).clone())
    }

    fn save_users(&self, users: &Users) -> Result<(), AppError> {
        *self.users.borrow_mut() = Some(users.clone());
        Ok(())
    }
}

impl ScoreRepository for MemoryStore {
    fn load_history(&self) -> Result<ScoreHistory, AppError> {
        Ok(self
            .history
            .borrow_mut()
            .get_or_insert_with(ScoreHistory::new)
            .clone())
    }

    fn save_history(&self, history: &ScoreHistory) -> Result<(), AppError> {
        *self.history.borrow_mut() = Some(history.clone());
        Ok(())
    }
}
