// src/repository/mod.rs

//! Storage gateway interfaces, one per entity type.
//!
//! Handlers only talk to these traits, so the flat-file backend can be
//! replaced (the in-memory one is used by tests) without touching them.
//! Every save is a full-content overwrite of the resource.

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use crate::error::AppError;
use crate::models::{
    question::QuestionBank, quiz_config::QuizConfig, score::ScoreHistory, user::Users,
};

pub trait ConfigRepository {
    /// Creates the resource with defaults when it is absent.
    fn load_config(&self) -> Result<QuizConfig, AppError>;
    fn save_config(&self, config: &QuizConfig) -> Result<(), AppError>;
}

pub trait QuestionRepository {
    /// Fails with `NotFound` when the topic has no bank yet.
    fn load_bank(&self, topic: &str) -> Result<QuestionBank, AppError>;
    /// An empty in-memory bank when the topic has none yet. Nothing is
    /// written until `save_bank`.
    fn load_bank_or_create(&self, topic: &str) -> Result<QuestionBank, AppError>;
    fn save_bank(&self, topic: &str, bank: &QuestionBank) -> Result<(), AppError>;
}

pub trait UserRepository {
    /// Creates an empty users resource when it is absent.
    fn load_users(&self) -> Result<Users, AppError>;
    fn save_users(&self, users: &Users) -> Result<(), AppError>;
}

pub trait ScoreRepository {
    /// Creates an empty history when it is absent.
    fn load_history(&self) -> Result<ScoreHistory, AppError>;
    fn save_history(&self, history: &ScoreHistory) -> Result<(), AppError>;
}

/// Everything a backend has to provide.
pub trait Store: ConfigRepository + QuestionRepository + UserRepository + ScoreRepository {}

impl<T> Store for T where T: ConfigRepository + QuestionRepository + UserRepository + ScoreRepository {}
