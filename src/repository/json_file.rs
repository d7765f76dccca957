// src/repository/json_file.rs

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Serialize, de::DeserializeOwned};
use validator::Validate;

use super::{ConfigRepository, QuestionRepository, ScoreRepository, UserRepository};
use crate::error::AppError;
use crate::models::{
    is_valid_name,
    question::QuestionBank,
    quiz_config::QuizConfig,
    score::{ScoreHistory, check_history},
    user::{Users, check_users},
};

/// Flat JSON files under one data directory:
///
/// * `config/config.json`
/// * `data/<topic>.json`
/// * `users/users.json`
/// * `result/scores.json`
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join("config").join("config.json")
    }

    pub fn bank_path(&self, topic: &str) -> PathBuf {
        self.root.join("data").join(format!("{}.json", topic))
    }

    pub fn users_path(&self) -> PathBuf {
        self.root.join("users").join("users.json")
    }

    pub fn scores_path(&self) -> PathBuf {
        self.root.join("result").join("scores.json")
    }

    fn checked_bank_path(&self, topic: &str) -> Result<PathBuf, AppError> {
        if !is_valid_name(topic) {
            return Err(AppError::validation(
                "topic",
                format!("'{}' may only contain letters, digits, '_' and '-'", topic),
            ));
        }
        Ok(self.bank_path(topic))
    }
}

/// Reads and parses a resource. `Ok(None)` when the file does not exist.
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, AppError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            tracing::error!("Failed to read {}: {:?}", path.display(), e);
            return Err(AppError::io(path.display().to_string(), e.to_string()));
        }
    };

    serde_json::from_str(&content).map(Some).map_err(|e| {
        tracing::error!("Invalid JSON format in {}: {}", path.display(), e);
        AppError::format(path.display().to_string(), e.to_string())
    })
}

/// Overwrites a resource with the full value, creating parent directories.
fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), AppError> {
    let io_err = |e: std::io::Error| {
        tracing::error!("Failed to save {}: {:?}", path.display(), e);
        AppError::io(path.display().to_string(), e.to_string())
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let body = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    fs::write(path, body).map_err(io_err)?;

    tracing::debug!("Saved {}", path.display());
    Ok(())
}

/// Loads a resource, first writing `T::default()` if it is missing.
fn load_or_create<T>(path: &Path) -> Result<T, AppError>
where
    T: DeserializeOwned + Serialize + Default,
{
    match read_json(path)? {
        Some(value) => Ok(value),
        None => {
            tracing::info!("Creating {} with defaults", path.display());
            let value = T::default();
            write_json(path, &value)?;
            Ok(value)
        }
    }
}

fn check_bank(path: &Path, bank: &QuestionBank) -> Result<(), AppError> {
    for (id, question) in bank {
        question.check().map_err(|e| {
            tracing::error!("Corrupt question {} in {}: {}", id, path.display(), e);
            AppError::format(path.display().to_string(), format!("question {}: {}", id, e))
        })?;
    }
    Ok(())
}

impl ConfigRepository for JsonFileStore {
    fn load_config(&self) -> Result<QuizConfig, AppError> {
        let path = self.config_path();
        let config: QuizConfig = load_or_create(&path)?;
        config.validate().map_err(|e| {
            let e = AppError::from(e);
            tracing::error!("Invalid configuration in {}: {}", path.display(), e);
            AppError::format(path.display().to_string(), e.to_string())
        })?;
        Ok(config)
    }

    fn save_config(&self, config: &QuizConfig) -> Result<(), AppError> {
        config.validate()?;
        write_json(&self.config_path(), config)
    }
}

impl QuestionRepository for JsonFileStore {
    fn load_bank(&self, topic: &str) -> Result<QuestionBank, AppError> {
        let path = self.checked_bank_path(topic)?;
        let bank: QuestionBank = read_json(&path)?
            .ok_or_else(|| AppError::NotFound(format!("No question bank for topic '{}'", topic)))?;
        check_bank(&path, &bank)?;
        Ok(bank)
    }

    fn load_bank_or_create(&self, topic: &str) -> Result<QuestionBank, AppError> {
        let path = self.checked_bank_path(topic)?;
        let bank: QuestionBank = read_json(&path)?.unwrap_or_default();
        check_bank(&path, &bank)?;
        Ok(bank)
    }

    fn save_bank(&self, topic: &str, bank: &QuestionBank) -> Result<(), AppError> {
        let path = self.checked_bank_path(topic)?;
        write_json(&path, bank)
    }
}

impl UserRepository for JsonFileStore {
    fn load_users(&self) -> Result<Users, AppError> {
        let path = self.users_path();
        let users: Users = load_or_create(&path)?;
        check_users(&users).map_err(|reason| {
            tracing::error!("Invalid users data in {}: {}", path.display(), reason);
            AppError::format(path.display().to_string(), reason)
        })?;
        Ok(users)
    }

    fn save_users(&self, users: &Users) -> Result<(), AppError> {
        write_json(&self.users_path(), users)
    }
}

impl ScoreRepository for JsonFileStore {
    fn load_history(&self) -> Result<ScoreHistory, AppError> {
        let path = self.scores_path();
        let history: ScoreHistory = load_or_create(&path)?;
        check_history(&history).map_err(|reason| {
            tracing::error!("Invalid score history in {}: {}", path.display(), reason);
            AppError::format(path.display().to_string(), reason)
        })?;
        Ok(history)
    }

    fn save_history(&self, history: &ScoreHistory) -> Result<(), AppError> {
        write_json(&self.scores_path(), history)
    }
}
