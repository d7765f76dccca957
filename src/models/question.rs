// src/models/question.rs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::validate_not_blank;
use crate::error::AppError;

/// Canonical option keys. Options are always stored and displayed under these.
pub const OPTION_KEYS: [&str; 4] = ["1", "2", "3", "4"];

/// A question as persisted inside a topic's bank file.
/// The id is the key of the surrounding map, not a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// The text content of the question.
    pub question: String,

    /// Option key -> option text. Exactly the canonical key set.
    pub options: BTreeMap<String, String>,

    /// Key of the correct option.
    pub answer: String,
}

/// Per-topic question bank: question id -> question.
pub type QuestionBank = BTreeMap<String, Question>;

impl Question {
    /// Re-checks the invariants on data read back from storage.
    pub fn check(&self) -> Result<(), AppError> {
        QuestionDraft::from(self.clone()).validate()?;
        Ok(())
    }

    /// Options sorted by canonical key. Never shuffled.
    pub fn options_in_order(&self) -> Vec<(String, String)> {
        self.options
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn correct_text(&self) -> &str {
        self.options
            .get(&self.answer)
            .map(String::as_str)
            .unwrap_or_default()
    }
}

/// A question together with its id, as handed to listing screens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionRecord {
    pub id: String,
    #[serde(flatten)]
    pub question: Question,
}

/// DTO for presenting a question during a quiz (excludes answer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicQuestion {
    pub id: String,
    pub question: String,
    pub options: Vec<(String, String)>,
}

impl From<&QuestionRecord> for PublicQuestion {
    fn from(record: &QuestionRecord) -> Self {
        PublicQuestion {
            id: record.id.clone(),
            question: record.question.question.clone(),
            options: record.question.options_in_order(),
        }
    }
}

/// DTO for creating a new question.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct QuestionDraft {
    #[validate(
        custom(function = validate_not_blank),
        length(max = 1000, message = "Question text must be at most 1000 characters.")
    )]
    pub question: String,
    #[validate(custom(function = validate_options))]
    pub options: BTreeMap<String, String>,
    #[validate(custom(function = validate_option_key))]
    pub answer: String,
}

impl QuestionDraft {
    /// Builds a draft from the four option texts in canonical key order.
    pub fn new(question: &str, options: [&str; 4], answer: &str) -> Self {
        let options = OPTION_KEYS
            .iter()
            .zip(options)
            .map(|(key, text)| (key.to_string(), text.trim().to_string()))
            .collect();

        QuestionDraft {
            question: question.trim().to_string(),
            options,
            answer: answer.trim().to_string(),
        }
    }

    /// Validates the draft and turns it into a storable question.
    pub fn into_question(self) -> Result<Question, AppError> {
        self.validate()?;
        Ok(Question {
            question: self.question,
            options: self.options,
            answer: self.answer,
        })
    }
}

impl From<Question> for QuestionDraft {
    fn from(q: Question) -> Self {
        QuestionDraft {
            question: q.question,
            options: q.options,
            answer: q.answer,
        }
    }
}

/// Parses a key typed by a user. Anything outside the canonical set is rejected.
pub fn parse_option_key(raw: &str) -> Result<String, AppError> {
    let key = raw.trim();
    validate_option_key(key)
        .map_err(|_| AppError::validation("answer", "must be one of 1, 2, 3, 4"))?;
    Ok(key.to_string())
}

fn validate_option_key(key: &str) -> Result<(), ValidationError> {
    if OPTION_KEYS.contains(&key) {
        Ok(())
    } else {
        Err(ValidationError::new("unknown_option_key")
            .with_message("must be one of 1, 2, 3, 4".into()))
    }
}

fn validate_options(options: &BTreeMap<String, String>) -> Result<(), ValidationError> {
    let keys_match = options.len() == OPTION_KEYS.len()
        && OPTION_KEYS.iter().all(|k| options.contains_key(*k));
    if !keys_match {
        return Err(ValidationError::new("options_key_set")
            .with_message("exactly four options keyed 1, 2, 3, 4 are required".into()));
    }
    for text in options.values() {
        if text.trim().is_empty() {
            return Err(ValidationError::new("option_blank")
                .with_message("option text must not be blank".into()));
        }
        if text.chars().count() > 500 {
            return Err(ValidationError::new("option_too_long")
                .with_message("option text must be at most 500 characters".into()));
        }
    }
    Ok(())
}
