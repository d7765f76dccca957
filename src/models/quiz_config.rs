// src/models/quiz_config.rs

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::is_valid_name;
use crate::config::{ALL_TOPICS, DEFAULT_QUESTIONS_PER_TOPIC};
use crate::error::AppError;

/// The quiz configuration resource (`config/config.json`).
/// Loaded once per run and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QuizConfig {
    #[validate(custom(function = validate_topics))]
    pub topics: Vec<String>,

    /// Cap on bank size, enforced when a question is added.
    #[validate(range(min = 1, message = "questionsPerTopic must be a positive integer."))]
    pub questions_per_topic: u32,
}

impl Default for QuizConfig {
    fn default() -> Self {
        QuizConfig {
            topics: Vec::new(),
            questions_per_topic: DEFAULT_QUESTIONS_PER_TOPIC,
        }
    }
}

impl QuizConfig {
    pub fn has_topic(&self, topic: &str) -> bool {
        self.topics.iter().any(|t| t == topic)
    }

    /// Resolves a topic against the configured set.
    pub fn require_topic(&self, topic: &str) -> Result<(), AppError> {
        if self.has_topic(topic) {
            Ok(())
        } else {
            Err(AppError::NotFound(format!("Topic '{}' is not configured", topic)))
        }
    }
}

fn validate_topics(topics: &[String]) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for topic in topics {
        if !is_valid_name(topic) {
            return Err(ValidationError::new("topic_charset").with_message(
                format!(
                    "topic '{}' may only contain letters, digits, '_' and '-'",
                    topic
                )
                .into(),
            ));
        }
        if topic.eq_ignore_ascii_case(ALL_TOPICS) {
            return Err(ValidationError::new("topic_reserved")
                .with_message("'ALL' is reserved for the aggregate leaderboard".into()));
        }
        if !seen.insert(topic.as_str()) {
            return Err(ValidationError::new("topic_duplicate")
                .with_message(format!("topic '{}' is listed twice", topic).into()));
        }
    }
    Ok(())
}
