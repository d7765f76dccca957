// src/error.rs

use std::fmt;

/// Global Application Error Enum.
/// Every store operation returns one of these to the presentation layer,
/// which reports the message and lets the user retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    // Entity or backing resource absent
    NotFound(String),

    // Persisted data that does not parse or breaks an entity invariant
    Format { resource: String, reason: String },

    // Semantic rule violation on user input
    Validation { field: String, reason: String },

    // Question bank already holds `limit` questions
    Capacity { topic: String, limit: u32 },

    // Read/write failure at the storage layer
    Io { resource: String, reason: String },

    // e.g., username already registered
    Duplicate(String),

    // Bad credentials or missing privileges
    AuthError(String),

    // A session cannot start on an empty bank
    NoQuestions(String),

    // Out-of-order or post-finish session calls
    InvalidSession(String),

    // Unexpected conditions (hashing backend failures)
    Internal(String),
}

impl AppError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn format(resource: impl Into<String>, reason: impl Into<String>) -> Self {
        AppError::Format {
            resource: resource.into(),
            reason: reason.into(),
        }
    }

    pub fn io(resource: impl Into<String>, reason: impl Into<String>) -> Self {
        AppError::Io {
            resource: resource.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Format { resource, reason } => {
                write!(f, "Invalid data format in {}: {}", resource, reason)
            }
            AppError::Validation { field, reason } => {
                write!(f, "Invalid value for '{}': {}", field, reason)
            }
            AppError::Capacity { topic, limit } => write!(
                f,
                "Topic '{}' has reached the limit of {} questions",
                topic, limit
            ),
            AppError::Io { resource, reason } => {
                write!(f, "Could not access {}: {}", resource, reason)
            }
            AppError::Duplicate(msg) => write!(f, "Already exists: {}", msg),
            AppError::AuthError(msg) => write!(f, "{}", msg),
            AppError::NoQuestions(topic) => {
                write!(f, "Topic '{}' has no questions yet", topic)
            }
            AppError::InvalidSession(msg) => write!(f, "Invalid quiz action: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

/// Reports the first failing field (sorted by name so the message is stable).
impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<(String, String)> = errors
            .field_errors()
            .into_iter()
            .filter_map(|(field, errs)| {
                errs.first().map(|e| {
                    let reason = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string());
                    (field.to_string(), reason)
                })
            })
            .collect();
        fields.sort();

        match fields.into_iter().next() {
            Some((field, reason)) => AppError::Validation { field, reason },
            None => AppError::validation("input", errors.to_string()),
        }
    }
}
