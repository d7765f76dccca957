// src/models/mod.rs

use std::sync::LazyLock;

use regex::Regex;
use validator::ValidationError;

pub mod question;
pub mod quiz_config;
pub mod score;
pub mod session;
pub mod user;

/// Letters, digits, underscore and hyphen. Shared by usernames and topic names,
/// which double as map keys and file names.
static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("name pattern compiles"));

pub(crate) fn is_valid_name(value: &str) -> bool {
    NAME_RE.is_match(value)
}

pub(crate) fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("must not be blank".into()));
    }
    Ok(())
}
