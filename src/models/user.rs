// src/models/user.rs

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::is_valid_name;
use crate::error::AppError;

/// User role: 'USER' or 'ADMIN'.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "USER"),
            Role::Admin => write!(f, "ADMIN"),
        }
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USER" => Ok(Role::User),
            "ADMIN" => Ok(Role::Admin),
            other => Err(AppError::validation(
                "role",
                format!("'{}' is not one of USER, ADMIN", other),
            )),
        }
    }
}

/// One entry of the users resource (`users/users.json`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCredentials {
    /// Unique username, also the key in the users map.
    pub username: String,

    /// Argon2 PHC string.
    pub password_hash: String,

    pub role: Role,
}

/// Users resource: username -> credentials.
pub type Users = BTreeMap<String, UserCredentials>;

/// Explicit session context handed to every operation that needs an actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticatedUser {
    pub username: String,
    pub role: Role,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::AuthError("Admin privileges required".to_string()))
        }
    }
}

impl From<&UserCredentials> for AuthenticatedUser {
    fn from(user: &UserCredentials) -> Self {
        AuthenticatedUser {
            username: user.username.clone(),
            role: user.role,
        }
    }
}

/// Listing row. Never carries the hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    pub username: String,
    pub role: Role,
}

/// DTO for creating a new user (Registration).
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(custom(function = validate_username))]
    pub username: String,
    #[validate(length(
        min = 4,
        max = 128,
        message = "Password length must be between 4 and 128 characters."
    ))]
    pub password: String,
}

/// DTO for user login.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 50))]
    pub username: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// DTO for Admin creating a user (can specify role).
#[derive(Debug, Deserialize, Validate)]
pub struct AdminCreateUserRequest {
    #[validate(custom(function = validate_username))]
    pub username: String,
    #[validate(length(
        min = 4,
        max = 128,
        message = "Password length must be between 4 and 128 characters."
    ))]
    pub password: String,
    pub role: Role,
}

pub(crate) fn validate_username(username: &str) -> Result<(), ValidationError> {
    let len = username.chars().count();
    if !(3..=50).contains(&len) {
        return Err(ValidationError::new("username_length")
            .with_message("Username length must be between 3 and 50 characters.".into()));
    }
    if !is_valid_name(username) {
        return Err(ValidationError::new("username_charset").with_message(
            "Username may only contain letters, digits, '_' and '-'.".into(),
        ));
    }
    Ok(())
}

/// Checks a users map read back from storage.
pub fn check_users(users: &Users) -> Result<(), String> {
    for (key, user) in users {
        if key != &user.username {
            return Err(format!(
                "entry '{}' holds credentials for '{}'",
                key, user.username
            ));
        }
        if validate_username(key).is_err() {
            return Err(format!("'{}' is not a valid username", key));
        }
    }
    Ok(())
}
