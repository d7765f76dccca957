// src/handlers/auth.rs

use validator::Validate;

use crate::{
    error::AppError,
    models::user::{
        AuthenticatedUser, CreateUserRequest, LoginRequest, Role, UserCredentials, UserSummary,
    },
    state::AppState,
    utils::hash::{hash_password, verify_password},
};

/// Registers a new user with the USER role.
///
/// Hashes the password using Argon2 before storing it.
/// An existing username is never overwritten.
pub fn register_user(state: &AppState, payload: CreateUserRequest) -> Result<UserSummary, AppError> {
    payload.validate()?;
    insert_user(state, &payload.username, &payload.password, Role::User)
}

/// Verifies the username and password against the users resource.
/// Returns the session context the other operations expect.
pub fn authenticate_user(
    state: &AppState,
    payload: LoginRequest,
) -> Result<AuthenticatedUser, AppError> {
    payload.validate()?;

    let users = state.store.load_users()?;
    let invalid = || AppError::AuthError("Invalid username or password".to_string());

    let user = users.get(&payload.username).ok_or_else(invalid)?;
    if !verify_password(&payload.password, &user.password_hash)? {
        tracing::warn!("Failed login for '{}'", payload.username);
        return Err(invalid());
    }

    tracing::info!("User '{}' logged in as {}", user.username, user.role);
    Ok(user.into())
}

/// Shared by registration and admin user creation.
pub(crate) fn insert_user(
    state: &AppState,
    username: &str,
    password: &str,
    role: Role,
) -> Result<UserSummary, AppError> {
    let mut users = state.store.load_users()?;

    if users.contains_key(username) {
        return Err(AppError::Duplicate(format!(
            "Username '{}' already exists",
            username
        )));
    }

    let password_hash = hash_password(password)?;
    users.insert(
        username.to_string(),
        UserCredentials {
            username: username.to_string(),
            password_hash,
            role,
        },
    );
    state.store.save_users(&users).map_err(|e| {
        tracing::error!("Failed to register user: {}", e);
        e
    })?;

    tracing::info!("Registered user '{}' ({})", username, role);
    Ok(UserSummary {
        username: username.to_string(),
        role,
    })
}
