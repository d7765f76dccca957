// src/handlers/admin.rs

use validator::Validate;

use super::auth::insert_user;
use crate::{
    error::AppError,
    models::user::{AdminCreateUserRequest, AuthenticatedUser, Role, UserSummary},
    state::AppState,
};

/// Lists all users with their roles.
/// Admin only.
pub fn list_users(state: &AppState, actor: &AuthenticatedUser) -> Result<Vec<UserSummary>, AppError> {
    actor.require_admin()?;

    let users = state.store.load_users()?;
    Ok(users
        .values()
        .map(|u| UserSummary {
            username: u.username.clone(),
            role: u.role,
        })
        .collect())
}

/// Creates a new user with specific role.
/// Admin only.
pub fn create_user(
    state: &AppState,
    actor: &AuthenticatedUser,
    payload: AdminCreateUserRequest,
) -> Result<UserSummary, AppError> {
    actor.require_admin()?;
    payload.validate()?;
    insert_user(state, &payload.username, &payload.password, payload.role)
}

/// Creates the admin account from settings when it does not exist yet.
/// Returns whether an account was created.
pub fn seed_admin_user(state: &AppState, username: &str, password: &str) -> Result<bool, AppError> {
    let payload = AdminCreateUserRequest {
        username: username.to_string(),
        password: password.to_string(),
        role: Role::Admin,
    };
    payload.validate()?;

    if state.store.load_users()?.contains_key(username) {
        return Ok(false);
    }

    tracing::info!("Seeding admin user: {}", username);
    insert_user(state, &payload.username, &payload.password, payload.role)?;
    Ok(true)
}
