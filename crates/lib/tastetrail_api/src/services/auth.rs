//! Authentication service: registration, login and profile flows over a [`Store`].

use tastetrail_core::auth::{jwt, password};
use tastetrail_core::models::auth::{NewUser, ProfileUpdate, User};
use tastetrail_core::store::{Store, StoreError};
use tracing::{info, warn};

use crate::config::AdminBootstrap;
use crate::error::{AppError, AppResult};
use crate::models::{MessageResponse, TokenResponse, UpdateProfileRequest, UserResponse};

fn user_not_found() -> AppError {
    AppError::NotFound("User not found".into())
}

fn issue(user: User, jwt_secret: &[u8]) -> AppResult<TokenResponse> {
    let token = jwt::generate_session_token(&user.id, &user.email, jwt_secret)?;
    Ok(TokenResponse { token, user })
}

/// Register a new user account and sign them in.
pub async fn register(
    store: &dyn Store,
    name: &str,
    email: &str,
    password: &str,
    jwt_secret: &[u8],
) -> AppResult<TokenResponse> {
    let name = name.trim();
    let email = email.trim();
    if name.is_empty() || email.is_empty() || password.is_empty() {
        return Err(AppError::Validation("Missing required fields".into()));
    }

    // Hash before touching the store so no lock is held across bcrypt.
    let password_hash = password::hash_password_blocking(password.to_string()).await?;

    let user = store
        .create_user(NewUser {
            name: name.to_string(),
            email: email.to_string(),
            password_hash,
        })
        .await
        .map_err(|e| match e {
            StoreError::Conflict(_) => AppError::Conflict("Email already exists".into()),
            other => other.into(),
        })?;

    info!(user_id = %user.id, "registered user");
    issue(user, jwt_secret)
}

/// Authenticate with email + password.
pub async fn login(
    store: &dyn Store,
    email: &str,
    password: &str,
    jwt_secret: &[u8],
) -> AppResult<TokenResponse> {
    let found = store
        .find_user_by_email(email.trim())
        .await?
        .ok_or_else(user_not_found)?;

    if !password::verify_password_blocking(password.to_string(), found.password_hash).await? {
        return Err(AppError::Unauthorized("Invalid credentials".into()));
    }

    issue(found.user, jwt_secret)
}

pub async fn get_profile(store: &dyn Store, user_id: &str) -> AppResult<UserResponse> {
    let user = store.get_user(user_id).await?.ok_or_else(user_not_found)?;
    Ok(UserResponse { user })
}

/// Apply a partial profile update. Email and admin flag are not editable.
pub async fn update_profile(
    store: &dyn Store,
    user_id: &str,
    req: UpdateProfileRequest,
) -> AppResult<UserResponse> {
    let name = match req.name.as_deref().map(str::trim) {
        Some("") => return Err(AppError::Validation("Name cannot be empty".into())),
        other => other.map(str::to_string),
    };
    let update = ProfileUpdate {
        name,
        dietary_preferences: req.dietary_preferences.map(|p| p.normalized()),
    };

    let user = store
        .update_profile(user_id, update)
        .await?
        .ok_or_else(user_not_found)?;
    Ok(UserResponse { user })
}

/// Acknowledge a password reset request. Nothing is sent.
pub async fn forgot_password(store: &dyn Store, email: &str) -> AppResult<MessageResponse> {
    let email = email.trim();
    if email.is_empty() {
        return Err(AppError::Validation("Email is required".into()));
    }
    let found = store
        .find_user_by_email(email)
        .await?
        .ok_or_else(user_not_found)?;

    info!(user_id = %found.user.id, "password reset requested, email delivery is not configured");
    Ok(MessageResponse {
        message: "Password reset requested. Email delivery is not configured on this server."
            .into(),
    })
}

/// Make sure the configured administrator exists and holds the admin flag.
///
/// An existing account keeps its password; only the flag is set.
pub async fn bootstrap_admin(store: &dyn Store, admin: &AdminBootstrap) -> AppResult<User> {
    if store.find_user_by_email(&admin.email).await?.is_none() {
        let password_hash = password::hash_password_blocking(admin.password.clone()).await?;
        let created = store
            .create_user(NewUser {
                name: admin.name.clone(),
                email: admin.email.clone(),
                password_hash,
            })
            .await;
        match created {
            Ok(user) => info!(user_id = %user.id, "created bootstrap administrator"),
            Err(StoreError::Conflict(_)) => {
                warn!("bootstrap administrator registered concurrently")
            }
            Err(e) => return Err(e.into()),
        }
    }

    let user = store
        .set_admin(&admin.email, true)
        .await?
        .ok_or_else(|| AppError::Internal(format!("admin {} vanished", admin.email)))?;
    info!(user_id = %user.id, "administrator flag ensured");
    Ok(user)
}
