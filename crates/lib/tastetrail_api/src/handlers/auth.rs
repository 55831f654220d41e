//! Authentication request handlers.

use axum::extract::State;
use axum::{Extension, Json};

use crate::AppState;
use crate::error::AppResult;
use crate::extract::ApiJson;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{
    ForgotPasswordRequest, LoginRequest, MessageResponse, RegisterRequest, TokenResponse,
    UpdateProfileRequest, UserResponse,
};
use crate::services::auth;

/// `POST /api/auth/register` — create a new user account.
pub async fn register_handler(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RegisterRequest>,
) -> AppResult<Json<TokenResponse>> {
    let resp = auth::register(
        state.store.as_ref(),
        &body.name,
        &body.email,
        &body.password,
        state.config.jwt_secret.as_bytes(),
    )
    .await?;
    Ok(Json(resp))
}

/// `POST /api/auth/login` — authenticate with email + password.
pub async fn login_handler(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let resp = auth::login(
        state.store.as_ref(),
        &body.email,
        &body.password,
        state.config.jwt_secret.as_bytes(),
    )
    .await?;
    Ok(Json(resp))
}

/// `GET /api/auth/profile`
pub async fn get_profile_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> AppResult<Json<UserResponse>> {
    let resp = auth::get_profile(state.store.as_ref(), user.user_id()).await?;
    Ok(Json(resp))
}

/// `PUT /api/auth/profile` — update name and/or dietary preferences.
pub async fn update_profile_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiJson(body): ApiJson<UpdateProfileRequest>,
) -> AppResult<Json<UserResponse>> {
    let resp = auth::update_profile(state.store.as_ref(), user.user_id(), body).await?;
    Ok(Json(resp))
}

/// `POST /api/auth/forgot-password`
pub async fn forgot_password_handler(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<ForgotPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    let resp = auth::forgot_password(state.store.as_ref(), &body.email).await?;
    Ok(Json(resp))
}
