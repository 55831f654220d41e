//! Authorization gate: bearer token verification and the admin check.

use axum::http::header::AUTHORIZATION;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tastetrail_core::auth::AuthError;
use tastetrail_core::auth::jwt::verify_session_token;
use tastetrail_core::models::auth::TokenClaims;
use tracing::debug;

use crate::AppState;
use crate::error::AppError;

/// Key used to store `TokenClaims` in request extensions.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub TokenClaims);

impl AuthenticatedUser {
    /// Id of the user the token was issued to.
    pub fn user_id(&self) -> &str {
        &self.0.sub
    }
}

/// Axum middleware: extracts `Authorization: Bearer <token>`, verifies the JWT,
/// and injects `AuthenticatedUser` into request extensions.
///
/// No store lookup happens here; a token for a since-deleted user still passes.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or(AuthError::MissingToken)?;

    let claims = verify_session_token(token.trim(), state.config.jwt_secret.as_bytes())
        .inspect_err(|e| debug!(error = %e, "rejected bearer token"))?;

    request.extensions_mut().insert(AuthenticatedUser(claims));

    Ok(next.run(request).await)
}

/// Axum middleware: lets the request through only if the authenticated user
/// currently holds the admin flag. Must run after [`require_auth`].
pub async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user_id = request
        .extensions()
        .get::<AuthenticatedUser>()
        .map(|u| u.user_id().to_string())
        .ok_or(AuthError::MissingToken)?;

    let user = state
        .store
        .get_user(&user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    if !user.is_admin {
        debug!(%user_id, "admin access denied");
        return Err(AppError::Forbidden("Admin access required".into()));
    }

    Ok(next.run(request).await)
}
