//! Request handlers.

pub mod admin;
pub mod auth;
pub mod health;
pub mod recipes;

use crate::error::AppError;

/// Fallback for every unmatched path.
pub async fn not_found_handler() -> AppError {
    AppError::NotFound("Route not found".into())
}
