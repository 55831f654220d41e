//! Authentication logic.
//!
//! Provides password hashing and session token management shared by the
//! HTTP API and the admin CLI.

pub mod jwt;
pub mod password;

use thiserror::Error;

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing token")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    ExpiredToken,

    #[error("Invalid credentials")]
    CredentialError,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
