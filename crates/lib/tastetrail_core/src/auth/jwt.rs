//! JWT session token generation and verification.
//!
//! Tokens are stateless: a token is valid exactly when its HS256 signature
//! checks out and its `exp` lies in the future. Nothing is looked up in a
//! store, so a token cannot be revoked before it expires.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use tracing::warn;

use super::AuthError;
use crate::models::auth::TokenClaims;

/// Session token lifetime: 7 days.
pub const SESSION_TOKEN_EXPIRY_DAYS: i64 = 7;

/// Signing secret used when `JWT_SECRET` is not configured. Development only.
pub const DEV_FALLBACK_SECRET: &str = "tastetrail-dev-secret-change-in-production";

/// Generate a signed session token (HS256, 7 day expiry).
pub fn generate_session_token(
    user_id: &str,
    email: &str,
    secret: &[u8],
) -> Result<String, AuthError> {
    generate_session_token_at(user_id, email, secret, Utc::now())
}

/// Generate a session token as if issued at `now`.
pub fn generate_session_token_at(
    user_id: &str,
    email: &str,
    secret: &[u8],
    now: DateTime<Utc>,
) -> Result<String, AuthError> {
    let claims = TokenClaims {
        sub: user_id.to_string(),
        email: email.to_string(),
        exp: (now + Duration::days(SESSION_TOKEN_EXPIRY_DAYS)).timestamp(),
        iat: now.timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(|e| AuthError::Internal(format!("jwt encode: {e}")))
}

/// Verify a session token, returning the claims on success.
pub fn verify_session_token(token: &str, secret: &[u8]) -> Result<TokenClaims, AuthError> {
    verify_session_token_at(token, secret, Utc::now())
}

/// Verify a session token against the clock value `now`.
pub fn verify_session_token_at(
    token: &str,
    secret: &[u8],
    now: DateTime<Utc>,
) -> Result<TokenClaims, AuthError> {
    if token.trim().is_empty() {
        return Err(AuthError::MissingToken);
    }

    let key = DecodingKey::from_secret(secret);
    let mut validation = Validation::default();
    // Expiry is checked below against the injected clock.
    validation.validate_exp = false;

    let claims = decode::<TokenClaims>(token, &key, &validation)
        .map_err(|_| AuthError::InvalidToken)?
        .claims;

    if claims.exp <= now.timestamp() {
        return Err(AuthError::ExpiredToken);
    }
    Ok(claims)
}

/// Resolve the configured `JWT_SECRET`, falling back to [`DEV_FALLBACK_SECRET`]
/// when it is unset or blank.
pub fn resolve_jwt_secret(configured: Option<String>) -> String {
    if let Some(secret) = configured
        && !secret.trim().is_empty()
    {
        return secret;
    }
    warn!("JWT_SECRET not set, signing tokens with the development fallback secret");
    DEV_FALLBACK_SECRET.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-secret";

    #[test]
    fn fresh_token_verifies_with_matching_claims() {
        let token = generate_session_token("user-1", "a@example.com", SECRET).unwrap();
        let claims = verify_session_token(&token, SECRET).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.email, "a@example.com");
        assert_eq!(
            claims.exp - claims.iat,
            Duration::days(SESSION_TOKEN_EXPIRY_DAYS).num_seconds()
        );
    }

    #[test]
    fn token_expires_after_seven_days() {
        let issued = Utc::now();
        let token = generate_session_token_at("user-1", "a@example.com", SECRET, issued).unwrap();

        let almost = issued + Duration::days(7) - Duration::seconds(1);
        assert!(verify_session_token_at(&token, SECRET, almost).is_ok());

        let past = issued + Duration::days(7) + Duration::seconds(1);
        assert!(matches!(
            verify_session_token_at(&token, SECRET, past),
            Err(AuthError::ExpiredToken)
        ));
    }

    #[test]
    fn tampered_token_is_invalid() {
        let token = generate_session_token("user-1", "a@example.com", SECRET).unwrap();
        // Flip one character inside the signature segment.
        let idx = token.len() - 5;
        let original = token.as_bytes()[idx] as char;
        let replacement = if original == 'A' { 'B' } else { 'A' };
        let mut tampered = token.clone();
        tampered.replace_range(idx..idx + 1, &replacement.to_string());

        assert!(matches!(
            verify_session_token(&tampered, SECRET),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn tampered_payload_is_invalid() {
        let token = generate_session_token("user-1", "a@example.com", SECRET).unwrap();
        let first_dot = token.find('.').unwrap();
        let idx = first_dot + 3;
        let original = token.as_bytes()[idx] as char;
        let replacement = if original == 'x' { 'y' } else { 'x' };
        let mut tampered = token.clone();
        tampered.replace_range(idx..idx + 1, &replacement.to_string());

        assert!(matches!(
            verify_session_token(&tampered, SECRET),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn wrong_secret_is_invalid() {
        let token = generate_session_token("user-1", "a@example.com", SECRET).unwrap();
        assert!(matches!(
            verify_session_token(&token, b"other-secret"),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn garbage_and_empty_tokens() {
        assert!(matches!(
            verify_session_token("not.a.jwt", SECRET),
            Err(AuthError::InvalidToken)
        ));
        assert!(matches!(
            verify_session_token("", SECRET),
            Err(AuthError::MissingToken)
        ));
    }
}
