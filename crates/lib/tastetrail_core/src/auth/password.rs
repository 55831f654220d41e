//! Password hashing via bcrypt.

use super::AuthError;

/// bcrypt cost factor.
const BCRYPT_COST: u32 = 10;

/// Hash a password with bcrypt (cost 10).
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    bcrypt::hash(password, BCRYPT_COST)
        .map_err(|e| AuthError::Internal(format!("bcrypt hash: {e}")))
}

/// Verify a password against a bcrypt hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    bcrypt::verify(password, hash).map_err(|e| AuthError::Internal(format!("bcrypt verify: {e}")))
}

/// Hash on the blocking pool so bcrypt does not stall the async runtime.
pub async fn hash_password_blocking(password: String) -> Result<String, AuthError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AuthError::Internal(format!("bcrypt task: {e}")))?
}

/// Verify on the blocking pool so bcrypt does not stall the async runtime.
pub async fn verify_password_blocking(password: String, hash: String) -> Result<bool, AuthError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| AuthError::Internal(format!("bcrypt task: {e}")))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_not_plaintext_and_verifies() {
        let hash = hash_password("hunter22").unwrap();
        assert_ne!(hash, "hunter22");
        assert!(verify_password("hunter22", &hash).unwrap());
        assert!(!verify_password("hunter23", &hash).unwrap());
    }

    #[test]
    fn verify_against_malformed_hash_is_an_error() {
        assert!(verify_password("x", "not-a-bcrypt-hash").is_err());
    }

    #[tokio::test]
    async fn blocking_variants_agree() {
        let hash = hash_password_blocking("s3cret".into()).await.unwrap();
        assert!(verify_password_blocking("s3cret".into(), hash.clone()).await.unwrap());
        assert!(!verify_password_blocking("nope".into(), hash).await.unwrap());
    }
}
