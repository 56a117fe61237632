//! Password verification, access tokens, and token digests.
//!
//! Passwords are checked against a bcrypt hash from configuration. Access
//! tokens are HS256 JWTs carrying subject, issued-at, and expiry claims.
//! Sessions are keyed by the SHA-256 hex digest of the raw token; the raw
//! token itself is never persisted.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::ApiError;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// Compare a plaintext password against the stored bcrypt hash.
///
/// A malformed stored hash is a server configuration problem, not a failed
/// login, and surfaces as `Configuration`.
pub fn verify_password(plain: &str, password_hash: &str) -> Result<bool, ApiError> {
    bcrypt::verify(plain, password_hash).map_err(|_| {
        ApiError::Configuration(
            "CMS_ADMIN_PASSWORD_HASH must be a valid bcrypt hash".to_string(),
        )
    })
}

/// Issue a signed access token for `subject`, expiring after `expire_hours`.
pub fn create_access_token(
    subject: &str,
    secret: &str,
    expire_hours: i64,
) -> Result<(String, DateTime<Utc>), ApiError> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(expire_hours);
    let claims = Claims {
        sub: subject.to_string(),
        iat: now.timestamp(),
        exp: expires_at.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(format!("Failed to sign access token: {}", e)))?;

    Ok((token, expires_at))
}

/// Decode and validate an access token (signature, structure, and expiry).
pub fn decode_access_token(token: &str, secret: &str) -> Result<Claims, ApiError> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| ApiError::Unauthenticated("Invalid authentication token".to_string()))?;

    Ok(data.claims)
}

/// Deterministic one-way digest of a token, used as the session lookup key.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key";

    #[test]
    fn test_token_round_trip() {
        let (token, expires_at) = create_access_token("admin", SECRET, 8).unwrap();
        assert!(expires_at > Utc::now());

        let claims = decode_access_token(&token, SECRET).unwrap();
        assert_eq!(claims.sub, "admin");
        assert_eq!(claims.exp, expires_at.timestamp());
    }

    #[test]
    fn test_expired_token_rejected() {
        let (token, _) = create_access_token("admin", SECRET, -1).unwrap();
        let result = decode_access_token(&token, SECRET);
        assert!(matches!(result, Err(ApiError::Unauthenticated(_))));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let (token, _) = create_access_token("admin", SECRET, 8).unwrap();
        let result = decode_access_token(&token, "other-secret");
        assert!(matches!(result, Err(ApiError::Unauthenticated(_))));
    }

    #[test]
    fn test_malformed_token_rejected() {
        let result = decode_access_token("not.a.token", SECRET);
        assert!(matches!(result, Err(ApiError::Unauthenticated(_))));
    }

    #[test]
    fn test_hash_token_deterministic() {
        let a = hash_token("some-token");
        let b = hash_token("some-token");
        let c = hash_token("other-token");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_verify_password_malformed_hash_is_config_error() {
        let result = verify_password("password", "not-a-bcrypt-hash");
        assert!(matches!(result, Err(ApiError::Configuration(_))));
    }

    #[test]
    fn test_verify_password_against_real_hash() {
        let hash = bcrypt::hash("hunter2", 4).unwrap();
        assert!(verify_password("hunter2", &hash).unwrap());
        assert!(!verify_password("wrong", &hash).unwrap());
    }
}
