use actix_web::HttpRequest;
use chrono::Utc;

use crate::config::{Config, SESSION_COOKIE};
use crate::db::Database;
use crate::error::ApiError;
use crate::security::{decode_access_token, hash_token};

/// An authenticated caller, resolved from a bearer token or session cookie.
pub struct AuthSession {
    pub user: String,
    pub token_hash: String,
}

/// Pull the raw token out of the request: `Authorization: Bearer <token>`
/// wins, the session cookie is the fallback.
fn extract_token(req: &HttpRequest) -> Option<String> {
    if let Some(header) = req.headers().get("Authorization").and_then(|h| h.to_str().ok()) {
        if let Some((scheme, token)) = header.split_once(' ') {
            if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
                return Some(token.to_string());
            }
        }
    }
    req.cookie(SESSION_COOKIE).map(|c| c.value().to_string())
}

/// Authenticate a request against the session store.
///
/// The JWT signature check alone is not enough: logout revokes the server-side
/// session row, so a structurally valid token must still match a live session.
pub fn require_auth(
    db: &Database,
    config: &Config,
    req: &HttpRequest,
) -> Result<AuthSession, ApiError> {
    let token = extract_token(req)
        .ok_or_else(|| ApiError::Unauthenticated("Missing authentication token".into()))?;

    let claims = decode_access_token(&token, &config.jwt_secret)?;

    let token_hash = hash_token(&token);
    let session = db
        .get_session_by_token_hash(&token_hash)?
        .ok_or_else(|| ApiError::Unauthenticated("Session not found".into()))?;

    if session.revoked_at.is_some() {
        return Err(ApiError::Unauthenticated("Session has been revoked".into()));
    }
    if Utc::now() >= session.expires_at {
        return Err(ApiError::Unauthenticated("Session has expired".into()));
    }

    Ok(AuthSession {
        user: claims.sub,
        token_hash,
    })
}
