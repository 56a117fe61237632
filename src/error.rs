//! API error taxonomy.
//!
//! Every failure that reaches the HTTP boundary is one of these variants,
//! translated to a status code plus a `{"error": detail}` JSON body.

use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing, invalid, expired, or revoked session (401)
    #[error("{0}")]
    Unauthenticated(String),

    /// Too many login attempts in the sliding window (429)
    #[error("Too many login attempts")]
    RateLimited,

    /// Missing or malformed server-side secret/credential (500).
    /// The detail names the setting, never its value.
    #[error("{0}")]
    Configuration(String),

    /// Bad caller input (422)
    #[error("{0}")]
    Validation(String),

    /// Malformed content id or path escape attempt (400)
    #[error("{0}")]
    InvalidId(String),

    /// Front matter block that does not decode to a YAML mapping (400)
    #[error("Invalid YAML front matter")]
    InvalidFrontMatter,

    #[error("{0}")]
    NotFound(String),

    /// Publish requested with a clean working tree (400)
    #[error("No changes in content/ to publish")]
    NoChanges,

    /// git commit reported a nonzero exit (400); detail is the tool output
    #[error("{0}")]
    CommitFailed(String),

    /// git push reported a nonzero exit (502); detail is the tool output
    #[error("{0}")]
    PushFailed(String),

    /// The git binary could not be located or executed (500)
    #[error("Git is not installed or not executable: {0}")]
    ToolUnavailable(String),

    /// Database or filesystem failure (500)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InvalidId(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidFrontMatter => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::NoChanges => StatusCode::BAD_REQUEST,
            ApiError::CommitFailed(_) => StatusCode::BAD_REQUEST,
            ApiError::PushFailed(_) => StatusCode::BAD_GATEWAY,
            ApiError::ToolUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl actix_web::ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        ApiError::status_code(self)
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            log::error!("[API] {}", self);
        }
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.to_string()
        }))
    }
}

impl From<rusqlite::Error> for ApiError {
    fn from(e: rusqlite::Error) -> Self {
        ApiError::Internal(format!("Database error: {}", e))
    }
}

impl From<std::io::Error> for ApiError {
    fn from(e: std::io::Error) -> Self {
        ApiError::Internal(format!("IO error: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::Unauthenticated("x".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::RateLimited.status_code(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(ApiError::NoChanges.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::PushFailed("x".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::ToolUnavailable("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Validation("x".into()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }
}
