//! Request and response DTOs for the HTTP API.

use serde::{Deserialize, Serialize};

use crate::content::ContentType;

// --- Auth ---

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthMeResponse {
    pub user: String,
}

// --- Content ---

#[derive(Debug, Clone, Serialize)]
pub struct ContentItemSummary {
    pub id: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub path: String,
    pub slug: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draft: Option<bool>,
    pub updated_at: String,
}

#[derive(Debug, Serialize)]
pub struct ContentListResponse {
    pub items: Vec<ContentItemSummary>,
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct ContentDocument {
    pub id: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub path: String,
    pub frontmatter: serde_json::Value,
    pub body: String,
    pub raw: String,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct ContentCreateRequest {
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub title: String,
    pub link: Option<String>,
    pub comment: Option<String>,
    pub body: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    pub date: Option<String>,
    #[serde(default = "default_true")]
    pub draft: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct ContentUpdateRequest {
    pub title: Option<String>,
    pub link: Option<String>,
    pub comment: Option<String>,
    pub body: Option<String>,
    pub categories: Option<Vec<String>>,
    pub date: Option<String>,
    pub draft: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct ContentListQuery {
    #[serde(rename = "type")]
    pub content_type: Option<ContentType>,
    #[serde(default)]
    pub query: String,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

// --- Git ---

#[derive(Debug, Clone, Serialize)]
pub struct GitStatusItem {
    pub status: String,
    pub path: String,
}

#[derive(Debug, Serialize)]
pub struct GitStatusResponse {
    pub changed: bool,
    pub files: Vec<GitStatusItem>,
}

#[derive(Debug, Deserialize)]
pub struct PublishRequest {
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PublishResponse {
    pub commit_hash: String,
    pub message: String,
    pub files: Vec<GitStatusItem>,
    pub output: String,
}
