//! Markdown content storage: front matter handling plus the file-backed
//! content store for notes and posts.

pub mod frontmatter;
pub mod store;

use serde::{Deserialize, Serialize};

pub use store::ContentStore;

/// Selects the storage root a document lives under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Note,
    Post,
}

impl ContentType {
    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::Note => "note",
            ContentType::Post => "post",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "note" => Some(ContentType::Note),
            "post" => Some(ContentType::Post),
            _ => None,
        }
    }
}
