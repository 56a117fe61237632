//! File-backed content store.
//!
//! Markdown files under the two content roots are the source of truth;
//! there is no index. Listing is a directory scan behind this interface,
//! so an indexed backend could replace it without changing callers.
//!
//! All writes (create/update/delete) are serialized through a single lock
//! and individual file writes go through a write-then-rename so readers
//! never observe a partial file.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde_yaml::{Mapping, Value};
use unicode_normalization::UnicodeNormalization;
use uuid::Uuid;

use super::frontmatter;
use super::ContentType;
use crate::error::ApiError;
use crate::models::{
    ContentCreateRequest, ContentDocument, ContentItemSummary, ContentListResponse,
    ContentUpdateRequest,
};

pub struct ContentStore {
    notes_dir: PathBuf,
    posts_dir: PathBuf,
    write_lock: Mutex<()>,
}

impl ContentStore {
    pub fn new(notes_dir: PathBuf, posts_dir: PathBuf) -> Self {
        Self {
            notes_dir,
            posts_dir,
            write_lock: Mutex::new(()),
        }
    }

    fn content_dir(&self, content_type: ContentType) -> &Path {
        match content_type {
            ContentType::Note => &self.notes_dir,
            ContentType::Post => &self.posts_dir,
        }
    }

    /// Resolve a content id to its type and path without touching the
    /// filesystem. Rejects absolute paths, `..` segments, unknown type
    /// prefixes, and non-markdown extensions.
    pub fn resolve_id(&self, id: &str) -> Result<(ContentType, PathBuf), ApiError> {
        let id_path = Path::new(id);
        if id_path.is_absolute() {
            return Err(ApiError::InvalidId("Invalid content id".to_string()));
        }
        if id_path
            .components()
            .any(|c| matches!(c, Component::ParentDir))
        {
            return Err(ApiError::InvalidId("Invalid content id".to_string()));
        }

        let Some((type_part, relative_part)) = id.split_once('/') else {
            return Err(ApiError::InvalidId("Invalid content id".to_string()));
        };
        if relative_part.is_empty() {
            return Err(ApiError::InvalidId("Invalid content id".to_string()));
        }
        let Some(content_type) = ContentType::parse(type_part) else {
            return Err(ApiError::InvalidId("Invalid content id".to_string()));
        };

        let file_path = self.content_dir(content_type).join(relative_part);
        if file_path.extension().and_then(|e| e.to_str()) != Some("md") {
            return Err(ApiError::InvalidId(
                "Only markdown files are supported".to_string(),
            ));
        }

        Ok((content_type, file_path))
    }

    /// Resolve an id to an existing file, defending against symlink escape:
    /// the canonicalized path must lie strictly under the content root.
    fn resolve_existing(&self, id: &str) -> Result<(ContentType, PathBuf), ApiError> {
        let (content_type, file_path) = self.resolve_id(id)?;
        if !file_path.exists() {
            return Err(ApiError::NotFound("Content not found".to_string()));
        }

        let canonical_root = self
            .content_dir(content_type)
            .canonicalize()
            .map_err(|e| ApiError::Internal(format!("Content root not accessible: {}", e)))?;
        let canonical_path = file_path
            .canonicalize()
            .map_err(|_| ApiError::NotFound("Content not found".to_string()))?;
        if !canonical_path.starts_with(&canonical_root) {
            return Err(ApiError::InvalidId("Invalid content path".to_string()));
        }

        Ok((content_type, canonical_path))
    }

    fn to_item_id(&self, content_type: ContentType, file_path: &Path) -> String {
        let root = self.content_dir(content_type);
        let relative = file_path.strip_prefix(root).unwrap_or(file_path);
        format!("{}/{}", content_type.as_str(), path_to_posix(relative))
    }

    /// Read one document by id.
    pub fn get(&self, id: &str) -> Result<ContentDocument, ApiError> {
        let (content_type, file_path) = self.resolve_existing(id)?;
        let raw = fs::read_to_string(&file_path)?;
        let (fm, body) = frontmatter::split_front_matter(&raw)?;

        Ok(ContentDocument {
            id: id.to_string(),
            content_type,
            path: file_path.to_string_lossy().to_string(),
            frontmatter: mapping_to_json(&fm)?,
            body,
            raw,
        })
    }

    /// Scan one or both roots, filter, sort by mtime descending, paginate.
    pub fn list(
        &self,
        content_type: Option<ContentType>,
        query: &str,
        page: usize,
        page_size: usize,
    ) -> Result<ContentListResponse, ApiError> {
        let mut candidates = Vec::new();
        if content_type.is_none() || content_type == Some(ContentType::Note) {
            candidates.push(ContentType::Note);
        }
        if content_type.is_none() || content_type == Some(ContentType::Post) {
            candidates.push(ContentType::Post);
        }

        let query_lower = query.trim().to_lowercase();
        let mut items = Vec::new();

        for kind in candidates {
            let root = self.content_dir(kind);
            if !root.exists() {
                continue;
            }
            for file_path in collect_markdown_files(root)? {
                if file_path.file_name().and_then(|n| n.to_str()) == Some("_index.md") {
                    continue;
                }
                let raw = fs::read_to_string(&file_path)?;
                // One malformed file must not take down the whole listing.
                let Ok((fm, _)) = frontmatter::split_front_matter(&raw) else {
                    log::warn!("[CONTENT] Skipping unparseable file {:?}", file_path);
                    continue;
                };

                let stem = file_path
                    .file_stem()
                    .map(|s| s.to_string_lossy().to_string())
                    .unwrap_or_default();
                let title = fm
                    .get("title")
                    .map(value_to_display)
                    .unwrap_or_else(|| stem.clone());

                if !query_lower.is_empty()
                    && !title.to_lowercase().contains(&query_lower)
                    && !stem.to_lowercase().contains(&query_lower)
                {
                    continue;
                }

                let modified: DateTime<Utc> = fs::metadata(&file_path)?
                    .modified()
                    .map(DateTime::from)
                    .unwrap_or_else(|_| Utc::now());

                items.push(ContentItemSummary {
                    id: self.to_item_id(kind, &file_path),
                    content_type: kind,
                    path: file_path.to_string_lossy().to_string(),
                    slug: stem,
                    title,
                    date: fm
                        .get("date")
                        .map(value_to_display),
                    draft: fm
                        .get("draft")
                        .and_then(Value::as_bool),
                    updated_at: modified.to_rfc3339(),
                });
            }
        }

        items.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        let total = items.len();
        // page is caller-supplied and unbounded above; saturate instead of
        // overflowing so absurd pages just land past the end.
        let start = page.saturating_sub(1).saturating_mul(page_size);
        let paged: Vec<ContentItemSummary> =
            items.into_iter().skip(start).take(page_size).collect();

        Ok(ContentListResponse {
            items: paged,
            page,
            page_size,
            total,
        })
    }

    /// Create a new document from a payload, deriving the slug from the
    /// title and appending `-2`, `-3`, ... until the filename is free.
    pub fn create(&self, payload: &ContentCreateRequest) -> Result<ContentDocument, ApiError> {
        let content_type = payload.content_type;
        let target_dir = self.content_dir(content_type).to_path_buf();
        fs::create_dir_all(&target_dir)?;

        let title = payload.title.trim().to_string();
        let base_slug = slugify(&title);

        let date_value = payload
            .date
            .clone()
            .unwrap_or_else(|| Utc::now().date_naive().to_string());

        let body = match &payload.body {
            Some(body) => body.clone(),
            None => compose_body(payload.comment.as_deref(), payload.link.as_deref()),
        };

        let mut fm = Mapping::new();
        fm.insert(
            Value::String("title".to_string()),
            Value::String(title.clone()),
        );
        fm.insert(
            Value::String("date".to_string()),
            Value::String(date_value),
        );
        fm.insert(
            Value::String("categories".to_string()),
            Value::Sequence(
                payload
                    .categories
                    .iter()
                    .map(|c| Value::String(c.clone()))
                    .collect(),
            ),
        );
        fm.insert(Value::String("draft".to_string()), Value::Bool(payload.draft));

        let content = frontmatter::serialize(&fm, &body)?;

        // Slug selection and the write happen under the same lock so a
        // concurrent create can never claim or overwrite the same file.
        let file_name = {
            let _guard = self.write_lock.lock();
            let mut slug = base_slug.clone();
            let mut suffix = 2;
            while target_dir.join(format!("{}.md", slug)).exists() {
                slug = format!("{}-{}", base_slug, suffix);
                suffix += 1;
            }
            let file_name = format!("{}.md", slug);
            write_atomic(&target_dir.join(&file_name), &content)?;
            file_name
        };

        let id = format!("{}/{}", content_type.as_str(), file_name);
        log::info!("[CONTENT] Created {}", id);
        self.get(&id)
    }

    /// Apply a partial update: fields absent from the payload keep their
    /// prior value. A supplied `body` replaces the body outright; otherwise
    /// a supplied `comment` or `link` recomposes the body from just those
    /// two fields, dropping whatever was not resupplied (known quirk).
    pub fn update(
        &self,
        id: &str,
        payload: &ContentUpdateRequest,
    ) -> Result<ContentDocument, ApiError> {
        let (_, file_path) = self.resolve_existing(id)?;

        let raw = fs::read_to_string(&file_path)?;
        let (mut fm, mut body) = frontmatter::split_front_matter(&raw)?;

        if let Some(title) = &payload.title {
            fm.insert(
                Value::String("title".to_string()),
                Value::String(title.trim().to_string()),
            );
        }
        if let Some(date) = &payload.date {
            fm.insert(
                Value::String("date".to_string()),
                Value::String(date.clone()),
            );
        }
        if let Some(categories) = &payload.categories {
            fm.insert(
                Value::String("categories".to_string()),
                Value::Sequence(
                    categories.iter().map(|c| Value::String(c.clone())).collect(),
                ),
            );
        }
        if let Some(draft) = payload.draft {
            fm.insert(Value::String("draft".to_string()), Value::Bool(draft));
        }

        if let Some(new_body) = &payload.body {
            body = new_body.clone();
        } else if payload.comment.is_some() || payload.link.is_some() {
            body = compose_body(payload.comment.as_deref(), payload.link.as_deref());
        }

        let content = frontmatter::serialize(&fm, &body)?;
        {
            let _guard = self.write_lock.lock();
            write_atomic(&file_path, &content)?;
        }

        log::info!("[CONTENT] Updated {}", id);
        self.get(id)
    }

    /// Remove a document.
    pub fn delete(&self, id: &str) -> Result<(), ApiError> {
        let (_, file_path) = self.resolve_existing(id)?;
        {
            let _guard = self.write_lock.lock();
            fs::remove_file(&file_path)?;
        }
        log::info!("[CONTENT] Deleted {}", id);
        Ok(())
    }
}

/// Derive a filesystem-safe slug from a title: NFKD-transliterate to ASCII,
/// lowercase, collapse non-alphanumeric runs to single hyphens.
pub fn slugify(value: &str) -> String {
    let ascii: String = value
        .nfkd()
        .filter(char::is_ascii)
        .collect::<String>()
        .to_lowercase();

    let mut slug = String::with_capacity(ascii.len());
    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        "untitled".to_string()
    } else {
        slug.to_string()
    }
}

/// Compose a body from optional comment and link parts: comment paragraph,
/// then a `[link](link)` line, joined by a blank line.
fn compose_body(comment: Option<&str>, link: Option<&str>) -> String {
    let mut chunks = Vec::new();
    if let Some(comment) = comment {
        let comment = comment.trim();
        if !comment.is_empty() {
            chunks.push(comment.to_string());
        }
    }
    if let Some(link) = link {
        let link = link.trim();
        if !link.is_empty() {
            chunks.push(format!("[{}]({})", link, link));
        }
    }
    chunks.join("\n\n")
}

/// Write via a temp sibling plus rename so readers never see a torn file.
fn write_atomic(path: &Path, content: &str) -> io::Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let tmp = parent.join(format!(".{}.tmp", Uuid::new_v4()));
    fs::write(&tmp, content)?;
    fs::rename(&tmp, path)
}

/// All markdown files under `dir`, recursively, in stable path order.
fn collect_markdown_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    fn visit(dir: &Path, files: &mut Vec<PathBuf>) -> io::Result<()> {
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_dir() {
                visit(&path, files)?;
            } else if path.extension().map(|e| e == "md").unwrap_or(false) {
                files.push(path);
            }
        }
        Ok(())
    }

    let mut files = Vec::new();
    visit(dir, &mut files)?;
    files.sort();
    Ok(files)
}

fn path_to_posix(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn value_to_display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => serde_yaml::to_string(other)
            .unwrap_or_default()
            .trim()
            .to_string(),
    }
}

fn mapping_to_json(mapping: &Mapping) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(mapping)
        .map_err(|e| ApiError::Internal(format!("Front matter not JSON-representable: {}", e)))
}
