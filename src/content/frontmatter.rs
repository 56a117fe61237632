//! Split and serialize `---`-delimited YAML front matter.
//!
//! Serialization always emits the standard fields first in a fixed order,
//! then every other key in its original encounter order (serde_yaml's
//! `Mapping` preserves insertion order). A file without an opening `---`
//! line is all body with empty front matter.

use serde_yaml::{Mapping, Value};

use crate::error::ApiError;

/// Standard keys, serialized first and in this order when present.
pub const STANDARD_FIELDS: [&str; 4] = ["title", "date", "categories", "draft"];

/// Split raw file contents into (front matter, body).
///
/// The opening delimiter must be the literal first line `---`; the block
/// ends at the next line that trims to `---`. Anything else means the whole
/// file is body. Fails only when the delimited block is not a YAML mapping.
pub fn split_front_matter(raw: &str) -> Result<(Mapping, String), ApiError> {
    if !raw.starts_with("---\n") {
        return Ok((Mapping::new(), raw.to_string()));
    }

    let lines: Vec<&str> = raw.lines().collect();
    let closing_idx = lines
        .iter()
        .enumerate()
        .skip(1)
        .find(|(_, line)| line.trim() == "---")
        .map(|(idx, _)| idx);

    let Some(closing_idx) = closing_idx else {
        return Ok((Mapping::new(), raw.to_string()));
    };

    let yaml_text = lines[1..closing_idx].join("\n");
    let yaml_text = yaml_text.trim();
    // Drop the blank separator line serialization always inserts, so
    // parse(serialize(fm, body)) reproduces the body exactly.
    let body = lines[closing_idx + 1..]
        .join("\n")
        .trim_start_matches('\n')
        .to_string();

    if yaml_text.is_empty() {
        return Ok((Mapping::new(), body));
    }

    let parsed: Value =
        serde_yaml::from_str(yaml_text).map_err(|_| ApiError::InvalidFrontMatter)?;
    match parsed {
        Value::Mapping(mapping) => Ok((mapping, body)),
        _ => Err(ApiError::InvalidFrontMatter),
    }
}

/// Reorder a mapping so standard fields come first, preserving the original
/// order of everything else.
pub fn ordered_front_matter(frontmatter: &Mapping) -> Mapping {
    let mut ordered = Mapping::new();
    for field in STANDARD_FIELDS {
        let key = Value::String(field.to_string());
        if let Some(value) = frontmatter.get(&key) {
            ordered.insert(key, value.clone());
        }
    }
    for (key, value) in frontmatter {
        if !ordered.contains_key(key) {
            ordered.insert(key.clone(), value.clone());
        }
    }
    ordered
}

/// Serialize front matter and body back into file contents.
///
/// Body is trimmed of trailing whitespace and followed by exactly one
/// newline when non-empty; an empty body ends the file at the closing `---`.
pub fn serialize(frontmatter: &Mapping, body: &str) -> Result<String, ApiError> {
    let ordered = ordered_front_matter(frontmatter);
    let yaml_text = serde_yaml::to_string(&ordered)
        .map_err(|e| ApiError::Internal(format!("Failed to serialize front matter: {}", e)))?;
    let yaml_text = yaml_text.trim();

    let clean_body = body.trim_end();
    if clean_body.is_empty() {
        Ok(format!("---\n{}\n---\n", yaml_text))
    } else {
        Ok(format!("---\n{}\n---\n\n{}\n", yaml_text, clean_body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn string_key(s: &str) -> Value {
        Value::String(s.to_string())
    }

    #[test]
    fn test_split_with_front_matter() {
        let raw = "---\ntitle: Hello\ndraft: true\n---\n\n# Heading\n\nBody text.\n";
        let (fm, body) = split_front_matter(raw).unwrap();
        assert_eq!(fm.get(string_key("title")), Some(&string_key("Hello")));
        assert_eq!(fm.get(string_key("draft")), Some(&Value::Bool(true)));
        assert_eq!(body, "# Heading\n\nBody text.");
    }

    #[test]
    fn test_split_without_front_matter() {
        let raw = "# Just a heading\n\nSome text.\n";
        let (fm, body) = split_front_matter(raw).unwrap();
        assert!(fm.is_empty());
        assert_eq!(body, raw);
    }

    #[test]
    fn test_split_unclosed_block_is_all_body() {
        let raw = "---\ntitle: Hello\nno closing delimiter";
        let (fm, body) = split_front_matter(raw).unwrap();
        assert!(fm.is_empty());
        assert_eq!(body, raw);
    }

    #[test]
    fn test_split_rejects_non_mapping_yaml() {
        let raw = "---\n- just\n- a\n- list\n---\nbody";
        assert!(matches!(
            split_front_matter(raw),
            Err(ApiError::InvalidFrontMatter)
        ));
    }

    #[test]
    fn test_split_empty_block() {
        let raw = "---\n---\nbody here";
        let (fm, body) = split_front_matter(raw).unwrap();
        assert!(fm.is_empty());
        assert_eq!(body, "body here");
    }

    #[test]
    fn test_serialize_standard_fields_first() {
        let mut fm = Mapping::new();
        fm.insert(string_key("custom"), string_key("value"));
        fm.insert(string_key("draft"), Value::Bool(false));
        fm.insert(string_key("title"), string_key("My Post"));

        let out = serialize(&fm, "Body").unwrap();
        let title_pos = out.find("title:").unwrap();
        let draft_pos = out.find("draft:").unwrap();
        let custom_pos = out.find("custom:").unwrap();
        assert!(title_pos < draft_pos);
        assert!(draft_pos < custom_pos);
    }

    #[test]
    fn test_serialize_empty_body_ends_at_delimiter() {
        let mut fm = Mapping::new();
        fm.insert(string_key("title"), string_key("T"));
        let out = serialize(&fm, "   \n\n").unwrap();
        assert!(out.ends_with("---\n"));
        assert!(!out.contains("\n\n"));
    }

    #[test]
    fn test_round_trip_is_stable() {
        let mut fm = Mapping::new();
        fm.insert(string_key("extra"), Value::Number(42.into()));
        fm.insert(string_key("title"), string_key("Röund Trip"));
        fm.insert(
            string_key("categories"),
            Value::Sequence(vec![string_key("a"), string_key("b")]),
        );

        let body = "Some **markdown** body.\n\nSecond paragraph.";
        let once = serialize(&fm, body).unwrap();
        let (parsed_fm, parsed_body) = split_front_matter(&once).unwrap();
        assert_eq!(parsed_body, body);
        assert_eq!(
            parsed_fm.get(string_key("title")),
            Some(&string_key("Röund Trip"))
        );

        // Re-serializing the parsed result reproduces the file byte for byte
        let twice = serialize(&parsed_fm, &parsed_body).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_unicode_preserved() {
        let mut fm = Mapping::new();
        fm.insert(string_key("title"), string_key("日本語のタイトル"));
        let out = serialize(&fm, "").unwrap();
        assert!(out.contains("日本語のタイトル"));
    }
}
