//! HTTP cache control module
//!
//! `ETag` generation and `If-None-Match` handling for static files.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Quoted `ETag` of the content, e.g. `"abc123def"`
pub fn generate_etag(content: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    let v = hasher.finish();
    format!("\"{v:x}\"")
}

/// True when the client's `If-None-Match` covers `etag` (list or `*`)
pub fn check_etag_match(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|client_etag| {
        client_etag
            .split(',')
            .any(|e| e.trim() == etag || e.trim() == "*")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_etag_tracks_content() {
        let etag = generate_etag(b"png bytes");
        assert!(etag.starts_with('"') && etag.ends_with('"'));
        assert_eq!(etag, generate_etag(b"png bytes"));
        assert_ne!(etag, generate_etag(b"other bytes"));
    }

    #[test]
    fn test_check_etag_match() {
        let etag = "\"abc123\"";
        assert!(check_etag_match(Some("\"abc123\""), etag));
        assert!(check_etag_match(Some("\"xyz\", \"abc123\""), etag));
        assert!(check_etag_match(Some("*"), etag));
        assert!(!check_etag_match(Some("\"different\""), etag));
        assert!(!check_etag_match(None, etag));
    }
}
