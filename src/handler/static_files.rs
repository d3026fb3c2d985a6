//! Static file serving module
//!
//! Serves uploaded images under the upload URL prefix and any other asset
//! from the public directory.

use crate::config::AppState;
use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use percent_encoding::percent_decode_str;
use std::path::Path;
use tokio::fs;

/// Same-name uploads overwrite the stored file
const UPLOAD_CACHE_CONTROL: &str = "no-cache";
const PUBLIC_CACHE_CONTROL: &str = "public, max-age=3600";

/// Serve the file a GET/HEAD path refers to, or 404
pub async fn serve(ctx: &RequestContext<'_>, state: &AppState) -> Response<Full<Bytes>> {
    let path = match percent_decode_str(ctx.path).decode_utf8() {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!("Invalid UTF-8 in path {}: {e}", ctx.path));
            return http::build_404_response();
        }
    };

    let (found, cache_control) = match strip_url_prefix(&path, state.uploads.url_prefix()) {
        Some(relative) => (
            load_from_directory(state.uploads.dir(), relative).await,
            UPLOAD_CACHE_CONTROL,
        ),
        None => (
            load_from_directory(Path::new(&state.config.board.public_dir), &path).await,
            PUBLIC_CACHE_CONTROL,
        ),
    };

    match found {
        Some((content, content_type)) => build_static_file_response(
            content,
            content_type,
            cache_control,
            ctx.if_none_match.as_deref(),
            ctx.is_head,
        ),
        None => http::build_404_response(),
    }
}

/// Path below `prefix`, if the request path lies under it
fn strip_url_prefix<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    if prefix == "/" {
        return Some(path.trim_start_matches('/'));
    }
    path.strip_prefix(prefix)?.strip_prefix('/')
}

/// Load a file below `dir`
///
/// Returns `None` for missing files, directories, and paths that resolve
/// outside `dir`.
pub async fn load_from_directory(dir: &Path, relative: &str) -> Option<(Vec<u8>, &'static str)> {
    let relative = relative.trim_start_matches('/');
    if relative.is_empty() {
        return None;
    }

    let dir_canonical = match fs::canonicalize(dir).await {
        Ok(p) => p,
        Err(e) => {
            logger::log_debug(&format!(
                "Static directory not accessible '{}': {e}",
                dir.display()
            ));
            return None;
        }
    };

    // File not found is common (404), no need to log
    let file_canonical = fs::canonicalize(dir.join(relative)).await.ok()?;
    if !file_canonical.starts_with(&dir_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {relative} -> {}",
            file_canonical.display()
        ));
        return None;
    }
    if !fs::metadata(&file_canonical).await.ok()?.is_file() {
        return None;
    }

    let content = match fs::read(&file_canonical).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {e}",
                file_canonical.display()
            ));
            return None;
        }
    };

    let content_type = mime::get_content_type(file_canonical.extension().and_then(|e| e.to_str()));
    Some((content, content_type))
}

/// Build static file response with `ETag` revalidation
fn build_static_file_response(
    data: Vec<u8>,
    content_type: &str,
    cache_control: &str,
    if_none_match: Option<&str>,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let etag = cache::generate_etag(&data);

    if cache::check_etag_match(if_none_match, &etag) {
        return http::build_304_response(&etag, cache_control);
    }

    http::build_cached_response(Bytes::from(data), content_type, &etag, cache_control, is_head)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_url_prefix() {
        assert_eq!(strip_url_prefix("/uploads/a.png", "/uploads"), Some("a.png"));
        assert_eq!(strip_url_prefix("/uploads", "/uploads"), None);
        assert_eq!(strip_url_prefix("/uploadsx/a.png", "/uploads"), None);
        assert_eq!(strip_url_prefix("/style.css", "/uploads"), None);
        assert_eq!(strip_url_prefix("/a.png", "/"), Some("a.png"));
    }

    #[tokio::test]
    async fn test_load_from_directory() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("cat.png"), b"png").unwrap();
        std::fs::create_dir(tmp.path().join("sub")).unwrap();

        let (content, content_type) = load_from_directory(tmp.path(), "cat.png").await.unwrap();
        assert_eq!(content, b"png");
        assert_eq!(content_type, "image/png");

        assert!(load_from_directory(tmp.path(), "missing.png").await.is_none());
        assert!(load_from_directory(tmp.path(), "sub").await.is_none());
        assert!(load_from_directory(tmp.path(), "").await.is_none());
    }

    #[tokio::test]
    async fn test_blocks_traversal() {
        let tmp = tempfile::tempdir().unwrap();
        let served = tmp.path().join("served");
        std::fs::create_dir(&served).unwrap();
        std::fs::write(tmp.path().join("secret.txt"), b"secret").unwrap();

        assert!(load_from_directory(&served, "../secret.txt").await.is_none());
    }

    #[test]
    fn test_etag_revalidation() {
        let first =
            build_static_file_response(b"img".to_vec(), "image/png", UPLOAD_CACHE_CONTROL, None, false);
        assert_eq!(first.status(), 200);
        let etag = first.headers()["ETag"].to_str().unwrap().to_string();

        let second = build_static_file_response(
            b"img".to_vec(),
            "image/png",
            UPLOAD_CACHE_CONTROL,
            Some(&etag),
            false,
        );
        assert_eq!(second.status(), 304);
        assert_eq!(second.headers()["Cache-Control"], "no-cache");
    }
}
