//! HTTP response building module
//!
//! Builders for the responses the board sends.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

/// Build 304 Not Modified response
pub fn build_304_response(etag: &str, cache_control: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(304)
        .header("ETag", etag)
        .header("Cache-Control", cache_control)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("304", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

pub fn build_400_response(message: &str) -> Response<Full<Bytes>> {
    build_text_response(400, format!("400 Bad Request: {message}"))
}

pub fn build_404_response() -> Response<Full<Bytes>> {
    build_text_response(404, "404 Not Found".to_string())
}

/// Build 405 Method Not Allowed response
pub fn build_405_response(allow: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(405)
        .header("Content-Type", "text/plain")
        .header("Allow", allow)
        .body(Full::new(Bytes::from("405 Method Not Allowed")))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            Response::new(Full::new(Bytes::from("405 Method Not Allowed")))
        })
}

pub fn build_413_response() -> Response<Full<Bytes>> {
    build_text_response(413, "413 Payload Too Large".to_string())
}

/// Build 302 redirect response
pub fn build_redirect_response(target: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(302)
        .header("Location", target)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from("Redirecting...")))
        .unwrap_or_else(|e| {
            log_build_error("302", &e);
            Response::new(Full::new(Bytes::from("Redirecting...")))
        })
}

/// Build HTML page response
///
/// The page reflects live feed state, so it is never cached.
pub fn build_html_response(content: String, is_head: bool) -> Response<Full<Bytes>> {
    let content_length = content.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(content)
    };

    Response::builder()
        .status(200)
        .header("Content-Type", "text/html; charset=utf-8")
        .header("Content-Length", content_length)
        .header("Cache-Control", "no-store")
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("HTML", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build static file response with cache validators
pub fn build_cached_response(
    data: Bytes,
    content_type: &str,
    etag: &str,
    cache_control: &str,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = data.len();
    let body = if is_head { Bytes::new() } else { data };

    Response::builder()
        .status(200)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .header("ETag", etag)
        .header("Cache-Control", cache_control)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

fn build_text_response(status: u16, text: String) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from(text.clone())))
        .unwrap_or_else(|e| {
            log_build_error(&status.to_string(), &e);
            Response::new(Full::new(Bytes::from(text)))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
