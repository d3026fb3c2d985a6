//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: body size check, route
//! dispatch and access logging.

use crate::config::AppState;
use crate::handler::{board, static_files};
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderValue, SERVER};
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Paths handled by the board itself rather than static files
const BOARD_PATHS: [&str; 5] = ["/", "/submit", "/upload", "/delete", "/update"];

/// Request information needed for static file serving
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub if_none_match: Option<String>,
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    remote_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body<Data = Bytes> + Send + 'static,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>> + 'static,
{
    let started = Instant::now();
    let entry = state
        .config
        .logging
        .access_log
        .then(|| start_access_entry(&req, remote_addr));

    let mut response = route_request(req, &state).await;
    if let Ok(server) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(SERVER, server);
    }

    if let Some(mut entry) = entry {
        entry.status = response.status().as_u16();
        entry.body_bytes = response
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Route request based on method and path
async fn route_request<B>(req: Request<B>, state: &Arc<AppState>) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes> + Send + 'static,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>> + 'static,
{
    if let Some(resp) = check_body_size(&req, state.config.http.max_body_size) {
        return resp;
    }

    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let is_head = method == Method::HEAD;

    match (method, path.as_str()) {
        (Method::GET | Method::HEAD, "/") => board::show_feed(state, is_head).await,
        (Method::POST, "/submit") => board::submit_text(req, state).await,
        (Method::POST, "/upload") => board::upload_image(req, state).await,
        (Method::POST, "/delete") => board::delete_post(req, state).await,
        (Method::POST, "/update") => board::update_post(req, state).await,
        (method, p) if BOARD_PATHS.contains(&p) => {
            logger::log_warning(&format!("Method not allowed: {method} {p}"));
            http::build_405_response(allowed_methods(p))
        }
        (Method::GET | Method::HEAD, p) => {
            let ctx = RequestContext {
                path: p,
                is_head,
                if_none_match: req
                    .headers()
                    .get("if-none-match")
                    .and_then(|v| v.to_str().ok())
                    .map(ToString::to_string),
            };
            static_files::serve(&ctx, state).await
        }
        (method, p) => {
            logger::log_warning(&format!("Method not allowed: {method} {p}"));
            http::build_405_response("GET, HEAD")
        }
    }
}

/// `Allow` header value for a board path
fn allowed_methods(path: &str) -> &'static str {
    if path == "/" {
        "GET, HEAD"
    } else {
        "POST"
    }
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size<B>(req: &Request<B>, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let content_length = req.headers().get("content-length")?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_error(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

fn start_access_entry<B>(req: &Request<B>, remote_addr: SocketAddr) -> AccessLogEntry {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        remote_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = version_label(req.version()).to_string();
    entry.referer = header("referer");
    entry.user_agent = header("user-agent");
    entry
}

fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}
