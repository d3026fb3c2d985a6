//! Logger module
//!
//! Logging utilities for the board server:
//! - Server lifecycle logging
//! - Access logging in several formats
//! - Feed activity, warnings and errors
//! - Optional file-based output

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::Config;
use std::net::SocketAddr;

/// Initialize the logger with configuration
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
        config.logging.level.eq_ignore_ascii_case("debug"),
    )
}

fn write_info(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => println!("{message}"),
    }
}

fn write_error(message: &str) {
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    write_info("======================================");
    write_info("Bulletin board started");
    write_info(&format!("Listening on: http://{addr}"));
    write_info(&format!("Log level: {}", config.logging.level));
    if let Some(workers) = config.server.workers {
        write_info(&format!("Worker threads: {workers}"));
    }
    write_info(&format!(
        "Uploads: {} -> {}",
        config.board.upload_url_prefix, config.board.upload_dir
    ));
    write_info(&format!("Static files: {}", config.board.public_dir));
    if let Some(ref path) = config.logging.access_log_file {
        write_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(&format!("Error log: {path}"));
    }
    write_info("======================================\n");
}

pub fn log_shutdown() {
    write_info("[Shutdown] Stopped accepting connections");
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    log_debug(&format!("[Connection] Accepted from: {peer_addr}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_info(message: &str) {
    write_info(&format!("[INFO] {message}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

/// Only written when `logging.level` is `debug`
pub fn log_debug(message: &str) {
    if writer::get().is_some_and(writer::LogWriter::debug_enabled) {
        write_info(&format!("[DEBUG] {message}"));
    }
}

/// Log a feed mutation
pub fn log_feed(message: &str) {
    write_info(&format!("[Feed] {message}"));
}

/// Log a request the board refused to act on
pub fn log_rejected(action: &str, reason: &impl std::fmt::Display) {
    log_warning(&format!("{action} rejected: {reason}"));
}

pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_info(&entry.format(format));
}
