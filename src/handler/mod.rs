//! Request handler module
//!
//! Routes requests to the board handlers or to static file serving.

mod board;
mod form;
pub mod router;
mod static_files;

// Re-export main entry point
pub use router::handle_request;
