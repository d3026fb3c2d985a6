//! HTTP protocol layer module
//!
//! Response builders, `ETag` validation and Content-Type lookup shared by
//! the page, form and static file handlers.

pub mod cache;
pub mod mime;
pub mod response;

pub use response::{
    build_304_response, build_400_response, build_404_response, build_405_response,
    build_413_response, build_cached_response, build_html_response, build_redirect_response,
};
