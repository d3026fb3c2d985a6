//! View module
//!
//! Server-side rendering of the board page.

mod escape;
mod page;

pub use page::render_feed_page;
