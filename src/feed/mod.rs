//! Feed module
//!
//! In-memory feed of text and image posts. The store is owned by
//! `AppState` and every mutation reports its outcome explicitly.

mod error;
mod post;
mod store;

pub use error::FeedError;
pub use post::{Post, PostId, PostKind};
pub use store::FeedStore;
