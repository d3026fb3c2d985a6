// Feed error types

use thiserror::Error;

use super::post::PostId;

/// Reasons a feed operation was rejected without changing the feed
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FeedError {
    #[error("text post is empty")]
    EmptyText,

    #[error("updated content is empty")]
    EmptyContent,

    #[error("invalid item id: '{0}'")]
    InvalidId(String),

    #[error("no post with id {0}")]
    NotFound(PostId),
}
