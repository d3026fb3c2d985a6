// Post types

use std::fmt;
use std::str::FromStr;

use super::error::FeedError;

/// Stable identifier of a post
///
/// Assigned once at creation and never reused, so a deleted post does not
/// shift the identity of the posts after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PostId(u64);

impl PostId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parse an `itemId` form value; surrounding whitespace is ignored
impl FromStr for PostId {
    type Err = FeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|_| FeedError::InvalidId(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostKind {
    Text,
    Image,
}

impl fmt::Display for PostKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Image => f.write_str("image"),
        }
    }
}

/// A single feed entry
///
/// `content` holds the raw text of a text post, or the public URL path of the
/// uploaded file for an image post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: PostId,
    pub kind: PostKind,
    pub content: String,
}
