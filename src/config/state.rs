// Application state module
// Shared state handed to every request handler

use tokio::sync::RwLock;

use super::types::Config;
use crate::feed::FeedStore;
use crate::upload::{UploadPolicy, UploadStore};

/// Application state
pub struct AppState {
    pub config: Config,
    /// The feed; every read and mutation goes through this lock
    pub feed: RwLock<FeedStore>,
    pub uploads: UploadStore,
    pub upload_policy: UploadPolicy,
}

impl AppState {
    /// Create state with an empty feed
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
            feed: RwLock::new(FeedStore::new()),
            uploads: UploadStore::new(&config.board.upload_dir, &config.board.upload_url_prefix),
            upload_policy: UploadPolicy::new(config.board.max_upload_size),
        }
    }
}
