// Upload storage
// Writes accepted uploads into the upload directory

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use super::error::UploadError;
use super::multipart::UploadedFile;

/// Bytes escaped in a URL path segment
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Upload directory plus the public URL prefix it is served under
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
    url_prefix: String,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>, url_prefix: &str) -> Self {
        let trimmed = url_prefix.trim_matches('/');
        Self {
            dir: dir.into(),
            url_prefix: format!("/{trimmed}"),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Public prefix without trailing slash, e.g. `/uploads`
    pub fn url_prefix(&self) -> &str {
        &self.url_prefix
    }

    /// Public URL of a stored file; the name is percent-encoded
    pub fn url_for(&self, file_name: &str) -> String {
        let segment = utf8_percent_encode(file_name, PATH_SEGMENT);
        if self.url_prefix == "/" {
            format!("/{segment}")
        } else {
            format!("{}/{segment}", self.url_prefix)
        }
    }

    /// Write the file to disk and return its public URL
    ///
    /// The data is flushed to stable storage before returning. An existing
    /// file with the same name is overwritten.
    pub async fn save(&self, upload: &UploadedFile) -> Result<String, UploadError> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(UploadError::Storage)?;

        let path = self.dir.join(&upload.file_name);
        let mut file = fs::File::create(&path)
            .await
            .map_err(UploadError::Storage)?;
        file.write_all(&upload.data)
            .await
            .map_err(UploadError::Storage)?;
        file.sync_all().await.map_err(UploadError::Storage)?;

        Ok(self.url_for(&upload.file_name))
    }
}
