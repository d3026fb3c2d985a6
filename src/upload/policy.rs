// Upload policy
// Decides which files may become image posts

use mime::Mime;
use std::path::Path;

use super::error::UploadError;

/// Image formats accepted both as file extension and as MIME subtype
const ALLOWED_IMAGE_TYPES: [&str; 4] = ["jpeg", "jpg", "png", "gif"];

#[derive(Debug, Clone, Copy)]
pub struct UploadPolicy {
    max_file_size: u64,
}

impl UploadPolicy {
    pub const fn new(max_file_size: u64) -> Self {
        Self { max_file_size }
    }

    /// Check the file name and declared content type of an upload
    ///
    /// Both the extension and the MIME type must name an allowed image
    /// format; a missing content type is rejected.
    pub fn check_file(&self, file_name: &str, content_type: Option<&Mime>) -> Result<(), UploadError> {
        let ext_ok = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(is_allowed_type);

        let mime_ok = content_type
            .is_some_and(|m| m.type_() == mime::IMAGE && is_allowed_type(m.subtype().as_str()));

        if ext_ok && mime_ok {
            Ok(())
        } else {
            Err(UploadError::NotAnImage)
        }
    }

    /// Check the number of bytes received so far against the size limit
    pub const fn check_size(&self, size: u64) -> Result<(), UploadError> {
        if size > self.max_file_size {
            return Err(UploadError::TooLarge {
                limit: self.max_file_size,
            });
        }
        Ok(())
    }
}

fn is_allowed_type(name: &str) -> bool {
    ALLOWED_IMAGE_TYPES
        .iter()
        .any(|t| t.eq_ignore_ascii_case(name))
}

/// Reduce a client-supplied file name to its final path component
///
/// Any directory part is dropped, so an upload can never be written outside
/// the upload directory. The remaining name is kept unchanged.
pub fn sanitize_file_name(raw: &str) -> Result<String, UploadError> {
    let name = raw.rsplit(['/', '\\']).next().unwrap_or_default().trim();
    match name {
        "" | "." | ".." => Err(UploadError::InvalidFileName(raw.to_string())),
        _ => Ok(name.to_string()),
    }
}
