// Multipart upload extraction
// Pulls the single `image` file out of a multipart/form-data body

use std::fmt;

use futures_util::Stream;
use hyper::body::Bytes;
use mime::Mime;
use multer::{Constraints, Multipart, SizeLimit};

use super::error::UploadError;
use super::policy::{sanitize_file_name, UploadPolicy};

/// Form field carrying the uploaded image
pub const FILE_FIELD: &str = "image";

/// A validated upload held in memory until it is stored
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<Mime>,
    pub data: Bytes,
}

impl fmt::Display for UploadedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} bytes, ", self.file_name, self.data.len())?;
        match &self.content_type {
            Some(mime) => write!(f, "{mime})"),
            None => f.write_str("no content type)"),
        }
    }
}

/// Read the uploaded image from a multipart body
///
/// Name and type are checked before any file data is read, and the size
/// limit is enforced while streaming, so a rejected file is never buffered
/// in full. Non-file fields are ignored. A file part under any other field
/// name, or a second file, is rejected.
pub async fn read_upload<S, O, E>(
    stream: S,
    boundary: &str,
    policy: &UploadPolicy,
    max_body_size: u64,
) -> Result<UploadedFile, UploadError>
where
    S: Stream<Item = Result<O, E>> + Send + 'static,
    O: Into<Bytes> + 'static,
    E: Into<Box<dyn std::error::Error + Send + Sync>> + 'static,
{
    let constraints =
        Constraints::new().size_limit(SizeLimit::new().whole_stream(max_body_size));
    let mut multipart = Multipart::with_constraints(stream, boundary, constraints);
    let mut upload: Option<UploadedFile> = None;

    while let Some(mut field) = multipart.next_field().await? {
        // Browsers send an empty filename when no file was chosen
        let raw_name = match field.file_name() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => continue,
        };

        let field_name = field.name().unwrap_or_default().to_string();
        if field_name != FILE_FIELD || upload.is_some() {
            return Err(UploadError::UnexpectedField(field_name));
        }

        let file_name = sanitize_file_name(&raw_name)?;
        let content_type = field.content_type().cloned();
        policy.check_file(&file_name, content_type.as_ref())?;

        let mut data = Vec::new();
        while let Some(chunk) = field.chunk().await? {
            policy.check_size((data.len() + chunk.len()) as u64)?;
            data.extend_from_slice(&chunk);
        }

        upload = Some(UploadedFile {
            file_name,
            content_type,
            data: Bytes::from(data),
        });
    }

    upload.ok_or(UploadError::NoFile)
}
