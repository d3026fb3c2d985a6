// Upload error types
// The Display text of each variant is the message shown on the re-rendered feed

use thiserror::Error;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("No file selected!")]
    NoFile,

    #[error("Only image files are allowed")]
    NotAnImage,

    #[error("File too large")]
    TooLarge { limit: u64 },

    #[error("Unexpected field")]
    UnexpectedField(String),

    #[error("Invalid file name")]
    InvalidFileName(String),

    #[error("{0}")]
    Multipart(#[from] multer::Error),

    #[error("Failed to store upload: {0}")]
    Storage(#[source] std::io::Error),
}
