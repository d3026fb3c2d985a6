//! Upload module
//!
//! The boundary an image passes before it can back an image post:
//! multipart extraction, type/size/filename policy, and storage on disk.

mod error;
mod multipart;
mod policy;
mod storage;

pub use error::UploadError;
pub use multipart::{read_upload, FILE_FIELD};
pub use policy::UploadPolicy;
pub use storage::UploadStore;
