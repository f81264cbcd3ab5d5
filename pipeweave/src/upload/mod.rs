//! Dataset upload.
//!
//! Client-side validation plus the three-phase direct-to-storage upload
//! protocol: request a signed URL, PUT the bytes, then finalize the
//! provisional record with a content hash.

mod coordinator;
mod validation;

pub use coordinator::{DatasetUploader, UploadTransport, UPLOAD_CHECKPOINTS};
pub use validation::{validate_upload, MAX_UPLOAD_BYTES};
