//! Client-side upload validation.
//!
//! Rejections here never reach the network layer.

use std::path::Path;

use crate::errors::{PipeweaveError, Result};

/// Maximum accepted file size: 500 MiB.
pub const MAX_UPLOAD_BYTES: u64 = 500 * 1024 * 1024;

/// File extensions the backend can ingest.
const ALLOWED_EXTENSIONS: [&str; 2] = ["csv", "parquet"];

/// Validates a candidate upload before any network call.
///
/// Checks filename presence, a supported extension, and a non-zero size
/// within the limit.
pub fn validate_upload(file_name: &str, size_bytes: u64) -> Result<()> {
    if file_name.trim().is_empty() {
        return Err(PipeweaveError::Validation(
            "filename cannot be empty".to_string(),
        ));
    }

    let extension = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match extension {
        Some(ext) if ALLOWED_EXTENSIONS.contains(&ext.as_str()) => {}
        _ => {
            return Err(PipeweaveError::Validation(format!(
                "unsupported file type for '{file_name}': expected one of {ALLOWED_EXTENSIONS:?}"
            )));
        }
    }

    if size_bytes == 0 {
        return Err(PipeweaveError::Validation(
            "file is empty".to_string(),
        ));
    }
    if size_bytes > MAX_UPLOAD_BYTES {
        return Err(PipeweaveError::Validation(format!(
            "file size {size_bytes} exceeds the {MAX_UPLOAD_BYTES} byte limit"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_csv_and_parquet() {
        validate_upload("iris.csv", 1024).unwrap();
        validate_upload("events.parquet", 1024).unwrap();
        validate_upload("UPPER.CSV", 1024).unwrap();
    }

    #[test]
    fn test_rejects_unsupported_extension() {
        let err = validate_upload("model.xlsx", 1024).unwrap_err();
        assert!(matches!(err, PipeweaveError::Validation(_)));
        assert!(validate_upload("noextension", 1024).is_err());
    }

    #[test]
    fn test_rejects_empty_filename_and_empty_file() {
        assert!(validate_upload("", 1024).is_err());
        assert!(validate_upload("  ", 1024).is_err());
        assert!(validate_upload("iris.csv", 0).is_err());
    }

    #[test]
    fn test_rejects_oversized_file() {
        assert!(validate_upload("iris.csv", MAX_UPLOAD_BYTES).is_ok());
        assert!(validate_upload("iris.csv", MAX_UPLOAD_BYTES + 1).is_err());
    }
}
