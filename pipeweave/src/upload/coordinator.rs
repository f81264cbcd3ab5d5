//! Three-phase dataset upload coordinator.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use super::validation::validate_upload;
use crate::api::types::{DatasetRecord, UploadUrlRequest, UploadUrlResponse};
use crate::errors::Result;

/// Synthetic progress checkpoints reported during an upload, in percent.
///
/// Progress is not proportional to byte transfer: 0 at issuance, 20 after
/// the signed URL is acquired, 80 after the storage PUT, 90 after the
/// content hash is computed, 100 after finalize.
pub const UPLOAD_CHECKPOINTS: [u8; 5] = [0, 20, 80, 90, 100];

/// The network operations the coordinator sequences.
///
/// The API client implements this; tests inject failures per phase.
#[async_trait]
pub trait UploadTransport: Send + Sync {
    /// Phase 1: request a signed upload URL and provisional dataset record.
    async fn request_upload_url(&self, request: &UploadUrlRequest) -> Result<UploadUrlResponse>;

    /// Phase 2: transfer the file bytes directly to the storage URL.
    async fn put_object(&self, url: &str, content_type: &str, body: &[u8]) -> Result<()>;

    /// Phase 3: finalize the dataset record with the content hash.
    async fn complete_upload(&self, dataset_id: &str, file_hash: &str) -> Result<DatasetRecord>;
}

/// Orchestrates the direct-to-storage upload protocol.
///
/// Failure at any phase aborts the sequence; no retry or rollback is
/// attempted, so a finalize failure after a successful PUT can leave the
/// provisional record dangling server-side. There is no cancellation:
/// once started the upload runs to completion or first failure.
#[derive(Debug)]
pub struct DatasetUploader<'a, T: UploadTransport + ?Sized> {
    transport: &'a T,
}

impl<'a, T: UploadTransport + ?Sized> DatasetUploader<'a, T> {
    /// Creates an uploader over a transport.
    #[must_use]
    pub fn new(transport: &'a T) -> Self {
        Self { transport }
    }

    /// Uploads a file, reporting progress at the fixed checkpoints.
    ///
    /// Validates client-side first; validation failures never reach the
    /// transport and report no progress.
    pub async fn upload(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: &[u8],
        mut on_progress: impl FnMut(u8) + Send,
    ) -> Result<DatasetRecord> {
        validate_upload(file_name, bytes.len() as u64)?;

        on_progress(0);
        let grant = self
            .transport
            .request_upload_url(&UploadUrlRequest {
                filename: file_name.to_string(),
                content_type: content_type.to_string(),
                size_bytes: bytes.len() as u64,
            })
            .await?;
        debug!(dataset_id = %grant.dataset_id, "signed upload url acquired");
        on_progress(20);

        self.transport
            .put_object(&grant.upload_url, content_type, bytes)
            .await?;
        on_progress(80);

        let file_hash = hex::encode(Sha256::digest(bytes));
        on_progress(90);

        let record = self
            .transport
            .complete_upload(&grant.dataset_id, &file_hash)
            .await?;
        on_progress(100);

        info!(
            dataset_id = %record.id,
            size_bytes = record.file_size_bytes,
            "dataset upload finalized"
        );
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::DatasetStatus;
    use crate::errors::PipeweaveError;
    use chrono::Utc;
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Phase {
        UrlRequest,
        Put,
        Complete,
    }

    /// Records phase invocations and optionally fails at one phase.
    struct FakeTransport {
        fail_at: Option<Phase>,
        calls: Mutex<Vec<Phase>>,
        hashes: Mutex<Vec<String>>,
    }

    impl FakeTransport {
        fn new(fail_at: Option<Phase>) -> Self {
            Self {
                fail_at,
                calls: Mutex::new(Vec::new()),
                hashes: Mutex::new(Vec::new()),
            }
        }

        fn check(&self, phase: Phase) -> Result<()> {
            self.calls.lock().push(phase);
            if self.fail_at == Some(phase) {
                Err(PipeweaveError::Network(format!("injected failure at {phase:?}")))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl UploadTransport for FakeTransport {
        async fn request_upload_url(
            &self,
            request: &UploadUrlRequest,
        ) -> Result<UploadUrlResponse> {
            self.check(Phase::UrlRequest)?;
            Ok(UploadUrlResponse {
                upload_url: "https://storage.example/put/abc".to_string(),
                dataset_id: format!("ds-{}", request.filename),
                expires_at: Utc::now(),
            })
        }

        async fn put_object(&self, _url: &str, _content_type: &str, _body: &[u8]) -> Result<()> {
            self.check(Phase::Put)
        }

        async fn complete_upload(
            &self,
            dataset_id: &str,
            file_hash: &str,
        ) -> Result<DatasetRecord> {
            self.check(Phase::Complete)?;
            self.hashes.lock().push(file_hash.to_string());
            Ok(DatasetRecord {
                id: dataset_id.to_string(),
                name: "iris.csv".to_string(),
                status: DatasetStatus::Uploaded,
                file_size_bytes: 3,
                num_rows: None,
                num_columns: None,
                created_at: Utc::now(),
            })
        }
    }

    #[tokio::test]
    async fn test_phases_run_in_order_with_exact_checkpoints() {
        let transport = FakeTransport::new(None);
        let uploader = DatasetUploader::new(&transport);
        let mut progress = Vec::new();

        let record = uploader
            .upload("iris.csv", "text/csv", b"a,b", |pct| progress.push(pct))
            .await
            .unwrap();

        assert_eq!(progress, UPLOAD_CHECKPOINTS.to_vec());
        assert_eq!(record.id, "ds-iris.csv");
        assert_eq!(
            *transport.calls.lock(),
            vec![Phase::UrlRequest, Phase::Put, Phase::Complete]
        );
    }

    #[tokio::test]
    async fn test_hash_is_lowercase_hex_sha256() {
        let transport = FakeTransport::new(None);
        let uploader = DatasetUploader::new(&transport);
        uploader
            .upload("iris.csv", "text/csv", b"abc", |_| {})
            .await
            .unwrap();

        let hashes = transport.hashes.lock();
        assert_eq!(
            hashes[0],
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[tokio::test]
    async fn test_storage_failure_prevents_finalize() {
        let transport = FakeTransport::new(Some(Phase::Put));
        let uploader = DatasetUploader::new(&transport);
        let mut progress = Vec::new();

        let err = uploader
            .upload("iris.csv", "text/csv", b"a,b", |pct| progress.push(pct))
            .await
            .unwrap_err();

        assert!(matches!(err, PipeweaveError::Network(_)));
        assert_eq!(progress, vec![0, 20]);
        assert_eq!(*transport.calls.lock(), vec![Phase::UrlRequest, Phase::Put]);
    }

    #[tokio::test]
    async fn test_validation_failure_never_touches_transport() {
        let transport = FakeTransport::new(None);
        let uploader = DatasetUploader::new(&transport);
        let mut progress = Vec::new();

        let err = uploader
            .upload("model.xlsx", "application/vnd.ms-excel", b"x", |pct| {
                progress.push(pct);
            })
            .await
            .unwrap_err();

        assert!(matches!(err, PipeweaveError::Validation(_)));
        assert!(progress.is_empty());
        assert!(transport.calls.lock().is_empty());
    }
}
