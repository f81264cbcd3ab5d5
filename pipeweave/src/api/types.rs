//! Wire types for the PipeWeave REST API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Dataset processing status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetStatus {
    /// Provisional record created, bytes not yet in storage.
    Uploading,
    /// Bytes landed and the record was finalized.
    Uploaded,
    /// Server-side validation in progress.
    Validating,
    /// Validation passed.
    Validated,
    /// Upload or validation failed.
    Failed,
}

/// Cursor-based pagination metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaginationMeta {
    /// Cursor for the next page; `None` on the last page.
    #[serde(default)]
    pub next_cursor: Option<String>,
    /// Whether more results exist beyond this page.
    pub has_more: bool,
    /// Total record count when the server chose to compute it.
    #[serde(default)]
    pub total_count: Option<u64>,
}

/// Generic paginated response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items for the current page.
    pub items: Vec<T>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}

/// One dataset in a list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetListItem {
    /// Dataset UUID.
    pub id: String,
    /// Dataset name.
    pub name: String,
    /// Processing status.
    pub status: DatasetStatus,
    /// Upload time.
    pub created_at: DateTime<Utc>,
}

/// Full dataset record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetRecord {
    /// Dataset UUID.
    pub id: String,
    /// Dataset name.
    pub name: String,
    /// Processing status.
    pub status: DatasetStatus,
    /// File size in bytes.
    pub file_size_bytes: u64,
    /// Row count once known.
    #[serde(default)]
    pub num_rows: Option<u64>,
    /// Column count once known.
    #[serde(default)]
    pub num_columns: Option<u64>,
    /// Upload initiation time.
    pub created_at: DateTime<Utc>,
}

/// Request for a signed upload URL and provisional dataset record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadUrlRequest {
    /// Original filename.
    pub filename: String,
    /// MIME type of the upload.
    pub content_type: String,
    /// File size in bytes.
    pub size_bytes: u64,
}

/// Signed upload URL plus the provisional dataset id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadUrlResponse {
    /// Presigned storage URL for a direct PUT.
    pub upload_url: String,
    /// Provisional dataset UUID.
    pub dataset_id: String,
    /// URL expiration timestamp.
    pub expires_at: DateTime<Utc>,
}

/// Finalize request carrying the content hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompleteUploadRequest {
    /// Lowercase hex SHA-256 of the uploaded bytes.
    pub file_hash: String,
}

/// One step of a pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineStep {
    /// Step category (e.g. "missing", "encoding", "scaling").
    #[serde(rename = "type")]
    pub step_type: String,
    /// Operation within the category.
    pub operation: String,
    /// Operation parameters.
    #[serde(default)]
    pub parameters: HashMap<String, Value>,
    /// Names of steps this one depends on.
    #[serde(default)]
    pub depends_on: Vec<String>,
}

/// Pipeline create/update payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelinePayload {
    /// Pipeline name.
    pub name: String,
    /// Dataset UUID the pipeline processes.
    pub dataset_id: String,
    /// Ordered step configurations.
    pub steps: Vec<PipelineStep>,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Persisted pipeline record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineRecord {
    /// Pipeline UUID.
    pub id: String,
    /// Pipeline name.
    pub name: String,
    /// Dataset UUID.
    pub dataset_id: String,
    /// Ordered step configurations.
    pub steps: Vec<PipelineStep>,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// One pipeline validation finding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineValidationIssue {
    /// Zero-based step index the finding refers to.
    pub step_index: usize,
    /// Problematic field.
    pub field: String,
    /// Finding description.
    pub message: String,
}

/// Result of server-side pipeline validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineValidation {
    /// Whether the configuration is valid.
    pub valid: bool,
    /// Blocking findings.
    #[serde(default)]
    pub errors: Vec<PipelineValidationIssue>,
    /// Non-blocking findings.
    #[serde(default)]
    pub warnings: Vec<String>,
}

/// Acknowledgement of a queued EDA job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdaJobAck {
    /// EDA report UUID used for status lookups.
    pub report_id: String,
    /// Backend task id.
    pub job_id: String,
    /// Initial status string.
    pub status: String,
}

/// Hyperparameter configuration for training.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Hyperparameters {
    /// Optimizer learning rate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub learning_rate: Option<f64>,
    /// Training batch size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<u32>,
    /// Number of epochs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epochs: Option<u32>,
    /// Model-specific parameters.
    #[serde(default)]
    pub custom_params: HashMap<String, Value>,
}

/// Training job submission request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingRequest {
    /// Pipeline UUID defining the data processing.
    pub pipeline_id: String,
    /// Model architecture (e.g. "random_forest", "xgboost").
    pub model_type: String,
    /// Training hyperparameters.
    #[serde(default)]
    pub hyperparameters: Hyperparameters,
    /// Fraction of data held out for validation.
    pub validation_split: f64,
    /// Optional experiment grouping name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experiment_name: Option<String>,
}

/// Acknowledgement of a submitted training job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingJobAck {
    /// Training job UUID.
    pub job_id: String,
    /// Associated pipeline UUID.
    pub pipeline_id: String,
    /// Initial status string.
    pub status: String,
}

/// Final training and validation metrics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainingMetrics {
    /// Training set accuracy.
    #[serde(default)]
    pub train_accuracy: Option<f64>,
    /// Validation set accuracy.
    #[serde(default)]
    pub val_accuracy: Option<f64>,
    /// Training loss.
    #[serde(default)]
    pub train_loss: Option<f64>,
    /// Validation loss.
    #[serde(default)]
    pub val_loss: Option<f64>,
    /// Additional metrics (F1, precision, ...).
    #[serde(default)]
    pub custom_metrics: HashMap<String, f64>,
}

/// Metrics response for a completed training job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingMetricsResponse {
    /// Training job UUID.
    pub job_id: String,
    /// Final metrics.
    pub metrics: TrainingMetrics,
    /// Presigned URL for the trained model artifact.
    #[serde(default)]
    pub model_artifact_url: Option<String>,
    /// Snapshot timestamp.
    pub generated_at: DateTime<Utc>,
}
