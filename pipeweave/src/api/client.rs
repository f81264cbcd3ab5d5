//! The API request context and typed endpoint wrappers.

use async_trait::async_trait;
use reqwest::{header, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use super::auth::TokenStore;
use super::config::ApiConfig;
use super::types::{
    CompleteUploadRequest, DatasetListItem, DatasetRecord, EdaJobAck, Page,
    PipelinePayload, PipelineRecord, PipelineValidation, TrainingJobAck,
    TrainingMetricsResponse, TrainingRequest, UploadUrlRequest, UploadUrlResponse,
};
use crate::errors::{PipeweaveError, Result};
use crate::job::{stream_progress, JobSnapshot, StatusFetch, StreamHandle};
use crate::observe::ProgressObserver;
use crate::upload::UploadTransport;

/// An explicit request context: HTTP client, base URL, and bearer token.
///
/// Cloning is cheap; clones share the token store, so a 401 observed on
/// any clone logs the whole session out.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: ApiConfig,
    tokens: Arc<TokenStore>,
}

impl ApiClient {
    /// Creates a client with an in-memory token store.
    pub fn new(config: ApiConfig) -> Result<Self> {
        Self::with_token_store(config, Arc::new(TokenStore::in_memory()))
    }

    /// Creates a client sharing an existing token store.
    pub fn with_token_store(config: ApiConfig, tokens: Arc<TokenStore>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self {
            http,
            config,
            tokens,
        })
    }

    /// The token store this context attaches to requests.
    #[must_use]
    pub fn tokens(&self) -> &Arc<TokenStore> {
        &self.tokens
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url)
    }

    /// Attaches the bearer token, sends, and applies the 401 policy.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        let request = match self.tokens.get() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let response = request.send().await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            debug!("401 received, clearing bearer token");
            self.tokens.clear();
            return Err(PipeweaveError::Unauthorized);
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PipeweaveError::Network(format!("HTTP {status}: {body}")));
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.send(self.http.get(self.url(path))).await?;
        Ok(response.json().await?)
    }

    async fn post_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self.send(self.http.post(self.url(path)).json(body)).await?;
        Ok(response.json().await?)
    }

    async fn put_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self.send(self.http.put(self.url(path)).json(body)).await?;
        Ok(response.json().await?)
    }

    async fn delete(&self, path: &str) -> Result<()> {
        self.send(self.http.delete(self.url(path))).await?;
        Ok(())
    }

    // --- datasets ---

    /// Lists datasets, paginated.
    pub async fn list_datasets(&self, page: u32, limit: u32) -> Result<Page<DatasetListItem>> {
        let response = self
            .send(
                self.http
                    .get(self.url("/datasets"))
                    .query(&[("page", page), ("limit", limit)]),
            )
            .await?;
        Ok(response.json().await?)
    }

    /// Deletes a dataset.
    pub async fn delete_dataset(&self, dataset_id: &str) -> Result<()> {
        self.delete(&format!("/datasets/{dataset_id}")).await
    }

    // --- pipelines ---

    /// Validates a pipeline configuration server-side.
    pub async fn validate_pipeline(&self, payload: &PipelinePayload) -> Result<PipelineValidation> {
        self.post_json("/pipelines/validate", payload).await
    }

    /// Creates a pipeline.
    pub async fn create_pipeline(&self, payload: &PipelinePayload) -> Result<PipelineRecord> {
        self.post_json("/pipelines", payload).await
    }

    /// Fetches a pipeline.
    pub async fn get_pipeline(&self, pipeline_id: &str) -> Result<PipelineRecord> {
        self.get_json(&format!("/pipelines/{pipeline_id}")).await
    }

    /// Replaces a pipeline.
    pub async fn update_pipeline(
        &self,
        pipeline_id: &str,
        payload: &PipelinePayload,
    ) -> Result<PipelineRecord> {
        self.put_json(&format!("/pipelines/{pipeline_id}"), payload).await
    }

    /// Deletes a pipeline.
    pub async fn delete_pipeline(&self, pipeline_id: &str) -> Result<()> {
        self.delete(&format!("/pipelines/{pipeline_id}")).await
    }

    // --- EDA ---

    /// Queues EDA report generation for a dataset.
    pub async fn queue_eda(&self, dataset_id: &str) -> Result<EdaJobAck> {
        self.post_json(&format!("/eda/datasets/{dataset_id}/queue"), &serde_json::json!({}))
            .await
    }

    /// Fetches the status of a queued EDA report.
    pub async fn eda_report_status(&self, report_id: &str) -> Result<JobSnapshot> {
        self.get_json(&format!("/eda/reports/{report_id}/status")).await
    }

    /// Fetches the EDA summary for a dataset.
    pub async fn eda_summary(&self, dataset_id: &str) -> Result<serde_json::Value> {
        self.get_json(&format!("/eda/datasets/{dataset_id}/summary")).await
    }

    /// Fetches the full EDA report for a dataset.
    pub async fn eda_full_report(&self, dataset_id: &str) -> Result<serde_json::Value> {
        self.get_json(&format!("/eda/datasets/{dataset_id}/full")).await
    }

    /// A [`StatusFetch`] bound to an EDA report, for polling.
    #[must_use]
    pub fn eda_report(&self, report_id: impl Into<String>) -> EdaReportJob {
        EdaReportJob {
            client: self.clone(),
            report_id: report_id.into(),
        }
    }

    // --- training ---

    /// Submits a training job.
    pub async fn submit_training(&self, request: &TrainingRequest) -> Result<TrainingJobAck> {
        self.post_json("/training", request).await
    }

    /// Fetches the status of a training job.
    pub async fn training_status(&self, job_id: &str) -> Result<JobSnapshot> {
        self.get_json(&format!("/training/{job_id}/status")).await
    }

    /// Fetches final metrics for a completed training job.
    pub async fn training_metrics(&self, job_id: &str) -> Result<TrainingMetricsResponse> {
        self.get_json(&format!("/training/{job_id}/metrics")).await
    }

    /// Requests cancellation of a training job.
    pub async fn cancel_training(&self, job_id: &str) -> Result<()> {
        self.delete(&format!("/training/{job_id}")).await
    }

    /// A [`StatusFetch`] bound to a training job, for polling.
    #[must_use]
    pub fn training_job(&self, job_id: impl Into<String>) -> TrainingJob {
        TrainingJob {
            client: self.clone(),
            job_id: job_id.into(),
        }
    }

    /// Opens a server-sent-event subscription for training progress.
    ///
    /// Returns the disposer; see [`stream_progress`] for the callback
    /// contract.
    pub async fn stream_training(
        &self,
        job_id: &str,
        observer: Arc<dyn ProgressObserver>,
    ) -> Result<StreamHandle> {
        // The stream stays open for the life of the job; the REST timeout
        // would sever it mid-run, so this request carries its own bound.
        let response = self
            .send(
                self.http
                    .get(self.url(&format!("/training/{job_id}/stream")))
                    .header(header::ACCEPT, "text/event-stream")
                    .timeout(self.config.stream_timeout),
            )
            .await?;
        Ok(stream_progress(response.bytes_stream(), observer))
    }
}

#[async_trait]
impl UploadTransport for ApiClient {
    async fn request_upload_url(&self, request: &UploadUrlRequest) -> Result<UploadUrlResponse> {
        self.post_json("/datasets/upload-url", request).await
    }

    /// Raw PUT to the signed storage URL. The bearer token is deliberately
    /// not attached: the URL itself carries the authorization.
    async fn put_object(&self, url: &str, content_type: &str, body: &[u8]) -> Result<()> {
        let response = self
            .http
            .put(url)
            .header(header::CONTENT_TYPE, content_type)
            .body(body.to_vec())
            .send()
            .await?;
        if !response.status().is_success() {
            let status = response.status();
            return Err(PipeweaveError::Network(format!(
                "storage PUT failed: HTTP {status}"
            )));
        }
        Ok(())
    }

    async fn complete_upload(&self, dataset_id: &str, file_hash: &str) -> Result<DatasetRecord> {
        self.post_json(
            &format!("/datasets/{dataset_id}/complete"),
            &CompleteUploadRequest {
                file_hash: file_hash.to_string(),
            },
        )
        .await
    }
}

/// A training job bound to a client, pollable via [`StatusFetch`].
#[derive(Debug, Clone)]
pub struct TrainingJob {
    client: ApiClient,
    job_id: String,
}

#[async_trait]
impl StatusFetch for TrainingJob {
    async fn fetch_status(&self) -> Result<JobSnapshot> {
        self.client.training_status(&self.job_id).await
    }
}

/// An EDA report bound to a client, pollable via [`StatusFetch`].
#[derive(Debug, Clone)]
pub struct EdaReportJob {
    client: ApiClient,
    report_id: String,
}

#[async_trait]
impl StatusFetch for EdaReportJob {
    async fn fetch_status(&self) -> Result<JobSnapshot> {
        let mut snapshot = self.client.eda_report_status(&self.report_id).await?;
        // The EDA status endpoint omits the id; fill it in for observers.
        if snapshot.job_id.is_empty() {
            snapshot.job_id.clone_from(&self.report_id);
        }
        Ok(snapshot)
    }
}
