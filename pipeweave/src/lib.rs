//! # PipeWeave client
//!
//! An async Rust client for the PipeWeave ML pipeline service.
//!
//! The crate covers the non-visual half of the PipeWeave wizard:
//!
//! - **Job synchronization**: track server-side EDA and training jobs to a
//!   terminal state via polling with capped exponential backoff, or via a
//!   server-sent-event subscription, behind one observer interface
//! - **Transform queue**: the ordered, column-keyed list of pending
//!   preprocessing transforms with linear undo history
//! - **Wizard flow**: the fixed step sequence driving the preprocessing
//!   configuration, with completion-gated jumps
//! - **Dataset upload**: the three-phase signed-URL upload protocol with a
//!   content-hash finalize step
//! - **REST surface**: typed endpoint wrappers carrying an explicit request
//!   context (bearer token, 401 handling) instead of global interceptors
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pipeweave::prelude::*;
//!
//! let client = ApiClient::new(ApiConfig::new("https://api.example.com"))?;
//! let job = client.submit_training(&request).await?;
//!
//! let observer = LoggingObserver::default();
//! let fetcher = client.training_job(&job.job_id);
//! let done = poll_until_complete(
//!     &fetcher,
//!     &PollConfig::training(),
//!     &observer,
//!     &CancelToken::new(),
//! ).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod api;
pub mod cancellation;
pub mod errors;
pub mod job;
pub mod observe;
pub mod store;
pub mod transforms;
pub mod upload;
pub mod wizard;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::api::{ApiClient, ApiConfig, TokenStore};
    pub use crate::cancellation::CancelToken;
    pub use crate::errors::{PipeweaveError, Result};
    pub use crate::job::{
        poll_until_complete, BackoffPolicy, JobSnapshot, JobStatus, PollConfig,
        StatusFetch, StreamHandle,
    };
    pub use crate::observe::{
        CollectingObserver, FnObserver, LoggingObserver, NoOpObserver, ProgressObserver,
    };
    pub use crate::store::{FileStore, KeyValueStore, MemoryStore, Preferences};
    pub use crate::transforms::{Transform, TransformCategory, TransformQueue};
    pub use crate::upload::{DatasetUploader, UploadTransport};
    pub use crate::wizard::{PreprocessingConfig, WizardFlow, WizardStep};
}
