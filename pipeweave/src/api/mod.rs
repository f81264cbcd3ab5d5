//! Typed REST surface for the PipeWeave backend.
//!
//! All calls go through an explicit request context ([`ApiClient`])
//! carrying the bearer token and 401 policy, rather than ambient global
//! interceptors.

mod auth;
mod client;
mod config;
pub mod types;

pub use auth::TokenStore;
pub use client::{ApiClient, EdaReportJob, TrainingJob};
pub use config::ApiConfig;
