//! Preprocessing wizard flow.
//!
//! A fixed ordered step sequence (select, missing, encode, scale, review)
//! with completion-gated jumps, plus the aggregate configuration the
//! wizard builds up and finally applies.

mod config;
mod steps;

pub use config::PreprocessingConfig;
pub use steps::{WizardFlow, WizardStep};
