//! Pending preprocessing transforms.
//!
//! An ordered, column-keyed list of transformations (missing-value
//! handling, encoding, scaling) built up across wizard steps, with a
//! linear undo history over queue snapshots.

mod queue;
mod types;

pub use queue::TransformQueue;
pub use types::{Transform, TransformCategory};
