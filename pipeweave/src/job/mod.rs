//! Job status synchronization.
//!
//! Tracks a server-side asynchronous job (EDA generation, model training)
//! through `queued -> running -> {completed|failed|cancelled}` via either
//! polling with capped exponential backoff or a server-sent-event
//! subscription. Both transports converge on the same terminal outcomes
//! and error taxonomy.

mod backoff;
mod poller;
mod status;
mod stream;

pub use backoff::{BackoffPolicy, PollConfig};
pub use poller::{poll_until_complete, StatusFetch};
pub use status::{JobSnapshot, JobStatus};
pub use stream::{stream_progress, SseDecoder, StreamEvent, StreamHandle};

#[cfg(test)]
mod sync_tests;
