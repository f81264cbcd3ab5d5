//! Polling transport: fetch status until a terminal state.

use async_trait::async_trait;
use tracing::debug;

use super::backoff::PollConfig;
use super::status::JobSnapshot;
use crate::cancellation::CancelToken;
use crate::errors::{PipeweaveError, Result};
use crate::observe::ProgressObserver;

/// One status fetch for a particular job.
///
/// The API client provides implementations bound to a job id; tests use
/// scripted fakes.
#[async_trait]
pub trait StatusFetch: Send + Sync {
    /// Fetches the current status snapshot.
    async fn fetch_status(&self) -> Result<JobSnapshot>;
}

/// Polls a job until it completes.
///
/// - `on_progress` fires for every fetched snapshot, changed or not, in
///   order.
/// - Resolves with the final snapshot on `completed`.
/// - Rejects with [`PipeweaveError::JobFailed`] on `failed` or `cancelled`,
///   carrying the server message when present.
/// - Rejects with [`PipeweaveError::JobTimeout`] after exactly
///   `config.max_attempts` fetches without a terminal state.
/// - Sleeps per the backoff schedule between fetches.
/// - Once `token` is cancelled, no further fetch is scheduled and no
///   further observer callback fires; the call returns
///   [`PipeweaveError::Cancelled`].
pub async fn poll_until_complete<F, O>(
    fetcher: &F,
    config: &PollConfig,
    observer: &O,
    token: &CancelToken,
) -> Result<JobSnapshot>
where
    F: StatusFetch + ?Sized,
    O: ProgressObserver + ?Sized,
{
    for attempt in 0..config.max_attempts {
        if token.is_cancelled() {
            return Err(PipeweaveError::Cancelled);
        }

        let snapshot = fetcher.fetch_status().await?;

        // The fetch may have resolved after the caller tore down; a stale
        // update must not reach the observer.
        if token.is_cancelled() {
            return Err(PipeweaveError::Cancelled);
        }
        observer.on_progress(&snapshot);

        if snapshot.status.is_failure() {
            return Err(PipeweaveError::job_failed(
                snapshot.status,
                snapshot.error_message.clone(),
            ));
        }
        if snapshot.status.is_terminal() {
            debug!(job_id = %snapshot.job_id, attempts = attempt + 1, "poll complete");
            return Ok(snapshot);
        }

        if attempt + 1 < config.max_attempts {
            tokio::time::sleep(config.backoff.delay_for(attempt)).await;
        }
    }

    Err(PipeweaveError::JobTimeout {
        attempts: config.max_attempts,
    })
}
