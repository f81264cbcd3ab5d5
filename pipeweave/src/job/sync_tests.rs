//! Cross-transport job synchronization tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use std::sync::Arc;

use super::{poll_until_complete, stream_progress, JobSnapshot, JobStatus, PollConfig, StatusFetch};
use crate::cancellation::CancelToken;
use crate::errors::Result;
use crate::observe::{CollectingObserver, ObservedEvent};

/// Walks a job through queued -> running -> completed, one state per fetch.
struct LifecycleFetch {
    job_id: String,
    running_fetches: usize,
    calls: Mutex<usize>,
}

impl LifecycleFetch {
    fn new(job_id: &str, running_fetches: usize) -> Self {
        Self {
            job_id: job_id.to_string(),
            running_fetches,
            calls: Mutex::new(0),
        }
    }
}

#[async_trait]
impl StatusFetch for LifecycleFetch {
    async fn fetch_status(&self) -> Result<JobSnapshot> {
        let mut calls = self.calls.lock();
        let call = *calls;
        *calls += 1;

        let snapshot = if call == 0 {
            JobSnapshot::new(&self.job_id, JobStatus::Queued).with_progress(0.0)
        } else if call <= self.running_fetches {
            #[allow(clippy::cast_precision_loss)]
            let pct = 100.0 * call as f64 / (self.running_fetches + 1) as f64;
            JobSnapshot::new(&self.job_id, JobStatus::Running).with_progress(pct)
        } else {
            JobSnapshot::new(&self.job_id, JobStatus::Completed).with_progress(100.0)
        };
        Ok(snapshot)
    }
}

#[tokio::test(start_paused = true)]
async fn test_poll_consumes_backoff_schedule() {
    let fetcher = LifecycleFetch::new("j-timing", 3);
    let observer = CollectingObserver::new();
    let config = PollConfig::eda().with_max_attempts(10).with_interval_ms(2_000);

    let start = tokio::time::Instant::now();
    poll_until_complete(&fetcher, &config, &observer, &CancelToken::new())
        .await
        .unwrap();

    // Five fetches, so four sleeps: 2000 + 3000 + 4500 + 6750 ms.
    assert_eq!(start.elapsed().as_millis(), 16_250);
    assert_eq!(observer.progress_count(), 5);
}

#[tokio::test(start_paused = true)]
async fn test_polling_and_streaming_converge_on_same_view() {
    // Polling side.
    let fetcher = LifecycleFetch::new("j-both", 1);
    let polled = CollectingObserver::new();
    let config = PollConfig::training().with_max_attempts(10).with_interval_ms(10);
    let final_snapshot =
        poll_until_complete(&fetcher, &config, &polled, &CancelToken::new())
            .await
            .unwrap();
    assert_eq!(final_snapshot.status, JobStatus::Completed);

    // Streaming side, fed the frames the backend would emit for the same
    // lifecycle.
    let frames: Vec<std::result::Result<String, String>> = polled
        .snapshots()
        .iter()
        .map(|snap| Ok(format!("data: {}\n\n", serde_json::to_string(snap).unwrap())))
        .collect();
    let streamed = Arc::new(CollectingObserver::new());
    let handle = stream_progress(futures::stream::iter(frames), streamed.clone());
    handle.join().await;

    // Both transports observed identical snapshots in identical order; the
    // stream additionally reports the terminal event.
    assert_eq!(streamed.snapshots(), polled.snapshots());
    assert_eq!(streamed.complete_count(), 1);
    assert!(matches!(
        streamed.events().last(),
        Some(ObservedEvent::Complete(snap)) if snap.status == JobStatus::Completed
    ));
}

#[tokio::test(start_paused = true)]
async fn test_cancellation_mid_run_suppresses_remaining_updates() {
    struct CancellingFetch {
        token: CancelToken,
        calls: Mutex<usize>,
    }

    #[async_trait]
    impl StatusFetch for CancellingFetch {
        async fn fetch_status(&self) -> Result<JobSnapshot> {
            let mut calls = self.calls.lock();
            *calls += 1;
            if *calls == 2 {
                // Caller tears down while this fetch is in flight.
                self.token.cancel();
            }
            Ok(JobSnapshot::new("j-cancel", JobStatus::Running))
        }
    }

    let token = CancelToken::new();
    let fetcher = CancellingFetch {
        token: token.clone(),
        calls: Mutex::new(0),
    };
    let observer = CollectingObserver::new();
    let config = PollConfig::eda().with_max_attempts(10).with_interval_ms(10);

    let err = poll_until_complete(&fetcher, &config, &observer, &token)
        .await
        .unwrap_err();

    assert!(matches!(err, crate::errors::PipeweaveError::Cancelled));
    // The second fetch resolved after cancellation, so only the first
    // snapshot reached the observer.
    assert_eq!(*fetcher.calls.lock(), 2);
    assert_eq!(observer.progress_count(), 1);
}
