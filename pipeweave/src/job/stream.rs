//! Streaming transport: server-sent-event subscription for job progress.
//!
//! The backend emits `data: {json}\n\n` frames once per second until the
//! job reaches a terminal status. A frame is either a full status snapshot
//! or a bare `{"error": ...}` object (job not found, stream timeout).

use futures::{Stream, StreamExt};
use std::fmt::Display;
use std::sync::Arc;
use tracing::debug;

use super::status::JobSnapshot;
use crate::cancellation::CancelToken;
use crate::errors::{PipeweaveError, Result};
use crate::observe::ProgressObserver;

/// Incremental decoder for the `text/event-stream` wire format.
///
/// Frames may arrive split across arbitrary chunk boundaries; the decoder
/// buffers until a blank line terminates an event and then yields the
/// joined `data:` payload.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buf: String,
}

impl SseDecoder {
    /// Creates an empty decoder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds a chunk of bytes and returns the data payloads of any events
    /// completed by it, in order.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buf.push_str(&String::from_utf8_lossy(chunk));

        let mut payloads = Vec::new();
        while let Some(end) = self.buf.find("\n\n") {
            let event: String = self.buf.drain(..end + 2).collect();
            let data: Vec<&str> = event
                .lines()
                .filter_map(|line| {
                    line.strip_prefix("data:").map(|rest| rest.strip_prefix(' ').unwrap_or(rest))
                })
                .collect();
            if !data.is_empty() {
                payloads.push(data.join("\n"));
            }
        }
        payloads
    }
}

/// One decoded stream event.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// A full status snapshot.
    Snapshot(JobSnapshot),
    /// A bare server-side error frame; the stream ends after it.
    ServerError(String),
}

/// Decodes one `data:` payload into a stream event.
pub fn decode_event(payload: &str) -> Result<StreamEvent> {
    if let Ok(snapshot) = serde_json::from_str::<JobSnapshot>(payload) {
        return Ok(StreamEvent::Snapshot(snapshot));
    }

    #[derive(serde::Deserialize)]
    struct ErrorFrame {
        error: String,
    }
    if let Ok(frame) = serde_json::from_str::<ErrorFrame>(payload) {
        return Ok(StreamEvent::ServerError(frame.error));
    }

    Err(PipeweaveError::Parse(format!(
        "malformed stream event: {payload}"
    )))
}

/// Disposer for an active streaming subscription.
///
/// Calling [`StreamHandle::dispose`] closes the subscription idempotently
/// and suppresses any further observer callbacks.
#[derive(Debug)]
pub struct StreamHandle {
    token: CancelToken,
    task: tokio::task::JoinHandle<()>,
}

impl StreamHandle {
    /// Closes the subscription. Safe to call more than once.
    ///
    /// Cancelling the token both suppresses further observer callbacks and
    /// aborts the worker task through the token's cancellation callback.
    pub fn dispose(&self) {
        self.token.cancel();
    }

    /// Returns true once the subscription has been disposed or has closed
    /// on its own.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.token.is_cancelled() || self.task.is_finished()
    }

    /// Waits for the subscription to close naturally. Used in tests.
    pub async fn join(self) {
        let _ = self.task.await;
    }
}

/// Subscribes an observer to a server-push event stream.
///
/// - Each well-formed snapshot frame invokes `on_progress`.
/// - A malformed frame invokes `on_error` with a parse failure but keeps
///   the subscription open.
/// - A terminal snapshot invokes `on_complete` exactly once and closes.
/// - A transport error or server error frame invokes `on_error` exactly
///   once and closes.
///
/// The returned [`StreamHandle`] is the disposer.
pub fn stream_progress<S, B, E>(events: S, observer: Arc<dyn ProgressObserver>) -> StreamHandle
where
    S: Stream<Item = std::result::Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Display + Send + 'static,
{
    let token = CancelToken::new();
    let worker_token = token.clone();

    let task = tokio::spawn(async move {
        futures::pin_mut!(events);
        let mut decoder = SseDecoder::new();

        'outer: while let Some(chunk) = events.next().await {
            if worker_token.is_cancelled() {
                return;
            }
            match chunk {
                Ok(bytes) => {
                    for payload in decoder.push(bytes.as_ref()) {
                        if worker_token.is_cancelled() {
                            return;
                        }
                        match decode_event(&payload) {
                            Ok(StreamEvent::Snapshot(snapshot)) => {
                                observer.on_progress(&snapshot);
                                if snapshot.status.is_terminal() {
                                    debug!(
                                        job_id = %snapshot.job_id,
                                        status = %snapshot.status,
                                        "stream reached terminal status"
                                    );
                                    observer.on_complete(&snapshot);
                                    break 'outer;
                                }
                            }
                            Ok(StreamEvent::ServerError(message)) => {
                                observer.on_error(&PipeweaveError::Network(message));
                                break 'outer;
                            }
                            // Malformed frame: report but keep listening.
                            Err(err) => observer.on_error(&err),
                        }
                    }
                }
                Err(err) => {
                    observer.on_error(&PipeweaveError::Network(err.to_string()));
                    break 'outer;
                }
            }
        }

        // Closed naturally; make any later dispose a no-op on callbacks.
        worker_token.cancel();
    });

    // Tear-down rides on the token so any clone of it can end the stream.
    let abort = task.abort_handle();
    token.on_cancel(move || abort.abort());

    StreamHandle { token, task }
}
