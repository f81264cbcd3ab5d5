//! Progress observer trait and implementations.

use tracing::{info, warn};

use crate::errors::PipeweaveError;
use crate::job::JobSnapshot;

/// Trait for receiving job progress notifications.
///
/// Implementations use interior mutability where they need state; both
/// transports invoke observers through a shared reference.
pub trait ProgressObserver: Send + Sync {
    /// Called with every snapshot received, terminal or not, in order.
    fn on_progress(&self, snapshot: &JobSnapshot);

    /// Called when an error occurs.
    ///
    /// In streaming mode a parse failure is reported here without closing
    /// the subscription; a transport failure is reported here exactly once
    /// and closes it.
    fn on_error(&self, error: &PipeweaveError);

    /// Called exactly once when a streamed job reaches a terminal status.
    fn on_complete(&self, snapshot: &JobSnapshot);
}

/// An observer that discards all notifications.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpObserver;

impl ProgressObserver for NoOpObserver {
    fn on_progress(&self, _snapshot: &JobSnapshot) {}
    fn on_error(&self, _error: &PipeweaveError) {}
    fn on_complete(&self, _snapshot: &JobSnapshot) {}
}

/// An observer that logs notifications via `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingObserver;

impl ProgressObserver for LoggingObserver {
    fn on_progress(&self, snapshot: &JobSnapshot) {
        info!(
            job_id = %snapshot.job_id,
            status = %snapshot.status,
            progress = snapshot.progress(),
            step = snapshot.step.as_deref().unwrap_or(""),
            "job progress"
        );
    }

    fn on_error(&self, error: &PipeweaveError) {
        warn!(error = %error, "job sync error");
    }

    fn on_complete(&self, snapshot: &JobSnapshot) {
        info!(
            job_id = %snapshot.job_id,
            status = %snapshot.status,
            "job reached terminal status"
        );
    }
}

/// Adapts a progress closure to the observer interface.
///
/// Every snapshot reaches the closure through `on_progress`, including the
/// terminal one in streaming mode; errors and the terminal classification
/// are discarded. Implement [`ProgressObserver`] directly when those
/// matter.
pub struct FnObserver<F> {
    callback: parking_lot::Mutex<F>,
}

impl<F> FnObserver<F>
where
    F: FnMut(&JobSnapshot) + Send,
{
    /// Wraps a closure.
    pub fn new(callback: F) -> Self {
        Self {
            callback: parking_lot::Mutex::new(callback),
        }
    }
}

impl<F> ProgressObserver for FnObserver<F>
where
    F: FnMut(&JobSnapshot) + Send,
{
    fn on_progress(&self, snapshot: &JobSnapshot) {
        (self.callback.lock())(snapshot);
    }

    fn on_error(&self, _error: &PipeweaveError) {}

    fn on_complete(&self, _snapshot: &JobSnapshot) {}
}

impl<F> std::fmt::Debug for FnObserver<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnObserver").finish_non_exhaustive()
    }
}

/// One recorded observer invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum ObservedEvent {
    /// A progress snapshot was delivered.
    Progress(JobSnapshot),
    /// An error was reported (stored as its display string).
    Error(String),
    /// A terminal snapshot was delivered.
    Complete(JobSnapshot),
}

/// A collecting observer for tests.
#[derive(Debug, Default)]
pub struct CollectingObserver {
    events: parking_lot::RwLock<Vec<ObservedEvent>>,
}

impl CollectingObserver {
    /// Creates a new collecting observer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all recorded events in order.
    #[must_use]
    pub fn events(&self) -> Vec<ObservedEvent> {
        self.events.read().clone()
    }

    /// Returns only the progress snapshots, in order.
    #[must_use]
    pub fn snapshots(&self) -> Vec<JobSnapshot> {
        self.events
            .read()
            .iter()
            .filter_map(|e| match e {
                ObservedEvent::Progress(s) => Some(s.clone()),
                _ => None,
            })
            .collect()
    }

    /// Number of progress invocations recorded.
    #[must_use]
    pub fn progress_count(&self) -> usize {
        self.snapshots().len()
    }

    /// Number of complete invocations recorded.
    #[must_use]
    pub fn complete_count(&self) -> usize {
        self.events
            .read()
            .iter()
            .filter(|e| matches!(e, ObservedEvent::Complete(_)))
            .count()
    }

    /// Display strings of the errors reported, in order.
    #[must_use]
    pub fn errors(&self) -> Vec<String> {
        self.events
            .read()
            .iter()
            .filter_map(|e| match e {
                ObservedEvent::Error(msg) => Some(msg.clone()),
                _ => None,
            })
            .collect()
    }

    /// Total number of recorded invocations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    /// Returns true when nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }
}

impl ProgressObserver for CollectingObserver {
    fn on_progress(&self, snapshot: &JobSnapshot) {
        self.events
            .write()
            .push(ObservedEvent::Progress(snapshot.clone()));
    }

    fn on_error(&self, error: &PipeweaveError) {
        self.events
            .write()
            .push(ObservedEvent::Error(error.to_string()));
    }

    fn on_complete(&self, snapshot: &JobSnapshot) {
        self.events
            .write()
            .push(ObservedEvent::Complete(snapshot.clone()));
    }
}
