//! Cancellation token for cooperative cancellation.

use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::warn;

/// A callback type for cancellation notifications.
pub type CancelCallback = Box<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct Inner {
    cancelled: AtomicBool,
    callbacks: RwLock<Vec<CancelCallback>>,
}

/// A clonable handle for cooperative cancellation.
///
/// Clones share state: the caller keeps one handle as a disposer while the
/// polling loop or streaming task holds another. Cancellation is idempotent.
#[derive(Clone, Default)]
pub struct CancelToken {
    inner: Arc<Inner>,
}

impl CancelToken {
    /// Creates a new, un-cancelled token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    ///
    /// Idempotent: callbacks run only on the first call. Panics in
    /// callbacks are logged and suppressed.
    pub fn cancel(&self) {
        if self
            .inner
            .cancelled
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            let callbacks = self.inner.callbacks.read();
            for callback in callbacks.iter() {
                if let Err(e) = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                    callback();
                })) {
                    warn!("cancellation callback panicked: {:?}", e);
                }
            }
        }
    }

    /// Registers a callback to be invoked on cancellation.
    ///
    /// If already cancelled, the callback is invoked immediately.
    pub fn on_cancel<F>(&self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        if self.is_cancelled() {
            if let Err(e) = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                callback();
            })) {
                warn!("cancellation callback panicked: {:?}", e);
            }
        } else {
            self.inner.callbacks.write().push(Box::new(callback));
        }
    }

    /// Returns whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for CancelToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancelToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_token_default_not_cancelled() {
        let token = CancelToken::new();
        assert!(!token.is_cancelled());
    }

    #[test]
    fn test_clones_share_state() {
        let token = CancelToken::new();
        let disposer = token.clone();
        disposer.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_cancel_idempotent() {
        let token = CancelToken::new();
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = count.clone();
        token.on_cancel(move || {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });

        token.cancel();
        token.cancel();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_on_cancel_after_cancellation_fires_immediately() {
        let token = CancelToken::new();
        token.cancel();

        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = count.clone();
        token.on_cancel(move || {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_callback_panic_suppressed() {
        let token = CancelToken::new();
        token.on_cancel(|| panic!("intentional"));
        token.cancel();
        assert!(token.is_cancelled());
    }
}
