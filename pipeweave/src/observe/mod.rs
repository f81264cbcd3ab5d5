//! Progress observation.
//!
//! The [`ProgressObserver`] trait is the single callback surface shared by
//! the polling and streaming job transports, so UI code can swap one for
//! the other without changing its handling.

mod observer;

pub use observer::{
    CollectingObserver, FnObserver, LoggingObserver, NoOpObserver, ObservedEvent,
    ProgressObserver,
};
