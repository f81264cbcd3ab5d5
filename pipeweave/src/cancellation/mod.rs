//! Cooperative cancellation for job subscriptions.
//!
//! A [`CancelToken`] is shared between the caller and a polling loop or
//! streaming task; once cancelled, no further fetch is scheduled and no
//! further observer callback fires.

mod token;

pub use token::CancelToken;
