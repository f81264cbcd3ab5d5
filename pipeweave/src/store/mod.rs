//! Durable cross-session key-value state.
//!
//! The UI layer depends on an abstract store; platform storage backs it.
//! Reads fall back to defaults on missing or unparsable values.

mod kv;
mod prefs;

pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use prefs::Preferences;
