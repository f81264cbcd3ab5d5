//! Bearer token storage.

use parking_lot::RwLock;
use std::sync::Arc;
use tracing::warn;

use crate::errors::Result;
use crate::store::KeyValueStore;

/// Fixed storage key for the bearer token.
const TOKEN_KEY: &str = "pipeweave.auth_token";

/// Holds the bearer token attached to every request.
///
/// Optionally backed by a [`KeyValueStore`] so the session survives a
/// restart. A 401 response clears the token; re-login is the embedding
/// application's concern.
pub struct TokenStore {
    cached: RwLock<Option<String>>,
    backing: Option<Arc<dyn KeyValueStore>>,
}

impl TokenStore {
    /// Creates an unbacked, in-memory token store.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            cached: RwLock::new(None),
            backing: None,
        }
    }

    /// Creates a store backed by durable storage, loading any persisted
    /// token.
    #[must_use]
    pub fn persistent(store: Arc<dyn KeyValueStore>) -> Self {
        let cached = store.get(TOKEN_KEY).ok().flatten();
        Self {
            cached: RwLock::new(cached),
            backing: Some(store),
        }
    }

    /// The current token, if any.
    #[must_use]
    pub fn get(&self) -> Option<String> {
        self.cached.read().clone()
    }

    /// Stores a new token.
    pub fn set(&self, token: impl Into<String>) -> Result<()> {
        let token = token.into();
        *self.cached.write() = Some(token.clone());
        if let Some(store) = &self.backing {
            store.set(TOKEN_KEY, &token)?;
        }
        Ok(())
    }

    /// Clears the token, e.g. after the backend rejected it.
    ///
    /// A failure to clear the durable copy is logged but not surfaced;
    /// the in-memory token is always gone afterwards.
    pub fn clear(&self) {
        *self.cached.write() = None;
        if let Some(store) = &self.backing {
            if let Err(e) = store.remove(TOKEN_KEY) {
                warn!(error = %e, "failed to clear persisted token");
            }
        }
    }
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore")
            .field("present", &self.cached.read().is_some())
            .field("persistent", &self.backing.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_in_memory_lifecycle() {
        let tokens = TokenStore::in_memory();
        assert_eq!(tokens.get(), None);
        tokens.set("abc").unwrap();
        assert_eq!(tokens.get(), Some("abc".to_string()));
        tokens.clear();
        assert_eq!(tokens.get(), None);
    }

    #[test]
    fn test_persistent_survives_reload() {
        let store = Arc::new(MemoryStore::new());
        let tokens = TokenStore::persistent(store.clone());
        tokens.set("abc").unwrap();

        let reloaded = TokenStore::persistent(store.clone());
        assert_eq!(reloaded.get(), Some("abc".to_string()));

        reloaded.clear();
        assert_eq!(store.get("pipeweave.auth_token").unwrap(), None);
    }
}
