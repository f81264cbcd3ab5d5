//! Persisted UI preferences.

use std::sync::Arc;
use tracing::warn;

use super::kv::KeyValueStore;
use crate::errors::Result;

/// Fixed storage key for the sidebar-collapsed flag.
const SIDEBAR_KEY: &str = "pipeweave.sidebar_collapsed";
/// Fixed storage key for the workflow progress list.
const WORKFLOW_KEY: &str = "pipeweave.workflow_progress";

/// The cross-session UI preferences: sidebar collapse state and the
/// ordered list of completed workflow step identifiers.
///
/// Values load once at construction, falling back to defaults on missing
/// or unparsable entries, and write through on every change.
pub struct Preferences {
    store: Arc<dyn KeyValueStore>,
    sidebar_collapsed: bool,
    workflow_progress: Vec<String>,
}

impl Preferences {
    /// Loads preferences from a store.
    #[must_use]
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let sidebar_collapsed = Self::read_json(&*store, SIDEBAR_KEY).unwrap_or(false);
        let workflow_progress = Self::read_json(&*store, WORKFLOW_KEY).unwrap_or_default();
        Self {
            store,
            sidebar_collapsed,
            workflow_progress,
        }
    }

    fn read_json<T: serde::de::DeserializeOwned>(
        store: &dyn KeyValueStore,
        key: &str,
    ) -> Option<T> {
        let raw = store.get(key).ok().flatten()?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "stored preference unparsable, using default");
                None
            }
        }
    }

    /// Whether the sidebar is collapsed.
    #[must_use]
    pub fn sidebar_collapsed(&self) -> bool {
        self.sidebar_collapsed
    }

    /// Sets and persists the sidebar-collapsed flag.
    pub fn set_sidebar_collapsed(&mut self, collapsed: bool) -> Result<()> {
        self.sidebar_collapsed = collapsed;
        self.store
            .set(SIDEBAR_KEY, &serde_json::to_string(&collapsed)?)
    }

    /// Completed workflow step identifiers, in completion order.
    #[must_use]
    pub fn workflow_progress(&self) -> &[String] {
        &self.workflow_progress
    }

    /// Appends a completed step identifier (once) and persists the list.
    pub fn mark_step_complete(&mut self, step: impl Into<String>) -> Result<()> {
        let step = step.into();
        if !self.workflow_progress.contains(&step) {
            self.workflow_progress.push(step);
            self.store
                .set(WORKFLOW_KEY, &serde_json::to_string(&self.workflow_progress)?)?;
        }
        Ok(())
    }

    /// Clears the workflow progress list and persists the reset.
    pub fn reset_workflow(&mut self) -> Result<()> {
        self.workflow_progress.clear();
        self.store.remove(WORKFLOW_KEY)
    }
}

impl std::fmt::Debug for Preferences {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Preferences")
            .field("sidebar_collapsed", &self.sidebar_collapsed)
            .field("workflow_progress", &self.workflow_progress)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_when_store_empty() {
        let prefs = Preferences::load(Arc::new(MemoryStore::new()));
        assert!(!prefs.sidebar_collapsed());
        assert!(prefs.workflow_progress().is_empty());
    }

    #[test]
    fn test_writes_through_and_reloads() {
        let store = Arc::new(MemoryStore::new());
        let mut prefs = Preferences::load(store.clone());
        prefs.set_sidebar_collapsed(true).unwrap();
        prefs.mark_step_complete("select").unwrap();
        prefs.mark_step_complete("missing").unwrap();
        prefs.mark_step_complete("select").unwrap();

        let reloaded = Preferences::load(store);
        assert!(reloaded.sidebar_collapsed());
        assert_eq!(
            reloaded.workflow_progress(),
            &["select".to_string(), "missing".to_string()]
        );
    }

    #[test]
    fn test_corrupt_values_fall_back_to_defaults() {
        let store = Arc::new(MemoryStore::new());
        store.set("pipeweave.sidebar_collapsed", "maybe").unwrap();
        store.set("pipeweave.workflow_progress", "{broken").unwrap();

        let prefs = Preferences::load(store);
        assert!(!prefs.sidebar_collapsed());
        assert!(prefs.workflow_progress().is_empty());
    }

    #[test]
    fn test_reset_workflow() {
        let store = Arc::new(MemoryStore::new());
        let mut prefs = Preferences::load(store.clone());
        prefs.mark_step_complete("select").unwrap();
        prefs.reset_workflow().unwrap();

        assert!(prefs.workflow_progress().is_empty());
        assert_eq!(store.get("pipeweave.workflow_progress").unwrap(), None);
    }
}
