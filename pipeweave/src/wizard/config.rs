//! Aggregate preprocessing configuration built by the wizard.

use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::info;

use super::steps::{WizardFlow, WizardStep};
use crate::errors::{PipeweaveError, Result};
use crate::transforms::{TransformCategory, TransformQueue};

/// Simulated latency of the final apply action.
const APPLY_LATENCY: Duration = Duration::from_millis(400);

/// Everything the wizard accumulates for one dataset: selected columns,
/// per-category strategy choices, and the derived transform queue.
///
/// Mutated incrementally as the user advances; complete only once the
/// flow reaches `Review` and [`PreprocessingConfig::apply`] has run.
#[derive(Debug, Clone, Default)]
pub struct PreprocessingConfig {
    dataset_id: String,
    schema_version: u32,
    stale: bool,
    applied: bool,
    selected_columns: Vec<String>,
    strategies: HashMap<TransformCategory, HashMap<String, String>>,
    flow: WizardFlow,
    queue: TransformQueue,
}

impl PreprocessingConfig {
    /// Starts a configuration for a dataset at a given schema version.
    #[must_use]
    pub fn new(dataset_id: impl Into<String>, schema_version: u32) -> Self {
        Self {
            dataset_id: dataset_id.into(),
            schema_version,
            ..Self::default()
        }
    }

    /// The dataset this configuration targets.
    #[must_use]
    pub fn dataset_id(&self) -> &str {
        &self.dataset_id
    }

    /// Schema version the column choices were made against.
    #[must_use]
    pub fn schema_version(&self) -> u32 {
        self.schema_version
    }

    /// True when an upstream stage changed after this configuration was
    /// started; the UI offers manual refresh rather than auto-recovery.
    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Flags the configuration as stale against a newer schema version.
    pub fn mark_stale(&mut self, new_schema_version: u32) {
        if new_schema_version != self.schema_version {
            self.stale = true;
        }
    }

    /// Accepts the new schema version and clears the staleness flag.
    pub fn refresh(&mut self, schema_version: u32) {
        self.schema_version = schema_version;
        self.stale = false;
    }

    /// The wizard step state machine.
    #[must_use]
    pub fn flow(&self) -> &WizardFlow {
        &self.flow
    }

    /// Mutable access to the step state machine.
    pub fn flow_mut(&mut self) -> &mut WizardFlow {
        &mut self.flow
    }

    /// The derived transform queue.
    #[must_use]
    pub fn queue(&self) -> &TransformQueue {
        &self.queue
    }

    /// Mutable access to the transform queue (undo, removal, reorder).
    pub fn queue_mut(&mut self) -> &mut TransformQueue {
        &mut self.queue
    }

    /// Columns chosen in the select step.
    #[must_use]
    pub fn selected_columns(&self) -> &[String] {
        &self.selected_columns
    }

    /// Replaces the selected-columns set.
    pub fn select_columns(&mut self, columns: Vec<String>) {
        self.selected_columns = columns;
    }

    /// The strategy chosen for a (category, column) pair, if any.
    #[must_use]
    pub fn strategy(&self, category: TransformCategory, column: &str) -> Option<&str> {
        self.strategies
            .get(&category)
            .and_then(|m| m.get(column))
            .map(String::as_str)
    }

    /// Records a strategy selection and updates the transform queue.
    ///
    /// The column must be in the selected set; re-selection replaces the
    /// queue entry in place.
    pub fn set_strategy(
        &mut self,
        column: &str,
        category: TransformCategory,
        operation: &str,
        params: Value,
    ) -> Result<()> {
        if !self.selected_columns.iter().any(|c| c == column) {
            return Err(PipeweaveError::Validation(format!(
                "column '{column}' is not in the selected set"
            )));
        }
        self.strategies
            .entry(category)
            .or_default()
            .insert(column.to_string(), operation.to_string());
        self.queue
            .add_or_replace(column, operation, category, params);
        Ok(())
    }

    /// True once the apply action has finalized the configuration.
    #[must_use]
    pub fn is_applied(&self) -> bool {
        self.applied
    }

    /// Finalizes the configuration from the review step.
    ///
    /// The backing pipeline submission is simulated as a fixed-latency
    /// async operation. Fails with an invalid-transition error when the
    /// wizard has not reached `Review`.
    pub async fn apply(&mut self) -> Result<()> {
        if self.flow.current() != WizardStep::Review {
            return Err(PipeweaveError::InvalidTransition(format!(
                "apply requires the review step, wizard is at '{}'",
                self.flow.current()
            )));
        }
        tokio::time::sleep(APPLY_LATENCY).await;
        self.applied = true;
        info!(
            dataset_id = %self.dataset_id,
            transforms = self.queue.len(),
            "preprocessing configuration applied"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn configured() -> PreprocessingConfig {
        let mut config = PreprocessingConfig::new("ds-1", 1);
        config.select_columns(vec!["age".to_string(), "city".to_string()]);
        config
    }

    #[test]
    fn test_set_strategy_requires_selected_column() {
        let mut config = configured();
        let err = config
            .set_strategy("height", TransformCategory::Scaling, "standard", json!({}))
            .unwrap_err();
        assert!(matches!(err, PipeweaveError::Validation(_)));
        assert!(config.queue().is_empty());
    }

    #[test]
    fn test_set_strategy_updates_map_and_queue() {
        let mut config = configured();
        config
            .set_strategy("age", TransformCategory::Scaling, "standard", json!({}))
            .unwrap();
        config
            .set_strategy("age", TransformCategory::Scaling, "minmax", json!({}))
            .unwrap();

        assert_eq!(config.strategy(TransformCategory::Scaling, "age"), Some("minmax"));
        assert_eq!(config.queue().len(), 1);
        assert_eq!(config.queue().entries()[0].operation, "minmax");
    }

    #[test]
    fn test_staleness_flag() {
        let mut config = configured();
        config.mark_stale(1);
        assert!(!config.is_stale());
        config.mark_stale(2);
        assert!(config.is_stale());
        config.refresh(2);
        assert!(!config.is_stale());
        assert_eq!(config.schema_version(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_apply_requires_review_step() {
        let mut config = configured();
        let err = config.apply().await.unwrap_err();
        assert!(matches!(err, PipeweaveError::InvalidTransition(_)));
        assert!(!config.is_applied());
    }

    #[tokio::test(start_paused = true)]
    async fn test_apply_finalizes_from_review() {
        let mut config = configured();
        while !config.flow().at_review() {
            config.flow_mut().next();
        }
        config.apply().await.unwrap();
        assert!(config.is_applied());
    }
}
