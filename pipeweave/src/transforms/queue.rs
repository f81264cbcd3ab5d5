//! Ordered transform queue with linear undo history.

use serde_json::Value;
use uuid::Uuid;

use super::types::{Transform, TransformCategory};

/// The ordered transform list plus its undo history.
///
/// Uniqueness holds on (column, category): selecting a new strategy for a
/// pair that already has an entry replaces it in place, preserving the
/// positions of all other entries.
///
/// Only [`TransformQueue::add_or_replace`] pushes undo history; `remove`
/// and `reorder` deliberately do not, matching the observed wizard
/// behavior.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransformQueue {
    entries: Vec<Transform>,
    history: Vec<Vec<Transform>>,
}

impl TransformQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a transform, or replaces the existing entry for the same
    /// (column, category) pair in place.
    ///
    /// A replacement keeps the entry's index and `order` value; an
    /// addition appends with `order` equal to the current length. The
    /// pre-mutation queue is pushed onto the history stack first.
    ///
    /// Returns the id of the inserted entry.
    pub fn add_or_replace(
        &mut self,
        column: impl Into<String>,
        operation: impl Into<String>,
        category: TransformCategory,
        params: Value,
    ) -> Uuid {
        let column = column.into();
        let operation = operation.into();

        self.history.push(self.entries.clone());

        if let Some(existing) = self
            .entries
            .iter_mut()
            .find(|t| t.column == column && t.category == category)
        {
            let replacement =
                Transform::new(column, category, operation, params, existing.order);
            let id = replacement.id;
            *existing = replacement;
            id
        } else {
            let order = self.entries.len();
            let entry = Transform::new(column, category, operation, params, order);
            let id = entry.id;
            self.entries.push(entry);
            id
        }
    }

    /// Removes the entry with the given id. Not undoable.
    ///
    /// Returns true when an entry was removed.
    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.entries.len();
        self.entries.retain(|t| t.id != id);
        self.entries.len() != before
    }

    /// Restores the queue to its most recent pre-mutation snapshot.
    ///
    /// No-op when the history is empty; returns true when a snapshot was
    /// restored.
    pub fn undo(&mut self) -> bool {
        match self.history.pop() {
            Some(snapshot) => {
                self.entries = snapshot;
                true
            }
            None => false,
        }
    }

    /// Replaces the queue wholesale with a caller-supplied ordering,
    /// renumbering `order` by position. Not undoable.
    pub fn reorder(&mut self, new_order: Vec<Transform>) {
        self.entries = new_order;
        for (index, entry) in self.entries.iter_mut().enumerate() {
            entry.order = index;
        }
    }

    /// The current entries in applied order.
    #[must_use]
    pub fn entries(&self) -> &[Transform] {
        &self.entries
    }

    /// Looks up the active transform for a (column, category) pair.
    #[must_use]
    pub fn get(&self, column: &str, category: TransformCategory) -> Option<&Transform> {
        self.entries
            .iter()
            .find(|t| t.column == column && t.category == category)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when the queue is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of undo snapshots currently held.
    #[must_use]
    pub fn history_depth(&self) -> usize {
        self.history.len()
    }
}
