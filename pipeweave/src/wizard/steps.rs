//! Wizard step sequence and transition rules.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{PipeweaveError, Result};

/// The fixed, ordered wizard steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    /// Column selection.
    Select,
    /// Missing-value strategies.
    Missing,
    /// Categorical encoding strategies.
    Encode,
    /// Numeric scaling strategies.
    Scale,
    /// Final review; the apply action runs from here.
    Review,
}

impl WizardStep {
    /// All steps in wizard order.
    pub const SEQUENCE: [Self; 5] = [
        Self::Select,
        Self::Missing,
        Self::Encode,
        Self::Scale,
        Self::Review,
    ];

    /// Zero-based position in the sequence.
    #[must_use]
    pub fn index(&self) -> usize {
        Self::SEQUENCE
            .iter()
            .position(|s| s == self)
            .unwrap_or_default()
    }

    /// The following step, or `None` at `Review`.
    #[must_use]
    pub fn next(&self) -> Option<Self> {
        Self::SEQUENCE.get(self.index() + 1).copied()
    }

    /// The preceding step, or `None` at `Select`.
    #[must_use]
    pub fn prev(&self) -> Option<Self> {
        self.index().checked_sub(1).map(|i| Self::SEQUENCE[i])
    }
}

impl Default for WizardStep {
    fn default() -> Self {
        Self::Select
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Select => write!(f, "select"),
            Self::Missing => write!(f, "missing"),
            Self::Encode => write!(f, "encode"),
            Self::Scale => write!(f, "scale"),
            Self::Review => write!(f, "review"),
        }
    }
}

/// The wizard's step state machine.
///
/// - `next()` marks the departed step completed (idempotently) and
///   advances one step.
/// - `back()` moves one step earlier without touching completion marks.
/// - `jump_to(step)` is permitted only when the target is the current
///   step or already completed; forward jumps to unvisited steps fail.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardFlow {
    current: WizardStep,
    completed: Vec<WizardStep>,
}

impl WizardFlow {
    /// Creates a flow positioned at `Select` with nothing completed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current step.
    #[must_use]
    pub fn current(&self) -> WizardStep {
        self.current
    }

    /// Completed steps in the order they were first completed.
    #[must_use]
    pub fn completed_steps(&self) -> &[WizardStep] {
        &self.completed
    }

    /// Returns true when the given step has been completed.
    #[must_use]
    pub fn is_completed(&self, step: WizardStep) -> bool {
        self.completed.contains(&step)
    }

    /// Returns true when the wizard has reached its terminal step.
    #[must_use]
    pub fn at_review(&self) -> bool {
        self.current == WizardStep::Review
    }

    fn mark_completed(&mut self, step: WizardStep) {
        if !self.completed.contains(&step) {
            self.completed.push(step);
        }
    }

    /// Marks the current step completed and advances one step.
    ///
    /// At `Review` this only marks completion; the position is terminal.
    /// Returns the new current step.
    pub fn next(&mut self) -> WizardStep {
        self.mark_completed(self.current);
        if let Some(following) = self.current.next() {
            self.current = following;
        }
        self.current
    }

    /// Moves one step earlier without altering completion marks.
    ///
    /// No-op at `Select`. Returns the new current step.
    pub fn back(&mut self) -> WizardStep {
        if let Some(preceding) = self.current.prev() {
            self.current = preceding;
        }
        self.current
    }

    /// Jumps directly to a step that is the current step or already
    /// completed.
    pub fn jump_to(&mut self, step: WizardStep) -> Result<()> {
        if step == self.current || self.is_completed(step) {
            self.current = step;
            Ok(())
        } else {
            Err(PipeweaveError::InvalidTransition(format!(
                "cannot jump to unvisited step '{step}' from '{}'",
                self.current
            )))
        }
    }
}
