//! Transform model types.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// The category a transform belongs to.
///
/// At most one transform per (column, category) pair is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformCategory {
    /// Missing-value handling (mean, median, constant fill, drop).
    Missing,
    /// Categorical encoding (one-hot, ordinal, label).
    Encoding,
    /// Numeric scaling (standard, min-max, robust).
    Scaling,
}

impl fmt::Display for TransformCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "missing"),
            Self::Encoding => write!(f, "encoding"),
            Self::Scaling => write!(f, "scaling"),
        }
    }
}

/// One pending data transformation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Unique per transform instance.
    pub id: Uuid,
    /// Target column name.
    pub column: String,
    /// Transform category.
    pub category: TransformCategory,
    /// Strategy name chosen for the category (e.g. "mean", "onehot",
    /// "standard").
    pub operation: String,
    /// Free-form operation configuration (constant fill value, encoding
    /// order, scaling range).
    pub params: serde_json::Value,
    /// Position in the applied sequence.
    pub order: usize,
}

impl Transform {
    /// Creates a transform with a fresh id.
    #[must_use]
    pub fn new(
        column: impl Into<String>,
        category: TransformCategory,
        operation: impl Into<String>,
        params: serde_json::Value,
        order: usize,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            column: column.into(),
            category,
            operation: operation.into(),
            params,
            order,
        }
    }
}
