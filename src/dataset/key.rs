//! Composite key identifying one forecasting task

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a (window_size, horizon) task, optionally narrowed to a
/// single stock.
///
/// Replaces ad-hoc tuple keys with a value type that hashes structurally.
/// `Display` renders the textual form used as a JSON object key in the
/// persisted summary: `(30, 1)` or `(30, 1, 'ABG')`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskKey {
    pub window_size: usize,
    pub horizon: usize,
    pub entity: Option<String>,
}

impl TaskKey {
    /// Task over all stocks at once.
    pub fn new(window_size: usize, horizon: usize) -> Self {
        Self {
            window_size,
            horizon,
            entity: None,
        }
    }

    /// Task projected to a single stock column.
    pub fn for_entity(window_size: usize, horizon: usize, entity: impl Into<String>) -> Self {
        Self {
            window_size,
            horizon,
            entity: Some(entity.into()),
        }
    }
}

impl fmt::Display for TaskKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.entity {
            Some(entity) => write!(f, "({}, {}, '{}')", self.window_size, self.horizon, entity),
            None => write!(f, "({}, {})", self.window_size, self.horizon),
        }
    }
}
