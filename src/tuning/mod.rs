//! Hyperparameter grid search

mod grid;
mod search;

pub use grid::{HyperParams, SearchGrid};
pub use search::{BestResults, GridSearch, RunSummary, SweepOutcome, TestMetrics};
