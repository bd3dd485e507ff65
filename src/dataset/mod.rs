//! Windowed dataset construction
//!
//! Builds the keyed map of train/val/test partitions for every
//! (window_size, horizon) task, optionally per stock.

mod batch;
mod key;
mod split;
mod window;

pub use batch::{make_batches, Batch};
pub use key::TaskKey;
pub use split::{split_windows, SplitWindows, DEFAULT_TRAIN_RATIO, DEFAULT_VAL_RATIO};
pub use window::{build_windows, Window};

use crate::data::PriceTable;
use crate::error::{Error, Result};
use std::collections::HashMap;
use tracing::{info, warn};

/// All tasks' partitioned windows, keyed by task.
pub type Dataset = HashMap<TaskKey, SplitWindows>;

/// Build partitioned windows for the cross product of `window_sizes` and
/// `horizons`, one task per combination; with `entities` given, one task
/// per (window_size, horizon, stock) instead.
///
/// Combinations that yield no windows are skipped with a warning rather
/// than failing the whole build. An unknown entity name is a
/// configuration error.
pub fn build_datasets(
    table: &PriceTable,
    window_sizes: &[usize],
    horizons: &[usize],
    entities: Option<&[String]>,
    train_ratio: f64,
    val_ratio: f64,
) -> Result<Dataset> {
    let mut dataset = Dataset::new();

    let mut tasks: Vec<(TaskKey, Option<usize>)> = Vec::new();
    for &window_size in window_sizes {
        for &horizon in horizons {
            match entities {
                None => tasks.push((TaskKey::new(window_size, horizon), None)),
                Some(names) => {
                    for name in names {
                        let col = table.column_index(name).ok_or_else(|| {
                            Error::Config(format!("unknown entity column: {:?}", name))
                        })?;
                        tasks.push((TaskKey::for_entity(window_size, horizon, name), Some(col)));
                    }
                }
            }
        }
    }

    for (task_key, col) in tasks {
        let windows = build_windows(
            table.values(),
            task_key.window_size,
            task_key.horizon,
            col,
        );
        if windows.is_empty() {
            warn!(task = %task_key, "no windows for task, skipping");
            continue;
        }

        let split = split_windows(windows, train_ratio, val_ratio);
        info!(
            task = %task_key,
            train = split.train.len(),
            val = split.val.len(),
            test = split.test.len(),
            "built dataset"
        );
        dataset.insert(task_key, split);
    }

    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn test_table(rows: usize) -> PriceTable {
        let values = Array2::from_shape_fn((rows, 3), |(i, j)| (i + j) as f64);
        PriceTable::new(
            vec!["ABG".to_string(), "AGL".to_string(), "SOL".to_string()],
            values,
        )
        .unwrap()
    }

    #[test]
    fn test_one_task_per_combination() {
        let table = test_table(500);
        let dataset =
            build_datasets(&table, &[10, 20], &[1, 2, 5], None, 0.7, 0.15).unwrap();
        assert_eq!(dataset.len(), 6);
        assert!(dataset.contains_key(&TaskKey::new(20, 5)));
    }

    #[test]
    fn test_per_entity_tasks() {
        let table = test_table(300);
        let entities = vec!["ABG".to_string(), "SOL".to_string()];
        let dataset =
            build_datasets(&table, &[10], &[1], Some(&entities), 0.7, 0.15).unwrap();
        assert_eq!(dataset.len(), 2);

        let split = &dataset[&TaskKey::for_entity(10, 1, "SOL")];
        assert_eq!(split.train[0].x.ncols(), 1);
    }

    #[test]
    fn test_unknown_entity_is_config_error() {
        let table = test_table(300);
        let entities = vec!["NOPE".to_string()];
        let result = build_datasets(&table, &[10], &[1], Some(&entities), 0.7, 0.15);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_degenerate_combination_skipped() {
        let table = test_table(50);
        // window 40 + horizon 20 exceeds the series, window 10 fits
        let dataset = build_datasets(&table, &[40, 10], &[20], None, 0.7, 0.15).unwrap();
        assert_eq!(dataset.len(), 1);
        assert!(dataset.contains_key(&TaskKey::new(10, 20)));
    }
}
