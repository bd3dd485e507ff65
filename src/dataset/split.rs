//! Time-ordered train/validation/test partitioning
//!
//! Splits are contiguous slices in original window order; no shuffling is
//! ever applied, so no future window leaks into an earlier partition.

use super::window::Window;

/// Default share of windows assigned to training.
pub const DEFAULT_TRAIN_RATIO: f64 = 0.7;
/// Default share of windows assigned to validation.
pub const DEFAULT_VAL_RATIO: f64 = 0.15;

/// The three disjoint partitions of one task's windows, train earliest and
/// test latest. Concatenated in order they reproduce the input exactly.
#[derive(Debug, Clone, Default)]
pub struct SplitWindows {
    pub train: Vec<Window>,
    pub val: Vec<Window>,
    pub test: Vec<Window>,
}

impl SplitWindows {
    pub fn len(&self) -> usize {
        self.train.len() + self.val.len() + self.test.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Partition windows by floor-rounded ratios; whatever the ratios leave
/// over goes to test. Small inputs may produce empty partitions.
pub fn split_windows(windows: Vec<Window>, train_ratio: f64, val_ratio: f64) -> SplitWindows {
    let n = windows.len();
    let train_end = (n as f64 * train_ratio) as usize;
    let val_end = train_end + (n as f64 * val_ratio) as usize;

    let mut train = windows;
    let mut val = train.split_off(train_end.min(n));
    let test = val.split_off((val_end - train_end).min(val.len()));

    SplitWindows { train, val, test }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::window::build_windows;
    use ndarray::Array2;

    fn windows_from(rows: usize, window_size: usize, horizon: usize) -> Vec<Window> {
        let series = Array2::from_shape_fn((rows, 1), |(i, _)| i as f64);
        build_windows(&series, window_size, horizon, None)
    }

    #[test]
    fn test_concrete_scenario() {
        // 100 rows, w=10, h=1 -> 9 windows -> 6 / 1 / 2
        let windows = windows_from(100, 10, 1);
        assert_eq!(windows.len(), 9);

        let split = split_windows(windows, 0.7, 0.15);
        assert_eq!(split.train.len(), 6);
        assert_eq!(split.val.len(), 1);
        assert_eq!(split.test.len(), 2);
    }

    #[test]
    fn test_partition_sizes_sum() {
        for rows in [50usize, 77, 100, 203] {
            let windows = windows_from(rows, 5, 1);
            let n = windows.len();
            let split = split_windows(windows, 0.7, 0.15);
            assert_eq!(split.len(), n);
        }
    }

    #[test]
    fn test_temporal_order_preserved() {
        let windows = windows_from(200, 10, 1);
        let split = split_windows(windows, 0.7, 0.15);

        let last_train = split.train.last().unwrap().y[0];
        let first_val = split.val.first().unwrap().y[0];
        let last_val = split.val.last().unwrap().y[0];
        let first_test = split.test.first().unwrap().y[0];

        assert!(last_train < first_val);
        assert!(last_val < first_test);
    }

    #[test]
    fn test_leftover_goes_to_test() {
        // Ratios that do not sum to 1
        let windows = windows_from(110, 10, 1);
        let n = windows.len(); // 10 windows
        let split = split_windows(windows, 0.5, 0.2);
        assert_eq!(split.train.len(), 5);
        assert_eq!(split.val.len(), 2);
        assert_eq!(split.test.len(), n - 7);
    }

    #[test]
    fn test_tiny_input_degenerates_quietly() {
        let windows = windows_from(12, 10, 1); // a single window
        let split = split_windows(windows, 0.7, 0.15);
        assert_eq!(split.train.len(), 0);
        assert_eq!(split.val.len(), 0);
        assert_eq!(split.test.len(), 1);
    }
}
