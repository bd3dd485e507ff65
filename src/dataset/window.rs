//! Supervised window construction
//!
//! Turns a normalized series into (input sequence, target) pairs. Windows
//! are generated with stride = window_size, so consecutive windows never
//! share rows. A target sits `horizon` steps past the end of its window.

use ndarray::{s, Array1, Array2};

/// One training sample: `x` is a `(window_size, k)` slice of the series,
/// `y` the row (or single entity value) at `window_size + horizon - 1`
/// steps from the window start.
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    pub x: Array2<f64>,
    pub y: Array1<f64>,
}

/// Build non-overlapping windows from a time-ordered series.
///
/// `entity` projects both input and target to a single column; the input
/// keeps its sequence axis with width-1 rows. A series shorter than
/// `window_size + horizon` yields no windows. Fully deterministic.
pub fn build_windows(
    series: &Array2<f64>,
    window_size: usize,
    horizon: usize,
    entity: Option<usize>,
) -> Vec<Window> {
    let n = series.nrows();
    if window_size == 0 || horizon == 0 || n < window_size + horizon {
        return Vec::new();
    }

    let mut windows = Vec::new();
    let mut t = 0;
    while t + window_size + horizon - 1 < n {
        let target_row = t + window_size + horizon - 1;
        let window = match entity {
            None => Window {
                x: series.slice(s![t..t + window_size, ..]).to_owned(),
                y: series.row(target_row).to_owned(),
            },
            Some(col) => Window {
                x: series
                    .slice(s![t..t + window_size, col..col + 1])
                    .to_owned(),
                y: Array1::from_elem(1, series[[target_row, col]]),
            },
        };
        windows.push(window);
        t += window_size;
    }

    windows
}
