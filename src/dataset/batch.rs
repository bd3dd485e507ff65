//! Fixed-order batching of windowed samples
//!
//! Batches preserve window order and keep the same composition every
//! epoch; there is no reshuffling, so every hyperparameter trial sees the
//! data in the same order. The last batch may be smaller.

use super::window::Window;
use ndarray::{Array2, Array3};

/// One batch of samples: `x` is `(batch, window_size, k)`,
/// `y` is `(batch, output)`.
#[derive(Debug, Clone)]
pub struct Batch {
    pub x: Array3<f64>,
    pub y: Array2<f64>,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.x.shape()[0]
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Chunk a partition into batches of `batch_size` without padding or
/// dropping. All windows in the partition must share one shape.
pub fn make_batches(windows: &[Window], batch_size: usize) -> Vec<Batch> {
    if windows.is_empty() || batch_size == 0 {
        return Vec::new();
    }

    let seq_len = windows[0].x.nrows();
    let n_features = windows[0].x.ncols();
    let n_outputs = windows[0].y.len();

    windows
        .chunks(batch_size)
        .map(|chunk| {
            let mut x = Array3::zeros((chunk.len(), seq_len, n_features));
            let mut y = Array2::zeros((chunk.len(), n_outputs));
            for (b, window) in chunk.iter().enumerate() {
                for t in 0..seq_len {
                    for f in 0..n_features {
                        x[[b, t, f]] = window.x[[t, f]];
                    }
                }
                for (o, &value) in window.y.iter().enumerate() {
                    y[[b, o]] = value;
                }
            }
            Batch { x, y }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::window::build_windows;
    use ndarray::Array2;

    fn sample_windows(n_rows: usize) -> Vec<Window> {
        let series = Array2::from_shape_fn((n_rows, 2), |(i, j)| (i * 2 + j) as f64);
        build_windows(&series, 5, 1, None)
    }

    #[test]
    fn test_short_last_batch() {
        let windows = sample_windows(200); // 39 windows
        assert_eq!(windows.len(), 39);

        let batches = make_batches(&windows, 16);
        assert_eq!(batches.len(), 3);
        assert_eq!(batches[0].len(), 16);
        assert_eq!(batches[1].len(), 16);
        assert_eq!(batches[2].len(), 7);
    }

    #[test]
    fn test_order_preserved() {
        let windows = sample_windows(200);
        let batches = make_batches(&windows, 16);

        // First sample of the second batch is the 17th window
        assert_eq!(batches[1].y.row(0).to_owned(), windows[16].y);
        assert_eq!(batches[1].x[[0, 0, 0]], windows[16].x[[0, 0]]);
    }

    #[test]
    fn test_shapes() {
        let windows = sample_windows(100);
        let batches = make_batches(&windows, 8);
        assert_eq!(batches[0].x.dim(), (8, 5, 2));
        assert_eq!(batches[0].y.dim(), (8, 2));
    }

    #[test]
    fn test_empty_partition() {
        assert!(make_batches(&[], 32).is_empty());
    }
}
