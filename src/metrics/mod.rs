//! Prediction quality metrics
//!
//! All metrics are batch-local: the training loop averages per-batch
//! values by batch count rather than recomputing over a whole partition,
//! which approximates the true metric when the last batch is short.

use ndarray::Array2;

/// Mean Absolute Error
pub fn mae(y_true: &Array2<f64>, y_pred: &Array2<f64>) -> f64 {
    let diff = y_true - y_pred;
    diff.mapv(|x| x.abs()).mean().unwrap_or(0.0)
}

/// Root Mean Squared Error
pub fn rmse(y_true: &Array2<f64>, y_pred: &Array2<f64>) -> f64 {
    let diff = y_true - y_pred;
    diff.mapv(|x| x * x).mean().unwrap_or(0.0).sqrt()
}

/// MAPE over one batch, with the samples that had to be excluded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapeResult {
    /// Mean absolute percentage error over the kept samples, in percent.
    pub value: f64,
    /// Samples excluded because the true value was exactly zero.
    pub skipped: usize,
}

/// Mean Absolute Percentage Error.
///
/// A zero true value makes the percentage undefined; such samples are
/// excluded from the mean and counted in `skipped`. If every sample is
/// excluded the value is 0.0.
pub fn mape(y_true: &Array2<f64>, y_pred: &Array2<f64>) -> MapeResult {
    let mut sum = 0.0;
    let mut kept = 0usize;
    let mut skipped = 0usize;

    for (t, p) in y_true.iter().zip(y_pred.iter()) {
        if *t == 0.0 {
            skipped += 1;
        } else {
            sum += ((t - p) / t).abs();
            kept += 1;
        }
    }

    let value = if kept > 0 {
        sum / kept as f64 * 100.0
    } else {
        0.0
    };

    MapeResult { value, skipped }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_mae() {
        let y_true = array![[1.0], [4.0]];
        let y_pred = array![[1.0], [2.0]];
        assert_abs_diff_eq!(mae(&y_true, &y_pred), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rmse() {
        let y_true = array![[0.0], [0.0]];
        let y_pred = array![[3.0], [4.0]];
        // sqrt((9 + 16) / 2)
        assert_abs_diff_eq!(rmse(&y_true, &y_pred), 12.5f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_mape_concrete_scenario() {
        // predictions [1, 2] against targets [1, 4] -> mean(0, 0.5) * 100
        let y_true = array![[1.0], [4.0]];
        let y_pred = array![[1.0], [2.0]];
        let result = mape(&y_true, &y_pred);
        assert_abs_diff_eq!(result.value, 25.0, epsilon = 1e-12);
        assert_eq!(result.skipped, 0);
    }

    #[test]
    fn test_mape_skips_zero_targets() {
        let y_true = array![[0.0], [2.0]];
        let y_pred = array![[5.0], [1.0]];
        let result = mape(&y_true, &y_pred);
        // Only the second sample counts: |(2-1)/2| * 100
        assert_abs_diff_eq!(result.value, 50.0, epsilon = 1e-12);
        assert_eq!(result.skipped, 1);
    }

    #[test]
    fn test_mape_all_zero_targets() {
        let y_true = array![[0.0], [0.0]];
        let y_pred = array![[1.0], [1.0]];
        let result = mape(&y_true, &y_pred);
        assert_eq!(result.value, 0.0);
        assert_eq!(result.skipped, 2);
    }
}
