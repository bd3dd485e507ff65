//! Per-column standardization (zero mean, unit variance)

use ndarray::{Array2, Axis};

/// Z-score scaler fitted column-wise.
///
/// Applied once to the whole table before window construction, matching
/// the preprocessing contract of the pipeline.
#[derive(Debug, Clone, Default)]
pub struct StandardScaler {
    means: Vec<f64>,
    stds: Vec<f64>,
}

impl StandardScaler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fit per-column mean and standard deviation.
    pub fn fit(&mut self, data: &Array2<f64>) {
        let n = data.nrows() as f64;
        self.means.clear();
        self.stds.clear();

        for col in data.axis_iter(Axis(1)) {
            let mean = col.sum() / n;
            let variance = col.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
            self.means.push(mean);
            // Floor guards constant columns
            self.stds.push(variance.sqrt().max(1e-10));
        }
    }

    /// Transform using previously fitted statistics.
    pub fn transform(&self, data: &Array2<f64>) -> Array2<f64> {
        let mut result = data.clone();
        for (j, mut col) in result.axis_iter_mut(Axis(1)).enumerate() {
            let mean = self.means[j];
            let std = self.stds[j];
            col.mapv_inplace(|x| (x - mean) / std);
        }
        result
    }

    /// Fit and transform in one pass.
    pub fn fit_transform(&mut self, data: &Array2<f64>) -> Array2<f64> {
        self.fit(data);
        self.transform(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_zero_mean_unit_variance() {
        let data = array![[1.0, 10.0], [2.0, 20.0], [3.0, 30.0], [4.0, 40.0], [5.0, 50.0]];
        let mut scaler = StandardScaler::new();
        let scaled = scaler.fit_transform(&data);

        for j in 0..2 {
            let col = scaled.column(j);
            let mean = col.sum() / 5.0;
            let var = col.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / 5.0;
            assert_abs_diff_eq!(mean, 0.0, epsilon = 1e-9);
            assert_abs_diff_eq!(var, 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_constant_column_does_not_blow_up() {
        let data = array![[7.0], [7.0], [7.0]];
        let mut scaler = StandardScaler::new();
        let scaled = scaler.fit_transform(&data);
        assert!(scaled.iter().all(|x| x.is_finite()));
    }

    #[test]
    fn test_transform_reuses_fitted_stats() {
        let train = array![[0.0], [2.0], [4.0]];
        let mut scaler = StandardScaler::new();
        scaler.fit(&train);

        let other = array![[2.0]];
        let scaled = scaler.transform(&other);
        // Mean of the fitted data, so it maps to zero
        assert_abs_diff_eq!(scaled[[0, 0]], 0.0, epsilon = 1e-9);
    }
}
