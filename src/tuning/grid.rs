//! Hyperparameter grid definition and enumeration

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One point in hyperparameter space. Immutable once enumerated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HyperParams {
    pub hidden_dim: usize,
    pub num_layers: usize,
    pub learning_rate: f64,
    pub batch_size: usize,
    pub dropout_rate: f64,
}

impl fmt::Display for HyperParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hidden_{}_layers_{}_lr_{}_batch_{}_dropout_{}",
            self.hidden_dim, self.num_layers, self.learning_rate, self.batch_size, self.dropout_rate
        )
    }
}

/// Candidate value lists, one per tunable parameter. The Cartesian
/// product of the lists defines the search space.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchGrid {
    pub hidden_dims: Vec<usize>,
    pub num_layers: Vec<usize>,
    pub learning_rates: Vec<f64>,
    pub batch_sizes: Vec<usize>,
    pub dropout_rates: Vec<f64>,
}

impl Default for SearchGrid {
    fn default() -> Self {
        Self {
            hidden_dims: vec![32, 64],
            num_layers: vec![2, 8],
            learning_rates: vec![1e-3],
            batch_sizes: vec![32, 64],
            dropout_rates: vec![0.1, 0.2],
        }
    }
}

impl SearchGrid {
    /// Check every candidate list before any training starts. A malformed
    /// grid aborts the whole sweep with the offending parameter named.
    pub fn validate(&self) -> Result<()> {
        fn non_empty<T>(values: &[T], name: &str) -> Result<()> {
            if values.is_empty() {
                Err(Error::Config(format!("empty candidate list for `{}`", name)))
            } else {
                Ok(())
            }
        }

        non_empty(&self.hidden_dims, "hidden_dim")?;
        non_empty(&self.num_layers, "num_layers")?;
        non_empty(&self.learning_rates, "learning_rate")?;
        non_empty(&self.batch_sizes, "batch_size")?;
        non_empty(&self.dropout_rates, "dropout_rate")?;

        if self.hidden_dims.iter().any(|&v| v == 0) {
            return Err(Error::Config("`hidden_dim` candidates must be >= 1".into()));
        }
        if self.num_layers.iter().any(|&v| v == 0) {
            return Err(Error::Config("`num_layers` candidates must be >= 1".into()));
        }
        if self.batch_sizes.iter().any(|&v| v == 0) {
            return Err(Error::Config("`batch_size` candidates must be >= 1".into()));
        }
        if self
            .learning_rates
            .iter()
            .any(|&v| !v.is_finite() || v <= 0.0)
        {
            return Err(Error::Config(
                "`learning_rate` candidates must be finite and positive".into(),
            ));
        }
        if self
            .dropout_rates
            .iter()
            .any(|&v| !v.is_finite() || !(0.0..1.0).contains(&v))
        {
            return Err(Error::Config(
                "`dropout_rate` candidates must lie in [0, 1)".into(),
            ));
        }

        Ok(())
    }

    /// Number of configurations the grid enumerates.
    pub fn size(&self) -> usize {
        self.hidden_dims.len()
            * self.num_layers.len()
            * self.learning_rates.len()
            * self.batch_sizes.len()
            * self.dropout_rates.len()
    }

    /// Enumerate every configuration in a stable order: candidate lists
    /// nest left to right in declaration order, so the rightmost
    /// parameter varies fastest.
    pub fn combinations(&self) -> Vec<HyperParams> {
        let mut combos = Vec::with_capacity(self.size());

        for &hidden_dim in &self.hidden_dims {
            for &num_layers in &self.num_layers {
                for &learning_rate in &self.learning_rates {
                    for &batch_size in &self.batch_sizes {
                        for &dropout_rate in &self.dropout_rates {
                            combos.push(HyperParams {
                                hidden_dim,
                                num_layers,
                                learning_rate,
                                batch_size,
                                dropout_rate,
                            });
                        }
                    }
                }
            }
        }

        combos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combination_count_is_list_size_product() {
        let grid = SearchGrid {
            hidden_dims: vec![16, 32, 64],
            num_layers: vec![1, 2],
            learning_rates: vec![1e-3, 1e-2],
            batch_sizes: vec![8],
            dropout_rates: vec![0.0, 0.1],
        };
        let combos = grid.combinations();
        assert_eq!(combos.len(), 3 * 2 * 2 * 1 * 2);
        assert_eq!(combos.len(), grid.size());
    }

    #[test]
    fn test_combinations_are_unique() {
        let grid = SearchGrid::default();
        let combos = grid.combinations();
        for (i, a) in combos.iter().enumerate() {
            for b in combos.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_enumeration_order_is_deterministic() {
        let grid = SearchGrid {
            hidden_dims: vec![16, 32],
            num_layers: vec![1],
            learning_rates: vec![1e-3],
            batch_sizes: vec![8, 16],
            dropout_rates: vec![0.0],
        };
        let combos = grid.combinations();

        // hidden_dim is the outermost loop, batch_size varies faster
        assert_eq!((combos[0].hidden_dim, combos[0].batch_size), (16, 8));
        assert_eq!((combos[1].hidden_dim, combos[1].batch_size), (16, 16));
        assert_eq!((combos[2].hidden_dim, combos[2].batch_size), (32, 8));
        assert_eq!((combos[3].hidden_dim, combos[3].batch_size), (32, 16));

        assert_eq!(combos, grid.combinations());
    }

    #[test]
    fn test_empty_list_fails_validation() {
        let grid = SearchGrid {
            learning_rates: vec![],
            ..SearchGrid::default()
        };
        let err = grid.validate().unwrap_err();
        assert!(err.to_string().contains("learning_rate"));
    }

    #[test]
    fn test_bad_values_fail_validation() {
        let zero_batch = SearchGrid {
            batch_sizes: vec![32, 0],
            ..SearchGrid::default()
        };
        assert!(zero_batch.validate().is_err());

        let negative_lr = SearchGrid {
            learning_rates: vec![-1e-3],
            ..SearchGrid::default()
        };
        assert!(negative_lr.validate().is_err());

        let full_dropout = SearchGrid {
            dropout_rates: vec![1.0],
            ..SearchGrid::default()
        };
        assert!(full_dropout.validate().is_err());
    }

    #[test]
    fn test_default_grid_is_valid() {
        assert!(SearchGrid::default().validate().is_ok());
        assert_eq!(SearchGrid::default().size(), 16);
    }
}
