//! Train/validate loop for a single configuration
//!
//! Each epoch runs a full training pass, then a full validation pass,
//! then logs the averaged metrics; epochs are strictly sequential. The
//! model's parameters are only touched during the training pass.

use crate::dataset::Batch;
use crate::error::{Error, Result};
use crate::metrics::{mae, mape, rmse};
use crate::model::{Lstm, Optimizer};
use crate::training::sink::MetricsSink;
use serde::Serialize;
use std::time::Instant;
use tracing::debug;

/// Metrics of one completed epoch.
///
/// Values are arithmetic means of per-batch metrics, averaged by batch
/// count; with a short last batch this approximates the partition-wide
/// metric.
#[derive(Debug, Clone, Serialize)]
pub struct EpochLog {
    /// 1-based epoch counter
    pub epoch: usize,
    pub train_mae: f64,
    pub train_mape: f64,
    pub train_rmse: f64,
    pub val_mae: f64,
    pub val_mape: f64,
    pub val_rmse: f64,
    /// Samples excluded from MAPE this epoch because the target was zero
    pub mape_skipped: usize,
    /// Wall-clock duration of the epoch in seconds
    pub duration_secs: f64,
}

/// Runs the epoch loop for one hyperparameter configuration.
#[derive(Debug, Clone)]
pub struct Trainer {
    pub num_epochs: usize,
}

impl Trainer {
    pub fn new(num_epochs: usize) -> Self {
        Self { num_epochs }
    }

    /// Train and validate, returning one log per epoch.
    ///
    /// An empty train or validation batch list means the configuration
    /// cannot be evaluated; the error is reported so the caller can skip
    /// this configuration without aborting the sweep.
    pub fn run(
        &self,
        model: &mut Lstm,
        optimizer: &mut dyn Optimizer,
        train_batches: &[Batch],
        val_batches: &[Batch],
        run_name: &str,
        sink: &mut dyn MetricsSink,
    ) -> Result<Vec<EpochLog>> {
        if train_batches.is_empty() {
            return Err(Error::InsufficientData(format!(
                "{}: no training batches",
                run_name
            )));
        }
        if val_batches.is_empty() {
            return Err(Error::InsufficientData(format!(
                "{}: no validation batches",
                run_name
            )));
        }

        let mut logs = Vec::with_capacity(self.num_epochs);

        for epoch in 0..self.num_epochs {
            let start = Instant::now();

            // Training pass: parameters move here and only here
            let mut train_loss = 0.0;
            let mut train_mape = 0.0;
            let mut train_rmse = 0.0;
            let mut skipped = 0usize;
            for batch in train_batches {
                let predictions = model.train_batch(&batch.x, &batch.y, optimizer);
                train_loss += mae(&batch.y, &predictions);
                let m = mape(&batch.y, &predictions);
                train_mape += m.value;
                skipped += m.skipped;
                train_rmse += rmse(&batch.y, &predictions);
            }
            let n_train = train_batches.len() as f64;

            // Validation pass: metrics only, no parameter mutation
            let mut val_loss = 0.0;
            let mut val_mape = 0.0;
            let mut val_rmse = 0.0;
            for batch in val_batches {
                let predictions = model.predict(&batch.x);
                val_loss += mae(&batch.y, &predictions);
                let m = mape(&batch.y, &predictions);
                val_mape += m.value;
                skipped += m.skipped;
                val_rmse += rmse(&batch.y, &predictions);
            }
            let n_val = val_batches.len() as f64;

            let log = EpochLog {
                epoch: epoch + 1,
                train_mae: train_loss / n_train,
                train_mape: train_mape / n_train,
                train_rmse: train_rmse / n_train,
                val_mae: val_loss / n_val,
                val_mape: val_mape / n_val,
                val_rmse: val_rmse / n_val,
                mape_skipped: skipped,
                duration_secs: start.elapsed().as_secs_f64(),
            };

            debug!(
                run = run_name,
                epoch = log.epoch,
                train_mae = log.train_mae,
                val_mae = log.val_mae,
                "epoch complete"
            );

            sink.log_scalars(
                run_name,
                log.epoch,
                &[
                    ("train_mae", log.train_mae),
                    ("val_mae", log.val_mae),
                    ("train_mape", log.train_mape),
                    ("val_mape", log.val_mape),
                    ("train_rmse", log.train_rmse),
                    ("val_rmse", log.val_rmse),
                    ("epoch_time", log.duration_secs),
                ],
            );

            logs.push(log);
        }

        Ok(logs)
    }
}
