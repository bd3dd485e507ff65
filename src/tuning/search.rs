//! Grid-search orchestration
//!
//! Enumerates the hyperparameter grid for one (window_size, horizon)
//! task, trains a fresh model per configuration, tracks the best
//! configuration by final validation MAE, and persists the per-task
//! summary as JSON.

use crate::dataset::{make_batches, Dataset, TaskKey};
use crate::error::{Error, Result};
use crate::metrics::{mae, mape, rmse};
use crate::model::{Adam, Lstm, LstmConfig};
use crate::training::{EpochLog, MetricsSink, Trainer};
use crate::tuning::grid::{HyperParams, SearchGrid};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;
use tracing::{info, warn};

/// Everything recorded about one completed configuration run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub params: HyperParams,
    /// Per-epoch metrics in epoch order
    pub epochs: Vec<EpochLog>,
    /// Cumulative sweep training time when this run finished, seconds
    pub total_train_time_secs: f64,
}

impl RunSummary {
    pub fn final_epoch(&self) -> Option<&EpochLog> {
        self.epochs.last()
    }

    /// Validation MAE of the final epoch, the selection criterion.
    pub fn val_mae(&self) -> f64 {
        self.epochs.last().map_or(f64::INFINITY, |e| e.val_mae)
    }
}

/// Running best-result record for one sweep. Updated by strictly-less
/// comparison, so the earliest of tied configurations wins.
#[derive(Debug, Default)]
struct SweepState {
    best: Option<RunSummary>,
}

impl SweepState {
    /// Adopt the candidate iff it strictly improves on the current best.
    fn consider(&mut self, candidate: RunSummary) -> bool {
        let improved = match &self.best {
            None => true,
            Some(best) => candidate.val_mae() < best.val_mae(),
        };
        if improved {
            self.best = Some(candidate);
        }
        improved
    }

    fn into_best(self) -> Option<RunSummary> {
        self.best
    }
}

/// Result of sweeping one task.
#[derive(Debug)]
pub struct SweepOutcome {
    pub key: TaskKey,
    pub best: Option<RunSummary>,
    /// Configurations trained to completion
    pub evaluated: usize,
    /// Configurations skipped due to insufficient data
    pub skipped: usize,
    pub total_train_time_secs: f64,
}

/// Batch-averaged metrics on the held-out test partition.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TestMetrics {
    pub mae: f64,
    pub mape: f64,
    pub rmse: f64,
}

/// Flat record persisted per task: the winning configuration's fields
/// plus its final metrics, mirroring the summary layout of the study
/// this pipeline reproduces.
#[derive(Debug, Clone, Serialize)]
struct BestRecord {
    #[serde(flatten)]
    params: HyperParams,
    train_mae: f64,
    train_mape: f64,
    train_rmse: f64,
    val_mae: f64,
    val_mape: f64,
    val_rmse: f64,
    total_train_time: f64,
}

#[derive(Debug, Clone, Serialize)]
struct BestEntry {
    best_hyperparameters: BestRecord,
    best_val_loss: f64,
}

/// The best result per task, keyed by the task's textual form, ready for
/// JSON persistence.
#[derive(Debug, Default, Serialize)]
pub struct BestResults {
    #[serde(flatten)]
    entries: BTreeMap<String, BestEntry>,
}

impl BestResults {
    pub fn insert(&mut self, key: &TaskKey, summary: &RunSummary) {
        let Some(last) = summary.final_epoch() else {
            return;
        };
        let entry = BestEntry {
            best_hyperparameters: BestRecord {
                params: summary.params.clone(),
                train_mae: last.train_mae,
                train_mape: last.train_mape,
                train_rmse: last.train_rmse,
                val_mae: last.val_mae,
                val_mape: last.val_mape,
                val_rmse: last.val_rmse,
                total_train_time: summary.total_train_time_secs,
            },
            best_val_loss: last.val_mae,
        };
        self.entries.insert(key.to_string(), entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &TaskKey) -> bool {
        self.entries.contains_key(&key.to_string())
    }

    /// Write the summary as pretty-printed JSON. A failed write reports
    /// the error without consuming the results; everything computed stays
    /// available to the caller.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}

/// Enumerates and evaluates the grid, one task at a time.
#[derive(Debug, Clone)]
pub struct GridSearch {
    grid: SearchGrid,
    num_epochs: usize,
}

impl GridSearch {
    /// Validates the grid up front; a malformed grid never trains.
    pub fn new(grid: SearchGrid, num_epochs: usize) -> Result<Self> {
        grid.validate()?;
        if num_epochs == 0 {
            return Err(Error::Config("num_epochs must be >= 1".into()));
        }
        Ok(Self { grid, num_epochs })
    }

    pub fn grid(&self) -> &SearchGrid {
        &self.grid
    }

    /// Sweep every configuration for one task.
    ///
    /// Each configuration gets a fresh model and optimizer; nothing is
    /// shared between runs. Configurations that cannot be evaluated are
    /// counted as skipped and the sweep continues.
    pub fn search(
        &self,
        dataset: &Dataset,
        key: &TaskKey,
        sink: &mut dyn MetricsSink,
    ) -> Result<SweepOutcome> {
        let split = dataset
            .get(key)
            .ok_or_else(|| Error::InsufficientData(format!("no dataset for task {}", key)))?;

        let combos = self.grid.combinations();

        if split.train.is_empty() || split.val.is_empty() {
            warn!(task = %key, "empty train or validation partition, skipping task");
            return Ok(SweepOutcome {
                key: key.clone(),
                best: None,
                evaluated: 0,
                skipped: combos.len(),
                total_train_time_secs: 0.0,
            });
        }

        let input_size = split.train[0].x.ncols();
        let output_size = split.train[0].y.len();

        let pb = ProgressBar::new(combos.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
                .unwrap()
                .progress_chars("#>-"),
        );

        let mut state = SweepState::default();
        let mut evaluated = 0usize;
        let mut skipped = 0usize;
        let mut total_train_time = 0.0;

        for params in combos {
            let run_name = match &key.entity {
                Some(entity) => format!(
                    "window_{}_horizon_{}_stock_{}_{}",
                    key.window_size, key.horizon, entity, params
                ),
                None => format!("window_{}_horizon_{}_{}", key.window_size, key.horizon, params),
            };
            pb.set_message(params.to_string());

            let train_batches = make_batches(&split.train, params.batch_size);
            let val_batches = make_batches(&split.val, params.batch_size);

            let config = LstmConfig::new(input_size, params.hidden_dim, output_size)
                .with_layers(params.num_layers)
                .with_dropout(params.dropout_rate);
            let mut model = Lstm::from_config(config);
            let mut optimizer = Adam::new(params.learning_rate);
            let trainer = Trainer::new(self.num_epochs);

            match trainer.run(
                &mut model,
                &mut optimizer,
                &train_batches,
                &val_batches,
                &run_name,
                sink,
            ) {
                Ok(epochs) => {
                    total_train_time += epochs.iter().map(|e| e.duration_secs).sum::<f64>();
                    evaluated += 1;
                    let summary = RunSummary {
                        params: params.clone(),
                        epochs,
                        total_train_time_secs: total_train_time,
                    };
                    let val_mae = summary.val_mae();
                    if state.consider(summary) {
                        info!(task = %key, %params, val_mae, "new best configuration");
                    }
                }
                Err(Error::InsufficientData(msg)) => {
                    warn!(task = %key, %params, "configuration skipped: {}", msg);
                    skipped += 1;
                }
                Err(e) => return Err(e),
            }

            pb.inc(1);
        }

        pb.finish_with_message("sweep complete");

        Ok(SweepOutcome {
            key: key.clone(),
            best: state.into_best(),
            evaluated,
            skipped,
            total_train_time_secs: total_train_time,
        })
    }

    /// Sweep every task in the dataset, in deterministic task order, and
    /// collect the per-task best results.
    pub fn search_all(&self, dataset: &Dataset, sink: &mut dyn MetricsSink) -> Result<BestResults> {
        let mut keys: Vec<&TaskKey> = dataset.keys().collect();
        keys.sort_by_key(|k| (k.window_size, k.horizon, k.entity.clone()));

        let mut results = BestResults::default();
        for key in keys {
            let outcome = self.search(dataset, key, sink)?;
            match &outcome.best {
                Some(summary) => {
                    info!(
                        task = %outcome.key,
                        params = %summary.params,
                        best_val_loss = summary.val_mae(),
                        evaluated = outcome.evaluated,
                        skipped = outcome.skipped,
                        "task sweep finished"
                    );
                    results.insert(&outcome.key, summary);
                }
                None => {
                    warn!(task = %outcome.key, "no configuration succeeded for task");
                }
            }
        }

        Ok(results)
    }

    /// Retrain a configuration and report batch-averaged metrics on the
    /// held-out test partition, forwarded to the sink.
    pub fn evaluate_on_test(
        &self,
        dataset: &Dataset,
        key: &TaskKey,
        params: &HyperParams,
        sink: &mut dyn MetricsSink,
    ) -> Result<TestMetrics> {
        let split = dataset
            .get(key)
            .ok_or_else(|| Error::InsufficientData(format!("no dataset for task {}", key)))?;

        let test_batches = make_batches(&split.test, params.batch_size);
        if test_batches.is_empty() {
            return Err(Error::InsufficientData(format!(
                "task {}: empty test partition",
                key
            )));
        }

        let train_batches = make_batches(&split.train, params.batch_size);
        let val_batches = make_batches(&split.val, params.batch_size);

        let input_size = split.test[0].x.ncols();
        let output_size = split.test[0].y.len();
        let config = LstmConfig::new(input_size, params.hidden_dim, output_size)
            .with_layers(params.num_layers)
            .with_dropout(params.dropout_rate);
        let mut model = Lstm::from_config(config);
        let mut optimizer = Adam::new(params.learning_rate);

        let run_name = format!("test_{}", key);
        Trainer::new(self.num_epochs).run(
            &mut model,
            &mut optimizer,
            &train_batches,
            &val_batches,
            &run_name,
            sink,
        )?;

        let mut total_mae = 0.0;
        let mut total_mape = 0.0;
        let mut total_rmse = 0.0;
        for batch in &test_batches {
            let predictions = model.predict(&batch.x);
            total_mae += mae(&batch.y, &predictions);
            total_mape += mape(&batch.y, &predictions).value;
            total_rmse += rmse(&batch.y, &predictions);
        }
        let n = test_batches.len() as f64;

        let metrics = TestMetrics {
            mae: total_mae / n,
            mape: total_mape / n,
            rmse: total_rmse / n,
        };

        sink.log_scalars(
            &run_name,
            self.num_epochs,
            &[
                ("test_mae", metrics.mae),
                ("test_mape", metrics.mape),
                ("test_rmse", metrics.rmse),
            ],
        );

        Ok(metrics)
    }
}
