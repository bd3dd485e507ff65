//! LSTM hyperparameter grid search over windowed stock price series.
//!
//! The pipeline loads a CSV of daily closing prices, standardizes it,
//! slices each series into non-overlapping windows with a forecast
//! target, partitions the windows chronologically into train/val/test,
//! and sweeps a hyperparameter grid, training a fresh LSTM regressor per
//! configuration and keeping the one with the lowest final validation
//! MAE per (window_size, horizon) task.
//!
//! # Example
//!
//! ```no_run
//! use stock_rnn::data::PriceTable;
//! use stock_rnn::dataset::build_datasets;
//! use stock_rnn::training::NullSink;
//! use stock_rnn::tuning::{GridSearch, SearchGrid};
//!
//! # fn main() -> stock_rnn::Result<()> {
//! let table = PriceTable::from_csv("prices.csv")?;
//! let dataset = build_datasets(&table, &[30], &[1], None, 0.7, 0.15)?;
//!
//! let search = GridSearch::new(SearchGrid::default(), 10)?;
//! let best = search.search_all(&dataset, &mut NullSink)?;
//! best.save_json("best_params.json")?;
//! # Ok(())
//! # }
//! ```

pub mod data;
pub mod dataset;
pub mod error;
pub mod metrics;
pub mod model;
pub mod training;
pub mod tuning;

pub use error::{Error, Result};
