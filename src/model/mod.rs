//! LSTM model and optimizer

mod config;
mod lstm;
mod optimizer;

pub use config::LstmConfig;
pub use lstm::{Lstm, LstmCell};
pub use optimizer::{Adam, Optimizer};
