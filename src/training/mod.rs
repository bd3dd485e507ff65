//! Epoch-wise training and validation

mod sink;
mod trainer;

pub use sink::{JsonlSink, MetricsSink, NullSink, TracingSink};
pub use trainer::{EpochLog, Trainer};
