//! Experiment metric sinks
//!
//! A sink receives flat metric-name/value pairs per epoch, fire and
//! forget: a sink never affects training control flow, and a failing
//! write only produces a warning.

use crate::error::Result;
use serde_json::{json, Map, Value};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{info, warn};

/// Receiver for scalar training metrics.
pub trait MetricsSink {
    /// Record the scalars for one step of the named run. `step` is a
    /// monotonically increasing epoch counter within the run.
    fn log_scalars(&mut self, run: &str, step: usize, scalars: &[(&str, f64)]);
}

/// Logs metrics as structured tracing events.
#[derive(Debug, Default)]
pub struct TracingSink;

impl MetricsSink for TracingSink {
    fn log_scalars(&mut self, run: &str, step: usize, scalars: &[(&str, f64)]) {
        let rendered = scalars
            .iter()
            .map(|(name, value)| format!("{}={:.4}", name, value))
            .collect::<Vec<_>>()
            .join(" ");
        info!(run, epoch = step, "{}", rendered);
    }
}

/// Appends one JSON object per step to a file.
#[derive(Debug)]
pub struct JsonlSink {
    writer: BufWriter<File>,
}

impl JsonlSink {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }
}

impl MetricsSink for JsonlSink {
    fn log_scalars(&mut self, run: &str, step: usize, scalars: &[(&str, f64)]) {
        let mut record = Map::new();
        record.insert("run".to_string(), json!(run));
        record.insert("epoch".to_string(), json!(step));
        for (name, value) in scalars {
            record.insert((*name).to_string(), json!(value));
        }

        let line = Value::Object(record).to_string();
        if let Err(e) = writeln!(self.writer, "{}", line) {
            warn!("failed to write metrics line: {}", e);
        }
    }
}

impl Drop for JsonlSink {
    fn drop(&mut self) {
        if let Err(e) = self.writer.flush() {
            warn!("failed to flush metrics file: {}", e);
        }
    }
}

/// Discards everything; used in tests.
#[derive(Debug, Default)]
pub struct NullSink;

impl MetricsSink for NullSink {
    fn log_scalars(&mut self, _run: &str, _step: usize, _scalars: &[(&str, f64)]) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_jsonl_sink_writes_one_object_per_step() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("metrics.jsonl");

        {
            let mut sink = JsonlSink::create(&path).unwrap();
            sink.log_scalars("run_a", 1, &[("train_mae", 0.5), ("val_mae", 0.6)]);
            sink.log_scalars("run_a", 2, &[("train_mae", 0.4), ("val_mae", 0.55)]);
        }

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["run"], "run_a");
        assert_eq!(first["epoch"], 1);
        assert_eq!(first["train_mae"], 0.5);
    }
}
