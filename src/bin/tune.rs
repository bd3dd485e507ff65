//! Grid-search CLI
//!
//! Loads a price CSV, builds the windowed datasets, sweeps the
//! hyperparameter grid for every task, and writes the per-task best
//! configurations to a JSON summary.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use stock_rnn::data::{PriceTable, StandardScaler};
use stock_rnn::dataset::build_datasets;
use stock_rnn::training::{JsonlSink, MetricsSink, TracingSink};
use stock_rnn::tuning::{GridSearch, SearchGrid};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "tune",
    about = "LSTM hyperparameter grid search over windowed stock price series"
)]
struct Args {
    /// CSV of daily closing prices, one column per stock, header row
    #[arg(long)]
    input: PathBuf,

    /// Window sizes to build tasks for
    #[arg(long, value_delimiter = ',', default_value = "30")]
    window_sizes: Vec<usize>,

    /// Forecast horizons to build tasks for
    #[arg(long, value_delimiter = ',', default_value = "1")]
    horizons: Vec<usize>,

    /// Restrict to these stock columns, one task per stock; default is
    /// one multivariate task over all columns
    #[arg(long, value_delimiter = ',')]
    stocks: Option<Vec<String>>,

    /// Training epochs per configuration
    #[arg(long, default_value_t = 10)]
    epochs: usize,

    /// Fraction of each task's windows used for training
    #[arg(long, default_value_t = 0.7)]
    train_ratio: f64,

    /// Fraction of each task's windows used for validation
    #[arg(long, default_value_t = 0.15)]
    val_ratio: f64,

    /// Hidden sizes to try
    #[arg(long, value_delimiter = ',', default_value = "32,64")]
    hidden_dims: Vec<usize>,

    /// Layer counts to try
    #[arg(long, value_delimiter = ',', default_value = "2,8")]
    num_layers: Vec<usize>,

    /// Learning rates to try
    #[arg(long, value_delimiter = ',', default_value = "0.001")]
    learning_rates: Vec<f64>,

    /// Batch sizes to try
    #[arg(long, value_delimiter = ',', default_value = "32,64")]
    batch_sizes: Vec<usize>,

    /// Dropout rates to try
    #[arg(long, value_delimiter = ',', default_value = "0.1,0.2")]
    dropout_rates: Vec<f64>,

    /// Where to write the per-task best-configuration summary
    #[arg(long, default_value = "best_params.json")]
    output: PathBuf,

    /// Also append per-epoch metrics to this JSONL file
    #[arg(long)]
    metrics_file: Option<PathBuf>,

    /// Skip per-column standardization of the input
    #[arg(long)]
    no_scale: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut table = PriceTable::from_csv(&args.input)
        .with_context(|| format!("loading {}", args.input.display()))?;
    info!(
        rows = table.n_rows(),
        stocks = table.n_cols(),
        "loaded price table"
    );

    if !args.no_scale {
        let mut scaler = StandardScaler::new();
        let scaled = scaler.fit_transform(table.values());
        table = table.with_values(scaled)?;
    }

    let dataset = build_datasets(
        &table,
        &args.window_sizes,
        &args.horizons,
        args.stocks.as_deref(),
        args.train_ratio,
        args.val_ratio,
    )?;
    if dataset.is_empty() {
        anyhow::bail!("no task produced any windows; series too short for the requested sizes");
    }

    let grid = SearchGrid {
        hidden_dims: args.hidden_dims,
        num_layers: args.num_layers,
        learning_rates: args.learning_rates,
        batch_sizes: args.batch_sizes,
        dropout_rates: args.dropout_rates,
    };
    let search = GridSearch::new(grid, args.epochs)?;
    info!(
        configurations = search.grid().size(),
        tasks = dataset.len(),
        epochs = args.epochs,
        "starting sweep"
    );

    let mut sink: Box<dyn MetricsSink> = match &args.metrics_file {
        Some(path) => Box::new(
            JsonlSink::create(path)
                .with_context(|| format!("creating {}", path.display()))?,
        ),
        None => Box::new(TracingSink),
    };

    let results = search.search_all(&dataset, sink.as_mut())?;

    if let Err(e) = results.save_json(&args.output) {
        // Results stay in memory; report where they failed to land
        anyhow::bail!("failed to write {}: {}", args.output.display(), e);
    }
    info!(path = %args.output.display(), tasks = results.len(), "wrote best configurations");

    Ok(())
}
