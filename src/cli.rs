//! Command-line interface
//!
//! The same operations the HTTP API exposes, runnable offline against the
//! configured dataset and model store.

use clap::{Parser, Subcommand};
use tracing::info;

use crate::config::ServiceConfig;
use crate::error::Result;
use crate::service::PredictionService;

#[derive(Parser)]
#[command(name = "linewatch", about = "Pass/fail prediction service for production telemetry")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Train a model on a historical window and evaluate on a later one
    Train {
        #[arg(long)]
        train_start: String,
        #[arg(long)]
        train_end: String,
        #[arg(long)]
        test_start: String,
        #[arg(long)]
        test_end: String,
    },
    /// Run batched retrospective predictions over a window
    Simulate {
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
        /// Print at most this many result rows
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
}

pub async fn cmd_serve(host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    let mut config = ServiceConfig::default();
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }
    crate::server::run_server(config).await
}

pub fn cmd_train(
    train_start: &str,
    train_end: &str,
    test_start: &str,
    test_end: &str,
) -> Result<()> {
    let service = PredictionService::new(ServiceConfig::default());
    let metrics = service.train(train_start, train_end, test_start, test_end)?;

    println!("Training complete");
    println!("  accuracy:  {:.4}", metrics.accuracy);
    println!("  precision: {:.4}", metrics.precision);
    println!("  recall:    {:.4}", metrics.recall);
    println!("  f1_score:  {:.4}", metrics.f1_score);
    Ok(())
}

pub fn cmd_simulate(start: &str, end: &str, limit: usize) -> Result<()> {
    let service = PredictionService::new(ServiceConfig::default());
    let results = service.simulate(start, end)?;
    info!(records = results.len(), "Simulation finished");

    println!("Simulated {} records", results.len());
    for row in results.iter().take(limit) {
        let confidence = row
            .confidence
            .map(|c| format!("{c:.3}"))
            .unwrap_or_else(|| "null".to_string());
        println!(
            "  {}  id={}  prediction={}  confidence={}",
            row.timestamp, row.id, row.prediction, confidence
        );
    }
    Ok(())
}
