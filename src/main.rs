//! Linewatch - Main Entry Point

use clap::Parser;
use linewatch::cli::{cmd_serve, cmd_simulate, cmd_train, Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "linewatch=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Train {
            train_start,
            train_end,
            test_start,
            test_end,
        }) => {
            cmd_train(&train_start, &train_end, &test_start, &test_end)?;
        }
        Some(Commands::Simulate { start, end, limit }) => {
            cmd_simulate(&start, &end, limit)?;
        }
        Some(Commands::Serve { host, port }) => {
            cmd_serve(host, port).await?;
        }
        None => {
            // Default: run the server with environment configuration.
            cmd_serve(None, None).await?;
        }
    }

    Ok(())
}
