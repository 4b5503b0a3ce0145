//! Star Predictor - Main Entry Point
//!
//! Serves the prediction API or drives it from the command line.

use clap::Parser;
use star_predictor::cli::{cmd_bulk, cmd_health, cmd_predict, cmd_serve, Cli, Commands};
use star_predictor::schema::StarRecord;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "star_predictor=info,tower_http=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { host, port, model } => {
            cmd_serve(&host, port, model).await?;
        }
        Commands::Predict {
            temperature,
            luminosity,
            radius,
            magnitude,
            url,
        } => {
            let record = StarRecord {
                temperature,
                luminosity,
                radius,
                absolute_magnitude: magnitude,
            };
            cmd_predict(record, &url).await?;
        }
        Commands::Bulk { file, output, url } => {
            cmd_bulk(&file, output.as_ref(), &url).await?;
        }
        Commands::Health { url } => {
            cmd_health(&url).await?;
        }
    }

    Ok(())
}
