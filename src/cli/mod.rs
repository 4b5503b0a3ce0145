//! Star Predictor CLI Module
//!
//! Command-line front end: runs the server and drives the two interactive
//! prediction modes against a running instance.

use std::io::Cursor;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::*;
use polars::prelude::*;

use crate::client::{ApiClient, ClientError, ConfidenceTier};
use crate::schema::StarRecord;
use crate::server::{run_server, ServerConfig};

// ─── Styling helpers ───────────────────────────────────────────────────────────

fn muted(s: &str) -> ColoredString {
    s.truecolor(140, 140, 140)
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", muted(&"─".repeat(56)));
}

fn fail(msg: &str) {
    println!("  {} {}", "✗".red(), msg.red());
    println!();
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "star-predictor")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Star type prediction over a pre-trained stellar classifier")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the inference service
    Serve {
        /// Server host
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Server port
        #[arg(short, long, default_value = "8000")]
        port: u16,

        /// Path to the classifier artifact
        #[arg(long)]
        model: Option<PathBuf>,
    },

    /// Predict the type of a single star (defaults are the Sun)
    Predict {
        /// Temperature in Kelvin
        #[arg(short, long, default_value = "5770", value_parser = clap::value_parser!(i64).range(0..))]
        temperature: i64,

        /// Luminosity relative to the Sun (L/Lo)
        #[arg(short, long, default_value = "1.0")]
        luminosity: f64,

        /// Radius relative to the Sun (R/Ro)
        #[arg(short, long, default_value = "1.0")]
        radius: f64,

        /// Absolute magnitude (Mv)
        #[arg(short, long, default_value = "4.83", allow_hyphen_values = true)]
        magnitude: f64,

        /// Base URL of the running service
        #[arg(long, default_value = "http://127.0.0.1:8000")]
        url: String,
    },

    /// Predict types for every star in a CSV file
    Bulk {
        /// Input CSV file
        file: PathBuf,

        /// Where to save the augmented CSV (prints a preview either way)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Base URL of the running service
        #[arg(long, default_value = "http://127.0.0.1:8000")]
        url: String,
    },

    /// Check that the service is up
    Health {
        /// Base URL of the running service
        #[arg(long, default_value = "http://127.0.0.1:8000")]
        url: String,
    },
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub async fn cmd_serve(host: &str, port: u16, model: Option<PathBuf>) -> anyhow::Result<()> {
    let mut config = ServerConfig::default();
    config.host = host.to_string();
    config.port = port;
    if let Some(model) = model {
        config.model_path = model;
    }
    run_server(config).await
}

pub async fn cmd_predict(record: StarRecord, url: &str) -> anyhow::Result<()> {
    section("Single prediction");
    if record.luminosity < 0.0 || record.radius < 0.0 {
        fail("Luminosity and radius are ratios to the Sun and must be non-negative");
        return Ok(());
    }
    println!("  {:<24} {}", muted("Temperature (K)"), record.temperature);
    println!("  {:<24} {}", muted("Luminosity (L/Lo)"), record.luminosity);
    println!("  {:<24} {}", muted("Radius (R/Ro)"), record.radius);
    println!("  {:<24} {}", muted("Absolute magnitude (Mv)"), record.absolute_magnitude);
    println!();

    let client = ApiClient::new(url);
    match client.predict(&record).await {
        Ok(prediction) => {
            let tier = ConfidenceTier::from_probability(prediction.predicted_probability);
            let label = match tier {
                ConfidenceTier::High => prediction.predicted_type.green().bold(),
                ConfidenceTier::Medium => prediction.predicted_type.yellow().bold(),
                ConfidenceTier::Low => prediction.predicted_type.red().bold(),
            };
            println!("  Predicted Star Type: {}", label);
            println!(
                "  {:<24} {:.3} ({} confidence)",
                muted("Probability"),
                prediction.predicted_probability,
                tier.label()
            );
            println!();
        }
        Err(ClientError::Status(code)) => {
            fail(&format!("Unable to get prediction. Status code {code}"));
        }
        Err(e) => {
            fail(&format!("An error occurred: {e}"));
        }
    }
    Ok(())
}

pub async fn cmd_bulk(file: &PathBuf, output: Option<&PathBuf>, url: &str) -> anyhow::Result<()> {
    section("Bulk prediction");

    let bytes = match std::fs::read(file) {
        Ok(bytes) => bytes,
        Err(e) => {
            fail(&format!("Could not read {}: {e}", file.display()));
            return Ok(());
        }
    };
    let file_name = file
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload.csv");

    let client = ApiClient::new(url);
    match client.bulk_predict(file_name, bytes).await {
        Ok(csv_text) => {
            let mut df = CsvReadOptions::default()
                .with_has_header(true)
                .into_reader_with_file_handle(Cursor::new(csv_text.as_bytes()))
                .finish()?;

            println!(
                "  {} {} rows × {} cols predicted",
                "✓".green(),
                df.height(),
                df.width()
            );
            println!();
            println!("{}", df.head(Some(10)));

            if let Some(path) = output {
                let mut out = std::fs::File::create(path)?;
                CsvWriter::new(&mut out).finish(&mut df)?;
                println!("  {} saved to {}", "✓".green(), path.display());
            }
            println!();
        }
        Err(ClientError::Status(code)) => {
            fail(&format!("Unable to get predictions. Status code {code}"));
        }
        Err(e) => {
            fail(&format!("An error occurred: {e}"));
        }
    }
    Ok(())
}

pub async fn cmd_health(url: &str) -> anyhow::Result<()> {
    let client = ApiClient::new(url);
    match client.health().await {
        Ok(message) => println!("  {} {}", "✓".green(), message),
        Err(e) => fail(&format!("Service unreachable: {e}")),
    }
    Ok(())
}
