//! One-shot barangay lookup from the command line.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use narra::{Locator, LocatorConfig};

#[derive(Parser, Debug)]
#[command(name = "lookup")]
#[command(about = "Resolve a coordinate to its barangay")]
struct Args {
    /// Latitude in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    lat: f64,

    /// Longitude in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    lng: f64,

    /// Boundary dataset (GeoJSON feature collection)
    #[arg(short, long)]
    dataset: PathBuf,

    /// Also print the list of loaded barangays
    #[arg(long)]
    list: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();
    let locator = Locator::new(LocatorConfig::with_dataset(args.dataset));

    let result = locator
        .resolve(args.lat, args.lng)
        .await
        .context("Barangay lookup failed")?;
    println!("{}", serde_json::to_string_pretty(&result)?);

    if args.list {
        for barangay in locator.list_all().await? {
            println!("{}\t{}", barangay.name, barangay.city);
        }
    }

    Ok(())
}
