//! Harris County FWS Rainfall Service - HTTP API
//!
//! Serves 7-day rainfall totals for Harris County Flood Warning System
//! gages to spreadsheet clients:
//! 1. Loads configuration (rainfall_service.toml, .env, environment, flags)
//! 2. Validates the settings the service cannot run without
//! 3. Serves /rainfall, /health and /locations until stopped
//!
//! Usage:
//!   cargo run --release                          # Serve on 0.0.0.0:5000
//!   cargo run --release -- --port 8080           # Serve on another port
//!   cargo run --release -- --config prod.toml    # Use a specific config file
//!
//! Environment:
//!   RUST_LOG                 - log filter (default: hcfws_rainfall_service=info)
//!   RAINFALL_SERVICE_PORT    - listener port override
//!   HCFWS_BASE_URL           - FWS site override (e.g. a local mirror)

use clap::Parser;
use hcfws_rainfall_service::config::ServiceConfig;
use hcfws_rainfall_service::endpoint;
use hcfws_rainfall_service::ingest::hcfws::HarrisCountyRainfallScraper;
use hcfws_rainfall_service::logging;
use hcfws_rainfall_service::stations::STATION_REGISTRY;
use std::path::PathBuf;

/// Serve Harris County FWS rainfall totals over HTTP
#[derive(Debug, Parser)]
#[command(name = "hcfws_rainfall_service", version)]
struct Args {
    /// Configuration file (default: ./rainfall_service.toml if present)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Interface to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Request worker threads
    #[arg(short, long)]
    workers: Option<usize>,
}

fn main() {
    let args = Args::parse();
    logging::init(logging::DEFAULT_LOG_FILTER);

    println!("🌧  Harris County FWS Rainfall Service");
    println!("======================================\n");

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("\n❌ Configuration error: {}\n", e);
            std::process::exit(1);
        }
    };

    println!("   FWS site:  {}", config.scraper.base_url);
    println!("   Stations:  {}", STATION_REGISTRY.len());
    println!("   Workers:   {}", config.server.workers);
    println!("   Listening: http://{}\n", config.server.bind_address());

    let factory = HarrisCountyRainfallScraper::factory(config.scraper.clone());

    if let Err(e) = endpoint::start_endpoint_server(&config, factory) {
        eprintln!("\n❌ Endpoint server error: {}\n", e);
        std::process::exit(1);
    }
}

fn load_config(args: &Args) -> Result<ServiceConfig, Box<dyn std::error::Error>> {
    let mut config = ServiceConfig::load(args.config.as_deref())?;
    config.apply_env_overrides()?;

    if let Some(host) = &args.host {
        config.server.host = host.clone();
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(workers) = args.workers {
        config.server.workers = workers;
    }

    config.validate()?;
    Ok(config)
}
