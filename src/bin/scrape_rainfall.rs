//! One-shot Rainfall Lookup
//!
//! Fetches the 7-day rainfall total for one FWS gage (or every registered
//! gage) straight from the Harris County FWS site, without starting the
//! HTTP service. Handy for checking that the gage page layout still parses.
//!
//! Usage:
//!   cargo run --bin scrape_rainfall              # Default gage (590)
//!   cargo run --bin scrape_rainfall -- 520       # Specific gage
//!   cargo run --bin scrape_rainfall -- --all     # Every registered gage

use clap::Parser;
use hcfws_rainfall_service::analysis::totals::round_inches;
use hcfws_rainfall_service::config::ServiceConfig;
use hcfws_rainfall_service::ingest::RainfallSource;
use hcfws_rainfall_service::ingest::hcfws::HarrisCountyRainfallScraper;
use hcfws_rainfall_service::logging;
use hcfws_rainfall_service::model::RAINFALL_PERIOD_DESCRIPTION;
use hcfws_rainfall_service::stations::{DEFAULT_LOCATION_ID, all_site_ids, describe_location};
use std::path::PathBuf;

/// Look up Harris County FWS rainfall totals from the command line
#[derive(Debug, Parser)]
#[command(name = "scrape_rainfall", version)]
struct Args {
    /// FWS gage id
    #[arg(default_value = DEFAULT_LOCATION_ID)]
    location: String,

    /// Look up every registered gage instead
    #[arg(long, conflicts_with = "location")]
    all: bool,

    /// Configuration file (default: ./rainfall_service.toml if present)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    logging::init("hcfws_rainfall_service=warn");

    let mut config = ServiceConfig::load(args.config.as_deref())?;
    config.apply_env_overrides()?;
    config.validate()?;

    let scraper = HarrisCountyRainfallScraper::new(&config.scraper)?;

    let locations: Vec<String> = if args.all {
        all_site_ids().into_iter().map(String::from).collect()
    } else {
        vec![args.location]
    };

    println!("🌧  Rainfall, {}", RAINFALL_PERIOD_DESCRIPTION);
    println!("   as of {}\n", scraper.current_timestamp());

    let mut failures = 0;
    for location_id in &locations {
        let name = describe_location(location_id);

        match scraper.scrape_rainfall_totals(location_id) {
            Ok(Some(total)) => {
                let inches = round_inches(total);
                println!("   {:>4}  {:<60} {:>6.2} in", location_id, name, inches);
            }
            Ok(None) => {
                println!("   {:>4}  {:<60}    no data", location_id, name);
                failures += 1;
            }
            Err(e) => {
                eprintln!("   {:>4}  {:<60} ✗ {}", location_id, name, e);
                failures += 1;
            }
        }
    }

    if failures == locations.len() {
        return Err("No rainfall totals could be retrieved".into());
    }

    Ok(())
}
