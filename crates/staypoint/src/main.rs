use std::process::ExitCode;

use anyhow::Context;
use serde_json::json;
use staypoint::{
    Catalog, NominatimProvider, PropertyFinder, SearchConfigBuilder, error::StaypointError,
    init_logging,
};
use tracing::Level;

const DATA_FILE_DEFAULT: &str = "data.csv";

/// Usage: `staypoint <location query>`
///
/// Prints the JSON response on stdout. The catalog is read from
/// `STAYPOINT_DATA_FILE` (default `data.csv`).
#[tokio::main]
async fn main() -> ExitCode {
    if let Err(error) = init_logging(Level::INFO) {
        eprintln!("Failed to initialise logging: {error}");
    }

    let query = std::env::args().skip(1).collect::<Vec<_>>().join(" ");

    match run(&query).await {
        Ok(body) => {
            println!("{body}");
            ExitCode::SUCCESS
        }
        Err(error) => {
            println!("{}", json!({ "error": format!("{error:#}") }));
            match error.downcast_ref::<StaypointError>() {
                Some(StaypointError::MissingQuery) => ExitCode::from(2),
                _ => ExitCode::FAILURE,
            }
        }
    }
}

async fn run(query: &str) -> anyhow::Result<String> {
    let config = SearchConfigBuilder::from_env().try_build()?;

    let data_file =
        std::env::var("STAYPOINT_DATA_FILE").unwrap_or_else(|_| DATA_FILE_DEFAULT.to_string());
    let catalog = Catalog::from_csv(&data_file)
        .with_context(|| format!("Failed to load property catalog from '{data_file}'"))?;

    let provider = NominatimProvider::new(&config.nominatim)?;
    let finder = PropertyFinder::new(catalog, provider, &config)?;

    let response = finder.nearest_properties(Some(query)).await?;
    Ok(serde_json::to_string_pretty(&response)?)
}
