//! Nearest-property lookup against the live Nominatim service
//!
//! This example demonstrates the full pipeline:
//! - Loading a property catalog from CSV (here, the bundled sample)
//! - Resolving queries, including misspelt ones, through Nominatim
//! - Listing the properties within the search radius
//!
//! Run with: `cargo run --example nearest_properties -- "Udaipr"`

use staypoint::{NominatimProvider, PropertyFinder, SearchConfigBuilder};
use staypoint_catalog::{Catalog, SampleCatalog, write_sample_csv};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    staypoint::init_logging(tracing::Level::INFO)?;

    let sample_file = write_sample_csv(SampleCatalog::Sample)?;
    let catalog = Catalog::from_csv(sample_file.path())?;

    let config = SearchConfigBuilder::from_env()
        .nominatim_user_agent("staypoint-example")
        .try_build()?;
    let provider = NominatimProvider::new(&config.nominatim)?;
    let finder = PropertyFinder::new(catalog, provider, &config)?;

    let queries: Vec<String> = std::env::args().skip(1).collect();
    let queries = if queries.is_empty() {
        vec!["Udaipur".to_string(), "Rishikesj".to_string(), "Shillong".to_string()]
    } else {
        queries
    };

    for query in &queries {
        println!("\nSearching near '{query}':");
        match finder.nearest_properties(Some(query)).await {
            Ok(response) => {
                println!(
                    "  Resolved to {} ({:.4}, {:.4}) in {}s",
                    response.resolved_location.name,
                    response.resolved_location.latitude,
                    response.resolved_location.longitude,
                    response.response_time_sec
                );
                if let Some(message) = &response.message {
                    println!("  {message}");
                }
                for (i, property) in response.properties().iter().enumerate() {
                    println!(
                        "  {}. {} - {:.2} km",
                        i + 1,
                        property.property_name,
                        property.distance_km
                    );
                }
            }
            Err(error) => println!("  Error: {error}"),
        }
    }

    Ok(())
}
