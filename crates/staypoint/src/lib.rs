//! Staypoint - find properties near a free-text location
//!
//! Staypoint resolves a location query that may contain typos or non-canonical
//! names to coordinates, then lists every known property within a fixed radius,
//! nearest first.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use staypoint::{NominatimProvider, PropertyFinder, SearchConfig};
//! use staypoint_catalog::Catalog;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), staypoint::error::StaypointError> {
//!     let config = SearchConfig::default();
//!     let catalog = Catalog::from_csv("data.csv")?;
//!     let provider = NominatimProvider::new(&config.nominatim)?;
//!     let finder = PropertyFinder::new(catalog, provider, &config)?;
//!
//!     let response = finder.nearest_properties(Some("Udaipr")).await?;
//!     for property in response.properties() {
//!         println!("{} ({} km)", property.property_name, property.distance_km);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # How a query is resolved
//!
//! 1. The raw query is geocoded, bounded by a timeout and restricted to one
//!    country.
//! 2. If that fails, the query is fuzzy-matched against words taken from the
//!    property names (brand and amenity words removed). A match scoring at
//!    least the threshold is geocoded instead.
//! 3. Properties within the radius of the resolved point are ranked by
//!    geodesic distance.
use once_cell::sync::OnceCell;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

mod config;
mod core;
pub mod error;
mod geocode;
mod proximity;
mod resolve;
mod tokens;

pub use self::core::{NearbyResponse, PropertyFinder, ResolvedSummary};

pub use config::{NominatimConfig, SearchConfig, SearchConfigBuilder};
pub use geocode::{
    Blocking, BlockingGeocoder, GeocodeCandidate, GeocodeProvider, GeocodingGateway,
    NominatimProvider, ProviderError, ResolvedLocation,
};
pub use proximity::{NearbyProperty, find_within, geodesic_distance_km};
pub use resolve::{LocationError, LocationResolver};
pub use staypoint_catalog as catalog;
pub use staypoint_catalog::{Catalog, Property};
pub use tokens::{
    DEFAULT_STOPWORDS, Matcher, TokenMatch, Vocabulary, best_match, normalize, similarity,
};

static LOGGER_INIT: OnceCell<()> = OnceCell::new();

/// Initialize logging for the Staypoint library.
///
/// Sets up a `tracing` fmt subscriber filtered by `RUST_LOG` when present,
/// otherwise by `level`. Safe to call more than once; only the first call
/// installs the subscriber.
///
/// # Examples
///
/// ```rust
/// use staypoint::init_logging;
/// use tracing::Level;
///
/// init_logging(Level::INFO)?;
/// # Ok::<(), staypoint::error::StaypointError>(())
/// ```
pub fn init_logging(level: impl Into<LevelFilter>) -> Result<&'static (), error::StaypointError> {
    LOGGER_INIT.get_or_try_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(level.into().to_string()))?
            .add_directive("reqwest=warn".parse()?)
            .add_directive("hyper_util=warn".parse()?);

        tracing_subscriber::fmt::fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .with_writer(std::io::stderr)
            .init();
        Ok(())
    })
}
