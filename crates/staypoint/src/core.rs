//! Request-level entry point tying resolution and proximity search together.
//!
//! A [`PropertyFinder`] is built once at startup from a [`Catalog`], a geocoding
//! provider and a [`SearchConfig`]. It derives the token vocabulary up front and
//! afterwards only reads shared state, so clones can serve any number of
//! concurrent queries.
//!
//! ```rust,no_run
//! use staypoint::{NominatimProvider, PropertyFinder, SearchConfig};
//! use staypoint_catalog::Catalog;
//!
//! # async fn run() -> Result<(), staypoint::error::StaypointError> {
//! let config = SearchConfig::default();
//! let catalog = Catalog::from_csv("data.csv")?;
//! let provider = NominatimProvider::new(&config.nominatim)?;
//! let finder = PropertyFinder::new(catalog, provider, &config)?;
//!
//! let response = finder.nearest_properties(Some("Udaipur")).await?;
//! println!("{}", serde_json::to_string_pretty(&response).unwrap());
//! # Ok(())
//! # }
//! ```

use std::{sync::Arc, time::Instant};

use serde::Serialize;
use staypoint_catalog::Catalog;
use tracing::{info, instrument};

use crate::{
    config::SearchConfig,
    error::{Result, StaypointError},
    geocode::{GeocodeProvider, GeocodingGateway, ResolvedLocation},
    proximity::{NearbyProperty, find_within, round_2dp},
    resolve::LocationResolver,
    tokens::Vocabulary,
};

/// Where the query was resolved to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedSummary {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<ResolvedLocation> for ResolvedSummary {
    fn from(location: ResolvedLocation) -> Self {
        Self {
            name: location.display_name,
            latitude: location.latitude,
            longitude: location.longitude,
        }
    }
}

/// Result of one successful query.
///
/// Exactly one of `nearby_properties` and `message` is set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearbyResponse {
    pub input_location: String,
    pub resolved_location: ResolvedSummary,
    pub response_time_sec: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nearby_properties: Option<Vec<NearbyProperty>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl NearbyResponse {
    /// Properties found, nearest first; empty when none were in range.
    pub fn properties(&self) -> &[NearbyProperty] {
        self.nearby_properties.as_deref().unwrap_or_default()
    }
}

/// Resolves location queries and lists the catalog properties around them.
#[derive(Debug)]
pub struct PropertyFinder<P> {
    catalog: Arc<Catalog>,
    vocabulary: Arc<Vocabulary>,
    resolver: LocationResolver<P>,
    radius_km: f64,
}

impl<P> Clone for PropertyFinder<P> {
    fn clone(&self) -> Self {
        Self {
            catalog: Arc::clone(&self.catalog),
            vocabulary: Arc::clone(&self.vocabulary),
            resolver: self.resolver.clone(),
            radius_km: self.radius_km,
        }
    }
}

impl<P: GeocodeProvider> PropertyFinder<P> {
    #[instrument(name = "Initialize PropertyFinder", level = "info", skip_all, fields(properties = catalog.len()))]
    pub fn new(catalog: Catalog, provider: P, config: &SearchConfig) -> Result<Self> {
        config.validate()?;
        let t_init = Instant::now();

        let vocabulary = Arc::new(Vocabulary::build(&catalog, &config.stopwords));
        let gateway = GeocodingGateway::from_config(provider, config);
        let resolver =
            LocationResolver::new(gateway, Arc::clone(&vocabulary), config.match_threshold);

        info!(
            tokens = vocabulary.len(),
            elapsed_seconds = ?t_init.elapsed(),
            "PropertyFinder initialization complete"
        );

        Ok(Self {
            catalog: Arc::new(catalog),
            vocabulary,
            resolver,
            radius_km: config.radius_km,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn radius_km(&self) -> f64 {
        self.radius_km
    }

    /// Resolve `query` and list the properties within the configured radius.
    ///
    /// A missing or empty query fails with [`StaypointError::MissingQuery`]
    /// before any lookup. Whitespace-only text counts as supplied and goes
    /// through resolution like any other query. Resolution failures surface as
    /// [`StaypointError::Location`]. Finding nothing in range is not an error:
    /// the response then carries an explanatory `message`.
    #[instrument(name = "Nearest properties", level = "info", skip(self))]
    pub async fn nearest_properties(&self, query: Option<&str>) -> Result<NearbyResponse> {
        let t_start = Instant::now();
        let query = query
            .filter(|q| !q.is_empty())
            .ok_or(StaypointError::MissingQuery)?;

        let location = self.resolver.resolve_query(query).await?;
        let nearby = find_within(location.coordinates(), &self.catalog, self.radius_km);

        info!(
            found = nearby.len(),
            elapsed_seconds = ?t_start.elapsed(),
            "Query complete"
        );

        let (nearby_properties, message) = if nearby.is_empty() {
            (
                None,
                Some(format!(
                    "No properties found within {}km of '{query}'.",
                    self.radius_km
                )),
            )
        } else {
            (Some(nearby), None)
        };

        Ok(NearbyResponse {
            input_location: query.to_owned(),
            resolved_location: location.into(),
            response_time_sec: round_2dp(t_start.elapsed().as_secs_f64()),
            nearby_properties,
            message,
        })
    }
}
