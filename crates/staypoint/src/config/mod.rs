use std::{str::FromStr, time::Duration};

use ahash::AHashSet;
use tracing::warn;

use crate::{error::StaypointError, tokens::DEFAULT_STOPWORDS};

/// Settings for the HTTP geocoding provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NominatimConfig {
    /// Base URL of the Nominatim instance, without the `/search` path.
    pub endpoint: String,
    /// Nominatim's usage policy requires an identifying user agent.
    pub user_agent: String,
    /// Transport timeout of the HTTP client itself.
    pub request_timeout: Duration,
    /// Preferred language for display names and the country field.
    pub language: Option<String>,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://nominatim.openstreetmap.org".to_string(),
            user_agent: "staypoint-geoapi".to_string(),
            request_timeout: Duration::from_secs(5),
            language: Some("en".to_string()),
        }
    }
}

/// Configuration for resolving a query and searching around it.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Geocoder results must have a country containing this string.
    pub country_filter: String,
    /// Wall-clock bound on a single geocode lookup.
    pub geocode_timeout: Duration,
    /// Minimum fuzzy score (0-100) for a token match to be geocoded.
    pub match_threshold: u8,
    /// Search radius around the resolved location, inclusive.
    pub radius_km: f64,
    /// Words in property names that are never used as fuzzy-match candidates.
    pub stopwords: AHashSet<String>,
    pub nominatim: NominatimConfig,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            country_filter: "India".to_string(),
            geocode_timeout: Duration::from_millis(1500),
            match_threshold: 60,
            radius_km: 50.0,
            stopwords: DEFAULT_STOPWORDS.iter().map(|s| (*s).to_string()).collect(),
            nominatim: NominatimConfig::default(),
        }
    }
}

impl SearchConfig {
    pub fn builder() -> SearchConfigBuilder {
        SearchConfigBuilder::new()
    }

    pub fn validate(&self) -> Result<(), StaypointError> {
        if self.geocode_timeout.is_zero() {
            return Err(StaypointError::ConfigError(
                "Geocode timeout must be greater than zero".to_string(),
            ));
        }
        if !self.radius_km.is_finite() || self.radius_km <= 0.0 {
            return Err(StaypointError::ConfigError(format!(
                "Search radius must be a positive number of kilometres, got {}",
                self.radius_km
            )));
        }
        if self.country_filter.is_empty() {
            return Err(StaypointError::ConfigError(
                "Country filter must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for creating search configurations with ergonomic defaults
#[derive(Debug, Clone, Default)]
pub struct SearchConfigBuilder {
    config: SearchConfig,
}

impl SearchConfigBuilder {
    /// Create a new builder with sensible defaults
    pub fn new() -> Self {
        Self {
            config: SearchConfig::default(),
        }
    }

    /// Start from the defaults and apply `STAYPOINT_*` environment overrides.
    ///
    /// Unparseable values are logged and ignored.
    pub fn from_env() -> Self {
        let mut builder = Self::new();
        if let Ok(country) = std::env::var("STAYPOINT_COUNTRY") {
            builder = builder.country_filter(country);
        }
        if let Some(ms) = parse_env::<u64>("STAYPOINT_GEOCODE_TIMEOUT_MS") {
            builder = builder.geocode_timeout(Duration::from_millis(ms));
        }
        if let Some(radius) = parse_env::<f64>("STAYPOINT_RADIUS_KM") {
            builder = builder.radius_km(radius);
        }
        if let Some(threshold) = parse_env::<u8>("STAYPOINT_MATCH_THRESHOLD") {
            builder = builder.match_threshold(threshold);
        }
        if let Ok(url) = std::env::var("STAYPOINT_NOMINATIM_URL") {
            builder = builder.nominatim_endpoint(url);
        }
        builder
    }

    pub fn country_filter(mut self, country: impl Into<String>) -> Self {
        self.config.country_filter = country.into();
        self
    }

    pub fn geocode_timeout(mut self, timeout: Duration) -> Self {
        self.config.geocode_timeout = timeout;
        self
    }

    /// Set the minimum fuzzy score, capped at 100
    pub fn match_threshold(mut self, threshold: u8) -> Self {
        self.config.match_threshold = threshold.min(100);
        self
    }

    pub fn radius_km(mut self, radius_km: f64) -> Self {
        self.config.radius_km = radius_km;
        self
    }

    /// Replace the stopword set. Words are lowercased.
    pub fn stopwords<I, S>(mut self, stopwords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.config.stopwords = stopwords
            .into_iter()
            .map(|s| s.as_ref().to_lowercase())
            .collect();
        self
    }

    pub fn nominatim_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.nominatim.endpoint = endpoint.into();
        self
    }

    pub fn nominatim_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.nominatim.user_agent = user_agent.into();
        self
    }

    pub fn nominatim_language(mut self, language: Option<String>) -> Self {
        self.config.nominatim.language = language;
        self
    }

    /// Build the final configuration
    pub fn build(self) -> SearchConfig {
        self.config
    }

    /// Build the configuration, rejecting values the pipeline cannot run with
    pub fn try_build(self) -> Result<SearchConfig, StaypointError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

fn parse_env<T: FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    raw.parse().map_or_else(
        |_| {
            warn!(key, value = %raw, "Ignoring unparseable environment override");
            None
        },
        Some,
    )
}
