//! Deadline-bounded geocoding.
//!
//! [`GeocodingGateway`] turns an unbounded, fallible external lookup into an
//! `Option`: every failure mode (timeout, no match, provider error, country
//! mismatch) collapses to `None` at this boundary and is only logged.

use std::{future::Future, sync::Arc, time::Duration};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::config::SearchConfig;

mod nominatim;
#[cfg(test)]
pub mod testing;

pub use nominatim::NominatimProvider;

/// Failure inside a geocoding provider. Never leaves the gateway.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Malformed geocoder response: {0}")]
    MalformedResponse(String),
    #[error("Geocoder failure: {0}")]
    Provider(String),
}

/// A single raw result from a provider, before country filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeCandidate {
    pub latitude: f64,
    pub longitude: f64,
    pub display_name: Option<String>,
    pub country: Option<String>,
}

/// Where a query text was placed. Only valid for the request that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub display_name: String,
}

impl ResolvedLocation {
    /// `(latitude, longitude)`
    pub fn coordinates(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }
}

/// External text-to-coordinates lookup returning at most one candidate.
pub trait GeocodeProvider: Send + Sync + 'static {
    fn lookup(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<Option<GeocodeCandidate>, ProviderError>> + Send;
}

/// A provider whose lookup blocks the calling thread.
pub trait BlockingGeocoder: Send + Sync + 'static {
    fn lookup_blocking(&self, text: &str) -> Result<Option<GeocodeCandidate>, ProviderError>;
}

/// Runs a [`BlockingGeocoder`] on tokio's blocking pool.
///
/// A blocking call cannot be cancelled; when the gateway deadline passes the
/// worker is left to finish on its own and whatever it returns is dropped.
#[derive(Debug)]
pub struct Blocking<B>(Arc<B>);

impl<B> Blocking<B> {
    pub fn new(geocoder: B) -> Self {
        Self(Arc::new(geocoder))
    }
}

impl<B: BlockingGeocoder> GeocodeProvider for Blocking<B> {
    fn lookup(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<Option<GeocodeCandidate>, ProviderError>> + Send {
        let geocoder = Arc::clone(&self.0);
        let text = text.to_owned();
        async move {
            tokio::task::spawn_blocking(move || geocoder.lookup_blocking(&text))
                .await
                .unwrap_or_else(|e| {
                    Err(ProviderError::Provider(format!(
                        "blocking lookup failed: {e}"
                    )))
                })
        }
    }
}

/// Bounded, country-filtered geocoding on top of a [`GeocodeProvider`].
#[derive(Debug)]
pub struct GeocodingGateway<P> {
    provider: Arc<P>,
    country_filter: String,
    timeout: Duration,
}

impl<P> Clone for GeocodingGateway<P> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            country_filter: self.country_filter.clone(),
            timeout: self.timeout,
        }
    }
}

impl<P: GeocodeProvider> GeocodingGateway<P> {
    pub fn new(provider: P, country_filter: impl Into<String>, timeout: Duration) -> Self {
        Self {
            provider: Arc::new(provider),
            country_filter: country_filter.into(),
            timeout,
        }
    }

    pub fn from_config(provider: P, config: &SearchConfig) -> Self {
        Self::new(
            provider,
            config.country_filter.clone(),
            config.geocode_timeout,
        )
    }

    pub fn country_filter(&self) -> &str {
        &self.country_filter
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Geocode `text` with the configured country filter and timeout.
    pub async fn resolve(&self, text: &str) -> Option<ResolvedLocation> {
        self.resolve_with(text, &self.country_filter, self.timeout)
            .await
    }

    /// Geocode `text`, accepting the result only if it arrives within `timeout`
    /// and its country contains `country_filter` (case-sensitive).
    ///
    /// The lookup runs as its own task. If the deadline passes first the task is
    /// aborted and nothing it produces is observed.
    #[instrument(name = "Geocode", level = "debug", skip(self))]
    pub async fn resolve_with(
        &self,
        text: &str,
        country_filter: &str,
        timeout: Duration,
    ) -> Option<ResolvedLocation> {
        if text.trim().is_empty() {
            debug!("Refusing to geocode empty text");
            return None;
        }
        if timeout.is_zero() {
            debug!("Refusing to geocode with a zero timeout");
            return None;
        }

        let provider = Arc::clone(&self.provider);
        let owned_text = text.to_owned();
        let mut task = tokio::spawn(async move { provider.lookup(&owned_text).await });

        let candidate = match tokio::time::timeout(timeout, &mut task).await {
            Ok(Ok(Ok(Some(candidate)))) => candidate,
            Ok(Ok(Ok(None))) => {
                debug!("Geocoder returned no match");
                return None;
            }
            Ok(Ok(Err(error))) => {
                warn!(%error, "Geocoding provider failed");
                return None;
            }
            Ok(Err(error)) => {
                warn!(%error, "Geocoding task did not complete");
                return None;
            }
            Err(_) => {
                task.abort();
                warn!(?timeout, "Geocode lookup timed out, abandoning it");
                return None;
            }
        };

        let country = candidate.country.as_deref().unwrap_or_default();
        if !country.contains(country_filter) {
            debug!(country, country_filter, "Geocoder result outside country filter");
            return None;
        }

        let resolved = ResolvedLocation {
            latitude: candidate.latitude,
            longitude: candidate.longitude,
            display_name: candidate.display_name.unwrap_or_else(|| text.to_owned()),
        };
        debug!(
            latitude = resolved.latitude,
            longitude = resolved.longitude,
            display_name = %resolved.display_name,
            "Geocoded"
        );
        Some(resolved)
    }
}
