//! Query → location resolution with a fuzzy-match fallback.
//!
//! The raw query goes to the geocoder first. Only when that fails is the query
//! fuzzy-matched against the property-name vocabulary, and the best token (if it
//! scores at or above the threshold) is geocoded in its place.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::{
    geocode::{GeocodeProvider, GeocodingGateway, ResolvedLocation},
    tokens::{Matcher, Vocabulary},
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    /// Neither the query nor any close-enough token could be geocoded.
    #[error("Could not resolve location '{0}'")]
    Unresolvable(String),
    /// A token matched above the threshold but the geocoder could not place it.
    #[error("Could not geocode matched location '{0}'")]
    MatchedButUngeocodable(String),
}

pub type Result<T> = std::result::Result<T, LocationError>;

/// Two-step resolver: direct geocode, then fuzzy match and re-geocode.
#[derive(Debug)]
pub struct LocationResolver<P, M = Vocabulary> {
    gateway: GeocodingGateway<P>,
    matcher: Arc<M>,
    match_threshold: u8,
}

impl<P, M> Clone for LocationResolver<P, M> {
    fn clone(&self) -> Self {
        Self {
            gateway: self.gateway.clone(),
            matcher: Arc::clone(&self.matcher),
            match_threshold: self.match_threshold,
        }
    }
}

impl<P: GeocodeProvider, M: Matcher> LocationResolver<P, M> {
    pub fn new(gateway: GeocodingGateway<P>, matcher: Arc<M>, match_threshold: u8) -> Self {
        Self {
            gateway,
            matcher,
            match_threshold,
        }
    }

    pub fn gateway(&self) -> &GeocodingGateway<P> {
        &self.gateway
    }

    pub fn match_threshold(&self) -> u8 {
        self.match_threshold
    }

    #[instrument(name = "Resolve location query", level = "info", skip(self))]
    pub async fn resolve_query(&self, query: &str) -> Result<ResolvedLocation> {
        if let Some(location) = self.gateway.resolve(query).await {
            debug!("Query geocoded directly");
            return Ok(location);
        }

        let Some(found) = self.matcher.best_match(&query.to_lowercase()) else {
            info!("No fuzzy-match candidates for query");
            return Err(LocationError::Unresolvable(query.to_owned()));
        };
        if found.score < self.match_threshold {
            info!(
                token = %found.token,
                score = found.score,
                threshold = self.match_threshold,
                "Best fuzzy match below threshold"
            );
            return Err(LocationError::Unresolvable(query.to_owned()));
        }

        info!(token = %found.token, score = found.score, "Retrying geocode with fuzzy match");
        let location = self.gateway.resolve(&found.token).await;
        location.ok_or(LocationError::MatchedButUngeocodable(found.token))
    }
}
