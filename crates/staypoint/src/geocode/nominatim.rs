use std::future::Future;

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::{GeocodeCandidate, GeocodeProvider, ProviderError};
use crate::{config::NominatimConfig, error::StaypointError};

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    address: Option<NominatimAddress>,
}

#[derive(Debug, Deserialize)]
struct NominatimAddress {
    #[serde(default)]
    country: Option<String>,
}

impl NominatimPlace {
    fn into_candidate(self) -> Result<GeocodeCandidate, ProviderError> {
        let latitude = self.lat.parse::<f64>().map_err(|e| {
            ProviderError::MalformedResponse(format!("latitude '{}': {e}", self.lat))
        })?;
        let longitude = self.lon.parse::<f64>().map_err(|e| {
            ProviderError::MalformedResponse(format!("longitude '{}': {e}", self.lon))
        })?;
        Ok(GeocodeCandidate {
            latitude,
            longitude,
            display_name: self.display_name,
            country: self.address.and_then(|a| a.country),
        })
    }
}

/// Geocoding through the OpenStreetMap Nominatim search API.
#[derive(Debug, Clone)]
pub struct NominatimProvider {
    client: Client,
    search_url: String,
    language: Option<String>,
}

impl NominatimProvider {
    pub fn new(config: &NominatimConfig) -> Result<Self, StaypointError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            search_url: format!("{}/search", config.endpoint.trim_end_matches('/')),
            language: config.language.clone(),
        })
    }

    pub fn search_url(&self) -> &str {
        &self.search_url
    }

    #[instrument(name = "Nominatim search", level = "debug", skip(self))]
    async fn search(&self, text: &str) -> Result<Option<GeocodeCandidate>, ProviderError> {
        let mut request = self.client.get(&self.search_url).query(&[
            ("q", text),
            ("format", "json"),
            ("addressdetails", "1"),
            ("limit", "1"),
        ]);
        if let Some(language) = &self.language {
            request = request.query(&[("accept-language", language.as_str())]);
        }

        let places: Vec<NominatimPlace> = request.send().await?.error_for_status()?.json().await?;
        debug!(results = places.len(), "Nominatim responded");

        places
            .into_iter()
            .next()
            .map(NominatimPlace::into_candidate)
            .transpose()
    }
}

impl GeocodeProvider for NominatimProvider {
    fn lookup(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<Option<GeocodeCandidate>, ProviderError>> + Send {
        self.search(text)
    }
}
