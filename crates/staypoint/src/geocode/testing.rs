use std::{
    future::Future,
    sync::{Arc, Mutex},
    time::Duration,
};

use ahash::AHashMap;

use super::{GeocodeCandidate, GeocodeProvider, ProviderError};

/// In-memory provider that records every text it is asked about.
#[derive(Debug, Clone, Default)]
pub struct StubProvider {
    places: AHashMap<String, GeocodeCandidate>,
    calls: Arc<Mutex<Vec<String>>>,
    delay: Option<Duration>,
    fail: bool,
}

impl StubProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_place(self, text: &str, latitude: f64, longitude: f64, country: &str) -> Self {
        self.with_candidate(
            text,
            GeocodeCandidate {
                latitude,
                longitude,
                display_name: Some(format!("{text}, {country}")),
                country: Some(country.to_string()),
            },
        )
    }

    pub fn with_candidate(mut self, text: &str, candidate: GeocodeCandidate) -> Self {
        self.places.insert(text.to_string(), candidate);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl GeocodeProvider for StubProvider {
    fn lookup(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<Option<GeocodeCandidate>, ProviderError>> + Send {
        self.calls.lock().unwrap().push(text.to_owned());
        let result = if self.fail {
            Err(ProviderError::Provider("stub failure".to_string()))
        } else {
            Ok(self.places.get(text).cloned())
        };
        let delay = self.delay;
        async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            result
        }
    }
}
