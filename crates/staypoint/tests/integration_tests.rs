//! Integration tests for staypoint location resolution and proximity search
//!
//! These run against the public API with an in-memory geocoding provider, so no
//! network access is needed.

use std::{
    collections::HashMap,
    future::Future,
    io::Write,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use staypoint::{
    Catalog, GeocodeCandidate, GeocodeProvider, GeocodingGateway, LocationError,
    LocationResolver, Matcher, Property, PropertyFinder, ProviderError, SearchConfig,
    SearchConfigBuilder, TokenMatch, error::StaypointError,
};
use staypoint_catalog::SampleCatalog;

fn setup_test_env() {
    let _ = staypoint::init_logging(tracing::Level::WARN);
}

/// Deterministic provider backed by a fixed table of places in India.
#[derive(Debug, Clone, Default)]
struct TableProvider {
    places: HashMap<String, (f64, f64)>,
    lookups: Arc<AtomicUsize>,
}

impl TableProvider {
    fn with(mut self, text: &str, latitude: f64, longitude: f64) -> Self {
        self.places.insert(text.to_string(), (latitude, longitude));
        self
    }

    fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl GeocodeProvider for TableProvider {
    fn lookup(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<Option<GeocodeCandidate>, ProviderError>> + Send {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        let candidate = self
            .places
            .get(text)
            .map(|&(latitude, longitude)| GeocodeCandidate {
                latitude,
                longitude,
                display_name: Some(format!("{text}, India")),
                country: Some("India".to_string()),
            });
        async move { Ok(candidate) }
    }
}

#[tokio::test]
async fn test_direct_geocode_finds_nearby_property() {
    setup_test_env();

    let catalog = Catalog::new(vec![Property::new("Moustache Udaipur", 24.57, 73.68)]);
    let provider = TableProvider::default().with("Udaipur", 24.58, 73.71);
    let finder = PropertyFinder::new(catalog, provider, &SearchConfig::default()).unwrap();

    let response = finder.nearest_properties(Some("Udaipur")).await.unwrap();

    assert_eq!(response.input_location, "Udaipur");
    assert_eq!(response.resolved_location.latitude, 24.58);
    assert_eq!(response.resolved_location.longitude, 73.71);
    assert_eq!(response.properties().len(), 1);

    let nearest = &response.properties()[0];
    assert_eq!(nearest.property_name, "Moustache Udaipur");
    assert!(
        (3.0..=3.5).contains(&nearest.distance_km),
        "distance was {}",
        nearest.distance_km
    );
    assert!(response.message.is_none());
}

#[tokio::test]
async fn test_low_fuzzy_score_is_unresolvable() {
    setup_test_env();

    struct Score40;
    impl Matcher for Score40 {
        fn best_match(&self, _query: &str) -> Option<TokenMatch> {
            Some(TokenMatch {
                token: "udaipur".to_string(),
                score: 40,
            })
        }
    }

    let provider = TableProvider::default().with("udaipur", 24.58, 73.71);
    let gateway = GeocodingGateway::new(provider.clone(), "India", Duration::from_secs(1));
    let resolver = LocationResolver::new(gateway, Arc::new(Score40), 60);

    let err = resolver.resolve_query("Xyzzy").await.unwrap_err();
    assert_eq!(err, LocationError::Unresolvable("Xyzzy".to_string()));
    assert_eq!(provider.lookups(), 1, "only the raw query is geocoded");
}

#[tokio::test]
async fn test_unknown_query_against_sample_catalog_is_unresolvable() {
    setup_test_env();

    let provider = TableProvider::default();
    let finder = PropertyFinder::new(
        SampleCatalog::Sample.catalog(),
        provider.clone(),
        &SearchConfig::default(),
    )
    .unwrap();

    let err = finder.nearest_properties(Some("qwfpgj")).await.unwrap_err();
    assert!(matches!(
        err,
        StaypointError::Location(LocationError::Unresolvable(_))
    ));
    assert_eq!(provider.lookups(), 1);
}

#[tokio::test]
async fn test_far_away_location_is_empty_success() {
    setup_test_env();

    let provider = TableProvider::default().with("Shillong", 25.58, 91.89);
    let finder = PropertyFinder::new(
        SampleCatalog::Sample.catalog(),
        provider,
        &SearchConfig::default(),
    )
    .unwrap();

    let response = finder.nearest_properties(Some("Shillong")).await.unwrap();

    assert!(response.properties().is_empty());
    assert_eq!(
        response.message.as_deref(),
        Some("No properties found within 50km of 'Shillong'.")
    );
}

#[tokio::test]
async fn test_typo_falls_back_to_vocabulary() {
    setup_test_env();

    let provider = TableProvider::default().with("rishikesh", 30.0869, 78.2676);
    let finder = PropertyFinder::new(
        SampleCatalog::Sample.catalog(),
        provider.clone(),
        &SearchConfig::default(),
    )
    .unwrap();

    let response = finder.nearest_properties(Some("Rishikesj")).await.unwrap();

    assert_eq!(response.input_location, "Rishikesj");
    assert_eq!(response.resolved_location.name, "rishikesh, India");
    assert_eq!(provider.lookups(), 2);
    let names: Vec<_> = response
        .properties()
        .iter()
        .map(|p| p.property_name.as_str())
        .collect();
    assert!(names.contains(&"Moustache Rishikesh Luxuria"));
    assert!(names.contains(&"Moustache Rishikesh Riverside Resort"));
}

#[tokio::test]
async fn test_matched_token_that_cannot_be_geocoded() {
    setup_test_env();

    let finder = PropertyFinder::new(
        SampleCatalog::Sample.catalog(),
        TableProvider::default(),
        &SearchConfig::default(),
    )
    .unwrap();

    let err = finder.nearest_properties(Some("Jaisalmir")).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Could not geocode matched location 'jaisalmer'"
    );
}

#[tokio::test]
async fn test_repeated_queries_are_identical() {
    setup_test_env();

    let provider = TableProvider::default().with("Udaipur", 24.58, 73.71);
    let finder = PropertyFinder::new(
        SampleCatalog::Sample.catalog(),
        provider,
        &SearchConfig::default(),
    )
    .unwrap();

    let first = finder.nearest_properties(Some("Udaipur")).await.unwrap();
    let second = finder.nearest_properties(Some("Udaipur")).await.unwrap();

    assert_eq!(first.nearby_properties, second.nearby_properties);
    assert_eq!(first.resolved_location, second.resolved_location);
    assert_eq!(first.message, second.message);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_queries_share_finder() {
    setup_test_env();

    let provider = TableProvider::default()
        .with("Udaipur", 24.58, 73.71)
        .with("Jodhpur", 26.2389, 73.0243)
        .with("Agra", 27.1767, 78.0081);
    let finder = PropertyFinder::new(
        SampleCatalog::Sample.catalog(),
        provider,
        &SearchConfig::default(),
    )
    .unwrap();

    let handles: Vec<_> = ["Udaipur", "Jodhpur", "Agra", "Udaipur"]
        .into_iter()
        .map(|query| {
            let finder = finder.clone();
            tokio::spawn(async move { finder.nearest_properties(Some(query)).await })
        })
        .collect();

    for handle in handles {
        let response = handle.await.unwrap().unwrap();
        assert!(!response.properties().is_empty(), "{}", response.input_location);
    }
}

#[tokio::test]
async fn test_catalog_from_csv_end_to_end() {
    setup_test_env();

    let mut file = tempfile::NamedTempFile::with_suffix(".csv").unwrap();
    writeln!(file, "property,latitude,longitude").unwrap();
    writeln!(file, "Moustache Udaipur Luxuria,24.57799888,73.68263271").unwrap();
    writeln!(file, "Moustache Delhi,28.61257139,77.28423582").unwrap();
    writeln!(file, "Moustache Udaipur,24.58145726,73.68223671").unwrap();
    file.flush().unwrap();

    let catalog = Catalog::from_csv(file.path()).unwrap();
    let config = SearchConfigBuilder::new().radius_km(10.0).build();
    let provider = TableProvider::default().with("Udaipur", 24.58, 73.71);
    let finder = PropertyFinder::new(catalog, provider, &config).unwrap();

    assert!(finder.vocabulary().contains("udaipur"));
    assert!(finder.vocabulary().contains("delhi"));
    assert!(!finder.vocabulary().contains("luxuria"));

    let response = finder.nearest_properties(Some("Udaipur")).await.unwrap();
    let names: Vec<_> = response
        .properties()
        .iter()
        .map(|p| p.property_name.as_str())
        .collect();
    assert_eq!(names.len(), 2);
    assert!(!names.contains(&"Moustache Delhi"));
}
