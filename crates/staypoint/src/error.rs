use thiserror::Error;

#[derive(Error, Debug)]
pub enum StaypointError {
    #[error("Missing 'location_query' parameter")]
    MissingQuery,
    #[error(transparent)]
    Location(#[from] crate::resolve::LocationError),
    #[error("Catalog error: {0}")]
    Catalog(#[from] staypoint_catalog::CatalogError),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Init Logging error: {0}")]
    InitLoggingError(#[from] tracing_subscriber::filter::ParseError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, StaypointError>;
