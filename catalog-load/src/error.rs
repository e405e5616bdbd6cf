use catalog_load_core::ConfigError;
use thiserror::Error;

/// Failure to get a status code back from the target. Never escapes an endpoint operation.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Request timed out")]
    Timeout,

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("HTTP error: {0}")]
    Http(#[source] reqwest::Error),

    #[error("Transport has been closed")]
    Closed,
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Connect(err.to_string())
        } else {
            Self::Http(err)
        }
    }
}

/// Errors that abort a run. Individual request failures are never reported here.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Invalid scenario: {0}")]
    InvalidScenario(#[source] ConfigError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("Work unit did not complete: {0}")]
    WorkUnit(#[from] tokio::task::JoinError),

    #[error("Capacity limiter closed while requests were pending")]
    CapacityClosed(#[from] tokio::sync::AcquireError),
}
