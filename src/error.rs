use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while retrieving or normalizing recipes
#[derive(Error, Debug)]
pub enum FinderError {
    /// Network or HTTP failure (non-2xx status, connection error, undecodable body)
    #[error("Transport failure: {0}")]
    TransportError(String),

    /// An upstream payload could not be normalized into a canonical recipe
    #[error("Malformed record: {0}")]
    MalformedRecordError(String),

    /// The operation did not settle within the configured time limit
    #[error("Operation timed out after {0:?}")]
    TimeoutError(Duration),

    /// The catalog answered, but has no recipe with this id
    #[error("No recipe found with id {0}")]
    NotFound(String),

    /// Coordinator construction error
    #[error("Builder error: {0}")]
    BuilderError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
}

impl From<reqwest::Error> for FinderError {
    fn from(err: reqwest::Error) -> Self {
        // Request URLs may carry an API key
        FinderError::TransportError(err.without_url().to_string())
    }
}
