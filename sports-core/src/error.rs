//! Error types for the aggregator

use thiserror::Error;

/// Aggregator-wide error type
#[derive(Error, Debug)]
pub enum SportsError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SportsError {
    pub fn api(msg: impl Into<String>) -> Self {
        SportsError::Api(msg.into())
    }

    pub fn network(msg: impl Into<String>) -> Self {
        SportsError::Network(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        SportsError::Parse(msg.into())
    }

    pub fn cache(msg: impl Into<String>) -> Self {
        SportsError::Cache(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        SportsError::Config(msg.into())
    }
}

impl From<serde_json::Error> for SportsError {
    fn from(e: serde_json::Error) -> Self {
        SportsError::Parse(e.to_string())
    }
}

/// Result type alias for aggregator operations
pub type SportsResult<T> = Result<T, SportsError>;
