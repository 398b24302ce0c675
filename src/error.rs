//! Application-wide error types using thiserror
//!
//! Startup failures (`Config`, `Io`, `Yaml`) are fatal. Everything a single
//! cycle can raise (`Venue`, `Normalize`) is caught at the poll loop boundary.

use thiserror::Error;

use crate::adapters::errors::ExchangeError;
use crate::adapters::types::VenueId;
use crate::core::normalizer::NormalizeError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{venue} error: {source}")]
    Venue {
        venue: VenueId,
        #[source]
        source: ExchangeError,
    },

    #[error("Normalization error: {0}")]
    Normalize(#[from] NormalizeError),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub fn venue(venue: VenueId, source: ExchangeError) -> Self {
        AppError::Venue { venue, source }
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
