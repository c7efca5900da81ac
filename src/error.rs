//! Error types for the node configuration tuner.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or writing a configuration document
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Cannot parse configuration document {path:?}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("Cannot serialize configuration document: {0}")]
    Serialize(String),

    #[error("Document I/O failed on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised by the tuning engine
#[derive(Debug, Error)]
pub enum TunerError {
    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error("Document structure incompatible: {0}")]
    Structure(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("Archive properties I/O failed on {path:?}: {source}")]
    Archive {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<config::ConfigError> for TunerError {
    fn from(err: config::ConfigError) -> Self {
        TunerError::Settings(err.to_string())
    }
}
