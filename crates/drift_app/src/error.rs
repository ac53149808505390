//! Error types for drift_app

use thiserror::Error;

use drift_animation::AnimationError;

/// Errors that can occur while configuring or running the page
#[derive(Error, Debug)]
pub enum DriftError {
    /// Failed to read a configuration file
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration is not valid TOML or has wrong field types
    #[error("invalid configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration could not be serialized
    #[error("failed to serialize configuration: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// An animation could not be built
    #[error(transparent)]
    Animation(#[from] AnimationError),

    /// Unknown section name
    #[error("no section named {0:?}")]
    UnknownSection(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for DriftError {
    fn from(err: anyhow::Error) -> Self {
        DriftError::Other(err.to_string())
    }
}

/// Result type for drift_app operations
pub type Result<T> = std::result::Result<T, DriftError>;
