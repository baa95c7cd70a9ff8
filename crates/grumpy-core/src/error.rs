//! Error types for Grumpy

use thiserror::Error;

/// Result type alias using Grumpy's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or exporting a case
#[derive(Error, Debug)]
pub enum Error {
    /// A case parameter is out of range or inconsistent with another one
    #[error("Invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// Parameter file could not be parsed
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    /// Parameters could not be serialised
    #[error("Config serialisation error: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    /// Mesh generation failed
    #[error("Mesh generation failed: {0}")]
    MeshGeneration(String),

    /// Export failed
    #[error("Export failed: {0}")]
    Export(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
