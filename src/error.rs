//! Error handling for supervisorgen.
use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Defines all possible errors raised while building or rendering configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A caller-supplied value was rejected at the point it was provided.
    #[error("invalid value for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the failure.
        message: String,
    },

    /// The renderer was handed a configuration that could never have been
    /// produced through the public constructors.
    #[error("invariant violated: {0}")]
    Invariant(String),

    /// A group was rendered before any program was added to it.
    #[error("group '{group}' has no programs")]
    EmptyGroup {
        /// The offending group name.
        group: String,
    },

    /// Error reading the manifest file.
    #[error("Failed to read manifest: {0}")]
    ManifestRead(#[from] std::io::Error),

    /// Error parsing YAML manifest contents.
    #[error("Invalid YAML format: {0}")]
    ManifestParse(#[from] serde_yaml::Error),

    /// The manifest referenced an environment variable that is not defined.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    /// Error writing rendered output to disk.
    #[error("Failed to write '{}': {source}", path.display())]
    OutputWrite {
        /// Destination that could not be written.
        path: PathBuf,
        /// The underlying error that occurred.
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    /// Shorthand for building a [`ConfigError::Validation`].
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Rejects blank (empty or whitespace-only) required strings.
pub(crate) fn require_non_blank(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ConfigError::validation(field, "must not be blank"));
    }
    Ok(())
}
