//! Provider error types
//!
//! Errors raised while building, initializing or querying parameter data
//! providers. Every variant carries the parameter name so a failing test plan
//! can be traced back to the offending configuration entry.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by parameter data providers
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Backing data could not be loaded during `initialize()`
    #[error("failed to initialize data provider for parameter '{parameter}': {source}")]
    Initialization {
        parameter: String,
        #[source]
        source: InitFailure,
    },

    /// The configuration names a provider kind or plugin that cannot be resolved
    #[error("unsupported data provider '{kind}' for parameter '{parameter}'")]
    Unsupported { parameter: String, kind: String },

    /// Every file in a container was tried without one matching the pattern
    #[error("No files matching regex pattern '{pattern}' in directory '{}' (parameter '{parameter}')", folder.display())]
    NoMatch {
        parameter: String,
        pattern: String,
        folder: PathBuf,
    },

    /// A pattern became an invalid regex after placeholder substitution
    #[error("invalid file name pattern '{pattern}' for parameter '{parameter}': {source}")]
    InvalidPattern {
        parameter: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// `get_value()` was called before a successful `initialize()`
    #[error("data provider for parameter '{parameter}' is not initialized")]
    NotInitialized { parameter: String },

    /// Two providers in one parameter set share a name
    #[error("parameter '{parameter}' is declared more than once")]
    Duplicate { parameter: String },
}

impl ProviderError {
    pub(crate) fn init(parameter: &str, source: InitFailure) -> Self {
        Self::Initialization {
            parameter: parameter.to_string(),
            source,
        }
    }

    /// Name of the parameter the error refers to
    pub fn parameter(&self) -> &str {
        match self {
            Self::Initialization { parameter, .. }
            | Self::Unsupported { parameter, .. }
            | Self::NoMatch { parameter, .. }
            | Self::InvalidPattern { parameter, .. }
            | Self::NotInitialized { parameter }
            | Self::Duplicate { parameter } => parameter,
        }
    }
}

/// Reason an `initialize()` call failed
#[derive(Debug, Error)]
pub enum InitFailure {
    #[error("no folders are specified")]
    NoContainers,

    #[error("'{}' does not exist or is not a directory", .0.display())]
    MissingFolder(PathBuf),

    #[error("directory '{}' is empty or doesn't have files matching regex '{pattern}'", folder.display())]
    EmptyFolder { folder: PathBuf, pattern: String },

    #[error("failed to scan directory '{}': {source}", folder.display())]
    Scan {
        folder: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("invalid file name regex '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("the list of values is empty")]
    EmptyPool,

    #[error("range start {start} is greater than range end {end}")]
    InvalidRange { start: i64, end: i64 },

    #[error("invalid control token '{token}': {reason}")]
    InvalidToken { token: String, reason: String },
}

/// Result type for provider operations
pub type ProviderResult<T> = std::result::Result<T, ProviderError>;
