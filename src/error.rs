use std::path::PathBuf;
use thiserror::Error;

use crate::retrieval::ItemId;

/// Main error type for hitmerge
#[derive(Error, Debug)]
pub enum HitmergeError {
    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration validation errors
    #[error("Configuration validation failed: {errors:?}")]
    ConfigValidation { errors: Vec<ValidationError> },

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Invalid configuration value
    #[error("Invalid configuration value at {path}: {message}")]
    InvalidConfigValue { path: String, message: String },

    /// Query failed to parse or evaluate
    #[error(transparent)]
    Query(#[from] QueryError),

    /// Merge interrupted before completion
    #[error(transparent)]
    Merge(#[from] MergeError),

    /// IO errors
    #[error("IO error: {context}: {source}")]
    Io {
        source: std::io::Error,
        context: String,
    },

    /// TOML deserialization errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization errors
    #[error("TOML serialization error: {0}")]
    TomlSerialization(#[from] toml::ser::Error),

    /// JSON errors
    #[error("JSON error: {context}: {source}")]
    Json {
        source: serde_json::Error,
        context: String,
    },

    /// Generic errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Failure while parsing or evaluating a search query.
///
/// Aborts the merge in progress; partial results are discarded.
#[derive(Error, Debug)]
pub enum QueryError {
    /// The query text could not be parsed
    #[error("Invalid search query '{query}': {reason}")]
    Malformed { query: String, reason: String },

    /// The query parsed but failed while hits were being produced
    #[error("Search query '{query}' failed during evaluation: {source}")]
    Evaluation {
        query: String,
        #[source]
        source: anyhow::Error,
    },
}

impl QueryError {
    pub fn malformed(query: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            query: query.into(),
            reason: reason.into(),
        }
    }

    pub fn evaluation(query: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        Self::Evaluation {
            query: query.into(),
            source: source.into(),
        }
    }

    /// The query text that triggered the failure
    pub fn query(&self) -> &str {
        match self {
            Self::Malformed { query, .. } | Self::Evaluation { query, .. } => query,
        }
    }
}

/// Why a merge produced no result set
#[derive(Error, Debug)]
pub enum MergeError {
    #[error(transparent)]
    Query(#[from] QueryError),

    /// The caller's cancellation token fired mid-merge
    #[error("Merge cancelled before completion")]
    Cancelled,
}

/// Item metadata could not be resolved.
///
/// Always recovered locally: the item is treated as unavailable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("Item not found: {0}")]
    NotFound(ItemId),

    #[error("Access denied to item: {0}")]
    AccessDenied(ItemId),

    #[error("Item {id} unavailable: {reason}")]
    Unavailable { id: ItemId, reason: String },
}

/// Configuration validation error
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Path to the configuration key that failed validation
    pub path: String,
    /// Error message describing the validation failure
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result type for hitmerge operations
pub type Result<T> = std::result::Result<T, HitmergeError>;
