//! Domain error types
//!
//! This module defines the error hierarchy for the packager.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main packager error type
///
/// This is the primary error type used throughout the application.
/// It wraps the component-specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum PackagerError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Metadata store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Manifest construction errors
    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),

    /// Archive construction errors
    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Trigger surface errors (HTTP listener, scheduler)
    #[error("Trigger error: {0}")]
    Trigger(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Metadata store errors
///
/// Errors that occur when reading or writing report, file, status and package
/// records. These errors don't expose the database driver types.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached (pool exhausted, connection refused, timeout)
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// A query or statement was rejected by the store
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// A record read from the store could not be mapped to a domain type
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// The record referenced by an operation does not exist
    #[error("Record not found: {0}")]
    NotFound(String),

    /// A write conflicted with existing data (e.g. a package already registered)
    #[error("Conflict: {0}")]
    Conflict(String),
}

/// Manifest construction errors
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The manifest document could not be serialized
    #[error("Failed to build manifest: {0}")]
    Build(String),

    /// The serialized manifest could not be written to its staging location
    #[error("Failed to stage manifest at {path}: {reason}")]
    Staging { path: String, reason: String },
}

/// Archive construction errors
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// An input file could not be resolved or read
    #[error("Source file '{name}' unavailable at {location}: {reason}")]
    SourceUnavailable {
        name: String,
        location: String,
        reason: String,
    },

    /// The destination archive could not be created or finalized
    #[error("Failed to write archive {path}: {reason}")]
    Write { path: String, reason: String },

    /// A storage location could not be mapped to a local path
    #[error("Invalid storage location {location}: {reason}")]
    InvalidLocation { location: String, reason: String },
}

impl ArchiveError {
    /// Builds a write error for the given destination
    pub fn write(path: impl Into<String>, reason: impl ToString) -> Self {
        Self::Write {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for PackagerError {
    fn from(err: std::io::Error) -> Self {
        PackagerError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for PackagerError {
    fn from(err: serde_json::Error) -> Self {
        PackagerError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for PackagerError {
    fn from(err: toml::de::Error) -> Self {
        PackagerError::Configuration(format!("TOML parse error: {err}"))
    }
}
