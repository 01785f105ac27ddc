//! Core error types for signal-catalog-core.
//!
//! This module defines the error hierarchy using thiserror. Every command
//! either completes or fails with one of these; nothing is retried.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for signal-catalog-core.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Operating on a signal id that does not exist
    #[error("Signal {id} not found")]
    NotFound { id: i64 },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV export errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Storage-specific errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open the SQLite database file
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Failed to connect to the hosted backend
    #[error("Failed to connect to Postgres: {message}")]
    ConnectFailed { message: String },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Schema creation failed
    #[error("Schema setup failed: {0}")]
    SchemaFailed(String),

    /// Filesystem error while preparing the database location
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// The hosted backend was selected but no connection string is set
    #[error("Backend 'postgres' selected but {var} is not set")]
    MissingDsn { var: &'static str },
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Title must be non-empty
    #[error("Title must not be empty")]
    EmptyTitle,

    /// Date string did not parse as YYYY-MM-DD
    #[error("Invalid date '{value}': expected YYYY-MM-DD")]
    InvalidDate { value: String },

    /// Unknown severity value
    #[error("Unknown severity '{value}': expected low, medium, high or critical")]
    UnknownSeverity { value: String },

    /// Unknown status value
    #[error("Unknown status '{value}': expected open or closed")]
    UnknownStatus { value: String },

    /// Unknown output format
    #[error("Unknown format '{value}': expected table or markdown")]
    UnknownFormat { value: String },

    /// Unknown storage backend
    #[error("Unknown backend '{value}': expected sqlite or postgres")]
    UnknownBackend { value: String },
}

// Helper implementations for converting from driver error types

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::QueryFailed(err.to_string())
    }
}

impl From<postgres::Error> for StoreError {
    fn from(err: postgres::Error) -> Self {
        StoreError::QueryFailed(err.to_string())
    }
}

/// Result type alias for CatalogError
pub type Result<T, E = CatalogError> = std::result::Result<T, E>;
