//! Core error types for riskwizard-core.
//!
//! Navigation never fails: locked jumps and out-of-place commands are
//! no-ops. The errors below cover answer recording, catalog validation,
//! configuration, and the submission transport.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for riskwizard-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Wizard contract violations
    #[error("Wizard error: {0}")]
    Wizard(#[from] WizardError),

    /// Catalog structure errors
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Submission transport errors
    #[error("Submission error: {0}")]
    Submission(#[from] SubmissionError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Rejected wizard commands. State is left untouched when one is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WizardError {
    #[error("Unknown question: {0}")]
    UnknownQuestion(String),

    #[error("Invalid score {0}: must be between 0 and 3")]
    InvalidScore(u8),

    #[error("Category index {index} out of bounds (categories: {len})")]
    CategoryOutOfBounds { index: usize, len: usize },

    #[error("Answer set does not match the catalog's questions")]
    AnswersMismatch,
}

/// Catalog validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Catalog has no categories")]
    Empty,

    #[error("Category '{0}' has no questions")]
    EmptyCategory(String),

    #[error("Duplicate category id: {0}")]
    DuplicateCategory(String),

    #[error("Duplicate question id: {0}")]
    DuplicateQuestion(String),
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

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Home/config directory unavailable
    #[error("Configuration directory unavailable: {0}")]
    NoDataDir(#[source] std::io::Error),
}

/// Errors from delivering a payload to the submission endpoint.
#[derive(Error, Debug)]
pub enum SubmissionError {
    #[error("Invalid webhook URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Webhook responded with HTTP {status}")]
    Status { status: u16 },

    #[error("Failed to encode payload: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
