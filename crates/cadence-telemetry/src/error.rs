//! Telemetry errors.

use thiserror::Error;

/// Why logging could not be set up.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// Unknown format or unparsable filter directive.
    #[error("invalid logging configuration: {0}")]
    ConfigError(String),

    /// A global subscriber is already installed.
    #[error("cannot install log subscriber: {0}")]
    InitError(String),

    /// The log directory could not be created.
    #[error("cannot prepare log directory: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for telemetry setup.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
