//! Cadence Telemetry - Logging and tracing for the Cadence desktop client.
//!
//! This crate provides:
//! - `tracing` subscriber setup for terminal or rolling-file output
//! - A per-request span so the lines of one asset request or deep-link
//!   dispatch can be picked out of interleaved output
//!
//! # Example
//!
//! ```rust,no_run
//! use cadence_telemetry::{Channel, LogConfig, LogFormat, RequestContext, setup_logging};
//!
//! # fn main() -> Result<(), cadence_telemetry::TelemetryError> {
//! let config = LogConfig::new("debug")
//!     .with_format(LogFormat::Pretty)
//!     .without_timestamps()
//!     .with_directive("cadence_protocol=trace");
//!
//! setup_logging(&config)?;
//!
//! let ctx = RequestContext::new(Channel::Asset);
//! let span = ctx.span();
//! let _guard = span.enter();
//! tracing::info!(host = "main", "serving asset");
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod context;
mod error;
mod logging;

pub use context::{Channel, RequestContext};
pub use error::{TelemetryError, TelemetryResult};
pub use logging::{LOG_FILE_PREFIX, LogConfig, LogFormat, LogTarget, setup_logging};
