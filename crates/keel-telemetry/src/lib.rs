//! Keel Telemetry - Logging for the Keel installer.
//!
//! Libraries in this workspace only emit `tracing` events. Binaries call
//! [`setup_logging`] once at startup to decide where those events go.
//!
//! # Example
//!
//! ```rust,no_run
//! use keel_telemetry::{LogConfig, LogFormat, setup_logging};
//!
//! # fn main() -> Result<(), keel_telemetry::TelemetryError> {
//! let config = LogConfig::new("info")
//!     .with_format(LogFormat::Compact)
//!     .with_directive("keel_modules=debug");
//!
//! setup_logging(&config)?;
//! tracing::info!("Logging ready");
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod error;
mod logging;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::{LogConfig, LogFormat, LogTarget, setup_default_logging, setup_logging};
