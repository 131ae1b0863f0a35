//! Host configuration for MIA binaries.
//!
//! [`HostConfig`] is layered by `ortho_config`: built-in defaults, then
//! configuration files, then `MIA_*` environment variables, then CLI flags.
//! The [`telemetry`] module turns the logging fields into a global
//! `tracing` subscriber.

use std::sync::Arc;

use ortho_config::{OrthoConfig, OrthoError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod telemetry;

pub use self::telemetry::{LogFormat, LogFormatParseError};

/// Filter applied when no layer sets one.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Returns [`DEFAULT_LOG_FILTER`].
#[must_use]
pub const fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned copy of [`DEFAULT_LOG_FILTER`] for the configuration derive.
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Hosts log JSON unless told otherwise.
#[must_use]
pub const fn default_log_format() -> LogFormat {
    LogFormat::Json
}

/// Settings shared by every MIA host binary.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "MIA")]
pub struct HostConfig {
    /// `tracing` filter directive, e.g. `info` or `mia=debug`.
    #[ortho_config(default = default_log_filter_string())]
    pub log_filter: String,
    /// Output format for log events.
    #[ortho_config(default = default_log_format())]
    pub log_format: LogFormat,
    /// Report module outputs after each run.
    #[ortho_config(default = false)]
    pub show_output: bool,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            show_output: false,
        }
    }
}

impl HostConfig {
    /// Returns the log filter directive.
    #[must_use]
    pub const fn log_filter(&self) -> &str {
        self.log_filter.as_str()
    }

    /// Returns the log output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Returns `true` if modules should report their outputs.
    #[must_use]
    pub const fn show_output(&self) -> bool {
        self.show_output
    }
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A layer could not be read or merged.
    #[error("failed to load configuration: {0}")]
    Load(#[from] Arc<OrthoError>),
}

/// Loads [`HostConfig`] from the given command-line arguments plus the
/// environment and any configuration files.
///
/// # Errors
///
/// Returns [`ConfigError::Load`] if any layer is malformed.
pub fn load<I, T>(args: I) -> Result<HostConfig, ConfigError>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Ok(HostConfig::load_from_iter(args)?)
}
