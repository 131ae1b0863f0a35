//! Minimal host bootstrap for running the example module standalone.

use std::ffi::OsString;
use std::io::Write;
use std::process::ExitCode;

use mia_config::HostConfig;
use mia_config::telemetry::{self, TelemetryError};
use mia_core::error::RegistryError;
use mia_core::{ModuleRegistry, ParameterError};
use thiserror::Error;
use tracing::{error, info};

use crate::example_module::ExampleModule;

/// Failures while booting the host.
#[derive(Debug, Error)]
pub enum HostError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] mia_config::ConfigError),
    /// Telemetry could not be installed.
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    /// A module could not be registered or created.
    #[error(transparent)]
    Registry(#[from] RegistryError),
    /// A module's parameter panel could not be built.
    #[error(transparent)]
    Parameter(#[from] ParameterError),
}

/// Registers every module this crate provides.
///
/// # Errors
///
/// Returns [`RegistryError::Duplicate`] if a module is already registered.
pub fn register_modules(registry: &mut ModuleRegistry) -> Result<(), RegistryError> {
    registry.register::<ExampleModule>(ExampleModule::plugin_info())
}

/// Builds a registry holding this crate's modules and logs the palette.
///
/// One instance of each module is created by name so its parameter panel
/// can be checked before any workflow is assembled.
///
/// # Errors
///
/// Returns [`HostError`] if registration, creation or panel construction
/// fails.
pub fn boot(config: &HostConfig) -> Result<ModuleRegistry, HostError> {
    let mut registry = ModuleRegistry::new();
    register_modules(&mut registry)?;

    for (folder, entries) in registry.palette() {
        for entry in entries {
            info!(
                target: "mia::host",
                folder = %folder,
                module = %entry.name,
                display_name = %entry.display_name,
                priority = entry.priority.value(),
                "palette entry"
            );
        }
    }

    let mut module = registry.create(ExampleModule::NAME)?;
    module.base_mut().set_show_output(config.show_output());
    let visible: Vec<&str> = module
        .update_and_get_parameters()?
        .into_iter()
        .map(|p| p.name())
        .collect();
    info!(
        target: "mia::host",
        module = %module.name(),
        parameters = ?visible,
        show_output = module.show_output(),
        "module ready"
    );
    Ok(registry)
}

/// Runs the standalone host: loads configuration, installs telemetry and
/// boots the registry.
///
/// Errors raised before telemetry exists are written to `stderr`.
pub fn run<I, T, W>(args: I, stderr: &mut W) -> ExitCode
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    W: Write,
{
    let config = match mia_config::load(args) {
        Ok(loaded) => loaded,
        Err(err) => return report(stderr, &HostError::from(err)),
    };
    if let Err(err) = telemetry::initialise(&config) {
        return report(stderr, &HostError::from(err));
    }
    match boot(&config) {
        Ok(registry) => {
            info!(target: "mia::host", modules = registry.len(), "host ready");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(target: "mia::host", error = %err, "host failed to start");
            ExitCode::FAILURE
        }
    }
}

fn report<W: Write>(stderr: &mut W, err: &HostError) -> ExitCode {
    if writeln!(stderr, "mia-example: {err}").is_err() {
        return ExitCode::from(2);
    }
    ExitCode::FAILURE
}
