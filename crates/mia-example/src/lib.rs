//! Example plugin for the MIA image-analysis host.
//!
//! The crate provides [`ExampleModule`], a reference consumer of every hook
//! in the module contract, and the [`host`] helpers the standalone binary
//! uses to boot a registry with the module registered by name.

pub mod example_module;
pub mod host;

pub use self::example_module::{EXAMPLES, ExampleModule, INTENSITY, OverlayMode};
pub use self::host::{HostError, boot, register_modules, run};
