//! Module contract for the MIA image-analysis workflow host.
//!
//! A module is a unit of work that the host lists in its palette, configures
//! through a dynamic parameter panel, and executes against a shared
//! [`Workspace`] of images and labelled object collections. This crate
//! defines every piece of that contract:
//!
//! * [`Module`] and [`ModuleBase`]: the hook set and the state behind it.
//! * [`Parameters`]: typed, named, self-validating configuration entries.
//! * [`Workspace`], [`Image`] and [`Objs`]: the data a module reads and
//!   writes.
//! * [`refs`]: reference declarations that tell downstream modules which
//!   measurements and relationships a module adds.
//! * [`ModuleRegistry`] and [`Workflow`]: an explicit palette registry and a
//!   sequential runner.
//! * [`ops`]: reusable measurement, colour and overlay operations.
//!
//! # Example
//!
//! ```
//! use mia_core::{Parameter, Parameters};
//!
//! let mut parameters = Parameters::new("Example");
//! parameters.add(Parameter::integer("Line width", 1)).expect("valid");
//! parameters.set_from_text("Line width", "3").expect("integer");
//! let width: i64 = parameters.value("Line width", None).expect("declared");
//! assert_eq!(width, 3);
//! ```

pub mod category;
pub mod error;
pub mod image;
pub mod measurement;
pub mod module;
pub mod object;
pub mod ops;
pub mod parameter;
pub mod refs;
pub mod registry;
pub mod workflow;
pub mod workspace;

#[cfg(test)]
mod test_support;

pub use self::category::Category;
pub use self::error::{
    BoundsError, ModuleError, ObjectError, ParameterError, RegistryError, WorkflowError,
};
pub use self::image::{Calibration, Dimensions, Image};
pub use self::measurement::Measurement;
pub use self::module::{CancellationToken, Module, ModuleBase, Status, create_module};
pub use self::object::{Obj, Objs, SpatialBounds, VolumeType};
pub use self::parameter::{Parameter, ParameterKind, ParameterValue, ParameterValues, Parameters};
pub use self::registry::{ModuleRegistry, PluginInfo, Priority};
pub use self::workflow::{RunOutcome, Workflow};
pub use self::workspace::Workspace;
