//! Domain errors raised by the module contract.
//!
//! Errors use `thiserror`-derived enums with structured context so the host
//! can tell programming errors (a module asking for a parameter it never
//! declared) apart from data errors (a coordinate outside the collection
//! bounds). Programming errors propagate out of `process`; data errors are
//! logged by the module and usually skipped.

use std::num::ParseIntError;

use thiserror::Error;

/// Errors arising from parameter declaration, lookup, and coercion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParameterError {
    /// No parameter with the requested name was declared.
    #[error("parameter '{name}' is not declared by this module")]
    Missing {
        /// Name that was looked up.
        name: String,
    },

    /// The parameter holds a value of a different type.
    #[error("parameter '{name}' holds a {actual} value, not a {expected} value")]
    WrongType {
        /// Parameter name.
        name: String,
        /// Type requested by the caller.
        expected: &'static str,
        /// Type actually held by the parameter.
        actual: &'static str,
    },

    /// The parameter cannot be edited (e.g. a separator).
    #[error("parameter '{name}' is not editable")]
    NotEditable {
        /// Parameter name.
        name: String,
    },

    /// User input could not be coerced to an integer.
    #[error("parameter '{name}' expects an integer, got '{input}'")]
    InvalidInteger {
        /// Parameter name.
        name: String,
        /// Raw input that failed to parse.
        input: String,
        /// Underlying parse failure.
        #[source]
        source: ParseIntError,
    },

    /// Two parameters were declared with the same name.
    #[error("parameter '{name}' is declared more than once")]
    Duplicate {
        /// Parameter name.
        name: String,
    },

    /// A choice parameter was declared with a default outside its choices.
    #[error("default '{default}' of choice parameter '{name}' is not one of its choices")]
    ChoiceDefault {
        /// Parameter name.
        name: String,
        /// The offending default.
        default: String,
    },
}

/// A coordinate fell outside the spatial limits of its object collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error(
    "point ({x}, {y}, {z}) is outside the collection limits {width} x {height} x {depth}"
)]
pub struct BoundsError {
    /// Requested X coordinate.
    pub x: i64,
    /// Requested Y coordinate.
    pub y: i64,
    /// Requested Z coordinate.
    pub z: i64,
    /// Collection width in pixels.
    pub width: u32,
    /// Collection height in pixels.
    pub height: u32,
    /// Collection depth in slices.
    pub depth: u32,
}

/// Errors arising from object collection bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ObjectError {
    /// Every object ID has been handed out.
    #[error("collection '{collection}' has no object IDs left")]
    IdsExhausted {
        /// Collection name.
        collection: String,
    },
}

/// Errors arising from module registration and lookup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A module with the same symbolic name is already registered.
    #[error("module '{name}' is already registered")]
    Duplicate {
        /// Symbolic module name.
        name: String,
    },

    /// No module with the requested symbolic name is registered.
    #[error("module '{name}' not found in registry")]
    NotFound {
        /// Symbolic name that was looked up.
        name: String,
    },

    /// The module declared an empty symbolic name.
    #[error("module names must not be empty")]
    EmptyName,

    /// The module's parameter declarations were malformed.
    #[error("module '{name}' declared invalid parameters: {source}")]
    InvalidParameters {
        /// Symbolic module name.
        name: String,
        /// Underlying declaration error.
        #[source]
        source: ParameterError,
    },
}

/// Fatal errors a module raises from `process`.
///
/// These correspond to programming errors: the host aborts the workflow
/// and reports the diagnostic. Data problems are reported through
/// [`Status::Fail`](crate::module::Status::Fail) instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModuleError {
    /// A parameter lookup or conversion failed.
    #[error(transparent)]
    Parameter(#[from] ParameterError),

    /// An output collection could not accept another object.
    #[error(transparent)]
    Object(#[from] ObjectError),

    /// The module broke the host contract in some other way.
    #[error("module '{module}' violated the module contract: {message}")]
    Contract {
        /// Module name.
        module: String,
        /// Description of the violation.
        message: String,
    },
}

/// Errors that abort a workflow run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    /// A module failed verification so the run was not started.
    #[error("module '{module}' failed verification")]
    Verification {
        /// Nickname of the module that failed.
        module: String,
    },

    /// A module raised a fatal error during `process`.
    #[error("module '{module}' aborted the workflow: {source}")]
    Module {
        /// Nickname of the failing module.
        module: String,
        /// Underlying module error.
        #[source]
        source: ModuleError,
    },

    /// A module redirected to a module that does not exist.
    #[error("redirect target '{target}' is not in the workflow")]
    RedirectTarget {
        /// Requested target nickname.
        target: String,
    },
}
