//! The module contract.
//!
//! A module is one unit of work in a workflow. The host drives it only
//! through the [`Module`] trait:
//!
//! 1. [`create_module`] builds an instance and runs
//!    [`Module::initialise_parameters`] exactly once.
//! 2. [`Module::update_and_get_parameters`] is called on every panel refresh
//!    and returns the currently visible subset of the module's own
//!    parameters.
//! 3. [`Module::verify`] gates the run.
//! 4. [`Module::process`] executes against a [`Workspace`] and returns a
//!    [`Status`].
//! 5. The five reference-query hooks tell the host which measurements and
//!    relationships the module adds, so downstream modules can offer them.
//!
//! Shared state (names, parameters, reference stores, flags, the
//! cancellation token) lives in a [`ModuleBase`] that each implementation
//! embeds and exposes through [`Module::base`].

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::category::Category;
use crate::error::{ModuleError, ParameterError};
use crate::parameter::{Parameter, Parameters};
use crate::refs::{
    ImageMeasurementRef, ImageMeasurementRefs, MetadataRef, MetadataRefs, ObjMeasurementRef,
    ObjMeasurementRefs, ParentChildRef, ParentChildRefs, PartnerRef, PartnerRefs, RefList,
};
use crate::workspace::Workspace;

/// Terminal outcome of one `process` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    /// Continue with the next module.
    Pass,
    /// Halt the workflow run.
    Fail,
    /// End the workflow run cleanly; no further modules run.
    Terminate,
    /// Continue at the module with the given nickname.
    Redirect(String),
}

impl Status {
    /// Returns `true` if downstream modules may run.
    #[must_use]
    pub const fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass => f.write_str("PASS"),
            Self::Fail => f.write_str("FAIL"),
            Self::Terminate => f.write_str("TERMINATE"),
            Self::Redirect(target) => write!(f, "REDIRECT({target})"),
        }
    }
}

/// Cooperative cancellation flag shared between the host and its modules.
///
/// Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Creates a token that is not cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Clears a previous request so the token can be reused for a new run.
    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::SeqCst);
    }

    /// Returns `true` once cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// State every module carries.
#[derive(Debug)]
pub struct ModuleBase {
    name: String,
    display_name: String,
    nickname: String,
    enabled: bool,
    show_output: bool,
    parameters: Parameters,
    obj_measurement_refs: ObjMeasurementRefs,
    image_measurement_refs: ImageMeasurementRefs,
    metadata_refs: MetadataRefs,
    parent_child_refs: ParentChildRefs,
    partner_refs: PartnerRefs,
    cancellation: CancellationToken,
}

impl ModuleBase {
    /// Creates the base for a module with a symbolic `name` and a
    /// human-readable `display_name`. The nickname starts as the display
    /// name.
    #[must_use]
    pub fn new(name: impl Into<String>, display_name: impl Into<String>) -> Self {
        let symbolic = name.into();
        let display = display_name.into();
        Self {
            parameters: Parameters::new(symbolic.clone()),
            name: symbolic,
            nickname: display.clone(),
            display_name: display,
            enabled: true,
            show_output: false,
            obj_measurement_refs: ObjMeasurementRefs::new(),
            image_measurement_refs: ImageMeasurementRefs::new(),
            metadata_refs: MetadataRefs::new(),
            parent_child_refs: ParentChildRefs::new(),
            partner_refs: PartnerRefs::new(),
            cancellation: CancellationToken::new(),
        }
    }

    /// Returns the symbolic name used for registration.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the name shown in the palette.
    #[must_use]
    pub const fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Returns the user-editable name of this workflow slot.
    #[must_use]
    pub const fn nickname(&self) -> &str {
        self.nickname.as_str()
    }

    /// Renames this workflow slot.
    pub fn set_nickname(&mut self, nickname: impl Into<String>) {
        self.nickname = nickname.into();
    }

    /// Returns `false` if the workflow should skip this module.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enables or disables the module.
    pub const fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Returns `true` if the module should report its outputs after running.
    #[must_use]
    pub const fn show_output(&self) -> bool {
        self.show_output
    }

    /// Toggles output reporting.
    pub const fn set_show_output(&mut self, show_output: bool) {
        self.show_output = show_output;
    }

    /// Returns the declared parameters.
    #[must_use]
    pub const fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Returns the declared parameters for editing.
    pub const fn parameters_mut(&mut self) -> &mut Parameters {
        &mut self.parameters
    }

    /// Returns the object measurement reference store.
    pub const fn obj_measurement_refs(&mut self) -> &mut ObjMeasurementRefs {
        &mut self.obj_measurement_refs
    }

    /// Returns the image measurement reference store.
    pub const fn image_measurement_refs(&mut self) -> &mut ImageMeasurementRefs {
        &mut self.image_measurement_refs
    }

    /// Returns the metadata reference store.
    pub const fn metadata_refs(&mut self) -> &mut MetadataRefs {
        &mut self.metadata_refs
    }

    /// Returns the parent-child reference store.
    pub const fn parent_child_refs(&mut self) -> &mut ParentChildRefs {
        &mut self.parent_child_refs
    }

    /// Returns the partner reference store.
    pub const fn partner_refs(&mut self) -> &mut PartnerRefs {
        &mut self.partner_refs
    }

    /// Returns the cancellation token this module observes.
    #[must_use]
    pub const fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// Replaces the cancellation token, typically with the workflow's.
    pub fn set_cancellation(&mut self, token: CancellationToken) {
        self.cancellation = token;
    }
}

/// The hook set a module implements.
///
/// Hooks are called sequentially; the host never calls two hooks on the
/// same module concurrently.
pub trait Module: fmt::Debug {
    /// Returns the shared module state.
    fn base(&self) -> &ModuleBase;

    /// Returns the shared module state for editing.
    fn base_mut(&mut self) -> &mut ModuleBase;

    /// Returns the palette folder the module is listed under.
    ///
    /// Categories are `static` items so they exist before the host first
    /// enumerates modules.
    fn category(&self) -> &'static Category;

    /// Returns help text shown in the palette and documentation.
    fn description(&self) -> &str;

    /// Declares the module's parameters in display order.
    ///
    /// Called once by [`create_module`].
    ///
    /// # Errors
    ///
    /// Returns a [`ParameterError`] if a declaration is malformed.
    fn initialise_parameters(&mut self) -> Result<(), ParameterError>;

    /// Returns the parameters to render right now, in order.
    ///
    /// The result must borrow the module's own instances and must not change
    /// any state; the visible subset is derived from current values only.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterError::Missing`] if the module names a parameter it
    /// never declared.
    fn update_and_get_parameters(&self) -> Result<Vec<&Parameter>, ParameterError>;

    /// Returns the object measurements this module adds, or `None`.
    fn update_and_get_object_measurement_refs(
        &mut self,
    ) -> Option<RefList<'_, ObjMeasurementRef>>;

    /// Returns the image measurements this module adds, or `None`.
    fn update_and_get_image_measurement_refs(
        &mut self,
    ) -> Option<RefList<'_, ImageMeasurementRef>>;

    /// Returns the workspace metadata this module adds, or `None`.
    fn update_and_get_metadata_refs(&mut self) -> Option<RefList<'_, MetadataRef>>;

    /// Returns the parent-child relationships this module creates, or
    /// `None`.
    fn update_and_get_parent_child_refs(&mut self) -> Option<RefList<'_, ParentChildRef>>;

    /// Returns the partner relationships this module creates, or `None`.
    fn update_and_get_partner_refs(&mut self) -> Option<RefList<'_, PartnerRef>>;

    /// Executes the module against `workspace`.
    ///
    /// # Errors
    ///
    /// Returns a [`ModuleError`] for programming errors such as reading an
    /// undeclared parameter. Data problems are logged and reported as
    /// [`Status::Fail`] instead.
    fn process(&mut self, workspace: &mut Workspace) -> Result<Status, ModuleError>;

    /// Cross-parameter consistency check; `true` permits running.
    fn verify(&self) -> bool {
        self.parameters().verify()
    }

    /// Returns the symbolic module name.
    fn name(&self) -> &str {
        self.base().name()
    }

    /// Returns the workflow slot name.
    fn nickname(&self) -> &str {
        self.base().nickname()
    }

    /// Returns the declared parameters.
    fn parameters(&self) -> &Parameters {
        self.base().parameters()
    }

    /// Returns the declared parameters for editing.
    fn parameters_mut(&mut self) -> &mut Parameters {
        self.base_mut().parameters_mut()
    }

    /// Returns `true` once the host has asked the module to stop.
    ///
    /// Long-running modules check this between objects.
    fn is_cancelled(&self) -> bool {
        self.base().cancellation().is_cancelled()
    }

    /// Returns `true` if the module should report its outputs.
    fn show_output(&self) -> bool {
        self.base().show_output()
    }
}

/// Builds a module and declares its parameters.
///
/// # Errors
///
/// Returns the first [`ParameterError`] raised while declaring parameters.
pub fn create_module<M: Module + Default>() -> Result<M, ParameterError> {
    let mut module = M::default();
    module.initialise_parameters()?;
    Ok(module)
}
