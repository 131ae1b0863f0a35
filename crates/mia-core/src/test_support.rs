//! Shared test doubles for the crate's unit tests.

use crate::category::{Category, MISCELLANEOUS};
use crate::error::{ModuleError, ParameterError};
use crate::module::{Module, ModuleBase, Status, create_module};
use crate::parameter::Parameter;
use crate::refs::{
    ImageMeasurementRef, MetadataRef, ObjMeasurementRef, ParentChildRef, PartnerRef, RefList,
};
use crate::workspace::Workspace;

pub(crate) const INPUT_OBJECTS: &str = "Input objects";
pub(crate) const MODE: &str = "Mode";
pub(crate) const LEVEL: &str = "Level";
pub(crate) const TRACE: &str = "Trace";

/// Records its nickname in workspace metadata and returns a fixed status.
#[derive(Debug)]
pub(crate) struct StubModule {
    base: ModuleBase,
    pub(crate) status: Status,
    pub(crate) measurement: Option<&'static str>,
    pub(crate) initialised: usize,
}

impl Default for StubModule {
    fn default() -> Self {
        Self {
            base: ModuleBase::new("StubModule", "Stub module"),
            status: Status::Pass,
            measurement: None,
            initialised: 0,
        }
    }
}

impl StubModule {
    pub(crate) fn boxed(nickname: &str, status: Status) -> Box<dyn Module> {
        Box::new(Self::named(nickname, status))
    }

    pub(crate) fn named(nickname: &str, status: Status) -> Self {
        let mut module: Self = create_module().expect("stub declarations are valid");
        module.base.set_nickname(nickname);
        module.status = status;
        module
    }
}

impl Module for StubModule {
    fn base(&self) -> &ModuleBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ModuleBase {
        &mut self.base
    }

    fn category(&self) -> &'static Category {
        &MISCELLANEOUS
    }

    fn description(&self) -> &str {
        "Records that it ran"
    }

    fn initialise_parameters(&mut self) -> Result<(), ParameterError> {
        self.initialised += 1;
        let parameters = self.base.parameters_mut();
        parameters.add(Parameter::separator("Stub"))?;
        parameters.add(Parameter::input_objects(INPUT_OBJECTS))?;
        parameters.add(Parameter::choice(MODE, "Simple", &["Simple", "Advanced"]))?;
        parameters.add(Parameter::integer(LEVEL, 1))
    }

    fn update_and_get_parameters(&self) -> Result<Vec<&Parameter>, ParameterError> {
        let parameters = self.parameters();
        let mode: String = parameters.value(MODE, None)?;
        if mode == "Advanced" {
            parameters.select(&["Stub", INPUT_OBJECTS, MODE, LEVEL])
        } else {
            parameters.select(&["Stub", INPUT_OBJECTS, MODE])
        }
    }

    fn update_and_get_object_measurement_refs(
        &mut self,
    ) -> Option<RefList<'_, ObjMeasurementRef>> {
        let name = self.measurement?;
        let objects: String = self.parameters().value(INPUT_OBJECTS, None).ok()?;
        let reference = self.base.obj_measurement_refs().get_or_put(name.to_owned());
        reference.set_objects_name(objects);
        Some(vec![&*reference])
    }

    fn update_and_get_image_measurement_refs(
        &mut self,
    ) -> Option<RefList<'_, ImageMeasurementRef>> {
        None
    }

    fn update_and_get_metadata_refs(&mut self) -> Option<RefList<'_, MetadataRef>> {
        None
    }

    fn update_and_get_parent_child_refs(&mut self) -> Option<RefList<'_, ParentChildRef>> {
        None
    }

    fn update_and_get_partner_refs(&mut self) -> Option<RefList<'_, PartnerRef>> {
        Some(Vec::new())
    }

    fn process(&mut self, workspace: &mut Workspace) -> Result<Status, ModuleError> {
        let trace = workspace
            .metadata()
            .get(TRACE)
            .map_or_else(|| self.nickname().to_owned(), |t| format!("{t},{}", self.nickname()));
        workspace.add_metadata(TRACE, trace);
        Ok(self.status.clone())
    }
}

/// Declares a parameterless module type with fixed identity.
macro_rules! fixed_module {
    ($ty:ident, $name:literal, $display:literal, $category:expr) => {
        #[derive(Debug)]
        pub(crate) struct $ty {
            base: ModuleBase,
        }

        impl Default for $ty {
            fn default() -> Self {
                Self {
                    base: ModuleBase::new($name, $display),
                }
            }
        }

        impl Module for $ty {
            fn base(&self) -> &ModuleBase {
                &self.base
            }

            fn base_mut(&mut self) -> &mut ModuleBase {
                &mut self.base
            }

            fn category(&self) -> &'static Category {
                $category
            }

            fn description(&self) -> &str {
                $display
            }

            fn initialise_parameters(&mut self) -> Result<(), ParameterError> {
                Ok(())
            }

            fn update_and_get_parameters(&self) -> Result<Vec<&Parameter>, ParameterError> {
                Ok(self.parameters().iter().collect())
            }

            fn update_and_get_object_measurement_refs(
                &mut self,
            ) -> Option<RefList<'_, ObjMeasurementRef>> {
                None
            }

            fn update_and_get_image_measurement_refs(
                &mut self,
            ) -> Option<RefList<'_, ImageMeasurementRef>> {
                None
            }

            fn update_and_get_metadata_refs(&mut self) -> Option<RefList<'_, MetadataRef>> {
                None
            }

            fn update_and_get_parent_child_refs(
                &mut self,
            ) -> Option<RefList<'_, ParentChildRef>> {
                None
            }

            fn update_and_get_partner_refs(&mut self) -> Option<RefList<'_, PartnerRef>> {
                None
            }

            fn process(&mut self, _workspace: &mut Workspace) -> Result<Status, ModuleError> {
                Ok(Status::Pass)
            }
        }
    };
}

fixed_module!(GaussianFilter, "GaussianFilter", "Filter image", &crate::category::IMAGES);
fixed_module!(ThresholdImage, "ThresholdImage", "Threshold image", &crate::category::IMAGES);
fixed_module!(Unnamed, "", "Unnamed", &MISCELLANEOUS);

/// Declares the same parameter twice.
#[derive(Debug)]
pub(crate) struct BrokenModule {
    inner: GaussianFilter,
}

impl Default for BrokenModule {
    fn default() -> Self {
        Self {
            inner: GaussianFilter {
                base: ModuleBase::new("BrokenModule", "Broken module"),
            },
        }
    }
}

impl Module for BrokenModule {
    fn base(&self) -> &ModuleBase {
        self.inner.base()
    }

    fn base_mut(&mut self) -> &mut ModuleBase {
        self.inner.base_mut()
    }

    fn category(&self) -> &'static Category {
        &MISCELLANEOUS
    }

    fn description(&self) -> &str {
        "Declares a parameter twice"
    }

    fn initialise_parameters(&mut self) -> Result<(), ParameterError> {
        self.parameters_mut().add(Parameter::integer("Size", 1))?;
        self.parameters_mut().add(Parameter::integer("Size", 2))
    }

    fn update_and_get_parameters(&self) -> Result<Vec<&Parameter>, ParameterError> {
        self.inner.update_and_get_parameters()
    }

    fn update_and_get_object_measurement_refs(
        &mut self,
    ) -> Option<RefList<'_, ObjMeasurementRef>> {
        None
    }

    fn update_and_get_image_measurement_refs(
        &mut self,
    ) -> Option<RefList<'_, ImageMeasurementRef>> {
        None
    }

    fn update_and_get_metadata_refs(&mut self) -> Option<RefList<'_, MetadataRef>> {
        None
    }

    fn update_and_get_parent_child_refs(&mut self) -> Option<RefList<'_, ParentChildRef>> {
        None
    }

    fn update_and_get_partner_refs(&mut self) -> Option<RefList<'_, PartnerRef>> {
        None
    }

    fn process(&mut self, workspace: &mut Workspace) -> Result<Status, ModuleError> {
        self.inner.process(workspace)
    }
}
