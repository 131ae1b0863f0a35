//! Centroid extraction with intensity measurement and overlay rendering.
//!
//! [`ExampleModule`] reads an image and an object collection from the
//! workspace and emits one single-point child object per input object at
//! its rounded mean centroid. Each child records the image intensity at
//! that point. A duplicate of the input image carries an overlay of the
//! input objects (filled or outlined) topped by the centroid markers.

use mia_core::category::{Category, ROOT};
use mia_core::image::{Image, PointSize, PointType};
use mia_core::ops::colour::{OPAQUE, colours, id_hues, parent_id_hues};
use mia_core::ops::measure::measure_intensity;
use mia_core::ops::overlay::{add_object_centroid, add_object_fill, add_object_outline};
use mia_core::refs::{
    ImageMeasurementRef, MetadataRef, ObjMeasurementRef, ParentChildRef, PartnerRef, RefList,
};
use mia_core::registry::{PluginInfo, Priority};
use mia_core::{
    Measurement, Module, ModuleBase, ModuleError, ObjectError, Objs, Parameter, ParameterError,
    Parameters, Status, VolumeType, Workspace, create_module,
};
use strum::{Display, EnumString, VariantNames};
use tracing::{debug, error, info, warn};

/// Separator above the input parameters.
pub const INPUT_SEPARATOR: &str = "Image and object input";
/// Image the centroids are measured against and drawn on.
pub const INPUT_IMAGE: &str = "Input image";
/// Collection whose centroids are extracted.
pub const INPUT_OBJECTS: &str = "Input objects";
/// Separator above the output parameters.
pub const OUTPUT_SEPARATOR: &str = "Image and object output";
/// Name of the rendered overlay image.
pub const OUTPUT_IMAGE: &str = "Output image";
/// Name of the centroid collection.
pub const OUTPUT_OBJECTS: &str = "Output objects";
/// Separator above the overlay parameters.
pub const OVERLAY_SEPARATOR: &str = "Overlay controls";
/// How input objects are drawn; one of [`OverlayMode`].
pub const OVERLAY_MODE: &str = "Overlay mode";
/// Outline stroke width, shown for [`OverlayMode::Outlines`].
pub const LINE_WIDTH: &str = "Line width";
/// Fill opacity percentage, shown for [`OverlayMode::Fill`].
pub const OPACITY: &str = "Opacity";

/// Measurement recorded on every centroid object.
pub const INTENSITY: &str = "Intensity";

/// Palette folder for demonstration modules.
pub static EXAMPLES: Category =
    Category::new("Examples", "Modules used in examples", &ROOT, true);

/// How the input objects are rendered on the output image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, VariantNames)]
pub enum OverlayMode {
    /// Translucent filled regions.
    Fill,
    /// Opaque region boundaries.
    Outlines,
}

/// Extracts object centroids, measures intensity there and renders both
/// collections as an overlay.
#[derive(Debug)]
pub struct ExampleModule {
    base: ModuleBase,
}

/// Yields a bare instance with no declared parameters, used by the registry
/// as the seed for [`create_module`](mia_core::create_module). Call
/// [`ExampleModule::new`] instead to get a module ready to configure.
impl Default for ExampleModule {
    fn default() -> Self {
        Self {
            base: ModuleBase::new(Self::NAME, "Example module"),
        }
    }
}

impl ExampleModule {
    /// Symbolic name used for registration and lookup.
    pub const NAME: &'static str = "ExampleModule";

    /// Creates a module with its parameters declared.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterError`] if the declarations are malformed.
    pub fn new() -> Result<Self, ParameterError> {
        create_module()
    }

    /// Registration attributes: visible, listed below normal-priority
    /// modules.
    #[must_use]
    pub fn plugin_info() -> PluginInfo {
        PluginInfo::default().with_priority(Priority::LOW)
    }

    /// Returns the selected overlay mode, or `None` if the stored value
    /// names no mode.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterError`] if the overlay parameter is missing or not
    /// text.
    pub fn overlay_mode(&self) -> Result<Option<OverlayMode>, ParameterError> {
        let text: String = self.parameters().value(OVERLAY_MODE, None)?;
        Ok(text.parse().ok())
    }
}

/// Parameter values resolved once at the start of `process`.
struct Settings {
    input_image: String,
    input_objects: String,
    output_image: String,
    output_objects: String,
    mode: Option<OverlayMode>,
    line_width: u32,
    opacity: i64,
}

impl Settings {
    fn read(parameters: &Parameters, workspace: &Workspace) -> Result<Self, ParameterError> {
        let width: i64 = parameters.value(LINE_WIDTH, None)?;
        let mode: String = parameters.value(OVERLAY_MODE, None)?;
        Ok(Self {
            input_image: parameters.value(INPUT_IMAGE, Some(workspace))?,
            input_objects: parameters.value(INPUT_OBJECTS, Some(workspace))?,
            output_image: parameters.value(OUTPUT_IMAGE, Some(workspace))?,
            output_objects: parameters.value(OUTPUT_OBJECTS, Some(workspace))?,
            mode: mode.parse().ok(),
            line_width: u32::try_from(width.max(1)).unwrap_or(u32::MAX),
            opacity: parameters.value(OPACITY, None)?,
        })
    }
}

impl Module for ExampleModule {
    fn base(&self) -> &ModuleBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ModuleBase {
        &mut self.base
    }

    fn category(&self) -> &'static Category {
        &EXAMPLES
    }

    fn description(&self) -> &str {
        "Adds a single-point object at the centroid of each input object, \
         measures the input image intensity there, and draws both \
         collections onto a copy of the input image."
    }

    fn initialise_parameters(&mut self) -> Result<(), ParameterError> {
        let parameters = self.base.parameters_mut();
        parameters.add(Parameter::separator(INPUT_SEPARATOR))?;
        parameters.add(
            Parameter::input_image(INPUT_IMAGE).with_description(
                "Image measured at each centroid and used as the overlay base.",
            ),
        )?;
        parameters.add(
            Parameter::input_objects(INPUT_OBJECTS)
                .with_description("Objects whose centroids are extracted."),
        )?;
        parameters.add(Parameter::separator(OUTPUT_SEPARATOR))?;
        parameters.add(
            Parameter::output_image(OUTPUT_IMAGE, "Overlay")
                .with_description("Copy of the input image carrying the overlay."),
        )?;
        parameters.add(
            Parameter::output_objects(OUTPUT_OBJECTS, "Centroids").with_description(
                "Single-point objects, one per input object, linked as children.",
            ),
        )?;
        parameters.add(Parameter::separator(OVERLAY_SEPARATOR))?;
        parameters.add(Parameter::choice(OVERLAY_MODE, "Fill", OverlayMode::VARIANTS))?;
        parameters.add(
            Parameter::integer(LINE_WIDTH, 1)
                .with_description("Outline width in pixels (outlines only)."),
        )?;
        parameters.add(
            Parameter::integer(OPACITY, 50)
                .with_description("Fill opacity as a percentage (fill only)."),
        )
    }

    fn update_and_get_parameters(&self) -> Result<Vec<&Parameter>, ParameterError> {
        let mut names = vec![
            INPUT_SEPARATOR,
            INPUT_IMAGE,
            INPUT_OBJECTS,
            OUTPUT_SEPARATOR,
            OUTPUT_IMAGE,
            OUTPUT_OBJECTS,
            OVERLAY_SEPARATOR,
            OVERLAY_MODE,
        ];
        match self.overlay_mode()? {
            Some(OverlayMode::Fill) => names.push(OPACITY),
            Some(OverlayMode::Outlines) => names.push(LINE_WIDTH),
            None => {}
        }
        self.parameters().select(&names)
    }

    fn update_and_get_object_measurement_refs(
        &mut self,
    ) -> Option<RefList<'_, ObjMeasurementRef>> {
        let objects: String = self.parameters().value(OUTPUT_OBJECTS, None).ok()?;
        let reference = self
            .base
            .obj_measurement_refs()
            .get_or_put(INTENSITY.to_owned());
        reference.set_objects_name(objects);
        reference.set_description("Input image intensity at the object centroid.");
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
        let parent: String = self.parameters().value(INPUT_OBJECTS, None).ok()?;
        let child: String = self.parameters().value(OUTPUT_OBJECTS, None).ok()?;
        let reference = self.base.parent_child_refs().get_or_put_pair(&parent, &child);
        Some(vec![&*reference])
    }

    fn update_and_get_partner_refs(&mut self) -> Option<RefList<'_, PartnerRef>> {
        None
    }

    fn process(&mut self, workspace: &mut Workspace) -> Result<Status, ModuleError> {
        let settings = Settings::read(self.parameters(), workspace)?;
        let Some(mode) = settings.mode else {
            error!(target: "mia::example", module = %self.nickname(), "unknown overlay mode");
            return Ok(Status::Fail);
        };
        let Some((image, inputs)) =
            workspace.image_and_objects_mut(&settings.input_image, &settings.input_objects)
        else {
            error!(
                target: "mia::example",
                module = %self.nickname(),
                image = %settings.input_image,
                objects = %settings.input_objects,
                "input image or objects not found in workspace"
            );
            return Ok(Status::Fail);
        };

        let Some((mut outputs, pairs)) =
            self.centroids(image, inputs, &settings.output_objects)?
        else {
            info!(target: "mia::example", module = %self.nickname(), "cancelled");
            return Ok(Status::Terminate);
        };
        for (parent_id, child_id) in pairs {
            if !Objs::link(inputs, parent_id, &mut outputs, child_id) {
                warn!(target: "mia::example", parent_id, child_id, "could not link centroid");
            }
        }
        for output in outputs.values_mut() {
            let intensity = measure_intensity(output, image).mean();
            output.add_measurement(Measurement::new(INTENSITY, intensity));
        }

        let input_opacity = match mode {
            OverlayMode::Fill => settings.opacity,
            OverlayMode::Outlines => OPAQUE,
        };
        let input_colours = colours(&id_hues(inputs, true), input_opacity);
        let output_colours = colours(&parent_id_hues(&outputs, inputs, true), OPAQUE);
        let mut rendered = image.duplicate(&settings.output_image);
        match mode {
            OverlayMode::Fill => add_object_fill(&mut rendered, inputs, &input_colours),
            OverlayMode::Outlines => {
                add_object_outline(&mut rendered, inputs, &input_colours, settings.line_width);
            }
        }
        add_object_centroid(
            &mut rendered,
            &outputs,
            &output_colours,
            PointSize::Medium,
            PointType::Dot,
        );

        if self.show_output() {
            for row in outputs.measurement_table() {
                info!(
                    target: "mia::example",
                    objects = %outputs.name(),
                    object_id = row.id,
                    t = row.t,
                    values = ?row.values,
                    "measurement"
                );
            }
        }
        if workspace.add_image(rendered).is_some() {
            debug!(target: "mia::example", image = %settings.output_image, "replaced existing image");
        }
        if workspace.add_objects(outputs).is_some() {
            debug!(target: "mia::example", objects = %settings.output_objects, "replaced existing objects");
        }
        Ok(Status::Pass)
    }
}

impl ExampleModule {
    /// Builds one centroid object per input object, returning the new
    /// collection and the `(parent, child)` ID pairs still to be linked.
    ///
    /// Returns `Ok(None)` if the run was cancelled part way.
    fn centroids(
        &self,
        image: &Image,
        inputs: &Objs,
        name: &str,
    ) -> Result<Option<(Objs, Vec<(u32, u32)>)>, ObjectError> {
        // Bounded by the image rather than the input collection: a centroid
        // the image cannot hold can be neither measured nor drawn.
        let mut outputs = Objs::with_image(name, image);
        let mut pairs = Vec::with_capacity(inputs.len());
        for input in inputs.values() {
            if self.is_cancelled() {
                return Ok(None);
            }
            let output = outputs.create_and_add_new_object(VolumeType::PointList)?;
            output.set_t(input.t());
            pairs.push((input.id(), output.id()));
            match input.mean_centroid() {
                Some(centroid) => {
                    let (x, y, z) = centroid.rounded();
                    if let Err(err) = output.add(x, y, z) {
                        error!(
                            target: "mia::example",
                            module = %self.nickname(),
                            object_id = input.id(),
                            error = %err,
                            "centroid outside output bounds"
                        );
                    }
                }
                None => warn!(
                    target: "mia::example",
                    module = %self.nickname(),
                    object_id = input.id(),
                    "object has no coordinates"
                ),
            }
        }
        Ok(Some((outputs, pairs)))
    }
}
