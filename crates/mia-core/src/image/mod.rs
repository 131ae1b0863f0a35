//! Workspace images.
//!
//! An [`Image`] is a five-dimensional stack (x, y, slice, channel, frame) of
//! `f32` intensities held as one [`image::ImageBuffer`] plane per
//! (channel, slice, frame). Images also carry physical calibration, a
//! measurement map, and a vector [`Overlay`].

pub mod overlay;

use std::collections::BTreeMap;

use image::{ImageBuffer, Luma};

use crate::measurement::Measurement;

pub use self::overlay::{Colour, Overlay, OverlayElement, OverlayShape, PointSize, PointType};

/// A single greyscale plane.
pub type Plane = ImageBuffer<Luma<f32>, Vec<f32>>;

/// Extent of an image or object collection in pixels, slices, channels and
/// frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Number of Z slices.
    pub slices: u32,
    /// Number of channels.
    pub channels: u32,
    /// Number of frames.
    pub frames: u32,
}

impl Dimensions {
    /// A single-slice, single-channel, single-frame extent.
    #[must_use]
    pub const fn planar(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            slices: 1,
            channels: 1,
            frames: 1,
        }
    }

    /// Returns a copy with the given slice count.
    #[must_use]
    pub const fn with_slices(mut self, slices: u32) -> Self {
        self.slices = slices;
        self
    }

    /// Returns a copy with the given frame count.
    #[must_use]
    pub const fn with_frames(mut self, frames: u32) -> Self {
        self.frames = frames;
        self
    }

    /// Returns a copy with the given channel count.
    #[must_use]
    pub const fn with_channels(mut self, channels: u32) -> Self {
        self.channels = channels;
        self
    }

    fn plane_count(self) -> usize {
        let count = u64::from(self.slices) * u64::from(self.channels) * u64::from(self.frames);
        usize::try_from(count).unwrap_or(usize::MAX)
    }

    fn plane_index(self, z: u32, c: u32, t: u32) -> Option<usize> {
        if z >= self.slices || c >= self.channels || t >= self.frames {
            return None;
        }
        let index = (u64::from(t) * u64::from(self.slices) + u64::from(z))
            * u64::from(self.channels)
            + u64::from(c);
        usize::try_from(index).ok()
    }
}

/// Physical calibration shared by an image and the objects detected in it.
#[derive(Debug, Clone, PartialEq)]
pub struct Calibration {
    /// Pixel size in X and Y, in `units`.
    pub xy_size: f64,
    /// Slice spacing in Z, in `units`.
    pub z_size: f64,
    /// Spatial units name.
    pub units: String,
    /// Time between frames in seconds.
    pub frame_interval: f64,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            xy_size: 1.0,
            z_size: 1.0,
            units: String::from("px"),
            frame_interval: 1.0,
        }
    }
}

/// A named image held in the workspace.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    name: String,
    dimensions: Dimensions,
    planes: Vec<Plane>,
    calibration: Calibration,
    measurements: BTreeMap<String, Measurement>,
    overlay: Overlay,
}

impl Image {
    /// Creates a zero-filled image.
    #[must_use]
    pub fn new(name: impl Into<String>, dimensions: Dimensions, calibration: Calibration) -> Self {
        let planes = (0..dimensions.plane_count())
            .map(|_| Plane::new(dimensions.width, dimensions.height))
            .collect();
        Self {
            name: name.into(),
            dimensions,
            planes,
            calibration,
            measurements: BTreeMap::new(),
            overlay: Overlay::default(),
        }
    }

    /// Creates an image whose voxels are produced by `f(x, y, z, c, t)`.
    #[must_use]
    pub fn from_fn<F>(
        name: impl Into<String>,
        dimensions: Dimensions,
        calibration: Calibration,
        mut f: F,
    ) -> Self
    where
        F: FnMut(u32, u32, u32, u32, u32) -> f32,
    {
        let mut image = Self::new(name, dimensions, calibration);
        for t in 0..dimensions.frames {
            for z in 0..dimensions.slices {
                for c in 0..dimensions.channels {
                    if let Some(plane) = image.plane_mut(z, c, t) {
                        for (x, y, pixel) in plane.enumerate_pixels_mut() {
                            *pixel = Luma([f(x, y, z, c, t)]);
                        }
                    }
                }
            }
        }
        image
    }

    /// Returns the image name.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the image extent.
    #[must_use]
    pub const fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// Returns the physical calibration.
    #[must_use]
    pub const fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// Returns one plane, or `None` outside the stack.
    #[must_use]
    pub fn plane(&self, z: u32, c: u32, t: u32) -> Option<&Plane> {
        self.dimensions
            .plane_index(z, c, t)
            .and_then(|index| self.planes.get(index))
    }

    /// Returns one plane for writing, or `None` outside the stack.
    pub fn plane_mut(&mut self, z: u32, c: u32, t: u32) -> Option<&mut Plane> {
        self.dimensions
            .plane_index(z, c, t)
            .and_then(|index| self.planes.get_mut(index))
    }

    /// Reads one voxel, or `None` outside the image.
    #[must_use]
    pub fn value_at(&self, x: u32, y: u32, z: u32, c: u32, t: u32) -> Option<f32> {
        if x >= self.dimensions.width || y >= self.dimensions.height {
            return None;
        }
        self.plane(z, c, t).map(|plane| plane.get_pixel(x, y).0[0])
    }

    /// Writes one voxel. Returns `false` if the position is outside the
    /// image.
    pub fn set_value(&mut self, x: u32, y: u32, z: u32, c: u32, t: u32, value: f32) -> bool {
        if x >= self.dimensions.width || y >= self.dimensions.height {
            return false;
        }
        let Some(plane) = self.plane_mut(z, c, t) else {
            return false;
        };
        plane.put_pixel(x, y, Luma([value]));
        true
    }

    /// Returns an independent copy under a new name.
    ///
    /// Pixels, calibration and overlay are copied; measurements are not, as
    /// they describe the source image.
    #[must_use]
    pub fn duplicate(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dimensions: self.dimensions,
            planes: self.planes.clone(),
            calibration: self.calibration.clone(),
            measurements: BTreeMap::new(),
            overlay: self.overlay.clone(),
        }
    }

    /// Attaches a measurement, replacing any with the same name.
    pub fn add_measurement(&mut self, measurement: Measurement) {
        self.measurements
            .insert(measurement.name().to_owned(), measurement);
    }

    /// Looks up a measurement by name.
    #[must_use]
    pub fn measurement(&self, name: &str) -> Option<&Measurement> {
        self.measurements.get(name)
    }

    /// Returns all measurements keyed by name.
    #[must_use]
    pub const fn measurements(&self) -> &BTreeMap<String, Measurement> {
        &self.measurements
    }

    /// Returns the overlay.
    #[must_use]
    pub const fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    /// Returns the overlay for drawing.
    pub const fn overlay_mut(&mut self) -> &mut Overlay {
        &mut self.overlay
    }
}

#[cfg(test)]
mod tests;
