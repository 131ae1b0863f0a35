//! Vector overlays drawn over an image.
//!
//! Overlays never touch pixel data. Each [`OverlayElement`] sits on one
//! slice and frame and carries its own colour, so fills, outlines and
//! centroid markers from different modules can be layered on the same image.

use image::Rgba;

/// RGBA colour of an overlay element; alpha encodes opacity.
pub type Colour = Rgba<u8>;

/// Marker size for centroid overlays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointSize {
    /// One pixel.
    Tiny,
    /// Three pixels.
    Small,
    /// Six pixels.
    #[default]
    Medium,
    /// Twelve pixels.
    Large,
}

impl PointSize {
    /// Returns the marker diameter in pixels.
    #[must_use]
    pub const fn pixels(self) -> u32 {
        match self {
            Self::Tiny => 1,
            Self::Small => 3,
            Self::Medium => 6,
            Self::Large => 12,
        }
    }
}

/// Marker glyph for centroid overlays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointType {
    /// Hollow circle.
    Circle,
    /// Cross hair.
    Cross,
    /// Filled dot.
    #[default]
    Dot,
}

/// Geometry of an overlay element in pixel coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayShape {
    /// Filled region covering the listed pixels.
    Fill {
        /// Covered `(x, y)` pixels.
        pixels: Vec<(u32, u32)>,
    },
    /// Region boundary traced through the listed pixels.
    Outline {
        /// Boundary `(x, y)` pixels.
        pixels: Vec<(u32, u32)>,
        /// Stroke width in pixels.
        line_width: u32,
    },
    /// Point marker at sub-pixel precision.
    Marker {
        /// Marker X position.
        x: f64,
        /// Marker Y position.
        y: f64,
        /// Marker size.
        size: PointSize,
        /// Marker glyph.
        kind: PointType,
    },
}

/// One coloured shape on a single slice and frame.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayElement {
    /// ID of the object the element was drawn for, if any.
    pub object_id: Option<u32>,
    /// Slice index.
    pub z: u32,
    /// Frame index.
    pub t: u32,
    /// Element colour.
    pub colour: Colour,
    /// Element geometry.
    pub shape: OverlayShape,
}

/// Ordered list of overlay elements.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Overlay {
    elements: Vec<OverlayElement>,
}

impl Overlay {
    /// Appends an element on top of the existing ones.
    pub fn push(&mut self, element: OverlayElement) {
        self.elements.push(element);
    }

    /// Returns all elements in draw order.
    #[must_use]
    pub fn elements(&self) -> &[OverlayElement] {
        &self.elements
    }

    /// Returns the elements drawn for one object.
    pub fn for_object(&self, id: u32) -> impl Iterator<Item = &OverlayElement> {
        self.elements
            .iter()
            .filter(move |element| element.object_id == Some(id))
    }

    /// Returns the number of elements.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` when nothing has been drawn.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
