//! Overlay drawing for object collections.
//!
//! Each function appends elements to the image's [`Overlay`]; pixel data is
//! never changed. Objects without an entry in `colours` are skipped.
//!
//! [`Overlay`]: crate::image::overlay::Overlay

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::image::Image;
use crate::image::overlay::{OverlayElement, OverlayShape, PointSize, PointType};
use crate::object::{Obj, Objs};

use super::colour::Colours;

fn pixels_by_slice(obj: &Obj) -> BTreeMap<u32, Vec<(u32, u32)>> {
    let mut slices: BTreeMap<u32, Vec<(u32, u32)>> = BTreeMap::new();
    for p in obj.points() {
        slices.entry(p.z).or_default().push((p.x, p.y));
    }
    slices
}

fn boundary(pixels: &[(u32, u32)]) -> Vec<(u32, u32)> {
    let set: BTreeSet<(u32, u32)> = pixels.iter().copied().collect();
    let present = |x: Option<u32>, y: Option<u32>| match (x, y) {
        (Some(nx), Some(ny)) => set.contains(&(nx, ny)),
        _ => false,
    };
    pixels
        .iter()
        .copied()
        .filter(|&(x, y)| {
            !(present(x.checked_sub(1), Some(y))
                && present(x.checked_add(1), Some(y))
                && present(Some(x), y.checked_sub(1))
                && present(Some(x), y.checked_add(1)))
        })
        .collect()
}

/// Draws every object as a filled region, one element per slice.
pub fn add_object_fill(image: &mut Image, objs: &Objs, colours: &Colours) {
    for obj in objs.values() {
        let Some(&colour) = colours.get(&obj.id()) else {
            debug!(target: "mia::overlay", object_id = obj.id(), "no colour; skipping fill");
            continue;
        };
        for (z, pixels) in pixels_by_slice(obj) {
            image.overlay_mut().push(OverlayElement {
                object_id: Some(obj.id()),
                z,
                t: obj.t(),
                colour,
                shape: OverlayShape::Fill { pixels },
            });
        }
    }
}

/// Draws the 4-connected boundary of every object, one element per slice.
pub fn add_object_outline(image: &mut Image, objs: &Objs, colours: &Colours, line_width: u32) {
    for obj in objs.values() {
        let Some(&colour) = colours.get(&obj.id()) else {
            debug!(target: "mia::overlay", object_id = obj.id(), "no colour; skipping outline");
            continue;
        };
        for (z, pixels) in pixels_by_slice(obj) {
            image.overlay_mut().push(OverlayElement {
                object_id: Some(obj.id()),
                z,
                t: obj.t(),
                colour,
                shape: OverlayShape::Outline {
                    pixels: boundary(&pixels),
                    line_width,
                },
            });
        }
    }
}

/// Marks the mean centroid of every non-empty object.
pub fn add_object_centroid(
    image: &mut Image,
    objs: &Objs,
    colours: &Colours,
    size: PointSize,
    kind: PointType,
) {
    for obj in objs.values() {
        let (Some(&colour), Some(centroid)) = (colours.get(&obj.id()), obj.mean_centroid()) else {
            debug!(target: "mia::overlay", object_id = obj.id(), "no colour or centroid; skipping marker");
            continue;
        };
        let (_, _, z) = centroid.rounded();
        image.overlay_mut().push(OverlayElement {
            object_id: Some(obj.id()),
            z: u32::try_from(z).unwrap_or(0),
            t: obj.t(),
            colour,
            shape: OverlayShape::Marker {
                x: centroid.x,
                y: centroid.y,
                size,
                kind,
            },
        });
    }
}
