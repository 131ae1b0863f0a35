//! Per-object colour assignment.
//!
//! Hues are fractions of a full turn in `[0, 1)`. Assignment is
//! deterministic: randomised hues step through the golden-ratio sequence by
//! ID, so neighbouring IDs get well-separated colours and the same ID always
//! gets the same hue.

use std::collections::BTreeMap;

use image::Rgba;

use crate::image::overlay::Colour;
use crate::object::Objs;

/// Hue per object ID.
pub type Hues = BTreeMap<u32, f64>;

/// Colour per object ID.
pub type Colours = BTreeMap<u32, Colour>;

/// Fully opaque, in percent.
pub const OPAQUE: i64 = 100;

const GOLDEN_RATIO_CONJUGATE: f64 = 0.618_033_988_749_895;

fn hue_for(id: u32, max_id: u32, randomise: bool) -> f64 {
    if randomise {
        (f64::from(id) * GOLDEN_RATIO_CONJUGATE).fract()
    } else {
        f64::from(id) / (f64::from(max_id) + 1.0)
    }
}

/// Assigns a hue to every object from its own ID.
#[must_use]
pub fn id_hues(objs: &Objs, randomise: bool) -> Hues {
    let max_id = objs.max_id().unwrap_or(0);
    objs.ids()
        .into_iter()
        .map(|id| (id, hue_for(id, max_id, randomise)))
        .collect()
}

/// Assigns each object the hue its parent gets from [`id_hues`], so
/// children match their parents when both use the same `randomise` flag.
///
/// Ordered hues are scaled by the largest ID in `parents`, not by the
/// largest parent that happens to have a child. Objects without a parent in
/// that collection get no hue.
#[must_use]
pub fn parent_id_hues(objs: &Objs, parents: &Objs, randomise: bool) -> Hues {
    let max_id = parents.max_id().unwrap_or(0);
    objs.values()
        .filter_map(|obj| {
            obj.parent(parents.name())
                .map(|parent| (obj.id(), hue_for(parent, max_id, randomise)))
        })
        .collect()
}

/// Converts hues to fully saturated, full-brightness colours with the given
/// opacity percentage (clamped to 0..=100).
#[must_use]
pub fn colours(hues: &Hues, opacity: i64) -> Colours {
    let alpha = alpha_from_percent(opacity);
    hues.iter()
        .map(|(&id, &hue)| (id, hue_to_colour(hue, alpha)))
        .collect()
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "the value is rounded and lies in 0..=255"
)]
fn unit_to_byte(value: f64) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn alpha_from_percent(opacity: i64) -> u8 {
    let percent = u8::try_from(opacity.clamp(0, OPAQUE)).unwrap_or(u8::MAX);
    unit_to_byte(f64::from(percent) / 100.0)
}

/// Converts a hue at full saturation and brightness to RGBA.
#[must_use]
pub fn hue_to_colour(hue: f64, alpha: u8) -> Colour {
    let sector = hue.rem_euclid(1.0) * 6.0;
    let rising = sector.fract();
    let falling = 1.0 - rising;
    let (r, g, b) = if sector < 1.0 {
        (1.0, rising, 0.0)
    } else if sector < 2.0 {
        (falling, 1.0, 0.0)
    } else if sector < 3.0 {
        (0.0, 1.0, rising)
    } else if sector < 4.0 {
        (0.0, falling, 1.0)
    } else if sector < 5.0 {
        (rising, 0.0, 1.0)
    } else {
        (1.0, 0.0, falling)
    };
    Rgba([unit_to_byte(r), unit_to_byte(g), unit_to_byte(b), alpha])
}
