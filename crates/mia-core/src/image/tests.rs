//! Unit tests for images and overlays.

use rstest::{fixture, rstest};

use super::*;

#[fixture]
fn gradient() -> Image {
    let dims = Dimensions::planar(4, 3).with_slices(2).with_frames(2);
    Image::from_fn("gradient", dims, Calibration::default(), |x, y, z, _, t| {
        (x + 10 * y + 100 * z + 1000 * t) as f32
    })
}

#[rstest]
#[case::origin(0, 0, 0, 0, 0.0)]
#[case::row(3, 2, 0, 0, 23.0)]
#[case::slice(1, 1, 1, 0, 111.0)]
#[case::frame(2, 0, 1, 1, 1102.0)]
fn value_at_reads_voxel(
    gradient: Image,
    #[case] x: u32,
    #[case] y: u32,
    #[case] z: u32,
    #[case] t: u32,
    #[case] expected: f32,
) {
    assert_eq!(gradient.value_at(x, y, z, 0, t), Some(expected));
}

#[rstest]
#[case::x(4, 0, 0, 0)]
#[case::y(0, 3, 0, 0)]
#[case::z(0, 0, 2, 0)]
#[case::t(0, 0, 0, 2)]
fn value_at_outside_is_none(
    gradient: Image,
    #[case] x: u32,
    #[case] y: u32,
    #[case] z: u32,
    #[case] t: u32,
) {
    assert_eq!(gradient.value_at(x, y, z, 0, t), None);
}

#[rstest]
fn duplicate_is_independent(gradient: Image) {
    let mut source = gradient;
    source.add_measurement(Measurement::new("Mean", 5.0));
    let mut copy = source.duplicate("copy");

    assert_eq!(copy.name(), "copy");
    assert_eq!(copy.calibration(), source.calibration());
    assert!(copy.measurement("Mean").is_none());

    assert!(copy.set_value(0, 0, 0, 0, 0, 42.0));
    assert_eq!(copy.value_at(0, 0, 0, 0, 0), Some(42.0));
    assert_eq!(source.value_at(0, 0, 0, 0, 0), Some(0.0));
}

#[rstest]
fn duplicate_keeps_overlay(gradient: Image) {
    let mut source = gradient;
    source.overlay_mut().push(OverlayElement {
        object_id: Some(1),
        z: 0,
        t: 0,
        colour: image::Rgba([255, 0, 0, 255]),
        shape: OverlayShape::Fill {
            pixels: vec![(1, 1)],
        },
    });
    let copy = source.duplicate("copy");
    assert_eq!(copy.overlay().len(), 1);
    assert_eq!(copy.overlay().for_object(1).count(), 1);
}

#[test]
fn measurement_with_same_name_replaces() {
    let mut image = Image::new("blank", Dimensions::planar(2, 2), Calibration::default());
    image.add_measurement(Measurement::new("Mean", 1.0));
    image.add_measurement(Measurement::new("Mean", 2.0));
    assert_eq!(image.measurements().len(), 1);
    assert_eq!(image.measurement("Mean").map(Measurement::value), Some(2.0));
}

#[rstest]
#[case::tiny(PointSize::Tiny, 1)]
#[case::medium(PointSize::Medium, 6)]
#[case::large(PointSize::Large, 12)]
fn point_size_pixels(#[case] size: PointSize, #[case] expected: u32) {
    assert_eq!(size.pixels(), expected);
}
