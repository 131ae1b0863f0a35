//! Unit tests for the host operations.

use rstest::{fixture, rstest};

use super::colour::{self, Hues, OPAQUE};
use super::measure::{CumStat, measure_intensity};
use super::overlay::{add_object_centroid, add_object_fill, add_object_outline};
use crate::image::overlay::{OverlayShape, PointSize, PointType};
use crate::image::{Calibration, Dimensions, Image};
use crate::object::{Objs, VolumeType};

fn ramp() -> Image {
    Image::from_fn(
        "Ramp",
        Dimensions::planar(10, 10),
        Calibration::default(),
        |x, y, _, _, _| f32::from(u16::try_from(x + 10 * y).expect("small")),
    )
}

/// One 3x3 square at (4..=6, 4..=6) and one single-pixel object at (0, 0).
#[fixture]
fn squares() -> Objs {
    let image = ramp();
    let mut objs = Objs::with_image("Nuclei", &image);
    let square = objs.create_and_add_new_object(VolumeType::QuadTree).expect("fresh id");
    for y in 4..=6 {
        for x in 4..=6 {
            square.add(x, y, 0).expect("in bounds");
        }
    }
    objs.create_and_add_new_object(VolumeType::PointList)
        .expect("fresh id")
        .add(0, 0, 0)
        .expect("in bounds");
    objs
}

// ---------------------------------------------------------------------------
// Measurement
// ---------------------------------------------------------------------------

#[test]
fn cumstat_summarises_values() {
    let mut stat = CumStat::new();
    stat.extend([1.0, 2.0, 3.0, 4.0]);
    assert_eq!(stat.count(), 4);
    assert!((stat.mean() - 2.5).abs() < 1e-12);
    assert!((stat.min() - 1.0).abs() < 1e-12);
    assert!((stat.max() - 4.0).abs() < 1e-12);
    assert!((stat.sum() - 10.0).abs() < 1e-12);
    assert!((stat.std() - 1.25_f64.sqrt()).abs() < 1e-12);
}

#[test]
fn empty_cumstat_is_nan() {
    let stat = CumStat::new();
    assert!(stat.mean().is_nan());
    assert!(stat.std().is_nan());
    assert!(stat.min().is_nan());
}

#[rstest]
fn intensity_is_measured_over_object_coordinates(squares: Objs) {
    let image = ramp();
    let square = squares.get(1).expect("square");
    let stat = measure_intensity(square, &image);
    assert_eq!(stat.count(), 9);
    assert!((stat.mean() - 55.0).abs() < 1e-9);
    assert!((stat.min() - 44.0).abs() < 1e-9);
    assert!((stat.max() - 66.0).abs() < 1e-9);
}

#[rstest]
fn intensity_ignores_frames_the_image_lacks(mut squares: Objs) {
    let image = ramp();
    let pixel = squares.get_mut(2).expect("pixel");
    pixel.set_t(3);
    assert_eq!(measure_intensity(pixel, &image).count(), 0);
}

// ---------------------------------------------------------------------------
// Colour
// ---------------------------------------------------------------------------

#[rstest]
fn randomised_hues_are_reproducible(squares: Objs) {
    let first = colour::id_hues(&squares, true);
    let second = colour::id_hues(&squares, true);
    assert_eq!(first, second);
    let hue = first.get(&1).copied().expect("hue");
    assert!((hue - 0.618_033_988_749_895).abs() < 1e-12);
    assert_ne!(first.get(&1), first.get(&2));
}

#[rstest]
fn ordered_hues_spread_over_the_unit_interval(squares: Objs) {
    let hues = colour::id_hues(&squares, false);
    let values: Vec<f64> = hues.values().copied().collect();
    assert_eq!(values.len(), 2);
    assert!(values.iter().all(|h| (0.0..1.0).contains(h)));
    assert!(values.windows(2).all(|w| w.first() < w.last()));
}

#[rstest]
#[case::randomised(true)]
#[case::ordered(false)]
fn child_hues_follow_parents(mut squares: Objs, #[case] randomise: bool) {
    let mut centroids = Objs::with_reference("Centroids", &squares);
    for parent_id in squares.ids() {
        let child_id = centroids
            .create_and_add_new_object(VolumeType::PointList)
            .expect("fresh id")
            .id();
        assert!(Objs::link(&mut squares, parent_id, &mut centroids, child_id));
    }
    let parent_hues = colour::id_hues(&squares, randomise);
    let child_hues = colour::parent_id_hues(&centroids, &squares, randomise);
    assert_eq!(parent_hues, child_hues);
    let cells = Objs::with_reference("Cells", &squares);
    assert!(colour::parent_id_hues(&centroids, &cells, randomise).is_empty());
}

#[rstest]
#[case::randomised(true)]
#[case::ordered(false)]
fn child_hues_match_when_the_last_parent_is_childless(
    mut squares: Objs,
    #[case] randomise: bool,
) {
    squares
        .create_and_add_new_object(VolumeType::PointList)
        .expect("fresh id");
    let mut centroids = Objs::with_reference("Centroids", &squares);
    for parent_id in [1, 2] {
        let child_id = centroids
            .create_and_add_new_object(VolumeType::PointList)
            .expect("fresh id")
            .id();
        assert!(Objs::link(&mut squares, parent_id, &mut centroids, child_id));
    }
    let parent_hues = colour::id_hues(&squares, randomise);
    let child_hues = colour::parent_id_hues(&centroids, &squares, randomise);
    assert_eq!(child_hues.len(), 2);
    for (child_id, parent_id) in [(1, 1), (2, 2)] {
        assert_eq!(child_hues.get(&child_id), parent_hues.get(&parent_id));
    }
}

#[rstest]
#[case::red(0.0, [255, 0, 0])]
#[case::cyan(0.5, [0, 255, 255])]
#[case::wraps(1.0, [255, 0, 0])]
fn hues_convert_to_saturated_colours(#[case] hue: f64, #[case] rgb: [u8; 3]) {
    let [r, g, b] = rgb;
    assert_eq!(colour::hue_to_colour(hue, 255).0, [r, g, b, 255]);
}

#[rstest]
#[case::half(50, 128)]
#[case::opaque(OPAQUE, 255)]
#[case::clamped_high(150, 255)]
#[case::clamped_low(-5, 0)]
fn opacity_sets_alpha(#[case] opacity: i64, #[case] alpha: u8) {
    let mut hues = Hues::new();
    hues.insert(1, 0.0);
    let colours = colour::colours(&hues, opacity);
    assert_eq!(colours.get(&1).map(|c| c.0[3]), Some(alpha));
}

// ---------------------------------------------------------------------------
// Overlay
// ---------------------------------------------------------------------------

#[rstest]
fn fill_covers_every_pixel(squares: Objs) {
    let mut image = ramp();
    let colours = colour::colours(&colour::id_hues(&squares, true), 50);
    add_object_fill(&mut image, &squares, &colours);
    assert_eq!(image.overlay().len(), 2);
    let element = image.overlay().for_object(1).next().expect("drawn");
    assert!(matches!(&element.shape, OverlayShape::Fill { pixels } if pixels.len() == 9));
    assert_eq!(Some(&element.colour), colours.get(&1));
}

#[rstest]
fn outline_excludes_interior_pixels(squares: Objs) {
    let mut image = ramp();
    let colours = colour::colours(&colour::id_hues(&squares, true), OPAQUE);
    add_object_outline(&mut image, &squares, &colours, 2);
    let element = image.overlay().for_object(1).next().expect("drawn");
    let OverlayShape::Outline { pixels, line_width } = &element.shape else {
        panic!("expected an outline, got {:?}", element.shape);
    };
    assert_eq!(*line_width, 2);
    assert_eq!(pixels.len(), 8);
    assert!(!pixels.contains(&(5, 5)));
}

#[rstest]
fn centroid_markers_sit_at_the_mean(squares: Objs) {
    let mut image = ramp();
    let mut hues = Hues::new();
    hues.insert(1, 0.25);
    let colours = colour::colours(&hues, OPAQUE);
    add_object_centroid(&mut image, &squares, &colours, PointSize::Medium, PointType::Dot);
    assert_eq!(image.overlay().len(), 1, "object 2 has no colour");
    let element = image.overlay().for_object(1).next().expect("drawn");
    assert_eq!(
        element.shape,
        OverlayShape::Marker {
            x: 5.0,
            y: 5.0,
            size: PointSize::Medium,
            kind: PointType::Dot,
        }
    );
}
