//! Unit tests for objects and collections.

use rstest::{fixture, rstest};

use super::*;

fn bounds(width: u32, height: u32, slices: u32) -> SpatialBounds {
    SpatialBounds::new(
        Dimensions::planar(width, height).with_slices(slices),
        Calibration::default(),
    )
}

#[fixture]
fn nuclei() -> Objs {
    Objs::new("Nuclei", bounds(10, 10, 1))
}

#[rstest]
fn ids_are_allocated_sequentially(mut nuclei: Objs) {
    let first = nuclei.create_and_add_new_object(VolumeType::QuadTree)
        .expect("fresh id")
        .id();
    let second = nuclei.create_and_add_new_object(VolumeType::PointList)
        .expect("fresh id")
        .id();
    assert_eq!((first, second), (1, 2));
    assert_eq!(nuclei.ids(), vec![1, 2]);
    assert_eq!(nuclei.max_id(), Some(2));
    let obj = nuclei.get(1).expect("object 1");
    assert_eq!(obj.collection_name(), "Nuclei");
    assert_eq!(obj.volume_type(), VolumeType::QuadTree);
}

#[rstest]
#[case::negative_x(-1, 0, 0)]
#[case::past_width(10, 0, 0)]
#[case::past_height(0, 10, 0)]
#[case::past_depth(0, 0, 1)]
fn add_rejects_out_of_bounds(mut nuclei: Objs, #[case] x: i64, #[case] y: i64, #[case] z: i64) {
    let obj = nuclei.create_and_add_new_object(VolumeType::PointList).expect("fresh id");
    let error = obj.add(x, y, z).expect_err("point is outside bounds");
    assert_eq!((error.x, error.y, error.z), (x, y, z));
    assert!(obj.is_empty(), "failed adds leave the object unchanged");
}

#[rstest]
fn added_points_stay_within_bounds(mut nuclei: Objs) {
    let bounds = nuclei.bounds().clone();
    let obj = nuclei.create_and_add_new_object(VolumeType::QuadTree).expect("fresh id");
    let added = [(0, 0), (9, 9), (10, 3), (4, -2), (5, 5)]
        .into_iter()
        .filter(|&(x, y)| obj.add(x, y, 0).is_ok())
        .count();
    assert_eq!(added, 3);
    assert_eq!(obj.size(), 3);
    assert!(obj.points().iter().all(|p| bounds.contains(
        i64::from(p.x),
        i64::from(p.y),
        i64::from(p.z)
    )));
}

#[rstest]
fn mean_centroid_of_square(mut nuclei: Objs) {
    let obj = nuclei.create_and_add_new_object(VolumeType::QuadTree).expect("fresh id");
    for y in 4..=6 {
        for x in 4..=6 {
            obj.add(x, y, 0).expect("inside bounds");
        }
    }
    let centroid = obj.mean_centroid().expect("non-empty object");
    assert_eq!(centroid.rounded(), (5, 5, 0));
    assert!((centroid.x - 5.0).abs() < f64::EPSILON);
}

#[rstest]
fn mean_centroid_of_empty_object_is_none(mut nuclei: Objs) {
    let obj = nuclei.create_and_add_new_object(VolumeType::PointList).expect("fresh id");
    assert!(obj.mean_centroid().is_none());
}

#[rstest]
fn link_sets_both_sides(mut nuclei: Objs) {
    nuclei.create_and_add_new_object(VolumeType::PointList).expect("fresh id");
    let mut spots = Objs::with_reference("Spots", &nuclei);
    spots.create_and_add_new_object(VolumeType::PointList).expect("fresh id");
    spots.create_and_add_new_object(VolumeType::PointList).expect("fresh id");

    assert!(Objs::link(&mut nuclei, 1, &mut spots, 1));
    assert!(Objs::link(&mut nuclei, 1, &mut spots, 2));
    assert!(!Objs::link(&mut nuclei, 7, &mut spots, 1));

    let parent = nuclei.get(1).expect("parent");
    assert_eq!(parent.children("Spots").collect::<Vec<_>>(), vec![1, 2]);
    for id in [1, 2] {
        let child = spots.get(id).expect("child");
        assert_eq!(child.parent("Nuclei"), Some(1));
    }
}

#[rstest]
fn one_sided_relationships_are_not_mirrored(mut nuclei: Objs) {
    nuclei.create_and_add_new_object(VolumeType::PointList).expect("fresh id");
    let mut spots = Objs::with_reference("Spots", &nuclei);
    let child = spots.create_and_add_new_object(VolumeType::PointList).expect("fresh id");
    let parent = nuclei.get(1).expect("parent");
    child.add_parent(parent);
    assert_eq!(child.parent("Nuclei"), Some(1));
    assert_eq!(parent.children("Spots").count(), 0);
}

#[rstest]
fn a_child_has_one_parent_per_collection(mut nuclei: Objs) {
    nuclei.create_and_add_new_object(VolumeType::PointList).expect("fresh id");
    nuclei.create_and_add_new_object(VolumeType::PointList).expect("fresh id");
    let mut spots = Objs::with_reference("Spots", &nuclei);
    spots.create_and_add_new_object(VolumeType::PointList).expect("fresh id");
    Objs::link(&mut nuclei, 1, &mut spots, 1);
    Objs::link(&mut nuclei, 2, &mut spots, 1);
    let child = spots.get(1).expect("child");
    assert_eq!(child.parent("Nuclei"), Some(2));
    assert_eq!(child.parents().len(), 1);
}

#[rstest]
fn partners_are_symmetric(mut nuclei: Objs) {
    nuclei.create_and_add_new_object(VolumeType::PointList).expect("fresh id");
    let mut cells = Objs::with_reference("Cells", &nuclei);
    cells.create_and_add_new_object(VolumeType::PointList).expect("fresh id");
    assert!(Objs::link_partners(&mut nuclei, 1, &mut cells, 1));
    let nucleus = nuclei.get(1).expect("nucleus");
    let cell = cells.get(1).expect("cell");
    assert_eq!(nucleus.partners("Cells").collect::<Vec<_>>(), vec![1]);
    assert_eq!(cell.partners("Nuclei").collect::<Vec<_>>(), vec![1]);
}

#[rstest]
fn ids_run_out_after_the_largest_is_used(mut nuclei: Objs) {
    nuclei.next_id = Some(u32::MAX);
    let last = nuclei
        .create_and_add_new_object(VolumeType::PointList)
        .expect("last id")
        .id();
    assert_eq!(last, u32::MAX);

    let error = nuclei
        .create_and_add_new_object(VolumeType::PointList)
        .expect_err("no ids left");
    assert_eq!(
        error,
        ObjectError::IdsExhausted {
            collection: "Nuclei".into(),
        }
    );
    assert_eq!(nuclei.len(), 1, "the existing object is not handed out again");
}

#[rstest]
fn measurement_table_lists_each_object(mut nuclei: Objs) {
    let first = nuclei.create_and_add_new_object(VolumeType::PointList).expect("fresh id");
    first.add_measurement(Measurement::new("Intensity", 3.5));
    first.set_t(2);
    nuclei.create_and_add_new_object(VolumeType::PointList).expect("fresh id");

    let table = nuclei.measurement_table();
    assert_eq!(table.len(), 2);
    let row = table.first().expect("first row");
    assert_eq!((row.id, row.t), (1, 2));
    assert_eq!(row.values.get("Intensity"), Some(&3.5));
    assert!(table.get(1).is_some_and(|row| row.values.is_empty()));
}

#[test]
fn collection_from_image_copies_bounds() {
    let image = Image::new(
        "raw",
        Dimensions::planar(8, 6).with_frames(3),
        Calibration::default(),
    );
    let objs = Objs::with_image("Spots", &image);
    assert_eq!(objs.bounds().dimensions(), image.dimensions());
    assert!(objs.bounds().contains(7, 5, 0));
    assert!(!objs.bounds().contains(8, 5, 0));
}
