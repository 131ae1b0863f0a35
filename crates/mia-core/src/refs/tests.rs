//! Unit tests for reference stores.

use rstest::rstest;

use super::*;

#[test]
fn get_or_put_returns_the_same_instance() {
    let mut refs = ObjMeasurementRefs::new();
    let first: *const ObjMeasurementRef = refs.get_or_put("Intensity".into());
    for name in ["Area", "Volume", "Mean", "Max", "Min", "Sum", "Std"] {
        refs.get_or_put(name.into());
    }
    let second: *const ObjMeasurementRef = refs.get_or_put("Intensity".into());
    assert!(std::ptr::eq(first, second), "growing the store must not move references");
    assert_eq!(refs.len(), 8);
}

#[test]
fn mutable_fields_persist_between_lookups() {
    let mut refs = ObjMeasurementRefs::new();
    refs.get_or_put("Intensity".into())
        .set_objects_name("Centroids");
    let reference = refs.get(&"Intensity".into()).expect("stored");
    assert_eq!(reference.name(), "Intensity");
    assert_eq!(reference.objects_name(), "Centroids");
}

#[test]
fn parent_child_pairs_are_ordered() {
    let mut refs = ParentChildRefs::new();
    refs.get_or_put_pair("Nuclei", "Centroids");
    refs.get_or_put_pair("Centroids", "Nuclei");
    assert_eq!(refs.len(), 2);
    let reference = refs
        .get(&("Nuclei".into(), "Centroids".into()))
        .expect("stored");
    assert_eq!(reference.parent_name(), "Nuclei");
    assert_eq!(reference.child_name(), "Centroids");
}

#[rstest]
#[case::forward("Cells", "Nuclei")]
#[case::reverse("Nuclei", "Cells")]
fn partner_pairs_are_unordered(#[case] a: &str, #[case] b: &str) {
    let mut refs = PartnerRefs::new();
    refs.get_or_put_pair("Cells", "Nuclei");
    let stored: *const PartnerRef = refs.get_or_put_pair(a, b);
    assert_eq!(refs.len(), 1);
    let reference = refs.iter().next().expect("one reference");
    assert!(std::ptr::eq(stored, reference));
    assert_eq!(reference.partner1(), "Cells");
    assert_eq!(reference.partner_of("Cells"), Some("Nuclei"));
    assert_eq!(reference.partner_of("Spots"), None);
}

#[test]
fn image_and_metadata_refs_keep_descriptions() {
    let mut images = ImageMeasurementRefs::new();
    let reference = images.get_or_put("Mean".into());
    reference.set_image_name("Raw");
    reference.set_description("Mean intensity");
    let mut metadata = MetadataRefs::new();
    metadata
        .get_or_put("Series".into())
        .set_description("Series number");

    let image_ref = images.get(&"Mean".into()).expect("stored");
    assert_eq!(image_ref.image_name(), "Raw");
    assert_eq!(image_ref.description(), "Mean intensity");
    assert_eq!(
        metadata.iter().map(MetadataRef::description).collect::<Vec<_>>(),
        vec!["Series number"]
    );
}
