//! Tests for the per-image label file codec.

use std::path::Path;

use crate::format::error::FormatError;
use crate::format::label_file::{GtBox, ImageMeta, LabelFile, label_path_for};
use crate::model::{AnnotationStore, BoundingBox, LabelKind, StoreError};

fn sample_store() -> AnnotationStore {
    let mut store = AnnotationStore::new();
    store.add_box(
        BoundingBox::normalized(10.0, 20.0, 49.0, 59.0),
        LabelKind::Person,
        "person",
    );
    store.add_box(
        BoundingBox::normalized(100.0, 120.0, 139.0, 149.0),
        LabelKind::Object,
        "cup",
    );
    store.add_link(0, 1, "hold").unwrap();
    store
}

#[test]
fn test_box_uses_inclusive_extents() {
    let label = LabelFile::from_store(&sample_store(), &ImageMeta::new("a.jpg", 640, 480));
    assert_eq!(label.gtboxes[0].bbox, [10, 20, 40, 40]);
    assert_eq!(label.gtboxes[1].bbox, [100, 120, 40, 30]);
    assert_eq!(
        label.gtboxes[0].corners().unwrap(),
        BoundingBox::normalized(10.0, 20.0, 49.0, 59.0)
    );
}

#[test]
fn test_encoding_rounds_to_pixels() {
    let mut store = AnnotationStore::new();
    store.add_box(
        BoundingBox::normalized(10.4, 19.6, 49.5, 59.2),
        LabelKind::Person,
        "person",
    );
    let label = LabelFile::from_store(&store, &ImageMeta::new("a.jpg", 640, 480));
    assert_eq!(label.gtboxes[0].bbox, [10, 20, 41, 40]);
}

#[test]
fn test_json_layout() {
    let label = LabelFile::from_store(&sample_store(), &ImageMeta::new("img_001.jpg", 640, 480));
    let json: serde_json::Value = serde_json::to_value(&label).unwrap();
    assert_eq!(json["file_name"], "img_001.jpg");
    assert_eq!(json["height"], 480);
    assert_eq!(json["width"], 640);
    assert_eq!(json["gtboxes"][0]["tag"], "person");
    assert_eq!(json["gtboxes"][0]["box"], serde_json::json!([10, 20, 40, 40]));
    assert_eq!(json["hoi"][0]["subject_id"], 0);
    assert_eq!(json["hoi"][0]["object_id"], 1);
    assert_eq!(json["hoi"][0]["interaction"], "hold");
}

#[test]
fn test_decode_infers_kind_from_tag() {
    let label = LabelFile::from_store(&sample_store(), &ImageMeta::new("a.jpg", 640, 480));
    let store = label.to_store().unwrap();
    assert_eq!(store.len(), 2);
    assert_eq!(store.get(0).unwrap().kind, LabelKind::Person);
    assert_eq!(store.get(1).unwrap().kind, LabelKind::Object);
    assert_eq!(store.get(1).unwrap().tag, "cup");
    assert_eq!(store.link_count(), 1);
    assert!(!store.is_dirty());
}

#[test]
fn test_float_coordinates_are_truncated() {
    let json = r#"{"file_name":"a.jpg","height":10,"width":10,
        "gtboxes":[{"tag":"person","box":[10.9,20.2,40.7,40.0]}],"hoi":[]}"#;
    let label: LabelFile = serde_json::from_str(json).unwrap();
    assert_eq!(label.gtboxes[0].bbox, [10, 20, 40, 40]);
}

#[test]
fn test_missing_lists_default_to_empty() {
    let json = r#"{"file_name":"a.jpg","height":10,"width":10}"#;
    let label: LabelFile = serde_json::from_str(json).unwrap();
    assert!(label.gtboxes.is_empty());
    assert!(label.hoi.is_empty());
}

#[test]
fn test_bad_link_is_rejected_and_store_left_empty() {
    let json = r#"{"file_name":"a.jpg","height":10,"width":10,
        "gtboxes":[{"tag":"person","box":[0,0,5,5]}],
        "hoi":[{"subject_id":0,"object_id":3,"interaction":"hold"}]}"#;
    let label: LabelFile = serde_json::from_str(json).unwrap();
    let mut store = sample_store();
    let err = label.populate(&mut store).unwrap_err();
    assert!(matches!(
        err,
        FormatError::Store(StoreError::InvalidReference { object: 3, .. })
    ));
    assert!(store.is_empty());
    assert_eq!(store.link_count(), 0);
}

#[test]
fn test_out_of_range_box_is_rejected_and_store_left_empty() {
    let json = r#"{"file_name":"a.jpg","height":10,"width":10,
        "gtboxes":[{"tag":"person","box":[0,0,5,5]},
                   {"tag":"cup","box":[9.0e18,0,9.0e18,1]}],"hoi":[]}"#;
    let label: LabelFile = serde_json::from_str(json).unwrap();
    assert!(matches!(
        label.gtboxes[1].corners(),
        Err(FormatError::InvalidFormat { .. })
    ));

    let mut store = sample_store();
    let err = label.populate(&mut store).unwrap_err();
    assert!(matches!(err, FormatError::InvalidFormat { .. }));
    assert!(store.is_empty());
    assert_eq!(store.link_count(), 0);
}

#[test]
fn test_read_write_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("img_001.txt");

    assert_eq!(LabelFile::read(&path).unwrap(), None);

    let label = LabelFile::from_store(&sample_store(), &ImageMeta::new("img_001.jpg", 640, 480));
    label.write(&path).unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(!contents.contains('\n'), "label file is a single line");

    let back = LabelFile::read(&path).unwrap().unwrap();
    assert_eq!(back, label);
    let store = back.to_store().unwrap();
    assert_eq!(store.boxes(), sample_store().boxes());
    assert_eq!(store.links(), sample_store().links());
}

#[test]
fn test_read_malformed_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.txt");
    std::fs::write(&path, "{not json").unwrap();
    assert!(matches!(LabelFile::read(&path), Err(FormatError::Json(_))));
}

#[test]
fn test_label_path_for() {
    let dir = Path::new("Labels/set1");
    assert_eq!(
        label_path_for(dir, Path::new("/data/set1/img_001.jpg")),
        Path::new("Labels/set1/img_001.txt")
    );
    assert_eq!(
        label_path_for(dir, Path::new("/data/set1/frame.v2.PNG")),
        Path::new("Labels/set1/frame.v2.txt")
    );
}

#[test]
fn test_gt_box_from_degenerate_box() {
    let mut store = AnnotationStore::new();
    store.add_box(
        BoundingBox::normalized(5.0, 5.0, 5.0, 5.0),
        LabelKind::Object,
        "cup",
    );
    let gt = GtBox::from_box(store.get(0).unwrap());
    assert_eq!(gt.bbox, [5, 5, 1, 1]);
}
