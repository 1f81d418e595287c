//! Tests for ODGT export.

use crate::format::label_file::{ImageMeta, LabelFile};
use crate::format::odgt::{export_odgt, read_odgt};
use crate::format::report::WarningSeverity;
use crate::model::{AnnotationStore, BoundingBox, LabelKind};

fn write_label(dir: &std::path::Path, stem: &str, boxes: usize) {
    let mut store = AnnotationStore::new();
    for i in 0..boxes {
        let x = i as f32 * 50.0;
        store.add_box(
            BoundingBox::normalized(x, 0.0, x + 9.0, 9.0),
            LabelKind::Person,
            "person",
        );
    }
    let label = LabelFile::from_store(&store, &ImageMeta::new(format!("{}.jpg", stem), 100, 100));
    label.write(&dir.join(format!("{}.txt", stem))).unwrap();
}

#[test]
fn test_export_concatenates_sorted_files() {
    let dir = tempfile::tempdir().unwrap();
    write_label(dir.path(), "b", 1);
    write_label(dir.path(), "a", 2);
    std::fs::write(dir.path().join("notes.md"), "ignored").unwrap();

    let out = dir.path().join("out.odgt");
    let result = export_odgt(dir.path(), &out).unwrap();

    assert_eq!(result.images_exported, 2);
    assert_eq!(result.annotations_exported, 3);
    assert!(!result.has_warnings());
    assert_eq!(result.files_created, vec![out.clone()]);

    let contents = std::fs::read_to_string(&out).unwrap();
    assert_eq!(contents.lines().count(), 2);

    let records = read_odgt(&out).unwrap();
    assert_eq!(records[0].file_name, "a.jpg");
    assert_eq!(records[1].file_name, "b.jpg");
}

#[test]
fn test_export_skips_malformed_files() {
    let dir = tempfile::tempdir().unwrap();
    write_label(dir.path(), "a", 1);
    std::fs::write(dir.path().join("broken.txt"), "{oops").unwrap();

    let out = dir.path().join("out.odgt");
    let result = export_odgt(dir.path(), &out).unwrap();

    assert_eq!(result.images_exported, 1);
    assert!(result.has_warnings());
    assert!(!result.has_errors());
    assert_eq!(result.warnings[0].severity, WarningSeverity::Warning);
    assert_eq!(
        result.warnings[0].path.as_deref(),
        Some(dir.path().join("broken.txt").as_path())
    );
}

#[test]
fn test_export_empty_directory() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.odgt");
    let result = export_odgt(dir.path(), &out).unwrap();
    assert_eq!(result.images_exported, 0);
    assert_eq!(result.warnings[0].severity, WarningSeverity::Info);
    assert_eq!(std::fs::read_to_string(&out).unwrap(), "");
}

#[test]
fn test_read_odgt_reports_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("in.odgt");
    std::fs::write(
        &path,
        "{\"file_name\":\"a.jpg\",\"height\":1,\"width\":1}\n\n[1,2]\n",
    )
    .unwrap();
    let err = read_odgt(&path).unwrap_err();
    assert!(err.to_string().contains("line 3"), "{}", err);
}
