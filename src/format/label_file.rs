//! Per-image label file codec.
//!
//! One label file per image, named after the image stem with a `.txt`
//! extension, holding a single JSON document:
//!
//! ```json
//! {"file_name": "img_001.jpg", "height": 480, "width": 640,
//!  "gtboxes": [{"tag": "person", "box": [10, 20, 40, 40]}],
//!  "hoi": [{"subject_id": 0, "object_id": 1, "interaction": "hold"}]}
//! ```
//!
//! `box` is `[x, y, w, h]` with inclusive pixel extents, so a box spanning
//! x = 10..=49 has `w = 40`.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};

use crate::constants::LABEL_FILE_EXTENSION;
use crate::format::error::FormatError;
use crate::model::{AnnotatedBox, AnnotationStore, BoundingBox, LabelKind};

/// Identity of the image a label file belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImageMeta {
    /// Image file name without directories.
    pub file_name: String,
    pub width: u32,
    pub height: u32,
}

impl ImageMeta {
    pub fn new(file_name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            file_name: file_name.into(),
            width,
            height,
        }
    }
}

/// One ground-truth box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GtBox {
    pub tag: String,
    /// `[x, y, w, h]`
    #[serde(rename = "box", deserialize_with = "truncated_box")]
    pub bbox: [i64; 4],
}

impl GtBox {
    /// Encode a box, rounding to whole pixels.
    pub fn from_box(entry: &AnnotatedBox) -> Self {
        let b = entry.bbox;
        let x1 = b.x1.round() as i64;
        let y1 = b.y1.round() as i64;
        let x2 = b.x2.round() as i64;
        let y2 = b.y2.round() as i64;
        Self {
            tag: entry.tag.clone(),
            bbox: [x1, y1, x2 - x1 + 1, y2 - y1 + 1],
        }
    }

    /// Corner coordinates `(x1, y1, x2, y2)` of the encoded box.
    pub fn corners(&self) -> Result<BoundingBox, FormatError> {
        let [x, y, w, h] = self.bbox;
        let far = |start: i64, extent: i64| start.checked_add(extent)?.checked_sub(1);
        match (far(x, w), far(y, h)) {
            (Some(x2), Some(y2)) => Ok(BoundingBox::normalized(
                x as f32, y as f32, x2 as f32, y2 as f32,
            )),
            _ => Err(FormatError::invalid_format(format!(
                "box {:?} of '{}' is out of range",
                self.bbox, self.tag
            ))),
        }
    }
}

/// Coordinates may be written as floats by other tools; truncate them
/// toward zero like an integer cast.
fn truncated_box<'de, D>(deserializer: D) -> Result<[i64; 4], D::Error>
where
    D: Deserializer<'de>,
{
    let raw = <[f64; 4]>::deserialize(deserializer)?;
    Ok(raw.map(|v| v.trunc() as i64))
}

/// One interaction link, referencing boxes by position in `gtboxes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoiEntry {
    pub subject_id: usize,
    pub object_id: usize,
    pub interaction: String,
}

/// Serialized annotations of one image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelFile {
    pub file_name: String,
    pub height: u32,
    pub width: u32,
    #[serde(default)]
    pub gtboxes: Vec<GtBox>,
    #[serde(default)]
    pub hoi: Vec<HoiEntry>,
}

impl LabelFile {
    /// Encode the store for the given image.
    pub fn from_store(store: &AnnotationStore, image: &ImageMeta) -> Self {
        Self {
            file_name: image.file_name.clone(),
            height: image.height,
            width: image.width,
            gtboxes: store.boxes().iter().map(GtBox::from_box).collect(),
            hoi: store
                .links()
                .iter()
                .map(|l| HoiEntry {
                    subject_id: l.subject,
                    object_id: l.object,
                    interaction: l.interaction.clone(),
                })
                .collect(),
        }
    }

    /// Replace the store contents with this file's boxes and links.
    ///
    /// The store is left empty if a box is out of range or any link
    /// references a missing box.
    pub fn populate(&self, store: &mut AnnotationStore) -> Result<(), FormatError> {
        store.clear();
        for gt in &self.gtboxes {
            match gt.corners() {
                Ok(bbox) => {
                    store.add_box(bbox, LabelKind::for_tag(&gt.tag), gt.tag.as_str());
                }
                Err(err) => {
                    store.clear();
                    return Err(err);
                }
            }
        }
        for hoi in &self.hoi {
            if let Err(err) = store.add_link(hoi.subject_id, hoi.object_id, hoi.interaction.as_str())
            {
                store.clear();
                return Err(err.into());
            }
        }
        Ok(())
    }

    /// Decode into a fresh store.
    pub fn to_store(&self) -> Result<AnnotationStore, FormatError> {
        let mut store = AnnotationStore::new();
        self.populate(&mut store)?;
        store.clear_dirty();
        Ok(store)
    }

    /// Read a label file. A missing file is `Ok(None)`.
    pub fn read(path: &Path) -> Result<Option<Self>, FormatError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let label: LabelFile = serde_json::from_str(&contents)?;
        log::debug!(
            "Read {:?}: {} boxes, {} links",
            path,
            label.gtboxes.len(),
            label.hoi.len()
        );
        Ok(Some(label))
    }

    /// Write as a single line of compact JSON, replacing any existing file.
    pub fn write(&self, path: &Path) -> Result<(), FormatError> {
        let json = serde_json::to_string(self)?;
        fs::write(path, json)?;
        log::debug!("Wrote {:?}", path);
        Ok(())
    }
}

/// Label file path for an image: `<label_dir>/<image stem>.txt`.
pub fn label_path_for(label_dir: &Path, image_path: &Path) -> PathBuf {
    let mut name = image_path.file_stem().unwrap_or_default().to_os_string();
    name.push(".");
    name.push(LABEL_FILE_EXTENSION);
    label_dir.join(name)
}
