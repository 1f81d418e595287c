//! Conversion of ODGT records to the HICO-DET style JSON used for training.
//!
//! Boxes become 1-based corner coordinates `[x + 1, y + 1, x + w, y + h]`
//! and names are replaced by numeric category ids from a [`CategoryMap`].

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::format::error::FormatError;
use crate::format::label_file::{GtBox, HoiEntry, LabelFile};
use crate::format::odgt::read_odgt;

/// Name to id tables for object tags and interaction labels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryMap {
    #[serde(default)]
    pub objects: BTreeMap<String, u32>,
    #[serde(default)]
    pub interactions: BTreeMap<String, u32>,
}

impl CategoryMap {
    /// Load a category map from a JSON file.
    pub fn load(path: &Path) -> Result<Self, FormatError> {
        let contents = fs::read_to_string(path)?;
        let map: CategoryMap = serde_json::from_str(&contents)?;
        log::debug!(
            "Loaded {} object and {} interaction categories from {:?}",
            map.objects.len(),
            map.interactions.len(),
            path
        );
        Ok(map)
    }

    pub fn object_id(&self, tag: &str) -> Result<u32, FormatError> {
        self.objects
            .get(tag)
            .copied()
            .ok_or_else(|| FormatError::unknown_category("object", tag))
    }

    pub fn interaction_id(&self, interaction: &str) -> Result<u32, FormatError> {
        self.interactions
            .get(interaction)
            .copied()
            .ok_or_else(|| FormatError::unknown_category("interaction", interaction))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HicoBox {
    /// `[x1, y1, x2, y2]`, 1-based.
    pub bbox: [i64; 4],
    pub category_id: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HicoInteraction {
    pub subject_id: usize,
    pub object_id: usize,
    pub category_id: u32,
}

/// One converted image record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HicoRecord {
    pub file_name: String,
    pub hoi_annotation: Vec<HicoInteraction>,
    pub annotations: Vec<HicoBox>,
}

fn convert_box(gt: &GtBox, categories: &CategoryMap) -> Result<HicoBox, FormatError> {
    let [x, y, w, h] = gt.bbox;
    let bbox = [x.checked_add(1), y.checked_add(1), x.checked_add(w), y.checked_add(h)];
    let [Some(x1), Some(y1), Some(x2), Some(y2)] = bbox else {
        return Err(FormatError::invalid_format(format!(
            "box {:?} of '{}' is out of range",
            gt.bbox, gt.tag
        )));
    };
    Ok(HicoBox {
        bbox: [x1, y1, x2, y2],
        category_id: categories.object_id(&gt.tag)?,
    })
}

fn convert_interaction(
    hoi: &HoiEntry,
    categories: &CategoryMap,
) -> Result<HicoInteraction, FormatError> {
    Ok(HicoInteraction {
        subject_id: hoi.subject_id,
        object_id: hoi.object_id,
        category_id: categories.interaction_id(&hoi.interaction)?,
    })
}

/// Convert one label record.
pub fn convert_record(
    label: &LabelFile,
    categories: &CategoryMap,
) -> Result<HicoRecord, FormatError> {
    Ok(HicoRecord {
        file_name: label.file_name.clone(),
        hoi_annotation: label
            .hoi
            .iter()
            .map(|h| convert_interaction(h, categories))
            .collect::<Result<_, _>>()?,
        annotations: label
            .gtboxes
            .iter()
            .map(|b| convert_box(b, categories))
            .collect::<Result<_, _>>()?,
    })
}

/// Convert every record, failing on the first unknown name.
pub fn convert(
    labels: &[LabelFile],
    categories: &CategoryMap,
) -> Result<Vec<HicoRecord>, FormatError> {
    labels
        .iter()
        .map(|label| convert_record(label, categories))
        .collect()
}

/// Convert an ODGT file into a HICO JSON array. Returns the record count.
pub fn convert_file(
    input: &Path,
    output: &Path,
    categories: &CategoryMap,
) -> Result<usize, FormatError> {
    log::info!("Converting {:?} to HICO format at {:?}", input, output);
    let labels = read_odgt(input)?;
    let records = convert(&labels, categories)?;
    fs::write(output, serde_json::to_string(&records)?)?;
    log::info!("Converted {} records", records.len());
    Ok(records.len())
}
