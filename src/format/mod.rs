//! Label persistence and dataset export.
//!
//! - **Label files**: one JSON document per image, read and written by the
//!   session on every navigation
//! - **ODGT**: all label files of a folder, one record per line
//! - **HICO**: ODGT records with numeric category ids, for training

pub mod error;
pub mod hico;
pub mod label_file;
pub mod odgt;
mod report;

#[cfg(test)]
mod tests;

pub use error::FormatError;
pub use hico::{CategoryMap, HicoRecord};
pub use label_file::{GtBox, HoiEntry, ImageMeta, LabelFile, label_path_for};
pub use odgt::{export_odgt, read_odgt};
pub use report::{ExportResult, FormatWarning, WarningSeverity};
