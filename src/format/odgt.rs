//! ODGT export: every label file of a directory as one JSON record per line.

use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::LABEL_FILE_EXTENSION;
use crate::format::error::FormatError;
use crate::format::label_file::LabelFile;
use crate::format::report::{ExportResult, FormatWarning};

/// Label files in `label_dir`, sorted by path.
pub fn label_files_in(label_dir: &Path) -> Result<Vec<PathBuf>, FormatError> {
    let mut files: Vec<PathBuf> = fs::read_dir(label_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case(LABEL_FILE_EXTENSION))
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Concatenate every label file in `label_dir` into `output`.
///
/// Files that cannot be read or parsed are skipped and reported in the
/// returned [`ExportResult`].
pub fn export_odgt(label_dir: &Path, output: &Path) -> Result<ExportResult, FormatError> {
    log::info!("Exporting ODGT from {:?} to {:?}", label_dir, output);

    let mut result = ExportResult::new();
    let mut lines = String::new();

    let files = label_files_in(label_dir)?;
    if files.is_empty() {
        result.add_warning(
            FormatWarning::info("No label files found").with_path(label_dir),
        );
    }

    for path in files {
        let label = match LabelFile::read(&path) {
            Ok(Some(label)) => label,
            Ok(None) => continue,
            Err(FormatError::Io(e)) => {
                log::warn!("Skipping {:?}: {}", path, e);
                result.add_warning(FormatWarning::error(e.to_string()).with_path(&path));
                continue;
            }
            Err(e) => {
                log::warn!("Skipping {:?}: {}", path, e);
                result.add_warning(FormatWarning::warning(e.to_string()).with_path(&path));
                continue;
            }
        };
        lines.push_str(&serde_json::to_string(&label)?);
        lines.push('\n');
        result.images_exported += 1;
        result.annotations_exported += label.gtboxes.len();
        result.interactions_exported += label.hoi.len();
    }

    fs::write(output, lines)?;
    result.files_created.push(output.to_path_buf());

    log::info!(
        "Exported {} images with {} boxes and {} interactions ({} warnings)",
        result.images_exported,
        result.annotations_exported,
        result.interactions_exported,
        result.warnings.len()
    );
    Ok(result)
}

/// Parse an ODGT file. Blank lines are ignored.
pub fn read_odgt(path: &Path) -> Result<Vec<LabelFile>, FormatError> {
    let contents = fs::read_to_string(path)?;
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line)
                .map_err(|e| FormatError::invalid_format(format!("line {}: {}", i + 1, e)))
        })
        .collect()
}
