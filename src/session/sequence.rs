//! Ordered list of images in a folder.

use std::path::{Path, PathBuf};

use super::error::SessionError;

/// Supported image extensions
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Check if a path has a supported image extension
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
}

/// Images of one folder, sorted by path, with a cursor.
#[derive(Clone, Debug)]
pub struct ImageSequence {
    folder: PathBuf,
    images: Vec<PathBuf>,
    current_index: usize,
}

impl ImageSequence {
    /// Discover image files in a folder, non-recursively.
    pub fn from_folder(folder: impl Into<PathBuf>) -> Result<Self, SessionError> {
        let folder = folder.into();
        let images: Vec<PathBuf> = std::fs::read_dir(&folder)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && is_image_file(path))
            .collect();
        log::info!("Scanned folder {:?}: found {} images", folder, images.len());
        Self::from_paths(folder, images)
    }

    /// Build a sequence from an explicit list of image paths.
    pub fn from_paths(folder: impl Into<PathBuf>, mut images: Vec<PathBuf>) -> Result<Self, SessionError> {
        let folder = folder.into();
        if images.is_empty() {
            return Err(SessionError::NoImages { folder });
        }
        // Sort by filename for consistent ordering
        images.sort();
        Ok(Self {
            folder,
            images,
            current_index: 0,
        })
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// Last component of the folder path, used to name the label directory.
    pub fn folder_name(&self) -> String {
        self.folder
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn images(&self) -> &[PathBuf] {
        &self.images
    }

    pub fn get(&self, index: usize) -> Option<&Path> {
        self.images.get(index).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Always false; an empty sequence cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_image(&self) -> &Path {
        &self.images[self.current_index]
    }

    /// Move the cursor to `index`.
    pub fn go_to(&mut self, index: usize) -> Result<(), SessionError> {
        if index >= self.images.len() {
            return Err(SessionError::InvalidIndex {
                index,
                len: self.images.len(),
            });
        }
        self.current_index = index;
        Ok(())
    }

    pub fn has_next(&self) -> bool {
        self.current_index + 1 < self.images.len()
    }

    pub fn has_previous(&self) -> bool {
        self.current_index > 0
    }

    /// Get progress string (e.g., "3/15")
    pub fn progress(&self) -> String {
        format!("{}/{}", self.current_index + 1, self.images.len())
    }
}
