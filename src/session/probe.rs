//! Image dimension lookup.

use std::path::Path;

use super::error::SessionError;

/// Reports the pixel size of an image file without keeping it around.
pub trait ImageProbe {
    /// `(width, height)` in pixels.
    fn dimensions(&self, path: &Path) -> Result<(u32, u32), SessionError>;
}

/// Reads dimensions from the image header with the `image` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCrateProbe;

impl ImageProbe for ImageCrateProbe {
    fn dimensions(&self, path: &Path) -> Result<(u32, u32), SessionError> {
        Ok(image::image_dimensions(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_crate_probe_reads_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.png");
        image::RgbImage::new(7, 3).save(&path).unwrap();
        assert_eq!(ImageCrateProbe.dimensions(&path).unwrap(), (7, 3));
    }

    #[test]
    fn test_image_crate_probe_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = ImageCrateProbe.dimensions(&dir.path().join("missing.png"));
        assert!(matches!(result, Err(SessionError::Image(_))));
    }
}
