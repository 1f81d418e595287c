//! Error types for the image session.

use std::path::PathBuf;

use thiserror::Error;

use crate::format::FormatError;

#[derive(Error, Debug)]
pub enum SessionError {
    /// The image folder holds no supported images
    #[error("No image files found in {folder:?}")]
    NoImages { folder: PathBuf },

    /// An operation needs an active image but none is loaded
    #[error("No active image")]
    NoActiveImage,

    /// Image index outside the sequence
    #[error("Image index {index} out of range ({len} images)")]
    InvalidIndex { index: usize, len: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Label file could not be written
    #[error("Label file error: {0}")]
    Format(#[from] FormatError),

    /// Image dimensions could not be read
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}
