//! Image sessions: folder discovery, label directories and navigation.

mod controller;
mod error;
mod probe;
mod sequence;

pub use controller::{LoadOutcome, Navigation, Session, Step, label_dir_for};
pub use error::SessionError;
pub use probe::{ImageCrateProbe, ImageProbe};
pub use sequence::{IMAGE_EXTENSIONS, ImageSequence, is_image_file};
