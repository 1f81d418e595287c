//! Global constants for the annotator

/// Maximum distance (image pixels) at which a pointer press grabs a box corner.
pub const RESIZE_HIT_RADIUS: f32 = 10.0;

/// Looser corner radius used only for cursor hinting while hovering.
pub const CORNER_HINT_RADIUS: f32 = 15.0;

/// Half the side length of the square marker drawn on each box corner.
pub const CORNER_MARKER_HALF_SIZE: f32 = 5.0;

/// Vertical gap between a box's bottom edge and its tag text.
pub const LABEL_OFFSET: f32 = 10.0;

/// RGB color of interaction link lines.
pub const LINK_COLOR: [u8; 3] = [255, 165, 0];

/// RGB color of corner markers.
pub const CORNER_MARKER_COLOR: [u8; 3] = [255, 0, 0];

/// Extension of per-image label files.
pub const LABEL_FILE_EXTENSION: &str = "txt";

/// Default root directory for label folders, relative to the working directory.
pub const DEFAULT_LABEL_ROOT: &str = "Labels";
