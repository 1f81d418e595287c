//! Pointer interaction for a single image: box drawing, dragging, resizing
//! and interaction linking.

mod machine;
mod prompt;
mod state;

pub use machine::{AnnotationEditor, CursorHint, EditorOutcome};
pub use prompt::{LabelPicker, LabelRequest, LabelSets};
pub use state::{
    BoxGrab, CornerGrab, DrawingBox, EditState, LabelPurpose, PendingLabel, PendingTarget,
};
