//! Data models: geometry, labelled boxes, interaction links and their store.

mod annotation;
pub mod geometry;
mod store;

pub use annotation::{AnnotatedBox, InteractionLink, LabelKind, PERSON_TAG};
pub use geometry::{BoundingBox, Corner, Point};
pub use store::{AnnotationStore, StoreError};
