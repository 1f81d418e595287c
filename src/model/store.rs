//! Per-image storage for boxes and interaction links.
//!
//! A box's position in the sequence is its identity for as long as the image
//! is active. Boxes are only ever appended; the only removal is [`AnnotationStore::clear`],
//! which invalidates every index at once, so links can safely refer to boxes
//! by index.

use thiserror::Error;

use super::annotation::{AnnotatedBox, InteractionLink, LabelKind};
use super::geometry::BoundingBox;

/// Errors raised when an operation refers to a box that does not exist.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A link endpoint is out of range or both endpoints are the same box.
    #[error("invalid link reference {subject} -> {object} (store holds {len} boxes)")]
    InvalidReference {
        subject: usize,
        object: usize,
        len: usize,
    },

    /// A box index is stale.
    #[error("box index {index} out of range (store holds {len} boxes)")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Boxes and links for the active image.
#[derive(Debug, Clone, Default)]
pub struct AnnotationStore {
    boxes: Vec<AnnotatedBox>,
    links: Vec<InteractionLink>,
    /// Set when anything changes, cleared after a save.
    dirty: bool,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the store has been modified since the last `clear_dirty()`.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear the dirty flag. Call after persisting.
    #[inline]
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// Flag contents that differ from what is on disk without an edit.
    #[inline]
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Append a box and return its index.
    pub fn add_box(&mut self, bbox: BoundingBox, kind: LabelKind, tag: impl Into<String>) -> usize {
        self.boxes.push(AnnotatedBox::new(bbox, kind, tag));
        self.dirty = true;
        self.boxes.len() - 1
    }

    /// Replace the geometry of an existing box.
    pub fn update_box_geometry(&mut self, index: usize, bbox: BoundingBox) -> Result<(), StoreError> {
        let len = self.boxes.len();
        let entry = self
            .boxes
            .get_mut(index)
            .ok_or(StoreError::IndexOutOfRange { index, len })?;
        entry.bbox = bbox.normalize();
        self.dirty = true;
        Ok(())
    }

    /// Link two distinct existing boxes and return the link index.
    pub fn add_link(
        &mut self,
        subject: usize,
        object: usize,
        interaction: impl Into<String>,
    ) -> Result<usize, StoreError> {
        let len = self.boxes.len();
        if subject >= len || object >= len || subject == object {
            return Err(StoreError::InvalidReference {
                subject,
                object,
                len,
            });
        }
        self.links
            .push(InteractionLink::new(subject, object, interaction));
        self.dirty = true;
        Ok(self.links.len() - 1)
    }

    /// Drop every box and link.
    pub fn clear(&mut self) {
        if !self.boxes.is_empty() || !self.links.is_empty() {
            self.dirty = true;
        }
        self.boxes.clear();
        self.links.clear();
    }

    /// Indices of the links with `box_index` as either endpoint.
    pub fn links_touching(&self, box_index: usize) -> Vec<usize> {
        self.links
            .iter()
            .enumerate()
            .filter(|(_, link)| link.touches(box_index))
            .map(|(i, _)| i)
            .collect()
    }

    pub fn get(&self, index: usize) -> Option<&AnnotatedBox> {
        self.boxes.get(index)
    }

    pub fn link(&self, index: usize) -> Option<&InteractionLink> {
        self.links.get(index)
    }

    pub fn boxes(&self) -> &[AnnotatedBox] {
        &self.boxes
    }

    pub fn links(&self) -> &[InteractionLink] {
        &self.links
    }

    /// `(index, geometry)` pairs for every box, for hit-testing.
    pub fn geometry(&self) -> impl Iterator<Item = (usize, BoundingBox)> + '_ {
        self.boxes.iter().map(|b| b.bbox).enumerate()
    }

    /// `(index, geometry)` pairs for boxes of one kind only.
    pub fn geometry_of_kind(
        &self,
        kind: LabelKind,
    ) -> impl Iterator<Item = (usize, BoundingBox)> + '_ {
        self.boxes
            .iter()
            .enumerate()
            .filter(move |(_, b)| b.kind == kind)
            .map(|(i, b)| (i, b.bbox))
    }

    /// Get the number of boxes.
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    /// Check if there are no boxes.
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }
}
