//! Render bindings for the annotation store.
//!
//! Visual objects (outlines, corner markers, tag text, link lines) are derived
//! data: every entry here can be regenerated from the store alone. The editor
//! refreshes entries whenever geometry changes instead of mutating them in
//! place, and a front end only ever reads them.

use crate::constants::{CORNER_MARKER_COLOR, CORNER_MARKER_HALF_SIZE, LABEL_OFFSET, LINK_COLOR};
use crate::model::{AnnotatedBox, AnnotationStore, BoundingBox, InteractionLink, LabelKind, Point};

/// Visual representation of a single box.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxOverlay {
    pub outline: BoundingBox,
    pub color: [u8; 3],
    /// Square markers in corner order (top-left, bottom-left, top-right, bottom-right).
    pub corner_markers: [BoundingBox; 4],
    pub marker_color: [u8; 3],
    pub label: String,
    pub label_anchor: Point,
    /// Filled highlight while the box is picked as an interaction endpoint.
    pub highlighted: bool,
}

/// Visual representation of an interaction link.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkOverlay {
    pub from: Point,
    pub to: Point,
    pub color: [u8; 3],
    pub label: String,
    pub label_anchor: Point,
}

/// Build the overlay for a box outline of a given kind.
pub fn outline_overlay(
    bbox: BoundingBox,
    kind: LabelKind,
    label: &str,
    highlighted: bool,
) -> BoxOverlay {
    let corner_markers = bbox.corners().map(|c| {
        BoundingBox::normalized(
            c.x - CORNER_MARKER_HALF_SIZE,
            c.y - CORNER_MARKER_HALF_SIZE,
            c.x + CORNER_MARKER_HALF_SIZE,
            c.y + CORNER_MARKER_HALF_SIZE,
        )
    });
    BoxOverlay {
        outline: bbox,
        color: kind.color(),
        corner_markers,
        marker_color: CORNER_MARKER_COLOR,
        label: label.to_string(),
        label_anchor: Point::new((bbox.x1 + bbox.x2) / 2.0, bbox.y2 + LABEL_OFFSET),
        highlighted,
    }
}

/// Build the overlay for a stored box.
pub fn box_overlay(entry: &AnnotatedBox, highlighted: bool) -> BoxOverlay {
    outline_overlay(entry.bbox, entry.kind, &entry.tag, highlighted)
}

/// Build the overlay for a link, or `None` if an endpoint is missing.
pub fn link_overlay(store: &AnnotationStore, link: &InteractionLink) -> Option<LinkOverlay> {
    let from = store.get(link.subject)?.bbox.center();
    let to = store.get(link.object)?.bbox.center();
    Some(LinkOverlay {
        from,
        to,
        color: LINK_COLOR,
        label: link.interaction.clone(),
        label_anchor: from.midpoint(&to),
    })
}

/// Cached overlays, indexed like the store.
#[derive(Debug, Clone, Default)]
pub struct Overlay {
    boxes: Vec<BoxOverlay>,
    links: Vec<Option<LinkOverlay>>,
    preview: Option<BoxOverlay>,
}

impl Overlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Regenerate everything from the store.
    pub fn rebuild(&mut self, store: &AnnotationStore, highlighted: &[usize]) {
        self.boxes = store
            .boxes()
            .iter()
            .enumerate()
            .map(|(i, b)| box_overlay(b, highlighted.contains(&i)))
            .collect();
        self.links = store
            .links()
            .iter()
            .map(|l| link_overlay(store, l))
            .collect();
        log::trace!(
            "Overlay rebuilt: {} boxes, {} links",
            self.boxes.len(),
            self.links.len()
        );
    }

    /// Regenerate the entry for one box. Falls back to a full rebuild if the
    /// cache is out of step with the store.
    pub fn refresh_box(&mut self, store: &AnnotationStore, index: usize, highlighted: bool) {
        match (store.get(index), self.boxes.len() == store.len()) {
            (Some(entry), true) => self.boxes[index] = box_overlay(entry, highlighted),
            _ => {
                let selected: Vec<usize> = self
                    .boxes
                    .iter()
                    .enumerate()
                    .filter(|(_, b)| b.highlighted)
                    .map(|(i, _)| i)
                    .collect();
                self.rebuild(store, &selected);
            }
        }
    }

    /// Regenerate the given link entries.
    pub fn refresh_links(&mut self, store: &AnnotationStore, indices: &[usize]) {
        if self.links.len() != store.link_count() {
            self.links = store
                .links()
                .iter()
                .map(|l| link_overlay(store, l))
                .collect();
            return;
        }
        for &i in indices {
            if let Some(link) = store.link(i) {
                self.links[i] = link_overlay(store, link);
            }
        }
    }

    /// Set or clear the highlight of one box.
    pub fn set_highlight(&mut self, index: usize, highlighted: bool) {
        if let Some(entry) = self.boxes.get_mut(index) {
            entry.highlighted = highlighted;
        }
    }

    /// Restore the neutral look on every box.
    pub fn clear_highlights(&mut self) {
        for entry in &mut self.boxes {
            entry.highlighted = false;
        }
    }

    /// Show or hide the rubber-band preview of a box being drawn.
    pub fn set_preview(&mut self, preview: Option<(BoundingBox, LabelKind)>) {
        self.preview = preview.map(|(bbox, kind)| outline_overlay(bbox, kind, "", false));
    }

    pub fn boxes(&self) -> &[BoxOverlay] {
        &self.boxes
    }

    pub fn links(&self) -> impl Iterator<Item = &LinkOverlay> {
        self.links.iter().flatten()
    }

    pub fn preview(&self) -> Option<&BoxOverlay> {
        self.preview.as_ref()
    }

    pub fn clear(&mut self) {
        self.boxes.clear();
        self.links.clear();
        self.preview = None;
    }
}
