//! Pointer-driven annotation editor.
//!
//! Interprets pointer-down / move / up and cancel events into box creation,
//! dragging, resizing and interaction linking against the [`AnnotationStore`].
//! Label prompts are explicit suspend points: the editor parks the gesture in
//! [`EditState::AwaitingLabel`] and resumes in [`AnnotationEditor::resolve_label`].

use crate::constants::{CORNER_HINT_RADIUS, RESIZE_HIT_RADIUS};
use crate::model::geometry::{closest_containing_box, containing_boxes, nearest_corner};
use crate::model::{AnnotationStore, BoundingBox, LabelKind, PERSON_TAG, Point, StoreError};
use crate::overlay::Overlay;

use super::prompt::{LabelPicker, LabelRequest, LabelSets};
use super::state::{
    BoxGrab, CornerGrab, DrawingBox, EditState, LabelPurpose, PendingLabel, PendingTarget,
};

/// Result of feeding one event to the editor.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorOutcome {
    /// Nothing happened.
    Unchanged,
    /// Gesture state or geometry changed.
    Updated,
    /// The editor is suspended until [`AnnotationEditor::resolve_label`] is called.
    LabelRequested(LabelRequest),
    /// Event ignored because a label prompt is outstanding.
    Suspended,
    /// A box was appended at this index.
    BoxCommitted(usize),
    /// A link was appended at this index.
    LinkCommitted(usize),
    /// A label prompt was abandoned; nothing was created.
    Abandoned,
    /// The gesture hit a stale index and was dropped.
    Aborted(StoreError),
}

/// Cursor affordance for the current pointer position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorHint {
    #[default]
    Arrow,
    /// Pointer is near a corner that can be grabbed.
    Crosshair,
    /// A box is being dragged or resized.
    Move,
}

/// Annotation editor for one image.
#[derive(Debug, Clone, Default)]
pub struct AnnotationEditor {
    store: AnnotationStore,
    overlay: Overlay,
    labels: LabelSets,
    label_kind: LabelKind,
    state: EditState,
}

impl AnnotationEditor {
    pub fn new(labels: LabelSets) -> Self {
        Self {
            labels,
            ..Self::default()
        }
    }

    pub fn store(&self) -> &AnnotationStore {
        &self.store
    }

    /// Mark the store as persisted.
    pub fn mark_saved(&mut self) {
        self.store.clear_dirty();
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub fn state(&self) -> &EditState {
        &self.state
    }

    pub fn labels(&self) -> &LabelSets {
        &self.labels
    }

    pub fn label_kind(&self) -> LabelKind {
        self.label_kind
    }

    /// Boxes picked as interaction endpoints, in pick order.
    pub fn pending_selection(&self) -> Vec<usize> {
        self.state.pending_selection()
    }

    /// Replace the store contents (e.g. after loading a label file).
    pub fn load(&mut self, store: AnnotationStore) {
        self.store = store;
        self.state = EditState::Idle;
        self.overlay.set_preview(None);
        self.overlay.rebuild(&self.store, &[]);
        log::debug!(
            "Editor loaded {} boxes, {} links",
            self.store.len(),
            self.store.link_count()
        );
    }

    /// Drop every box, link, selection and in-progress gesture.
    pub fn reset(&mut self) {
        self.store.clear();
        self.overlay.clear();
        self.state = EditState::Idle;
        log::info!("Annotations reset");
    }

    /// Switch the active label kind.
    ///
    /// An in-progress drawing and a half-made interaction selection are
    /// dropped. Refused while a label prompt is outstanding.
    pub fn set_label_kind(&mut self, kind: LabelKind) -> bool {
        if self.state.is_suspended() {
            log::debug!("Ignoring switch to {} while a label prompt is open", kind.name());
            return false;
        }
        if kind == self.label_kind {
            return true;
        }
        match self.state {
            EditState::DrawingBox(_) => {
                self.overlay.set_preview(None);
                self.state = EditState::Idle;
            }
            EditState::AwaitingSecondTarget(_) => {
                self.overlay.clear_highlights();
                self.state = EditState::Idle;
            }
            _ => {}
        }
        self.label_kind = kind;
        log::debug!("Label kind: {}", kind.name());
        true
    }

    /// Handle a pointer press at `p` (image coordinates).
    pub fn pointer_down(&mut self, p: Point) -> EditorOutcome {
        if self.state.is_suspended() {
            log::debug!("Pointer down ignored: label prompt outstanding");
            return EditorOutcome::Suspended;
        }

        if self.label_kind == LabelKind::Interaction {
            return self.pick_interaction_target(p);
        }

        let kind = self.label_kind;

        if let Some((index, corner)) =
            nearest_corner(p, self.store.geometry_of_kind(kind), RESIZE_HIT_RADIUS)
        {
            let Some(original) = self.store.get(index).map(|b| b.bbox) else {
                return self.abort(StoreError::IndexOutOfRange {
                    index,
                    len: self.store.len(),
                });
            };
            self.overlay.set_preview(None);
            self.state = EditState::Resizing(CornerGrab {
                index,
                corner,
                start: p,
                original,
            });
            log::debug!("Resizing box {} by {:?}", index, corner);
            return EditorOutcome::Updated;
        }

        if let Some(&index) = containing_boxes(p, self.store.geometry_of_kind(kind)).first() {
            let Some(original) = self.store.get(index).map(|b| b.bbox) else {
                return self.abort(StoreError::IndexOutOfRange {
                    index,
                    len: self.store.len(),
                });
            };
            self.overlay.set_preview(None);
            self.state = EditState::Dragging(BoxGrab {
                index,
                start: p,
                original,
            });
            log::debug!("Dragging box {}", index);
            return EditorOutcome::Updated;
        }

        match self.state {
            EditState::DrawingBox(drawing) => {
                self.overlay.set_preview(None);
                self.state = EditState::Idle;
                let bbox = BoundingBox::from_corners(drawing.anchor, p);
                self.finish_box(bbox)
            }
            _ => {
                self.state = EditState::DrawingBox(DrawingBox {
                    anchor: p,
                    current: p,
                });
                self.overlay
                    .set_preview(Some((BoundingBox::from_corners(p, p), kind)));
                log::debug!("Box started at ({:.1}, {:.1})", p.x, p.y);
                EditorOutcome::Updated
            }
        }
    }

    /// Like [`pointer_down`](Self::pointer_down), resolving any label prompt
    /// immediately through `picker`.
    pub fn pointer_down_with<P>(&mut self, p: Point, picker: &mut P) -> EditorOutcome
    where
        P: LabelPicker + ?Sized,
    {
        match self.pointer_down(p) {
            EditorOutcome::LabelRequested(request) => {
                let answer = picker.pick(&request);
                self.resolve_label(answer)
            }
            other => other,
        }
    }

    /// Handle pointer motion. Returns the cursor hint for this position.
    pub fn pointer_move(&mut self, p: Point) -> CursorHint {
        match self.state {
            EditState::Resizing(grab) => {
                let bbox = grab.original.with_corner_moved(
                    grab.corner,
                    p.x - grab.start.x,
                    p.y - grab.start.y,
                );
                if self.apply_geometry(grab.index, bbox) {
                    CursorHint::Move
                } else {
                    self.corner_hint(p)
                }
            }
            EditState::Dragging(grab) => {
                let bbox = grab
                    .original
                    .translated(p.x - grab.start.x, p.y - grab.start.y);
                if self.apply_geometry(grab.index, bbox) {
                    CursorHint::Move
                } else {
                    self.corner_hint(p)
                }
            }
            EditState::DrawingBox(ref mut drawing) => {
                drawing.current = p;
                let rect = drawing.rect();
                self.overlay.set_preview(Some((rect, self.label_kind)));
                self.corner_hint(p)
            }
            _ => self.corner_hint(p),
        }
    }

    /// Handle a pointer release. Ends a drag or resize.
    pub fn pointer_up(&mut self, _p: Point) -> EditorOutcome {
        match self.state {
            EditState::Dragging(BoxGrab { index, .. })
            | EditState::Resizing(CornerGrab { index, .. }) => {
                self.state = EditState::Idle;
                log::info!("Finished editing box {}", index);
                EditorOutcome::Updated
            }
            _ => EditorOutcome::Unchanged,
        }
    }

    /// Cancel an in-progress drawing. No-op in any other state.
    pub fn cancel(&mut self) -> EditorOutcome {
        if let EditState::DrawingBox(_) = self.state {
            self.overlay.set_preview(None);
            self.state = EditState::Idle;
            log::debug!("Box drawing cancelled");
            EditorOutcome::Updated
        } else {
            EditorOutcome::Unchanged
        }
    }

    /// Resume after a label prompt. `None` abandons the prompt.
    pub fn resolve_label(&mut self, label: Option<String>) -> EditorOutcome {
        let pending = match std::mem::take(&mut self.state) {
            EditState::AwaitingLabel(pending) => pending,
            other => {
                self.state = other;
                log::debug!("No label prompt outstanding");
                return EditorOutcome::Unchanged;
            }
        };

        let label = label.filter(|l| {
            let accepted = pending.request.accepts(l);
            if !accepted {
                log::warn!("Rejected label '{}': not in the {} set", l, pending.request.kind.name());
            }
            accepted
        });

        match (pending.purpose, label) {
            (LabelPurpose::ObjectTag { bbox }, Some(tag)) => {
                let index = self.store.add_box(bbox, LabelKind::Object, tag);
                self.overlay.rebuild(&self.store, &[]);
                log::info!(
                    "Created object box {} (total: {})",
                    index,
                    self.store.len()
                );
                EditorOutcome::BoxCommitted(index)
            }
            (LabelPurpose::ObjectTag { .. }, None) => {
                log::info!("Object tag abandoned, box discarded");
                EditorOutcome::Abandoned
            }
            (LabelPurpose::Interaction { subject, object }, Some(label)) => {
                self.overlay.clear_highlights();
                match self.store.add_link(subject, object, label) {
                    Ok(index) => {
                        self.overlay.refresh_links(&self.store, &[index]);
                        log::info!(
                            "Linked box {} -> {} (total links: {})",
                            subject,
                            object,
                            self.store.link_count()
                        );
                        EditorOutcome::LinkCommitted(index)
                    }
                    Err(err) => self.abort(err),
                }
            }
            (LabelPurpose::Interaction { .. }, None) => {
                self.overlay.clear_highlights();
                log::info!("Interaction label abandoned");
                EditorOutcome::Abandoned
            }
        }
    }

    fn finish_box(&mut self, bbox: BoundingBox) -> EditorOutcome {
        match self.label_kind {
            LabelKind::Person => {
                let index = self.store.add_box(bbox, LabelKind::Person, PERSON_TAG);
                self.overlay.rebuild(&self.store, &[]);
                log::info!(
                    "Created person box {} (total: {})",
                    index,
                    self.store.len()
                );
                EditorOutcome::BoxCommitted(index)
            }
            LabelKind::Object => {
                let request = LabelRequest::new(LabelKind::Object, self.labels.objects());
                self.state = EditState::AwaitingLabel(PendingLabel {
                    request: request.clone(),
                    purpose: LabelPurpose::ObjectTag { bbox },
                });
                log::debug!("Object box finished, waiting for tag");
                EditorOutcome::LabelRequested(request)
            }
            LabelKind::Interaction => EditorOutcome::Unchanged,
        }
    }

    fn pick_interaction_target(&mut self, p: Point) -> EditorOutcome {
        let Some(index) = closest_containing_box(p, self.store.geometry()) else {
            return EditorOutcome::Unchanged;
        };

        match std::mem::take(&mut self.state) {
            EditState::AwaitingSecondTarget(PendingTarget { first }) if first == index => {
                self.overlay.set_highlight(index, false);
                log::debug!("Deselected box {}", index);
                EditorOutcome::Updated
            }
            EditState::AwaitingSecondTarget(PendingTarget { first }) => {
                self.overlay.set_highlight(index, true);
                let request = LabelRequest::new(LabelKind::Interaction, self.labels.interactions());
                self.state = EditState::AwaitingLabel(PendingLabel {
                    request: request.clone(),
                    purpose: LabelPurpose::Interaction {
                        subject: first,
                        object: index,
                    },
                });
                log::debug!("Picked {} -> {}, waiting for interaction", first, index);
                EditorOutcome::LabelRequested(request)
            }
            _ => {
                self.overlay.set_highlight(index, true);
                self.state = EditState::AwaitingSecondTarget(PendingTarget { first: index });
                log::debug!("Selected box {} as subject", index);
                EditorOutcome::Updated
            }
        }
    }

    /// Move a box to new geometry. Returns `false` if the gesture aborted.
    fn apply_geometry(&mut self, index: usize, bbox: BoundingBox) -> bool {
        if let Err(err) = self.store.update_box_geometry(index, bbox) {
            self.abort(err);
            return false;
        }
        self.overlay.refresh_box(&self.store, index, false);
        let touching = self.store.links_touching(index);
        self.overlay.refresh_links(&self.store, &touching);
        true
    }

    fn corner_hint(&self, p: Point) -> CursorHint {
        if nearest_corner(p, self.store.geometry(), CORNER_HINT_RADIUS).is_some() {
            CursorHint::Crosshair
        } else {
            CursorHint::Arrow
        }
    }

    fn abort(&mut self, err: StoreError) -> EditorOutcome {
        log::error!("Aborting {} gesture: {}", self.state.name(), err);
        self.state = EditState::Idle;
        self.overlay.set_preview(None);
        self.overlay.clear_highlights();
        EditorOutcome::Aborted(err)
    }
}
