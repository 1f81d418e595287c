//! Editor states, one struct per state.

use crate::model::{BoundingBox, Corner, Point};

use super::prompt::LabelRequest;

/// First corner fixed, second corner following the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawingBox {
    pub anchor: Point,
    pub current: Point,
}

impl DrawingBox {
    /// The normalized rectangle spanned so far.
    pub fn rect(&self) -> BoundingBox {
        BoundingBox::from_corners(self.anchor, self.current)
    }
}

/// A box body held for dragging.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxGrab {
    pub index: usize,
    pub start: Point,
    /// Geometry before the gesture started.
    pub original: BoundingBox,
}

/// A box corner held for resizing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CornerGrab {
    pub index: usize,
    pub corner: Corner,
    pub start: Point,
    /// Geometry before the gesture started.
    pub original: BoundingBox,
}

/// One interaction endpoint picked, waiting for the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingTarget {
    pub first: usize,
}

/// What a pending label will be used for once it arrives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LabelPurpose {
    /// Tag for a finished object box that is not yet in the store.
    ObjectTag { bbox: BoundingBox },
    /// Label for a link between two picked boxes.
    Interaction { subject: usize, object: usize },
}

/// The editor is suspended on a label prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingLabel {
    pub request: LabelRequest,
    pub purpose: LabelPurpose,
}

/// Pointer gesture state.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EditState {
    #[default]
    Idle,
    DrawingBox(DrawingBox),
    Dragging(BoxGrab),
    Resizing(CornerGrab),
    AwaitingSecondTarget(PendingTarget),
    AwaitingLabel(PendingLabel),
}

impl EditState {
    pub fn name(&self) -> &'static str {
        match self {
            EditState::Idle => "idle",
            EditState::DrawingBox(_) => "drawing",
            EditState::Dragging(_) => "dragging",
            EditState::Resizing(_) => "resizing",
            EditState::AwaitingSecondTarget(_) => "awaiting second target",
            EditState::AwaitingLabel(_) => "awaiting label",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, EditState::Idle)
    }

    /// Whether a label prompt is outstanding.
    pub fn is_suspended(&self) -> bool {
        matches!(self, EditState::AwaitingLabel(_))
    }

    /// Boxes currently picked as interaction endpoints, in pick order.
    pub fn pending_selection(&self) -> Vec<usize> {
        match self {
            EditState::AwaitingSecondTarget(target) => vec![target.first],
            EditState::AwaitingLabel(PendingLabel {
                purpose: LabelPurpose::Interaction { subject, object },
                ..
            }) => vec![*subject, *object],
            _ => Vec::new(),
        }
    }
}
