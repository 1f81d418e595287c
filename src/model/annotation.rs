//! Annotation types: labelled boxes and the interaction links between them.

use serde::{Deserialize, Serialize};

use super::geometry::BoundingBox;

/// Tag used for every person box.
pub const PERSON_TAG: &str = "person";

/// Label kinds available in the editor.
///
/// The same enum is used for the active drawing mode and for the kind recorded
/// on each box. Boxes are only ever drawn as `Person` or `Object`;
/// `Interaction` selects the linking mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelKind {
    #[default]
    Person,
    Object,
    Interaction,
}

impl LabelKind {
    /// Get the display name for this kind.
    pub fn name(&self) -> &'static str {
        match self {
            LabelKind::Person => "person",
            LabelKind::Object => "object",
            LabelKind::Interaction => "interaction",
        }
    }

    /// Get all label kinds.
    pub fn all() -> &'static [LabelKind] {
        &[LabelKind::Person, LabelKind::Object, LabelKind::Interaction]
    }

    /// Infer the kind of a persisted box from its tag.
    pub fn for_tag(tag: &str) -> Self {
        if tag == PERSON_TAG {
            LabelKind::Person
        } else {
            LabelKind::Object
        }
    }

    /// RGB outline color used for boxes of this kind.
    pub fn color(&self) -> [u8; 3] {
        match self {
            LabelKind::Person => [0, 0, 255],
            LabelKind::Object => [0, 128, 0],
            LabelKind::Interaction => [255, 0, 0],
        }
    }
}

/// A box together with its kind and tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedBox {
    pub bbox: BoundingBox,
    pub kind: LabelKind,
    pub tag: String,
}

impl AnnotatedBox {
    pub fn new(bbox: BoundingBox, kind: LabelKind, tag: impl Into<String>) -> Self {
        Self {
            bbox: bbox.normalize(),
            kind,
            tag: tag.into(),
        }
    }
}

/// A directed "subject performs interaction on object" relation.
///
/// Endpoints are store indices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionLink {
    pub subject: usize,
    pub object: usize,
    pub interaction: String,
}

impl InteractionLink {
    pub fn new(subject: usize, object: usize, interaction: impl Into<String>) -> Self {
        Self {
            subject,
            object,
            interaction: interaction.into(),
        }
    }

    /// Whether either endpoint is `index`.
    pub fn touches(&self, index: usize) -> bool {
        self.subject == index || self.object == index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_tag() {
        assert_eq!(LabelKind::for_tag("person"), LabelKind::Person);
        assert_eq!(LabelKind::for_tag("cup"), LabelKind::Object);
        assert_eq!(LabelKind::for_tag("Person"), LabelKind::Object);
    }

    #[test]
    fn test_kind_colors_differ() {
        let colors: Vec<_> = LabelKind::all().iter().map(|k| k.color()).collect();
        assert_ne!(colors[0], colors[1]);
        assert_ne!(colors[1], colors[2]);
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        let json = serde_json::to_string(&LabelKind::Interaction).unwrap();
        assert_eq!(json, "\"interaction\"");
    }

    #[test]
    fn test_new_box_is_normalized() {
        let b = AnnotatedBox::new(
            BoundingBox {
                x1: 50.0,
                y1: 60.0,
                x2: 10.0,
                y2: 20.0,
            },
            LabelKind::Object,
            "cup",
        );
        assert!(b.bbox.is_normalized());
    }

    #[test]
    fn test_link_touches() {
        let link = InteractionLink::new(0, 2, "hold");
        assert!(link.touches(0));
        assert!(link.touches(2));
        assert!(!link.touches(1));
    }
}
