//! Label prompts: the point where the editor suspends until a front end
//! supplies a tag or abandons the request.

use crate::model::LabelKind;

/// The closed label sets offered by the editor.
///
/// Both sets are kept sorted and free of duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSets {
    objects: Vec<String>,
    interactions: Vec<String>,
}

impl LabelSets {
    pub fn new<O, I>(objects: O, interactions: I) -> Self
    where
        O: IntoIterator,
        O::Item: Into<String>,
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            objects: sorted_unique(objects),
            interactions: sorted_unique(interactions),
        }
    }

    pub fn objects(&self) -> &[String] {
        &self.objects
    }

    pub fn interactions(&self) -> &[String] {
        &self.interactions
    }
}

fn sorted_unique<T>(items: T) -> Vec<String>
where
    T: IntoIterator,
    T::Item: Into<String>,
{
    let mut items: Vec<String> = items.into_iter().map(Into::into).collect();
    items.sort();
    items.dedup();
    items
}

/// A pending request for a label from one of the configured sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelRequest {
    /// `Object` for a box tag, `Interaction` for a link label.
    pub kind: LabelKind,
    pub options: Vec<String>,
}

impl LabelRequest {
    pub fn new(kind: LabelKind, options: &[String]) -> Self {
        Self {
            kind,
            options: options.to_vec(),
        }
    }

    /// Prompt title for display.
    pub fn title(&self) -> &'static str {
        match self.kind {
            LabelKind::Interaction => "Select Interaction",
            _ => "Select Label",
        }
    }

    /// Whether `label` is one of the offered options.
    pub fn accepts(&self, label: &str) -> bool {
        self.options.iter().any(|o| o == label)
    }
}

/// A blocking source of labels (a modal dialog, a console prompt, a test stub).
///
/// Returning `None` abandons the request.
pub trait LabelPicker {
    fn pick(&mut self, request: &LabelRequest) -> Option<String>;
}

impl<F> LabelPicker for F
where
    F: FnMut(&LabelRequest) -> Option<String>,
{
    fn pick(&mut self, request: &LabelRequest) -> Option<String> {
        self(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_sets_sorted_and_unique() {
        let sets = LabelSets::new(["cup", "bike", "cup"], ["ride", "hold"]);
        assert_eq!(sets.objects(), ["bike", "cup"]);
        assert_eq!(sets.interactions(), ["hold", "ride"]);
    }

    #[test]
    fn test_request_accepts_only_offered() {
        let sets = LabelSets::new(["cup"], ["hold"]);
        let request = LabelRequest::new(LabelKind::Object, sets.objects());
        assert!(request.accepts("cup"));
        assert!(!request.accepts("hold"));
        assert_eq!(request.title(), "Select Label");
    }

    #[test]
    fn test_closure_is_a_picker() {
        let mut picker = |r: &LabelRequest| r.options.first().cloned();
        let request = LabelRequest::new(LabelKind::Interaction, &["hold".to_string()]);
        assert_eq!(picker.pick(&request), Some("hold".to_string()));
    }
}
