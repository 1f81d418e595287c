//! Customizable single-key shortcuts.
//!
//! Keys are plain characters, matched case-insensitively.

use serde::{Deserialize, Serialize};

/// Action triggered by a shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    PreviousImage,
    NextImage,
    SelectPerson,
    SelectObject,
    SelectInteraction,
    Reset,
}

impl KeyAction {
    pub fn name(&self) -> &'static str {
        match self {
            KeyAction::PreviousImage => "Previous image",
            KeyAction::NextImage => "Next image",
            KeyAction::SelectPerson => "Person mode",
            KeyAction::SelectObject => "Object mode",
            KeyAction::SelectInteraction => "Interaction mode",
            KeyAction::Reset => "Reset annotations",
        }
    }

    pub fn all() -> &'static [KeyAction] {
        &[
            KeyAction::PreviousImage,
            KeyAction::NextImage,
            KeyAction::SelectPerson,
            KeyAction::SelectObject,
            KeyAction::SelectInteraction,
            KeyAction::Reset,
        ]
    }
}

/// Keybinding configuration for the application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub previous_image: char,
    pub next_image: char,
    pub select_person: char,
    pub select_object: char,
    pub select_interaction: char,
    pub reset: char,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            previous_image: 'a',
            next_image: 'f',
            select_person: 'p',
            select_object: 'o',
            select_interaction: 'i',
            reset: 'r',
        }
    }
}

impl KeyBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the action that corresponds to a key press, if any.
    pub fn action_for_key(&self, key: char) -> Option<KeyAction> {
        KeyAction::all()
            .iter()
            .copied()
            .find(|&action| self.key_for_action(action).eq_ignore_ascii_case(&key))
    }

    pub fn key_for_action(&self, action: KeyAction) -> char {
        match action {
            KeyAction::PreviousImage => self.previous_image,
            KeyAction::NextImage => self.next_image,
            KeyAction::SelectPerson => self.select_person,
            KeyAction::SelectObject => self.select_object,
            KeyAction::SelectInteraction => self.select_interaction,
            KeyAction::Reset => self.reset,
        }
    }

    pub fn set_key(&mut self, action: KeyAction, key: char) {
        match action {
            KeyAction::PreviousImage => self.previous_image = key,
            KeyAction::NextImage => self.next_image = key,
            KeyAction::SelectPerson => self.select_person = key,
            KeyAction::SelectObject => self.select_object = key,
            KeyAction::SelectInteraction => self.select_interaction = key,
            KeyAction::Reset => self.reset = key,
        }
    }

    /// Check if a key is already used by another binding.
    /// Returns the conflicting action, if any.
    pub fn key_conflict(&self, key: char, exclude: Option<KeyAction>) -> Option<KeyAction> {
        KeyAction::all().iter().copied().find(|&action| {
            Some(action) != exclude && self.key_for_action(action).eq_ignore_ascii_case(&key)
        })
    }

    /// One line per binding, for help output.
    pub fn describe(&self) -> Vec<String> {
        KeyAction::all()
            .iter()
            .map(|&action| format!("{}  {}", self.key_for_action(action), action.name()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_shortcuts() {
        let keys = KeyBindings::new();
        assert_eq!(keys.action_for_key('a'), Some(KeyAction::PreviousImage));
        assert_eq!(keys.action_for_key('f'), Some(KeyAction::NextImage));
        assert_eq!(keys.action_for_key('p'), Some(KeyAction::SelectPerson));
        assert_eq!(keys.action_for_key('o'), Some(KeyAction::SelectObject));
        assert_eq!(keys.action_for_key('I'), Some(KeyAction::SelectInteraction));
        assert_eq!(keys.action_for_key('r'), Some(KeyAction::Reset));
        assert_eq!(keys.action_for_key('z'), None);
    }

    #[test]
    fn test_rebind_and_conflict() {
        let mut keys = KeyBindings::new();
        keys.set_key(KeyAction::NextImage, 'd');
        assert_eq!(keys.action_for_key('d'), Some(KeyAction::NextImage));
        assert_eq!(keys.action_for_key('f'), None);
        assert_eq!(
            keys.key_conflict('p', Some(KeyAction::Reset)),
            Some(KeyAction::SelectPerson)
        );
        assert_eq!(keys.key_conflict('d', Some(KeyAction::NextImage)), None);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let keys: KeyBindings = serde_json::from_str(r#"{"reset": "x"}"#).unwrap();
        assert_eq!(keys.reset, 'x');
        assert_eq!(keys.next_image, 'f');
    }
}
