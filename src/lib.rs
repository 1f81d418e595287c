//! hoi-label - Human-Object Interaction annotation engine
//!
//! Boxes for people and objects are drawn, moved and resized with pointer
//! events, linked pairwise with interaction labels, and persisted as one JSON
//! label file per image. Finished label folders can be exported to ODGT and
//! converted to HICO-style training annotations.

pub mod config;
pub mod console;
pub mod constants;
pub mod editor;
pub mod format;
pub mod keybindings;
pub mod model;
pub mod overlay;
pub mod session;
