//! Summaries returned by batch export and conversion.

use std::path::PathBuf;

/// Result of an export operation.
#[derive(Debug, Default)]
pub struct ExportResult {
    /// Number of label files (images) exported.
    pub images_exported: usize,

    /// Number of boxes exported.
    pub annotations_exported: usize,

    /// Number of interaction links exported.
    pub interactions_exported: usize,

    /// Warnings generated during export (e.g., skipped files).
    pub warnings: Vec<FormatWarning>,

    /// Files created during export.
    pub files_created: Vec<PathBuf>,
}

impl ExportResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_warning(&mut self, warning: FormatWarning) {
        self.warnings.push(warning);
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Check if there were any errors (severe warnings).
    pub fn has_errors(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| matches!(w.severity, WarningSeverity::Error))
    }
}

/// Warning generated during export or conversion.
#[derive(Debug, Clone)]
pub struct FormatWarning {
    /// File this warning relates to (if applicable).
    pub path: Option<PathBuf>,

    /// Human-readable warning message.
    pub message: String,

    pub severity: WarningSeverity,
}

impl FormatWarning {
    pub fn new(message: impl Into<String>, severity: WarningSeverity) -> Self {
        Self {
            path: None,
            message: message.into(),
            severity,
        }
    }

    /// Create an info-level warning.
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, WarningSeverity::Info)
    }

    /// Create a warning-level warning.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message, WarningSeverity::Warning)
    }

    /// Create an error-level warning.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, WarningSeverity::Error)
    }

    /// Set the file this warning relates to.
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }
}

impl std::fmt::Display for FormatWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.path {
            Some(path) => write!(f, "[{:?}] {:?}: {}", self.severity, path, self.message),
            None => write!(f, "[{:?}] {}", self.severity, self.message),
        }
    }
}

/// Severity level for format warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningSeverity {
    /// Informational message, not a problem.
    Info,
    /// Something was skipped.
    Warning,
    /// Something could not be read at all.
    Error,
}
