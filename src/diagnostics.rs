//! Errors and warnings accumulated during one analysis run

use serde::Serialize;

/// Append-only collector of per-run diagnostics.
///
/// Errors mean an entry or rule was dropped; warnings are advisory. Neither
/// stops the scan, and every renderer surfaces both lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error.
    pub fn error(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::error!(%message, "recorded error");
        self.errors.push(message);
    }

    /// Record a warning.
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(%message, "recorded warning");
        self.warnings.push(message);
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// True when neither errors nor warnings were recorded.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}
