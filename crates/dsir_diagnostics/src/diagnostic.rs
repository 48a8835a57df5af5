//! Structured diagnostic messages.

use crate::code::DiagnosticCode;
use crate::severity::Severity;
use dsir_source::Location;
use serde::Serialize;

/// A structured diagnostic message.
///
/// Each diagnostic has a severity, a stable code, a message, and (when the
/// problem can be pinned to an AST node) the node's [`Location`]. Notes and
/// help lines add context.
#[derive(Clone, Debug, Serialize)]
pub struct Diagnostic {
    /// The severity level of this diagnostic.
    pub severity: Severity,
    /// The unique code identifying the kind of diagnostic.
    pub code: DiagnosticCode,
    /// The main diagnostic message.
    pub message: String,
    /// The AST node the diagnostic refers to, if any.
    pub location: Option<Location>,
    /// Explanatory footnotes.
    pub notes: Vec<String>,
    /// Actionable suggestions.
    pub help: Vec<String>,
}

impl Diagnostic {
    /// Creates a new error diagnostic.
    pub fn error(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, code, message)
    }

    /// Creates a new warning diagnostic.
    pub fn warning(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, code, message)
    }

    fn new(severity: Severity, code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            location: None,
            notes: Vec::new(),
            help: Vec::new(),
        }
    }

    /// Attaches the AST location this diagnostic refers to.
    pub fn at(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Adds a note to this diagnostic.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Adds a help message to this diagnostic.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help.push(help.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::Category;
    use dsir_source::NodePath;

    #[test]
    fn create_error() {
        let code = DiagnosticCode::new(Category::Error, 301);
        let diag = Diagnostic::error(code, "duplicate genvar `i`");
        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.message, "duplicate genvar `i`");
        assert!(diag.location.is_none());
    }

    #[test]
    fn builder_methods() {
        let code = DiagnosticCode::new(Category::Error, 308);
        let diag = Diagnostic::error(code, "invalid width")
            .at(Location::detached(NodePath::root().field("body").index(0)))
            .with_note("the low index of a range must be the literal 0")
            .with_help("write the range as `[N:0]`");
        assert!(diag.location.is_some());
        assert_eq!(diag.notes.len(), 1);
        assert_eq!(diag.help.len(), 1);
    }

    #[test]
    fn create_warning() {
        let code = DiagnosticCode::new(Category::Warning, 300);
        let diag = Diagnostic::warning(code, "statement skipped");
        assert_eq!(diag.severity, Severity::Warning);
    }
}
