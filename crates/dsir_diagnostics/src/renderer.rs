//! Diagnostic rendering backends for human-readable and machine-readable output.

use crate::diagnostic::Diagnostic;
use crate::severity::Severity;
use dsir_source::SourceDb;
use serde::Serialize;

/// Trait for rendering diagnostics into formatted output strings.
pub trait DiagnosticRenderer {
    /// Renders a single diagnostic into a formatted string.
    fn render(&self, diag: &Diagnostic, source_db: &SourceDb) -> String;
}

/// Renders diagnostics in a rustc-style terminal format.
///
/// Produces output like:
/// ```text
/// error[E304]: genvar `j` is not declared
///   --> ast/gen.json: body[3].Generate[0].For
///    = help: declare `genvar j;` before the generate loop
/// ```
pub struct TerminalRenderer {
    /// Whether to use ANSI color codes in output.
    pub color: bool,
    /// The terminal width. Notes longer than this are wrapped.
    pub width: u16,
}

impl TerminalRenderer {
    /// Creates a new terminal renderer.
    pub fn new(color: bool, width: u16) -> Self {
        Self { color, width }
    }

    fn header(&self, diag: &Diagnostic) -> String {
        let label = format!("{}[{}]", diag.severity, diag.code);
        if !self.color {
            return label;
        }
        let color = match diag.severity {
            Severity::Error => "31",
            Severity::Warning => "33",
            Severity::Note | Severity::Help => "36",
        };
        format!("\x1b[1;{color}m{label}\x1b[0m")
    }

    fn footer(&self, out: &mut String, kind: &str, text: &str) {
        let prefix = format!("   = {kind}: ");
        let indent = " ".repeat(prefix.len());
        let room = (self.width as usize).saturating_sub(prefix.len()).max(20);
        let mut line = String::new();
        let mut first = true;
        for word in text.split_whitespace() {
            if !line.is_empty() && line.len() + 1 + word.len() > room {
                out.push_str(if first { &prefix } else { &indent });
                out.push_str(&line);
                out.push('\n');
                line.clear();
                first = false;
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
        }
        out.push_str(if first { &prefix } else { &indent });
        out.push_str(&line);
        out.push('\n');
    }
}

impl DiagnosticRenderer for TerminalRenderer {
    fn render(&self, diag: &Diagnostic, source_db: &SourceDb) -> String {
        let mut out = format!("{}: {}\n", self.header(diag), diag.message);

        if let Some(location) = &diag.location {
            match source_db.resolve(location) {
                Some(resolved) => out.push_str(&format!("  --> {resolved}\n")),
                None if !location.path.is_root() => {
                    out.push_str(&format!("  --> {}\n", location.path))
                }
                None => {}
            }
        }

        for note in &diag.notes {
            self.footer(&mut out, "note", note);
        }
        for help in &diag.help {
            self.footer(&mut out, "help", help);
        }

        out
    }
}

/// Renders each diagnostic as a single-line JSON object.
///
/// The location is resolved against the [`SourceDb`] so consumers get a file
/// path rather than an opaque file id.
#[derive(Default)]
pub struct JsonRenderer;

#[derive(Serialize)]
struct JsonDiagnostic<'a> {
    severity: Severity,
    code: String,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    node: Option<String>,
    notes: &'a [String],
    help: &'a [String],
}

impl DiagnosticRenderer for JsonRenderer {
    fn render(&self, diag: &Diagnostic, source_db: &SourceDb) -> String {
        let resolved = diag.location.as_ref().and_then(|l| source_db.resolve(l));
        let record = JsonDiagnostic {
            severity: diag.severity,
            code: diag.code.to_string(),
            message: &diag.message,
            file: resolved
                .as_ref()
                .map(|r| r.file_path.display().to_string()),
            node: diag.location.as_ref().map(|l| l.path.to_string()),
            notes: &diag.notes,
            help: &diag.help,
        };
        // Serializing plain strings and unit enums into a String cannot fail.
        serde_json::to_string(&record).unwrap_or_default()
    }
}
