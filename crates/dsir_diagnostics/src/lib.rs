//! Diagnostic creation, severity management, and rendering.
//!
//! Elaboration failures are surfaced as structured [`Diagnostic`]s carrying a
//! stable code and the AST [`Location`](dsir_source::Location) of the rejected
//! node. The thread-safe [`DiagnosticSink`] collects them while modules of a
//! translation unit are elaborated (possibly in parallel), and
//! [`DiagnosticRenderer`] implementations format them for a terminal or as JSON.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use renderer::{DiagnosticRenderer, JsonRenderer, TerminalRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
