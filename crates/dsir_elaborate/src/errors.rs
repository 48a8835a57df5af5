//! Elaboration errors and their diagnostic codes.
//!
//! Error codes `E300`--`E315` cover elaboration failures. Every failure is
//! fatal for the module being elaborated; [`ElabError::to_diagnostic`] turns
//! one into a [`Diagnostic`] pointing at the rejected AST node.

use dsir_diagnostics::{Category, Diagnostic, DiagnosticCode};
use dsir_ir::{ExprId, IrError, VerifyError};
use dsir_source::Location;

/// A port direction other than `Input`, `Output` or `InOut`.
pub const E300: DiagnosticCode = DiagnosticCode::new(Category::Error, 300);

/// A genvar declared twice in one module.
pub const E301: DiagnosticCode = DiagnosticCode::new(Category::Error, 301);

/// A generate loop over an undeclared genvar.
pub const E302: DiagnosticCode = DiagnosticCode::new(Category::Error, 302);

/// A genvar read before it has a value.
pub const E303: DiagnosticCode = DiagnosticCode::new(Category::Error, 303);

/// A loop condition other than `genvar < expr`.
pub const E304: DiagnosticCode = DiagnosticCode::new(Category::Error, 304);

/// A loop step other than `genvar = genvar + expr`.
pub const E305: DiagnosticCode = DiagnosticCode::new(Category::Error, 305);

/// A statement other than `for` inside a generate region.
pub const E306: DiagnosticCode = DiagnosticCode::new(Category::Error, 306);

/// An unsupported statement in a generate loop body.
pub const E307: DiagnosticCode = DiagnosticCode::new(Category::Error, 307);

/// A bit range whose low index is not the literal `0`.
pub const E308: DiagnosticCode = DiagnosticCode::new(Category::Error, 308);

/// An expression form not allowed where it appears.
pub const E309: DiagnosticCode = DiagnosticCode::new(Category::Error, 309);

/// A recognized construct that is not implemented yet.
pub const E310: DiagnosticCode = DiagnosticCode::new(Category::Error, 310);

/// A port declared twice in one module.
pub const E311: DiagnosticCode = DiagnosticCode::new(Category::Error, 311);

/// Two modules with the same name in one translation unit.
pub const E312: DiagnosticCode = DiagnosticCode::new(Category::Error, 312);

/// Constant folding overflowed under checked arithmetic.
pub const E313: DiagnosticCode = DiagnosticCode::new(Category::Error, 313);

/// An expression referred to an id outside its store.
pub const E314: DiagnosticCode = DiagnosticCode::new(Category::Error, 314);

/// An elaborated module failed IR verification.
pub const E315: DiagnosticCode = DiagnosticCode::new(Category::Error, 315);

/// What went wrong during elaboration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ElabErrorKind {
    /// Port direction is not `Input`, `Output` or `InOut`.
    #[error("unknown port direction `{0}`")]
    UnknownIoKind(String),
    /// `genvar` declared twice.
    #[error("genvar `{0}` is already declared")]
    DuplicateGenvar(String),
    /// Loop over a name that was never declared as a genvar.
    #[error("genvar `{0}` is not declared")]
    UnknownGenvar(String),
    /// A genvar read before any value was assigned.
    #[error("genvar `{0}` is used before it has a value")]
    UninitializedGenvar(String),
    /// Loop condition is not `genvar < expr`.
    #[error("unsupported loop condition: {0}")]
    UnsupportedCondition(String),
    /// Loop step is not `genvar = genvar + expr`.
    #[error("unsupported loop step: {0}")]
    UnsupportedStep(String),
    /// Generate region contains something other than a `for` loop.
    #[error("`{0}` is not supported in a generate region")]
    UnsupportedGenerateStatement(&'static str),
    /// Loop body contains an unsupported statement kind.
    #[error("`{0}` is not supported in a generate loop body")]
    UnknownBodyStatement(&'static str),
    /// Bit range is not of the form `[expr:0]`.
    #[error("invalid width: {0}")]
    InvalidWidth(String),
    /// An expression form is not allowed here.
    #[error("`{0}` is not allowed in this expression")]
    UnknownExpressionNode(String),
    /// A recognized construct that elaboration does not handle yet.
    #[error("{0} is not implemented")]
    NotImplemented(String),
    /// A port name used twice.
    #[error("port `{0}` is already declared")]
    DuplicatePort(String),
    /// A module name used twice in a translation unit.
    #[error("module `{0}` is already declared")]
    DuplicateModule(String),
    /// Folding overflowed under checked arithmetic.
    #[error("{0}")]
    ArithmeticOverflow(String),
    /// A store lookup with a foreign id. Indicates an elaborator bug.
    #[error("internal error: expression {0} is not in the module's store")]
    UnknownExpression(ExprId),
}

/// An elaboration failure at a specific AST node.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}")]
pub struct ElabError {
    /// What went wrong.
    pub kind: ElabErrorKind,
    /// The rejected node.
    pub location: Location,
}

impl ElabError {
    /// Creates an error at `location`.
    pub fn new(kind: ElabErrorKind, location: Location) -> Self {
        Self { kind, location }
    }

    /// Wraps a store error raised while elaborating the node at `location`.
    pub fn from_ir(err: IrError, location: Location) -> Self {
        let kind = match err {
            IrError::UnknownExpression(id) => ElabErrorKind::UnknownExpression(id),
            IrError::ArithmeticOverflow { .. } => ElabErrorKind::ArithmeticOverflow(err.to_string()),
            IrError::DuplicateModule(_) => ElabErrorKind::DuplicateModule(err.to_string()),
        };
        Self { kind, location }
    }

    /// The stable diagnostic code for this error.
    pub fn code(&self) -> DiagnosticCode {
        match self.kind {
            ElabErrorKind::UnknownIoKind(_) => E300,
            ElabErrorKind::DuplicateGenvar(_) => E301,
            ElabErrorKind::UnknownGenvar(_) => E302,
            ElabErrorKind::UninitializedGenvar(_) => E303,
            ElabErrorKind::UnsupportedCondition(_) => E304,
            ElabErrorKind::UnsupportedStep(_) => E305,
            ElabErrorKind::UnsupportedGenerateStatement(_) => E306,
            ElabErrorKind::UnknownBodyStatement(_) => E307,
            ElabErrorKind::InvalidWidth(_) => E308,
            ElabErrorKind::UnknownExpressionNode(_) => E309,
            ElabErrorKind::NotImplemented(_) => E310,
            ElabErrorKind::DuplicatePort(_) => E311,
            ElabErrorKind::DuplicateModule(_) => E312,
            ElabErrorKind::ArithmeticOverflow(_) => E313,
            ElabErrorKind::UnknownExpression(_) => E314,
        }
    }

    /// Converts this error into a diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.code(), self.kind.to_string()).at(self.location.clone());
        match &self.kind {
            ElabErrorKind::UnknownIoKind(_) => {
                diag.with_help("use one of `Input`, `Output` or `InOut`")
            }
            ElabErrorKind::DuplicateGenvar(_) | ElabErrorKind::DuplicatePort(_) => {
                diag.with_help("rename one of the declarations")
            }
            ElabErrorKind::UnknownGenvar(name) => {
                diag.with_help(format!("declare `genvar {name};` before the loop"))
            }
            ElabErrorKind::UninitializedGenvar(name) => diag.with_help(format!(
                "give the loop an initializer such as `{name} = 0`"
            )),
            ElabErrorKind::UnsupportedCondition(_) => {
                diag.with_note("loop conditions must have the form `genvar < expr`")
            }
            ElabErrorKind::UnsupportedStep(_) => {
                diag.with_note("loop steps must have the form `genvar = genvar + expr`")
            }
            ElabErrorKind::UnsupportedGenerateStatement(_) => {
                diag.with_note("only `for` loops are elaborated inside generate regions")
            }
            ElabErrorKind::UnknownBodyStatement(_) => {
                diag.with_note("a generate loop body may hold a single assignment")
            }
            ElabErrorKind::InvalidWidth(_) => diag.with_help("write the range as `[N:0]`"),
            ElabErrorKind::UnknownExpressionNode(_) => diag,
            ElabErrorKind::NotImplemented(_) => diag,
            ElabErrorKind::DuplicateModule(_) => {
                diag.with_note("the first declaration is kept; this one is skipped")
            }
            ElabErrorKind::ArithmeticOverflow(_) => {
                diag.with_help("set `arithmetic = \"wrapping\"` to allow wraparound")
            }
            ElabErrorKind::UnknownExpression(_) => diag,
        }
    }
}

/// Creates a diagnostic for a module that failed IR verification.
pub fn error_verification(module: &str, err: &VerifyError) -> Diagnostic {
    Diagnostic::error(E315, format!("module `{module}` failed verification: {err}"))
        .with_note("this indicates a bug in the elaborator")
}
