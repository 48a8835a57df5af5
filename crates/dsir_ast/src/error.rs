//! Errors produced while reading AST documents.

/// An AST document could not be read.
#[derive(Debug, thiserror::Error)]
pub enum AstError {
    /// The document is not valid JSON or does not match the AST shape.
    #[error("malformed AST document: {message}")]
    Json {
        /// 1-based line of the failure, or 0 when unknown.
        line: usize,
        /// 1-based column of the failure, or 0 when unknown.
        column: usize,
        /// The parser's description of the problem.
        message: String,
    },
}

impl From<serde_json::Error> for AstError {
    fn from(err: serde_json::Error) -> Self {
        AstError::Json {
            line: err.line(),
            column: err.column(),
            message: err.to_string(),
        }
    }
}
