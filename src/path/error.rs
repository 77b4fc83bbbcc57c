//! Error types for path tokenizing and evaluation.

use super::ast::Path;

/// Errors raised while tokenizing a path expression.
///
/// Positions are zero-based character offsets into the expression.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// A character that no rule accepts at this position.
    #[error("Unexpected character '{found}' at position {position}, expected {expected}")]
    UnexpectedCharacter {
        position: usize,
        found: char,
        expected: &'static str,
    },
    /// The expression ended inside an index or an escape.
    #[error("Unexpected end of expression at position {position}, expected {expected}")]
    UnexpectedEnd {
        position: usize,
        expected: &'static str,
    },
    /// An index literal that does not fit the platform's index type.
    #[error("Index '{literal}' at position {position} is out of range")]
    InvalidIndex { position: usize, literal: String },
}

/// Errors raised by [`evaluate`](super::evaluator::evaluate).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PathError {
    /// The expression could not be tokenized.
    #[error("Invalid path expression: {0}")]
    Parse(#[from] ParseError),
    /// A key or index along the path does not exist.
    #[error("Nothing found at '{path}'")]
    Lookup { path: Path },
    /// A step was applied to the wrong kind of value.
    #[error("Expected {expected} at '{path}', found {found}")]
    TypeMismatch {
        path: Path,
        expected: &'static str,
        found: &'static str,
    },
    /// An unknown action, or an action that cannot apply to this path.
    #[error("{message}")]
    Configuration { message: String },
}

impl PathError {
    /// Returns true for errors a `default` value may stand in for.
    pub fn is_lookup(&self) -> bool {
        matches!(self, PathError::Lookup { .. })
    }
}
