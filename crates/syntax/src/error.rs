//! Typed diagnostics collected by the front end.

use crate::position::Span;
use crate::Text;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single diagnostic with the source span it points at.
///
/// A `critical` error stops the running pass and the whole pipeline;
/// bracket-matching and lexical errors are always critical.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{kind}")]
pub struct CompilationError {
    pub span: Span,
    pub kind: ErrorKind,
    pub critical: bool,
}

impl CompilationError {
    #[must_use]
    pub fn new(span: Span, kind: ErrorKind) -> Self {
        Self {
            span,
            kind,
            critical: false,
        }
    }

    #[must_use]
    pub fn critical(span: Span, kind: ErrorKind) -> Self {
        Self {
            span,
            kind,
            critical: true,
        }
    }
}

/// Everything the front end can complain about.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ErrorKind {
    #[error("unknown symbol '{0}'")]
    UnknownSymbol(char),

    #[error("unmatched quote")]
    UnclosedQuotationMark,

    #[error("invalid escape sequence '\\{0}'")]
    InvalidEscapeSequence(char),

    #[error("unclosed opening bracket '{0}'")]
    UnclosedOpeningBracket(char),

    #[error("missing opening bracket corresponding to '{0}'")]
    MissingOpeningBracket(char),

    #[error("closing bracket '{closing}' does not match '{opening}'")]
    BracketsDoNotMatch { opening: char, closing: char },

    #[error("token '{0}' is not a statement")]
    NotAStatement(Text),

    #[error("expected expression (lvalue for assignment)")]
    ExpectedLvalue,

    #[error("expected expression")]
    ExpectedExpression,

    #[error("expected comma between arguments")]
    ExpectedCommaBetweenArguments,

    #[error("expected expression after comma")]
    ExpectedExpressionAfterComma,

    #[error("invalid function argument")]
    InvalidFunctionArgument,

    #[error("duplicate parameter '{0}'")]
    DuplicateParameter(Text),

    #[error("cannot read source file '{0}'")]
    CannotReadSourceFile(Text),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_glyphs() {
        assert_eq!(
            ErrorKind::UnknownSymbol('@').to_string(),
            "unknown symbol '@'"
        );
        assert_eq!(
            ErrorKind::InvalidEscapeSequence('q').to_string(),
            "invalid escape sequence '\\q'"
        );
        assert_eq!(
            ErrorKind::BracketsDoNotMatch {
                opening: '(',
                closing: ']'
            }
            .to_string(),
            "closing bracket ']' does not match '('"
        );
    }

    #[test]
    fn error_display_delegates_to_kind() {
        let error = CompilationError::critical(
            Span::new(Default::default(), Default::default()),
            ErrorKind::ExpectedExpression,
        );
        assert_eq!(error.to_string(), "expected expression");
        assert!(error.critical);
    }
}
