//! Parser error types.

use crate::dsl::lexer::{Span, TokenKind};

/// A parse error.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    /// The error message.
    pub message: String,
    /// The location of the error.
    pub span: Span,
    /// Expected tokens (if applicable).
    pub expected: Option<String>,
    /// The actual token found.
    pub found: Option<TokenKind>,
}

impl ParseError {
    /// Creates a new parse error.
    #[must_use]
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
            expected: None,
            found: None,
        }
    }

    /// Creates an "unexpected token" error.
    #[must_use]
    pub fn unexpected(expected: impl Into<String>, found: TokenKind, span: Span) -> Self {
        let expected: String = expected.into();
        if found == TokenKind::Eof {
            return Self::unexpected_eof(expected, span);
        }
        Self {
            message: format!("Unexpected token: expected {expected}, found {found}"),
            span,
            expected: Some(expected),
            found: Some(found),
        }
    }

    /// Creates an "unexpected end of input" error.
    #[must_use]
    pub fn unexpected_eof(expected: impl Into<String>, span: Span) -> Self {
        let expected: String = expected.into();
        Self {
            message: format!("Unexpected end of input: expected {expected}"),
            span,
            expected: Some(expected),
            found: Some(TokenKind::Eof),
        }
    }
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} at position {}", self.message, self.span)
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unexpected_display() {
        let err = ParseError::unexpected("')'", TokenKind::Comma, Span::new(4, 5));
        assert_eq!(
            err.to_string(),
            "Unexpected token: expected ')', found ',' at position 4..5"
        );
        assert_eq!(err.expected.as_deref(), Some("')'"));
    }

    #[test]
    fn test_unexpected_eof() {
        let err = ParseError::unexpected("';'", TokenKind::Eof, Span::new(9, 9));
        assert_eq!(err.found, Some(TokenKind::Eof));
        assert!(err.message.starts_with("Unexpected end of input"));
    }
}
