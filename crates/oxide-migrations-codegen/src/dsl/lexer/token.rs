//! Token types for the builder DSL lexer.

use core::fmt;

use super::Span;

/// Reserved words. Matching is case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    New,
    True,
    False,
    Null,
}

impl Keyword {
    /// Looks up a keyword.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "new" => Some(Self::New),
            "true" => Some(Self::True),
            "false" => Some(Self::False),
            "null" => Some(Self::Null),
            _ => None,
        }
    }

    /// Returns the keyword text.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::True => "true",
            Self::False => "false",
            Self::Null => "null",
        }
    }
}

/// Token kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    /// Integer literal without suffix (e.g., 42)
    Integer(u64),
    /// Integer literal with `L` suffix (e.g., 42L)
    Long(u64),
    /// Floating point literal (e.g., 1.5, 1e10, 2D)
    Double(f64),
    /// String literal (e.g., "hello")
    String(String),

    // Identifiers and keywords
    /// Identifier; a verbatim `@new` is read as the identifier `new`
    Identifier(String),
    /// Reserved word
    Keyword(Keyword),

    // Punctuation
    /// =>
    Arrow,
    /// =
    Eq,
    /// -
    Minus,
    /// (
    LeftParen,
    /// )
    RightParen,
    /// {
    LeftBrace,
    /// }
    RightBrace,
    /// [
    LeftBracket,
    /// ]
    RightBracket,
    /// ,
    Comma,
    /// ;
    Semicolon,
    /// .
    Dot,
    /// :
    Colon,

    // Special
    /// End of input
    Eof,
    /// Invalid/unknown token
    Error(String),
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "integer {n}"),
            Self::Long(n) => write!(f, "long {n}L"),
            Self::Double(d) => write!(f, "double {d:?}"),
            Self::String(s) => write!(f, "string {s:?}"),
            Self::Identifier(name) => write!(f, "identifier '{name}'"),
            Self::Keyword(kw) => write!(f, "'{}'", kw.as_str()),
            Self::Arrow => f.write_str("'=>'"),
            Self::Eq => f.write_str("'='"),
            Self::Minus => f.write_str("'-'"),
            Self::LeftParen => f.write_str("'('"),
            Self::RightParen => f.write_str("')'"),
            Self::LeftBrace => f.write_str("'{'"),
            Self::RightBrace => f.write_str("'}'"),
            Self::LeftBracket => f.write_str("'['"),
            Self::RightBracket => f.write_str("']'"),
            Self::Comma => f.write_str("','"),
            Self::Semicolon => f.write_str("';'"),
            Self::Dot => f.write_str("'.'"),
            Self::Colon => f.write_str("':'"),
            Self::Eof => f.write_str("end of input"),
            Self::Error(message) => f.write_str(message),
        }
    }
}

/// A token with its span in the source text.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// The location in the source text.
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns true if this is an EOF token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }
}
