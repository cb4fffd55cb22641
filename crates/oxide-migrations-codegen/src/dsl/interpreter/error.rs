//! Interpreter error types.

use crate::dsl::lexer::Span;
use crate::dsl::parser::ParseError;

/// Errors raised while executing builder DSL source.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InterpretError {
    /// The source does not parse.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A call addresses something other than the builder in scope.
    #[error("Unknown target '{found}' at {span}: expected '{expected}'")]
    UnknownTarget {
        /// The receiver in scope.
        expected: String,
        /// The receiver used.
        found: String,
        /// Location of the call.
        span: Span,
    },

    /// The method does not exist on the receiver.
    #[error("Unknown method '{method}' at {span}")]
    UnknownMethod {
        /// Method name.
        method: String,
        /// Location of the call.
        span: Span,
    },

    /// A named argument matches no parameter.
    #[error("{method} has no parameter '{argument}' (at {span})")]
    UnknownArgument {
        /// Method name.
        method: String,
        /// Argument name.
        argument: String,
        /// Location of the argument.
        span: Span,
    },

    /// Two arguments bind the same parameter.
    #[error("{method}: parameter '{argument}' is given more than once (at {span})")]
    DuplicateArgument {
        /// Method name.
        method: String,
        /// Parameter name.
        argument: String,
        /// Location of the second argument.
        span: Span,
    },

    /// A required parameter has no argument.
    #[error("{method}: missing required argument '{argument}' (at {span})")]
    MissingArgument {
        /// Method name.
        method: String,
        /// Parameter name.
        argument: String,
        /// Location of the call.
        span: Span,
    },

    /// More positional arguments than parameters.
    #[error("{method}: too many arguments (at {span})")]
    TooManyArguments {
        /// Method name.
        method: String,
        /// Location of the first extra argument.
        span: Span,
    },

    /// A positional argument follows a named one.
    #[error("{method}: positional argument after named arguments (at {span})")]
    PositionalAfterNamed {
        /// Method name.
        method: String,
        /// Location of the positional argument.
        span: Span,
    },

    /// An argument value has the wrong type.
    #[error("Argument '{argument}' expects {expected} (at {span})")]
    TypeMismatch {
        /// Parameter name.
        argument: String,
        /// Expected value type.
        expected: &'static str,
        /// Location of the value.
        span: Span,
    },

    /// An integer does not fit the parameter type.
    #[error("Argument '{argument}' is out of range for {expected} (at {span})")]
    OutOfRange {
        /// Parameter name.
        argument: String,
        /// Target integer type.
        expected: &'static str,
        /// Location of the value.
        span: Span,
    },

    /// Two mutually exclusive arguments are both given.
    #[error("{method}: '{first}' and '{second}' cannot both be given (at {span})")]
    ConflictingArguments {
        /// Method name.
        method: String,
        /// First argument.
        first: &'static str,
        /// Second argument.
        second: &'static str,
        /// Location of the call.
        span: Span,
    },

    /// A selector references an identifier the columns block does not declare.
    #[error("Unknown column identifier '{identifier}' at {span}")]
    UnknownColumn {
        /// The identifier used.
        identifier: String,
        /// Location of the selector.
        span: Span,
    },

    /// The columns block declares an identifier twice.
    #[error("Column identifier '{identifier}' is declared twice (at {span})")]
    DuplicateColumn {
        /// The identifier.
        identifier: String,
        /// Location of the second declaration.
        span: Span,
    },

    /// A table declares more than one primary key.
    #[error("Table '{table}' declares more than one primary key (at {span})")]
    DuplicatePrimaryKey {
        /// Table name.
        table: String,
        /// Location of the second declaration.
        span: Span,
    },

    /// `ReferentialAction.X` names no action.
    #[error("Unknown referential action '{name}' at {span}")]
    UnknownReferentialAction {
        /// The name used.
        name: String,
        /// Location of the value.
        span: Span,
    },
}

impl InterpretError {
    /// Returns the source location of the error.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Parse(e) => e.span,
            Self::UnknownTarget { span, .. }
            | Self::UnknownMethod { span, .. }
            | Self::UnknownArgument { span, .. }
            | Self::DuplicateArgument { span, .. }
            | Self::MissingArgument { span, .. }
            | Self::TooManyArguments { span, .. }
            | Self::PositionalAfterNamed { span, .. }
            | Self::TypeMismatch { span, .. }
            | Self::OutOfRange { span, .. }
            | Self::ConflictingArguments { span, .. }
            | Self::UnknownColumn { span, .. }
            | Self::DuplicateColumn { span, .. }
            | Self::DuplicatePrimaryKey { span, .. }
            | Self::UnknownReferentialAction { span, .. } => *span,
        }
    }
}

/// Result type for the interpreter.
pub type Result<T> = std::result::Result<T, InterpretError>;
