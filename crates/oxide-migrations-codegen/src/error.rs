//! Error types for code generation and round-trip verification.

use oxide_migrations::{Operation, OperationKind};

use crate::dsl::InterpretError;

/// Errors raised while generating builder code.
///
/// Every variant except [`CodegenError::Write`] is a precondition failure,
/// detected before any text reaches the sink.
#[derive(Debug, thiserror::Error)]
pub enum CodegenError {
    /// The sink refused the generated text.
    #[error("Failed to write generated code: {0}")]
    Write(#[from] core::fmt::Error),

    /// The builder variable name is not a usable identifier.
    #[error("Invalid builder name '{0}'")]
    InvalidBuilderName(String),

    /// A required field is empty.
    #[error("{operation}: required field '{field}' is empty")]
    MissingField {
        /// Operation kind.
        operation: OperationKind,
        /// Field name.
        field: &'static str,
    },

    /// An optional identifier is present but empty.
    #[error("{operation}: field '{field}' is set to an empty string")]
    EmptyField {
        /// Operation kind.
        operation: OperationKind,
        /// Field name.
        field: &'static str,
    },

    /// A column has both a default value and a default expression.
    #[error("{operation}: column '{column}' has both a default value and a default expression")]
    ConflictingDefault {
        /// Operation kind.
        operation: OperationKind,
        /// Column name.
        column: String,
    },

    /// Two columns of one table map to the same identifier.
    #[error(
        "Columns '{first}' and '{second}' of table '{table}' both map to identifier '{identifier}'"
    )]
    IdentifierCollision {
        /// Table name.
        table: String,
        /// The shared identifier.
        identifier: String,
        /// First column name.
        first: String,
        /// Second column name.
        second: String,
    },

    /// A constraint of a new table selects a column the table does not declare.
    #[error("{operation}: column '{column}' is not declared by table '{table}'")]
    UnknownColumn {
        /// Constraint kind.
        operation: OperationKind,
        /// Table name.
        table: String,
        /// Column name.
        column: String,
    },

    /// A child of a new table names a different table or schema.
    #[error("{operation}: field '{field}' does not match table '{table}'")]
    ParentMismatch {
        /// Child kind.
        operation: OperationKind,
        /// Field name (`table` or `schema`).
        field: &'static str,
        /// Parent table name.
        table: String,
    },
}

/// Result type for code generation.
pub type Result<T> = std::result::Result<T, CodegenError>;

/// Errors raised by [`verify`](crate::roundtrip::verify).
#[derive(Debug, thiserror::Error)]
pub enum RoundTripError {
    /// The operations could not be rendered.
    #[error("Generation failed: {0}")]
    Generate(#[from] CodegenError),

    /// The generated code could not be executed.
    #[error("Reconstruction failed: {0}")]
    Reconstruct(#[from] InterpretError),

    /// The reconstructed sequence has a different length.
    #[error("Expected {expected} operations, reconstructed {actual}")]
    LengthMismatch {
        /// Number of input operations.
        expected: usize,
        /// Number of reconstructed operations.
        actual: usize,
    },

    /// An operation did not survive the round trip.
    #[error("Operation {index} differs after round trip: expected {expected}, got {actual}")]
    Mismatch {
        /// Position in the sequence.
        index: usize,
        /// The input operation.
        expected: Box<Operation>,
        /// The reconstructed operation.
        actual: Box<Operation>,
    },
}
