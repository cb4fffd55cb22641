//! Model to text to model verification.

use oxide_migrations::Operation;
use tracing::debug;

use crate::dsl;
use crate::error::RoundTripError;
use crate::generator::Generator;

/// Generates code for `operations`, reads it back and compares the result
/// with the input, element by element. Returns the generated code.
///
/// # Errors
///
/// Returns [`RoundTripError::Generate`] or [`RoundTripError::Reconstruct`]
/// if either half fails, and [`RoundTripError::LengthMismatch`] or
/// [`RoundTripError::Mismatch`] for the first difference found.
pub fn verify(builder_name: &str, operations: &[Operation]) -> Result<String, RoundTripError> {
    verify_with(&Generator::new(), builder_name, operations)
}

/// Like [`verify`], generating with `generator`.
///
/// # Errors
///
/// See [`verify`].
pub fn verify_with(
    generator: &Generator,
    builder_name: &str,
    operations: &[Operation],
) -> Result<String, RoundTripError> {
    let code = generator.generate_to_string(builder_name, operations)?;
    let reconstructed = dsl::reconstruct(builder_name, &code)?;

    if reconstructed.len() != operations.len() {
        return Err(RoundTripError::LengthMismatch {
            expected: operations.len(),
            actual: reconstructed.len(),
        });
    }
    if let Some((index, (expected, actual))) = operations
        .iter()
        .zip(reconstructed)
        .enumerate()
        .find(|(_, (expected, actual))| *expected != actual)
    {
        return Err(RoundTripError::Mismatch {
            index,
            expected: Box::new(expected.clone()),
            actual: Box::new(actual),
        });
    }

    debug!(operations = operations.len(), "Round trip verified");
    Ok(code)
}
