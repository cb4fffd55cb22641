#![allow(dead_code)]

use std::sync::Once;

use oxide_migrations::{MigrationBuilder, Operation};
use oxide_migrations_codegen::{generate, reconstruct, InterpretError};

static TRACING: Once = Once::new();

/// Routes `tracing` output through the test harness.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Generates code for the operations recorded on `mb`.
pub fn render(mb: &MigrationBuilder) -> String {
    init_tracing();
    let mut code = String::new();
    generate("mb", mb.operations(), &mut code)
        .unwrap_or_else(|e| panic!("Failed to generate: {:?}\nError: {e}", mb.operations()));
    code
}

/// Asserts that `mb` generates exactly `expected`, and that executing the
/// generated code records the same operations again.
pub fn check(mb: &MigrationBuilder, expected: &str) -> Vec<Operation> {
    let code = render(mb);
    assert_eq!(code, expected, "Generated code differs");
    let reconstructed = reconstruct("mb", &code)
        .unwrap_or_else(|e| panic!("Failed to reconstruct:\n{code}\nError: {e}"));
    assert_eq!(reconstructed, mb.operations(), "Round trip changed the operations");
    reconstructed
}

/// Executes `source` and returns the error it must fail with.
pub fn run_err(source: &str) -> InterpretError {
    init_tracing();
    reconstruct("mb", source).expect_err(&format!("Expected an error for: {source}"))
}

/// Executes `source`, which must record exactly one operation.
pub fn run_single(source: &str) -> Operation {
    init_tracing();
    let mut operations = reconstruct("mb", source)
        .unwrap_or_else(|e| panic!("Failed to execute: {source}\nError: {e}"));
    assert_eq!(operations.len(), 1, "Expected one operation from: {source}");
    operations.remove(0)
}
