//! # oxide-migrations-codegen
//!
//! Renders schema-migration operations as migration builder calls, and reads
//! those calls back into operations.
//!
//! This crate provides:
//! - [`generate`] and [`Generator`], one builder call per operation with
//!   defaults left out and literal widths preserved
//! - [`dsl`], a lexer, parser and interpreter for the generated calls
//! - [`roundtrip::verify`], which checks that operations survive the trip
//!   through text unchanged
//!
//! ```rust
//! use oxide_migrations::MigrationBuilder;
//! use oxide_migrations_codegen::{generate, reconstruct};
//!
//! let mut mb = MigrationBuilder::new();
//! mb.create_index("IX_Post_Title", "Post", ["Title", "Subtitle"]);
//!
//! let mut code = String::new();
//! generate("mb", mb.operations(), &mut code).unwrap();
//! assert_eq!(
//!     code,
//!     "mb.CreateIndex(\n    name: \"IX_Post_Title\",\n    table: \"Post\",\n    columns: new[] { \"Title\", \"Subtitle\" });\n"
//! );
//!
//! assert_eq!(reconstruct("mb", &code).unwrap(), mb.into_operations());
//! ```

pub mod dsl;
pub mod error;
pub mod generator;
pub mod identifier;
pub mod literal;
pub mod options;
pub mod precondition;
pub mod roundtrip;
mod writer;

pub use dsl::{reconstruct, InterpretError, Interpreter, ParseError};
pub use error::{CodegenError, Result, RoundTripError};
pub use generator::{generate, CallShape, Generator, Layout, Naming};
pub use options::{CodegenOptions, LineEnding};
pub use roundtrip::verify;
