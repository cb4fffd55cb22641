//! The builder call language read back by the round trip.
//!
//! Source is a sequence of `target.Method(args);` statements, where the
//! arguments use the literal forms the generator writes: strings, `int`
//! and `L`-suffixed `long` integers, doubles, booleans, `null`,
//! `new[] { ... }` arrays, `ReferentialAction.X` and `double.NaN` style
//! paths, and the lambdas of the nested `CreateTable` blocks.

pub mod ast;
pub mod interpreter;
pub mod lexer;
pub mod parser;

pub use interpreter::{reconstruct, InterpretError, Interpreter};
pub use lexer::Span;
pub use parser::ParseError;
