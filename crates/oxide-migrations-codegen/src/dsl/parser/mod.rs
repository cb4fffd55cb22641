//! Builder DSL parser
//!
//! A hand-written recursive descent parser producing [`Invocation`]
//! statements.
//!
//! [`Invocation`]: crate::dsl::ast::Invocation

mod error;
mod parser;

pub use error::ParseError;
pub use parser::Parser;
