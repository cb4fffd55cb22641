//! Syntax tree of builder DSL source.

use super::lexer::Span;

/// A method call statement, `target.Method(args)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    /// Receiver identifier (`mb`, or a lambda parameter such as `table`).
    pub target: String,
    /// Method name.
    pub method: String,
    /// Arguments in source order.
    pub args: Vec<Argument>,
    /// Span of the whole call.
    pub span: Span,
}

/// A call argument, optionally named (`name: value`).
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    /// Parameter name for named arguments.
    pub name: Option<String>,
    /// Argument value.
    pub value: Expr,
    /// Span of the argument including its name.
    pub span: Span,
}

/// An expression with its span.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    /// Expression kind.
    pub kind: ExprKind,
    /// Source location.
    pub span: Span,
}

/// Expression kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// A literal value.
    Literal(Literal),
    /// A dotted name, `ReferentialAction.Cascade` or `x.Id`.
    Path(Vec<String>),
    /// `new[] { a, b }`
    Array(Vec<Expr>),
    /// `new { Name = value, x.Id }`
    Object(Vec<Member>),
    /// `param => body`
    Lambda {
        /// Parameter name.
        param: String,
        /// Lambda body.
        body: LambdaBody,
    },
    /// A nested call, `table.Column(...)`.
    Call(Invocation),
}

/// Body of a lambda.
#[derive(Debug, Clone, PartialEq)]
pub enum LambdaBody {
    /// A single expression.
    Expr(Box<Expr>),
    /// A statement block, `{ a.B(); a.C(); }`.
    Block(Vec<Invocation>),
}

/// Member of an anonymous object.
#[derive(Debug, Clone, PartialEq)]
pub enum Member {
    /// `Name = value`
    Named {
        /// Member name.
        name: String,
        /// Member value.
        value: Expr,
        /// Span of the member.
        span: Span,
    },
    /// A projected path, `x.Id`.
    Path {
        /// Path segments.
        segments: Vec<String>,
        /// Span of the path.
        span: Span,
    },
}

/// Literal values.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Integer, sign applied. `long` is set for `L`-suffixed literals.
    Integer {
        /// Value.
        value: i128,
        /// Whether the literal carried the `L` suffix.
        long: bool,
    },
    /// Floating point number.
    Double(f64),
    /// String.
    String(String),
    /// `true` or `false`.
    Bool(bool),
    /// `null`
    Null,
}
