//! Argument binding and literal conversion.
//!
//! [`Bound::bind`] matches the arguments of one call against a parameter
//! list. Positional arguments fill parameters in declaration order, named
//! arguments go to the parameter of that name, and a `null` argument counts
//! as absent. The typed accessors then convert the bound expressions.

use oxide_migrations::{DefaultValue, ReferentialAction};

use super::error::{InterpretError, Result};
use crate::dsl::ast::{Expr, ExprKind, Invocation, LambdaBody, Literal};
use crate::dsl::lexer::Span;

/// A declared parameter of a builder method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Param {
    /// Parameter name as written in named arguments.
    pub name: &'static str,
    /// Whether the call fails without it.
    pub required: bool,
}

/// A required parameter.
pub const fn req(name: &'static str) -> Param {
    Param {
        name,
        required: true,
    }
}

/// An optional parameter.
pub const fn opt(name: &'static str) -> Param {
    Param {
        name,
        required: false,
    }
}

/// A lambda argument.
#[derive(Debug, Clone, Copy)]
pub struct Lambda<'a> {
    pub param: &'a str,
    pub body: &'a LambdaBody,
    pub span: Span,
}

/// The arguments of one call, bound to its parameter list.
#[derive(Debug)]
pub struct Bound<'a> {
    method: &'a str,
    span: Span,
    params: &'static [Param],
    values: Vec<Option<&'a Expr>>,
}

impl<'a> Bound<'a> {
    /// Binds the arguments of `call` to `params`.
    pub fn bind(call: &'a Invocation, params: &'static [Param]) -> Result<Self> {
        let mut values: Vec<Option<&'a Expr>> = vec![None; params.len()];
        let mut named = false;

        for (position, argument) in call.args.iter().enumerate() {
            let index = match &argument.name {
                Some(name) => {
                    named = true;
                    params
                        .iter()
                        .position(|param| param.name == name)
                        .ok_or_else(|| InterpretError::UnknownArgument {
                            method: call.method.clone(),
                            argument: name.clone(),
                            span: argument.span,
                        })?
                }
                None if named => {
                    return Err(InterpretError::PositionalAfterNamed {
                        method: call.method.clone(),
                        span: argument.span,
                    });
                }
                None if position >= params.len() => {
                    return Err(InterpretError::TooManyArguments {
                        method: call.method.clone(),
                        span: argument.span,
                    });
                }
                None => position,
            };
            if values[index].is_some() {
                return Err(InterpretError::DuplicateArgument {
                    method: call.method.clone(),
                    argument: params[index].name.to_string(),
                    span: argument.span,
                });
            }
            values[index] = Some(&argument.value);
        }

        let bound = Self {
            method: &call.method,
            span: call.span,
            params,
            values,
        };
        if let Some(param) = params
            .iter()
            .find(|param| param.required && bound.value(param.name).is_none())
        {
            return Err(bound.missing(param.name));
        }
        Ok(bound)
    }

    fn value(&self, name: &str) -> Option<&'a Expr> {
        self.params
            .iter()
            .position(|param| param.name == name)
            .and_then(|index| self.values[index])
            .filter(|expr| !matches!(expr.kind, ExprKind::Literal(Literal::Null)))
    }

    fn missing(&self, name: &str) -> InterpretError {
        InterpretError::MissingArgument {
            method: self.method.to_string(),
            argument: name.to_string(),
            span: self.span,
        }
    }

    /// Fails if both `first` and `second` are given.
    pub fn exclusive(&self, first: &'static str, second: &'static str) -> Result<()> {
        if self.value(first).is_some() && self.value(second).is_some() {
            return Err(InterpretError::ConflictingArguments {
                method: self.method.to_string(),
                first,
                second,
                span: self.span,
            });
        }
        Ok(())
    }

    pub fn string(&self, name: &'static str) -> Result<Option<String>> {
        self.value(name).map(|expr| string(name, expr)).transpose()
    }

    pub fn required_string(&self, name: &'static str) -> Result<String> {
        self.string(name)?.ok_or_else(|| self.missing(name))
    }

    pub fn bool(&self, name: &'static str) -> Result<Option<bool>> {
        self.value(name).map(|expr| boolean(name, expr)).transpose()
    }

    pub fn int(&self, name: &'static str) -> Result<Option<i32>> {
        self.value(name).map(|expr| int(name, expr)).transpose()
    }

    pub fn long(&self, name: &'static str) -> Result<Option<i64>> {
        self.value(name).map(|expr| long(name, expr)).transpose()
    }

    pub fn required_long(&self, name: &'static str) -> Result<i64> {
        self.long(name)?.ok_or_else(|| self.missing(name))
    }

    pub fn default_value(&self, name: &'static str) -> Result<Option<DefaultValue>> {
        self.value(name)
            .map(|expr| default_value(name, expr))
            .transpose()
    }

    pub fn action(&self, name: &'static str) -> Result<Option<ReferentialAction>> {
        self.value(name)
            .map(|expr| referential_action(name, expr))
            .transpose()
    }

    /// Reads a column list given either as `singular: "A"` or as
    /// `plural: new[] { "A", "B" }`.
    pub fn columns(&self, singular: &'static str, plural: &'static str) -> Result<Vec<String>> {
        self.exclusive(singular, plural)?;
        if let Some(column) = self.string(singular)? {
            return Ok(vec![column]);
        }
        self.value(plural)
            .map(|expr| string_array(plural, expr))
            .transpose()
            .map(Option::unwrap_or_default)
    }

    /// Like [`Bound::columns`], but at least one column must be given.
    pub fn required_columns(
        &self,
        singular: &'static str,
        plural: &'static str,
    ) -> Result<Vec<String>> {
        let columns = self.columns(singular, plural)?;
        if columns.is_empty() {
            return Err(self.missing(plural));
        }
        Ok(columns)
    }

    pub fn lambda(&self, name: &'static str) -> Result<Option<Lambda<'a>>> {
        self.value(name).map(|expr| lambda(name, expr)).transpose()
    }

    pub fn required_lambda(&self, name: &'static str) -> Result<Lambda<'a>> {
        self.lambda(name)?.ok_or_else(|| self.missing(name))
    }
}

fn mismatch(argument: &str, expected: &'static str, span: Span) -> InterpretError {
    InterpretError::TypeMismatch {
        argument: argument.to_string(),
        expected,
        span,
    }
}

fn out_of_range(argument: &str, expected: &'static str, span: Span) -> InterpretError {
    InterpretError::OutOfRange {
        argument: argument.to_string(),
        expected,
        span,
    }
}

fn string(argument: &str, expr: &Expr) -> Result<String> {
    match &expr.kind {
        ExprKind::Literal(Literal::String(s)) => Ok(s.clone()),
        _ => Err(mismatch(argument, "a string", expr.span)),
    }
}

fn boolean(argument: &str, expr: &Expr) -> Result<bool> {
    match expr.kind {
        ExprKind::Literal(Literal::Bool(b)) => Ok(b),
        _ => Err(mismatch(argument, "a bool", expr.span)),
    }
}

/// An `int` parameter takes unsuffixed integers only.
fn int(argument: &str, expr: &Expr) -> Result<i32> {
    match expr.kind {
        ExprKind::Literal(Literal::Integer { value, long: false }) => {
            i32::try_from(value).map_err(|_| out_of_range(argument, "int", expr.span))
        }
        _ => Err(mismatch(argument, "an int", expr.span)),
    }
}

fn long(argument: &str, expr: &Expr) -> Result<i64> {
    match expr.kind {
        ExprKind::Literal(Literal::Integer { value, .. }) => {
            i64::try_from(value).map_err(|_| out_of_range(argument, "long", expr.span))
        }
        _ => Err(mismatch(argument, "a long", expr.span)),
    }
}

fn default_value(argument: &str, expr: &Expr) -> Result<DefaultValue> {
    match &expr.kind {
        ExprKind::Literal(Literal::Bool(b)) => Ok(DefaultValue::Bool(*b)),
        ExprKind::Literal(Literal::String(s)) => Ok(DefaultValue::String(s.clone())),
        ExprKind::Literal(Literal::Double(d)) => Ok(DefaultValue::Double(*d)),
        ExprKind::Literal(Literal::Integer { value, long: true }) => i64::try_from(*value)
            .map(DefaultValue::Long)
            .map_err(|_| out_of_range(argument, "long", expr.span)),
        // Unsuffixed integers too wide for an int are read as longs.
        ExprKind::Literal(Literal::Integer { value, long: false }) => {
            match i32::try_from(*value) {
                Ok(v) => Ok(DefaultValue::Int(v)),
                Err(_) => i64::try_from(*value)
                    .map(DefaultValue::Long)
                    .map_err(|_| out_of_range(argument, "long", expr.span)),
            }
        }
        ExprKind::Path(segments) => match segments.as_slice() {
            [ty, name] if ty == "double" => match name.as_str() {
                "NaN" => Ok(DefaultValue::Double(f64::NAN)),
                "PositiveInfinity" => Ok(DefaultValue::Double(f64::INFINITY)),
                "NegativeInfinity" => Ok(DefaultValue::Double(f64::NEG_INFINITY)),
                _ => Err(mismatch(argument, "a default value", expr.span)),
            },
            _ => Err(mismatch(argument, "a default value", expr.span)),
        },
        _ => Err(mismatch(argument, "a default value", expr.span)),
    }
}

fn referential_action(argument: &str, expr: &Expr) -> Result<ReferentialAction> {
    match &expr.kind {
        ExprKind::Path(segments) => match segments.as_slice() {
            [ty, name] if ty == "ReferentialAction" => {
                name.parse()
                    .map_err(|_| InterpretError::UnknownReferentialAction {
                        name: name.clone(),
                        span: expr.span,
                    })
            }
            _ => Err(mismatch(argument, "a ReferentialAction", expr.span)),
        },
        _ => Err(mismatch(argument, "a ReferentialAction", expr.span)),
    }
}

fn string_array(argument: &str, expr: &Expr) -> Result<Vec<String>> {
    match &expr.kind {
        ExprKind::Array(items) => items.iter().map(|item| string(argument, item)).collect(),
        _ => Err(mismatch(argument, "a string array", expr.span)),
    }
}

fn lambda<'a>(argument: &str, expr: &'a Expr) -> Result<Lambda<'a>> {
    match &expr.kind {
        ExprKind::Lambda { param, body } => Ok(Lambda {
            param,
            body,
            span: expr.span,
        }),
        _ => Err(mismatch(argument, "a lambda", expr.span)),
    }
}
