//! Columns and constraints blocks of `CreateTable`, and the argument groups
//! shared with the top-level column and foreign key methods.
//!
//! A table is read completely before anything reaches the builder, so a
//! malformed table records nothing.

use std::collections::HashMap;

use oxide_migrations::{ColumnRef, DefaultValue, MigrationBuilder, ReferentialAction};

use super::arguments::{Bound, Lambda};
use super::error::{InterpretError, Result};
use super::signatures;
use crate::dsl::ast::{ExprKind, Invocation, LambdaBody, Member};
use crate::dsl::lexer::Span;

/// `nullable`, `defaultValue` and `defaultExpression`.
#[derive(Debug)]
pub struct ColumnSpec {
    pub nullable: bool,
    pub default_value: Option<DefaultValue>,
    pub default_expression: Option<String>,
}

impl ColumnSpec {
    pub fn read(args: &Bound<'_>) -> Result<Self> {
        args.exclusive("defaultValue", "defaultExpression")?;
        Ok(Self {
            nullable: args.bool("nullable")?.unwrap_or(false),
            default_value: args.default_value("defaultValue")?,
            default_expression: args.string("defaultExpression")?,
        })
    }
}

/// The referenced side of a foreign key.
#[derive(Debug)]
pub struct ForeignKeyTarget {
    pub referenced_schema: Option<String>,
    pub referenced_table: String,
    pub referenced_columns: Vec<String>,
    pub on_update: ReferentialAction,
    pub on_delete: ReferentialAction,
}

impl ForeignKeyTarget {
    pub fn read(args: &Bound<'_>) -> Result<Self> {
        Ok(Self {
            referenced_schema: args.string("referencedSchema")?,
            referenced_table: args.required_string("referencedTable")?,
            referenced_columns: args.columns("referencedColumn", "referencedColumns")?,
            on_update: args.action("onUpdate")?.unwrap_or_default(),
            on_delete: args.action("onDelete")?.unwrap_or_default(),
        })
    }
}

#[derive(Debug)]
struct ColumnPlan {
    name: String,
    column_type: String,
    spec: ColumnSpec,
}

#[derive(Debug)]
enum ConstraintPlan {
    PrimaryKey {
        name: String,
        columns: Vec<usize>,
    },
    ForeignKey {
        name: String,
        columns: Vec<usize>,
        target: ForeignKeyTarget,
    },
    Unique {
        name: String,
        columns: Vec<usize>,
    },
}

/// A fully read `CreateTable` call.
#[derive(Debug)]
pub struct TablePlan {
    name: String,
    schema: Option<String>,
    columns: Vec<ColumnPlan>,
    constraints: Vec<ConstraintPlan>,
}

impl TablePlan {
    pub fn read(args: &Bound<'_>) -> Result<Self> {
        let name = args.required_string("name")?;
        let schema = args.string("schema")?;
        let (columns, identifiers) = read_columns(args.required_lambda("columns")?)?;
        let constraints = match args.lambda("constraints")? {
            Some(block) => read_constraints(&name, block, &identifiers)?,
            None => Vec::new(),
        };
        Ok(Self {
            name,
            schema,
            columns,
            constraints,
        })
    }

    /// Records the table on `builder`.
    pub fn apply(self, builder: &mut MigrationBuilder) {
        let mut table = builder.create_table(self.name);
        if let Some(schema) = self.schema {
            table.schema(schema);
        }
        let refs: Vec<ColumnRef> = self
            .columns
            .into_iter()
            .map(|column| {
                let mut declared = table.column(column.name, column.column_type);
                apply_column_spec!(declared, column.spec);
                declared.build()
            })
            .collect();
        let select = |indexes: &[usize]| -> Vec<ColumnRef> {
            indexes.iter().map(|&index| refs[index].clone()).collect()
        };

        for constraint in self.constraints {
            match constraint {
                ConstraintPlan::PrimaryKey { name, columns } => {
                    table.primary_key(name, &select(&columns));
                }
                ConstraintPlan::ForeignKey {
                    name,
                    columns,
                    target,
                } => {
                    let mut fk =
                        table.foreign_key(name, &select(&columns), target.referenced_table.clone());
                    apply_foreign_key_target!(fk, target);
                }
                ConstraintPlan::Unique { name, columns } => {
                    table.unique(name, &select(&columns));
                }
            }
        }
    }
}

fn mismatch(argument: &str, expected: &'static str, span: Span) -> InterpretError {
    InterpretError::TypeMismatch {
        argument: argument.to_string(),
        expected,
        span,
    }
}

/// Checks that a nested call addresses the lambda parameter.
fn check_target(call: &Invocation, param: &str) -> Result<()> {
    if call.target != param {
        return Err(InterpretError::UnknownTarget {
            expected: param.to_string(),
            found: call.target.clone(),
            span: call.span,
        });
    }
    Ok(())
}

fn unknown_method(call: &Invocation) -> InterpretError {
    InterpretError::UnknownMethod {
        method: call.method.clone(),
        span: call.span,
    }
}

/// Reads `table => new { Id = table.Column(...), ... }`.
fn read_columns(lambda: Lambda<'_>) -> Result<(Vec<ColumnPlan>, HashMap<String, usize>)> {
    let LambdaBody::Expr(body) = lambda.body else {
        return Err(mismatch("columns", "a column object", lambda.span));
    };
    let ExprKind::Object(members) = &body.kind else {
        return Err(mismatch("columns", "a column object", body.span));
    };

    let mut columns = Vec::with_capacity(members.len());
    let mut identifiers = HashMap::with_capacity(members.len());
    for member in members {
        let Member::Named { name: ident, value, span } = member else {
            return Err(mismatch("columns", "a named column", member_span(member)));
        };
        let ExprKind::Call(call) = &value.kind else {
            return Err(mismatch(ident, "a column declaration", value.span));
        };
        check_target(call, lambda.param)?;
        if call.method != "Column" {
            return Err(unknown_method(call));
        }
        let args = Bound::bind(call, signatures::COLUMN)?;
        let plan = ColumnPlan {
            name: args.string("name")?.unwrap_or_else(|| ident.clone()),
            column_type: args.required_string("type")?,
            spec: ColumnSpec::read(&args)?,
        };
        if identifiers.insert(ident.clone(), columns.len()).is_some() {
            return Err(InterpretError::DuplicateColumn {
                identifier: ident.clone(),
                span: *span,
            });
        }
        columns.push(plan);
    }
    Ok((columns, identifiers))
}

const fn member_span(member: &Member) -> Span {
    match member {
        Member::Named { span, .. } | Member::Path { span, .. } => *span,
    }
}

/// Reads `table => { table.PrimaryKey(...); ... }`.
fn read_constraints(
    table: &str,
    lambda: Lambda<'_>,
    identifiers: &HashMap<String, usize>,
) -> Result<Vec<ConstraintPlan>> {
    let LambdaBody::Block(statements) = lambda.body else {
        return Err(mismatch("constraints", "a statement block", lambda.span));
    };

    let mut constraints = Vec::with_capacity(statements.len());
    let mut has_primary_key = false;
    for call in statements {
        check_target(call, lambda.param)?;
        let constraint = match call.method.as_str() {
            "PrimaryKey" => {
                if has_primary_key {
                    return Err(InterpretError::DuplicatePrimaryKey {
                        table: table.to_string(),
                        span: call.span,
                    });
                }
                has_primary_key = true;
                let args = Bound::bind(call, signatures::TABLE_KEY)?;
                ConstraintPlan::PrimaryKey {
                    name: args.required_string("name")?,
                    columns: read_selector(args.required_lambda("columns")?, identifiers)?,
                }
            }
            "ForeignKey" => {
                let args = Bound::bind(call, signatures::TABLE_FOREIGN_KEY)?;
                ConstraintPlan::ForeignKey {
                    name: args.required_string("name")?,
                    columns: read_selector(args.required_lambda("columns")?, identifiers)?,
                    target: ForeignKeyTarget::read(&args)?,
                }
            }
            "Unique" => {
                let args = Bound::bind(call, signatures::TABLE_KEY)?;
                ConstraintPlan::Unique {
                    name: args.required_string("name")?,
                    columns: read_selector(args.required_lambda("columns")?, identifiers)?,
                }
            }
            _ => return Err(unknown_method(call)),
        };
        constraints.push(constraint);
    }
    Ok(constraints)
}

/// Reads `x => x.Id` or `x => new { x.A, x.B }` into column positions.
fn read_selector(lambda: Lambda<'_>, identifiers: &HashMap<String, usize>) -> Result<Vec<usize>> {
    let resolve = |segments: &[String], span: Span| -> Result<usize> {
        match segments {
            [param, ident] if param == lambda.param => {
                identifiers
                    .get(ident)
                    .copied()
                    .ok_or_else(|| InterpretError::UnknownColumn {
                        identifier: ident.clone(),
                        span,
                    })
            }
            _ => Err(mismatch("columns", "a column selector", span)),
        }
    };

    let LambdaBody::Expr(body) = lambda.body else {
        return Err(mismatch("columns", "a column selector", lambda.span));
    };
    match &body.kind {
        ExprKind::Path(segments) => Ok(vec![resolve(segments, body.span)?]),
        ExprKind::Object(members) => members
            .iter()
            .map(|member| match member {
                Member::Path { segments, span } => resolve(segments, *span),
                Member::Named { span, .. } => Err(mismatch("columns", "a column selector", *span)),
            })
            .collect(),
        _ => Err(mismatch("columns", "a column selector", body.span)),
    }
}
