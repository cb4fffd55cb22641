//! Executes builder DSL source against a [`MigrationBuilder`].
//!
//! The whole source is parsed before the first call runs. Each statement is
//! then bound and converted completely before it reaches the builder, so a
//! failing statement records nothing; statements before it stay recorded.
//!
//! ```rust
//! use oxide_migrations::MigrationBuilder;
//! use oxide_migrations_codegen::dsl::Interpreter;
//!
//! let mut mb = MigrationBuilder::new();
//! Interpreter::new("mb", &mut mb)
//!     .run("mb.DropTable(\"Post\");\nmb.CreateSchema(\"my\");")
//!     .unwrap();
//! assert_eq!(mb.operations().len(), 2);
//! ```

/// Applies a `ColumnSpec` to anything with the column setters.
macro_rules! apply_column_spec {
    ($target:expr, $spec:expr) => {{
        let spec = $spec;
        $target.nullable(spec.nullable);
        if let Some(value) = spec.default_value {
            $target.default_value(value);
        }
        if let Some(expression) = spec.default_expression {
            $target.default_expression(expression);
        }
    }};
}

/// Applies a `ForeignKeyTarget` to a top-level or nested foreign key builder.
macro_rules! apply_foreign_key_target {
    ($fk:expr, $target:expr) => {{
        let target = $target;
        if let Some(schema) = target.referenced_schema {
            $fk.referenced_schema(schema);
        }
        $fk.referenced_columns(target.referenced_columns)
            .on_update(target.on_update)
            .on_delete(target.on_delete);
    }};
}

/// Applies `schema`, `newName` and `newSchema` to a rename builder.
macro_rules! apply_rename {
    ($op:expr, $schema:expr, $new_name:expr, $new_schema:expr) => {{
        if let Some(schema) = $schema {
            $op.schema(schema);
        }
        if let Some(new_name) = $new_name {
            $op.new_name(new_name);
        }
        if let Some(new_schema) = $new_schema {
            $op.new_schema(new_schema);
        }
    }};
}

mod arguments;
mod error;
mod signatures;
mod table;

use oxide_migrations::{MigrationBuilder, Operation, OperationKind};
use tracing::{debug, trace};

use self::arguments::Bound;
use self::table::{ColumnSpec, ForeignKeyTarget, TablePlan};
use crate::dsl::ast::Invocation;
use crate::dsl::parser::Parser;

pub use self::error::{InterpretError, Result};

/// Runs builder DSL source, recording operations on a borrowed builder.
#[derive(Debug)]
pub struct Interpreter<'b> {
    builder_name: String,
    builder: &'b mut MigrationBuilder,
}

impl<'b> Interpreter<'b> {
    /// Creates an interpreter whose statements address `builder_name`.
    pub fn new(builder_name: impl Into<String>, builder: &'b mut MigrationBuilder) -> Self {
        Self {
            builder_name: builder_name.into(),
            builder,
        }
    }

    /// Returns the builder variable name statements must address.
    #[must_use]
    pub fn builder_name(&self) -> &str {
        &self.builder_name
    }

    /// Parses `source` and executes its statements in order.
    ///
    /// # Errors
    ///
    /// Returns [`InterpretError::Parse`] without executing anything if the
    /// source does not parse. Otherwise returns the first statement error;
    /// statements before it remain recorded.
    pub fn run(&mut self, source: &str) -> Result<()> {
        let program = Parser::new(source).parse_program()?;
        debug!(statements = program.len(), "Parsed migration builder source");
        for statement in &program {
            self.execute(statement)?;
        }
        Ok(())
    }

    fn execute(&mut self, call: &Invocation) -> Result<()> {
        if call.target != self.builder_name {
            return Err(InterpretError::UnknownTarget {
                expected: self.builder_name.clone(),
                found: call.target.clone(),
                span: call.span,
            });
        }
        let kind = OperationKind::from_method_name(&call.method).ok_or_else(|| {
            InterpretError::UnknownMethod {
                method: call.method.clone(),
                span: call.span,
            }
        })?;
        trace!(kind = %kind, span = %call.span, "Executing builder call");
        let args = Bound::bind(call, signatures::of(kind))?;
        execute_operation(self.builder, kind, &args)
    }
}

/// Executes `source` on a fresh builder and returns the recorded operations.
///
/// # Errors
///
/// Returns the first parse or statement error. Nothing is returned for a
/// source that fails part way.
pub fn reconstruct(builder_name: &str, source: &str) -> Result<Vec<Operation>> {
    let mut builder = MigrationBuilder::new();
    Interpreter::new(builder_name, &mut builder).run(source)?;
    Ok(builder.into_operations())
}

/// Converts the bound arguments of one call and records its operation.
#[allow(clippy::too_many_lines)]
fn execute_operation(mb: &mut MigrationBuilder, kind: OperationKind, args: &Bound<'_>) -> Result<()> {
    let schema = args.string("schema")?;
    match kind {
        OperationKind::AddColumn | OperationKind::AlterColumn => {
            let name = args.required_string("name")?;
            let table = args.required_string("table")?;
            let column_type = args.required_string("type")?;
            let spec = ColumnSpec::read(args)?;
            if kind == OperationKind::AddColumn {
                let mut op = mb.add_column(name, table, column_type);
                if let Some(schema) = schema {
                    op.schema(schema);
                }
                apply_column_spec!(op, spec);
            } else {
                let mut op = mb.alter_column(name, table, column_type);
                if let Some(schema) = schema {
                    op.schema(schema);
                }
                apply_column_spec!(op, spec);
            }
        }
        OperationKind::AddForeignKey => {
            let name = args.required_string("name")?;
            let table = args.required_string("table")?;
            let columns = args.required_columns("column", "columns")?;
            let target = ForeignKeyTarget::read(args)?;
            let mut op = mb.add_foreign_key(name, table, columns, target.referenced_table.clone());
            if let Some(schema) = schema {
                op.schema(schema);
            }
            apply_foreign_key_target!(op, target);
        }
        OperationKind::AddPrimaryKey => {
            let name = args.required_string("name")?;
            let table = args.required_string("table")?;
            let columns = args.required_columns("column", "columns")?;
            let mut op = mb.add_primary_key(name, table, columns);
            if let Some(schema) = schema {
                op.schema(schema);
            }
        }
        OperationKind::AddUniqueConstraint => {
            let name = args.required_string("name")?;
            let table = args.required_string("table")?;
            let columns = args.required_columns("column", "columns")?;
            let mut op = mb.add_unique_constraint(name, table, columns);
            if let Some(schema) = schema {
                op.schema(schema);
            }
        }
        OperationKind::AlterSequence => {
            let name = args.required_string("name")?;
            let increment_by = args.int("incrementBy")?;
            let min_value = args.long("minValue")?;
            let max_value = args.long("maxValue")?;
            let cycle = args.bool("cycle")?.unwrap_or(false);
            let mut op = mb.alter_sequence(name);
            if let Some(schema) = schema {
                op.schema(schema);
            }
            if let Some(increment_by) = increment_by {
                op.increment_by(increment_by);
            }
            if let Some(min_value) = min_value {
                op.min_value(min_value);
            }
            if let Some(max_value) = max_value {
                op.max_value(max_value);
            }
            op.cycle(cycle);
        }
        OperationKind::CreateIndex => {
            let name = args.required_string("name")?;
            let table = args.required_string("table")?;
            let columns = args.required_columns("column", "columns")?;
            let unique = args.bool("unique")?.unwrap_or(false);
            let mut op = mb.create_index(name, table, columns);
            if let Some(schema) = schema {
                op.schema(schema);
            }
            op.unique(unique);
        }
        OperationKind::CreateSchema => {
            mb.create_schema(args.required_string("name")?);
        }
        OperationKind::CreateSequence => {
            let name = args.required_string("name")?;
            let sequence_type = args.string("type")?;
            let start_with = args.long("startWith")?;
            let increment_by = args.int("incrementBy")?;
            let min_value = args.long("minValue")?;
            let max_value = args.long("maxValue")?;
            let cycle = args.bool("cycle")?.unwrap_or(false);
            let mut op = mb.create_sequence(name);
            if let Some(schema) = schema {
                op.schema(schema);
            }
            if let Some(sequence_type) = sequence_type {
                op.sequence_type(sequence_type);
            }
            if let Some(start_with) = start_with {
                op.start_with(start_with);
            }
            if let Some(increment_by) = increment_by {
                op.increment_by(increment_by);
            }
            if let Some(min_value) = min_value {
                op.min_value(min_value);
            }
            if let Some(max_value) = max_value {
                op.max_value(max_value);
            }
            op.cycle(cycle);
        }
        OperationKind::DropColumn
        | OperationKind::DropForeignKey
        | OperationKind::DropIndex
        | OperationKind::DropPrimaryKey
        | OperationKind::DropUniqueConstraint => {
            let name = args.required_string("name")?;
            let table = args.required_string("table")?;
            drop_from_table(mb, kind, name, table, schema);
        }
        OperationKind::DropSchema => {
            mb.drop_schema(args.required_string("name")?);
        }
        OperationKind::DropSequence => {
            let mut op = mb.drop_sequence(args.required_string("name")?);
            if let Some(schema) = schema {
                op.schema(schema);
            }
        }
        OperationKind::DropTable => {
            let mut op = mb.drop_table(args.required_string("name")?);
            if let Some(schema) = schema {
                op.schema(schema);
            }
        }
        OperationKind::RenameColumn | OperationKind::RenameIndex => {
            let name = args.required_string("name")?;
            let table = args.required_string("table")?;
            let new_name = args.required_string("newName")?;
            if kind == OperationKind::RenameColumn {
                let mut op = mb.rename_column(name, table, new_name);
                if let Some(schema) = schema {
                    op.schema(schema);
                }
            } else {
                let mut op = mb.rename_index(name, table, new_name);
                if let Some(schema) = schema {
                    op.schema(schema);
                }
            }
        }
        OperationKind::RenameSequence | OperationKind::RenameTable => {
            let name = args.required_string("name")?;
            let new_name = args.string("newName")?;
            let new_schema = args.string("newSchema")?;
            if kind == OperationKind::RenameSequence {
                let mut op = mb.rename_sequence(name);
                apply_rename!(op, schema, new_name, new_schema);
            } else {
                let mut op = mb.rename_table(name);
                apply_rename!(op, schema, new_name, new_schema);
            }
        }
        OperationKind::RestartSequence => {
            let name = args.required_string("name")?;
            let restart_with = args.required_long("with")?;
            let mut op = mb.restart_sequence(name, restart_with);
            if let Some(schema) = schema {
                op.schema(schema);
            }
        }
        OperationKind::Sql => {
            let sql = args.required_string("sql")?;
            let suppress = args.bool("suppressTransaction")?.unwrap_or(false);
            mb.sql(sql).suppress_transaction(suppress);
        }
        OperationKind::CreateTable => TablePlan::read(args)?.apply(mb),
    }
    Ok(())
}

fn drop_from_table(
    mb: &mut MigrationBuilder,
    kind: OperationKind,
    name: String,
    table: String,
    schema: Option<String>,
) {
    macro_rules! drop_with_schema {
        ($method:ident) => {{
            let mut op = mb.$method(name, table);
            if let Some(schema) = schema {
                op.schema(schema);
            }
        }};
    }

    match kind {
        OperationKind::DropColumn => drop_with_schema!(drop_column),
        OperationKind::DropForeignKey => drop_with_schema!(drop_foreign_key),
        OperationKind::DropIndex => drop_with_schema!(drop_index),
        OperationKind::DropPrimaryKey => drop_with_schema!(drop_primary_key),
        _ => drop_with_schema!(drop_unique_constraint),
    }
}

#[cfg(test)]
mod tests {
    use oxide_migrations::{DefaultValue, ReferentialAction};

    use super::*;
    use crate::dsl::lexer::Span;

    #[test]
    fn test_simple_statements() {
        let operations = reconstruct(
            "mb",
            "mb.DropTable(\"Post\");\nmb.DropTable(name: \"Post\", schema: \"dbo\");",
        )
        .unwrap();

        let mut expected = MigrationBuilder::new();
        expected.drop_table("Post");
        expected.drop_table("Post").schema("dbo");
        assert_eq!(operations, expected.into_operations());
    }

    #[test]
    fn test_column_defaults() {
        let operations = reconstruct(
            "mb",
            "mb.AlterColumn(name: \"Id\", table: \"Post\", type: \"int\", nullable: true, defaultValue: 5L);",
        )
        .unwrap();
        let Operation::AlterColumn(op) = &operations[0] else {
            panic!("Expected AlterColumn operation");
        };
        assert!(op.is_nullable);
        assert_eq!(op.default_value, Some(DefaultValue::Long(5)));
    }

    #[test]
    fn test_conflicting_defaults() {
        let err = reconstruct(
            "mb",
            "mb.AddColumn(name: \"Id\", table: \"Post\", type: \"int\", defaultValue: 1, defaultExpression: \"1\");",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            InterpretError::ConflictingArguments {
                first: "defaultValue",
                second: "defaultExpression",
                ..
            }
        ));
    }

    #[test]
    fn test_create_table() {
        let source = r#"mb.CreateTable(
    name: "Post",
    columns: t => new
    {
        Id = t.Column(type: "int", nullable: false),
        BlogId = t.Column(name: "Blog Id", type: "int", nullable: true)
    },
    constraints: t =>
    {
        t.PrimaryKey("PK_Post", x => x.Id);
        t.ForeignKey(
            name: "FK_Post_Blog",
            columns: y => y.BlogId,
            referencedTable: "Blog",
            onDelete: ReferentialAction.Cascade);
    });"#;
        let operations = reconstruct("mb", source).unwrap();

        let mut expected = MigrationBuilder::new();
        {
            let mut table = expected.create_table("Post");
            let id = table.column("Id", "int").build();
            let blog = table.column("Blog Id", "int").nullable(true).build();
            table.primary_key("PK_Post", &[id]);
            table
                .foreign_key("FK_Post_Blog", &[blog], "Blog")
                .on_delete(ReferentialAction::Cascade);
        }
        assert_eq!(operations, expected.into_operations());
    }

    #[test]
    fn test_unknown_target_and_method() {
        let err = reconstruct("mb", "migrationBuilder.DropTable(\"Post\");").unwrap_err();
        assert!(matches!(
            err,
            InterpretError::UnknownTarget { ref found, .. } if found == "migrationBuilder"
        ));
        assert_eq!(err.span(), Span::new(0, 34));

        let err = reconstruct("mb", "mb.DropView(\"V\");").unwrap_err();
        assert!(matches!(err, InterpretError::UnknownMethod { method, .. } if method == "DropView"));
    }

    #[test]
    fn test_failed_statement_records_nothing() {
        let mut mb = MigrationBuilder::new();
        let err = Interpreter::new("mb", &mut mb)
            .run("mb.CreateSchema(\"my\");\nmb.CreateSequence(name: \"S\", incrementBy: 1L);")
            .unwrap_err();
        assert!(matches!(err, InterpretError::TypeMismatch { ref argument, .. } if argument == "incrementBy"));
        assert_eq!(mb.operations().len(), 1);
    }

    #[test]
    fn test_parse_error_runs_nothing() {
        let mut mb = MigrationBuilder::new();
        let err = Interpreter::new("mb", &mut mb)
            .run("mb.CreateSchema(\"my\");\nmb.DropSchema(")
            .unwrap_err();
        assert!(matches!(err, InterpretError::Parse(_)));
        assert!(mb.operations().is_empty());
    }
}
