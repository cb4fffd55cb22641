//! Builder code generation.
//!
//! Renders an operation sequence as one builder call per operation:
//!
//! ```text
//! mb.AddColumn(
//!     name: "Id",
//!     table: "Post",
//!     type: "int",
//!     nullable: false);
//! mb.DropTable("Post");
//! ```
//!
//! Each operation kind has a fixed [`CallShape`] and a canonical argument
//! order. Optional arguments equal to their default are left out.

use core::fmt;

use oxide_migrations::{
    AddColumnOperation, AddForeignKeyOperation, AlterColumnOperation, CreateTableOperation,
    DefaultValue, Operation, OperationKind, ReferentialAction,
};
use tracing::{debug, trace};

use crate::error::{CodegenError, Result};
use crate::identifier;
use crate::literal;
use crate::options::CodegenOptions;
use crate::precondition;
use crate::writer::IndentedWriter;

/// How the arguments of a call are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// One argument per line, indented one level.
    Block,
    /// All arguments on the call line.
    Inline,
}

/// Whether arguments carry their parameter name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Naming {
    /// Every argument is written `name: value`.
    Named,
    /// A lone first argument is written bare; otherwise every argument is
    /// named.
    PositionalWhenAlone,
}

/// Layout and naming of the builder call for one operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallShape {
    /// Builder method name.
    pub method: &'static str,
    /// Argument layout.
    pub layout: Layout,
    /// Argument naming.
    pub naming: Naming,
}

impl CallShape {
    /// Returns the shape used for `kind`.
    #[must_use]
    pub const fn of(kind: OperationKind) -> Self {
        let (layout, naming) = match kind {
            OperationKind::CreateSchema
            | OperationKind::DropSchema
            | OperationKind::DropSequence
            | OperationKind::DropTable => (Layout::Inline, Naming::PositionalWhenAlone),
            OperationKind::DropColumn
            | OperationKind::DropForeignKey
            | OperationKind::DropIndex
            | OperationKind::DropPrimaryKey
            | OperationKind::DropUniqueConstraint => (Layout::Inline, Naming::Named),
            OperationKind::Sql => (Layout::Block, Naming::PositionalWhenAlone),
            _ => (Layout::Block, Naming::Named),
        };
        Self {
            method: kind.method_name(),
            layout,
            naming,
        }
    }
}

#[derive(Debug)]
struct Arg {
    name: &'static str,
    value: String,
}

/// Arguments of one call, in canonical order.
#[derive(Debug, Default)]
struct ArgList {
    args: Vec<Arg>,
}

impl ArgList {
    fn required(&mut self, name: &'static str, value: String) -> &mut Self {
        self.args.push(Arg { name, value });
        self
    }

    fn optional(&mut self, name: &'static str, value: Option<String>) -> &mut Self {
        if let Some(value) = value {
            self.required(name, value);
        }
        self
    }

    fn unless_default<T: PartialEq>(
        &mut self,
        name: &'static str,
        value: T,
        default: T,
        render: impl FnOnce(T) -> String,
    ) -> &mut Self {
        if value != default {
            self.required(name, render(value));
        }
        self
    }

    /// Adds a column reference list, singular for one column and plural for
    /// several. An empty list adds nothing.
    fn columns(&mut self, singular: &'static str, plural: &'static str, columns: &[String]) -> &mut Self {
        match columns {
            [] => self,
            [single] => self.required(singular, literal::string(single)),
            many => self.required(plural, literal::string_array(many)),
        }
    }

    fn schema(&mut self, name: &'static str, schema: Option<&str>) -> &mut Self {
        self.optional(name, schema.map(literal::string))
    }

    fn rendered(&self, naming: Naming) -> Vec<String> {
        if naming == Naming::PositionalWhenAlone && self.args.len() == 1 {
            return self.args.iter().map(|arg| arg.value.clone()).collect();
        }
        self.args
            .iter()
            .map(|arg| format!("{}: {}", arg.name, arg.value))
            .collect()
    }
}

/// Generates builder code from operations.
#[derive(Debug, Clone, Default)]
pub struct Generator {
    options: CodegenOptions,
}

impl Generator {
    /// Creates a generator with default options.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            options: CodegenOptions::new(),
        }
    }

    /// Creates a generator with custom options.
    #[must_use]
    pub const fn with_options(options: CodegenOptions) -> Self {
        Self { options }
    }

    /// Returns the options in use.
    #[must_use]
    pub const fn options(&self) -> &CodegenOptions {
        &self.options
    }

    /// Writes the builder calls for `operations` to `sink`, addressing the
    /// builder variable `builder_name`.
    ///
    /// # Errors
    ///
    /// Returns a precondition error, before anything is written, if the
    /// builder name or any operation is invalid. Returns
    /// [`CodegenError::Write`] if the sink fails.
    pub fn generate(
        &self,
        builder_name: &str,
        operations: &[Operation],
        sink: &mut impl fmt::Write,
    ) -> Result<()> {
        let text = self.generate_to_string(builder_name, operations)?;
        sink.write_str(&text)?;
        Ok(())
    }

    /// Renders the builder calls for `operations` into a new string.
    ///
    /// # Errors
    ///
    /// Returns a precondition error if the builder name or any operation is
    /// invalid.
    pub fn generate_to_string(&self, builder_name: &str, operations: &[Operation]) -> Result<String> {
        if !identifier::is_valid(builder_name) {
            return Err(CodegenError::InvalidBuilderName(builder_name.to_string()));
        }
        precondition::validate(operations)?;

        let mut w = IndentedWriter::new(&self.options);
        for operation in operations {
            trace!(operation = %operation, "Generating builder call");
            write_operation(&mut w, builder_name, operation);
        }
        let text = w.into_string();
        debug!(
            operations = operations.len(),
            bytes = text.len(),
            "Generated migration builder code"
        );
        Ok(text)
    }
}

/// Writes the builder calls for `operations` to `sink` with default options.
///
/// # Errors
///
/// See [`Generator::generate`].
pub fn generate(builder_name: &str, operations: &[Operation], sink: &mut impl fmt::Write) -> Result<()> {
    Generator::new().generate(builder_name, operations, sink)
}

/// Writes `target.Method(args);` in the given layout.
fn write_call(w: &mut IndentedWriter, target: &str, shape: CallShape, args: &ArgList) {
    let args = args.rendered(shape.naming);
    match shape.layout {
        Layout::Inline => {
            w.line(&format!("{target}.{}({});", shape.method, args.join(", ")));
        }
        Layout::Block => {
            w.line(&format!("{target}.{}(", shape.method));
            w.indent();
            let last = args.len().saturating_sub(1);
            for (i, arg) in args.iter().enumerate() {
                if i == last {
                    w.line(&format!("{arg});"));
                } else {
                    w.line(&format!("{arg},"));
                }
            }
            w.dedent();
        }
    }
}

fn write_operation(w: &mut IndentedWriter, builder: &str, operation: &Operation) {
    if let Operation::CreateTable(table) = operation {
        write_create_table(w, builder, table);
        return;
    }
    let args = arguments(operation);
    write_call(w, builder, CallShape::of(operation.kind()), &args);
}

fn column_arguments(args: &mut ArgList, is_nullable: bool, column: &ColumnDefaults<'_>) {
    args.required("nullable", literal::bool(is_nullable).to_string())
        .optional("defaultValue", column.value.map(literal::default_value))
        .optional("defaultExpression", column.expression.map(literal::string));
}

struct ColumnDefaults<'a> {
    value: Option<&'a DefaultValue>,
    expression: Option<&'a str>,
}

impl<'a> From<&'a AddColumnOperation> for ColumnDefaults<'a> {
    fn from(op: &'a AddColumnOperation) -> Self {
        Self {
            value: op.default_value.as_ref(),
            expression: op.default_expression.as_deref(),
        }
    }
}

impl<'a> From<&'a AlterColumnOperation> for ColumnDefaults<'a> {
    fn from(op: &'a AlterColumnOperation) -> Self {
        Self {
            value: op.default_value.as_ref(),
            expression: op.default_expression.as_deref(),
        }
    }
}

fn foreign_key_tail(args: &mut ArgList, fk: &AddForeignKeyOperation) {
    args.schema("referencedSchema", fk.referenced_schema.as_deref())
        .required("referencedTable", literal::string(&fk.referenced_table))
        .columns("referencedColumn", "referencedColumns", &fk.referenced_columns)
        .unless_default(
            "onUpdate",
            fk.on_update,
            ReferentialAction::NoAction,
            literal::referential_action,
        )
        .unless_default(
            "onDelete",
            fk.on_delete,
            ReferentialAction::NoAction,
            literal::referential_action,
        );
}

/// Assembles the canonical argument list of every non-table operation.
#[allow(clippy::too_many_lines)]
fn arguments(operation: &Operation) -> ArgList {
    let mut args = ArgList::default();
    match operation {
        Operation::AddColumn(op) => {
            args.required("name", literal::string(&op.name))
                .schema("schema", op.schema.as_deref())
                .required("table", literal::string(&op.table))
                .required("type", literal::string(&op.column_type));
            column_arguments(&mut args, op.is_nullable, &op.into());
        }
        Operation::AlterColumn(op) => {
            args.required("name", literal::string(&op.name))
                .schema("schema", op.schema.as_deref())
                .required("table", literal::string(&op.table))
                .required("type", literal::string(&op.column_type));
            column_arguments(&mut args, op.is_nullable, &op.into());
        }
        Operation::AddForeignKey(op) => {
            args.required("name", literal::string(&op.name))
                .schema("schema", op.schema.as_deref())
                .required("table", literal::string(&op.table))
                .columns("column", "columns", &op.columns);
            foreign_key_tail(&mut args, op);
        }
        Operation::AddPrimaryKey(op) => {
            args.required("name", literal::string(&op.name))
                .schema("schema", op.schema.as_deref())
                .required("table", literal::string(&op.table))
                .columns("column", "columns", &op.columns);
        }
        Operation::AddUniqueConstraint(op) => {
            args.required("name", literal::string(&op.name))
                .schema("schema", op.schema.as_deref())
                .required("table", literal::string(&op.table))
                .columns("column", "columns", &op.columns);
        }
        Operation::AlterSequence(op) => {
            args.required("name", literal::string(&op.name))
                .schema("schema", op.schema.as_deref())
                .optional("incrementBy", op.increment_by.map(literal::int))
                .optional("minValue", op.min_value.map(literal::long))
                .optional("maxValue", op.max_value.map(literal::long))
                .unless_default("cycle", op.cycle, false, |b| literal::bool(b).to_string());
        }
        Operation::CreateIndex(op) => {
            args.required("name", literal::string(&op.name))
                .schema("schema", op.schema.as_deref())
                .required("table", literal::string(&op.table))
                .columns("column", "columns", &op.columns)
                .unless_default("unique", op.is_unique, false, |b| literal::bool(b).to_string());
        }
        Operation::CreateSchema(op) => {
            args.required("name", literal::string(&op.name));
        }
        Operation::DropSchema(op) => {
            args.required("name", literal::string(&op.name));
        }
        Operation::CreateSequence(op) => {
            args.required("name", literal::string(&op.name))
                .schema("schema", op.schema.as_deref())
                .optional("type", op.sequence_type.as_deref().map(literal::string))
                .optional("startWith", op.start_with.map(literal::long))
                .optional("incrementBy", op.increment_by.map(literal::int))
                .optional("minValue", op.min_value.map(literal::long))
                .optional("maxValue", op.max_value.map(literal::long))
                .unless_default("cycle", op.cycle, false, |b| literal::bool(b).to_string());
        }
        Operation::DropColumn(op) => {
            args.required("name", literal::string(&op.name))
                .schema("schema", op.schema.as_deref())
                .required("table", literal::string(&op.table));
        }
        Operation::DropForeignKey(op) => {
            args.required("name", literal::string(&op.name))
                .schema("schema", op.schema.as_deref())
                .required("table", literal::string(&op.table));
        }
        Operation::DropIndex(op) => {
            args.required("name", literal::string(&op.name))
                .schema("schema", op.schema.as_deref())
                .required("table", literal::string(&op.table));
        }
        Operation::DropPrimaryKey(op) => {
            args.required("name", literal::string(&op.name))
                .schema("schema", op.schema.as_deref())
                .required("table", literal::string(&op.table));
        }
        Operation::DropUniqueConstraint(op) => {
            args.required("name", literal::string(&op.name))
                .schema("schema", op.schema.as_deref())
                .required("table", literal::string(&op.table));
        }
        Operation::DropSequence(op) => {
            args.required("name", literal::string(&op.name))
                .schema("schema", op.schema.as_deref());
        }
        Operation::DropTable(op) => {
            args.required("name", literal::string(&op.name))
                .schema("schema", op.schema.as_deref());
        }
        Operation::RenameColumn(op) => {
            args.required("name", literal::string(&op.name))
                .schema("schema", op.schema.as_deref())
                .required("table", literal::string(&op.table))
                .required("newName", literal::string(&op.new_name));
        }
        Operation::RenameIndex(op) => {
            args.required("name", literal::string(&op.name))
                .schema("schema", op.schema.as_deref())
                .required("table", literal::string(&op.table))
                .required("newName", literal::string(&op.new_name));
        }
        Operation::RenameSequence(op) => {
            args.required("name", literal::string(&op.name))
                .schema("schema", op.schema.as_deref())
                .optional("newName", op.new_name.as_deref().map(literal::string))
                .schema("newSchema", op.new_schema.as_deref());
        }
        Operation::RenameTable(op) => {
            args.required("name", literal::string(&op.name))
                .schema("schema", op.schema.as_deref())
                .optional("newName", op.new_name.as_deref().map(literal::string))
                .schema("newSchema", op.new_schema.as_deref());
        }
        Operation::RestartSequence(op) => {
            args.required("name", literal::string(&op.name))
                .schema("schema", op.schema.as_deref())
                .required("with", literal::long(op.restart_with));
        }
        Operation::Sql(op) => {
            args.required("sql", literal::string(&op.sql)).unless_default(
                "suppressTransaction",
                op.suppress_transaction,
                false,
                |b| literal::bool(b).to_string(),
            );
        }
        // Written by `write_create_table`.
        Operation::CreateTable(_) => {}
    }
    args
}

/// Renders a column selector lambda, `x => x.Id` or `x => new { x.A, x.B }`.
fn selector(columns: &[String]) -> String {
    let members: Vec<String> = columns
        .iter()
        .map(|column| format!("x.{}", identifier::render(&identifier::derive(column))))
        .collect();
    match members.as_slice() {
        [single] => format!("x => {single}"),
        _ => format!("x => new {{ {} }}", members.join(", ")),
    }
}

fn write_create_table(w: &mut IndentedWriter, builder: &str, table: &CreateTableOperation) {
    w.line(&format!("{builder}.{}(", OperationKind::CreateTable.method_name()));
    w.indent();
    w.line(&format!("name: {},", literal::string(&table.name)));
    if let Some(schema) = &table.schema {
        w.line(&format!("schema: {},", literal::string(schema)));
    }

    w.line("columns: table => new");
    w.line("{");
    w.indent();
    let last = table.columns.len().saturating_sub(1);
    for (i, column) in table.columns.iter().enumerate() {
        let ident = identifier::derive(&column.name);
        let mut args = ArgList::default();
        if ident != column.name {
            args.required("name", literal::string(&column.name));
        }
        args.required("type", literal::string(&column.column_type));
        column_arguments(&mut args, column.is_nullable, &column.into());
        let separator = if i == last { "" } else { "," };
        w.line(&format!(
            "{} = table.Column({}){separator}",
            identifier::render(&ident),
            args.rendered(Naming::Named).join(", ")
        ));
    }
    w.dedent();
    w.line("},");

    w.line("constraints: table =>");
    w.line("{");
    w.indent();
    if let Some(pk) = &table.primary_key {
        w.line(&format!(
            "table.PrimaryKey({}, {});",
            literal::string(&pk.name),
            selector(&pk.columns)
        ));
    }
    for fk in &table.foreign_keys {
        let mut args = ArgList::default();
        args.required("name", literal::string(&fk.name))
            .required("columns", selector(&fk.columns));
        foreign_key_tail(&mut args, fk);
        let shape = CallShape {
            method: "ForeignKey",
            layout: Layout::Block,
            naming: Naming::Named,
        };
        write_call(w, "table", shape, &args);
    }
    for unique in &table.unique_constraints {
        w.line(&format!(
            "table.Unique({}, {});",
            literal::string(&unique.name),
            selector(&unique.columns)
        ));
    }
    w.dedent();
    w.line("});");
    w.dedent();
}
