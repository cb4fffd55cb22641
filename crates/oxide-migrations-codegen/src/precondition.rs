//! Checks an operation sequence before anything is generated.
//!
//! A sequence that fails here produces no output at all.

use std::collections::HashMap;

use oxide_migrations::{
    AddColumnOperation, AlterColumnOperation, CreateTableOperation, Operation, OperationKind,
};

use crate::error::{CodegenError, Result};
use crate::identifier;

fn required(operation: OperationKind, field: &'static str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(CodegenError::MissingField { operation, field });
    }
    Ok(())
}

fn optional(operation: OperationKind, field: &'static str, value: Option<&str>) -> Result<()> {
    if value.is_some_and(str::is_empty) {
        return Err(CodegenError::EmptyField { operation, field });
    }
    Ok(())
}

fn columns(operation: OperationKind, columns: &[String]) -> Result<()> {
    if columns.is_empty() {
        return Err(CodegenError::MissingField {
            operation,
            field: "columns",
        });
    }
    Ok(())
}

fn column_definition(
    operation: OperationKind,
    name: &str,
    column_type: &str,
    has_value: bool,
    has_expression: bool,
) -> Result<()> {
    required(operation, "name", name)?;
    required(operation, "type", column_type)?;
    if has_value && has_expression {
        return Err(CodegenError::ConflictingDefault {
            operation,
            column: name.to_string(),
        });
    }
    Ok(())
}

/// Validates every operation of `operations`.
///
/// # Errors
///
/// Returns the first precondition violation found, in sequence order.
pub fn validate(operations: &[Operation]) -> Result<()> {
    operations.iter().try_for_each(validate_operation)
}

/// Validates a single operation.
///
/// # Errors
///
/// Returns the first precondition violation found.
pub fn validate_operation(operation: &Operation) -> Result<()> {
    let kind = operation.kind();
    match operation {
        Operation::AddColumn(AddColumnOperation {
            name,
            schema,
            table,
            column_type,
            default_value,
            default_expression,
            ..
        })
        | Operation::AlterColumn(AlterColumnOperation {
            name,
            schema,
            table,
            column_type,
            default_value,
            default_expression,
            ..
        }) => {
            required(kind, "table", table)?;
            optional(kind, "schema", schema.as_deref())?;
            column_definition(
                kind,
                name,
                column_type,
                default_value.is_some(),
                default_expression.is_some(),
            )
        }
        Operation::AddForeignKey(op) => {
            required(kind, "name", &op.name)?;
            optional(kind, "schema", op.schema.as_deref())?;
            required(kind, "table", &op.table)?;
            columns(kind, &op.columns)?;
            optional(kind, "referencedSchema", op.referenced_schema.as_deref())?;
            required(kind, "referencedTable", &op.referenced_table)
        }
        Operation::AddPrimaryKey(op) => {
            required(kind, "name", &op.name)?;
            optional(kind, "schema", op.schema.as_deref())?;
            required(kind, "table", &op.table)?;
            columns(kind, &op.columns)
        }
        Operation::AddUniqueConstraint(op) => {
            required(kind, "name", &op.name)?;
            optional(kind, "schema", op.schema.as_deref())?;
            required(kind, "table", &op.table)?;
            columns(kind, &op.columns)
        }
        Operation::CreateIndex(op) => {
            required(kind, "name", &op.name)?;
            optional(kind, "schema", op.schema.as_deref())?;
            required(kind, "table", &op.table)?;
            columns(kind, &op.columns)
        }
        Operation::AlterSequence(op) => {
            required(kind, "name", &op.name)?;
            optional(kind, "schema", op.schema.as_deref())
        }
        Operation::CreateSequence(op) => {
            required(kind, "name", &op.name)?;
            optional(kind, "schema", op.schema.as_deref())?;
            optional(kind, "type", op.sequence_type.as_deref())
        }
        Operation::CreateSchema(op) => required(kind, "name", &op.name),
        Operation::DropSchema(op) => required(kind, "name", &op.name),
        Operation::CreateTable(op) => validate_table(op),
        Operation::DropColumn(op) => {
            required(kind, "name", &op.name)?;
            optional(kind, "schema", op.schema.as_deref())?;
            required(kind, "table", &op.table)
        }
        Operation::DropForeignKey(op) => {
            required(kind, "name", &op.name)?;
            optional(kind, "schema", op.schema.as_deref())?;
            required(kind, "table", &op.table)
        }
        Operation::DropIndex(op) => {
            required(kind, "name", &op.name)?;
            optional(kind, "schema", op.schema.as_deref())?;
            required(kind, "table", &op.table)
        }
        Operation::DropPrimaryKey(op) => {
            required(kind, "name", &op.name)?;
            optional(kind, "schema", op.schema.as_deref())?;
            required(kind, "table", &op.table)
        }
        Operation::DropUniqueConstraint(op) => {
            required(kind, "name", &op.name)?;
            optional(kind, "schema", op.schema.as_deref())?;
            required(kind, "table", &op.table)
        }
        Operation::DropSequence(op) => {
            required(kind, "name", &op.name)?;
            optional(kind, "schema", op.schema.as_deref())
        }
        Operation::DropTable(op) => {
            required(kind, "name", &op.name)?;
            optional(kind, "schema", op.schema.as_deref())
        }
        Operation::RenameColumn(op) => {
            required(kind, "name", &op.name)?;
            optional(kind, "schema", op.schema.as_deref())?;
            required(kind, "table", &op.table)?;
            required(kind, "newName", &op.new_name)
        }
        Operation::RenameIndex(op) => {
            required(kind, "name", &op.name)?;
            optional(kind, "schema", op.schema.as_deref())?;
            required(kind, "table", &op.table)?;
            required(kind, "newName", &op.new_name)
        }
        Operation::RenameSequence(op) => {
            required(kind, "name", &op.name)?;
            optional(kind, "schema", op.schema.as_deref())?;
            optional(kind, "newName", op.new_name.as_deref())?;
            optional(kind, "newSchema", op.new_schema.as_deref())
        }
        Operation::RenameTable(op) => {
            required(kind, "name", &op.name)?;
            optional(kind, "schema", op.schema.as_deref())?;
            optional(kind, "newName", op.new_name.as_deref())?;
            optional(kind, "newSchema", op.new_schema.as_deref())
        }
        Operation::RestartSequence(op) => {
            required(kind, "name", &op.name)?;
            optional(kind, "schema", op.schema.as_deref())
        }
        Operation::Sql(op) => required(kind, "sql", &op.sql),
    }
}

/// Checks that a child of `table` carries the table's name and schema.
fn child_of(
    table: &CreateTableOperation,
    operation: OperationKind,
    child_table: &str,
    child_schema: Option<&str>,
) -> Result<()> {
    if child_table != table.name {
        return Err(CodegenError::ParentMismatch {
            operation,
            field: "table",
            table: table.name.clone(),
        });
    }
    if child_schema != table.schema.as_deref() {
        return Err(CodegenError::ParentMismatch {
            operation,
            field: "schema",
            table: table.name.clone(),
        });
    }
    Ok(())
}

fn declared(
    table: &CreateTableOperation,
    operation: OperationKind,
    selected: &[String],
) -> Result<()> {
    columns(operation, selected)?;
    for column in selected {
        if !table.columns.iter().any(|c| &c.name == column) {
            return Err(CodegenError::UnknownColumn {
                operation,
                table: table.name.clone(),
                column: column.clone(),
            });
        }
    }
    Ok(())
}

fn validate_table(table: &CreateTableOperation) -> Result<()> {
    let kind = OperationKind::CreateTable;
    required(kind, "name", &table.name)?;
    optional(kind, "schema", table.schema.as_deref())?;
    if table.columns.is_empty() {
        return Err(CodegenError::MissingField {
            operation: kind,
            field: "columns",
        });
    }

    let mut identifiers: HashMap<String, &str> = HashMap::new();
    for column in &table.columns {
        let kind = OperationKind::AddColumn;
        child_of(table, kind, &column.table, column.schema.as_deref())?;
        column_definition(
            kind,
            &column.name,
            &column.column_type,
            column.default_value.is_some(),
            column.default_expression.is_some(),
        )?;
        let ident = identifier::derive(&column.name);
        if let Some(first) = identifiers.insert(ident.clone(), &column.name) {
            return Err(CodegenError::IdentifierCollision {
                table: table.name.clone(),
                identifier: ident,
                first: first.to_string(),
                second: column.name.clone(),
            });
        }
    }

    if let Some(pk) = &table.primary_key {
        let kind = OperationKind::AddPrimaryKey;
        child_of(table, kind, &pk.table, pk.schema.as_deref())?;
        required(kind, "name", &pk.name)?;
        declared(table, kind, &pk.columns)?;
    }
    for fk in &table.foreign_keys {
        let kind = OperationKind::AddForeignKey;
        child_of(table, kind, &fk.table, fk.schema.as_deref())?;
        required(kind, "name", &fk.name)?;
        declared(table, kind, &fk.columns)?;
        optional(kind, "referencedSchema", fk.referenced_schema.as_deref())?;
        required(kind, "referencedTable", &fk.referenced_table)?;
    }
    for unique in &table.unique_constraints {
        let kind = OperationKind::AddUniqueConstraint;
        child_of(table, kind, &unique.table, unique.schema.as_deref())?;
        required(kind, "name", &unique.name)?;
        declared(table, kind, &unique.columns)?;
    }
    Ok(())
}
