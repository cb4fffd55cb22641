//! Migration operations.
//!
//! Defines every schema change a migration can express. Operations are plain
//! data: two operations are equal when they are the same variant and every
//! field, including nested column and constraint operations, is equal.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::value::{DefaultValue, ReferentialAction};

/// All possible migration operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Operation {
    /// Add a column to an existing table.
    AddColumn(AddColumnOperation),
    /// Add a foreign key constraint.
    AddForeignKey(AddForeignKeyOperation),
    /// Add a primary key constraint.
    AddPrimaryKey(AddPrimaryKeyOperation),
    /// Add a unique constraint.
    AddUniqueConstraint(AddUniqueConstraintOperation),
    /// Alter a column definition.
    AlterColumn(AlterColumnOperation),
    /// Alter a sequence.
    AlterSequence(AlterSequenceOperation),
    /// Create an index.
    CreateIndex(CreateIndexOperation),
    /// Create a schema.
    CreateSchema(CreateSchemaOperation),
    /// Create a sequence.
    CreateSequence(CreateSequenceOperation),
    /// Create a new table with its columns and constraints.
    CreateTable(CreateTableOperation),
    /// Drop a column from a table.
    DropColumn(DropColumnOperation),
    /// Drop a foreign key constraint.
    DropForeignKey(DropForeignKeyOperation),
    /// Drop an index.
    DropIndex(DropIndexOperation),
    /// Drop a primary key constraint.
    DropPrimaryKey(DropPrimaryKeyOperation),
    /// Drop a schema.
    DropSchema(DropSchemaOperation),
    /// Drop a sequence.
    DropSequence(DropSequenceOperation),
    /// Drop a table.
    DropTable(DropTableOperation),
    /// Drop a unique constraint.
    DropUniqueConstraint(DropUniqueConstraintOperation),
    /// Rename a column.
    RenameColumn(RenameColumnOperation),
    /// Rename an index.
    RenameIndex(RenameIndexOperation),
    /// Rename and/or move a sequence.
    RenameSequence(RenameSequenceOperation),
    /// Rename and/or move a table.
    RenameTable(RenameTableOperation),
    /// Restart a sequence at a value.
    RestartSequence(RestartSequenceOperation),
    /// Run raw SQL.
    Sql(SqlOperation),
}

/// Discriminant of an [`Operation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    AddColumn,
    AddForeignKey,
    AddPrimaryKey,
    AddUniqueConstraint,
    AlterColumn,
    AlterSequence,
    CreateIndex,
    CreateSchema,
    CreateSequence,
    CreateTable,
    DropColumn,
    DropForeignKey,
    DropIndex,
    DropPrimaryKey,
    DropSchema,
    DropSequence,
    DropTable,
    DropUniqueConstraint,
    RenameColumn,
    RenameIndex,
    RenameSequence,
    RenameTable,
    RestartSequence,
    Sql,
}

impl OperationKind {
    /// Returns the migration builder method that produces this kind.
    #[must_use]
    pub const fn method_name(self) -> &'static str {
        match self {
            Self::AddColumn => "AddColumn",
            Self::AddForeignKey => "AddForeignKey",
            Self::AddPrimaryKey => "AddPrimaryKey",
            Self::AddUniqueConstraint => "AddUniqueConstraint",
            Self::AlterColumn => "AlterColumn",
            Self::AlterSequence => "AlterSequence",
            Self::CreateIndex => "CreateIndex",
            Self::CreateSchema => "CreateSchema",
            Self::CreateSequence => "CreateSequence",
            Self::CreateTable => "CreateTable",
            Self::DropColumn => "DropColumn",
            Self::DropForeignKey => "DropForeignKey",
            Self::DropIndex => "DropIndex",
            Self::DropPrimaryKey => "DropPrimaryKey",
            Self::DropSchema => "DropSchema",
            Self::DropSequence => "DropSequence",
            Self::DropTable => "DropTable",
            Self::DropUniqueConstraint => "DropUniqueConstraint",
            Self::RenameColumn => "RenameColumn",
            Self::RenameIndex => "RenameIndex",
            Self::RenameSequence => "RenameSequence",
            Self::RenameTable => "RenameTable",
            Self::RestartSequence => "RestartSequence",
            Self::Sql => "Sql",
        }
    }

    /// Looks up a kind by its builder method name.
    #[must_use]
    pub fn from_method_name(name: &str) -> Option<Self> {
        ALL_KINDS.into_iter().find(|kind| kind.method_name() == name)
    }
}

const ALL_KINDS: [OperationKind; 24] = [
    OperationKind::AddColumn,
    OperationKind::AddForeignKey,
    OperationKind::AddPrimaryKey,
    OperationKind::AddUniqueConstraint,
    OperationKind::AlterColumn,
    OperationKind::AlterSequence,
    OperationKind::CreateIndex,
    OperationKind::CreateSchema,
    OperationKind::CreateSequence,
    OperationKind::CreateTable,
    OperationKind::DropColumn,
    OperationKind::DropForeignKey,
    OperationKind::DropIndex,
    OperationKind::DropPrimaryKey,
    OperationKind::DropSchema,
    OperationKind::DropSequence,
    OperationKind::DropTable,
    OperationKind::DropUniqueConstraint,
    OperationKind::RenameColumn,
    OperationKind::RenameIndex,
    OperationKind::RenameSequence,
    OperationKind::RenameTable,
    OperationKind::RestartSequence,
    OperationKind::Sql,
];

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method_name())
    }
}

/// Ties an operation struct to its [`Operation`] variant.
pub trait OperationVariant: Into<Operation> {
    /// The variant this struct is carried by.
    const KIND: OperationKind;

    /// Borrows the struct out of an operation of the matching variant.
    fn from_operation(operation: &Operation) -> Option<&Self>;

    /// Mutably borrows the struct out of an operation of the matching variant.
    fn from_operation_mut(operation: &mut Operation) -> Option<&mut Self>;
}

macro_rules! impl_operation_variant {
    ($($variant:ident($ty:ident)),+ $(,)?) => {
        impl Operation {
            /// Returns the discriminant of this operation.
            #[must_use]
            pub const fn kind(&self) -> OperationKind {
                match self {
                    $(Self::$variant(_) => OperationKind::$variant,)+
                }
            }
        }

        $(
            impl From<$ty> for Operation {
                fn from(op: $ty) -> Self {
                    Self::$variant(op)
                }
            }

            impl OperationVariant for $ty {
                const KIND: OperationKind = OperationKind::$variant;

                fn from_operation(operation: &Operation) -> Option<&Self> {
                    match operation {
                        Operation::$variant(op) => Some(op),
                        _ => None,
                    }
                }

                fn from_operation_mut(operation: &mut Operation) -> Option<&mut Self> {
                    match operation {
                        Operation::$variant(op) => Some(op),
                        _ => None,
                    }
                }
            }
        )+
    };
}

impl_operation_variant!(
    AddColumn(AddColumnOperation),
    AddForeignKey(AddForeignKeyOperation),
    AddPrimaryKey(AddPrimaryKeyOperation),
    AddUniqueConstraint(AddUniqueConstraintOperation),
    AlterColumn(AlterColumnOperation),
    AlterSequence(AlterSequenceOperation),
    CreateIndex(CreateIndexOperation),
    CreateSchema(CreateSchemaOperation),
    CreateSequence(CreateSequenceOperation),
    CreateTable(CreateTableOperation),
    DropColumn(DropColumnOperation),
    DropForeignKey(DropForeignKeyOperation),
    DropIndex(DropIndexOperation),
    DropPrimaryKey(DropPrimaryKeyOperation),
    DropSchema(DropSchemaOperation),
    DropSequence(DropSequenceOperation),
    DropTable(DropTableOperation),
    DropUniqueConstraint(DropUniqueConstraintOperation),
    RenameColumn(RenameColumnOperation),
    RenameIndex(RenameIndexOperation),
    RenameSequence(RenameSequenceOperation),
    RenameTable(RenameTableOperation),
    RestartSequence(RestartSequenceOperation),
    Sql(SqlOperation),
);

/// Add column operation.
///
/// Also used for the columns of a [`CreateTableOperation`], where `table` and
/// `schema` mirror the owning table.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AddColumnOperation {
    /// Column name.
    pub name: String,
    /// Schema of the table, `None` for the default schema.
    pub schema: Option<String>,
    /// Table name.
    pub table: String,
    /// Store type, e.g. `int` or `nvarchar(max)`.
    #[serde(rename = "type")]
    pub column_type: String,
    /// Whether the column accepts NULL.
    pub is_nullable: bool,
    /// Literal default value.
    pub default_value: Option<DefaultValue>,
    /// Raw SQL default expression.
    pub default_expression: Option<String>,
}

/// Add foreign key operation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AddForeignKeyOperation {
    /// Constraint name.
    pub name: String,
    /// Schema of the dependent table.
    pub schema: Option<String>,
    /// Dependent table name.
    pub table: String,
    /// Columns in the dependent table.
    pub columns: Vec<String>,
    /// Schema of the referenced table.
    pub referenced_schema: Option<String>,
    /// Referenced table.
    pub referenced_table: String,
    /// Referenced columns; empty references the principal key.
    pub referenced_columns: Vec<String>,
    /// ON UPDATE action.
    pub on_update: ReferentialAction,
    /// ON DELETE action.
    pub on_delete: ReferentialAction,
}

/// Add primary key operation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AddPrimaryKeyOperation {
    /// Constraint name.
    pub name: String,
    /// Schema of the table.
    pub schema: Option<String>,
    /// Table name.
    pub table: String,
    /// Key columns, in key order.
    pub columns: Vec<String>,
}

/// Add unique constraint operation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AddUniqueConstraintOperation {
    /// Constraint name.
    pub name: String,
    /// Schema of the table.
    pub schema: Option<String>,
    /// Table name.
    pub table: String,
    /// Constrained columns.
    pub columns: Vec<String>,
}

/// Alter column operation. Carries the complete new column definition.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AlterColumnOperation {
    /// Column name.
    pub name: String,
    /// Schema of the table.
    pub schema: Option<String>,
    /// Table name.
    pub table: String,
    /// New store type.
    #[serde(rename = "type")]
    pub column_type: String,
    /// Whether the column accepts NULL.
    pub is_nullable: bool,
    /// Literal default value.
    pub default_value: Option<DefaultValue>,
    /// Raw SQL default expression.
    pub default_expression: Option<String>,
}

/// Alter sequence operation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AlterSequenceOperation {
    /// Sequence name.
    pub name: String,
    /// Schema of the sequence.
    pub schema: Option<String>,
    /// New increment.
    pub increment_by: Option<i32>,
    /// New minimum value.
    pub min_value: Option<i64>,
    /// New maximum value.
    pub max_value: Option<i64>,
    /// Whether the sequence wraps around.
    pub cycle: bool,
}

/// Create index operation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateIndexOperation {
    /// Index name.
    pub name: String,
    /// Schema of the table.
    pub schema: Option<String>,
    /// Table name.
    pub table: String,
    /// Indexed columns, in index order.
    pub columns: Vec<String>,
    /// Whether this is a unique index.
    pub is_unique: bool,
}

/// Create schema operation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateSchemaOperation {
    /// Schema name.
    pub name: String,
}

/// Create sequence operation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateSequenceOperation {
    /// Sequence name.
    pub name: String,
    /// Schema of the sequence.
    pub schema: Option<String>,
    /// Store type of the sequence values.
    #[serde(rename = "type")]
    pub sequence_type: Option<String>,
    /// First value.
    pub start_with: Option<i64>,
    /// Increment.
    pub increment_by: Option<i32>,
    /// Minimum value.
    pub min_value: Option<i64>,
    /// Maximum value.
    pub max_value: Option<i64>,
    /// Whether the sequence wraps around.
    pub cycle: bool,
}

/// Create table operation.
///
/// Owns its columns and constraints. Every child carries this table's `name`
/// as its `table` and this table's `schema` as its `schema`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateTableOperation {
    /// Table name.
    pub name: String,
    /// Schema of the table.
    pub schema: Option<String>,
    /// Column definitions, in declaration order.
    pub columns: Vec<AddColumnOperation>,
    /// Primary key, if any.
    pub primary_key: Option<AddPrimaryKeyOperation>,
    /// Foreign keys, in declaration order.
    pub foreign_keys: Vec<AddForeignKeyOperation>,
    /// Unique constraints, in declaration order.
    pub unique_constraints: Vec<AddUniqueConstraintOperation>,
}

/// Drop column operation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DropColumnOperation {
    /// Column name.
    pub name: String,
    /// Schema of the table.
    pub schema: Option<String>,
    /// Table name.
    pub table: String,
}

/// Drop foreign key operation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DropForeignKeyOperation {
    /// Constraint name.
    pub name: String,
    /// Schema of the table.
    pub schema: Option<String>,
    /// Table name.
    pub table: String,
}

/// Drop index operation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DropIndexOperation {
    /// Index name.
    pub name: String,
    /// Schema of the table.
    pub schema: Option<String>,
    /// Table name.
    pub table: String,
}

/// Drop primary key operation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DropPrimaryKeyOperation {
    /// Constraint name.
    pub name: String,
    /// Schema of the table.
    pub schema: Option<String>,
    /// Table name.
    pub table: String,
}

/// Drop schema operation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DropSchemaOperation {
    /// Schema name.
    pub name: String,
}

/// Drop sequence operation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DropSequenceOperation {
    /// Sequence name.
    pub name: String,
    /// Schema of the sequence.
    pub schema: Option<String>,
}

/// Drop table operation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DropTableOperation {
    /// Table name.
    pub name: String,
    /// Schema of the table.
    pub schema: Option<String>,
}

/// Drop unique constraint operation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DropUniqueConstraintOperation {
    /// Constraint name.
    pub name: String,
    /// Schema of the table.
    pub schema: Option<String>,
    /// Table name.
    pub table: String,
}

/// Rename column operation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenameColumnOperation {
    /// Current column name.
    pub name: String,
    /// Schema of the table.
    pub schema: Option<String>,
    /// Table name.
    pub table: String,
    /// New column name.
    pub new_name: String,
}

/// Rename index operation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenameIndexOperation {
    /// Current index name.
    pub name: String,
    /// Schema of the table.
    pub schema: Option<String>,
    /// Table name.
    pub table: String,
    /// New index name.
    pub new_name: String,
}

/// Rename sequence operation. Either part of the new location may be absent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenameSequenceOperation {
    /// Current sequence name.
    pub name: String,
    /// Current schema.
    pub schema: Option<String>,
    /// New sequence name.
    pub new_name: Option<String>,
    /// Schema to move the sequence to.
    pub new_schema: Option<String>,
}

/// Rename table operation. Either part of the new location may be absent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenameTableOperation {
    /// Current table name.
    pub name: String,
    /// Current schema.
    pub schema: Option<String>,
    /// New table name.
    pub new_name: Option<String>,
    /// Schema to move the table to.
    pub new_schema: Option<String>,
}

/// Restart sequence operation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RestartSequenceOperation {
    /// Sequence name.
    pub name: String,
    /// Schema of the sequence.
    pub schema: Option<String>,
    /// Value the sequence restarts at.
    pub restart_with: i64,
}

/// Raw SQL operation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SqlOperation {
    /// SQL to run.
    pub sql: String,
    /// Whether to run the SQL outside the migration transaction.
    pub suppress_transaction: bool,
}

/// Writes `schema.name`, or just `name` for the default schema.
fn qualified(f: &mut fmt::Formatter<'_>, schema: Option<&str>, name: &str) -> fmt::Result {
    match schema {
        Some(schema) => write!(f, "{schema}.{name}"),
        None => f.write_str(name),
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.kind())?;
        match self {
            Self::AddColumn(AddColumnOperation {
                name,
                schema,
                table,
                ..
            })
            | Self::AlterColumn(AlterColumnOperation {
                name,
                schema,
                table,
                ..
            })
            | Self::DropColumn(DropColumnOperation {
                name,
                schema,
                table,
            }) => {
                qualified(f, schema.as_deref(), table)?;
                write!(f, ".{name}")?;
            }
            Self::AddForeignKey(op) => {
                write!(f, "{} ", op.name)?;
                qualified(f, op.schema.as_deref(), &op.table)?;
                f.write_str(" -> ")?;
                qualified(f, op.referenced_schema.as_deref(), &op.referenced_table)?;
            }
            Self::AddPrimaryKey(AddPrimaryKeyOperation {
                name,
                schema,
                table,
                ..
            })
            | Self::AddUniqueConstraint(AddUniqueConstraintOperation {
                name,
                schema,
                table,
                ..
            })
            | Self::CreateIndex(CreateIndexOperation {
                name,
                schema,
                table,
                ..
            })
            | Self::DropForeignKey(DropForeignKeyOperation {
                name,
                schema,
                table,
            })
            | Self::DropIndex(DropIndexOperation {
                name,
                schema,
                table,
            })
            | Self::DropPrimaryKey(DropPrimaryKeyOperation {
                name,
                schema,
                table,
            })
            | Self::DropUniqueConstraint(DropUniqueConstraintOperation {
                name,
                schema,
                table,
            }) => {
                write!(f, "{name} on ")?;
                qualified(f, schema.as_deref(), table)?;
            }
            Self::AlterSequence(AlterSequenceOperation { name, schema, .. })
            | Self::CreateSequence(CreateSequenceOperation { name, schema, .. })
            | Self::CreateTable(CreateTableOperation { name, schema, .. })
            | Self::DropSequence(DropSequenceOperation { name, schema })
            | Self::DropTable(DropTableOperation { name, schema })
            | Self::RestartSequence(RestartSequenceOperation { name, schema, .. }) => {
                qualified(f, schema.as_deref(), name)?;
            }
            Self::CreateSchema(CreateSchemaOperation { name })
            | Self::DropSchema(DropSchemaOperation { name }) => f.write_str(name)?,
            Self::RenameColumn(RenameColumnOperation {
                name,
                schema,
                table,
                new_name,
            })
            | Self::RenameIndex(RenameIndexOperation {
                name,
                schema,
                table,
                new_name,
            }) => {
                qualified(f, schema.as_deref(), table)?;
                write!(f, ".{name} -> {new_name}")?;
            }
            Self::RenameSequence(RenameSequenceOperation {
                name,
                schema,
                new_name,
                new_schema,
            })
            | Self::RenameTable(RenameTableOperation {
                name,
                schema,
                new_name,
                new_schema,
            }) => {
                qualified(f, schema.as_deref(), name)?;
                f.write_str(" -> ")?;
                qualified(
                    f,
                    new_schema.as_deref().or(schema.as_deref()),
                    new_name.as_deref().unwrap_or(name),
                )?;
            }
            Self::Sql(_) => f.write_str("...")?,
        }
        f.write_str(")")
    }
}
