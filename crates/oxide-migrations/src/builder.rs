//! The migration builder.
//!
//! [`MigrationBuilder`] records operations in call order. Every entry point
//! appends its operation immediately, filled with the documented defaults,
//! and hands back an [`OperationBuilder`] whose setters fill in the optional
//! fields of that operation in place.
//!
//! ```rust
//! use oxide_migrations::{MigrationBuilder, ReferentialAction};
//!
//! let mut mb = MigrationBuilder::new();
//! mb.drop_table("Post").schema("dbo");
//! mb.add_foreign_key("FK_Post_Blog", "Post", ["BlogId"], "Blog")
//!     .on_delete(ReferentialAction::Cascade);
//!
//! assert_eq!(mb.operations().len(), 2);
//! ```

use tracing::trace;

use crate::operation::{
    AddColumnOperation, AddForeignKeyOperation, AddPrimaryKeyOperation,
    AddUniqueConstraintOperation, AlterColumnOperation, AlterSequenceOperation,
    CreateIndexOperation, CreateSchemaOperation, CreateSequenceOperation, CreateTableOperation,
    DropColumnOperation, DropForeignKeyOperation, DropIndexOperation, DropPrimaryKeyOperation,
    DropSchemaOperation, DropSequenceOperation, DropTableOperation,
    DropUniqueConstraintOperation, Operation, OperationVariant, RenameColumnOperation,
    RenameIndexOperation, RenameSequenceOperation, RenameTableOperation,
    RestartSequenceOperation, SqlOperation,
};
use crate::table_builder::{CreateTableBuilder, ForeignKeyBuilder};
use crate::value::{DefaultValue, ReferentialAction};

fn strings<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    items.into_iter().map(Into::into).collect()
}

/// Collects migration operations in call order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MigrationBuilder {
    operations: Vec<Operation>,
}

impl MigrationBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            operations: Vec::new(),
        }
    }

    /// Returns the operations recorded so far.
    #[must_use]
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Consumes the builder and returns the recorded operations.
    #[must_use]
    pub fn into_operations(self) -> Vec<Operation> {
        self.operations
    }

    fn push<T: OperationVariant>(&mut self, operation: T) -> OperationBuilder<'_, T> {
        trace!(
            kind = %T::KIND,
            index = self.operations.len(),
            "Recorded migration operation"
        );
        let index = self.operations.len();
        self.operations.push(operation.into());
        match T::from_operation_mut(&mut self.operations[index]) {
            Some(operation) => OperationBuilder::new(operation),
            None => unreachable!("{} recorded as another kind", T::KIND),
        }
    }

    /// Adds a column to an existing table.
    pub fn add_column(
        &mut self,
        name: impl Into<String>,
        table: impl Into<String>,
        column_type: impl Into<String>,
    ) -> OperationBuilder<'_, AddColumnOperation> {
        self.push(AddColumnOperation {
            name: name.into(),
            table: table.into(),
            column_type: column_type.into(),
            ..Default::default()
        })
    }

    /// Adds a foreign key to an existing table.
    pub fn add_foreign_key<I, S>(
        &mut self,
        name: impl Into<String>,
        table: impl Into<String>,
        columns: I,
        referenced_table: impl Into<String>,
    ) -> OperationBuilder<'_, AddForeignKeyOperation>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push(AddForeignKeyOperation {
            name: name.into(),
            table: table.into(),
            columns: strings(columns),
            referenced_table: referenced_table.into(),
            ..Default::default()
        })
    }

    /// Adds a primary key to an existing table.
    pub fn add_primary_key<I, S>(
        &mut self,
        name: impl Into<String>,
        table: impl Into<String>,
        columns: I,
    ) -> OperationBuilder<'_, AddPrimaryKeyOperation>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push(AddPrimaryKeyOperation {
            name: name.into(),
            schema: None,
            table: table.into(),
            columns: strings(columns),
        })
    }

    /// Adds a unique constraint to an existing table.
    pub fn add_unique_constraint<I, S>(
        &mut self,
        name: impl Into<String>,
        table: impl Into<String>,
        columns: I,
    ) -> OperationBuilder<'_, AddUniqueConstraintOperation>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push(AddUniqueConstraintOperation {
            name: name.into(),
            schema: None,
            table: table.into(),
            columns: strings(columns),
        })
    }

    /// Replaces the definition of an existing column.
    pub fn alter_column(
        &mut self,
        name: impl Into<String>,
        table: impl Into<String>,
        column_type: impl Into<String>,
    ) -> OperationBuilder<'_, AlterColumnOperation> {
        self.push(AlterColumnOperation {
            name: name.into(),
            table: table.into(),
            column_type: column_type.into(),
            ..Default::default()
        })
    }

    /// Alters a sequence.
    pub fn alter_sequence(
        &mut self,
        name: impl Into<String>,
    ) -> OperationBuilder<'_, AlterSequenceOperation> {
        self.push(AlterSequenceOperation {
            name: name.into(),
            ..Default::default()
        })
    }

    /// Creates an index.
    pub fn create_index<I, S>(
        &mut self,
        name: impl Into<String>,
        table: impl Into<String>,
        columns: I,
    ) -> OperationBuilder<'_, CreateIndexOperation>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push(CreateIndexOperation {
            name: name.into(),
            table: table.into(),
            columns: strings(columns),
            ..Default::default()
        })
    }

    /// Creates a schema.
    pub fn create_schema(
        &mut self,
        name: impl Into<String>,
    ) -> OperationBuilder<'_, CreateSchemaOperation> {
        self.push(CreateSchemaOperation { name: name.into() })
    }

    /// Creates a sequence.
    pub fn create_sequence(
        &mut self,
        name: impl Into<String>,
    ) -> OperationBuilder<'_, CreateSequenceOperation> {
        self.push(CreateSequenceOperation {
            name: name.into(),
            ..Default::default()
        })
    }

    /// Creates a table. Columns and constraints are declared on the returned
    /// [`CreateTableBuilder`].
    pub fn create_table(&mut self, name: impl Into<String>) -> CreateTableBuilder<'_> {
        let builder = self.push(CreateTableOperation {
            name: name.into(),
            ..Default::default()
        });
        CreateTableBuilder::new(builder.operation)
    }

    /// Drops a column.
    pub fn drop_column(
        &mut self,
        name: impl Into<String>,
        table: impl Into<String>,
    ) -> OperationBuilder<'_, DropColumnOperation> {
        self.push(DropColumnOperation {
            name: name.into(),
            schema: None,
            table: table.into(),
        })
    }

    /// Drops a foreign key.
    pub fn drop_foreign_key(
        &mut self,
        name: impl Into<String>,
        table: impl Into<String>,
    ) -> OperationBuilder<'_, DropForeignKeyOperation> {
        self.push(DropForeignKeyOperation {
            name: name.into(),
            schema: None,
            table: table.into(),
        })
    }

    /// Drops an index.
    pub fn drop_index(
        &mut self,
        name: impl Into<String>,
        table: impl Into<String>,
    ) -> OperationBuilder<'_, DropIndexOperation> {
        self.push(DropIndexOperation {
            name: name.into(),
            schema: None,
            table: table.into(),
        })
    }

    /// Drops a primary key.
    pub fn drop_primary_key(
        &mut self,
        name: impl Into<String>,
        table: impl Into<String>,
    ) -> OperationBuilder<'_, DropPrimaryKeyOperation> {
        self.push(DropPrimaryKeyOperation {
            name: name.into(),
            schema: None,
            table: table.into(),
        })
    }

    /// Drops a schema.
    pub fn drop_schema(
        &mut self,
        name: impl Into<String>,
    ) -> OperationBuilder<'_, DropSchemaOperation> {
        self.push(DropSchemaOperation { name: name.into() })
    }

    /// Drops a sequence.
    pub fn drop_sequence(
        &mut self,
        name: impl Into<String>,
    ) -> OperationBuilder<'_, DropSequenceOperation> {
        self.push(DropSequenceOperation {
            name: name.into(),
            schema: None,
        })
    }

    /// Drops a table.
    pub fn drop_table(&mut self, name: impl Into<String>) -> OperationBuilder<'_, DropTableOperation> {
        self.push(DropTableOperation {
            name: name.into(),
            schema: None,
        })
    }

    /// Drops a unique constraint.
    pub fn drop_unique_constraint(
        &mut self,
        name: impl Into<String>,
        table: impl Into<String>,
    ) -> OperationBuilder<'_, DropUniqueConstraintOperation> {
        self.push(DropUniqueConstraintOperation {
            name: name.into(),
            schema: None,
            table: table.into(),
        })
    }

    /// Renames a column.
    pub fn rename_column(
        &mut self,
        name: impl Into<String>,
        table: impl Into<String>,
        new_name: impl Into<String>,
    ) -> OperationBuilder<'_, RenameColumnOperation> {
        self.push(RenameColumnOperation {
            name: name.into(),
            schema: None,
            table: table.into(),
            new_name: new_name.into(),
        })
    }

    /// Renames an index.
    pub fn rename_index(
        &mut self,
        name: impl Into<String>,
        table: impl Into<String>,
        new_name: impl Into<String>,
    ) -> OperationBuilder<'_, RenameIndexOperation> {
        self.push(RenameIndexOperation {
            name: name.into(),
            schema: None,
            table: table.into(),
            new_name: new_name.into(),
        })
    }

    /// Renames and/or moves a sequence.
    pub fn rename_sequence(
        &mut self,
        name: impl Into<String>,
    ) -> OperationBuilder<'_, RenameSequenceOperation> {
        self.push(RenameSequenceOperation {
            name: name.into(),
            ..Default::default()
        })
    }

    /// Renames and/or moves a table.
    pub fn rename_table(
        &mut self,
        name: impl Into<String>,
    ) -> OperationBuilder<'_, RenameTableOperation> {
        self.push(RenameTableOperation {
            name: name.into(),
            ..Default::default()
        })
    }

    /// Restarts a sequence at `restart_with`.
    pub fn restart_sequence(
        &mut self,
        name: impl Into<String>,
        restart_with: i64,
    ) -> OperationBuilder<'_, RestartSequenceOperation> {
        self.push(RestartSequenceOperation {
            name: name.into(),
            schema: None,
            restart_with,
        })
    }

    /// Runs raw SQL.
    pub fn sql(&mut self, sql: impl Into<String>) -> OperationBuilder<'_, SqlOperation> {
        self.push(SqlOperation {
            sql: sql.into(),
            suppress_transaction: false,
        })
    }
}

/// Fills in the optional fields of an operation that has already been
/// recorded.
#[derive(Debug)]
pub struct OperationBuilder<'a, T> {
    operation: &'a mut T,
}

impl<'a, T> OperationBuilder<'a, T> {
    const fn new(operation: &'a mut T) -> Self {
        Self { operation }
    }

    /// Returns the operation as configured so far.
    #[must_use]
    pub const fn operation(&self) -> &T {
        self.operation
    }
}

macro_rules! impl_schema {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl OperationBuilder<'_, $ty> {
                /// Sets the schema.
                pub fn schema(&mut self, schema: impl Into<String>) -> &mut Self {
                    self.operation.schema = Some(schema.into());
                    self
                }
            }
        )+
    };
}

impl_schema!(
    AddColumnOperation,
    AddForeignKeyOperation,
    AddPrimaryKeyOperation,
    AddUniqueConstraintOperation,
    AlterColumnOperation,
    AlterSequenceOperation,
    CreateIndexOperation,
    CreateSequenceOperation,
    DropColumnOperation,
    DropForeignKeyOperation,
    DropIndexOperation,
    DropPrimaryKeyOperation,
    DropSequenceOperation,
    DropTableOperation,
    DropUniqueConstraintOperation,
    RenameColumnOperation,
    RenameIndexOperation,
    RenameSequenceOperation,
    RenameTableOperation,
    RestartSequenceOperation,
);

macro_rules! impl_column_setters {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl OperationBuilder<'_, $ty> {
                /// Sets whether the column accepts NULL.
                pub const fn nullable(&mut self, nullable: bool) -> &mut Self {
                    self.operation.is_nullable = nullable;
                    self
                }

                /// Sets a literal default value.
                pub fn default_value(&mut self, value: impl Into<DefaultValue>) -> &mut Self {
                    self.operation.default_value = Some(value.into());
                    self
                }

                /// Sets a raw SQL default expression.
                pub fn default_expression(&mut self, expression: impl Into<String>) -> &mut Self {
                    self.operation.default_expression = Some(expression.into());
                    self
                }
            }
        )+
    };
}

impl_column_setters!(AddColumnOperation, AlterColumnOperation);

macro_rules! impl_sequence_setters {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl OperationBuilder<'_, $ty> {
                /// Sets the increment.
                pub const fn increment_by(&mut self, increment_by: i32) -> &mut Self {
                    self.operation.increment_by = Some(increment_by);
                    self
                }

                /// Sets the minimum value.
                pub const fn min_value(&mut self, min_value: i64) -> &mut Self {
                    self.operation.min_value = Some(min_value);
                    self
                }

                /// Sets the maximum value.
                pub const fn max_value(&mut self, max_value: i64) -> &mut Self {
                    self.operation.max_value = Some(max_value);
                    self
                }

                /// Sets whether the sequence wraps around.
                pub const fn cycle(&mut self, cycle: bool) -> &mut Self {
                    self.operation.cycle = cycle;
                    self
                }
            }
        )+
    };
}

impl_sequence_setters!(AlterSequenceOperation, CreateSequenceOperation);

macro_rules! impl_rename_setters {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl OperationBuilder<'_, $ty> {
                /// Sets the new name.
                pub fn new_name(&mut self, new_name: impl Into<String>) -> &mut Self {
                    self.operation.new_name = Some(new_name.into());
                    self
                }

                /// Sets the schema to move to.
                pub fn new_schema(&mut self, new_schema: impl Into<String>) -> &mut Self {
                    self.operation.new_schema = Some(new_schema.into());
                    self
                }
            }
        )+
    };
}

impl_rename_setters!(RenameSequenceOperation, RenameTableOperation);

macro_rules! impl_foreign_key_setters {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $ty {
                /// Sets the schema of the referenced table.
                pub fn referenced_schema(&mut self, schema: impl Into<String>) -> &mut Self {
                    self.operation.referenced_schema = Some(schema.into());
                    self
                }

                /// Sets the referenced columns.
                pub fn referenced_columns<I, S>(&mut self, columns: I) -> &mut Self
                where
                    I: IntoIterator<Item = S>,
                    S: Into<String>,
                {
                    self.operation.referenced_columns = strings(columns);
                    self
                }

                /// Sets the ON UPDATE action.
                pub const fn on_update(&mut self, action: ReferentialAction) -> &mut Self {
                    self.operation.on_update = action;
                    self
                }

                /// Sets the ON DELETE action.
                pub const fn on_delete(&mut self, action: ReferentialAction) -> &mut Self {
                    self.operation.on_delete = action;
                    self
                }
            }
        )+
    };
}

impl_foreign_key_setters!(OperationBuilder<'_, AddForeignKeyOperation>, ForeignKeyBuilder<'_>);

impl OperationBuilder<'_, CreateIndexOperation> {
    /// Makes this a unique index.
    pub const fn unique(&mut self, unique: bool) -> &mut Self {
        self.operation.is_unique = unique;
        self
    }
}

impl OperationBuilder<'_, CreateSequenceOperation> {
    /// Sets the store type of the sequence values.
    pub fn sequence_type(&mut self, sequence_type: impl Into<String>) -> &mut Self {
        self.operation.sequence_type = Some(sequence_type.into());
        self
    }

    /// Sets the first value.
    pub const fn start_with(&mut self, start_with: i64) -> &mut Self {
        self.operation.start_with = Some(start_with);
        self
    }
}

impl OperationBuilder<'_, SqlOperation> {
    /// Runs the SQL outside the migration transaction.
    pub const fn suppress_transaction(&mut self, suppress: bool) -> &mut Self {
        self.operation.suppress_transaction = suppress;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_in_call_order() {
        let mut mb = MigrationBuilder::new();
        mb.create_schema("my");
        mb.drop_table("Post");
        mb.sql("SELECT 1");

        let kinds: Vec<_> = mb.operations().iter().map(Operation::kind).collect();
        assert_eq!(
            kinds.iter().map(|k| k.method_name()).collect::<Vec<_>>(),
            vec!["CreateSchema", "DropTable", "Sql"]
        );
    }

    #[test]
    fn required_only_uses_defaults() {
        let mut mb = MigrationBuilder::new();
        mb.add_column("Id", "Post", "int");

        assert_eq!(
            mb.into_operations(),
            vec![Operation::AddColumn(AddColumnOperation {
                name: "Id".into(),
                schema: None,
                table: "Post".into(),
                column_type: "int".into(),
                is_nullable: false,
                default_value: None,
                default_expression: None,
            })]
        );
    }

    #[test]
    fn setters_fill_optional_fields() {
        let mut mb = MigrationBuilder::new();
        mb.create_sequence("EntityFrameworkHiLoSequence")
            .schema("dbo")
            .sequence_type("bigint")
            .start_with(3)
            .increment_by(5)
            .min_value(2)
            .max_value(916)
            .cycle(true);

        let Operation::CreateSequence(op) = &mb.operations()[0] else {
            panic!("Expected CreateSequence operation");
        };
        assert_eq!(op.schema.as_deref(), Some("dbo"));
        assert_eq!(op.sequence_type.as_deref(), Some("bigint"));
        assert_eq!(op.start_with, Some(3));
        assert_eq!(op.increment_by, Some(5));
        assert_eq!(op.min_value, Some(2));
        assert_eq!(op.max_value, Some(916));
        assert!(op.cycle);
    }

    #[test]
    fn foreign_key_setters() {
        let mut mb = MigrationBuilder::new();
        mb.add_foreign_key("FK_Post_Blog_BlogId", "Post", ["BlogId"], "Blog")
            .referenced_schema("my")
            .referenced_columns(["Id"])
            .on_update(ReferentialAction::SetNull)
            .on_delete(ReferentialAction::SetDefault);

        let Operation::AddForeignKey(fk) = &mb.operations()[0] else {
            panic!("Expected AddForeignKey operation");
        };
        assert_eq!(fk.columns, vec!["BlogId"]);
        assert_eq!(fk.referenced_columns, vec!["Id"]);
        assert_eq!(fk.referenced_schema.as_deref(), Some("my"));
        assert_eq!(fk.on_update, ReferentialAction::SetNull);
        assert_eq!(fk.on_delete, ReferentialAction::SetDefault);
    }

    #[test]
    fn operation_builder_exposes_current_state() {
        let mut mb = MigrationBuilder::new();
        let mut rename = mb.rename_table("Post");
        rename.new_schema("dbo");
        assert_eq!(rename.operation().new_schema.as_deref(), Some("dbo"));
        assert!(rename.operation().new_name.is_none());
    }

    #[test]
    fn returned_builder_edits_the_operation_just_recorded() {
        let mut mb = MigrationBuilder::new();
        mb.drop_table("Blog");
        mb.drop_table("Post").schema("dbo");
        mb.sql("SELECT 1").suppress_transaction(true);

        assert_eq!(
            mb.operations()[0],
            Operation::DropTable(DropTableOperation {
                name: "Blog".into(),
                schema: None,
            })
        );
        assert_eq!(
            mb.operations()[1],
            Operation::DropTable(DropTableOperation {
                name: "Post".into(),
                schema: Some("dbo".into()),
            })
        );
        assert_eq!(
            mb.operations()[2],
            Operation::Sql(SqlOperation {
                sql: "SELECT 1".into(),
                suppress_transaction: true,
            })
        );
    }

    #[test]
    fn column_lists_keep_order_and_duplicates() {
        let mut mb = MigrationBuilder::new();
        mb.create_index("IX", "Post", ["B", "A", "B"]);
        let Operation::CreateIndex(index) = &mb.operations()[0] else {
            panic!("Expected CreateIndex operation");
        };
        assert_eq!(index.columns, vec!["B", "A", "B"]);
    }
}
