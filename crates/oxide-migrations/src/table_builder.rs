//! Column and constraint declarations for a table being created.
//!
//! A [`CreateTableBuilder`] writes straight into the `CreateTable` operation
//! already recorded by the [`MigrationBuilder`](crate::MigrationBuilder).
//! Children never take a table or schema of their own: both are copied from
//! the table, and [`CreateTableBuilder::schema`] rewrites the schema of every
//! child declared so far. The child builders have no schema setter of their
//! own.
//!
//! ```rust
//! use oxide_migrations::{MigrationBuilder, ReferentialAction};
//!
//! let mut mb = MigrationBuilder::new();
//! let mut table = mb.create_table("Post");
//! table.schema("dbo");
//! let id = table.column("Id", "int").build();
//! let blog_id = table.column("BlogId", "int").nullable(true).build();
//! table.primary_key("PK_Post", &[id]);
//! table
//!     .foreign_key("FK_Post_Blog_BlogId", &[blog_id], "Blog")
//!     .on_delete(ReferentialAction::Cascade);
//! ```

use tracing::warn;

use crate::operation::{
    AddColumnOperation, AddForeignKeyOperation, AddPrimaryKeyOperation,
    AddUniqueConstraintOperation, CreateTableOperation,
};
use crate::value::DefaultValue;

/// Handle to a column declared on a [`CreateTableBuilder`], used to select
/// the columns of a constraint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnRef {
    name: String,
    table: String,
    schema: Option<String>,
}

impl ColumnRef {
    /// Column name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Table the column was declared on.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Schema of the table when the column was declared.
    #[must_use]
    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }
}

/// Declares the columns and constraints of a table.
#[derive(Debug)]
pub struct CreateTableBuilder<'a> {
    operation: &'a mut CreateTableOperation,
}

impl<'a> CreateTableBuilder<'a> {
    pub(crate) const fn new(operation: &'a mut CreateTableOperation) -> Self {
        Self { operation }
    }

    /// Returns the table as declared so far.
    #[must_use]
    pub const fn operation(&self) -> &CreateTableOperation {
        self.operation
    }

    /// Sets the schema of the table and of every child declared on it.
    pub fn schema(&mut self, schema: impl Into<String>) -> &mut Self {
        let schema = Some(schema.into());
        let table = &mut *self.operation;
        for column in &mut table.columns {
            column.schema.clone_from(&schema);
        }
        if let Some(pk) = &mut table.primary_key {
            pk.schema.clone_from(&schema);
        }
        for fk in &mut table.foreign_keys {
            fk.schema.clone_from(&schema);
        }
        for unique in &mut table.unique_constraints {
            unique.schema.clone_from(&schema);
        }
        table.schema = schema;
        self
    }

    /// Declares a column. Call [`ColumnBuilder::build`] to get a handle for
    /// constraint selectors.
    pub fn column(
        &mut self,
        name: impl Into<String>,
        column_type: impl Into<String>,
    ) -> ColumnBuilder<'_> {
        let table = &mut *self.operation;
        let column = push(
            &mut table.columns,
            AddColumnOperation {
                name: name.into(),
                schema: table.schema.clone(),
                table: table.name.clone(),
                column_type: column_type.into(),
                ..Default::default()
            },
        );
        ColumnBuilder { column }
    }

    /// Sets the primary key, replacing any previous one.
    pub fn primary_key(
        &mut self,
        name: impl Into<String>,
        columns: &[ColumnRef],
    ) -> &mut Self {
        let columns = self.column_names(columns);
        let table = &mut *self.operation;
        if let Some(previous) = &table.primary_key {
            warn!(
                table = %table.name,
                previous = %previous.name,
                "Replacing primary key"
            );
        }
        table.primary_key = Some(AddPrimaryKeyOperation {
            name: name.into(),
            schema: table.schema.clone(),
            table: table.name.clone(),
            columns,
        });
        self
    }

    /// Adds a foreign key referencing `referenced_table`.
    pub fn foreign_key(
        &mut self,
        name: impl Into<String>,
        columns: &[ColumnRef],
        referenced_table: impl Into<String>,
    ) -> ForeignKeyBuilder<'_> {
        let columns = self.column_names(columns);
        let table = &mut *self.operation;
        let operation = push(
            &mut table.foreign_keys,
            AddForeignKeyOperation {
                name: name.into(),
                schema: table.schema.clone(),
                table: table.name.clone(),
                columns,
                referenced_table: referenced_table.into(),
                ..Default::default()
            },
        );
        ForeignKeyBuilder { operation }
    }

    /// Adds a unique constraint.
    pub fn unique(
        &mut self,
        name: impl Into<String>,
        columns: &[ColumnRef],
    ) -> &mut Self {
        let columns = self.column_names(columns);
        let table = &mut *self.operation;
        table.unique_constraints.push(AddUniqueConstraintOperation {
            name: name.into(),
            schema: table.schema.clone(),
            table: table.name.clone(),
            columns,
        });
        self
    }

    fn column_names(&self, columns: &[ColumnRef]) -> Vec<String> {
        columns
            .iter()
            .map(|column| {
                if column.table != self.operation.name {
                    warn!(
                        table = %self.operation.name,
                        column = %column.name,
                        declared_on = %column.table,
                        "Constraint selects a column of another table"
                    );
                }
                column.name.clone()
            })
            .collect()
    }
}

fn push<T>(items: &mut Vec<T>, item: T) -> &mut T {
    let index = items.len();
    items.push(item);
    &mut items[index]
}

/// Configures the referenced side of a foreign key declared on a
/// [`CreateTableBuilder`].
#[derive(Debug)]
pub struct ForeignKeyBuilder<'a> {
    pub(crate) operation: &'a mut AddForeignKeyOperation,
}

impl ForeignKeyBuilder<'_> {
    /// Returns the foreign key as declared so far.
    #[must_use]
    pub const fn operation(&self) -> &AddForeignKeyOperation {
        self.operation
    }
}

/// Configures a column declared on a [`CreateTableBuilder`].
#[derive(Debug)]
pub struct ColumnBuilder<'a> {
    column: &'a mut AddColumnOperation,
}

impl ColumnBuilder<'_> {
    /// Sets whether the column accepts NULL.
    pub const fn nullable(&mut self, nullable: bool) -> &mut Self {
        self.column.is_nullable = nullable;
        self
    }

    /// Sets a literal default value.
    pub fn default_value(&mut self, value: impl Into<DefaultValue>) -> &mut Self {
        self.column.default_value = Some(value.into());
        self
    }

    /// Sets a raw SQL default expression.
    pub fn default_expression(&mut self, expression: impl Into<String>) -> &mut Self {
        self.column.default_expression = Some(expression.into());
        self
    }

    /// Returns a handle to the column for use in constraints.
    #[must_use]
    pub fn build(&self) -> ColumnRef {
        ColumnRef {
            name: self.column.name.clone(),
            table: self.column.table.clone(),
            schema: self.column.schema.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::MigrationBuilder;
    use crate::operation::Operation;
    use crate::value::ReferentialAction;

    fn single_table(mb: MigrationBuilder) -> CreateTableOperation {
        match mb.into_operations().as_slice() {
            [Operation::CreateTable(table)] => table.clone(),
            other => panic!("Expected one CreateTable operation, got {other:?}"),
        }
    }

    #[test]
    fn children_inherit_table_and_schema() {
        let mut mb = MigrationBuilder::new();
        {
            let mut table = mb.create_table("Post");
            let id = table.column("Id", "int").build();
            table.schema("dbo");
            let alt = table.column("AltId", "int").build();
            table.primary_key("PK_Post", &[id]);
            table.unique("AK_Post_AltId", &[alt]);
        }

        let table = single_table(mb);
        assert_eq!(table.schema.as_deref(), Some("dbo"));
        for column in &table.columns {
            assert_eq!(column.table, "Post");
            assert_eq!(column.schema.as_deref(), Some("dbo"));
        }
        let pk = table.primary_key.expect("primary key");
        assert_eq!(pk.table, "Post");
        assert_eq!(pk.schema.as_deref(), Some("dbo"));
        assert_eq!(pk.columns, vec!["Id"]);
        assert_eq!(table.unique_constraints[0].columns, vec!["AltId"]);
    }

    #[test]
    fn schema_rewrites_existing_constraints() {
        let mut mb = MigrationBuilder::new();
        {
            let mut table = mb.create_table("Post");
            let blog = table.column("BlogId", "int").build();
            table.foreign_key("FK", &[blog], "Blog");
            table.schema("my");
        }
        let table = single_table(mb);
        assert_eq!(table.foreign_keys[0].schema.as_deref(), Some("my"));
    }

    #[test]
    fn column_configuration() {
        let mut mb = MigrationBuilder::new();
        {
            let mut table = mb.create_table("Post");
            let id = table
                .column("Post Id", "int")
                .nullable(true)
                .default_value(1)
                .build();
            assert_eq!(id.name(), "Post Id");
            assert_eq!(id.table(), "Post");
            assert_eq!(id.schema(), None);
            table
                .column("Created", "datetime")
                .default_expression("getdate()");
        }
        let table = single_table(mb);
        assert!(table.columns[0].is_nullable);
        assert_eq!(table.columns[0].default_value, Some(DefaultValue::Int(1)));
        assert!(!table.columns[1].is_nullable);
        assert_eq!(
            table.columns[1].default_expression.as_deref(),
            Some("getdate()")
        );
    }

    #[test]
    fn composite_foreign_key_with_actions() {
        let mut mb = MigrationBuilder::new();
        {
            let mut table = mb.create_table("Post");
            let one = table.column("BlogId1", "int").build();
            let two = table.column("BlogId2", "int").build();
            table
                .foreign_key("FK_Post_Blog", &[one, two], "Blog")
                .referenced_schema("my")
                .referenced_columns(["Id1", "Id2"])
                .on_delete(ReferentialAction::Cascade);
        }
        let fk = &single_table(mb).foreign_keys[0];
        assert_eq!(fk.columns, vec!["BlogId1", "BlogId2"]);
        assert_eq!(fk.referenced_columns, vec!["Id1", "Id2"]);
        assert_eq!(fk.on_delete, ReferentialAction::Cascade);
        assert_eq!(fk.on_update, ReferentialAction::NoAction);
    }

    #[test]
    fn constraints_chain_and_keep_the_table_schema() {
        let mut mb = MigrationBuilder::new();
        {
            let mut table = mb.create_table("Post");
            table.schema("dbo");
            let id = table.column("Id", "int").build();
            let blog = table.column("BlogId", "int").build();
            table
                .primary_key("PK_Post", &[id.clone()])
                .unique("AK_Post_Id", &[id]);
            let mut fk = table.foreign_key("FK_Post_Blog", &[blog], "Blog");
            fk.referenced_schema("my").referenced_columns(["Id"]);
            assert_eq!(fk.operation().schema.as_deref(), Some("dbo"));
            assert_eq!(fk.operation().referenced_schema.as_deref(), Some("my"));
        }
        let table = single_table(mb);
        assert_eq!(table.primary_key.expect("pk").schema.as_deref(), Some("dbo"));
        assert_eq!(table.unique_constraints[0].schema.as_deref(), Some("dbo"));
        assert_eq!(table.foreign_keys[0].schema.as_deref(), Some("dbo"));
        assert_eq!(table.foreign_keys[0].referenced_columns, vec!["Id"]);
    }

    #[test]
    fn push_returns_the_new_item() {
        let mut items = vec![1, 2];
        *push(&mut items, 3) += 10;
        assert_eq!(items, vec![1, 2, 13]);
    }

    #[test]
    fn second_primary_key_replaces_first() {
        let mut mb = MigrationBuilder::new();
        {
            let mut table = mb.create_table("Post");
            let id = table.column("Id", "int").build();
            table.primary_key("PK_A", &[id.clone()]);
            table.primary_key("PK_B", &[id]);
        }
        assert_eq!(single_table(mb).primary_key.expect("pk").name, "PK_B");
    }
}
