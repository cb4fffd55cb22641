//! # oxide-migrations
//!
//! Typed schema-migration operations and the builder that records them.
//!
//! This crate provides:
//! - [`Operation`], a closed set of 24 schema changes (tables, columns, keys,
//!   constraints, indexes, sequences, schemas and raw SQL)
//! - [`MigrationBuilder`], one entry point per operation kind, recording
//!   operations in call order
//! - [`CreateTableBuilder`], the nested column and constraint declarations
//!   of a new table
//!
//! Operations compare structurally and serialize with `serde`, so a diffing
//! tool can hand them over as JSON.
//!
//! ```rust
//! use oxide_migrations::{MigrationBuilder, Operation};
//!
//! let mut mb = MigrationBuilder::new();
//! {
//!     let mut table = mb.create_table("Post");
//!     let id = table.column("Id", "int").build();
//!     table.primary_key("PK_Post", &[id]);
//! }
//! mb.create_index("IX_Post_Title", "Post", ["Title"]).unique(true);
//!
//! let operations = mb.into_operations();
//! assert!(matches!(operations[0], Operation::CreateTable(_)));
//! assert_eq!(operations[1].kind().method_name(), "CreateIndex");
//! ```

pub mod builder;
pub mod operation;
pub mod table_builder;
pub mod value;

pub use builder::{MigrationBuilder, OperationBuilder};
pub use operation::{
    AddColumnOperation, AddForeignKeyOperation, AddPrimaryKeyOperation,
    AddUniqueConstraintOperation, AlterColumnOperation, AlterSequenceOperation,
    CreateIndexOperation, CreateSchemaOperation, CreateSequenceOperation, CreateTableOperation,
    DropColumnOperation, DropForeignKeyOperation, DropIndexOperation, DropPrimaryKeyOperation,
    DropSchemaOperation, DropSequenceOperation, DropTableOperation,
    DropUniqueConstraintOperation, Operation, OperationKind, OperationVariant,
    RenameColumnOperation, RenameIndexOperation, RenameSequenceOperation, RenameTableOperation,
    RestartSequenceOperation, SqlOperation,
};
pub use table_builder::{ColumnBuilder, ColumnRef, CreateTableBuilder, ForeignKeyBuilder};
pub use value::{DefaultValue, ReferentialAction, UnknownReferentialAction};
