//! Parameter lists of the builder methods, in declaration order.
//!
//! Names and order match the arguments written by the generator.

use oxide_migrations::OperationKind;

use super::arguments::{opt, req, Param};

const COLUMN_DEFINITION: &[Param] = &[
    req("name"),
    opt("schema"),
    req("table"),
    req("type"),
    opt("nullable"),
    opt("defaultValue"),
    opt("defaultExpression"),
];

const ADD_FOREIGN_KEY: &[Param] = &[
    req("name"),
    opt("schema"),
    req("table"),
    opt("column"),
    opt("columns"),
    opt("referencedSchema"),
    req("referencedTable"),
    opt("referencedColumn"),
    opt("referencedColumns"),
    opt("onUpdate"),
    opt("onDelete"),
];

const KEY: &[Param] = &[
    req("name"),
    opt("schema"),
    req("table"),
    opt("column"),
    opt("columns"),
];

const ALTER_SEQUENCE: &[Param] = &[
    req("name"),
    opt("schema"),
    opt("incrementBy"),
    opt("minValue"),
    opt("maxValue"),
    opt("cycle"),
];

const CREATE_INDEX: &[Param] = &[
    req("name"),
    opt("schema"),
    req("table"),
    opt("column"),
    opt("columns"),
    opt("unique"),
];

const NAME_ONLY: &[Param] = &[req("name")];

const CREATE_SEQUENCE: &[Param] = &[
    req("name"),
    opt("schema"),
    opt("type"),
    opt("startWith"),
    opt("incrementBy"),
    opt("minValue"),
    opt("maxValue"),
    opt("cycle"),
];

const CREATE_TABLE: &[Param] = &[
    req("name"),
    opt("schema"),
    req("columns"),
    opt("constraints"),
];

const TABLE_CHILD: &[Param] = &[req("name"), opt("schema"), req("table")];

const SCHEMA_OBJECT: &[Param] = &[req("name"), opt("schema")];

const RENAME_IN_TABLE: &[Param] = &[req("name"), opt("schema"), req("table"), req("newName")];

const RENAME_OBJECT: &[Param] = &[req("name"), opt("schema"), opt("newName"), opt("newSchema")];

const RESTART_SEQUENCE: &[Param] = &[req("name"), opt("schema"), req("with")];

const SQL: &[Param] = &[req("sql"), opt("suppressTransaction")];

/// `table.Column(...)` inside a columns block.
pub const COLUMN: &[Param] = &[
    opt("name"),
    req("type"),
    opt("nullable"),
    opt("defaultValue"),
    opt("defaultExpression"),
];

/// `table.PrimaryKey(...)` and `table.Unique(...)`.
pub const TABLE_KEY: &[Param] = &[req("name"), req("columns")];

/// `table.ForeignKey(...)`.
pub const TABLE_FOREIGN_KEY: &[Param] = &[
    req("name"),
    req("columns"),
    opt("referencedSchema"),
    req("referencedTable"),
    opt("referencedColumn"),
    opt("referencedColumns"),
    opt("onUpdate"),
    opt("onDelete"),
];

/// Returns the parameters of the builder method for `kind`.
pub const fn of(kind: OperationKind) -> &'static [Param] {
    match kind {
        OperationKind::AddColumn | OperationKind::AlterColumn => COLUMN_DEFINITION,
        OperationKind::AddForeignKey => ADD_FOREIGN_KEY,
        OperationKind::AddPrimaryKey | OperationKind::AddUniqueConstraint => KEY,
        OperationKind::AlterSequence => ALTER_SEQUENCE,
        OperationKind::CreateIndex => CREATE_INDEX,
        OperationKind::CreateSchema | OperationKind::DropSchema => NAME_ONLY,
        OperationKind::CreateSequence => CREATE_SEQUENCE,
        OperationKind::CreateTable => CREATE_TABLE,
        OperationKind::DropColumn
        | OperationKind::DropForeignKey
        | OperationKind::DropIndex
        | OperationKind::DropPrimaryKey
        | OperationKind::DropUniqueConstraint => TABLE_CHILD,
        OperationKind::DropSequence | OperationKind::DropTable => SCHEMA_OBJECT,
        OperationKind::RenameColumn | OperationKind::RenameIndex => RENAME_IN_TABLE,
        OperationKind::RenameSequence | OperationKind::RenameTable => RENAME_OBJECT,
        OperationKind::RestartSequence => RESTART_SEQUENCE,
        OperationKind::Sql => SQL,
    }
}
