//! CreateTable with its nested columns and constraints blocks.

mod common;
use common::*;

use oxide_migrations::{MigrationBuilder, Operation, ReferentialAction};

#[test]
fn columns_required_args() {
    let mut mb = MigrationBuilder::new();
    mb.create_table("Post").column("Id", "int");

    check(
        &mb,
        concat!(
            "mb.CreateTable(\n",
            "    name: \"Post\",\n",
            "    columns: table => new\n",
            "    {\n",
            "        Id = table.Column(type: \"int\", nullable: false)\n",
            "    },\n",
            "    constraints: table =>\n",
            "    {\n",
            "    });\n",
        ),
    );
}

#[test]
fn columns_all_args() {
    let mut mb = MigrationBuilder::new();
    {
        let mut table = mb.create_table("Post");
        table.schema("dbo");
        table
            .column("Post Id", "int")
            .nullable(true)
            .default_value(1);
    }

    let ops = check(
        &mb,
        concat!(
            "mb.CreateTable(\n",
            "    name: \"Post\",\n",
            "    schema: \"dbo\",\n",
            "    columns: table => new\n",
            "    {\n",
            "        PostId = table.Column(name: \"Post Id\", type: \"int\", nullable: true, defaultValue: 1)\n",
            "    },\n",
            "    constraints: table =>\n",
            "    {\n",
            "    });\n",
        ),
    );
    let Operation::CreateTable(table) = &ops[0] else {
        panic!("Expected CreateTable, got {:?}", ops[0]);
    };
    assert_eq!(table.columns[0].name, "Post Id");
    assert_eq!(table.columns[0].schema.as_deref(), Some("dbo"));
    assert_eq!(table.columns[0].table, "Post");
}

#[test]
fn columns_default_expression() {
    let mut mb = MigrationBuilder::new();
    mb.create_table("Post")
        .column("Id", "int")
        .default_expression("1");

    check(
        &mb,
        concat!(
            "mb.CreateTable(\n",
            "    name: \"Post\",\n",
            "    columns: table => new\n",
            "    {\n",
            "        Id = table.Column(type: \"int\", nullable: false, defaultExpression: \"1\")\n",
            "    },\n",
            "    constraints: table =>\n",
            "    {\n",
            "    });\n",
        ),
    );
}

#[test]
fn foreign_keys_required_args() {
    let mut mb = MigrationBuilder::new();
    {
        let mut table = mb.create_table("Post");
        let blog = table.column("BlogId", "int").build();
        table.foreign_key("FK_Post_Blog_BlogId", &[blog], "Blog");
    }

    check(
        &mb,
        concat!(
            "mb.CreateTable(\n",
            "    name: \"Post\",\n",
            "    columns: table => new\n",
            "    {\n",
            "        BlogId = table.Column(type: \"int\", nullable: false)\n",
            "    },\n",
            "    constraints: table =>\n",
            "    {\n",
            "        table.ForeignKey(\n",
            "            name: \"FK_Post_Blog_BlogId\",\n",
            "            columns: x => x.BlogId,\n",
            "            referencedTable: \"Blog\");\n",
            "    });\n",
        ),
    );
}

#[test]
fn foreign_keys_all_args() {
    let mut mb = MigrationBuilder::new();
    {
        let mut table = mb.create_table("Post");
        table.schema("dbo");
        let blog = table.column("BlogId", "int").build();
        table
            .foreign_key("FK_Post_Blog_BlogId", &[blog], "Blog")
            .referenced_schema("my")
            .referenced_columns(["Id"])
            .on_update(ReferentialAction::SetNull)
            .on_delete(ReferentialAction::SetDefault);
    }

    let ops = check(
        &mb,
        concat!(
            "mb.CreateTable(\n",
            "    name: \"Post\",\n",
            "    schema: \"dbo\",\n",
            "    columns: table => new\n",
            "    {\n",
            "        BlogId = table.Column(type: \"int\", nullable: false)\n",
            "    },\n",
            "    constraints: table =>\n",
            "    {\n",
            "        table.ForeignKey(\n",
            "            name: \"FK_Post_Blog_BlogId\",\n",
            "            columns: x => x.BlogId,\n",
            "            referencedSchema: \"my\",\n",
            "            referencedTable: \"Blog\",\n",
            "            referencedColumn: \"Id\",\n",
            "            onUpdate: ReferentialAction.SetNull,\n",
            "            onDelete: ReferentialAction.SetDefault);\n",
            "    });\n",
        ),
    );
    let Operation::CreateTable(table) = &ops[0] else {
        panic!("Expected CreateTable, got {:?}", ops[0]);
    };
    let fk = &table.foreign_keys[0];
    assert_eq!(fk.schema.as_deref(), Some("dbo"));
    assert_eq!(fk.table, "Post");
    assert_eq!(fk.on_update, ReferentialAction::SetNull);
}

#[test]
fn foreign_keys_composite() {
    let mut mb = MigrationBuilder::new();
    {
        let mut table = mb.create_table("Post");
        let one = table.column("BlogId1", "int").build();
        let two = table.column("BlogId2", "int").build();
        table
            .foreign_key("FK_Post_Blog_BlogId1_BlogId2", &[one, two], "Blog")
            .referenced_columns(["Id1", "Id2"]);
    }

    check(
        &mb,
        concat!(
            "mb.CreateTable(\n",
            "    name: \"Post\",\n",
            "    columns: table => new\n",
            "    {\n",
            "        BlogId1 = table.Column(type: \"int\", nullable: false),\n",
            "        BlogId2 = table.Column(type: \"int\", nullable: false)\n",
            "    },\n",
            "    constraints: table =>\n",
            "    {\n",
            "        table.ForeignKey(\n",
            "            name: \"FK_Post_Blog_BlogId1_BlogId2\",\n",
            "            columns: x => new { x.BlogId1, x.BlogId2 },\n",
            "            referencedTable: \"Blog\",\n",
            "            referencedColumns: new[] { \"Id1\", \"Id2\" });\n",
            "    });\n",
        ),
    );
}

#[test]
fn primary_key_required_args() {
    let mut mb = MigrationBuilder::new();
    {
        let mut table = mb.create_table("Post");
        let id = table.column("Id", "int").build();
        table.primary_key("PK_Post", &[id]);
    }

    check(
        &mb,
        concat!(
            "mb.CreateTable(\n",
            "    name: \"Post\",\n",
            "    columns: table => new\n",
            "    {\n",
            "        Id = table.Column(type: \"int\", nullable: false)\n",
            "    },\n",
            "    constraints: table =>\n",
            "    {\n",
            "        table.PrimaryKey(\"PK_Post\", x => x.Id);\n",
            "    });\n",
        ),
    );
}

#[test]
fn primary_key_all_args() {
    let mut mb = MigrationBuilder::new();
    {
        let mut table = mb.create_table("Post");
        table.schema("dbo");
        let id = table.column("Id", "int").build();
        table.primary_key("PK_Post", &[id]);
    }

    check(
        &mb,
        concat!(
            "mb.CreateTable(\n",
            "    name: \"Post\",\n",
            "    schema: \"dbo\",\n",
            "    columns: table => new\n",
            "    {\n",
            "        Id = table.Column(type: \"int\", nullable: false)\n",
            "    },\n",
            "    constraints: table =>\n",
            "    {\n",
            "        table.PrimaryKey(\"PK_Post\", x => x.Id);\n",
            "    });\n",
        ),
    );
}

#[test]
fn primary_key_composite() {
    let mut mb = MigrationBuilder::new();
    {
        let mut table = mb.create_table("Post");
        let one = table.column("Id1", "int").build();
        let two = table.column("Id2", "int").build();
        table.primary_key("PK_Post", &[one, two]);
    }

    check(
        &mb,
        concat!(
            "mb.CreateTable(\n",
            "    name: \"Post\",\n",
            "    columns: table => new\n",
            "    {\n",
            "        Id1 = table.Column(type: \"int\", nullable: false),\n",
            "        Id2 = table.Column(type: \"int\", nullable: false)\n",
            "    },\n",
            "    constraints: table =>\n",
            "    {\n",
            "        table.PrimaryKey(\"PK_Post\", x => new { x.Id1, x.Id2 });\n",
            "    });\n",
        ),
    );
}

#[test]
fn unique_constraints_required_args() {
    let mut mb = MigrationBuilder::new();
    {
        let mut table = mb.create_table("Post");
        let alt = table.column("AltId", "int").build();
        table.unique("AK_Post_AltId", &[alt]);
    }

    check(
        &mb,
        concat!(
            "mb.CreateTable(\n",
            "    name: \"Post\",\n",
            "    columns: table => new\n",
            "    {\n",
            "        AltId = table.Column(type: \"int\", nullable: false)\n",
            "    },\n",
            "    constraints: table =>\n",
            "    {\n",
            "        table.Unique(\"AK_Post_AltId\", x => x.AltId);\n",
            "    });\n",
        ),
    );
}

#[test]
fn unique_constraints_all_args() {
    let mut mb = MigrationBuilder::new();
    {
        let mut table = mb.create_table("Post");
        table.schema("dbo");
        let alt = table.column("AltId", "int").build();
        table.unique("AK_Post_AltId", &[alt]);
    }

    check(
        &mb,
        concat!(
            "mb.CreateTable(\n",
            "    name: \"Post\",\n",
            "    schema: \"dbo\",\n",
            "    columns: table => new\n",
            "    {\n",
            "        AltId = table.Column(type: \"int\", nullable: false)\n",
            "    },\n",
            "    constraints: table =>\n",
            "    {\n",
            "        table.Unique(\"AK_Post_AltId\", x => x.AltId);\n",
            "    });\n",
        ),
    );
}

#[test]
fn unique_constraints_composite() {
    let mut mb = MigrationBuilder::new();
    {
        let mut table = mb.create_table("Post");
        let one = table.column("AltId1", "int").build();
        let two = table.column("AltId2", "int").build();
        table.unique("AK_Post_AltId1_AltId2", &[one, two]);
    }

    check(
        &mb,
        concat!(
            "mb.CreateTable(\n",
            "    name: \"Post\",\n",
            "    columns: table => new\n",
            "    {\n",
            "        AltId1 = table.Column(type: \"int\", nullable: false),\n",
            "        AltId2 = table.Column(type: \"int\", nullable: false)\n",
            "    },\n",
            "    constraints: table =>\n",
            "    {\n",
            "        table.Unique(\"AK_Post_AltId1_AltId2\", x => new { x.AltId1, x.AltId2 });\n",
            "    });\n",
        ),
    );
}

#[test]
fn constraints_are_written_primary_key_first() {
    let mut mb = MigrationBuilder::new();
    {
        let mut table = mb.create_table("Post");
        let id = table.column("Id", "int").build();
        let blog = table.column("BlogId", "int").nullable(true).build();
        let alt = table.column("AltId", "int").build();
        table.unique("AK_Post_AltId", &[alt]);
        table.foreign_key("FK_Post_Blog_BlogId", &[blog], "Blog");
        table.primary_key("PK_Post", &[id]);
    }

    check(
        &mb,
        concat!(
            "mb.CreateTable(\n",
            "    name: \"Post\",\n",
            "    columns: table => new\n",
            "    {\n",
            "        Id = table.Column(type: \"int\", nullable: false),\n",
            "        BlogId = table.Column(type: \"int\", nullable: true),\n",
            "        AltId = table.Column(type: \"int\", nullable: false)\n",
            "    },\n",
            "    constraints: table =>\n",
            "    {\n",
            "        table.PrimaryKey(\"PK_Post\", x => x.Id);\n",
            "        table.ForeignKey(\n",
            "            name: \"FK_Post_Blog_BlogId\",\n",
            "            columns: x => x.BlogId,\n",
            "            referencedTable: \"Blog\");\n",
            "        table.Unique(\"AK_Post_AltId\", x => x.AltId);\n",
            "    });\n",
        ),
    );
}

#[test]
fn reserved_and_unusual_column_names() {
    let mut mb = MigrationBuilder::new();
    {
        let mut table = mb.create_table("Odd");
        let new = table.column("new", "int").build();
        let second = table.column("2nd", "int").build();
        table.primary_key("PK_Odd", &[new, second]);
    }

    check(
        &mb,
        concat!(
            "mb.CreateTable(\n",
            "    name: \"Odd\",\n",
            "    columns: table => new\n",
            "    {\n",
            "        @new = table.Column(type: \"int\", nullable: false),\n",
            "        _2nd = table.Column(name: \"2nd\", type: \"int\", nullable: false)\n",
            "    },\n",
            "    constraints: table =>\n",
            "    {\n",
            "        table.PrimaryKey(\"PK_Odd\", x => new { x.@new, x._2nd });\n",
            "    });\n",
        ),
    );
}
