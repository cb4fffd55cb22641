//! Operations exchanged as JSON.

use oxide_migrations::{
    AddColumnOperation, DefaultValue, MigrationBuilder, Operation, ReferentialAction,
};
use serde_json::json;

fn sample() -> Vec<Operation> {
    let mut mb = MigrationBuilder::new();
    mb.create_schema("my");
    {
        let mut table = mb.create_table("Post");
        table.schema("dbo");
        let id = table.column("Id", "int").build();
        let blog = table
            .column("BlogId", "int")
            .nullable(true)
            .default_value(7_i64)
            .build();
        table.primary_key("PK_Post", &[id]);
        table
            .foreign_key("FK_Post_Blog_BlogId", &[blog], "Blog")
            .referenced_schema("my")
            .on_delete(ReferentialAction::Cascade);
    }
    mb.alter_sequence("HiLo").increment_by(1).max_value(4);
    mb.sql("-- I <3 DDL").suppress_transaction(true);
    mb.into_operations()
}

#[test]
fn json_round_trip_preserves_operations() {
    let operations = sample();
    let text = serde_json::to_string(&operations).unwrap();
    let back: Vec<Operation> = serde_json::from_str(&text).unwrap();
    assert_eq!(back, operations);
}

#[test]
fn operations_are_tagged_by_kind_with_camel_case_fields() {
    let value = serde_json::to_value(&sample()[1]).unwrap();
    assert_eq!(value["kind"], "CreateTable");
    assert_eq!(value["schema"], "dbo");
    assert_eq!(value["columns"][0]["type"], "int");
    assert_eq!(value["columns"][1]["isNullable"], true);
    assert_eq!(value["columns"][1]["defaultValue"], json!({ "long": 7 }));
    assert_eq!(value["foreignKeys"][0]["onDelete"], "Cascade");
    assert_eq!(value["foreignKeys"][0]["referencedSchema"], "my");
}

#[test]
fn missing_optional_fields_take_defaults() {
    let op: Operation = serde_json::from_value(json!({
        "kind": "AddColumn",
        "name": "Id",
        "table": "Post",
        "type": "int"
    }))
    .unwrap();

    assert_eq!(
        op,
        Operation::AddColumn(AddColumnOperation {
            name: "Id".into(),
            table: "Post".into(),
            column_type: "int".into(),
            ..Default::default()
        })
    );
}

#[test]
fn default_values_keep_their_variant() {
    let values = vec![
        DefaultValue::Bool(true),
        DefaultValue::Int(1),
        DefaultValue::Long(1),
        DefaultValue::Double(0.5),
        DefaultValue::String("x".into()),
    ];
    let text = serde_json::to_string(&values).unwrap();
    let back: Vec<DefaultValue> = serde_json::from_str(&text).unwrap();
    assert_eq!(back, values);
}

#[test]
fn unknown_kind_is_rejected() {
    let err = serde_json::from_value::<Operation>(json!({ "kind": "Truncate", "name": "Post" }))
        .unwrap_err();
    assert!(err.to_string().contains("Truncate"));
}
