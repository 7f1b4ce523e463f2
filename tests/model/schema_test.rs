//! Integration tests for loading persisted schemas and deriving storage.

use fieldgraph::compiler::Compiler;
use fieldgraph::model::{
    FieldId, FieldKind, MemoryCatalog, Schema, SchemaError, StorageLayout, Table,
};
use fieldgraph::sql::check::validate_sql;
use fieldgraph::sql::Dialect;

const PROJECTS: &str = r#"{
    "id": "tbl_projects",
    "name": "Projects",
    "schema": [
        { "id": "fld_id", "name": "Id", "type": "id" },
        { "id": "fld_name", "name": "Name", "type": "string", "display": true },
        { "id": "fld_window", "name": "Window", "type": "date_range" },
        {
            "id": "fld_members",
            "name": "Members",
            "type": "reference",
            "option": { "isOwner": true, "foreignTableId": "tbl_people", "symmetricFieldId": "fld_projects" }
        },
        { "id": "fld_member_count", "name": "Members #", "type": "count", "option": { "referenceFieldId": "fld_members" } },
        { "id": "fld_sub", "name": "Subprojects", "type": "tree" }
    ]
}"#;

const PEOPLE: &str = r#"{
    "id": "tbl_people",
    "name": "People",
    "schema": [
        { "id": "fld_id", "name": "Id", "type": "id" },
        { "id": "fld_email", "name": "Email", "type": "email", "display": true },
        {
            "id": "fld_projects",
            "name": "Projects",
            "type": "reference",
            "option": { "foreignTableId": "tbl_projects", "symmetricFieldId": "fld_members" }
        }
    ]
}"#;

#[test]
fn test_load_table_document() {
    let table = Table::from_json(PROJECTS).unwrap();

    assert_eq!(table.id.as_str(), "tbl_projects");
    assert_eq!(table.schema.len(), 6);
    assert!(!table.deleted);

    let members = table.field(&FieldId::from("fld_members")).unwrap();
    let FieldKind::Reference(option) = &members.kind else {
        panic!("expected reference, got {:?}", members.kind);
    };
    assert!(option.is_owner);
    assert_eq!(option.symmetric_field_id, Some(FieldId::from("fld_projects")));

    // A tree without options spans its own table.
    let sub = table.field(&FieldId::from("fld_sub")).unwrap();
    assert_eq!(sub.kind.type_name(), "tree");
    assert_eq!(
        sub.relation().unwrap().foreign_table_id(&table.id).as_str(),
        "tbl_projects"
    );
}

#[test]
fn test_loaded_tables_compile() {
    let projects = Table::from_json(PROJECTS).unwrap();
    let people = Table::from_json(PEOPLE).unwrap();
    let catalog = MemoryCatalog::new()
        .with_table(projects.clone())
        .with_table(people.clone());
    let compiler = Compiler::new(&catalog);

    let output = compiler
        .compile(&projects, compiler.base_query(&projects))
        .unwrap();
    assert!(output.sql.contains("FROM \"tbl_projects_fld_members_adjacency_list\""));
    assert!(output.sql.contains("FROM \"tbl_projects_fld_sub_closure_table\""));
    validate_sql(&output.sql, Dialect::Sqlite).unwrap();

    let output = compiler
        .compile(&people, compiler.base_query(&people))
        .unwrap();
    assert!(output.sql.contains("FROM \"tbl_projects_fld_members_adjacency_list\""));
    validate_sql(&output.sql, Dialect::Sqlite).unwrap();
}

#[test]
fn test_date_range_display_packs_both_columns() {
    let projects = Table::from_json(PROJECTS).unwrap();
    let storage = StorageLayout::derive(&projects);

    let names: Vec<_> = storage
        .columns(&FieldId::from("fld_window"))
        .unwrap()
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(names, vec!["fld_window_from", "fld_window_to"]);
    assert!(storage.columns(&FieldId::from("fld_member_count")).unwrap().is_empty());
    assert_eq!(
        storage.columns(&FieldId::from("fld_id")).unwrap()[0].name,
        "id"
    );
}

#[test]
fn test_unknown_field_kind() {
    let err = Schema::from_json(r#"[{ "id": "fld_x", "name": "X", "type": "formula" }]"#)
        .unwrap_err();

    assert!(matches!(
        err,
        SchemaError::UnknownFieldKind { ref field_id, ref kind }
            if field_id.as_str() == "fld_x" && kind == "formula"
    ));
}

#[test]
fn test_invalid_option() {
    let err = Schema::from_json(
        r#"[{ "id": "fld_n", "name": "N", "type": "count", "option": { "wrong": 1 } }]"#,
    )
    .unwrap_err();

    assert!(matches!(err, SchemaError::InvalidOption { ref kind, .. } if kind == "count"));
    assert!(err.to_string().starts_with("Invalid option for count field 'fld_n'"));
}

#[test]
fn test_duplicate_field_id() {
    let err = Schema::from_json(
        r#"[
            { "id": "fld_a", "name": "A", "type": "string" },
            { "id": "fld_a", "name": "A again", "type": "number" }
        ]"#,
    )
    .unwrap_err();

    assert!(matches!(err, SchemaError::DuplicateFieldId(ref id) if id.as_str() == "fld_a"));
}

#[test]
fn test_malformed_json() {
    let err = Table::from_json("{ not json").unwrap_err();
    assert!(matches!(err, SchemaError::Json(_)));
}
