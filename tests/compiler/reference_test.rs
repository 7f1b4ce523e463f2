//! Integration tests for reference fields over adjacency lists.

#[path = "../common/mod.rs"]
mod common;

use fieldgraph::compiler::{CompileError, CompileOptions, Compiler};
use fieldgraph::model::{Field, FieldKind, ReferenceOption, StorageLayout};
use fieldgraph::sql::check::validate_sql;
use fieldgraph::sql::Dialect;
use insta::assert_snapshot;

use common::{catalog, init_logging, posts, table, tags};

fn compile_sql(table: &fieldgraph::Table, catalog: &fieldgraph::MemoryCatalog) -> String {
    let compiler = Compiler::new(catalog);
    compiler
        .compile(table, compiler.base_query(table))
        .expect("compile")
        .sql
}

// ============================================================================
// Shape
// ============================================================================

#[test]
fn test_unpaired_reference_full_query() {
    init_logging();
    let notes = table(
        "tbl_notes",
        vec![
            Field::new("fld_nid", "Id", FieldKind::Id),
            Field::new(
                "fld_link",
                "Link",
                FieldKind::Reference(ReferenceOption::owner("tbl_tags")),
            ),
        ],
    );
    let mut catalog = catalog();
    catalog.insert(notes.clone());

    let sql = compile_sql(&notes, &catalog);
    assert_snapshot!(sql, @r#"
    SELECT
      "t".*,
      "uta_fld_link"."fld_link" AS "fld_link",
      JSON_OBJECT('fld_link', JSON_OBJECT('fld_label', JSON("uta_fld_link"."fld_label"))) AS "fld_link_expand"
    FROM "tbl_notes" AS "t"
    LEFT JOIN (
    SELECT
      "tbl_notes_fld_link_adjacency_list"."from_id",
      JSON_GROUP_ARRAY("tbl_notes_fld_link_adjacency_list"."to_id") AS "fld_link",
      JSON_GROUP_ARRAY("fta_fld_link"."fld_label") AS "fld_label"
    FROM "tbl_notes_fld_link_adjacency_list"
    LEFT JOIN (
    SELECT
      "id",
      "fld_label"
    FROM "tbl_tags"
    GROUP BY "id", "fld_label"
    ) AS "fta_fld_link" ON "tbl_notes_fld_link_adjacency_list"."to_id" = "fta_fld_link"."id"
    GROUP BY "tbl_notes_fld_link_adjacency_list"."from_id"
    ) AS "uta_fld_link" ON "uta_fld_link"."from_id" = "t"."id"
    "#);
    validate_sql(&sql, Dialect::Sqlite).unwrap();
}

#[test]
fn test_owner_reads_from_id_to_id() {
    let sql = compile_sql(&posts(), &catalog());

    assert!(sql.contains("FROM \"tbl_posts_fld_tags_adjacency_list\""));
    assert!(sql.contains(
        "JSON_GROUP_ARRAY(\"tbl_posts_fld_tags_adjacency_list\".\"to_id\") AS \"fld_tags\""
    ));
    assert!(sql.contains(") AS \"uta_fld_tags\" ON \"uta_fld_tags\".\"from_id\" = \"t\".\"id\""));
    validate_sql(&sql, Dialect::Sqlite).unwrap();
}

#[test]
fn test_mirror_reads_same_edges_flipped() {
    let sql = compile_sql(&tags(), &catalog());

    // Same edge rows as the owner, read backwards.
    assert!(sql.contains("FROM \"tbl_posts_fld_tags_adjacency_list\""));
    assert!(!sql.contains("tbl_tags_fld_posts_adjacency_list"));
    assert!(sql.contains(
        "JSON_GROUP_ARRAY(\"tbl_posts_fld_tags_adjacency_list\".\"from_id\") AS \"fld_posts\""
    ));
    assert!(sql.contains(
        "ON \"tbl_posts_fld_tags_adjacency_list\".\"from_id\" = \"fta_fld_posts\".\"id\""
    ));
    assert!(sql.contains(") AS \"uta_fld_posts\" ON \"uta_fld_posts\".\"to_id\" = \"t\".\"id\""));
    validate_sql(&sql, Dialect::Sqlite).unwrap();
}

#[test]
fn test_mirror_projects_owner_display_field() {
    let sql = compile_sql(&tags(), &catalog());

    // Posts flag fld_title for display.
    assert!(sql.contains("FROM \"tbl_posts\"\nGROUP BY \"id\", \"fld_title\""));
    assert!(sql.contains(
        "JSON_OBJECT('fld_posts', JSON_OBJECT('fld_title', JSON(\"uta_fld_posts\".\"fld_title\"))) AS \"fld_posts_expand\""
    ));
}

#[test]
fn test_explicit_display_fields_override_flags() {
    let notes = table(
        "tbl_notes",
        vec![
            Field::new("fld_nid", "Id", FieldKind::Id),
            Field::new(
                "fld_link",
                "Link",
                FieldKind::Reference(
                    ReferenceOption::owner("tbl_tags")
                        .with_display_fields(vec!["fld_weight".into(), "fld_tid".into()]),
                ),
            ),
        ],
    );
    let mut catalog = catalog();
    catalog.insert(notes.clone());

    let sql = compile_sql(&notes, &catalog);
    assert!(!sql.contains("fld_label"));
    // System field projected under its logical id.
    assert!(sql.contains("\"id\" AS \"fld_tid\""));
    assert!(sql.contains(
        "JSON_OBJECT('fld_link', JSON_OBJECT('fld_weight', JSON(\"uta_fld_link\".\"fld_weight\"), 'fld_tid', JSON(\"uta_fld_link\".\"fld_tid\")))"
    ));
    validate_sql(&sql, Dialect::Sqlite).unwrap();
}

#[test]
fn test_no_display_fields_yields_empty_object() {
    let plain = table("tbl_plain", vec![Field::new("fld_x", "X", FieldKind::String)]);
    let notes = table(
        "tbl_notes",
        vec![Field::new(
            "fld_link",
            "Link",
            FieldKind::Reference(ReferenceOption::owner("tbl_plain")),
        )],
    );
    let catalog = fieldgraph::MemoryCatalog::new()
        .with_table(plain)
        .with_table(notes.clone());

    let sql = compile_sql(&notes, &catalog);
    assert!(sql.contains("JSON_OBJECT('fld_link', JSON_OBJECT()) AS \"fld_link_expand\""));
    assert!(sql.contains("FROM \"tbl_plain\"\nGROUP BY \"id\""));
    validate_sql(&sql, Dialect::Sqlite).unwrap();
}

#[test]
fn test_self_reference() {
    let people = table(
        "tbl_people",
        vec![
            Field::new("fld_name", "Name", FieldKind::String).displayed(),
            Field::new(
                "fld_friends",
                "Friends",
                FieldKind::Reference(ReferenceOption::owner("tbl_people")),
            ),
        ],
    );
    let catalog = fieldgraph::MemoryCatalog::new().with_table(people.clone());

    let sql = compile_sql(&people, &catalog);
    assert!(sql.contains("FROM \"tbl_people_fld_friends_adjacency_list\""));
    assert!(sql.contains("FROM \"tbl_people\"\nGROUP BY \"id\", \"fld_name\""));
    validate_sql(&sql, Dialect::Sqlite).unwrap();
}

// ============================================================================
// Dialects
// ============================================================================

#[test]
fn test_postgres_json_functions() {
    let catalog = catalog();
    let options = CompileOptions::default().with_dialect(Dialect::Postgres);
    let compiler = Compiler::with_options(&catalog, options);
    let posts = posts();
    let output = compiler.compile(&posts, compiler.base_query(&posts)).unwrap();

    assert_eq!(output.dialect, Dialect::Postgres);
    assert!(output.sql.contains("JSON_AGG("));
    assert!(output.sql.contains("JSON_BUILD_OBJECT('fld_tags'"));
    assert!(!output.sql.contains("JSON_GROUP_ARRAY"));
    validate_sql(&output.sql, Dialect::Postgres).unwrap();
}

#[test]
fn test_duckdb_renders_and_parses() {
    let catalog = catalog();
    let options = CompileOptions::default().with_dialect(Dialect::DuckDb);
    let compiler = Compiler::with_options(&catalog, options);
    let tags = tags();
    let output = compiler.compile(&tags, compiler.base_query(&tags)).unwrap();

    assert!(output.sql.contains("JSON_GROUP_ARRAY("));
    validate_sql(&output.sql, Dialect::DuckDb).unwrap();
}

#[test]
fn test_custom_base_alias() {
    let catalog = catalog();
    let options = CompileOptions::default().with_base_alias("rec");
    let compiler = Compiler::with_options(&catalog, options);
    let posts = posts();
    let output = compiler.compile(&posts, compiler.base_query(&posts)).unwrap();

    assert!(output.sql.starts_with("SELECT\n  \"rec\".*"));
    assert!(output.sql.contains("FROM \"tbl_posts\" AS \"rec\""));
    assert!(output.sql.contains("\"uta_fld_tags\".\"from_id\" = \"rec\".\"id\""));
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_missing_relation_column_is_fatal() {
    let posts = posts();
    let mut storage = StorageLayout::derive(&posts);
    storage.remove(&"fld_tags".into());

    let mut catalog = catalog();
    catalog.insert_with_storage(posts.clone(), storage);

    let compiler = Compiler::new(&catalog);
    let err = compiler
        .compile(&posts, compiler.base_query(&posts))
        .unwrap_err();
    assert_eq!(
        err,
        CompileError::SchemaInconsistency {
            table_id: "tbl_posts".into(),
            field_id: "fld_tags".into(),
        }
    );
}

#[test]
fn test_missing_foreign_storage_is_fatal() {
    let mut catalog = catalog();
    catalog.remove_storage(&"tbl_tags".into());

    let compiler = Compiler::new(&catalog);
    let posts = posts();
    let err = compiler
        .compile(&posts, compiler.base_query(&posts))
        .unwrap_err();
    assert_eq!(err, CompileError::MissingStorage("tbl_tags".into()));
}

#[test]
fn test_unknown_display_field_is_fatal() {
    let notes = table(
        "tbl_notes",
        vec![Field::new(
            "fld_link",
            "Link",
            FieldKind::Reference(
                ReferenceOption::owner("tbl_tags").with_display_fields(vec!["fld_nope".into()]),
            ),
        )],
    );
    let mut catalog = catalog();
    catalog.insert(notes.clone());

    let compiler = Compiler::new(&catalog);
    let err = compiler
        .compile(&notes, compiler.base_query(&notes))
        .unwrap_err();
    assert_eq!(
        err,
        CompileError::UnknownForeignField {
            table_id: "tbl_tags".into(),
            field_id: "fld_nope".into(),
        }
    );
    assert!(err.to_string().contains("fld_nope"));
}
