//! Integration tests for relations whose foreign table is gone.

#[path = "../common/mod.rs"]
mod common;

use fieldgraph::compiler::{Compiler, StaleField};
use fieldgraph::model::{Field, FieldId, FieldKind, MemoryCatalog, ReferenceOption, TableId};
use fieldgraph::sql::check::validate_sql;
use fieldgraph::sql::Dialect;

use common::{catalog, count, init_logging, posts, table};

fn stale(field: &str, relation: &str, foreign: &str) -> StaleField {
    StaleField {
        field_id: FieldId::from(field),
        relation_field_id: FieldId::from(relation),
        foreign_table_id: TableId::from(foreign),
    }
}

#[test]
fn test_deleted_foreign_table_drops_relation_and_attachments() {
    init_logging();
    let mut catalog = catalog();
    assert!(catalog.mark_deleted(&"tbl_tags".into()));

    let compiler = Compiler::new(&catalog);
    let posts = posts();
    let base = compiler.base_query(&posts);
    let output = compiler.compile(&posts, base.clone()).unwrap();

    assert_eq!(output.query, base);
    assert_eq!(
        output.stale,
        vec![
            stale("fld_tags", "fld_tags", "tbl_tags"),
            stale("fld_tag_labels", "fld_tags", "tbl_tags"),
            stale("fld_tag_count", "fld_tags", "tbl_tags"),
            stale("fld_weight_sum", "fld_tags", "tbl_tags"),
            stale("fld_weight_avg", "fld_tags", "tbl_tags"),
        ]
    );
    validate_sql(&output.sql, Dialect::Sqlite).unwrap();
}

#[test]
fn test_unknown_foreign_table_is_stale() {
    let notes = table(
        "tbl_notes",
        vec![Field::new(
            "fld_link",
            "Link",
            FieldKind::Reference(ReferenceOption::owner("tbl_never_created")),
        )],
    );
    let catalog = MemoryCatalog::new().with_table(notes.clone());
    let compiler = Compiler::new(&catalog);
    let output = compiler
        .compile(&notes, compiler.base_query(&notes))
        .unwrap();

    assert_eq!(
        output.stale,
        vec![stale("fld_link", "fld_link", "tbl_never_created")]
    );
    assert!(!output.sql.contains("JOIN"));
}

#[test]
fn test_other_relations_unaffected() {
    let notes = table(
        "tbl_notes",
        vec![
            Field::new(
                "fld_tags",
                "Tags",
                FieldKind::Reference(ReferenceOption::owner("tbl_tags")),
            ),
            count("fld_tag_n", "fld_tags"),
            Field::new(
                "fld_posts",
                "Posts",
                FieldKind::Reference(ReferenceOption::owner("tbl_posts")),
            ),
            count("fld_post_n", "fld_posts"),
        ],
    );

    let mut live = catalog();
    live.insert(notes.clone());
    let mut dangling = live.clone();
    dangling.mark_deleted(&"tbl_tags".into());

    let compile = |catalog: &MemoryCatalog| {
        let compiler = Compiler::new(catalog);
        compiler
            .compile(&notes, compiler.base_query(&notes))
            .unwrap()
    };
    let before = compile(&live);
    let after = compile(&dangling);

    assert!(before.stale.is_empty());
    assert_eq!(after.stale.len(), 2);

    // Only the tags fragment disappears.
    let aliases = |sql: &str| {
        ["uta_fld_tags", "uta_fld_posts"]
            .iter()
            .map(|alias| sql.contains(&format!("AS \"{alias}\"")))
            .collect::<Vec<_>>()
    };
    assert_eq!(aliases(&before.sql), vec![true, true]);
    assert_eq!(aliases(&after.sql), vec![false, true]);

    let posts_join = |sql: &str| {
        let start = sql.find("LEFT JOIN (\nSELECT\n  \"tbl_notes_fld_posts_adjacency_list\"")?;
        Some(sql[start..].to_string())
    };
    assert_eq!(posts_join(&before.sql), posts_join(&after.sql));
    assert!(posts_join(&after.sql).is_some());
}

#[test]
fn test_self_reference_never_stale() {
    let people = table(
        "tbl_people",
        vec![Field::new(
            "fld_friends",
            "Friends",
            FieldKind::Reference(ReferenceOption::owner("tbl_people")),
        )],
    );
    // The compiled table itself is marked deleted in the catalog.
    let mut catalog = MemoryCatalog::new().with_table(people.clone());
    catalog.mark_deleted(&"tbl_people".into());

    let compiler = Compiler::new(&catalog);
    let output = compiler
        .compile(&people, compiler.base_query(&people))
        .unwrap();

    assert!(output.stale.is_empty());
    assert!(output.sql.contains("AS \"uta_fld_friends\""));
}
