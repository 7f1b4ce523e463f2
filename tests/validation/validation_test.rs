//! Integration tests for schema validation.

#[path = "../common/mod.rs"]
mod common;

use fieldgraph::model::{Field, FieldKind, ParentOption, ReferenceOption, TreeOption};
use fieldgraph::validation::{validate_table, ValidationError};

use common::{catalog, categories, lookup, posts, sum, table, tags};

#[test]
fn test_fixtures_are_valid() {
    let catalog = catalog();
    for table in [posts(), tags(), categories()] {
        assert_eq!(validate_table(&table, &catalog), Ok(()), "{}", table.id);
    }
}

#[test]
fn test_soft_deleted_foreign_table_is_not_an_error() {
    let mut catalog = catalog();
    catalog.mark_deleted(&"tbl_tags".into());
    assert!(validate_table(&posts(), &catalog).is_ok());
}

#[test]
fn test_symmetric_field_must_point_back() {
    let tags = table(
        "tbl_tags",
        vec![
            Field::new("fld_label", "Label", FieldKind::String),
            Field::new("fld_weight", "Weight", FieldKind::Number),
            Field::new(
                "fld_posts",
                "Posts",
                FieldKind::Reference(ReferenceOption::mirror("tbl_posts", "fld_other")),
            ),
        ],
    );
    let mut catalog = catalog();
    catalog.insert(tags);

    let errors = validate_table(&posts(), &catalog).unwrap_err();
    assert_eq!(
        errors,
        vec![ValidationError::SymmetricMismatch {
            field_id: "fld_tags".into(),
            symmetric_id: "fld_posts".into(),
            issue: "symmetric field does not point back".to_string(),
        }]
    );
}

#[test]
fn test_neither_side_owns() {
    let posts = table(
        "tbl_posts",
        vec![Field::new(
            "fld_tags",
            "Tags",
            FieldKind::Reference(ReferenceOption::mirror("tbl_tags", "fld_posts")),
        )],
    );
    let mut catalog = catalog();
    catalog.insert(posts.clone());

    let errors = validate_table(&posts, &catalog).unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].to_string(),
        "Symmetric fields 'fld_posts' and 'fld_tags': neither side is the owner"
    );
}

#[test]
fn test_missing_symmetric_field() {
    let posts = table(
        "tbl_posts",
        vec![Field::new(
            "fld_tags",
            "Tags",
            FieldKind::Reference(ReferenceOption::owner("tbl_tags").with_symmetric("fld_gone")),
        )],
    );
    let catalog = catalog();

    let errors = validate_table(&posts, &catalog).unwrap_err();
    assert_eq!(
        errors,
        vec![ValidationError::UndefinedField {
            field_id: "fld_tags".into(),
            table_id: "tbl_tags".into(),
            missing_id: "fld_gone".into(),
        }]
    );
}

#[test]
fn test_attached_field_problems_collected() {
    let notes = table(
        "tbl_notes",
        vec![
            Field::new("fld_title", "Title", FieldKind::String),
            Field::new(
                "fld_link",
                "Link",
                FieldKind::Reference(ReferenceOption::owner("tbl_tags")),
            ),
            lookup("fld_l1", "fld_link", &["fld_ghost"]),
            lookup("fld_l2", "fld_title", &[]),
            sum("fld_s", "fld_nowhere", "fld_weight"),
        ],
    );
    let catalog = catalog();

    let errors = validate_table(&notes, &catalog).unwrap_err();
    assert_eq!(errors.len(), 3);
    assert!(matches!(
        &errors[0],
        ValidationError::UndefinedField { missing_id, .. } if missing_id.as_str() == "fld_ghost"
    ));
    assert!(matches!(&errors[1], ValidationError::InvalidOwner { .. }));
    assert!(matches!(
        &errors[2],
        ValidationError::UndefinedField { missing_id, .. } if missing_id.as_str() == "fld_nowhere"
    ));
}

#[test]
fn test_tree_parent_pairing() {
    let nodes = table(
        "tbl_nodes",
        vec![
            Field::new("fld_name", "Name", FieldKind::String),
            Field::new(
                "fld_kids",
                "Kids",
                FieldKind::Tree(TreeOption {
                    parent_field_id: Some("fld_name".into()),
                    ..Default::default()
                }),
            ),
            Field::new(
                "fld_up",
                "Up",
                FieldKind::Parent(ParentOption {
                    tree_field_id: Some("fld_kids".into()),
                    foreign_table_id: Some("tbl_other".into()),
                    ..Default::default()
                }),
            ),
        ],
    );
    let other = table("tbl_other", vec![]);
    let mut catalog = catalog();
    catalog.insert(other);

    let errors = validate_table(&nodes, &catalog).unwrap_err();
    let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
    assert_eq!(
        messages,
        vec![
            "Hierarchy field 'fld_kids' is invalid: 'fld_name' is not a parent field",
            "Hierarchy field 'fld_up' is invalid: tree field 'fld_kids' spans another table",
        ]
    );
}
