//! Shared schemas for the integration tests.
//!
//! Posts and tags are linked by a symmetric reference pair owned by posts.
//! Categories form a self-referencing hierarchy.

#![allow(dead_code)]

use fieldgraph::model::{
    AverageOption, CountOption, Field, FieldKind, LookupOption, MemoryCatalog, ParentOption,
    ReferenceOption, Schema, SumOption, Table, TreeOption,
};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn table(id: &str, fields: Vec<Field>) -> Table {
    Table::new(id, id, Schema::new(fields).expect("unique field ids"))
}

pub fn count(id: &str, owner: &str) -> Field {
    Field::new(
        id,
        id,
        FieldKind::Count(CountOption {
            reference_field_id: owner.into(),
        }),
    )
}

pub fn lookup(id: &str, owner: &str, display: &[&str]) -> Field {
    Field::new(
        id,
        id,
        FieldKind::Lookup(LookupOption {
            reference_field_id: owner.into(),
            display_field_ids: display.iter().map(|&d| d.into()).collect(),
        }),
    )
}

pub fn sum(id: &str, owner: &str, source: &str) -> Field {
    Field::new(
        id,
        id,
        FieldKind::Sum(SumOption {
            reference_field_id: owner.into(),
            aggregate_field_id: source.into(),
        }),
    )
}

pub fn average(id: &str, owner: &str, source: &str) -> Field {
    Field::new(
        id,
        id,
        FieldKind::Average(AverageOption {
            reference_field_id: owner.into(),
            aggregate_field_id: source.into(),
        }),
    )
}

/// `tbl_posts`: owns `fld_tags` (symmetric with `tbl_tags.fld_posts`) and
/// attaches a lookup, a count, a sum and an average to it.
pub fn posts() -> Table {
    table(
        "tbl_posts",
        vec![
            Field::new("fld_pid", "Id", FieldKind::Id),
            Field::new("fld_title", "Title", FieldKind::String).displayed(),
            Field::new(
                "fld_tags",
                "Tags",
                FieldKind::Reference(
                    ReferenceOption::owner("tbl_tags").with_symmetric("fld_posts"),
                ),
            ),
            lookup("fld_tag_labels", "fld_tags", &["fld_label"]),
            count("fld_tag_count", "fld_tags"),
            sum("fld_weight_sum", "fld_tags", "fld_weight"),
            average("fld_weight_avg", "fld_tags", "fld_weight"),
        ],
    )
}

/// `tbl_tags`: the non-owning side of the pair, with a count over it.
pub fn tags() -> Table {
    table(
        "tbl_tags",
        vec![
            Field::new("fld_tid", "Id", FieldKind::Id),
            Field::new("fld_label", "Label", FieldKind::String).displayed(),
            Field::new("fld_weight", "Weight", FieldKind::Number),
            Field::new(
                "fld_posts",
                "Posts",
                FieldKind::Reference(ReferenceOption::mirror("tbl_posts", "fld_tags")),
            ),
            count("fld_post_count", "fld_posts"),
        ],
    )
}

/// `tbl_cats`: a tree `fld_children` paired with a parent `fld_parent`.
pub fn categories() -> Table {
    table(
        "tbl_cats",
        vec![
            Field::new("fld_cid", "Id", FieldKind::Id),
            Field::new("fld_cname", "Name", FieldKind::String).displayed(),
            Field::new("fld_rank", "Rank", FieldKind::Number),
            Field::new(
                "fld_children",
                "Children",
                FieldKind::Tree(TreeOption {
                    parent_field_id: Some("fld_parent".into()),
                    ..Default::default()
                }),
            ),
            Field::new(
                "fld_parent",
                "Parent",
                FieldKind::Parent(ParentOption {
                    tree_field_id: Some("fld_children".into()),
                    ..Default::default()
                }),
            ),
            lookup("fld_child_names", "fld_children", &["fld_cname"]),
            count("fld_child_count", "fld_children"),
            lookup("fld_parent_rank", "fld_parent", &["fld_rank"]),
        ],
    )
}

pub fn catalog() -> MemoryCatalog {
    MemoryCatalog::new()
        .with_table(posts())
        .with_table(tags())
        .with_table(categories())
}
