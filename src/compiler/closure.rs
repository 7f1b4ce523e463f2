//! Tree and parent fields over closure tables.
//!
//! A closure table holds one `(parent_id, child_id, depth)` row per ancestor
//! pair, depth 0 being the record itself. Tree fields look down the
//! hierarchy, parent fields look one level up.

use log::debug;

use crate::model::ParentOption;
use crate::naming::ClosureTable;
use crate::sql::expr::{json_group_array, lit_int, table_col};
use crate::sql::{ExprExt, Query, SelectExpr, TableRef};

use super::assembler::RelationFragment;
use super::RelationContext;

/// Build the subqueries of a tree field: every descendant at depth >= 1.
///
/// ```text
/// SELECT c.parent_id, json_group_array(c.child_id) AS <field>, ...
/// FROM <closure> c LEFT JOIN (<nest>) AS fta ON c.child_id = fta.id
/// WHERE c.depth > 0
/// GROUP BY c.parent_id
/// ```
pub(crate) fn resolve_tree(ctx: &RelationContext<'_>) -> RelationFragment {
    let closure = ClosureTable::for_tree(&ctx.table.id, &ctx.field.id);
    let nest_alias = ctx.nest_alias();
    debug!("tree {} reads {}", ctx.field.id, closure.name);

    let parent = table_col(&closure.name, ClosureTable::PARENT_ID);
    let child = table_col(&closure.name, ClosureTable::CHILD_ID);

    let mut selects: Vec<SelectExpr> = vec![
        parent.clone().into(),
        json_group_array(child.clone()).alias(ctx.field.id.as_str()),
    ];
    selects.extend(ctx.display.edge_projections(&nest_alias));
    selects.extend(ctx.attachments.edge_aggregates(&nest_alias));

    let edge = Query::new()
        .select(selects)
        .from(TableRef::new(&closure.name))
        .left_join(
            TableRef::subquery(ctx.nest_subquery(), &nest_alias),
            child.eq(table_col(&nest_alias, &ctx.options.id_column)),
        )
        .filter(table_col(&closure.name, ClosureTable::DEPTH).gt(lit_int(0)))
        .group_by(vec![parent]);

    ctx.fragment(edge, ClosureTable::PARENT_ID)
}

/// Build the subqueries of a parent field: the direct parent only.
///
/// ```text
/// SELECT c.child_id, c.parent_id AS <field>, ...
/// FROM <closure> c LEFT JOIN (<nest>) AS fta ON c.parent_id = fta.id
/// WHERE c.depth = 1
/// GROUP BY c.child_id, c.parent_id
/// ```
pub(crate) fn resolve_parent(ctx: &RelationContext<'_>, option: &ParentOption) -> RelationFragment {
    let closure = ClosureTable::for_parent(&ctx.table.id, &ctx.field.id, option);
    let nest_alias = ctx.nest_alias();
    debug!("parent {} reads {}", ctx.field.id, closure.name);

    let parent = table_col(&closure.name, ClosureTable::PARENT_ID);
    let child = table_col(&closure.name, ClosureTable::CHILD_ID);

    let mut selects: Vec<SelectExpr> = vec![
        child.clone().into(),
        parent.clone().alias(ctx.field.id.as_str()),
    ];
    selects.extend(ctx.display.edge_projections(&nest_alias));
    selects.extend(ctx.attachments.edge_aggregates(&nest_alias));

    let edge = Query::new()
        .select(selects)
        .from(TableRef::new(&closure.name))
        .left_join(
            TableRef::subquery(ctx.nest_subquery(), &nest_alias),
            parent.clone().eq(table_col(&nest_alias, &ctx.options.id_column)),
        )
        .filter(table_col(&closure.name, ClosureTable::DEPTH).eq(lit_int(1)))
        .group_by(vec![child, parent]);

    ctx.fragment(edge, ClosureTable::CHILD_ID)
}
