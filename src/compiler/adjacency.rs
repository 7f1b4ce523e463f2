//! Reference fields over adjacency-list edge tables.

use log::debug;

use crate::model::ReferenceOption;
use crate::naming::AdjacencyListTable;
use crate::sql::expr::{json_group_array, table_col};
use crate::sql::{ExprExt, Query, SelectExpr, TableRef};

use super::assembler::RelationFragment;
use super::RelationContext;

/// Which edge column holds the current record and which the foreign one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Orientation {
    pub current: &'static str,
    pub foreign: &'static str,
}

impl Orientation {
    /// The non-owning side of a symmetric pair reads the owner's edges
    /// backwards; every other reference reads `from_id -> to_id`.
    pub fn of(option: &ReferenceOption) -> Self {
        if option.symmetric_field_id.is_some() && !option.is_owner {
            Self {
                current: AdjacencyListTable::TO_ID,
                foreign: AdjacencyListTable::FROM_ID,
            }
        } else {
            Self {
                current: AdjacencyListTable::FROM_ID,
                foreign: AdjacencyListTable::TO_ID,
            }
        }
    }
}

/// Build the edge and nest subqueries of a reference field.
///
/// ```text
/// SELECT e.<current>, json_group_array(e.<foreign>) AS <field>, <display>, <aggregates>
/// FROM <edge table> e
/// LEFT JOIN (<nest>) AS fta_<field> ON e.<foreign> = fta_<field>.id
/// GROUP BY e.<current>
/// ```
pub(crate) fn resolve_reference(
    ctx: &RelationContext<'_>,
    option: &ReferenceOption,
) -> RelationFragment {
    let edges = AdjacencyListTable::for_reference(&ctx.table.id, &ctx.field.id, option);
    let orientation = Orientation::of(option);
    let nest_alias = ctx.nest_alias();

    debug!(
        "reference {} reads {} ({} -> {})",
        ctx.field.id, edges.name, orientation.current, orientation.foreign
    );

    let current = table_col(&edges.name, orientation.current);
    let foreign = table_col(&edges.name, orientation.foreign);

    let mut selects: Vec<SelectExpr> = vec![
        current.clone().into(),
        json_group_array(foreign.clone()).alias(ctx.field.id.as_str()),
    ];
    selects.extend(ctx.display.edge_projections(&nest_alias));
    selects.extend(ctx.attachments.edge_aggregates(&nest_alias));

    let edge = Query::new()
        .select(selects)
        .from(TableRef::new(&edges.name))
        .left_join(
            TableRef::subquery(ctx.nest_subquery(), &nest_alias),
            foreign.eq(table_col(&nest_alias, &ctx.options.id_column)),
        )
        .group_by(vec![current]);

    ctx.fragment(edge, orientation.current)
}
