//! Accumulates resolver output and layers it onto the base query.
//!
//! Nothing touches the caller's query until [`QueryAssembler::finish`], so a
//! compile that fails halfway leaves no partial result behind.

use std::collections::HashSet;

use log::debug;

use crate::model::FieldId;
use crate::sql::{Join, Query, SelectExpr};

/// Output of one resolved field: its base projections and the join feeding them.
#[derive(Debug, Clone, PartialEq)]
pub struct RelationFragment {
    pub field_id: FieldId,
    /// Alias of the joined table or subquery.
    pub alias: String,
    pub selects: Vec<SelectExpr>,
    pub join: Join,
}

/// Everything one compile adds to the base query.
///
/// Every join is one row per base record, so the base never needs grouping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompiledFragment {
    pub selects: Vec<SelectExpr>,
    pub joins: Vec<Join>,
}

impl CompiledFragment {
    pub fn is_empty(&self) -> bool {
        self.selects.is_empty() && self.joins.is_empty()
    }

    /// Aliases of every join, in order.
    pub fn join_aliases(&self) -> impl Iterator<Item = &str> {
        self.joins.iter().filter_map(|j| j.table.qualifier())
    }
}

/// Owns the [`CompiledFragment`] for the duration of one compile.
#[derive(Debug, Default)]
pub struct QueryAssembler {
    fragment: CompiledFragment,
    aliases: HashSet<String>,
}

impl QueryAssembler {
    pub fn new() -> Self {
        Self {
            fragment: CompiledFragment::default(),
            aliases: HashSet::new(),
        }
    }

    /// Add a resolved field. A fragment whose join alias is already present
    /// is dropped and `false` returned.
    pub fn push(&mut self, fragment: RelationFragment) -> bool {
        if !self.aliases.insert(fragment.alias.clone()) {
            debug!(
                "skipping fragment for field {}: alias {} already joined",
                fragment.field_id, fragment.alias
            );
            return false;
        }

        self.fragment.selects.extend(fragment.selects);
        self.fragment.joins.push(fragment.join);
        true
    }

    pub fn fragment(&self) -> &CompiledFragment {
        &self.fragment
    }

    /// Append the accumulated fragment to `base`.
    pub fn finish(self, mut base: Query) -> Query {
        for select in self.fragment.selects {
            base.add_select(select);
        }
        for join in self.fragment.joins {
            base.add_join(join);
        }
        base
    }
}
