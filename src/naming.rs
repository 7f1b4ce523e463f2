//! Deterministic names for relation tables and query aliases.
//!
//! All names derive from table and field ids only, so the DDL layer and the
//! compiler agree on them without sharing state.

use crate::model::{FieldId, ParentOption, ReferenceOption, TableId};

/// Suffix of the JSON column exposing a relation's display values.
pub const DEFAULT_EXPAND_SUFFIX: &str = "_expand";

// ============================================================================
// Adjacency list
// ============================================================================

/// Edge table backing a reference field: one row per `(from_id, to_id)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjacencyListTable {
    pub name: String,
}

impl AdjacencyListTable {
    pub const FROM_ID: &'static str = "from_id";
    pub const TO_ID: &'static str = "to_id";

    /// The edge table a reference field reads.
    ///
    /// The non-owning side of a symmetric pair reads the owner's table, so
    /// both sides see the same rows.
    pub fn for_reference(table_id: &TableId, field_id: &FieldId, option: &ReferenceOption) -> Self {
        match (&option.symmetric_field_id, option.is_owner) {
            (Some(symmetric), false) => Self::named(&option.foreign_table_id, symmetric),
            _ => Self::named(table_id, field_id),
        }
    }

    fn named(table_id: &TableId, field_id: &FieldId) -> Self {
        Self {
            name: format!("{}_{}_adjacency_list", table_id, field_id),
        }
    }
}

// ============================================================================
// Closure table
// ============================================================================

/// Closure table backing a hierarchy: one row per `(parent_id, child_id, depth)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosureTable {
    pub name: String,
}

impl ClosureTable {
    pub const PARENT_ID: &'static str = "parent_id";
    pub const CHILD_ID: &'static str = "child_id";
    pub const DEPTH: &'static str = "depth";

    pub fn for_tree(table_id: &TableId, tree_field_id: &FieldId) -> Self {
        Self {
            name: format!("{}_{}_closure_table", table_id, tree_field_id),
        }
    }

    /// A parent field shares its tree field's table; unpaired it owns one.
    pub fn for_parent(table_id: &TableId, field_id: &FieldId, option: &ParentOption) -> Self {
        Self::for_tree(table_id, option.tree_field_id.as_ref().unwrap_or(field_id))
    }
}

// ============================================================================
// Aliases
// ============================================================================

/// Alias of a relation's outer (edge) subquery.
pub fn edge_alias(field_id: &FieldId) -> String {
    format!("uta_{}", field_id)
}

/// Alias of a relation's inner (nest) subquery over the foreign table.
pub fn nest_alias(field_id: &FieldId) -> String {
    format!("fta_{}", field_id)
}

/// Alias of the attachment table joined for an attachment field.
pub fn attachment_alias(field_id: &FieldId, attachment_table: &str) -> String {
    format!("r_{}_{}", field_id, attachment_table)
}

/// Name of the JSON expand column of a relation or lookup field.
pub fn expand_column(field_id: &FieldId, suffix: &str) -> String {
    format!("{}{}", field_id, suffix)
}
