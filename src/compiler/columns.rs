//! Column resolution and the display column set of a relation.

use std::collections::HashSet;

use crate::model::{FieldId, Relation, StorageLayout, Table, UnderlyingColumn};
use crate::sql::expr::{col, json, json_array, json_group_array, json_object, lit_null, table_col};
use crate::sql::{Expr, ExprExt, Query, SelectExpr, TableRef};

use super::aggregate::Attachments;
use super::error::{CompileError, CompileResult};

/// Underlying columns of a field, failing if the layout does not know it.
pub(crate) fn require_field<'a>(
    storage: &'a StorageLayout,
    field_id: &FieldId,
) -> CompileResult<&'a [UnderlyingColumn]> {
    storage
        .columns(field_id)
        .ok_or_else(|| CompileError::SchemaInconsistency {
            table_id: storage.table_id.clone(),
            field_id: field_id.clone(),
        })
}

/// Display fields of a relation: explicit ids, else the foreign table's
/// fields flagged for display.
pub(crate) fn relation_display_ids<'a>(relation: Relation<'a>, foreign: &'a Table) -> Vec<&'a FieldId> {
    let explicit = relation.display_field_ids();
    if explicit.is_empty() {
        foreign.schema.display_fields().map(|f| &f.id).collect()
    } else {
        explicit.iter().collect()
    }
}

/// A foreign field projected through a relation.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DisplayColumn<'a> {
    pub field_id: &'a FieldId,
    pub columns: &'a [UnderlyingColumn],
}

impl DisplayColumn<'_> {
    /// The field's value under its logical id, as selected by the nest subquery.
    fn projection(&self) -> SelectExpr {
        let id = self.field_id.as_str();
        match self.columns {
            [] => lit_null().alias(id),
            [single] if single.name == id => SelectExpr::new(col(&single.name)),
            [single] => col(&single.name).alias(id),
            many => json_array(many.iter().map(|c| col(&c.name)).collect()).alias(id),
        }
    }
}

/// Deduplicated foreign columns a relation projects.
///
/// Ordered: direct display fields, lookup display fields, then sum and
/// average sources. The first occurrence of a field id wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct DisplayColumnSet<'a> {
    columns: Vec<DisplayColumn<'a>>,
}

impl<'a> DisplayColumnSet<'a> {
    pub fn collect(
        direct: &[&'a FieldId],
        attachments: &Attachments<'a>,
        foreign: &'a Table,
        foreign_storage: &'a StorageLayout,
    ) -> CompileResult<Self> {
        let candidates = direct
            .iter()
            .copied()
            .chain(attachments.display_sources());

        let mut seen = HashSet::new();
        let mut columns = Vec::new();
        for field_id in candidates {
            if !seen.insert(field_id) {
                continue;
            }
            if !foreign.schema.contains(field_id) {
                return Err(CompileError::UnknownForeignField {
                    table_id: foreign.id.clone(),
                    field_id: field_id.clone(),
                });
            }
            columns.push(DisplayColumn {
                field_id,
                columns: require_field(foreign_storage, field_id)?,
            });
        }

        Ok(Self { columns })
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn field_ids(&self) -> impl Iterator<Item = &'a FieldId> + '_ {
        self.columns.iter().map(|c| c.field_id)
    }

    /// `SELECT id, <display...> FROM <foreign> GROUP BY id, <columns...>`
    ///
    /// One row per foreign record; every physical column is grouped so the
    /// query stays valid under strict GROUP BY rules.
    pub fn nest_subquery(&self, foreign_table: &str, id_column: &str) -> Query {
        let mut query = Query::new()
            .select(vec![col(id_column)])
            .from(TableRef::new(foreign_table));
        query.add_group_by(col(id_column));

        for column in &self.columns {
            query.add_select(column.projection());
            for underlying in column.columns {
                query.add_group_by(col(&underlying.name));
            }
        }
        query
    }

    /// `json_group_array(<nest>.<d>) AS <d>` for each display column.
    ///
    /// Multi-column values were packed into a JSON array by the nest
    /// subquery and arrive as text, so they are re-read as JSON first.
    pub fn edge_projections(&self, nest_alias: &str) -> Vec<SelectExpr> {
        self.columns
            .iter()
            .map(|c| {
                let id = c.field_id.as_str();
                let value = table_col(nest_alias, id);
                let value = if c.columns.len() > 1 { json(value) } else { value };
                json_group_array(value).alias(id)
            })
            .collect()
    }
}

/// `json_object('<owner>', json_object('<d>', json(<edge>.<d>), ...)) AS <owner><suffix>`
///
/// Edge columns are JSON arrays that lose their JSON type once read out of
/// the derived table, so each is re-parsed to nest as an array instead of a
/// quoted string.
pub(crate) fn expand_column(
    owner_id: &FieldId,
    display_ids: &[&FieldId],
    edge_alias: &str,
    expand_name: &str,
) -> SelectExpr {
    let inner: Vec<(&str, Expr)> = display_ids
        .iter()
        .map(|id| (id.as_str(), json(table_col(edge_alias, id.as_str()))))
        .collect();
    json_object(vec![(owner_id.as_str(), json_object(inner))]).alias(expand_name)
}
