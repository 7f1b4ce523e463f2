//! Lookups and aggregates attached to relation fields.
//!
//! Attached fields never compile on their own. The schema is scanned once
//! per compile and each relation resolver folds the attachments of its field
//! into the subquery it builds.

use std::collections::HashMap;

use crate::model::{Field, FieldId, FieldKind, LookupOption, Schema};
use crate::naming;
use crate::sql::expr::{avg, coalesce, count_star, lit_int, sum, table_col};
use crate::sql::{ExprExt, SelectExpr};

use super::columns::expand_column;
use super::CompileOptions;

/// Fields attached to one relation field, in schema order per kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attachments<'a> {
    pub lookups: Vec<(&'a Field, &'a LookupOption)>,
    pub counts: Vec<&'a Field>,
    /// `(sum field, foreign source field)`
    pub sums: Vec<(&'a Field, &'a FieldId)>,
    /// `(average field, foreign source field)`
    pub averages: Vec<(&'a Field, &'a FieldId)>,
}

impl<'a> Attachments<'a> {
    pub fn is_empty(&self) -> bool {
        self.lookups.is_empty()
            && self.counts.is_empty()
            && self.sums.is_empty()
            && self.averages.is_empty()
    }

    /// Ids of every attached field.
    pub fn field_ids(&self) -> impl Iterator<Item = &'a FieldId> + '_ {
        self.lookups
            .iter()
            .map(|&(f, _)| &f.id)
            .chain(self.counts.iter().map(|&f| &f.id))
            .chain(self.sums.iter().map(|&(f, _)| &f.id))
            .chain(self.averages.iter().map(|&(f, _)| &f.id))
    }

    /// Foreign fields the attachments need projected: lookup display fields,
    /// then sum sources, then average sources.
    pub fn display_sources(&self) -> impl Iterator<Item = &'a FieldId> + '_ {
        self.lookups
            .iter()
            .flat_map(|&(_, option)| option.display_field_ids.iter())
            .chain(self.sums.iter().map(|&(_, source)| source))
            .chain(self.averages.iter().map(|&(_, source)| source))
    }

    /// Aggregates computed inside the edge subquery, over nest rows.
    pub fn edge_aggregates(&self, nest_alias: &str) -> Vec<SelectExpr> {
        let counts = self
            .counts
            .iter()
            .map(|f| count_star().alias(f.id.as_str()));
        let sums = self
            .sums
            .iter()
            .map(|(f, source)| sum(table_col(nest_alias, source.as_str())).alias(f.id.as_str()));
        let averages = self
            .averages
            .iter()
            .map(|(f, source)| avg(table_col(nest_alias, source.as_str())).alias(f.id.as_str()));

        counts.chain(sums).chain(averages).collect()
    }

    /// Columns added to the base query: one expand column per lookup, then
    /// each aggregate read from the edge subquery.
    ///
    /// Counts are coalesced to 0 for records with no related rows; sums and
    /// averages stay NULL.
    pub fn base_projections(&self, edge_alias: &str, options: &CompileOptions) -> Vec<SelectExpr> {
        let mut selects = Vec::with_capacity(
            self.lookups.len() + self.counts.len() + self.sums.len() + self.averages.len(),
        );

        for (field, option) in &self.lookups {
            let display: Vec<&FieldId> = option.display_field_ids.iter().collect();
            let expand_name = naming::expand_column(&field.id, &options.expand_suffix);
            selects.push(expand_column(&field.id, &display, edge_alias, &expand_name));
        }

        for field in &self.counts {
            let value = table_col(edge_alias, field.id.as_str());
            let value = if options.coalesce_counts {
                coalesce(vec![value, lit_int(0)])
            } else {
                value
            };
            selects.push(value.alias(field.id.as_str()));
        }

        for (field, _) in self.sums.iter().chain(self.averages.iter()) {
            selects.push(table_col(edge_alias, field.id.as_str()).alias(field.id.as_str()));
        }

        selects
    }
}

/// Attachments of every relation field of a schema, keyed by owner id.
#[derive(Debug, Clone, Default)]
pub struct AttachmentIndex<'a> {
    by_owner: HashMap<&'a FieldId, Attachments<'a>>,
}

impl<'a> AttachmentIndex<'a> {
    /// Index every lookup and aggregate of `schema` under its owner.
    ///
    /// Owners are not checked here; the walker reports missing or invalid
    /// owners when it reaches the attached field.
    pub fn scan(schema: &'a Schema) -> Self {
        let mut by_owner: HashMap<&'a FieldId, Attachments<'a>> = HashMap::new();

        for field in schema {
            match &field.kind {
                FieldKind::Lookup(option) => by_owner
                    .entry(&option.reference_field_id)
                    .or_default()
                    .lookups
                    .push((field, option)),
                FieldKind::Count(option) => by_owner
                    .entry(&option.reference_field_id)
                    .or_default()
                    .counts
                    .push(field),
                FieldKind::Sum(option) => by_owner
                    .entry(&option.reference_field_id)
                    .or_default()
                    .sums
                    .push((field, &option.aggregate_field_id)),
                FieldKind::Average(option) => by_owner
                    .entry(&option.reference_field_id)
                    .or_default()
                    .averages
                    .push((field, &option.aggregate_field_id)),
                FieldKind::Id
                | FieldKind::CreatedAt
                | FieldKind::UpdatedAt
                | FieldKind::AutoIncrement
                | FieldKind::String
                | FieldKind::Email
                | FieldKind::Color
                | FieldKind::Number
                | FieldKind::Rating
                | FieldKind::Bool
                | FieldKind::Date
                | FieldKind::DateRange
                | FieldKind::Select
                | FieldKind::Attachment
                | FieldKind::Reference(_)
                | FieldKind::Tree(_)
                | FieldKind::Parent(_) => {}
            }
        }

        Self { by_owner }
    }

    pub fn get(&self, owner: &FieldId) -> Option<&Attachments<'a>> {
        self.by_owner.get(owner)
    }
}
