//! Physical storage layout of a record table.
//!
//! The DDL layer owns table creation; this module only describes which
//! columns it produced for each field. [`StorageLayout::derive`] reproduces
//! the DDL layer's deterministic naming.

use std::collections::HashMap;

use super::field::FieldKind;
use super::ids::{FieldId, TableId};
use super::table::Table;

/// One physical column backing a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnderlyingColumn {
    pub name: String,
    pub field_id: FieldId,
    /// System columns are named after their role, not the field id.
    pub system: bool,
}

impl UnderlyingColumn {
    pub fn new(name: &str, field_id: &FieldId) -> Self {
        Self {
            name: name.to_string(),
            field_id: field_id.clone(),
            system: false,
        }
    }

    pub fn system(name: &str, field_id: &FieldId) -> Self {
        Self {
            system: true,
            ..Self::new(name, field_id)
        }
    }
}

/// Columns of a materialized record table, keyed by field.
///
/// Virtual fields are known to the layout but have no columns.
#[derive(Debug, Clone, PartialEq)]
pub struct StorageLayout {
    pub table_id: TableId,
    columns: HashMap<FieldId, Vec<UnderlyingColumn>>,
}

impl StorageLayout {
    /// An empty layout.
    pub fn new(table_id: impl Into<TableId>) -> Self {
        Self {
            table_id: table_id.into(),
            columns: HashMap::new(),
        }
    }

    /// Reproduce the layout the DDL layer creates for `table`.
    pub fn derive(table: &Table) -> Self {
        let mut layout = Self::new(table.id.clone());
        for field in &table.schema {
            layout.insert(field.id.clone(), columns_for(&field.id, &field.kind));
        }
        layout
    }

    /// Register (or replace) the columns of a field.
    pub fn insert(&mut self, field_id: FieldId, columns: Vec<UnderlyingColumn>) {
        self.columns.insert(field_id, columns);
    }

    /// Forget a field entirely.
    pub fn remove(&mut self, field_id: &FieldId) -> Option<Vec<UnderlyingColumn>> {
        self.columns.remove(field_id)
    }

    /// Columns of a field; `None` when the layout does not know the field.
    pub fn columns(&self, field_id: &FieldId) -> Option<&[UnderlyingColumn]> {
        self.columns.get(field_id).map(Vec::as_slice)
    }

    pub fn contains(&self, field_id: &FieldId) -> bool {
        self.columns.contains_key(field_id)
    }
}

fn columns_for(field_id: &FieldId, kind: &FieldKind) -> Vec<UnderlyingColumn> {
    match kind {
        FieldKind::Id => vec![UnderlyingColumn::system("id", field_id)],
        FieldKind::CreatedAt => vec![UnderlyingColumn::system("created_at", field_id)],
        FieldKind::UpdatedAt => vec![UnderlyingColumn::system("updated_at", field_id)],
        FieldKind::AutoIncrement => vec![UnderlyingColumn::system("auto_increment", field_id)],
        FieldKind::DateRange => vec![
            UnderlyingColumn::new(&format!("{}_from", field_id), field_id),
            UnderlyingColumn::new(&format!("{}_to", field_id), field_id),
        ],
        FieldKind::Attachment
        | FieldKind::Lookup(_)
        | FieldKind::Count(_)
        | FieldKind::Sum(_)
        | FieldKind::Average(_) => vec![],
        FieldKind::String
        | FieldKind::Email
        | FieldKind::Color
        | FieldKind::Number
        | FieldKind::Rating
        | FieldKind::Bool
        | FieldKind::Date
        | FieldKind::Select
        | FieldKind::Reference(_)
        | FieldKind::Tree(_)
        | FieldKind::Parent(_) => vec![UnderlyingColumn::new(field_id.as_str(), field_id)],
    }
}
