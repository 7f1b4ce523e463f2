//! Lookup of tables and storage layouts by id.

use std::collections::HashMap;

use super::ids::TableId;
use super::storage::StorageLayout;
use super::table::Table;

/// Read-only access to every table the compiler may follow a relation into.
pub trait Catalog {
    fn table(&self, id: &TableId) -> Option<&Table>;

    fn storage(&self, id: &TableId) -> Option<&StorageLayout>;

    /// Whether a table is soft-deleted. Unknown tables count as deleted.
    fn is_deleted(&self, id: &TableId) -> bool {
        self.table(id).map_or(true, |table| table.deleted)
    }
}

/// In-memory catalog.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    tables: HashMap<TableId, Table>,
    storage: HashMap<TableId, StorageLayout>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table along with its derived storage layout.
    pub fn insert(&mut self, table: Table) {
        let layout = StorageLayout::derive(&table);
        self.insert_with_storage(table, layout);
    }

    /// Add a table with an explicit storage layout.
    pub fn insert_with_storage(&mut self, table: Table, layout: StorageLayout) {
        self.storage.insert(table.id.clone(), layout);
        self.tables.insert(table.id.clone(), table);
    }

    pub fn with_table(mut self, table: Table) -> Self {
        self.insert(table);
        self
    }

    /// Flip the soft-delete flag of a table. Returns false if it is unknown.
    pub fn mark_deleted(&mut self, id: &TableId) -> bool {
        match self.tables.get_mut(id) {
            Some(table) => {
                table.deleted = true;
                true
            }
            None => false,
        }
    }

    pub fn remove_storage(&mut self, id: &TableId) -> Option<StorageLayout> {
        self.storage.remove(id)
    }
}

impl Catalog for MemoryCatalog {
    fn table(&self, id: &TableId) -> Option<&Table> {
        self.tables.get(id)
    }

    fn storage(&self, id: &TableId) -> Option<&StorageLayout> {
        self.storage.get(id)
    }
}
