//! Table and field schema model.
//!
//! Tables own an ordered [`Schema`] of [`Field`]s. Relations between tables
//! are expressed by id only (foreign table id, symmetric field id, owner field
//! id) and resolved through a [`Catalog`] at compile time.

pub mod catalog;
pub mod error;
pub mod field;
pub mod ids;
pub mod storage;
pub mod table;

pub use catalog::{Catalog, MemoryCatalog};
pub use error::{SchemaError, SchemaResult};
pub use field::{
    AverageOption, CountOption, Field, FieldKind, LookupOption, ParentOption, ReferenceOption,
    Relation, SumOption, TreeOption,
};
pub use ids::{FieldId, TableId};
pub use storage::{StorageLayout, UnderlyingColumn};
pub use table::{Schema, Table};
