//! Errors that abort a compile.
//!
//! A dangling foreign table is not an error: the relation is dropped and
//! reported through [`StaleField`](super::StaleField) instead.

use thiserror::Error;

use crate::model::{FieldId, TableId};

/// Errors that can occur while compiling a table's relation fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// A field the storage layout should know about has no underlying column mapping.
    #[error("Schema inconsistency: field '{field_id}' has no underlying column in table '{table_id}'")]
    SchemaInconsistency { table_id: TableId, field_id: FieldId },

    /// A table reached by the compile has no storage layout at all.
    #[error("No storage layout for table '{0}'")]
    MissingStorage(TableId),

    /// A lookup or aggregate names an owner field the schema does not contain.
    #[error("Field '{field_id}' is attached to missing field '{owner_id}'")]
    MissingOwnerField { field_id: FieldId, owner_id: FieldId },

    /// A lookup or aggregate is attached to a field that is not a relation.
    #[error("Field '{field_id}' is attached to '{owner_id}', which is not a reference, tree or parent field")]
    InvalidOwnerField { field_id: FieldId, owner_id: FieldId },

    /// A display or aggregate source field is missing from the foreign schema.
    #[error("Field '{field_id}' does not exist in foreign table '{table_id}'")]
    UnknownForeignField { table_id: TableId, field_id: FieldId },
}

pub type CompileResult<T> = Result<T, CompileError>;
