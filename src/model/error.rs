//! Errors raised while loading or building a schema.

use thiserror::Error;

use super::ids::FieldId;

/// Errors that can occur when building a schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The persisted `type` tag names no known field kind.
    #[error("Field '{field_id}' has unknown kind '{kind}'")]
    UnknownFieldKind { field_id: FieldId, kind: String },

    /// The option payload does not match the field kind.
    #[error("Invalid option for {kind} field '{field_id}': {source}")]
    InvalidOption {
        field_id: FieldId,
        kind: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Duplicate field id: {0}")]
    DuplicateFieldId(FieldId),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;
