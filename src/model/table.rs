//! Tables and their ordered field schemas.

use std::collections::HashMap;

use serde::Deserialize;

use super::error::{SchemaError, SchemaResult};
use super::field::{Field, FieldDto};
use super::ids::{FieldId, TableId};

// ============================================================================
// Schema
// ============================================================================

/// Ordered fields of a table plus an id index.
///
/// Field order is significant: the compiler visits fields in this order.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "Vec<Field>")]
pub struct Schema {
    fields: Vec<Field>,
    index: HashMap<FieldId, usize>,
}

impl Schema {
    /// Build a schema, rejecting duplicate field ids.
    pub fn new(fields: Vec<Field>) -> SchemaResult<Self> {
        let mut index = HashMap::with_capacity(fields.len());
        for (position, field) in fields.iter().enumerate() {
            if index.insert(field.id.clone(), position).is_some() {
                return Err(SchemaError::DuplicateFieldId(field.id.clone()));
            }
        }
        Ok(Self { fields, index })
    }

    /// Parse a JSON array of persisted field documents.
    pub fn from_json(json: &str) -> SchemaResult<Self> {
        let dtos: Vec<FieldDto> = serde_json::from_str(json)?;
        Self::from_dtos(dtos)
    }

    fn from_dtos(dtos: Vec<FieldDto>) -> SchemaResult<Self> {
        let fields = dtos
            .into_iter()
            .map(Field::try_from)
            .collect::<SchemaResult<Vec<_>>>()?;
        Self::new(fields)
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Field> {
        self.fields.iter()
    }

    pub fn get(&self, id: &FieldId) -> Option<&Field> {
        self.index.get(id).map(|&position| &self.fields[position])
    }

    pub fn contains(&self, id: &FieldId) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields flagged for display when another table relates to this one.
    pub fn display_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.display)
    }
}

impl TryFrom<Vec<Field>> for Schema {
    type Error = SchemaError;

    fn try_from(fields: Vec<Field>) -> Result<Self, Self::Error> {
        Schema::new(fields)
    }
}

impl<'a> IntoIterator for &'a Schema {
    type Item = &'a Field;
    type IntoIter = std::slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

// ============================================================================
// Table
// ============================================================================

/// A user table.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub id: TableId,
    pub name: String,
    pub schema: Schema,
    /// Soft-delete flag.
    pub deleted: bool,
}

#[derive(Debug, Deserialize)]
struct TableDto {
    id: TableId,
    #[serde(default)]
    name: String,
    #[serde(default)]
    deleted: bool,
    #[serde(default)]
    schema: Vec<FieldDto>,
}

impl Table {
    pub fn new(id: impl Into<TableId>, name: &str, schema: Schema) -> Self {
        Self {
            id: id.into(),
            name: name.to_string(),
            schema,
            deleted: false,
        }
    }

    /// Parse a persisted table document: `{ "id", "name", "deleted", "schema": [...] }`.
    pub fn from_json(json: &str) -> SchemaResult<Self> {
        let dto: TableDto = serde_json::from_str(json)?;
        Ok(Self {
            id: dto.id,
            name: dto.name,
            schema: Schema::from_dtos(dto.schema)?,
            deleted: dto.deleted,
        })
    }

    pub fn field(&self, id: &FieldId) -> Option<&Field> {
        self.schema.get(id)
    }
}
