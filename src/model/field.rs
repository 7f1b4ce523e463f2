//! Fields and their kinds.
//!
//! A field's kind is a closed enum: every consumer matches on it
//! exhaustively, so a new kind cannot be silently ignored.
//!
//! Persisted field documents look like:
//!
//! ```json
//! {
//!   "id": "fld_tags",
//!   "name": "Tags",
//!   "type": "reference",
//!   "option": { "isOwner": true, "foreignTableId": "tbl_tags", "symmetricFieldId": "fld_posts" }
//! }
//! ```

use serde::{Deserialize, Serialize};

use super::error::{SchemaError, SchemaResult};
use super::ids::{FieldId, TableId};

// ============================================================================
// Field
// ============================================================================

/// A field of a table schema.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "FieldDto")]
pub struct Field {
    pub id: FieldId,
    pub name: String,
    /// Shown when a relation from another table targets this field's table.
    pub display: bool,
    pub kind: FieldKind,
}

impl Field {
    pub fn new(id: impl Into<FieldId>, name: &str, kind: FieldKind) -> Self {
        Self {
            id: id.into(),
            name: name.to_string(),
            display: false,
            kind,
        }
    }

    /// Flag this field as a display field of its table.
    pub fn displayed(mut self) -> Self {
        self.display = true;
        self
    }

    /// The relation this field defines, if it is a reference, tree or parent field.
    pub fn relation(&self) -> Option<Relation<'_>> {
        match &self.kind {
            FieldKind::Reference(option) => Some(Relation::Reference(option)),
            FieldKind::Tree(option) => Some(Relation::Tree(option)),
            FieldKind::Parent(option) => Some(Relation::Parent(option)),
            _ => None,
        }
    }
}

// ============================================================================
// Field kinds
// ============================================================================

/// Every kind of field a table can hold.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    // System
    Id,
    CreatedAt,
    UpdatedAt,
    AutoIncrement,

    // Plain scalars
    String,
    Email,
    Color,
    Number,
    Rating,
    Bool,
    Date,
    DateRange,
    Select,

    /// Files stored in the shared attachment table.
    Attachment,

    // Relations
    Reference(ReferenceOption),
    Tree(TreeOption),
    Parent(ParentOption),

    // Attached to a relation
    Lookup(LookupOption),
    Count(CountOption),
    Sum(SumOption),
    Average(AverageOption),
}

impl FieldKind {
    /// The `type` tag used in persisted field documents.
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldKind::Id => "id",
            FieldKind::CreatedAt => "created_at",
            FieldKind::UpdatedAt => "updated_at",
            FieldKind::AutoIncrement => "auto_increment",
            FieldKind::String => "string",
            FieldKind::Email => "email",
            FieldKind::Color => "color",
            FieldKind::Number => "number",
            FieldKind::Rating => "rating",
            FieldKind::Bool => "bool",
            FieldKind::Date => "date",
            FieldKind::DateRange => "date_range",
            FieldKind::Select => "select",
            FieldKind::Attachment => "attachment",
            FieldKind::Reference(_) => "reference",
            FieldKind::Tree(_) => "tree",
            FieldKind::Parent(_) => "parent",
            FieldKind::Lookup(_) => "lookup",
            FieldKind::Count(_) => "count",
            FieldKind::Sum(_) => "sum",
            FieldKind::Average(_) => "average",
        }
    }

    /// The relation field a lookup or aggregate is attached to.
    pub fn owner_field_id(&self) -> Option<&FieldId> {
        match self {
            FieldKind::Lookup(o) => Some(&o.reference_field_id),
            FieldKind::Count(o) => Some(&o.reference_field_id),
            FieldKind::Sum(o) => Some(&o.reference_field_id),
            FieldKind::Average(o) => Some(&o.reference_field_id),
            _ => None,
        }
    }

    /// Build a kind from its persisted `type` tag and `option` payload.
    pub fn from_parts(
        field_id: &FieldId,
        type_name: &str,
        option: serde_json::Value,
    ) -> SchemaResult<Self> {
        fn parse<T: serde::de::DeserializeOwned>(
            field_id: &FieldId,
            type_name: &str,
            option: serde_json::Value,
        ) -> SchemaResult<T> {
            // A missing option is an empty one.
            let option = match option {
                serde_json::Value::Null => serde_json::Value::Object(Default::default()),
                other => other,
            };
            serde_json::from_value(option).map_err(|source| SchemaError::InvalidOption {
                field_id: field_id.clone(),
                kind: type_name.to_string(),
                source,
            })
        }

        let kind = match type_name {
            "id" => FieldKind::Id,
            "created_at" => FieldKind::CreatedAt,
            "updated_at" => FieldKind::UpdatedAt,
            "auto_increment" => FieldKind::AutoIncrement,
            "string" => FieldKind::String,
            "email" => FieldKind::Email,
            "color" => FieldKind::Color,
            "number" => FieldKind::Number,
            "rating" => FieldKind::Rating,
            "bool" => FieldKind::Bool,
            "date" => FieldKind::Date,
            "date_range" => FieldKind::DateRange,
            "select" => FieldKind::Select,
            "attachment" => FieldKind::Attachment,
            "reference" => FieldKind::Reference(parse(field_id, type_name, option)?),
            "tree" => FieldKind::Tree(parse(field_id, type_name, option)?),
            "parent" => FieldKind::Parent(parse(field_id, type_name, option)?),
            "lookup" => FieldKind::Lookup(parse(field_id, type_name, option)?),
            "count" => FieldKind::Count(parse(field_id, type_name, option)?),
            "sum" => FieldKind::Sum(parse(field_id, type_name, option)?),
            "average" => FieldKind::Average(parse(field_id, type_name, option)?),
            other => {
                return Err(SchemaError::UnknownFieldKind {
                    field_id: field_id.clone(),
                    kind: other.to_string(),
                })
            }
        };
        Ok(kind)
    }
}

// ============================================================================
// Options
// ============================================================================

/// A many-to-many / one-to-many link to another table, stored as an adjacency list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceOption {
    /// The owner created the adjacency-list table.
    #[serde(default)]
    pub is_owner: bool,
    pub foreign_table_id: TableId,
    /// The mirrored field in the foreign table, for bidirectional pairs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symmetric_field_id: Option<FieldId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub display_field_ids: Vec<FieldId>,
}

impl ReferenceOption {
    /// An unpaired, owning reference.
    pub fn owner(foreign_table_id: impl Into<TableId>) -> Self {
        Self {
            is_owner: true,
            foreign_table_id: foreign_table_id.into(),
            symmetric_field_id: None,
            display_field_ids: vec![],
        }
    }

    /// The non-owning side of a symmetric pair.
    pub fn mirror(foreign_table_id: impl Into<TableId>, symmetric: impl Into<FieldId>) -> Self {
        Self {
            is_owner: false,
            foreign_table_id: foreign_table_id.into(),
            symmetric_field_id: Some(symmetric.into()),
            display_field_ids: vec![],
        }
    }

    pub fn with_symmetric(mut self, symmetric: impl Into<FieldId>) -> Self {
        self.symmetric_field_id = Some(symmetric.into());
        self
    }

    pub fn with_display_fields(mut self, ids: Vec<FieldId>) -> Self {
        self.display_field_ids = ids;
        self
    }
}

/// Children of a record in a hierarchy, stored as a closure table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeOption {
    /// Defaults to the owning table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_table_id: Option<TableId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_field_id: Option<FieldId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub display_field_ids: Vec<FieldId>,
}

/// The direct parent of a record in a hierarchy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentOption {
    /// Defaults to the owning table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_table_id: Option<TableId>,
    /// The tree field whose closure table this parent field shares.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tree_field_id: Option<FieldId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub display_field_ids: Vec<FieldId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupOption {
    pub reference_field_id: FieldId,
    /// Foreign fields surfaced by the lookup.
    #[serde(default)]
    pub display_field_ids: Vec<FieldId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountOption {
    pub reference_field_id: FieldId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SumOption {
    pub reference_field_id: FieldId,
    /// Foreign field being summed.
    pub aggregate_field_id: FieldId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AverageOption {
    pub reference_field_id: FieldId,
    /// Foreign field being averaged.
    pub aggregate_field_id: FieldId,
}

// ============================================================================
// Relation view
// ============================================================================

/// Borrowed view over the three relation-bearing kinds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Relation<'a> {
    Reference(&'a ReferenceOption),
    Tree(&'a TreeOption),
    Parent(&'a ParentOption),
}

impl<'a> Relation<'a> {
    /// The table on the other end. Hierarchies default to `owner`.
    pub fn foreign_table_id(&self, owner: &'a TableId) -> &'a TableId {
        match *self {
            Relation::Reference(o) => &o.foreign_table_id,
            Relation::Tree(o) => o.foreign_table_id.as_ref().unwrap_or(owner),
            Relation::Parent(o) => o.foreign_table_id.as_ref().unwrap_or(owner),
        }
    }

    /// Explicitly configured display fields (may be empty).
    pub fn display_field_ids(&self) -> &'a [FieldId] {
        match *self {
            Relation::Reference(o) => &o.display_field_ids,
            Relation::Tree(o) => &o.display_field_ids,
            Relation::Parent(o) => &o.display_field_ids,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Relation::Reference(_) => "reference",
            Relation::Tree(_) => "tree",
            Relation::Parent(_) => "parent",
        }
    }
}

// ============================================================================
// Persisted form
// ============================================================================

/// Field as persisted by the surrounding application.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct FieldDto {
    id: FieldId,
    #[serde(default)]
    name: String,
    #[serde(default)]
    display: bool,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    option: serde_json::Value,
}

impl TryFrom<FieldDto> for Field {
    type Error = SchemaError;

    fn try_from(dto: FieldDto) -> Result<Self, Self::Error> {
        let kind = FieldKind::from_parts(&dto.id, &dto.kind, dto.option)?;
        Ok(Field {
            id: dto.id,
            name: dto.name,
            display: dto.display,
            kind,
        })
    }
}
