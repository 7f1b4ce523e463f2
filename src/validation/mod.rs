//! Validation of table schemas against a catalog.
//!
//! The compiler assumes a well-formed field graph and fails fast on the first
//! inconsistency it meets. `validate_table` instead walks the whole schema
//! and reports every problem at once, for use when a schema is saved.

use crate::model::{
    Catalog, Field, FieldId, FieldKind, ParentOption, ReferenceOption, Relation, Table, TableId,
    TreeOption,
};

/// Validation error.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A field points to a table that is not in the catalog.
    UndefinedTable { field_id: FieldId, table_id: TableId },
    /// A field names a field that does not exist in the target table.
    UndefinedField {
        field_id: FieldId,
        table_id: TableId,
        missing_id: FieldId,
    },
    /// A lookup or aggregate is attached to something other than a relation.
    InvalidOwner { field_id: FieldId, owner_id: FieldId },
    /// The two halves of a symmetric reference pair disagree.
    SymmetricMismatch {
        field_id: FieldId,
        symmetric_id: FieldId,
        issue: String,
    },
    /// Both or neither side of a symmetric pair claims ownership.
    OwnerConflict {
        field_id: FieldId,
        symmetric_id: FieldId,
        both: bool,
    },
    /// A tree and parent field are paired inconsistently.
    InvalidHierarchy { field_id: FieldId, issue: String },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::UndefinedTable { field_id, table_id } => {
                write!(f, "Field '{}' references undefined table '{}'", field_id, table_id)
            }
            ValidationError::UndefinedField {
                field_id,
                table_id,
                missing_id,
            } => {
                write!(
                    f,
                    "Field '{}' references undefined field '{}' in table '{}'",
                    field_id, missing_id, table_id
                )
            }
            ValidationError::InvalidOwner { field_id, owner_id } => {
                write!(
                    f,
                    "Field '{}' is attached to '{}', which is not a reference, tree or parent field",
                    field_id, owner_id
                )
            }
            ValidationError::SymmetricMismatch {
                field_id,
                symmetric_id,
                issue,
            } => {
                write!(
                    f,
                    "Field '{}' and its symmetric field '{}' disagree: {}",
                    field_id, symmetric_id, issue
                )
            }
            ValidationError::OwnerConflict {
                field_id,
                symmetric_id,
                both,
            } => {
                let which = if *both { "both" } else { "neither" };
                write!(
                    f,
                    "Symmetric fields '{}' and '{}': {} side is the owner",
                    field_id, symmetric_id, which
                )
            }
            ValidationError::InvalidHierarchy { field_id, issue } => {
                write!(f, "Hierarchy field '{}' is invalid: {}", field_id, issue)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate every field of `table` against `catalog`.
///
/// Soft-deleted foreign tables are not errors here: the compiler reports
/// them as stale.
pub fn validate_table<C: Catalog + ?Sized>(
    table: &Table,
    catalog: &C,
) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    for field in &table.schema {
        match &field.kind {
            FieldKind::Reference(option) => {
                let relation = Relation::Reference(option);
                validate_relation(table, catalog, field, relation, &mut errors);
                validate_symmetric(table, catalog, field, option, &mut errors);
            }
            FieldKind::Tree(option) => {
                validate_relation(table, catalog, field, Relation::Tree(option), &mut errors);
                validate_tree(table, field, option, &mut errors);
            }
            FieldKind::Parent(option) => {
                validate_relation(table, catalog, field, Relation::Parent(option), &mut errors);
                validate_parent(table, field, option, &mut errors);
            }
            FieldKind::Lookup(option) => {
                let foreign = validate_owner(table, catalog, field, &option.reference_field_id, &mut errors);
                if let Some(foreign) = foreign {
                    for id in &option.display_field_ids {
                        check_foreign_field(field, foreign, id, &mut errors);
                    }
                }
            }
            FieldKind::Count(option) => {
                validate_owner(table, catalog, field, &option.reference_field_id, &mut errors);
            }
            FieldKind::Sum(option) => {
                let foreign = validate_owner(table, catalog, field, &option.reference_field_id, &mut errors);
                if let Some(foreign) = foreign {
                    check_foreign_field(field, foreign, &option.aggregate_field_id, &mut errors);
                }
            }
            FieldKind::Average(option) => {
                let foreign = validate_owner(table, catalog, field, &option.reference_field_id, &mut errors);
                if let Some(foreign) = foreign {
                    check_foreign_field(field, foreign, &option.aggregate_field_id, &mut errors);
                }
            }
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
            | FieldKind::Attachment => {}
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// The table on the other end of a relation, if it is known.
fn foreign_table<'a, C: Catalog + ?Sized>(
    table: &'a Table,
    catalog: &'a C,
    relation: Relation<'a>,
) -> Result<&'a Table, &'a TableId> {
    let id = relation.foreign_table_id(&table.id);
    if id == &table.id {
        return Ok(table);
    }
    catalog.table(id).ok_or(id)
}

fn validate_relation<C: Catalog + ?Sized>(
    table: &Table,
    catalog: &C,
    field: &Field,
    relation: Relation<'_>,
    errors: &mut Vec<ValidationError>,
) {
    match foreign_table(table, catalog, relation) {
        Ok(foreign) => {
            for id in relation.display_field_ids() {
                check_foreign_field(field, foreign, id, errors);
            }
        }
        Err(table_id) => errors.push(ValidationError::UndefinedTable {
            field_id: field.id.clone(),
            table_id: table_id.clone(),
        }),
    }
}

fn validate_symmetric<C: Catalog + ?Sized>(
    table: &Table,
    catalog: &C,
    field: &Field,
    option: &ReferenceOption,
    errors: &mut Vec<ValidationError>,
) {
    let Some(symmetric_id) = &option.symmetric_field_id else {
        return;
    };
    let Ok(foreign) = foreign_table(table, catalog, Relation::Reference(option)) else {
        return;
    };

    let mismatch = |issue: &str| ValidationError::SymmetricMismatch {
        field_id: field.id.clone(),
        symmetric_id: symmetric_id.clone(),
        issue: issue.to_string(),
    };

    let Some(partner) = foreign.field(symmetric_id) else {
        errors.push(ValidationError::UndefinedField {
            field_id: field.id.clone(),
            table_id: foreign.id.clone(),
            missing_id: symmetric_id.clone(),
        });
        return;
    };
    let FieldKind::Reference(partner_option) = &partner.kind else {
        errors.push(mismatch("symmetric field is not a reference field"));
        return;
    };

    if partner_option.symmetric_field_id.as_ref() != Some(&field.id) {
        errors.push(mismatch("symmetric field does not point back"));
    }
    if partner_option.foreign_table_id != table.id {
        errors.push(mismatch("symmetric field targets another table"));
    }
    if partner_option.is_owner == option.is_owner {
        // Report the pair once, from the side that sorts first.
        let (a, b) = if field.id <= *symmetric_id {
            (&field.id, symmetric_id)
        } else {
            (symmetric_id, &field.id)
        };
        errors.push(ValidationError::OwnerConflict {
            field_id: a.clone(),
            symmetric_id: b.clone(),
            both: option.is_owner,
        });
    }
}

fn validate_tree(
    table: &Table,
    field: &Field,
    option: &TreeOption,
    errors: &mut Vec<ValidationError>,
) {
    let Some(parent_id) = &option.parent_field_id else {
        return;
    };
    match table.field(parent_id).map(|parent| &parent.kind) {
        Some(FieldKind::Parent(parent)) => {
            if parent.tree_field_id.as_ref() != Some(&field.id) {
                errors.push(ValidationError::InvalidHierarchy {
                    field_id: field.id.clone(),
                    issue: format!("parent field '{}' is paired with another tree", parent_id),
                });
            }
        }
        Some(_) => errors.push(ValidationError::InvalidHierarchy {
            field_id: field.id.clone(),
            issue: format!("'{}' is not a parent field", parent_id),
        }),
        None => errors.push(ValidationError::UndefinedField {
            field_id: field.id.clone(),
            table_id: table.id.clone(),
            missing_id: parent_id.clone(),
        }),
    }
}

fn validate_parent(
    table: &Table,
    field: &Field,
    option: &ParentOption,
    errors: &mut Vec<ValidationError>,
) {
    let Some(tree_id) = &option.tree_field_id else {
        return;
    };
    match table.field(tree_id).map(|tree| &tree.kind) {
        Some(FieldKind::Tree(tree)) => {
            let spans = |id: &Option<TableId>| id.clone().unwrap_or_else(|| table.id.clone());
            if spans(&tree.foreign_table_id) != spans(&option.foreign_table_id) {
                errors.push(ValidationError::InvalidHierarchy {
                    field_id: field.id.clone(),
                    issue: format!("tree field '{}' spans another table", tree_id),
                });
            }
        }
        Some(_) => errors.push(ValidationError::InvalidHierarchy {
            field_id: field.id.clone(),
            issue: format!("'{}' is not a tree field", tree_id),
        }),
        None => errors.push(ValidationError::UndefinedField {
            field_id: field.id.clone(),
            table_id: table.id.clone(),
            missing_id: tree_id.clone(),
        }),
    }
}

/// Check an attached field's owner and return the owner's foreign table.
fn validate_owner<'a, C: Catalog + ?Sized>(
    table: &'a Table,
    catalog: &'a C,
    field: &Field,
    owner_id: &FieldId,
    errors: &mut Vec<ValidationError>,
) -> Option<&'a Table> {
    let Some(owner) = table.field(owner_id) else {
        errors.push(ValidationError::UndefinedField {
            field_id: field.id.clone(),
            table_id: table.id.clone(),
            missing_id: owner_id.clone(),
        });
        return None;
    };
    let Some(relation) = owner.relation() else {
        errors.push(ValidationError::InvalidOwner {
            field_id: field.id.clone(),
            owner_id: owner_id.clone(),
        });
        return None;
    };
    // An unknown foreign table is reported on the owner itself.
    foreign_table(table, catalog, relation).ok()
}

fn check_foreign_field(
    field: &Field,
    foreign: &Table,
    id: &FieldId,
    errors: &mut Vec<ValidationError>,
) {
    if !foreign.schema.contains(id) {
        errors.push(ValidationError::UndefinedField {
            field_id: field.id.clone(),
            table_id: foreign.id.clone(),
            missing_id: id.clone(),
        });
    }
}
