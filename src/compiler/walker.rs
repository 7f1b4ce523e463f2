//! Visits every field of a table and routes it to its resolver.

use std::collections::HashSet;

use log::{debug, trace, warn};

use crate::model::{Catalog, Field, FieldId, FieldKind, Relation, StorageLayout, Table, TableId};

use super::adjacency::resolve_reference;
use super::aggregate::{AttachmentIndex, Attachments};
use super::assembler::QueryAssembler;
use super::attachment::resolve_attachment;
use super::closure::{resolve_parent, resolve_tree};
use super::columns::require_field;
use super::error::{CompileError, CompileResult};
use super::{CompileOptions, RelationContext, StaleField};

/// Field ids already resolved during one compile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisitedSet {
    ids: HashSet<FieldId>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `id`; `false` if it was already visited.
    pub fn insert(&mut self, id: &FieldId) -> bool {
        if self.ids.contains(id) {
            return false;
        }
        self.ids.insert(id.clone())
    }

    pub fn contains(&self, id: &FieldId) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Mutable state of one compile, threaded through the walk by `&mut`.
pub(crate) struct CompileState {
    pub visited: VisitedSet,
    pub assembler: QueryAssembler,
    pub stale: Vec<StaleField>,
}

impl CompileState {
    pub fn new() -> Self {
        Self {
            visited: VisitedSet::new(),
            assembler: QueryAssembler::new(),
            stale: Vec::new(),
        }
    }
}

/// Read-only inputs of one compile.
pub(crate) struct FieldGraphWalker<'a, C: Catalog + ?Sized> {
    catalog: &'a C,
    options: &'a CompileOptions,
    table: &'a Table,
    storage: &'a StorageLayout,
    attachments: AttachmentIndex<'a>,
}

impl<'a, C: Catalog + ?Sized> FieldGraphWalker<'a, C> {
    pub fn new(
        catalog: &'a C,
        options: &'a CompileOptions,
        table: &'a Table,
        storage: &'a StorageLayout,
    ) -> Self {
        Self {
            catalog,
            options,
            table,
            storage,
            attachments: AttachmentIndex::scan(&table.schema),
        }
    }

    /// Visit every field in schema order.
    pub fn walk(&self, state: &mut CompileState) -> CompileResult<()> {
        for field in &self.table.schema {
            self.visit(field, state)?;
        }
        Ok(())
    }

    fn visit(&self, field: &'a Field, state: &mut CompileState) -> CompileResult<()> {
        match &field.kind {
            FieldKind::Reference(option) => {
                self.visit_relation(field, Relation::Reference(option), state)
            }
            FieldKind::Tree(option) => self.visit_relation(field, Relation::Tree(option), state),
            FieldKind::Parent(option) => {
                self.visit_relation(field, Relation::Parent(option), state)
            }
            FieldKind::Lookup(option) => self.visit_owner(field, &option.reference_field_id, state),
            FieldKind::Count(option) => self.visit_owner(field, &option.reference_field_id, state),
            FieldKind::Sum(option) => self.visit_owner(field, &option.reference_field_id, state),
            FieldKind::Average(option) => {
                self.visit_owner(field, &option.reference_field_id, state)
            }
            FieldKind::Attachment => {
                if state.visited.insert(&field.id) {
                    state
                        .assembler
                        .push(resolve_attachment(field, self.options));
                }
                Ok(())
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
            | FieldKind::Select => Ok(()),
        }
    }

    /// Attached fields compile through their owner.
    fn visit_owner(
        &self,
        field: &'a Field,
        owner_id: &FieldId,
        state: &mut CompileState,
    ) -> CompileResult<()> {
        let owner = self
            .table
            .schema
            .get(owner_id)
            .ok_or_else(|| CompileError::MissingOwnerField {
                field_id: field.id.clone(),
                owner_id: owner_id.clone(),
            })?;

        match owner.relation() {
            Some(relation) => self.visit_relation(owner, relation, state),
            None => Err(CompileError::InvalidOwnerField {
                field_id: field.id.clone(),
                owner_id: owner_id.clone(),
            }),
        }
    }

    fn visit_relation(
        &self,
        field: &'a Field,
        relation: Relation<'a>,
        state: &mut CompileState,
    ) -> CompileResult<()> {
        if !state.visited.insert(&field.id) {
            trace!("{} {} already visited", relation.kind_name(), field.id);
            return Ok(());
        }

        require_field(self.storage, &field.id)?;

        let empty = Attachments::default();
        let attachments = self.attachments.get(&field.id).unwrap_or(&empty);

        let foreign_id = relation.foreign_table_id(&self.table.id);
        let Some(foreign) = self.foreign_table(foreign_id) else {
            self.mark_stale(field, foreign_id, attachments, state);
            return Ok(());
        };
        let foreign_storage = self
            .catalog
            .storage(foreign_id)
            .ok_or_else(|| CompileError::MissingStorage(foreign_id.clone()))?;

        let ctx = RelationContext::new(
            self.options,
            self.table,
            field,
            relation,
            foreign,
            foreign_storage,
            attachments,
        )?;

        let fragment = match relation {
            Relation::Reference(option) => resolve_reference(&ctx, option),
            Relation::Tree(_) => resolve_tree(&ctx),
            Relation::Parent(option) => resolve_parent(&ctx, option),
        };
        debug!(
            "compiled {} {} as {} ({} display columns)",
            relation.kind_name(),
            field.id,
            fragment.alias,
            ctx.display.len()
        );
        state.assembler.push(fragment);
        Ok(())
    }

    /// The table a relation points to, or `None` if it is soft-deleted or unknown.
    /// A self-referencing relation always resolves to the table being compiled.
    fn foreign_table(&self, id: &TableId) -> Option<&'a Table> {
        if id == &self.table.id {
            return Some(self.table);
        }
        if self.catalog.is_deleted(id) {
            return None;
        }
        self.catalog.table(id)
    }

    fn mark_stale(
        &self,
        field: &Field,
        foreign_id: &TableId,
        attachments: &Attachments<'_>,
        state: &mut CompileState,
    ) {
        warn!(
            "skipping {} (and {} attached fields): foreign table {} is deleted",
            field.id,
            attachments.field_ids().count(),
            foreign_id
        );

        let stale = |field_id: &FieldId| StaleField {
            field_id: field_id.clone(),
            relation_field_id: field.id.clone(),
            foreign_table_id: foreign_id.clone(),
        };
        state.stale.push(stale(&field.id));
        state.stale.extend(attachments.field_ids().map(stale));
    }
}
