//! Field-graph compiler: turns a table's relation fields into SQL.
//!
//! For every reference, tree and parent field of a table the compiler builds
//! two nested subqueries and left-joins them onto a caller-supplied base
//! query:
//!
//! ```text
//! base (t) ─LEFT JOIN─► edge subquery (uta_<field>)
//!                       grouped per current record, JSON-aggregates ids,
//!                       display values and attached count/sum/average
//!                         └─LEFT JOIN─► nest subquery (fta_<field>)
//!                                       one row per foreign record
//! ```
//!
//! Reference fields read an adjacency list; tree and parent fields read a
//! closure table. Lookups and aggregates fold into their owner's subqueries.
//!
//! # Example
//!
//! ```ignore
//! use fieldgraph::compiler::Compiler;
//! use fieldgraph::model::MemoryCatalog;
//!
//! let catalog = MemoryCatalog::new().with_table(posts).with_table(tags);
//! let compiler = Compiler::new(&catalog);
//! let base = compiler.base_query(&posts);
//! let output = compiler.compile(&posts, base)?;
//! println!("{}", output.sql);
//! ```

mod adjacency;
mod aggregate;
mod assembler;
mod attachment;
mod closure;
mod columns;
mod error;
mod walker;

pub use adjacency::Orientation;
pub use aggregate::{AttachmentIndex, Attachments};
pub use assembler::{CompiledFragment, QueryAssembler, RelationFragment};
pub use error::{CompileError, CompileResult};
pub use walker::VisitedSet;

use crate::model::{Catalog, Field, FieldId, Relation, StorageLayout, Table, TableId};
use crate::naming;
use crate::sql::expr::table_col;
use crate::sql::{Dialect, ExprExt, Join, Query, TableRef};

use columns::DisplayColumnSet;
use walker::{CompileState, FieldGraphWalker};

// ============================================================================
// Options
// ============================================================================

/// Options for compilation.
#[derive(Debug, Clone, PartialEq)]
pub struct CompileOptions {
    /// Dialect the output SQL is rendered in.
    pub dialect: Dialect,
    /// Alias of the base record table.
    pub base_alias: String,
    /// Record identity column, shared by every record table.
    pub id_column: String,
    /// Appended to a field id to name its JSON expand column.
    pub expand_suffix: String,
    /// Report zero instead of NULL for counts over no related records.
    pub coalesce_counts: bool,
    pub attachment: AttachmentOptions,
}

/// Where attachment fields read their files from.
#[derive(Debug, Clone, PartialEq)]
pub struct AttachmentOptions {
    pub table: String,
    pub record_id_column: String,
    /// Column naming the attachment field a file belongs to.
    pub field_id_column: String,
}

impl Default for AttachmentOptions {
    fn default() -> Self {
        Self {
            table: "attachment".to_string(),
            record_id_column: "record_id".to_string(),
            field_id_column: "field_id".to_string(),
        }
    }
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            dialect: Dialect::Sqlite,
            base_alias: "t".to_string(),
            id_column: "id".to_string(),
            expand_suffix: naming::DEFAULT_EXPAND_SUFFIX.to_string(),
            coalesce_counts: true,
            attachment: AttachmentOptions::default(),
        }
    }
}

impl CompileOptions {
    /// Set the SQL dialect.
    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Set the base table alias.
    pub fn with_base_alias(mut self, alias: &str) -> Self {
        self.base_alias = alias.to_string();
        self
    }
}

// ============================================================================
// Output
// ============================================================================

/// A field dropped because its relation's foreign table is soft-deleted or missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaleField {
    pub field_id: FieldId,
    /// The relation field; equal to `field_id` for the relation itself.
    pub relation_field_id: FieldId,
    pub foreign_table_id: TableId,
}

/// Result of compiling a table.
#[derive(Debug, Clone)]
pub struct CompileOutput {
    /// The base query with every relation fragment applied.
    pub query: Query,
    /// `query` rendered in `dialect`.
    pub sql: String,
    pub dialect: Dialect,
    /// Fields that contributed nothing because of a dangling foreign table.
    pub stale: Vec<StaleField>,
}

// ============================================================================
// Compiler
// ============================================================================

/// Compiles relation fields against a catalog.
///
/// Immutable once built: each [`Compiler::compile`] call owns its visited set
/// and assembler, so one compiler can serve many threads.
#[derive(Debug)]
pub struct Compiler<'c, C: Catalog + ?Sized> {
    catalog: &'c C,
    options: CompileOptions,
}

impl<'c, C: Catalog + ?Sized> Compiler<'c, C> {
    pub fn new(catalog: &'c C) -> Self {
        Self::with_options(catalog, CompileOptions::default())
    }

    pub fn with_options(catalog: &'c C, options: CompileOptions) -> Self {
        Self { catalog, options }
    }

    /// `SELECT t.* FROM <table> AS t`
    pub fn base_query(&self, table: &Table) -> Query {
        Query::new()
            .select_all_from(&self.options.base_alias)
            .from(TableRef::new(table.id.as_str()).with_alias(&self.options.base_alias))
    }

    /// Layer every relation field of `table` onto `base`.
    ///
    /// Fails without touching `base` on any schema inconsistency.
    pub fn compile(&self, table: &Table, base: Query) -> CompileResult<CompileOutput> {
        let storage = self
            .catalog
            .storage(&table.id)
            .ok_or_else(|| CompileError::MissingStorage(table.id.clone()))?;

        let walker = FieldGraphWalker::new(self.catalog, &self.options, table, storage);
        let mut state = CompileState::new();
        walker.walk(&mut state)?;

        let stale = state.stale;
        let query = state.assembler.finish(base);
        let sql = query.to_sql(self.options.dialect);

        Ok(CompileOutput {
            query,
            sql,
            dialect: self.options.dialect,
            stale,
        })
    }
}

// ============================================================================
// Resolver context
// ============================================================================

/// What a relation resolver needs to know about one relation field.
pub(crate) struct RelationContext<'a> {
    pub options: &'a CompileOptions,
    pub table: &'a Table,
    pub field: &'a Field,
    pub foreign: &'a Table,
    /// Display fields of the relation itself, before attachments are merged.
    pub direct_display: Vec<&'a FieldId>,
    pub display: DisplayColumnSet<'a>,
    pub attachments: &'a Attachments<'a>,
}

impl<'a> RelationContext<'a> {
    pub fn new(
        options: &'a CompileOptions,
        table: &'a Table,
        field: &'a Field,
        relation: Relation<'a>,
        foreign: &'a Table,
        foreign_storage: &'a StorageLayout,
        attachments: &'a Attachments<'a>,
    ) -> CompileResult<Self> {
        let direct_display = columns::relation_display_ids(relation, foreign);
        let display =
            DisplayColumnSet::collect(&direct_display, attachments, foreign, foreign_storage)?;
        Ok(Self {
            options,
            table,
            field,
            foreign,
            direct_display,
            display,
            attachments,
        })
    }

    pub fn edge_alias(&self) -> String {
        naming::edge_alias(&self.field.id)
    }

    pub fn nest_alias(&self) -> String {
        naming::nest_alias(&self.field.id)
    }

    /// Nest subquery over the foreign table.
    pub fn nest_subquery(&self) -> Query {
        self.display
            .nest_subquery(self.foreign.id.as_str(), &self.options.id_column)
    }

    /// Join `edge` onto the base on `<edge alias>.<current column> = t.id` and
    /// project the relation's columns from it.
    pub fn fragment(&self, edge: Query, current_column: &str) -> RelationFragment {
        let alias = self.edge_alias();
        let id = self.field.id.as_str();
        let expand_name = naming::expand_column(&self.field.id, &self.options.expand_suffix);

        let mut selects = vec![
            table_col(&alias, id).alias(id),
            columns::expand_column(&self.field.id, &self.direct_display, &alias, &expand_name),
        ];
        selects.extend(self.attachments.base_projections(&alias, self.options));

        let on = table_col(&alias, current_column).eq(table_col(
            &self.options.base_alias,
            &self.options.id_column,
        ));

        RelationFragment {
            field_id: self.field.id.clone(),
            join: Join::left(TableRef::subquery(edge, &alias), on),
            alias,
            selects,
        }
    }
}
