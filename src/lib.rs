//! # fieldgraph
//!
//! Compiles a table's field graph (references, hierarchies, lookups and
//! aggregates) into multi-dialect SQL.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │              Schema (tables, fields, storage)            │
//! │      loaded from JSON, checked by `validation`           │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [walker]
//! ┌─────────────────────────────────────────────────────────┐
//! │      Relation fields routed to their resolvers           │
//! │  adjacency list (reference) · closure table (tree,       │
//! │  parent) · attachment table · attached aggregates        │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [assembler]
//! ┌─────────────────────────────────────────────────────────┐
//! │       Base query + LEFT JOINed edge/nest subqueries      │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [dialect]
//! ┌─────────────────────────────────────────────────────────┐
//! │                  SQL (SQLite, Postgres, DuckDB)          │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod compiler;
pub mod config;
pub mod model;
pub mod naming;
pub mod sql;
pub mod validation;

// Re-export SQL submodules at crate level
pub use sql::dialect;
pub use sql::expr;
pub use sql::query;
pub use sql::token;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::compiler::{CompileError, CompileOptions, CompileOutput, Compiler, StaleField};
    pub use crate::dialect::{Dialect, SqlDialect};
    pub use crate::expr::{
        avg, coalesce, col, count_star, func, json, json_array, json_group_array, json_object,
        lit_int, lit_null, lit_str, star, sum, table_col, BinaryOperator, Expr, ExprExt, Literal,
    };
    pub use crate::model::{
        Catalog, Field, FieldId, FieldKind, MemoryCatalog, Schema, StorageLayout, Table, TableId,
    };
    pub use crate::query::{Join, Query, SelectExpr, TableRef};
    pub use crate::token::{Token, TokenStream};
}

// Also export at crate root for convenience
pub use compiler::{CompileError, CompileOptions, CompileOutput, CompileResult, Compiler};
pub use dialect::Dialect;
pub use model::{Catalog, MemoryCatalog, Table};
pub use query::Query;
