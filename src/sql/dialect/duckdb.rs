//! DuckDB: the json extension ships SQLite-compatible names, so nothing is remapped.

use super::SqlDialect;

#[derive(Debug, Clone, Copy)]
pub struct DuckDb;

impl SqlDialect for DuckDb {
    fn name(&self) -> &'static str {
        "duckdb"
    }
}
