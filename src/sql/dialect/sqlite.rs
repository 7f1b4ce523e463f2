//! SQLite, the record store's engine.
//!
//! JSON values read back out of a derived table are plain text here, so
//! nested JSON is re-parsed with `json()`.

use super::SqlDialect;

#[derive(Debug, Clone, Copy)]
pub struct Sqlite;

impl SqlDialect for Sqlite {
    fn name(&self) -> &'static str {
        "sqlite"
    }
}
