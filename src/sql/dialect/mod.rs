//! Target engines and how SQL is spelled for each.
//!
//! | | SQLite | PostgreSQL | DuckDB |
//! |---|---|---|---|
//! | JSON aggregation | `json_group_array` | `json_agg` | `json_group_array` |
//! | JSON object | `json_object` | `json_build_object` | `json_object` |
//! | JSON array | `json_array` | `json_build_array` | `json_array` |
//! | Text to JSON | `json` | `to_json` | `json` |
//!
//! SQLite backs the record store and is the default. The other two let
//! compiled fragments be checked against stricter GROUP BY rules.

mod duckdb;
mod postgres;
mod sqlite;

pub use duckdb::DuckDb;
pub use postgres::Postgres;
pub use sqlite::Sqlite;

use serde::{Deserialize, Serialize};

/// How one engine renders identifiers, literals and function names.
pub trait SqlDialect: std::fmt::Debug {
    fn name(&self) -> &'static str;

    /// Double-quote an identifier, doubling embedded quotes.
    fn quote_identifier(&self, ident: &str) -> String {
        format!("\"{}\"", ident.replace('"', "\"\""))
    }

    /// Single-quote a string literal, doubling embedded quotes.
    fn quote_string(&self, s: &str) -> String {
        format!("'{}'", s.replace('\'', "''"))
    }

    /// The engine's spelling of `name`, or `None` to keep it.
    /// Builders spell functions the SQLite way; matching is case-insensitive.
    fn remap_function(&self, name: &str) -> Option<&'static str> {
        let _ = name;
        None
    }
}

/// Supported engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    Sqlite,
    #[serde(alias = "postgresql")]
    Postgres,
    DuckDb,
}

impl Dialect {
    pub fn dialect(&self) -> &'static dyn SqlDialect {
        match self {
            Dialect::Sqlite => &Sqlite,
            Dialect::Postgres => &Postgres,
            Dialect::DuckDb => &DuckDb,
        }
    }
}

impl SqlDialect for Dialect {
    fn name(&self) -> &'static str {
        self.dialect().name()
    }

    fn quote_identifier(&self, ident: &str) -> String {
        self.dialect().quote_identifier(ident)
    }

    fn quote_string(&self, s: &str) -> String {
        self.dialect().quote_string(s)
    }

    fn remap_function(&self, name: &str) -> Option<&'static str> {
        self.dialect().remap_function(name)
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sqlite" => Ok(Dialect::Sqlite),
            "postgres" | "postgresql" => Ok(Dialect::Postgres),
            "duckdb" => Ok(Dialect::DuckDb),
            other => Err(format!("unknown dialect: {}", other)),
        }
    }
}
