//! Syntax checks for emitted SQL.
//!
//! Compiled queries are parsed with sqlparser-rs against the target engine's
//! grammar. Tests run every compile through here; embedders can too before
//! handing SQL to a connection.

use sqlparser::dialect::{DuckDbDialect, PostgreSqlDialect, SQLiteDialect};
use sqlparser::parser::Parser;

use super::dialect::Dialect;

/// Parse `sql` with the grammar for `dialect`.
///
/// The error message carries the parser's complaint followed by the full SQL.
///
/// ```ignore
/// let output = compiler.compile(&table, compiler.base_query(&table))?;
/// fieldgraph::sql::check::validate_sql(&output.sql, output.dialect)?;
/// ```
pub fn validate_sql(sql: &str, dialect: Dialect) -> Result<(), String> {
    let grammar: Box<dyn sqlparser::dialect::Dialect> = match dialect {
        Dialect::Sqlite => Box::new(SQLiteDialect {}),
        Dialect::Postgres => Box::new(PostgreSqlDialect {}),
        Dialect::DuckDb => Box::new(DuckDbDialect {}),
    };

    match Parser::parse_sql(grammar.as_ref(), sql) {
        Ok(_) => Ok(()),
        Err(e) => Err(format!("{} rejected compiled SQL: {}\n{}", dialect, e, sql)),
    }
}
