//! Multi-dialect SQL builder.
//!
//! - [`token`]: flat token stream, the only place dialects are consulted
//! - [`expr`]: expression AST and constructors
//! - [`query`]: SELECT builder with append-style primitives
//! - [`dialect`]: per-engine quoting and function names
//! - [`check`]: sqlparser-backed syntax validation

pub mod check;
pub mod dialect;
pub mod expr;
pub mod query;
pub mod token;

pub use dialect::{Dialect, SqlDialect};
pub use expr::{
    avg, coalesce, col, count_star, func, json, json_array, json_group_array, json_object,
    lit_int, lit_null, lit_str, star, sum, table_col, BinaryOperator, Expr, ExprExt, Literal,
};
pub use query::{Join, Query, SelectExpr, TableRef, TableSource};
pub use token::{Token, TokenStream};
