//! Expression AST for the fragments field compilation emits.
//!
//! There is no raw-SQL variant: every projection, predicate and aggregate
//! the compiler builds is made of these nodes, so identifiers are always
//! quoted and JSON functions are always remapped for the target dialect.

use super::dialect::Dialect;
use super::query::SelectExpr;
use super::token::{Token, TokenStream};

/// A SQL expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// `column` or `qualifier.column`
    Column {
        table: Option<String>,
        column: String,
    },

    Literal(Literal),

    /// `left op right`
    BinaryOp {
        left: Box<Expr>,
        op: BinaryOperator,
        right: Box<Expr>,
    },

    /// `name(args...)`
    Function { name: String, args: Vec<Expr> },

    /// `*` or `qualifier.*`
    Star { table: Option<String> },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    String(String),
    Null,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Eq,
    Gt,
    And,
}

impl BinaryOperator {
    fn token(self) -> Token {
        match self {
            BinaryOperator::Eq => Token::Eq,
            BinaryOperator::Gt => Token::Gt,
            BinaryOperator::And => Token::And,
        }
    }
}

impl Expr {
    /// Lower to tokens for the default dialect.
    pub fn to_tokens(&self) -> TokenStream {
        self.to_tokens_for_dialect(Dialect::default())
    }

    /// Lower to tokens. The dialect reaches every nested node, so a
    /// `JSON_OBJECT` inside a `JSON_GROUP_ARRAY` is remapped along with it.
    pub fn to_tokens_for_dialect(&self, dialect: Dialect) -> TokenStream {
        let mut ts = TokenStream::new();

        match self {
            Expr::Column { table, column } => {
                if let Some(qualifier) = table {
                    ts.push(Token::Ident(qualifier.clone())).push(Token::Dot);
                }
                ts.push(Token::Ident(column.clone()));
            }

            Expr::Literal(Literal::Int(n)) => {
                ts.push(Token::LitInt(*n));
            }
            Expr::Literal(Literal::String(s)) => {
                ts.push(Token::LitString(s.clone()));
            }
            Expr::Literal(Literal::Null) => {
                ts.push(Token::LitNull);
            }

            Expr::BinaryOp { left, op, right } => {
                ts.append(&left.to_tokens_for_dialect(dialect))
                    .space()
                    .push(op.token())
                    .space()
                    .append(&right.to_tokens_for_dialect(dialect));
            }

            Expr::Function { name, args } => {
                ts.push(Token::FunctionName(name.clone()))
                    .lparen()
                    .comma_separated(args, |arg| arg.to_tokens_for_dialect(dialect))
                    .rparen();
            }

            Expr::Star { table } => {
                if let Some(qualifier) = table {
                    ts.push(Token::Ident(qualifier.clone())).push(Token::Dot);
                }
                ts.push(Token::Star);
            }
        }

        ts
    }
}

// =============================================================================
// Constructors
// =============================================================================

pub fn col(name: &str) -> Expr {
    Expr::Column {
        table: None,
        column: name.into(),
    }
}

/// `qualifier.column`
pub fn table_col(qualifier: &str, column: &str) -> Expr {
    Expr::Column {
        table: Some(qualifier.into()),
        column: column.into(),
    }
}

pub fn lit_int(n: i64) -> Expr {
    Expr::Literal(Literal::Int(n))
}

pub fn lit_str(s: &str) -> Expr {
    Expr::Literal(Literal::String(s.into()))
}

pub fn lit_null() -> Expr {
    Expr::Literal(Literal::Null)
}

pub fn star() -> Expr {
    Expr::Star { table: None }
}

pub fn func(name: &str, args: Vec<Expr>) -> Expr {
    Expr::Function {
        name: name.into(),
        args,
    }
}

pub fn count_star() -> Expr {
    func("COUNT", vec![star()])
}

pub fn sum(expr: Expr) -> Expr {
    func("SUM", vec![expr])
}

pub fn avg(expr: Expr) -> Expr {
    func("AVG", vec![expr])
}

pub fn coalesce(args: Vec<Expr>) -> Expr {
    func("COALESCE", args)
}

// JSON builders use SQLite JSON1 names; `SqlDialect::remap_function`
// translates them for the other engines.

/// Aggregate values into a JSON array.
pub fn json_group_array(expr: Expr) -> Expr {
    func("JSON_GROUP_ARRAY", vec![expr])
}

/// A JSON array of scalar values, used to pack multi-column display values.
pub fn json_array(args: Vec<Expr>) -> Expr {
    func("JSON_ARRAY", args)
}

/// Re-read a text value as JSON so it nests as a value rather than a
/// quoted string.
pub fn json(expr: Expr) -> Expr {
    func("JSON", vec![expr])
}

/// A JSON object from `(key, value)` pairs. Keys become string literals,
/// and an empty pair list yields `JSON_OBJECT()`.
pub fn json_object<K: AsRef<str>>(pairs: Vec<(K, Expr)>) -> Expr {
    let args = pairs
        .into_iter()
        .flat_map(|(key, value)| [lit_str(key.as_ref()), value])
        .collect();
    func("JSON_OBJECT", args)
}

// =============================================================================
// Fluent builder
// =============================================================================

/// Chaining helpers on anything that becomes an [`Expr`].
pub trait ExprExt: Sized {
    fn into_expr(self) -> Expr;

    fn eq(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Eq, other.into())
    }

    fn gt(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Gt, other.into())
    }

    fn and(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::And, other.into())
    }

    /// Name this expression in a SELECT list.
    fn alias(self, name: &str) -> SelectExpr {
        SelectExpr::new(self.into_expr()).with_alias(name)
    }
}

impl ExprExt for Expr {
    fn into_expr(self) -> Expr {
        self
    }
}

fn binary(left: Expr, op: BinaryOperator, right: Expr) -> Expr {
    Expr::BinaryOp {
        left: Box::new(left),
        op,
        right: Box::new(right),
    }
}

impl From<i64> for Expr {
    fn from(n: i64) -> Self {
        lit_int(n)
    }
}
