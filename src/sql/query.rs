//! SELECT builder.
//!
//! Resolvers build edge subqueries with the consuming methods; the
//! assembler layers its output onto the caller's base query through the
//! append-style [`Query::add_select`], [`Query::add_join`] and
//! [`Query::add_group_by`].

use std::fmt;

use super::dialect::Dialect;
use super::expr::{Expr, ExprExt};
use super::token::{Token, TokenStream};

/// One item of a SELECT list.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "builders have no effect until used"]
pub struct SelectExpr {
    pub expr: Expr,
    pub alias: Option<String>,
}

impl SelectExpr {
    pub fn new(expr: Expr) -> Self {
        Self { expr, alias: None }
    }

    pub fn with_alias(mut self, alias: &str) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Name of the result column this item produces, if it has one.
    pub fn output_name(&self) -> Option<&str> {
        match (&self.alias, &self.expr) {
            (Some(alias), _) => Some(alias),
            (None, Expr::Column { column, .. }) => Some(column),
            _ => None,
        }
    }

    pub fn to_tokens_for_dialect(&self, dialect: Dialect) -> TokenStream {
        let mut ts = self.expr.to_tokens_for_dialect(dialect);
        if let Some(alias) = &self.alias {
            ts.alias(alias);
        }
        ts
    }
}

impl From<Expr> for SelectExpr {
    fn from(expr: Expr) -> Self {
        SelectExpr::new(expr)
    }
}

/// What a FROM or JOIN reads.
#[derive(Debug, Clone, PartialEq)]
pub enum TableSource {
    Named(String),
    /// `(SELECT ...)`
    Subquery(Box<Query>),
}

#[derive(Debug, Clone, PartialEq)]
#[must_use = "builders have no effect until used"]
pub struct TableRef {
    pub source: TableSource,
    pub alias: Option<String>,
}

impl TableRef {
    pub fn new(table: &str) -> Self {
        Self {
            source: TableSource::Named(table.into()),
            alias: None,
        }
    }

    /// A derived table. Derived tables are always aliased.
    pub fn subquery(query: Query, alias: &str) -> Self {
        Self {
            source: TableSource::Subquery(Box::new(query)),
            alias: Some(alias.into()),
        }
    }

    pub fn with_alias(mut self, alias: &str) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Name columns of this table are qualified with: the alias, else the table name.
    pub fn qualifier(&self) -> Option<&str> {
        match (&self.alias, &self.source) {
            (Some(alias), _) => Some(alias),
            (None, TableSource::Named(name)) => Some(name),
            (None, TableSource::Subquery(_)) => None,
        }
    }

    pub fn to_tokens_for_dialect(&self, dialect: Dialect) -> TokenStream {
        let mut ts = TokenStream::new();
        match &self.source {
            TableSource::Named(name) => {
                ts.push(Token::Ident(name.clone()));
            }
            TableSource::Subquery(query) => {
                ts.lparen()
                    .newline()
                    .append(&query.to_tokens_for_dialect(dialect))
                    .newline()
                    .rparen();
            }
        }
        if let Some(alias) = &self.alias {
            ts.alias(alias);
        }
        ts
    }
}

/// A `LEFT JOIN ... ON ...` clause.
///
/// Related rows are optional, so every join the compiler emits is a left join.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub table: TableRef,
    pub on: Expr,
}

impl Join {
    pub fn left(table: TableRef, on: Expr) -> Self {
        Self { table, on }
    }

    pub fn to_tokens_for_dialect(&self, dialect: Dialect) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.push(Token::Left)
            .space()
            .push(Token::Join)
            .space()
            .append(&self.table.to_tokens_for_dialect(dialect))
            .space()
            .push(Token::On)
            .space()
            .append(&self.on.to_tokens_for_dialect(dialect));
        ts
    }
}

/// A SELECT query.
#[derive(Debug, Clone, Default, PartialEq)]
#[must_use = "Query has no effect until rendered with to_sql()"]
pub struct Query {
    pub select: Vec<SelectExpr>,
    pub from: Option<TableRef>,
    pub joins: Vec<Join>,
    pub where_clause: Option<Expr>,
    pub group_by: Vec<Expr>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the SELECT list.
    pub fn select(mut self, exprs: Vec<impl Into<SelectExpr>>) -> Self {
        self.select = exprs.into_iter().map(Into::into).collect();
        self
    }

    /// `SELECT qualifier.*`
    pub fn select_all_from(mut self, qualifier: &str) -> Self {
        self.select = vec![SelectExpr::new(Expr::Star {
            table: Some(qualifier.into()),
        })];
        self
    }

    pub fn from(mut self, table: TableRef) -> Self {
        self.from = Some(table);
        self
    }

    pub fn left_join(mut self, table: TableRef, on: Expr) -> Self {
        self.joins.push(Join::left(table, on));
        self
    }

    /// Add a WHERE condition, ANDed onto any existing one.
    pub fn filter(mut self, condition: Expr) -> Self {
        self.where_clause = Some(match self.where_clause.take() {
            Some(existing) => existing.and(condition),
            None => condition,
        });
        self
    }

    /// Replace the GROUP BY list.
    pub fn group_by(mut self, exprs: Vec<Expr>) -> Self {
        self.group_by = exprs;
        self
    }

    pub fn add_select(&mut self, expr: impl Into<SelectExpr>) -> &mut Self {
        self.select.push(expr.into());
        self
    }

    pub fn add_join(&mut self, join: Join) -> &mut Self {
        self.joins.push(join);
        self
    }

    /// Append a GROUP BY expression unless it is already there.
    pub fn add_group_by(&mut self, expr: Expr) -> &mut Self {
        if !self.group_by.contains(&expr) {
            self.group_by.push(expr);
        }
        self
    }

    pub fn to_tokens_for_dialect(&self, dialect: Dialect) -> TokenStream {
        let mut ts = TokenStream::new();

        ts.push(Token::Select);
        for (i, item) in self.select.iter().enumerate() {
            if i > 0 {
                ts.comma();
            }
            ts.newline()
                .indent(1)
                .append(&item.to_tokens_for_dialect(dialect));
        }

        if let Some(from) = &self.from {
            ts.newline()
                .push(Token::From)
                .space()
                .append(&from.to_tokens_for_dialect(dialect));
        }

        for join in &self.joins {
            ts.newline().append(&join.to_tokens_for_dialect(dialect));
        }

        if let Some(condition) = &self.where_clause {
            ts.newline()
                .push(Token::Where)
                .space()
                .append(&condition.to_tokens_for_dialect(dialect));
        }

        if !self.group_by.is_empty() {
            ts.newline()
                .push(Token::GroupBy)
                .space()
                .comma_separated(&self.group_by, |e| e.to_tokens_for_dialect(dialect));
        }

        ts
    }

    pub fn to_sql(&self, dialect: Dialect) -> String {
        self.to_tokens_for_dialect(dialect).serialize(dialect)
    }
}

impl fmt::Display for Query {
    /// Renders for SQLite; use [`Query::to_sql`] for other engines.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql(Dialect::default()))
    }
}
