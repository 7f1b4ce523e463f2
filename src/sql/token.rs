//! Lexical units of emitted SQL.
//!
//! Every fragment the compiler produces is lowered to a flat token stream
//! first; only serialization looks at the dialect.

use super::dialect::{Dialect, SqlDialect};

/// One piece of SQL output.
///
/// The set is closed over what field compilation emits, so an unhandled
/// variant is a compile error in [`Token::serialize`].
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Keywords
    Select,
    From,
    Where,
    And,
    As,
    Left,
    Join,
    On,
    GroupBy,

    // Punctuation
    Comma,
    Dot,
    Star,
    LParen,
    RParen,

    // Comparison
    Eq,
    Gt,

    // Layout
    Space,
    Newline,
    Indent(usize),

    /// Table, column or alias name. Always quoted.
    Ident(String),
    LitInt(i64),
    LitString(String),
    LitNull,
    /// Function name, remapped per dialect on serialization
    /// (`JSON_GROUP_ARRAY` becomes `JSON_AGG` on PostgreSQL).
    FunctionName(String),
}

impl Token {
    /// Render this token for `dialect`.
    pub fn serialize(&self, dialect: Dialect) -> String {
        match self {
            Token::Select => "SELECT".into(),
            Token::From => "FROM".into(),
            Token::Where => "WHERE".into(),
            Token::And => "AND".into(),
            Token::As => "AS".into(),
            Token::Left => "LEFT".into(),
            Token::Join => "JOIN".into(),
            Token::On => "ON".into(),
            Token::GroupBy => "GROUP BY".into(),

            Token::Comma => ",".into(),
            Token::Dot => ".".into(),
            Token::Star => "*".into(),
            Token::LParen => "(".into(),
            Token::RParen => ")".into(),

            Token::Eq => "=".into(),
            Token::Gt => ">".into(),

            Token::Space => " ".into(),
            Token::Newline => "\n".into(),
            Token::Indent(depth) => "  ".repeat(*depth),

            Token::Ident(name) => dialect.quote_identifier(name),
            Token::LitInt(n) => n.to_string(),
            Token::LitString(s) => dialect.quote_string(s),
            Token::LitNull => "NULL".into(),

            Token::FunctionName(name) => dialect
                .remap_function(name)
                .map(str::to_string)
                .unwrap_or_else(|| name.to_uppercase()),
        }
    }
}

/// An ordered run of tokens.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, token: Token) -> &mut Self {
        self.tokens.push(token);
        self
    }

    pub fn append(&mut self, other: &TokenStream) -> &mut Self {
        self.tokens.extend_from_slice(&other.tokens);
        self
    }

    /// Push `items` separated by `, `, rendering each with `render`.
    pub fn comma_separated<T>(
        &mut self,
        items: &[T],
        mut render: impl FnMut(&T) -> TokenStream,
    ) -> &mut Self {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.comma().space();
            }
            self.append(&render(item));
        }
        self
    }

    pub fn serialize(&self, dialect: Dialect) -> String {
        self.tokens.iter().map(|t| t.serialize(dialect)).collect()
    }

    pub fn space(&mut self) -> &mut Self {
        self.push(Token::Space)
    }

    pub fn newline(&mut self) -> &mut Self {
        self.push(Token::Newline)
    }

    pub fn indent(&mut self, depth: usize) -> &mut Self {
        self.push(Token::Indent(depth))
    }

    pub fn comma(&mut self) -> &mut Self {
        self.push(Token::Comma)
    }

    pub fn lparen(&mut self) -> &mut Self {
        self.push(Token::LParen)
    }

    pub fn rparen(&mut self) -> &mut Self {
        self.push(Token::RParen)
    }

    /// ` AS "alias"`
    pub fn alias(&mut self, alias: &str) -> &mut Self {
        self.space()
            .push(Token::As)
            .space()
            .push(Token::Ident(alias.to_string()))
    }
}
