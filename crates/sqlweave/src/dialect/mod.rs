//! Backend formatting rules.
//!
//! A [`Dialect`] is an immutable value: a name, a placeholder generator, the
//! identifier/alias quote character, a reserved-word table and a map of
//! operator overrides plus an optional cast override. Two dialects ship by
//! default, [`Dialect::postgres`] (numbered `$n` placeholders) and
//! [`Dialect::mysql`] (repeated `?`). Custom dialects start from either one via
//! [`Dialect::builder`].
//!
//! # Example
//!
//! ```ignore
//! use sqlweave::Dialect;
//!
//! let sqlite_like = Dialect::builder(Dialect::mysql())
//!     .name("sqlite")
//!     .quote('"')
//!     .build();
//! ```

mod mysql;

#[cfg(test)]
mod tests;

use crate::error::SqlResult;
use crate::expr::FamilyKind;
use crate::ident::{MYSQL_RESERVED, POSTGRES_RESERVED};
use crate::sql::{Operand, SerializeOptions, SqlBuilder};
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

/// Renders the placeholder for the 1-based argument index.
pub type PlaceholderFn = fn(usize) -> Cow<'static, str>;

/// Replaces default emission of a binary/prefix operator.
///
/// Receives the operands in source order and the options of the call site
/// (notably `no_wrap`).
pub type OperatorFn = fn(&mut SqlBuilder<'_>, &[Operand<'_>], SerializeOptions) -> SqlResult<()>;

/// Replaces default `expr::type` cast emission.
pub type CastFn = fn(&mut SqlBuilder<'_>, Operand<'_>, &str) -> SqlResult<()>;

/// Names the SQL type a family casts to.
pub type CastTypeFn = fn(FamilyKind) -> &'static str;

/// Per-backend formatting configuration.
#[derive(Clone)]
pub struct Dialect {
    name: Cow<'static, str>,
    placeholder: PlaceholderFn,
    quote: char,
    reserved: &'static [&'static str],
    operators: HashMap<&'static str, OperatorFn>,
    cast: Option<CastFn>,
    cast_type: CastTypeFn,
}

fn numbered_placeholder(index: usize) -> Cow<'static, str> {
    Cow::Owned(format!("${index}"))
}

fn question_placeholder(_index: usize) -> Cow<'static, str> {
    Cow::Borrowed("?")
}

impl Dialect {
    /// PostgreSQL: `$1, $2, ...` placeholders, `"` quoting, default emission.
    pub fn postgres() -> &'static Dialect {
        static POSTGRES: OnceLock<Dialect> = OnceLock::new();
        POSTGRES.get_or_init(|| Dialect {
            name: Cow::Borrowed("postgres"),
            placeholder: numbered_placeholder,
            quote: '"',
            reserved: POSTGRES_RESERVED,
            operators: HashMap::new(),
            cast: None,
            cast_type: FamilyKind::sql_type,
        })
    }

    /// MySQL: `?` placeholders, backtick quoting, operator and cast overrides.
    pub fn mysql() -> &'static Dialect {
        static MYSQL: OnceLock<Dialect> = OnceLock::new();
        MYSQL.get_or_init(|| Dialect {
            name: Cow::Borrowed("mysql"),
            placeholder: question_placeholder,
            quote: '`',
            reserved: MYSQL_RESERVED,
            operators: mysql::operators(),
            cast: Some(mysql::cast),
            cast_type: mysql::cast_type,
        })
    }

    /// Start a custom dialect from an existing one.
    pub fn builder(base: &Dialect) -> DialectBuilder {
        DialectBuilder {
            dialect: base.clone(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Placeholder for the 1-based argument index.
    pub fn placeholder(&self, index: usize) -> Cow<'static, str> {
        (self.placeholder)(index)
    }

    /// Identifier and alias quote character.
    pub fn quote(&self) -> char {
        self.quote
    }

    /// Whether `word` (already lower-case) is reserved in this dialect.
    pub fn is_reserved(&self, word: &str) -> bool {
        self.reserved.contains(&word)
    }

    pub(crate) fn reserved(&self) -> &'static [&'static str] {
        self.reserved
    }

    /// Override registered for `operator`, if any.
    pub fn operator_override(&self, operator: &str) -> Option<OperatorFn> {
        self.operators.get(operator).copied()
    }

    pub fn cast_override(&self) -> Option<CastFn> {
        self.cast
    }

    /// Type written by `cast(..).as_family()` for `family`.
    pub fn cast_type(&self, family: FamilyKind) -> &'static str {
        (self.cast_type)(family)
    }
}

impl fmt::Debug for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ops: Vec<_> = self.operators.keys().copied().collect();
        ops.sort_unstable();
        f.debug_struct("Dialect")
            .field("name", &self.name)
            .field("quote", &self.quote)
            .field("operator_overrides", &ops)
            .field("cast_override", &self.cast.is_some())
            .finish()
    }
}

/// Dialects are equal when every formatting rule matches.
impl PartialEq for Dialect {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && std::ptr::fn_addr_eq(self.placeholder, other.placeholder)
            && self.quote == other.quote
            && self.reserved == other.reserved
            && std::ptr::fn_addr_eq(self.cast_type, other.cast_type)
            && match (self.cast, other.cast) {
                (Some(a), Some(b)) => std::ptr::fn_addr_eq(a, b),
                (a, b) => a.is_none() && b.is_none(),
            }
            && self.operators.len() == other.operators.len()
            && self.operators.iter().all(|(operator, f)| {
                other
                    .operators
                    .get(operator)
                    .is_some_and(|g| std::ptr::fn_addr_eq(*f, *g))
            })
    }
}

/// Builder for a custom [`Dialect`].
#[must_use]
pub struct DialectBuilder {
    dialect: Dialect,
}

impl DialectBuilder {
    pub fn name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.dialect.name = name.into();
        self
    }

    pub fn placeholder(mut self, placeholder: PlaceholderFn) -> Self {
        self.dialect.placeholder = placeholder;
        self
    }

    pub fn quote(mut self, quote: char) -> Self {
        self.dialect.quote = quote;
        self
    }

    pub fn reserved(mut self, words: &'static [&'static str]) -> Self {
        self.dialect.reserved = words;
        self
    }

    /// Register (or replace) an operator override.
    pub fn operator(mut self, operator: &'static str, f: OperatorFn) -> Self {
        self.dialect.operators.insert(operator, f);
        self
    }

    /// Drop an inherited operator override.
    pub fn without_operator(mut self, operator: &str) -> Self {
        self.dialect.operators.remove(operator);
        self
    }

    pub fn cast(mut self, f: Option<CastFn>) -> Self {
        self.dialect.cast = f;
        self
    }

    /// Replace the family-to-type mapping used by `cast(..).as_family()`.
    pub fn cast_type(mut self, f: CastTypeFn) -> Self {
        self.dialect.cast_type = f;
        self
    }

    pub fn build(self) -> Dialect {
        self.dialect
    }
}
