//! The serializer.
//!
//! [`SqlBuilder`] is the sink every node and statement writes into. It owns
//! whitespace normalization, indentation, quoting and argument binding, and
//! finishes into a [`BuiltSql`]: the SQL text (terminated by `;\n`) plus the
//! positional argument list.
//!
//! # Example
//!
//! ```ignore
//! use sqlweave::{Dialect, SqlStatement};
//!
//! let built = stmt.build(Dialect::postgres())?;
//! client.query(&built.sql, &built.args).await?;
//! ```

mod builder;
mod built;

#[cfg(test)]
mod tests;

pub use builder::{INDENT_STEP, Operand, Position, SerializeOptions, SqlBuilder, StatementKind};
pub use built::BuiltSql;
