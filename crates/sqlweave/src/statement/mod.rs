//! Statement builders.
//!
//! Each builder is a plain value holding its clauses as fields; methods
//! consume and return the builder. Nothing is validated until the statement
//! is serialized with [`SqlStatement::build`], which is where clause-level
//! errors (missing WHERE on DELETE, empty INSERT, one-branch UNION, ...)
//! surface.
//!
//! # Example
//!
//! ```ignore
//! use sqlweave::prelude::*;
//!
//! let stmt = select((&t.col1, &t.col_float))
//!     .from(&t.table)
//!     .where_(t.col_int.gt_eq(10))
//!     .order_by(t.col_int.desc());
//!
//! let built = stmt.build(Dialect::postgres())?;
//! assert_eq!(built.args.len(), 1);
//! ```

mod delete;
mod insert;
mod lock;
mod select;
mod set_op;
mod update;
mod with;

#[cfg(test)]
mod tests;

pub use delete::DeleteStatement;
pub use insert::{InsertStatement, OnConflict};
pub use lock::{LockMode, LockStatement};
pub use select::{RowLock, SelectStatement, select};
pub use set_op::{SetOperator, SetStatement};
pub use update::UpdateStatement;
pub use with::{WithStatement, with, with_recursive};

use crate::column::Projection;
use crate::dialect::Dialect;
use crate::error::SqlResult;
use crate::expr::{Bool, Expr, IntoExpr, Node};
use crate::sql::{BuiltSql, SqlBuilder, StatementKind};
use std::sync::Arc;

/// Behavior shared by every statement builder.
pub trait SqlStatement {
    /// Kind reported to monitors and used for kind-specific rendering.
    fn kind(&self) -> StatementKind;

    /// Write the statement's clauses at the builder's current indentation.
    ///
    /// Every clause starts on a new line, so the output begins with `\n`.
    fn write_sql(&self, out: &mut SqlBuilder<'_>) -> SqlResult<()>;

    /// Output list, used to rebase columns of derived tables.
    fn projections(&self) -> &[Projection] {
        &[]
    }

    /// Serialize into SQL text plus positional arguments.
    fn build(&self, dialect: &Dialect) -> SqlResult<BuiltSql> {
        let mut out = SqlBuilder::new(dialect);
        self.write_sql(&mut out)?;
        Ok(out.finish())
    }

    /// SQL with every argument inlined as a literal.
    ///
    /// For logs and diagnostics only; never execute the result.
    fn debug_sql(&self, dialect: &Dialect) -> SqlResult<String> {
        let mut out = SqlBuilder::debug(dialect);
        self.write_sql(&mut out)?;
        Ok(out.finish().sql)
    }
}

/// Any statement.
#[derive(Debug, Clone)]
pub enum Statement {
    Select(SelectStatement),
    SetOperation(SetStatement),
    Insert(InsertStatement),
    Update(UpdateStatement),
    Delete(DeleteStatement),
    Lock(LockStatement),
    With(WithStatement),
}

impl Statement {
    /// `(` + indented clauses + newline + `)`.
    pub(crate) fn serialize_nested(&self, out: &mut SqlBuilder<'_>) -> SqlResult<()> {
        out.write("(");
        out.indented(|out| self.write_sql(out))?;
        out.new_line();
        out.write(")");
        Ok(())
    }
}

macro_rules! dispatch {
    ($self:ident, $s:ident => $e:expr) => {
        match $self {
            Statement::Select($s) => $e,
            Statement::SetOperation($s) => $e,
            Statement::Insert($s) => $e,
            Statement::Update($s) => $e,
            Statement::Delete($s) => $e,
            Statement::Lock($s) => $e,
            Statement::With($s) => $e,
        }
    };
}

impl SqlStatement for Statement {
    fn kind(&self) -> StatementKind {
        dispatch!(self, s => s.kind())
    }

    fn write_sql(&self, out: &mut SqlBuilder<'_>) -> SqlResult<()> {
        dispatch!(self, s => s.write_sql(out))
    }

    fn projections(&self) -> &[Projection] {
        dispatch!(self, s => s.projections())
    }
}

macro_rules! statement_from {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Statement {
                fn from(statement: $ty) -> Self {
                    Statement::$variant(statement)
                }
            }
        )*
    };
}

statement_from! {
    Select => SelectStatement,
    SetOperation => SetStatement,
    Insert => InsertStatement,
    Update => UpdateStatement,
    Delete => DeleteStatement,
    Lock => LockStatement,
    With => WithStatement,
}

// ─── Clause helpers ─────────────────────────────────────────────────────────

/// New line, keyword, then `body` one level deeper.
pub(crate) fn clause(
    out: &mut SqlBuilder<'_>,
    keyword: &str,
    body: impl FnOnce(&mut SqlBuilder<'_>) -> SqlResult<()>,
) -> SqlResult<()> {
    out.new_line();
    out.write(keyword);
    out.indented(|out| body(out))
}

/// `WHERE` / `HAVING`: the outermost condition is written without parentheses.
pub(crate) fn condition_clause(
    out: &mut SqlBuilder<'_>,
    keyword: &str,
    kind: StatementKind,
    condition: &Option<Arc<Node>>,
) -> SqlResult<()> {
    match condition {
        Some(cond) => clause(out, keyword, |out| {
            cond.serialize(kind, out, crate::sql::SerializeOptions::NO_WRAP)
        }),
        None => Ok(()),
    }
}

/// AND `cond` onto an existing condition.
pub(crate) fn and_condition(existing: Option<Arc<Node>>, cond: impl IntoExpr<Bool>) -> Option<Arc<Node>> {
    let cond: Expr<Bool> = cond.into_expr();
    Some(match existing {
        Some(prev) => Arc::new(Node::binary(prev, crate::expr::op::AND, cond.node)),
        None => cond.node,
    })
}

/// `RETURNING` list.
pub(crate) fn returning_clause(
    out: &mut SqlBuilder<'_>,
    kind: StatementKind,
    returning: &[Projection],
) -> SqlResult<()> {
    if returning.is_empty() {
        return Ok(());
    }
    clause(out, "RETURNING", |out| {
        crate::column::serialize_projections(returning, kind, out)
    })
}

/// `ORDER BY a, b DESC`
pub(crate) fn order_by_clause(
    out: &mut SqlBuilder<'_>,
    kind: StatementKind,
    order_by: &[crate::column::OrderBy],
) -> SqlResult<()> {
    if order_by.is_empty() {
        return Ok(());
    }
    clause(out, "ORDER BY", |out| {
        for (i, item) in order_by.iter().enumerate() {
            if i > 0 {
                out.write(", ");
            }
            item.serialize(kind, out)?;
        }
        Ok(())
    })
}

/// Comma-separated assignments, one per line.
pub(crate) fn write_assignments(
    out: &mut SqlBuilder<'_>,
    kind: StatementKind,
    assignments: &[crate::column::Assignment],
) -> SqlResult<()> {
    for (i, assignment) in assignments.iter().enumerate() {
        if i > 0 {
            out.write(",");
            out.new_line();
        }
        assignment.serialize(kind, out)?;
    }
    Ok(())
}
