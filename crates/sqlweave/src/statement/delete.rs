use super::{
    SqlStatement, and_condition, clause, condition_clause, order_by_clause, returning_clause,
};
use crate::column::{IntoOrderByList, IntoProjections, OrderBy, Projection};
use crate::error::{SqlError, SqlResult};
use crate::expr::{Bool, IntoExpr, Node};
use crate::sql::{SqlBuilder, StatementKind};
use crate::table::{Table, TableSource};
use crate::value::Value;
use std::sync::Arc;

/// DELETE statement builder.
///
/// A WHERE condition is mandatory.
#[derive(Debug, Clone)]
pub struct DeleteStatement {
    table: Table,
    using: Vec<TableSource>,
    where_: Option<Arc<Node>>,
    order_by: Vec<OrderBy>,
    limit: Option<i64>,
    returning: Vec<Projection>,
}

impl DeleteStatement {
    pub(crate) fn new(table: Table) -> Self {
        DeleteStatement {
            table,
            using: Vec::new(),
            where_: None,
            order_by: Vec::new(),
            limit: None,
            returning: Vec::new(),
        }
    }

    /// `DELETE ... USING source` (Postgres).
    pub fn using(mut self, source: impl Into<TableSource>) -> Self {
        self.using.push(source.into());
        self
    }

    /// Add a WHERE condition; repeated calls are ANDed.
    pub fn where_(mut self, cond: impl IntoExpr<Bool>) -> Self {
        self.where_ = and_condition(self.where_.take(), cond);
        self
    }

    /// `ORDER BY` (MySQL).
    pub fn order_by(mut self, items: impl IntoOrderByList) -> Self {
        self.order_by.extend(items.into_order_by_list());
        self
    }

    /// `LIMIT n` (MySQL), written inline.
    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn returning(mut self, projections: impl IntoProjections) -> Self {
        self.returning.extend(projections.into_projections());
        self
    }
}

impl SqlStatement for DeleteStatement {
    fn kind(&self) -> StatementKind {
        StatementKind::Delete
    }

    fn projections(&self) -> &[Projection] {
        &self.returning
    }

    fn write_sql(&self, out: &mut SqlBuilder<'_>) -> SqlResult<()> {
        let kind = StatementKind::Delete;
        if self.where_.is_none() {
            return Err(SqlError::serialize("DELETE", "WHERE clause is required"));
        }

        out.new_line();
        out.write("DELETE FROM");
        self.table.serialize(out)?;

        if !self.using.is_empty() {
            clause(out, "USING", |out| {
                for (i, source) in self.using.iter().enumerate() {
                    if i > 0 {
                        out.write(", ");
                    }
                    source.serialize(kind, out)?;
                }
                Ok(())
            })?;
        }
        condition_clause(out, "WHERE", kind, &self.where_)?;
        order_by_clause(out, kind, &self.order_by)?;
        if let Some(limit) = self.limit {
            clause(out, "LIMIT", |out| {
                out.write_constant(&Value::Int(limit));
                Ok(())
            })?;
        }
        returning_clause(out, kind, &self.returning)
    }
}
