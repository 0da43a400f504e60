use super::{SetOperator, SetStatement, SqlStatement, Statement, and_condition, clause};
use crate::column::{IntoOrderByList, IntoProjections, OrderBy, Projection, serialize_projections};
use crate::error::{SqlError, SqlResult};
use crate::expr::{Bool, Expr, IntoExpr, IntoExprList, Node, serialize_list};
use crate::sql::{Position, SerializeOptions, SqlBuilder, StatementKind};
use crate::table::{DerivedTable, TableSource};
use std::sync::Arc;

/// Row-level lock strength for `SELECT ... FOR ...`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowLock {
    strength: &'static str,
    wait: Option<&'static str>,
}

impl RowLock {
    pub const fn update() -> Self {
        RowLock {
            strength: "UPDATE",
            wait: None,
        }
    }

    pub const fn no_key_update() -> Self {
        RowLock {
            strength: "NO KEY UPDATE",
            wait: None,
        }
    }

    pub const fn share() -> Self {
        RowLock {
            strength: "SHARE",
            wait: None,
        }
    }

    pub const fn key_share() -> Self {
        RowLock {
            strength: "KEY SHARE",
            wait: None,
        }
    }

    /// Fail immediately instead of waiting for the lock.
    pub const fn nowait(mut self) -> Self {
        self.wait = Some("NOWAIT");
        self
    }

    /// Skip rows that cannot be locked immediately.
    pub const fn skip_locked(mut self) -> Self {
        self.wait = Some("SKIP LOCKED");
        self
    }
}

/// SELECT statement builder.
#[derive(Debug, Clone, Default)]
pub struct SelectStatement {
    distinct: bool,
    distinct_on: Vec<Arc<Node>>,
    projections: Vec<Projection>,
    from: Option<TableSource>,
    where_: Option<Arc<Node>>,
    group_by: Vec<Arc<Node>>,
    having: Option<Arc<Node>>,
    order_by: Vec<OrderBy>,
    limit: Option<Arc<Node>>,
    offset: Option<Arc<Node>>,
    lock: Option<RowLock>,
}

/// Start a SELECT with the given output list.
pub fn select(projections: impl IntoProjections) -> SelectStatement {
    SelectStatement {
        projections: projections.into_projections(),
        ..SelectStatement::default()
    }
}

impl SelectStatement {
    /// Append more output columns.
    pub fn columns(mut self, projections: impl IntoProjections) -> Self {
        self.projections.extend(projections.into_projections());
        self
    }

    /// `SELECT DISTINCT`
    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// `SELECT DISTINCT ON (exprs)` (Postgres).
    pub fn distinct_on(mut self, exprs: impl IntoExprList) -> Self {
        self.distinct_on
            .extend(exprs.into_expr_list().into_iter().map(|e| e.0));
        self
    }

    /// Set the FROM source (table, join tree, derived table or CTE).
    pub fn from(mut self, source: impl Into<TableSource>) -> Self {
        self.from = Some(source.into());
        self
    }

    /// Add a WHERE condition; repeated calls are ANDed.
    pub fn where_(mut self, cond: impl IntoExpr<Bool>) -> Self {
        self.where_ = and_condition(self.where_.take(), cond);
        self
    }

    /// Add GROUP BY expressions.
    pub fn group_by(mut self, exprs: impl IntoExprList) -> Self {
        self.group_by
            .extend(exprs.into_expr_list().into_iter().map(|e| e.0));
        self
    }

    /// Add a HAVING condition; repeated calls are ANDed.
    pub fn having(mut self, cond: impl IntoExpr<Bool>) -> Self {
        self.having = and_condition(self.having.take(), cond);
        self
    }

    /// Add ORDER BY items.
    pub fn order_by(mut self, items: impl IntoOrderByList) -> Self {
        self.order_by.extend(items.into_order_by_list());
        self
    }

    /// LIMIT, bound as an argument.
    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(Arc::new(Node::literal(limit)));
        self
    }

    /// OFFSET, bound as an argument.
    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = Some(Arc::new(Node::literal(offset)));
        self
    }

    /// `FOR UPDATE | NO KEY UPDATE | SHARE | KEY SHARE [NOWAIT | SKIP LOCKED]`
    pub fn for_(mut self, lock: RowLock) -> Self {
        self.lock = Some(lock);
        self
    }

    pub fn for_update(self) -> Self {
        self.for_(RowLock::update())
    }

    /// Use as a scalar or row sub-query expression.
    pub fn as_expr<F>(self) -> Expr<F> {
        Expr::from_node(Node::SubQuery(Arc::new(Statement::Select(self))))
    }

    /// Use as a derived table named `alias`.
    pub fn as_table(self, alias: &str) -> DerivedTable {
        DerivedTable::new(Statement::Select(self), alias)
    }

    pub fn union(self, other: impl Into<Statement>) -> SetStatement {
        SetStatement::new(SetOperator::Union, false, vec![self.into(), other.into()])
    }

    pub fn union_all(self, other: impl Into<Statement>) -> SetStatement {
        SetStatement::new(SetOperator::Union, true, vec![self.into(), other.into()])
    }

    pub fn intersect(self, other: impl Into<Statement>) -> SetStatement {
        SetStatement::new(SetOperator::Intersect, false, vec![self.into(), other.into()])
    }

    pub fn intersect_all(self, other: impl Into<Statement>) -> SetStatement {
        SetStatement::new(SetOperator::Intersect, true, vec![self.into(), other.into()])
    }

    pub fn except(self, other: impl Into<Statement>) -> SetStatement {
        SetStatement::new(SetOperator::Except, false, vec![self.into(), other.into()])
    }

    pub fn except_all(self, other: impl Into<Statement>) -> SetStatement {
        SetStatement::new(SetOperator::Except, true, vec![self.into(), other.into()])
    }
}

impl SqlStatement for SelectStatement {
    fn kind(&self) -> StatementKind {
        StatementKind::Select
    }

    fn projections(&self) -> &[Projection] {
        &self.projections
    }

    fn write_sql(&self, out: &mut SqlBuilder<'_>) -> SqlResult<()> {
        let kind = StatementKind::Select;
        if self.projections.is_empty() {
            return Err(SqlError::serialize("SELECT", "projection list is empty"));
        }

        out.new_line();
        out.write("SELECT");
        if self.distinct {
            out.write("DISTINCT");
        }
        if !self.distinct_on.is_empty() {
            out.write("DISTINCT ON (");
            serialize_list(&self.distinct_on, kind, out)?;
            out.write(")");
        }
        out.indented(|out| serialize_projections(&self.projections, kind, out))?;

        if let Some(from) = &self.from {
            clause(out, "FROM", |out| from.serialize(kind, out))?;
        }
        super::condition_clause(out, "WHERE", kind, &self.where_)?;

        if !self.group_by.is_empty() {
            clause(out, "GROUP BY", |out| {
                for (i, item) in self.group_by.iter().enumerate() {
                    if i > 0 {
                        out.write(", ");
                    }
                    item.serialize(kind, out, SerializeOptions::at(Position::GroupBy))?;
                }
                Ok(())
            })?;
        }
        super::condition_clause(out, "HAVING", kind, &self.having)?;
        super::order_by_clause(out, kind, &self.order_by)?;
        limit_offset(out, kind, &self.limit, &self.offset)?;

        if let Some(lock) = &self.lock {
            out.new_line();
            out.write("FOR");
            out.write(lock.strength);
            if let Some(wait) = lock.wait {
                out.write(wait);
            }
        }
        Ok(())
    }
}

/// `LIMIT n` / `OFFSET n`
pub(super) fn limit_offset(
    out: &mut SqlBuilder<'_>,
    kind: StatementKind,
    limit: &Option<Arc<Node>>,
    offset: &Option<Arc<Node>>,
) -> SqlResult<()> {
    if let Some(limit) = limit {
        clause(out, "LIMIT", |out| {
            limit.serialize(kind, out, SerializeOptions::DEFAULT)
        })?;
    }
    if let Some(offset) = offset {
        clause(out, "OFFSET", |out| {
            offset.serialize(kind, out, SerializeOptions::DEFAULT)
        })?;
    }
    Ok(())
}
