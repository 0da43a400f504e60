use super::select::limit_offset;
use super::{SqlStatement, Statement, order_by_clause};
use crate::column::{IntoOrderByList, OrderBy, Projection};
use crate::error::{SqlError, SqlResult};
use crate::expr::Node;
use crate::sql::{SqlBuilder, StatementKind};
use crate::table::DerivedTable;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOperator {
    Union,
    Intersect,
    Except,
}

impl SetOperator {
    fn keyword(self, all: bool) -> &'static str {
        match (self, all) {
            (SetOperator::Union, false) => "UNION",
            (SetOperator::Union, true) => "UNION ALL",
            (SetOperator::Intersect, false) => "INTERSECT",
            (SetOperator::Intersect, true) => "INTERSECT ALL",
            (SetOperator::Except, false) => "EXCEPT",
            (SetOperator::Except, true) => "EXCEPT ALL",
        }
    }
}

/// UNION / INTERSECT / EXCEPT over two or more statements.
///
/// Each branch is written in parentheses. ORDER BY items refer to the
/// branches' projection aliases.
#[derive(Debug, Clone)]
pub struct SetStatement {
    operator: SetOperator,
    all: bool,
    branches: Vec<Statement>,
    order_by: Vec<OrderBy>,
    limit: Option<Arc<Node>>,
    offset: Option<Arc<Node>>,
}

impl SetStatement {
    /// Combine `branches` with `operator`; fewer than two fails at build time.
    pub fn new(operator: SetOperator, all: bool, branches: Vec<Statement>) -> Self {
        SetStatement {
            operator,
            all,
            branches,
            order_by: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    fn chain(mut self, operator: SetOperator, all: bool, other: Statement) -> SetStatement {
        let plain = self.order_by.is_empty() && self.limit.is_none() && self.offset.is_none();
        if plain && self.operator == operator && self.all == all {
            self.branches.push(other);
            self
        } else {
            SetStatement::new(operator, all, vec![Statement::SetOperation(self), other])
        }
    }

    pub fn union(self, other: impl Into<Statement>) -> SetStatement {
        self.chain(SetOperator::Union, false, other.into())
    }

    pub fn union_all(self, other: impl Into<Statement>) -> SetStatement {
        self.chain(SetOperator::Union, true, other.into())
    }

    pub fn intersect(self, other: impl Into<Statement>) -> SetStatement {
        self.chain(SetOperator::Intersect, false, other.into())
    }

    pub fn intersect_all(self, other: impl Into<Statement>) -> SetStatement {
        self.chain(SetOperator::Intersect, true, other.into())
    }

    pub fn except(self, other: impl Into<Statement>) -> SetStatement {
        self.chain(SetOperator::Except, false, other.into())
    }

    pub fn except_all(self, other: impl Into<Statement>) -> SetStatement {
        self.chain(SetOperator::Except, true, other.into())
    }

    pub fn order_by(mut self, items: impl IntoOrderByList) -> Self {
        self.order_by.extend(items.into_order_by_list());
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(Arc::new(Node::literal(limit)));
        self
    }

    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = Some(Arc::new(Node::literal(offset)));
        self
    }

    pub fn as_table(self, alias: &str) -> DerivedTable {
        DerivedTable::new(Statement::SetOperation(self), alias)
    }
}

impl SqlStatement for SetStatement {
    fn kind(&self) -> StatementKind {
        StatementKind::SetOperation
    }

    fn projections(&self) -> &[Projection] {
        self.branches
            .first()
            .map(|b| b.projections())
            .unwrap_or_default()
    }

    fn write_sql(&self, out: &mut SqlBuilder<'_>) -> SqlResult<()> {
        let keyword = self.operator.keyword(self.all);
        if self.branches.len() < 2 {
            return Err(SqlError::serialize(
                keyword,
                format!(
                    "at least two statements are required, got {}",
                    self.branches.len()
                ),
            ));
        }

        let kind = StatementKind::SetOperation;
        let wrap = !self.order_by.is_empty() || self.limit.is_some() || self.offset.is_some();
        if wrap {
            out.new_line();
            out.write("(");
            out.increase_indent();
        }
        for (i, branch) in self.branches.iter().enumerate() {
            if i > 0 {
                out.new_line();
                out.write(keyword);
            }
            out.new_line();
            branch.serialize_nested(out)?;
        }
        if wrap {
            out.decrease_indent();
            out.new_line();
            out.write(")");
        }

        order_by_clause(out, kind, &self.order_by)?;
        limit_offset(out, kind, &self.limit, &self.offset)
    }
}
