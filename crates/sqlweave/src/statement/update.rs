use super::{
    SqlStatement, and_condition, clause, condition_clause, order_by_clause, returning_clause,
    write_assignments,
};
use crate::column::{
    AnyColumn, Assignment, IntoAssignments, IntoColumnList, IntoOrderByList, IntoProjections,
    OrderBy, Projection,
};
use crate::error::{SqlError, SqlResult};
use crate::expr::{Bool, IntoExpr, Node};
use crate::hydrate::Model;
use crate::sql::{SqlBuilder, StatementKind};
use crate::table::{Table, TableSource};
use crate::value::Value;
use std::sync::Arc;

/// Continuation lines of SET line up under the first assignment.
const SET_INDENT: usize = "SET ".len();

/// UPDATE statement builder.
///
/// A WHERE condition is mandatory; updating every row needs an explicit
/// `where_(lit::constant_bool(true))`.
#[derive(Debug, Clone)]
pub struct UpdateStatement {
    table: Table,
    set: Vec<Assignment>,
    model: Option<(Vec<AnyColumn>, Vec<(&'static str, Value)>)>,
    from: Option<TableSource>,
    where_: Option<Arc<Node>>,
    order_by: Vec<OrderBy>,
    limit: Option<i64>,
    returning: Vec<Projection>,
}

impl UpdateStatement {
    pub(crate) fn new(table: Table) -> Self {
        UpdateStatement {
            table,
            set: Vec::new(),
            model: None,
            from: None,
            where_: None,
            order_by: Vec::new(),
            limit: None,
            returning: Vec::new(),
        }
    }

    /// Add `column = value` assignments.
    pub fn set(mut self, assignments: impl IntoAssignments) -> Self {
        self.set.extend(assignments.into_assignments());
        self
    }

    /// Assign `columns` from the model's fields of the same name.
    pub fn set_model<M: Model>(mut self, columns: impl IntoColumnList, model: &M) -> Self {
        self.model = Some((columns.into_column_list(), model.column_values()));
        self
    }

    /// `UPDATE ... FROM source` (Postgres).
    pub fn from(mut self, source: impl Into<TableSource>) -> Self {
        self.from = Some(source.into());
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

    fn assignments(&self) -> SqlResult<Vec<Assignment>> {
        let mut all = self.set.clone();
        if let Some((columns, fields)) = &self.model {
            for column in columns {
                let value = fields
                    .iter()
                    .find(|(name, _)| name.eq_ignore_ascii_case(column.name()))
                    .map(|(_, value)| value.clone())
                    .ok_or_else(|| {
                        SqlError::serialize(
                            "UPDATE",
                            format!("model has no field for column {:?}", column.name()),
                        )
                    })?;
                all.push(Assignment::new(
                    column.0.clone(),
                    Arc::new(Node::literal(value)),
                ));
            }
        }
        Ok(all)
    }
}

impl SqlStatement for UpdateStatement {
    fn kind(&self) -> StatementKind {
        StatementKind::Update
    }

    fn projections(&self) -> &[Projection] {
        &self.returning
    }

    fn write_sql(&self, out: &mut SqlBuilder<'_>) -> SqlResult<()> {
        let kind = StatementKind::Update;
        let assignments = self.assignments()?;
        if assignments.is_empty() {
            return Err(SqlError::serialize("UPDATE", "no columns to SET"));
        }
        if self.where_.is_none() {
            return Err(SqlError::serialize("UPDATE", "WHERE clause is required"));
        }

        out.new_line();
        out.write("UPDATE");
        self.table.serialize(out)?;

        out.new_line();
        out.write("SET");
        out.increase_indent_by(SET_INDENT);
        let result = write_assignments(out, kind, &assignments);
        out.decrease_indent_by(SET_INDENT);
        result?;

        if let Some(from) = &self.from {
            clause(out, "FROM", |out| from.serialize(kind, out))?;
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
