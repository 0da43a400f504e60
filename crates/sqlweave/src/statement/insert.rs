use super::{SqlStatement, Statement, and_condition, clause, returning_clause, write_assignments};
use crate::column::{
    AnyColumn, Assignment, IntoAssignments, IntoColumnList, IntoProjections, Projection,
};
use crate::error::{SqlError, SqlResult};
use crate::expr::{Bool, IntoExpr, IntoExprList, Node};
use crate::hydrate::Model;
use crate::sql::{SerializeOptions, SqlBuilder, StatementKind};
use crate::table::Table;
use crate::value::Value;
use std::sync::Arc;

#[derive(Debug, Clone)]
enum ConflictAction {
    Nothing,
    Update {
        set: Vec<Assignment>,
        where_: Option<Arc<Node>>,
    },
}

/// `ON CONFLICT` clause of a Postgres INSERT.
#[derive(Debug, Clone)]
pub struct OnConflict {
    insert: InsertStatement,
    target: Vec<AnyColumn>,
    constraint: Option<String>,
}

impl OnConflict {
    /// Target a named constraint instead of a column list.
    pub fn on_constraint(mut self, name: impl Into<String>) -> Self {
        self.constraint = Some(name.into());
        self
    }

    /// `DO NOTHING`
    pub fn do_nothing(self) -> InsertStatement {
        self.finish(ConflictAction::Nothing)
    }

    /// `DO UPDATE SET ...`
    pub fn do_update(self, set: impl IntoAssignments) -> InsertStatement {
        self.finish(ConflictAction::Update {
            set: set.into_assignments(),
            where_: None,
        })
    }

    /// `DO UPDATE SET ... WHERE cond`
    pub fn do_update_where(
        self,
        set: impl IntoAssignments,
        cond: impl IntoExpr<Bool>,
    ) -> InsertStatement {
        self.finish(ConflictAction::Update {
            set: set.into_assignments(),
            where_: and_condition(None, cond),
        })
    }

    fn finish(self, action: ConflictAction) -> InsertStatement {
        let mut insert = self.insert;
        insert.on_conflict = Some(Conflict {
            target: self.target,
            constraint: self.constraint,
            action,
        });
        insert
    }
}

#[derive(Debug, Clone)]
struct Conflict {
    target: Vec<AnyColumn>,
    constraint: Option<String>,
    action: ConflictAction,
}

/// Continuation rows line up under the first one.
const VALUES_INDENT: usize = "VALUES ".len();

#[derive(Debug, Clone)]
enum Row {
    Exprs(Vec<Arc<Node>>),
    /// Field values of a model, matched to the column list by name.
    Model(Vec<(&'static str, Value)>),
}

/// INSERT statement builder.
#[derive(Debug, Clone)]
pub struct InsertStatement {
    table: Table,
    columns: Vec<AnyColumn>,
    rows: Vec<Row>,
    query: Option<Arc<Statement>>,
    on_conflict: Option<Conflict>,
    on_duplicate_key: Vec<Assignment>,
    returning: Vec<Projection>,
}

impl InsertStatement {
    pub(crate) fn new(table: Table, columns: Vec<AnyColumn>) -> Self {
        InsertStatement {
            table,
            columns,
            rows: Vec::new(),
            query: None,
            on_conflict: None,
            on_duplicate_key: Vec::new(),
            returning: Vec::new(),
        }
    }

    /// Append one row of values, in column order.
    pub fn values(mut self, row: impl IntoExprList) -> Self {
        self.rows.push(Row::Exprs(
            row.into_expr_list().into_iter().map(|e| e.0).collect(),
        ));
        self
    }

    /// Append a row taken from a model's fields.
    pub fn model<M: Model>(mut self, model: &M) -> Self {
        self.rows.push(Row::Model(model.column_values()));
        self
    }

    /// Append one row per model.
    pub fn models<'a, M: Model + 'a>(mut self, models: impl IntoIterator<Item = &'a M>) -> Self {
        self.rows
            .extend(models.into_iter().map(|m| Row::Model(m.column_values())));
        self
    }

    /// `INSERT ... SELECT ...`
    pub fn query(mut self, statement: impl Into<Statement>) -> Self {
        self.query = Some(Arc::new(statement.into()));
        self
    }

    /// Start an `ON CONFLICT (columns)` clause (Postgres).
    pub fn on_conflict(self, target: impl IntoColumnList) -> OnConflict {
        OnConflict {
            insert: self,
            target: target.into_column_list(),
            constraint: None,
        }
    }

    /// `ON DUPLICATE KEY UPDATE ...` (MySQL).
    pub fn on_duplicate_key_update(mut self, set: impl IntoAssignments) -> Self {
        self.on_duplicate_key.extend(set.into_assignments());
        self
    }

    pub fn returning(mut self, projections: impl IntoProjections) -> Self {
        self.returning.extend(projections.into_projections());
        self
    }

    fn write_rows(&self, out: &mut SqlBuilder<'_>, kind: StatementKind) -> SqlResult<()> {
        out.new_line();
        out.write("VALUES");
        out.increase_indent_by(VALUES_INDENT);
        let result = self.write_row_list(out, kind);
        out.decrease_indent_by(VALUES_INDENT);
        result
    }

    fn write_row_list(&self, out: &mut SqlBuilder<'_>, kind: StatementKind) -> SqlResult<()> {
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                out.write(",");
                out.new_line();
            }
            out.write("(");
            match row {
                Row::Exprs(cells) => {
                    if !self.columns.is_empty() && cells.len() != self.columns.len() {
                        return Err(SqlError::serialize(
                            "INSERT",
                            format!(
                                "row {} has {} values for {} columns",
                                i + 1,
                                cells.len(),
                                self.columns.len()
                            ),
                        ));
                    }
                    crate::expr::serialize_list(cells, kind, out)?;
                }
                Row::Model(fields) => self.write_model_row(out, fields)?,
            }
            out.write(")");
        }
        Ok(())
    }

    fn write_model_row(
        &self,
        out: &mut SqlBuilder<'_>,
        fields: &[(&'static str, Value)],
    ) -> SqlResult<()> {
        if self.columns.is_empty() {
            return Err(SqlError::serialize(
                "INSERT",
                "model rows require an explicit column list",
            ));
        }
        for (i, column) in self.columns.iter().enumerate() {
            let value = fields
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(column.name()))
                .map(|(_, value)| value.clone())
                .ok_or_else(|| {
                    SqlError::serialize(
                        "INSERT",
                        format!("model has no field for column {:?}", column.name()),
                    )
                })?;
            if i > 0 {
                out.write(", ");
            }
            out.bind(value);
        }
        Ok(())
    }
}

impl SqlStatement for InsertStatement {
    fn kind(&self) -> StatementKind {
        StatementKind::Insert
    }

    fn projections(&self) -> &[Projection] {
        &self.returning
    }

    fn write_sql(&self, out: &mut SqlBuilder<'_>) -> SqlResult<()> {
        let kind = StatementKind::Insert;
        let has_values = self.rows.iter().any(|r| matches!(r, Row::Exprs(_)));
        let has_models = self.rows.iter().any(|r| matches!(r, Row::Model(_)));
        let sources = [has_values, has_models, self.query.is_some()]
            .iter()
            .filter(|s| **s)
            .count();
        match sources {
            0 => {
                return Err(SqlError::serialize(
                    "INSERT",
                    "no rows to insert and no source query",
                ));
            }
            1 => {}
            _ => {
                return Err(SqlError::serialize(
                    "INSERT",
                    "VALUES rows, model rows and a source query are mutually exclusive",
                ));
            }
        }

        out.new_line();
        out.write("INSERT INTO");
        self.table.serialize(out)?;
        if !self.columns.is_empty() {
            out.write("(");
            for (i, column) in self.columns.iter().enumerate() {
                if i > 0 {
                    out.write(", ");
                }
                column.0.serialize_name(out)?;
            }
            out.write(")");
        }

        match &self.query {
            Some(query) => query.write_sql(out)?,
            None => self.write_rows(out, kind)?,
        }

        if let Some(conflict) = &self.on_conflict {
            write_conflict(out, kind, conflict)?;
        }
        if !self.on_duplicate_key.is_empty() {
            out.new_line();
            out.write("ON DUPLICATE KEY UPDATE");
            out.indented(|out| write_assignments(out, kind, &self.on_duplicate_key))?;
        }
        returning_clause(out, kind, &self.returning)
    }
}

fn write_conflict(out: &mut SqlBuilder<'_>, kind: StatementKind, conflict: &Conflict) -> SqlResult<()> {
    out.new_line();
    out.write("ON CONFLICT");
    if let Some(constraint) = &conflict.constraint {
        out.write("ON CONSTRAINT");
        out.write_identifier(constraint)?;
    } else if !conflict.target.is_empty() {
        out.write("(");
        for (i, column) in conflict.target.iter().enumerate() {
            if i > 0 {
                out.write(", ");
            }
            column.0.serialize_name(out)?;
        }
        out.write(")");
    }

    match &conflict.action {
        ConflictAction::Nothing => {
            out.write("DO NOTHING");
            Ok(())
        }
        ConflictAction::Update { set, where_ } => {
            if conflict.target.is_empty() && conflict.constraint.is_none() {
                return Err(SqlError::serialize(
                    "ON CONFLICT",
                    "DO UPDATE requires a conflict target",
                ));
            }
            if set.is_empty() {
                return Err(SqlError::serialize("ON CONFLICT", "DO UPDATE SET list is empty"));
            }
            out.write("DO UPDATE");
            out.indented(|out| {
                clause(out, "SET", |out| write_assignments(out, kind, set))?;
                if let Some(cond) = where_ {
                    clause(out, "WHERE", |out| {
                        cond.serialize(kind, out, SerializeOptions::NO_WRAP)
                    })?;
                }
                Ok(())
            })
        }
    }
}
