//! Table sources: base tables, joins, derived tables and CTE references.

use crate::column::{
    AnyColumn, Column, ColumnList, ColumnRef, IntoColumnList, IntoProjections, Projection,
};
use crate::error::{SqlError, SqlResult};
use crate::expr::{Bool, Expr, Family, FamilyKind, IntoExpr, Node};
use crate::sql::{SerializeOptions, SqlBuilder, StatementKind};
use crate::statement::{
    DeleteStatement, InsertStatement, LockStatement, SelectStatement, SqlStatement, Statement,
    UpdateStatement,
};
use std::sync::Arc;

/// Column metadata of a base table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDesc {
    pub name: Arc<str>,
    pub family: FamilyKind,
}

/// A base table: schema, name, optional alias and its columns.
///
/// # Example
///
/// ```ignore
/// use sqlweave::{FamilyKind, Table};
///
/// let users = Table::new("public", "users")
///     .with_column("id", FamilyKind::Integer)
///     .with_column("name", FamilyKind::Text);
/// let sql = users.select(users.all_columns()).build(Dialect::postgres())?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    schema: Option<Arc<str>>,
    name: Arc<str>,
    alias: Option<Arc<str>>,
    columns: Arc<[ColumnDesc]>,
}

impl Table {
    /// Table `schema.name`; an empty schema leaves the name unqualified.
    pub fn new(schema: &str, name: &str) -> Self {
        Table {
            schema: (!schema.is_empty()).then(|| Arc::from(schema)),
            name: Arc::from(name),
            alias: None,
            columns: Arc::from(Vec::new()),
        }
    }

    pub fn with_column(self, name: &str, family: FamilyKind) -> Self {
        self.with_columns([(name, family)])
    }

    pub fn with_columns<'a>(mut self, columns: impl IntoIterator<Item = (&'a str, FamilyKind)>) -> Self {
        let mut all = self.columns.to_vec();
        all.extend(columns.into_iter().map(|(name, family)| ColumnDesc {
            name: Arc::from(name),
            family,
        }));
        self.columns = Arc::from(all);
        self
    }

    /// Same table under another alias; its columns are qualified by the alias.
    pub fn alias(&self, alias: &str) -> Table {
        Table {
            alias: Some(Arc::from(alias)),
            ..self.clone()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    pub fn alias_name(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn column_descs(&self) -> &[ColumnDesc] {
        &self.columns
    }

    /// Name columns are qualified with.
    fn qualifier(&self) -> Arc<str> {
        self.alias.clone().unwrap_or_else(|| self.name.clone())
    }

    /// Typed column `name` qualified by this table.
    pub fn column<F: Family>(&self, name: &str) -> Column<F> {
        Column::from_ref(ColumnRef::new(name, Some(self.qualifier())))
    }

    /// Every described column, in declaration order.
    pub fn all_columns(&self) -> ColumnList {
        let qualifier = self.qualifier();
        ColumnList(
            self.columns
                .iter()
                .map(|c| AnyColumn(ColumnRef::new(c.name.clone(), Some(qualifier.clone()))))
                .collect(),
        )
    }

    pub fn select(&self, projections: impl IntoProjections) -> SelectStatement {
        crate::statement::select(projections).from(self)
    }

    pub fn insert(&self, columns: impl IntoColumnList) -> InsertStatement {
        InsertStatement::new(self.clone(), columns.into_column_list())
    }

    pub fn update(&self) -> UpdateStatement {
        UpdateStatement::new(self.clone())
    }

    pub fn delete(&self) -> DeleteStatement {
        DeleteStatement::new(self.clone())
    }

    pub fn lock(&self) -> LockStatement {
        LockStatement::new(vec![self.clone()])
    }

    pub(crate) fn serialize(&self, out: &mut SqlBuilder<'_>) -> SqlResult<()> {
        if let Some(schema) = &self.schema {
            out.write_identifier(schema)?;
            out.write(".");
        }
        out.write_identifier(&self.name)?;
        if let Some(alias) = &self.alias {
            out.write("AS");
            out.write_identifier(alias)?;
        }
        Ok(())
    }
}

// ─── Joins ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

impl JoinKind {
    fn keyword(self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
            JoinKind::Full => "FULL JOIN",
            JoinKind::Cross => "CROSS JOIN",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Join {
    lhs: TableSource,
    kind: JoinKind,
    rhs: TableSource,
    on: Option<Arc<Node>>,
}

impl Join {
    fn serialize(&self, kind: StatementKind, out: &mut SqlBuilder<'_>) -> SqlResult<()> {
        self.lhs.serialize(kind, out)?;
        out.new_line();
        out.write(self.kind.keyword());
        self.rhs.serialize(kind, out)?;
        match (&self.on, self.kind) {
            (None, JoinKind::Cross) => Ok(()),
            (Some(_), JoinKind::Cross) => Err(SqlError::serialize(
                "CROSS JOIN",
                "cross join cannot have an ON condition",
            )),
            (None, join) => Err(SqlError::serialize(
                join.keyword(),
                "ON condition is required",
            )),
            (Some(on), _) => {
                out.write("ON");
                on.serialize(kind, out, SerializeOptions::DEFAULT)
            }
        }
    }
}

/// Anything that can follow FROM / USING, or sit on either side of a join.
#[derive(Debug, Clone)]
pub enum TableSource {
    Table(Table),
    Join(Arc<Join>),
    Derived(DerivedTable),
    Cte(CommonTable),
}

impl TableSource {
    pub(crate) fn serialize(&self, kind: StatementKind, out: &mut SqlBuilder<'_>) -> SqlResult<()> {
        match self {
            TableSource::Table(table) => table.serialize(out),
            TableSource::Join(join) => join.serialize(kind, out),
            TableSource::Derived(derived) => derived.serialize(out),
            TableSource::Cte(cte) => out.write_identifier(cte.name()),
        }
    }
}

impl From<Table> for TableSource {
    fn from(table: Table) -> Self {
        TableSource::Table(table)
    }
}

impl From<&Table> for TableSource {
    fn from(table: &Table) -> Self {
        TableSource::Table(table.clone())
    }
}

impl From<DerivedTable> for TableSource {
    fn from(table: DerivedTable) -> Self {
        TableSource::Derived(table)
    }
}

impl From<&DerivedTable> for TableSource {
    fn from(table: &DerivedTable) -> Self {
        TableSource::Derived(table.clone())
    }
}

impl From<CommonTable> for TableSource {
    fn from(table: CommonTable) -> Self {
        TableSource::Cte(table)
    }
}

impl From<&CommonTable> for TableSource {
    fn from(table: &CommonTable) -> Self {
        TableSource::Cte(table.clone())
    }
}

/// Join combinators for every table source.
pub trait Joinable: Into<TableSource> {
    fn inner_join(self, rhs: impl Into<TableSource>, on: impl IntoExpr<Bool>) -> TableSource {
        join(self.into(), JoinKind::Inner, rhs.into(), Some(on.into_expr()))
    }

    fn left_join(self, rhs: impl Into<TableSource>, on: impl IntoExpr<Bool>) -> TableSource {
        join(self.into(), JoinKind::Left, rhs.into(), Some(on.into_expr()))
    }

    fn right_join(self, rhs: impl Into<TableSource>, on: impl IntoExpr<Bool>) -> TableSource {
        join(self.into(), JoinKind::Right, rhs.into(), Some(on.into_expr()))
    }

    fn full_join(self, rhs: impl Into<TableSource>, on: impl IntoExpr<Bool>) -> TableSource {
        join(self.into(), JoinKind::Full, rhs.into(), Some(on.into_expr()))
    }

    fn cross_join(self, rhs: impl Into<TableSource>) -> TableSource {
        join(self.into(), JoinKind::Cross, rhs.into(), None)
    }
}

impl<T: Into<TableSource>> Joinable for T {}

fn join(lhs: TableSource, kind: JoinKind, rhs: TableSource, on: Option<Expr<Bool>>) -> TableSource {
    TableSource::Join(Arc::new(Join {
        lhs,
        kind,
        rhs,
        on: on.map(|e| e.node),
    }))
}

// ─── Derived tables ─────────────────────────────────────────────────────────

/// Something columns can be rebased onto.
pub trait DerivedSource {
    fn alias_arc(&self) -> &Arc<str>;
}

/// A sub-query with an alias, usable as a table.
#[derive(Debug, Clone)]
pub struct DerivedTable {
    statement: Arc<Statement>,
    alias: Arc<str>,
    projections: Vec<Projection>,
}

impl DerivedTable {
    pub(crate) fn new(statement: Statement, alias: &str) -> Self {
        let alias: Arc<str> = Arc::from(alias);
        let projections = statement
            .projections()
            .iter()
            .filter_map(|p| p.rebased(&alias))
            .collect();
        DerivedTable {
            statement: Arc::new(statement),
            alias,
            projections,
        }
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Every exported column, referenced through this table.
    pub fn all_columns(&self) -> Vec<Projection> {
        self.projections.clone()
    }

    /// Exported column by its projection alias (`"table.col"` or the
    /// expression alias).
    pub fn column<F>(&self, exported: &str) -> Option<Column<F>> {
        self.projections
            .iter()
            .flat_map(|p| p.columns())
            .find(|c| c.alias() == exported)
            .map(Column::from_ref)
    }

    fn serialize(&self, out: &mut SqlBuilder<'_>) -> SqlResult<()> {
        self.statement.serialize_nested(out)?;
        out.write("AS");
        out.write_identifier(&self.alias)
    }
}

impl DerivedSource for DerivedTable {
    fn alias_arc(&self) -> &Arc<str> {
        &self.alias
    }
}

/// Reference to a common table expression by name.
///
/// Define its body with [`CommonTable::as_`] inside a WITH statement; columns
/// are rebased onto it with `column.via(&cte)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommonTable {
    name: Arc<str>,
    columns: Vec<Arc<str>>,
}

/// CTE named `name`.
pub fn cte(name: &str) -> CommonTable {
    CommonTable {
        name: Arc::from(name),
        columns: Vec::new(),
    }
}

impl CommonTable {
    /// Explicit column names: `name(a, b) AS (...)`.
    pub fn columns<'a>(mut self, names: impl IntoIterator<Item = &'a str>) -> Self {
        self.columns = names.into_iter().map(Arc::from).collect();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Column `name` of this CTE, referenced as `cte."name"`.
    pub fn column<F>(&self, name: &str) -> Column<F> {
        Column::from_ref(ColumnRef::exported(&self.name, name))
    }

    /// Attach the defining statement.
    pub fn as_(&self, statement: impl Into<Statement>) -> CteDefinition {
        CteDefinition {
            table: self.clone(),
            statement: Arc::new(statement.into()),
        }
    }

    pub(crate) fn serialize_head(&self, out: &mut SqlBuilder<'_>) -> SqlResult<()> {
        out.write_identifier(&self.name)?;
        if !self.columns.is_empty() {
            out.write("(");
            for (i, column) in self.columns.iter().enumerate() {
                if i > 0 {
                    out.write(", ");
                }
                out.write_identifier(column)?;
            }
            out.write(")");
        }
        Ok(())
    }
}

impl DerivedSource for CommonTable {
    fn alias_arc(&self) -> &Arc<str> {
        &self.name
    }
}

/// `name AS (statement)` inside a WITH clause.
#[derive(Debug, Clone)]
pub struct CteDefinition {
    pub(crate) table: CommonTable,
    pub(crate) statement: Arc<Statement>,
}

impl CteDefinition {
    pub fn table(&self) -> &CommonTable {
        &self.table
    }
}
