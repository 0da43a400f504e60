//! Columns, projections and the small clause items built from them.
//!
//! A [`Column<F>`] is an expression (it derefs to [`Expr<F>`]) that also
//! knows its name and table qualifier. When a column is exported from a
//! derived table or CTE it is *rebased*: it keeps its projection alias
//! (`"table.col"`) but is now referenced through the derived table's alias.

use crate::error::SqlResult;
use crate::expr::{AnyExpr, Expr, IntoAnyExpr, IntoExpr, Node};
use crate::sql::{Position, SerializeOptions, SqlBuilder, StatementKind};
use crate::table::DerivedSource;
use std::ops::Deref;
use std::sync::Arc;

/// Derived table a column was exported from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Origin {
    /// Alias of the derived table.
    pub(crate) alias: Arc<str>,
    /// Name the column carries inside the derived table.
    pub(crate) exported: Arc<str>,
}

/// Untyped column reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRef {
    name: Arc<str>,
    table: Option<Arc<str>>,
    origin: Option<Origin>,
}

impl ColumnRef {
    pub(crate) fn new(name: impl Into<Arc<str>>, table: Option<Arc<str>>) -> Self {
        ColumnRef {
            name: name.into(),
            table,
            origin: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Table qualifier (table alias or name), if any.
    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    /// Alias used in projections: `table.name`, or just `name`.
    pub fn alias(&self) -> String {
        match &self.origin {
            Some(origin) => origin.exported.to_string(),
            None => match &self.table {
                Some(table) => format!("{table}.{}", self.name),
                None => self.name.to_string(),
            },
        }
    }

    /// Same column, referenced through the derived table `alias`.
    pub(crate) fn rebased(&self, alias: &Arc<str>) -> ColumnRef {
        ColumnRef {
            origin: Some(Origin {
                alias: alias.clone(),
                exported: self.alias().into(),
            }),
            ..self.clone()
        }
    }

    /// Column named `exported` inside the derived table `alias`.
    pub(crate) fn exported(alias: &Arc<str>, exported: &str) -> ColumnRef {
        ColumnRef {
            name: exported.into(),
            table: None,
            origin: Some(Origin {
                alias: alias.clone(),
                exported: exported.into(),
            }),
        }
    }

    /// Bare name, as used by INSERT column lists and SET assignments.
    pub(crate) fn serialize_name(&self, out: &mut SqlBuilder<'_>) -> SqlResult<()> {
        out.write_identifier(&self.name)
    }

    pub(crate) fn serialize(
        &self,
        kind: StatementKind,
        out: &mut SqlBuilder<'_>,
        opts: SerializeOptions,
    ) -> SqlResult<()> {
        if kind == StatementKind::SetOperation && opts.position == Position::OrderBy {
            return out.write_alias(&self.alias());
        }

        match &self.origin {
            Some(origin) => {
                out.write_identifier(&origin.alias)?;
                out.write(".");
                out.write_alias(&origin.exported)?;
            }
            None => {
                if let Some(table) = &self.table {
                    out.write_identifier(table)?;
                    out.write(".");
                }
                out.write_identifier(&self.name)?;
            }
        }

        if opts.position == Position::Projection {
            out.write("AS");
            out.write_alias(&self.alias())?;
        }
        Ok(())
    }
}

/// A column of family `F`.
pub struct Column<F> {
    column: ColumnRef,
    expr: Expr<F>,
}

impl<F> Clone for Column<F> {
    fn clone(&self) -> Self {
        Column {
            column: self.column.clone(),
            expr: self.expr.clone(),
        }
    }
}

impl<F> std::fmt::Debug for Column<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Column").field(&self.column).finish()
    }
}

impl<F> Deref for Column<F> {
    type Target = Expr<F>;

    fn deref(&self) -> &Expr<F> {
        &self.expr
    }
}

impl<F> Column<F> {
    /// Unqualified column.
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self::from_ref(ColumnRef::new(name, None))
    }

    pub(crate) fn from_ref(column: ColumnRef) -> Self {
        Column {
            expr: Expr::from_node(Node::Column(column.clone())),
            column,
        }
    }

    pub fn name(&self) -> &str {
        self.column.name()
    }

    pub fn table_name(&self) -> Option<&str> {
        self.column.table()
    }

    pub fn column_ref(&self) -> &ColumnRef {
        &self.column
    }

    pub fn expr(&self) -> Expr<F> {
        self.expr.clone()
    }

    /// Untyped handle, for column lists.
    pub fn any_column(&self) -> AnyColumn {
        AnyColumn(self.column.clone())
    }

    /// `name = value` for UPDATE and upserts.
    pub fn set(&self, value: impl IntoExpr<F>) -> Assignment {
        Assignment {
            column: self.column.clone(),
            value: value.into_expr().node,
        }
    }

    /// `name = DEFAULT`
    pub fn set_default(&self) -> Assignment {
        Assignment {
            column: self.column.clone(),
            value: Arc::new(Node::Keyword("DEFAULT")),
        }
    }

    /// This column as exported by `table`.
    pub fn via(&self, table: &impl DerivedSource) -> Column<F> {
        Column::from_ref(self.column.rebased(table.alias_arc()))
    }

    /// `excluded.name`, the proposed row inside `ON CONFLICT DO UPDATE`.
    pub fn excluded(&self) -> Column<F> {
        Column::from_ref(ColumnRef::new(
            self.column.name.clone(),
            Some(Arc::from("excluded")),
        ))
    }
}

impl<F> IntoExpr<F> for Column<F> {
    fn into_expr(self) -> Expr<F> {
        self.expr
    }
}

impl<F> IntoExpr<F> for &Column<F> {
    fn into_expr(self) -> Expr<F> {
        self.expr.clone()
    }
}

impl<F> IntoAnyExpr for Column<F> {
    fn into_any_expr(self) -> AnyExpr {
        self.expr.any()
    }
}

impl<F> IntoAnyExpr for &Column<F> {
    fn into_any_expr(self) -> AnyExpr {
        self.expr.any()
    }
}

/// A column of unknown family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnyColumn(pub(crate) ColumnRef);

impl AnyColumn {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        AnyColumn(ColumnRef::new(name, None))
    }

    pub fn name(&self) -> &str {
        self.0.name()
    }

    pub fn typed<F>(&self) -> Column<F> {
        Column::from_ref(self.0.clone())
    }
}

impl<F> From<&Column<F>> for AnyColumn {
    fn from(column: &Column<F>) -> Self {
        column.any_column()
    }
}

/// Named group of columns, usable wherever a projection or column list is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnList(pub(crate) Vec<AnyColumn>);

impl ColumnList {
    pub fn new(columns: impl IntoColumnList) -> Self {
        ColumnList(columns.into_column_list())
    }

    pub fn columns(&self) -> &[AnyColumn] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Members not named in `excluded`.
    pub fn except(&self, excluded: impl IntoColumnList) -> ColumnList {
        let excluded = excluded.into_column_list();
        ColumnList(
            self.0
                .iter()
                .filter(|c| !excluded.iter().any(|e| e.name() == c.name()))
                .cloned()
                .collect(),
        )
    }

    /// Members as exported by `table`.
    pub fn via(&self, table: &impl DerivedSource) -> ColumnList {
        ColumnList(
            self.0
                .iter()
                .map(|c| AnyColumn(c.0.rebased(table.alias_arc())))
                .collect(),
        )
    }
}

/// Conversion into an ordered list of untyped columns.
pub trait IntoColumnList {
    fn into_column_list(self) -> Vec<AnyColumn>;
}

impl IntoColumnList for AnyColumn {
    fn into_column_list(self) -> Vec<AnyColumn> {
        vec![self]
    }
}

impl<F> IntoColumnList for Column<F> {
    fn into_column_list(self) -> Vec<AnyColumn> {
        vec![self.any_column()]
    }
}

impl<F> IntoColumnList for &Column<F> {
    fn into_column_list(self) -> Vec<AnyColumn> {
        vec![self.any_column()]
    }
}

impl IntoColumnList for ColumnList {
    fn into_column_list(self) -> Vec<AnyColumn> {
        self.0
    }
}

impl IntoColumnList for &ColumnList {
    fn into_column_list(self) -> Vec<AnyColumn> {
        self.0.clone()
    }
}

impl IntoColumnList for Vec<AnyColumn> {
    fn into_column_list(self) -> Vec<AnyColumn> {
        self
    }
}

macro_rules! impl_column_list_tuple {
    ($($T:ident),+; $($idx:tt),+) => {
        impl<$($T: IntoColumnList),+> IntoColumnList for ($($T,)+) {
            fn into_column_list(self) -> Vec<AnyColumn> {
                let mut out = Vec::new();
                $(out.extend(self.$idx.into_column_list());)+
                out
            }
        }
    };
}

crate::macros::tuple_impls!(impl_column_list_tuple);

// ─── Projections ────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub(crate) enum ProjectionKind {
    Column(ColumnRef),
    Expr {
        node: Arc<Node>,
        alias: Option<Arc<str>>,
    },
    List(Vec<Projection>),
}

/// One entry of a SELECT or RETURNING list.
#[derive(Debug, Clone)]
pub struct Projection(pub(crate) ProjectionKind);

impl Projection {
    pub(crate) fn aliased(node: Arc<Node>, alias: String) -> Self {
        Projection(ProjectionKind::Expr {
            node,
            alias: Some(alias.into()),
        })
    }

    fn unaliased(node: Arc<Node>) -> Self {
        match node.as_column() {
            Some(column) => Projection(ProjectionKind::Column(column.clone())),
            None => Projection(ProjectionKind::Expr { node, alias: None }),
        }
    }

    /// Names under which the projected values come back.
    pub fn aliases(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_aliases(&mut out);
        out
    }

    fn collect_aliases(&self, out: &mut Vec<String>) {
        match &self.0 {
            ProjectionKind::Column(column) => out.push(column.alias()),
            ProjectionKind::Expr { alias, .. } => {
                if let Some(alias) = alias {
                    out.push(alias.to_string());
                }
            }
            ProjectionKind::List(items) => {
                for item in items {
                    item.collect_aliases(out);
                }
            }
        }
    }

    /// The projection as seen from outside the derived table `alias`.
    ///
    /// Returns `None` for unaliased expressions, which cannot be referenced.
    pub(crate) fn rebased(&self, alias: &Arc<str>) -> Option<Projection> {
        match &self.0 {
            ProjectionKind::Column(column) => {
                Some(Projection(ProjectionKind::Column(column.rebased(alias))))
            }
            ProjectionKind::Expr {
                alias: Some(name), ..
            } => Some(Projection(ProjectionKind::Column(ColumnRef::exported(
                alias, name,
            )))),
            ProjectionKind::Expr { alias: None, .. } => None,
            ProjectionKind::List(items) => Some(Projection(ProjectionKind::List(
                items.iter().filter_map(|p| p.rebased(alias)).collect(),
            ))),
        }
    }

    /// Flattened column references, for derived-table lookups.
    pub(crate) fn columns(&self) -> Vec<ColumnRef> {
        match &self.0 {
            ProjectionKind::Column(column) => vec![column.clone()],
            ProjectionKind::Expr { .. } => Vec::new(),
            ProjectionKind::List(items) => items.iter().flat_map(|p| p.columns()).collect(),
        }
    }

    fn serialize(
        &self,
        kind: StatementKind,
        out: &mut SqlBuilder<'_>,
        first: &mut bool,
    ) -> SqlResult<()> {
        match &self.0 {
            ProjectionKind::List(items) => {
                for item in items {
                    item.serialize(kind, out, first)?;
                }
                Ok(())
            }
            ProjectionKind::Column(column) => {
                separate(out, first);
                column.serialize(kind, out, SerializeOptions::at(Position::Projection))
            }
            ProjectionKind::Expr { node, alias } => {
                separate(out, first);
                node.serialize(kind, out, SerializeOptions::DEFAULT)?;
                if let Some(alias) = alias {
                    out.write("AS");
                    out.write_alias(alias)?;
                }
                Ok(())
            }
        }
    }
}

fn separate(out: &mut SqlBuilder<'_>, first: &mut bool) {
    if !*first {
        out.write(",");
        out.new_line();
    }
    *first = false;
}

/// Write a projection list, one entry per line.
pub(crate) fn serialize_projections(
    projections: &[Projection],
    kind: StatementKind,
    out: &mut SqlBuilder<'_>,
) -> SqlResult<()> {
    let mut first = true;
    for projection in projections {
        projection.serialize(kind, out, &mut first)?;
    }
    Ok(())
}

/// Conversion into a single projection.
pub trait IntoProjection {
    fn into_projection(self) -> Projection;
}

impl IntoProjection for Projection {
    fn into_projection(self) -> Projection {
        self
    }
}

impl<F> IntoProjection for Column<F> {
    fn into_projection(self) -> Projection {
        Projection(ProjectionKind::Column(self.column))
    }
}

impl<F> IntoProjection for &Column<F> {
    fn into_projection(self) -> Projection {
        Projection(ProjectionKind::Column(self.column.clone()))
    }
}

impl IntoProjection for AnyColumn {
    fn into_projection(self) -> Projection {
        Projection(ProjectionKind::Column(self.0))
    }
}

impl<F> IntoProjection for Expr<F> {
    fn into_projection(self) -> Projection {
        Projection::unaliased(self.node)
    }
}

impl<F> IntoProjection for &Expr<F> {
    fn into_projection(self) -> Projection {
        Projection::unaliased(self.node.clone())
    }
}

impl IntoProjection for AnyExpr {
    fn into_projection(self) -> Projection {
        Projection::unaliased(self.0)
    }
}

impl IntoProjection for ColumnList {
    fn into_projection(self) -> Projection {
        Projection(ProjectionKind::List(
            self.0.into_iter().map(IntoProjection::into_projection).collect(),
        ))
    }
}

impl IntoProjection for &ColumnList {
    fn into_projection(self) -> Projection {
        self.clone().into_projection()
    }
}

/// Conversion into a projection list.
pub trait IntoProjections {
    fn into_projections(self) -> Vec<Projection>;
}

impl<T: IntoProjection> IntoProjections for T {
    fn into_projections(self) -> Vec<Projection> {
        vec![self.into_projection()]
    }
}

impl IntoProjections for Vec<Projection> {
    fn into_projections(self) -> Vec<Projection> {
        self
    }
}

macro_rules! impl_projections_tuple {
    ($($T:ident),+; $($idx:tt),+) => {
        impl<$($T: IntoProjection),+> IntoProjections for ($($T,)+) {
            fn into_projections(self) -> Vec<Projection> {
                vec![$(self.$idx.into_projection()),+]
            }
        }
    };
}

crate::macros::tuple_impls!(impl_projections_tuple);

// ─── ORDER BY items ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Nulls {
    First,
    Last,
}

/// An ORDER BY item: expression, direction and NULLS placement.
#[derive(Debug, Clone)]
pub struct OrderBy {
    node: Arc<Node>,
    direction: Option<Direction>,
    nulls: Option<Nulls>,
}

impl OrderBy {
    pub(crate) fn new(node: Arc<Node>) -> Self {
        OrderBy {
            node,
            direction: None,
            nulls: None,
        }
    }

    pub fn asc(mut self) -> Self {
        self.direction = Some(Direction::Asc);
        self
    }

    pub fn desc(mut self) -> Self {
        self.direction = Some(Direction::Desc);
        self
    }

    pub fn nulls_first(mut self) -> Self {
        self.nulls = Some(Nulls::First);
        self
    }

    pub fn nulls_last(mut self) -> Self {
        self.nulls = Some(Nulls::Last);
        self
    }

    pub(crate) fn serialize(&self, kind: StatementKind, out: &mut SqlBuilder<'_>) -> SqlResult<()> {
        self.node
            .serialize(kind, out, SerializeOptions::at(Position::OrderBy))?;
        match self.direction {
            Some(Direction::Asc) => out.write("ASC"),
            Some(Direction::Desc) => out.write("DESC"),
            None => {}
        }
        match self.nulls {
            Some(Nulls::First) => out.write("NULLS FIRST"),
            Some(Nulls::Last) => out.write("NULLS LAST"),
            None => {}
        }
        Ok(())
    }
}

/// Conversion into ORDER BY items.
pub trait IntoOrderByList {
    fn into_order_by_list(self) -> Vec<OrderBy>;
}

/// Conversion into a single ORDER BY item.
pub trait IntoOrderBy {
    fn into_order_by(self) -> OrderBy;
}

impl IntoOrderBy for OrderBy {
    fn into_order_by(self) -> OrderBy {
        self
    }
}

impl<F> IntoOrderBy for Expr<F> {
    fn into_order_by(self) -> OrderBy {
        OrderBy::new(self.node)
    }
}

impl<F> IntoOrderBy for &Expr<F> {
    fn into_order_by(self) -> OrderBy {
        OrderBy::new(self.node.clone())
    }
}

impl<F> IntoOrderBy for Column<F> {
    fn into_order_by(self) -> OrderBy {
        OrderBy::new(self.expr.node)
    }
}

impl<F> IntoOrderBy for &Column<F> {
    fn into_order_by(self) -> OrderBy {
        OrderBy::new(self.expr.node.clone())
    }
}

impl<T: IntoOrderBy> IntoOrderByList for T {
    fn into_order_by_list(self) -> Vec<OrderBy> {
        vec![self.into_order_by()]
    }
}

impl IntoOrderByList for Vec<OrderBy> {
    fn into_order_by_list(self) -> Vec<OrderBy> {
        self
    }
}

macro_rules! impl_order_by_tuple {
    ($($T:ident),+; $($idx:tt),+) => {
        impl<$($T: IntoOrderBy),+> IntoOrderByList for ($($T,)+) {
            fn into_order_by_list(self) -> Vec<OrderBy> {
                vec![$(self.$idx.into_order_by()),+]
            }
        }
    };
}

crate::macros::tuple_impls!(impl_order_by_tuple);

// ─── Assignments ────────────────────────────────────────────────────────────

/// `column = value` inside SET / DO UPDATE SET / ON DUPLICATE KEY UPDATE.
#[derive(Debug, Clone)]
pub struct Assignment {
    column: ColumnRef,
    value: Arc<Node>,
}

impl Assignment {
    pub(crate) fn new(column: ColumnRef, value: Arc<Node>) -> Self {
        Assignment { column, value }
    }

    pub(crate) fn serialize(&self, kind: StatementKind, out: &mut SqlBuilder<'_>) -> SqlResult<()> {
        self.column.serialize_name(out)?;
        out.write("=");
        self.value.serialize(kind, out, SerializeOptions::NO_WRAP)
    }
}

/// Conversion into a list of assignments.
pub trait IntoAssignments {
    fn into_assignments(self) -> Vec<Assignment>;
}

impl IntoAssignments for Assignment {
    fn into_assignments(self) -> Vec<Assignment> {
        vec![self]
    }
}

impl IntoAssignments for Vec<Assignment> {
    fn into_assignments(self) -> Vec<Assignment> {
        self
    }
}

macro_rules! impl_assignments_tuple {
    ($($T:ident),+; $($idx:tt),+) => {
        impl<$($T: IntoAssignments),+> IntoAssignments for ($($T,)+) {
            fn into_assignments(self) -> Vec<Assignment> {
                let mut out = Vec::new();
                $(out.extend(self.$idx.into_assignments());)+
                out
            }
        }
    };
}

crate::macros::tuple_impls!(impl_assignments_tuple);
