use super::family::{
    Bool, Date, Family, Float, Integer, Numeric, Ordered, Text, TimeTz, Timestamp, TimestampTz,
};
use super::node::{FuncCall, Node};
use super::typed::{Expr, IntoAnyExpr, IntoExpr, IntoExprList};
use crate::statement::Statement;
use std::borrow::Cow;
use std::sync::Arc;

fn call<F>(name: &'static str, args: Vec<Arc<Node>>) -> Expr<F> {
    Expr::from_node(Node::func(name, args))
}

fn bare<F>(name: &'static str) -> Expr<F> {
    Expr::from_node(Node::Func(Arc::new(FuncCall {
        name: Cow::Borrowed(name),
        args: Vec::new(),
        distinct: false,
        omit_empty_parens: true,
    })))
}

/// Call any function by name, for those without a typed wrapper.
pub fn func<F>(name: impl Into<Cow<'static, str>>, args: impl IntoExprList) -> Expr<F> {
    let args = args.into_expr_list().into_iter().map(|a| a.0).collect();
    Expr::from_node(Node::func(name, args))
}

// ─── Aggregates ────────────────────────────────────────────────────────────

/// `COUNT(expr)`
pub fn count(expr: impl IntoAnyExpr) -> Expr<Integer> {
    call("COUNT", vec![expr.into_any_expr().0])
}

/// `COUNT(DISTINCT expr)`
pub fn count_distinct(expr: impl IntoAnyExpr) -> Expr<Integer> {
    Expr::from_node(Node::Func(Arc::new(FuncCall {
        name: Cow::Borrowed("COUNT"),
        args: vec![expr.into_any_expr().0],
        distinct: true,
        omit_empty_parens: false,
    })))
}

/// `COUNT(*)`
pub fn count_star() -> Expr<Integer> {
    call("COUNT", vec![Arc::new(Node::Keyword("*"))])
}

pub fn sum<F: Numeric>(expr: impl IntoExpr<F>) -> Expr<F> {
    call("SUM", vec![expr.into_expr().node])
}

pub fn avg<F: Numeric>(expr: impl IntoExpr<F>) -> Expr<Float> {
    call("AVG", vec![expr.into_expr().node])
}

pub fn min<F: Ordered>(expr: impl IntoExpr<F>) -> Expr<F> {
    call("MIN", vec![expr.into_expr().node])
}

pub fn max<F: Ordered>(expr: impl IntoExpr<F>) -> Expr<F> {
    call("MAX", vec![expr.into_expr().node])
}

pub fn bool_and(expr: impl IntoExpr<Bool>) -> Expr<Bool> {
    call("BOOL_AND", vec![expr.into_expr().node])
}

pub fn bool_or(expr: impl IntoExpr<Bool>) -> Expr<Bool> {
    call("BOOL_OR", vec![expr.into_expr().node])
}

pub fn string_agg(expr: impl IntoExpr<Text>, separator: impl IntoExpr<Text>) -> Expr<Text> {
    call(
        "STRING_AGG",
        vec![expr.into_expr().node, separator.into_expr().node],
    )
}

// ─── Numeric ───────────────────────────────────────────────────────────────

pub fn abs<F: Numeric>(expr: impl IntoExpr<F>) -> Expr<F> {
    call("ABS", vec![expr.into_expr().node])
}

pub fn ceil<F: Numeric>(expr: impl IntoExpr<F>) -> Expr<F> {
    call("CEIL", vec![expr.into_expr().node])
}

pub fn floor<F: Numeric>(expr: impl IntoExpr<F>) -> Expr<F> {
    call("FLOOR", vec![expr.into_expr().node])
}

pub fn round<F: Numeric>(expr: impl IntoExpr<F>) -> Expr<F> {
    call("ROUND", vec![expr.into_expr().node])
}

/// `ROUND(expr, precision)`
pub fn round_to(expr: impl IntoExpr<Float>, precision: impl IntoExpr<Integer>) -> Expr<Float> {
    call(
        "ROUND",
        vec![expr.into_expr().node, precision.into_expr().node],
    )
}

pub fn sqrt<F: Numeric>(expr: impl IntoExpr<F>) -> Expr<Float> {
    call("SQRT", vec![expr.into_expr().node])
}

// ─── Text ──────────────────────────────────────────────────────────────────

pub fn lower(expr: impl IntoExpr<Text>) -> Expr<Text> {
    call("LOWER", vec![expr.into_expr().node])
}

pub fn upper(expr: impl IntoExpr<Text>) -> Expr<Text> {
    call("UPPER", vec![expr.into_expr().node])
}

pub fn length(expr: impl IntoExpr<Text>) -> Expr<Integer> {
    call("LENGTH", vec![expr.into_expr().node])
}

pub fn trim(expr: impl IntoExpr<Text>) -> Expr<Text> {
    call("TRIM", vec![expr.into_expr().node])
}

/// `SUBSTR(expr, from, count)`; `from` is 1-based.
pub fn substr(
    expr: impl IntoExpr<Text>,
    from: impl IntoExpr<Integer>,
    count: impl IntoExpr<Integer>,
) -> Expr<Text> {
    call(
        "SUBSTR",
        vec![
            expr.into_expr().node,
            from.into_expr().node,
            count.into_expr().node,
        ],
    )
}

// ─── Conditional ───────────────────────────────────────────────────────────

pub fn coalesce<F: Family>(expr: impl IntoExpr<F>, fallback: impl IntoExpr<F>) -> Expr<F> {
    call(
        "COALESCE",
        vec![expr.into_expr().node, fallback.into_expr().node],
    )
}

pub fn nullif<F: Family>(expr: impl IntoExpr<F>, other: impl IntoExpr<F>) -> Expr<F> {
    call("NULLIF", vec![expr.into_expr().node, other.into_expr().node])
}

pub fn greatest<F, I>(items: I) -> Expr<F>
where
    F: Ordered,
    I: IntoIterator,
    I::Item: IntoExpr<F>,
{
    call(
        "GREATEST",
        items.into_iter().map(|e| e.into_expr().node).collect(),
    )
}

pub fn least<F, I>(items: I) -> Expr<F>
where
    F: Ordered,
    I: IntoIterator,
    I::Item: IntoExpr<F>,
{
    call(
        "LEAST",
        items.into_iter().map(|e| e.into_expr().node).collect(),
    )
}

// ─── Date / time ───────────────────────────────────────────────────────────

pub fn current_date() -> Expr<Date> {
    bare("CURRENT_DATE")
}

pub fn current_time() -> Expr<TimeTz> {
    bare("CURRENT_TIME")
}

pub fn current_timestamp() -> Expr<TimestampTz> {
    bare("CURRENT_TIMESTAMP")
}

pub fn localtimestamp() -> Expr<Timestamp> {
    bare("LOCALTIMESTAMP")
}

pub fn now() -> Expr<TimestampTz> {
    call("NOW", Vec::new())
}

// ─── Sub-query predicates ──────────────────────────────────────────────────

/// `EXISTS (SELECT ...)`
pub fn exists(query: impl Into<Statement>) -> Expr<Bool> {
    sub_query_predicate("EXISTS", query.into())
}

/// `NOT EXISTS (SELECT ...)`
pub fn not_exists(query: impl Into<Statement>) -> Expr<Bool> {
    sub_query_predicate("NOT EXISTS", query.into())
}

fn sub_query_predicate(keyword: &'static str, query: Statement) -> Expr<Bool> {
    Expr::from_node(Node::Seq(vec![
        Arc::new(Node::Keyword(keyword)),
        Arc::new(Node::SubQuery(Arc::new(query))),
    ]))
}

// ─── Window ────────────────────────────────────────────────────────────────

pub fn row_number() -> Expr<Integer> {
    call("ROW_NUMBER", Vec::new())
}

pub fn rank() -> Expr<Integer> {
    call("RANK", Vec::new())
}

pub fn dense_rank() -> Expr<Integer> {
    call("DENSE_RANK", Vec::new())
}
