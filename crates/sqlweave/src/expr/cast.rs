use super::family::{
    Bool, Bytes, Date, Family, Float, Integer, Interval, Json, Text, Time, Timestamp,
    TimestampTz, Uuid,
};
use super::node::{CastTarget, Node};
use super::typed::{Expr, IntoAnyExpr};
use std::borrow::Cow;
use std::sync::Arc;

/// Pending cast; pick the target with one of the `as_*` methods.
#[derive(Debug, Clone)]
pub struct Cast(Arc<Node>);

/// `CAST(expr AS ..)` / `expr::..` depending on the dialect.
pub fn cast(expr: impl IntoAnyExpr) -> Cast {
    Cast(expr.into_any_expr().0)
}

impl Cast {
    /// Cast to an arbitrary SQL type name, re-typed as `F`.
    pub fn as_<F>(self, target: impl Into<Cow<'static, str>>) -> Expr<F> {
        Expr::from_node(Node::Cast {
            operand: self.0,
            target: CastTarget::Named(target.into()),
        })
    }

    /// Cast to the dialect's type for family `F`.
    pub fn as_family<F: Family>(self) -> Expr<F> {
        Expr::from_node(Node::Cast {
            operand: self.0,
            target: CastTarget::Family(F::KIND),
        })
    }

    pub fn as_bool(self) -> Expr<Bool> {
        self.as_family()
    }

    pub fn as_integer(self) -> Expr<Integer> {
        self.as_family()
    }

    pub fn as_float(self) -> Expr<Float> {
        self.as_family()
    }

    pub fn as_text(self) -> Expr<Text> {
        self.as_family()
    }

    pub fn as_date(self) -> Expr<Date> {
        self.as_family()
    }

    pub fn as_time(self) -> Expr<Time> {
        self.as_family()
    }

    pub fn as_timestamp(self) -> Expr<Timestamp> {
        self.as_family()
    }

    pub fn as_timestamptz(self) -> Expr<TimestampTz> {
        self.as_family()
    }

    pub fn as_interval(self) -> Expr<Interval> {
        self.as_family()
    }

    pub fn as_bytes(self) -> Expr<Bytes> {
        self.as_family()
    }

    pub fn as_uuid(self) -> Expr<Uuid> {
        self.as_family()
    }

    pub fn as_json(self) -> Expr<Json> {
        self.as_family()
    }
}
