use super::family::{
    Bool, Bytes, Date, Float, Integer, Interval, Json, Text, Time, Timestamp, TimestampTz, Uuid,
};
use super::node::Node;
use super::typed::{AnyExpr, Expr, IntoAnyExpr, IntoExpr};
use crate::value::Value;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};

macro_rules! literal_family {
    ($family:ty => $($t:ty),+ $(,)?) => {
        $(
            impl IntoExpr<$family> for $t {
                fn into_expr(self) -> Expr<$family> {
                    Expr::from_node(Node::literal(self))
                }
            }
        )+
    };
}

macro_rules! literal_any {
    ($($t:ty),+ $(,)?) => {
        $(
            impl IntoAnyExpr for $t {
                fn into_any_expr(self) -> AnyExpr {
                    AnyExpr(std::sync::Arc::new(Node::literal(self)))
                }
            }
        )+
    };
}

macro_rules! nullable {
    ($($family:ty),+ $(,)?) => {
        $(
            impl<T> IntoExpr<$family> for Option<T>
            where
                T: IntoExpr<$family> + Into<Value>,
            {
                fn into_expr(self) -> Expr<$family> {
                    Expr::from_node(Node::literal(Value::from(self)))
                }
            }
        )+
    };
}

literal_family!(Bool => bool);
literal_family!(Integer => i8, i16, i32, i64, u8, u16, u32);
literal_family!(Float => i8, i16, i32, i64, u8, u16, u32, f32, f64);
literal_family!(Text => String, &str, &String);
literal_family!(Bytes => Vec<u8>, &[u8]);
literal_family!(Uuid => uuid::Uuid);
literal_family!(Json => serde_json::Value);
literal_family!(Date => NaiveDate);
literal_family!(Time => NaiveTime);
literal_family!(Timestamp => NaiveDateTime);
literal_family!(TimestampTz => DateTime<FixedOffset>, DateTime<Utc>);

#[cfg(feature = "rust_decimal")]
literal_family!(Float => rust_decimal::Decimal);

nullable!(Bool, Integer, Float, Text, Bytes, Uuid, Json, Date, Time, Timestamp, TimestampTz);

literal_any!(
    bool,
    i8,
    i16,
    i32,
    i64,
    u8,
    u16,
    u32,
    f32,
    f64,
    String,
    &str,
    &String,
    Vec<u8>,
    &[u8],
    uuid::Uuid,
    serde_json::Value,
    NaiveDate,
    NaiveTime,
    NaiveDateTime,
    DateTime<FixedOffset>,
    DateTime<Utc>,
    Value,
);

#[cfg(feature = "rust_decimal")]
literal_any!(rust_decimal::Decimal);

impl<T: Into<Value>> IntoAnyExpr for Option<T> {
    fn into_any_expr(self) -> AnyExpr {
        AnyExpr(std::sync::Arc::new(Node::literal(Value::from(self))))
    }
}

/// Literal constructors.
///
/// Plain Rust values passed to operators are already parametrized literals;
/// these functions exist for the cases that need a standalone expression or
/// an inlined constant.
pub mod lit {
    use super::*;

    /// Parametrized literal of family `F`.
    pub fn value<F, T>(value: T) -> Expr<F>
    where
        T: IntoExpr<F> + Into<Value>,
    {
        Expr::from_node(Node::literal(value))
    }

    /// Literal written into the SQL text instead of the argument list.
    pub fn constant<F, T>(value: T) -> Expr<F>
    where
        T: IntoExpr<F> + Into<Value>,
    {
        Expr::from_node(Node::constant(value))
    }

    pub fn int(value: i64) -> Expr<Integer> {
        Expr::from_node(Node::literal(value))
    }

    pub fn float(value: f64) -> Expr<Float> {
        Expr::from_node(Node::literal(value))
    }

    pub fn text(value: impl Into<String>) -> Expr<Text> {
        Expr::from_node(Node::literal(value.into()))
    }

    pub fn bool(value: bool) -> Expr<Bool> {
        Expr::from_node(Node::literal(value))
    }

    /// `TRUE` / `FALSE`, inlined.
    pub fn constant_bool(value: bool) -> Expr<Bool> {
        Expr::from_node(Node::constant(value))
    }

    pub fn constant_int(value: i64) -> Expr<Integer> {
        Expr::from_node(Node::constant(value))
    }

    pub fn constant_text(value: impl Into<String>) -> Expr<Text> {
        Expr::from_node(Node::constant(value.into()))
    }

    /// `INTERVAL '1 day'`
    pub fn interval(spec: impl Into<String>) -> Expr<Interval> {
        Expr::from_node(Node::Seq(vec![
            std::sync::Arc::new(Node::Keyword("INTERVAL")),
            std::sync::Arc::new(Node::constant(spec.into())),
        ]))
    }

    /// `NULL` of any family.
    pub fn null<F>() -> Expr<F> {
        Expr::from_node(Node::Keyword("NULL"))
    }

    /// `DEFAULT`, for INSERT rows and UPDATE assignments.
    pub fn default() -> AnyExpr {
        AnyExpr(std::sync::Arc::new(Node::Keyword("DEFAULT")))
    }

    /// `*`, for `COUNT(*)` style arguments.
    pub fn star() -> AnyExpr {
        AnyExpr(std::sync::Arc::new(Node::Keyword("*")))
    }
}
