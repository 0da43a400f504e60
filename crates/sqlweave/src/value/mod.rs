//! Scalar values: the currency for bound arguments and decoded cells.
//!
//! A [`Value`] is what a literal expression carries into the argument list,
//! what the driver hands back for each cell, and what hydration converts into
//! destination fields.

mod pg;

#[cfg(test)]
mod tests;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use std::fmt::{self, Write as _};
use std::sync::Arc;
use tokio_postgres::types::ToSql;
use uuid::Uuid;

/// Marker written when a value has no literal form.
pub const UNSUPPORTED_LITERAL: &str = "[Unsupported type]";

/// A clone-friendly opaque parameter for types `Value` has no variant for.
#[derive(Clone)]
pub struct Param(pub(crate) Arc<dyn ToSql + Send + Sync>);

impl Param {
    /// Wrap any driver-bindable value.
    pub fn new<T: ToSql + Send + Sync + 'static>(value: T) -> Self {
        Param(Arc::new(value))
    }

    /// Borrow the inner value as a ToSql trait object.
    pub fn as_to_sql(&self) -> &(dyn ToSql + Sync) {
        &*self.0 as &(dyn ToSql + Sync)
    }
}

impl fmt::Debug for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Param").field(&"<dyn ToSql>").finish()
    }
}

/// A single SQL scalar.
#[derive(Clone, Debug, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    #[cfg(feature = "rust_decimal")]
    Decimal(rust_decimal::Decimal),
    Text(String),
    Bytes(Vec<u8>),
    Uuid(Uuid),
    Json(serde_json::Value),
    Date(NaiveDate),
    Time(NaiveTime),
    /// Time of day with a fixed UTC offset.
    TimeTz(NaiveTime, FixedOffset),
    Timestamp(NaiveDateTime),
    TimestampTz(DateTime<FixedOffset>),
    /// Opaque driver value; bindable but has no literal form.
    Custom(Param),
}

impl Value {
    /// Short name of the variant, used in conversion errors.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            #[cfg(feature = "rust_decimal")]
            Value::Decimal(_) => "decimal",
            Value::Text(_) => "text",
            Value::Bytes(_) => "bytes",
            Value::Uuid(_) => "uuid",
            Value::Json(_) => "json",
            Value::Date(_) => "date",
            Value::Time(_) => "time",
            Value::TimeTz(..) => "timetz",
            Value::Timestamp(_) => "timestamp",
            Value::TimestampTz(_) => "timestamptz",
            Value::Custom(_) => "custom",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Render as an inline SQL literal.
    ///
    /// Used for constant binding and debug SQL. Not an escaping guarantee
    /// against adversarial input.
    pub fn to_literal(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Bool(true) => "TRUE".to_string(),
            Value::Bool(false) => "FALSE".to_string(),
            Value::Int(v) => v.to_string(),
            Value::Float(v) => v.to_string(),
            #[cfg(feature = "rust_decimal")]
            Value::Decimal(v) => v.to_string(),
            Value::Text(s) => quote_text(s),
            Value::Bytes(b) => quote_text(&String::from_utf8_lossy(b)),
            Value::Uuid(u) => quote_text(&u.to_string()),
            Value::Json(j) => quote_text(&j.to_string()),
            Value::Date(d) => quote_text(&d.format("%Y-%m-%d").to_string()),
            Value::Time(t) => quote_text(&t.format("%H:%M:%S%.f").to_string()),
            Value::TimeTz(t, off) => {
                quote_text(&format!("{}{}", t.format("%H:%M:%S%.f"), off))
            }
            Value::Timestamp(ts) => quote_text(&ts.format("%Y-%m-%d %H:%M:%S%.f").to_string()),
            Value::TimestampTz(ts) => {
                quote_text(&ts.format("%Y-%m-%d %H:%M:%S%.f%:z").to_string())
            }
            Value::Custom(_) => UNSUPPORTED_LITERAL.to_string(),
        }
    }

    /// Append a stable textual form used to build hydration group keys.
    ///
    /// Returns `false` for NULL, which contributes nothing to a key.
    pub(crate) fn write_key(&self, out: &mut String) -> bool {
        let _ = match self {
            Value::Null => return false,
            Value::Bool(v) => write!(out, "{v}"),
            Value::Int(v) => write!(out, "{v}"),
            Value::Float(v) => write!(out, "{v}"),
            #[cfg(feature = "rust_decimal")]
            Value::Decimal(v) => write!(out, "{}", v.normalize()),
            Value::Text(s) => write!(out, "{s}"),
            Value::Bytes(b) => b.iter().try_for_each(|byte| write!(out, "{byte:02x}")),
            Value::Uuid(u) => write!(out, "{u}"),
            Value::Json(j) => write!(out, "{j}"),
            Value::Date(d) => write!(out, "{d}"),
            Value::Time(t) => write!(out, "{t}"),
            Value::TimeTz(t, off) => write!(out, "{t}{off}"),
            Value::Timestamp(ts) => write!(out, "{ts}"),
            Value::TimestampTz(ts) => write!(out, "{}", ts.to_rfc3339()),
            Value::Custom(p) => write!(out, "{p:?}"),
        };
        true
    }

    /// Structural equality; opaque `Custom` values never compare equal.
    pub fn same_as(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            #[cfg(feature = "rust_decimal")]
            (Value::Decimal(a), Value::Decimal(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Uuid(a), Value::Uuid(b)) => a == b,
            (Value::Json(a), Value::Json(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::Time(a), Value::Time(b)) => a == b,
            (Value::TimeTz(a, x), Value::TimeTz(b, y)) => a == b && x == y,
            (Value::Timestamp(a), Value::Timestamp(b)) => a == b,
            (Value::TimestampTz(a), Value::TimestampTz(b)) => a == b,
            _ => false,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}

fn quote_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for ch in s.chars() {
        if ch == '\'' {
            out.push('\'');
        }
        out.push(ch);
    }
    out.push('\'');
    out
}

macro_rules! value_from {
    ($($ty:ty => |$v:ident| $body:expr),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from($v: $ty) -> Self {
                    $body
                }
            }
        )*
    };
}

value_from! {
    bool => |v| Value::Bool(v),
    i8 => |v| Value::Int(v.into()),
    i16 => |v| Value::Int(v.into()),
    i32 => |v| Value::Int(v.into()),
    i64 => |v| Value::Int(v),
    u8 => |v| Value::Int(v.into()),
    u16 => |v| Value::Int(v.into()),
    u32 => |v| Value::Int(v.into()),
    f32 => |v| Value::Float(v.into()),
    f64 => |v| Value::Float(v),
    String => |v| Value::Text(v),
    &str => |v| Value::Text(v.to_string()),
    &String => |v| Value::Text(v.clone()),
    Vec<u8> => |v| Value::Bytes(v),
    &[u8] => |v| Value::Bytes(v.to_vec()),
    Uuid => |v| Value::Uuid(v),
    serde_json::Value => |v| Value::Json(v),
    NaiveDate => |v| Value::Date(v),
    NaiveTime => |v| Value::Time(v),
    NaiveDateTime => |v| Value::Timestamp(v),
    DateTime<FixedOffset> => |v| Value::TimestampTz(v),
    DateTime<Utc> => |v| Value::TimestampTz(v.fixed_offset()),
    Param => |v| Value::Custom(v),
}

#[cfg(feature = "rust_decimal")]
value_from! {
    rust_decimal::Decimal => |v| Value::Decimal(v),
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}
