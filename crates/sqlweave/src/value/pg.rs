//! tokio-postgres glue: binding `Value` as a parameter and decoding cells.

use super::Value;
use crate::error::{SqlError, SqlResult};
use bytes::{BufMut, BytesMut};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use std::error::Error;
use tokio_postgres::Row;
use tokio_postgres::types::{FromSql, IsNull, Kind, ToSql, Type, to_sql_checked};
use uuid::Uuid;

type BoxError = Box<dyn Error + Sync + Send>;

impl ToSql for Value {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
        match self {
            Value::Null => Ok(IsNull::Yes),
            Value::Bool(v) => v.to_sql_checked(ty, out),
            Value::Int(v) => int_to_sql(*v, ty, out),
            Value::Float(v) => {
                if *ty == Type::FLOAT4 {
                    (*v as f32).to_sql_checked(ty, out)
                } else if *ty == Type::NUMERIC {
                    float_to_numeric(*v, out)
                } else {
                    v.to_sql_checked(ty, out)
                }
            }
            #[cfg(feature = "rust_decimal")]
            Value::Decimal(v) => v.to_sql_checked(ty, out),
            Value::Text(s) => {
                if matches!(ty.kind(), Kind::Enum(_)) {
                    out.extend_from_slice(s.as_bytes());
                    Ok(IsNull::No)
                } else {
                    s.as_str().to_sql_checked(ty, out)
                }
            }
            Value::Bytes(b) => b.as_slice().to_sql_checked(ty, out),
            Value::Uuid(u) => u.to_sql_checked(ty, out),
            Value::Json(j) => j.to_sql_checked(ty, out),
            Value::Date(d) => d.to_sql_checked(ty, out),
            Value::Time(t) => t.to_sql_checked(ty, out),
            Value::TimeTz(t, offset) => PgTimeTz(*t, *offset).to_sql_checked(ty, out),
            Value::Timestamp(ts) => ts.to_sql_checked(ty, out),
            Value::TimestampTz(ts) => ts.to_sql_checked(ty, out),
            Value::Custom(p) => p.as_to_sql().to_sql_checked(ty, out),
        }
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }

    to_sql_checked!();
}

fn int_to_sql(v: i64, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
    if *ty == Type::INT2 {
        i16::try_from(v)?.to_sql_checked(ty, out)
    } else if *ty == Type::INT4 {
        i32::try_from(v)?.to_sql_checked(ty, out)
    } else if *ty == Type::OID {
        u32::try_from(v)?.to_sql_checked(ty, out)
    } else if *ty == Type::FLOAT4 {
        (v as f32).to_sql_checked(ty, out)
    } else if *ty == Type::FLOAT8 {
        (v as f64).to_sql_checked(ty, out)
    } else if *ty == Type::NUMERIC {
        int_to_numeric(v, out)
    } else {
        v.to_sql_checked(ty, out)
    }
}

#[cfg(feature = "rust_decimal")]
fn int_to_numeric(v: i64, out: &mut BytesMut) -> Result<IsNull, BoxError> {
    rust_decimal::Decimal::from(v).to_sql(&Type::NUMERIC, out)
}

#[cfg(feature = "rust_decimal")]
fn float_to_numeric(v: f64, out: &mut BytesMut) -> Result<IsNull, BoxError> {
    rust_decimal::Decimal::try_from(v)?.to_sql(&Type::NUMERIC, out)
}

#[cfg(not(feature = "rust_decimal"))]
fn int_to_numeric(_v: i64, _out: &mut BytesMut) -> Result<IsNull, BoxError> {
    Err("binding to a numeric parameter requires the `rust_decimal` feature".into())
}

#[cfg(not(feature = "rust_decimal"))]
fn float_to_numeric(_v: f64, _out: &mut BytesMut) -> Result<IsNull, BoxError> {
    Err("binding to a numeric parameter requires the `rust_decimal` feature".into())
}

/// `time with time zone` on the wire: microseconds since midnight followed by
/// the zone offset in seconds west of UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PgTimeTz(pub NaiveTime, pub FixedOffset);

impl ToSql for PgTimeTz {
    fn to_sql(&self, _ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
        let micros = i64::from(self.0.num_seconds_from_midnight()) * 1_000_000
            + i64::from(self.0.nanosecond() / 1_000);
        out.put_i64(micros);
        out.put_i32(-self.1.local_minus_utc());
        Ok(IsNull::No)
    }

    fn accepts(ty: &Type) -> bool {
        *ty == Type::TIMETZ
    }

    to_sql_checked!();
}

impl<'a> FromSql<'a> for PgTimeTz {
    fn from_sql(_ty: &Type, raw: &'a [u8]) -> Result<Self, BoxError> {
        let raw: [u8; 12] = raw
            .try_into()
            .map_err(|_| format!("timetz value has {} bytes, expected 12", raw.len()))?;
        let (micros, zone) = raw.split_at(8);
        let micros = i64::from_be_bytes(micros.try_into()?);
        let zone = i32::from_be_bytes(zone.try_into()?);

        let secs = u32::try_from(micros.div_euclid(1_000_000))?;
        let nanos = u32::try_from(micros.rem_euclid(1_000_000) * 1_000)?;
        let time = NaiveTime::from_num_seconds_from_midnight_opt(secs, nanos)
            .ok_or("timetz time of day out of range")?;
        let offset = FixedOffset::east_opt(-zone).ok_or("timetz zone offset out of range")?;
        Ok(PgTimeTz(time, offset))
    }

    fn accepts(ty: &Type) -> bool {
        *ty == Type::TIMETZ
    }
}

/// Text payload of a Postgres enum column.
struct EnumText(String);

impl<'a> FromSql<'a> for EnumText {
    fn from_sql(_ty: &Type, raw: &'a [u8]) -> Result<Self, BoxError> {
        Ok(EnumText(std::str::from_utf8(raw)?.to_string()))
    }

    fn accepts(ty: &Type) -> bool {
        matches!(ty.kind(), Kind::Enum(_))
    }
}

fn cell<'a, T: FromSql<'a>>(row: &'a Row, idx: usize) -> SqlResult<Option<T>> {
    row.try_get::<_, Option<T>>(idx).map_err(|e| {
        let name = row.columns().get(idx).map_or("?", |c| c.name());
        SqlError::decode(name, e.to_string())
    })
}

impl Value {
    /// Decode column `idx` of a driver row by its declared type.
    pub fn from_pg_row(row: &Row, idx: usize) -> SqlResult<Value> {
        let Some(column) = row.columns().get(idx) else {
            return Err(SqlError::decode(
                format!("#{idx}"),
                "column index out of range",
            ));
        };
        let ty = column.type_();

        let value = if *ty == Type::BOOL {
            cell::<bool>(row, idx)?.map(Value::Bool)
        } else if *ty == Type::INT2 {
            cell::<i16>(row, idx)?.map(|v| Value::Int(v.into()))
        } else if *ty == Type::INT4 {
            cell::<i32>(row, idx)?.map(|v| Value::Int(v.into()))
        } else if *ty == Type::INT8 {
            cell::<i64>(row, idx)?.map(Value::Int)
        } else if *ty == Type::OID {
            cell::<u32>(row, idx)?.map(|v| Value::Int(v.into()))
        } else if *ty == Type::FLOAT4 {
            cell::<f32>(row, idx)?.map(|v| Value::Float(v.into()))
        } else if *ty == Type::FLOAT8 {
            cell::<f64>(row, idx)?.map(Value::Float)
        } else if *ty == Type::NUMERIC {
            decode_numeric(row, idx)?
        } else if *ty == Type::BYTEA {
            cell::<Vec<u8>>(row, idx)?.map(Value::Bytes)
        } else if *ty == Type::UUID {
            cell::<Uuid>(row, idx)?.map(Value::Uuid)
        } else if *ty == Type::JSON || *ty == Type::JSONB {
            cell::<serde_json::Value>(row, idx)?.map(Value::Json)
        } else if *ty == Type::DATE {
            cell::<NaiveDate>(row, idx)?.map(Value::Date)
        } else if *ty == Type::TIME {
            cell::<NaiveTime>(row, idx)?.map(Value::Time)
        } else if *ty == Type::TIMETZ {
            cell::<PgTimeTz>(row, idx)?.map(|PgTimeTz(t, offset)| Value::TimeTz(t, offset))
        } else if *ty == Type::TIMESTAMP {
            cell::<NaiveDateTime>(row, idx)?.map(Value::Timestamp)
        } else if *ty == Type::TIMESTAMPTZ {
            cell::<DateTime<FixedOffset>>(row, idx)?.map(Value::TimestampTz)
        } else if matches!(ty.kind(), Kind::Enum(_)) {
            cell::<EnumText>(row, idx)?.map(|v| Value::Text(v.0))
        } else if <String as FromSql<'static>>::accepts(ty) {
            cell::<String>(row, idx)?.map(Value::Text)
        } else {
            return Err(SqlError::decode(
                column.name(),
                format!("unsupported column type `{ty}`"),
            ));
        };

        Ok(value.unwrap_or(Value::Null))
    }
}

#[cfg(feature = "rust_decimal")]
fn decode_numeric(row: &Row, idx: usize) -> SqlResult<Option<Value>> {
    Ok(cell::<rust_decimal::Decimal>(row, idx)?.map(Value::Decimal))
}

#[cfg(not(feature = "rust_decimal"))]
fn decode_numeric(row: &Row, idx: usize) -> SqlResult<Option<Value>> {
    let name = row.columns().get(idx).map_or("?", |c| c.name());
    Err(SqlError::decode(
        name,
        "numeric columns require the `rust_decimal` feature",
    ))
}
