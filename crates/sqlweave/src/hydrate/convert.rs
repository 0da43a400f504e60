use crate::value::Value;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use std::fmt;

/// A cell that cannot be assigned to its destination type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertError {
    message: String,
}

impl ConvertError {
    pub fn new(message: impl Into<String>) -> Self {
        ConvertError {
            message: message.into(),
        }
    }

    /// `found` value cannot become `expected`.
    pub fn mismatch(expected: &'static str, found: &Value) -> Self {
        Self::new(format!("cannot assign {} to {expected}", found.kind_name()))
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ConvertError {}

/// Conversion from a decoded cell into a destination field type.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self, ConvertError>;
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        Ok(value)
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        match value {
            Value::Bool(v) => Ok(v),
            other => Err(ConvertError::mismatch("bool", &other)),
        }
    }
}

macro_rules! int_from_value {
    ($($t:ty),* $(,)?) => {
        $(
            impl FromValue for $t {
                fn from_value(value: Value) -> Result<Self, ConvertError> {
                    match value {
                        Value::Int(v) => <$t>::try_from(v).map_err(|_| {
                            ConvertError::new(format!(
                                "value {v} out of range for {}",
                                stringify!($t)
                            ))
                        }),
                        other => Err(ConvertError::mismatch(stringify!($t), &other)),
                    }
                }
            }
        )*
    };
}

int_from_value!(i8, i16, i32, i64, u8, u16, u32, u64);

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        match value {
            Value::Float(v) => Ok(v),
            Value::Int(v) => Ok(v as f64),
            #[cfg(feature = "rust_decimal")]
            Value::Decimal(d) => {
                use rust_decimal::prelude::ToPrimitive;
                d.to_f64()
                    .ok_or_else(|| ConvertError::new(format!("decimal {d} out of range for f64")))
            }
            other => Err(ConvertError::mismatch("f64", &other)),
        }
    }
}

impl FromValue for f32 {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        let wide = f64::from_value(value)?;
        let narrow = wide as f32;
        if f64::from(narrow) == wide || wide.is_nan() {
            Ok(narrow)
        } else {
            Err(ConvertError::new(format!("{wide} does not fit in f32")))
        }
    }
}

#[cfg(feature = "rust_decimal")]
impl FromValue for rust_decimal::Decimal {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        match value {
            Value::Decimal(d) => Ok(d),
            Value::Int(v) => Ok(rust_decimal::Decimal::from(v)),
            Value::Float(v) => rust_decimal::Decimal::try_from(v)
                .map_err(|e| ConvertError::new(format!("float {v} is not a decimal: {e}"))),
            other => Err(ConvertError::mismatch("Decimal", &other)),
        }
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        match value {
            Value::Text(v) => Ok(v),
            Value::Uuid(v) => Ok(v.to_string()),
            other => Err(ConvertError::mismatch("String", &other)),
        }
    }
}

impl FromValue for Vec<u8> {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        match value {
            Value::Bytes(v) => Ok(v),
            Value::Text(v) => Ok(v.into_bytes()),
            other => Err(ConvertError::mismatch("Vec<u8>", &other)),
        }
    }
}

impl FromValue for uuid::Uuid {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        match value {
            Value::Uuid(v) => Ok(v),
            Value::Text(v) => uuid::Uuid::parse_str(&v)
                .map_err(|e| ConvertError::new(format!("invalid uuid {v:?}: {e}"))),
            other => Err(ConvertError::mismatch("Uuid", &other)),
        }
    }
}

impl FromValue for serde_json::Value {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        match value {
            Value::Json(v) => Ok(v),
            Value::Text(v) => serde_json::from_str(&v)
                .map_err(|e| ConvertError::new(format!("invalid json: {e}"))),
            other => Err(ConvertError::mismatch("serde_json::Value", &other)),
        }
    }
}

impl FromValue for NaiveDate {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        match value {
            Value::Date(v) => Ok(v),
            Value::Timestamp(v) => Ok(v.date()),
            other => Err(ConvertError::mismatch("NaiveDate", &other)),
        }
    }
}

impl FromValue for NaiveTime {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        match value {
            Value::Time(v) => Ok(v),
            Value::TimeTz(v, _) => Ok(v),
            other => Err(ConvertError::mismatch("NaiveTime", &other)),
        }
    }
}

impl FromValue for NaiveDateTime {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        match value {
            Value::Timestamp(v) => Ok(v),
            Value::TimestampTz(v) => Ok(v.naive_utc()),
            other => Err(ConvertError::mismatch("NaiveDateTime", &other)),
        }
    }
}

impl FromValue for DateTime<FixedOffset> {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        match value {
            Value::TimestampTz(v) => Ok(v),
            Value::Timestamp(v) => Ok(v.and_utc().fixed_offset()),
            other => Err(ConvertError::mismatch("DateTime<FixedOffset>", &other)),
        }
    }
}

impl FromValue for DateTime<Utc> {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        match value {
            Value::TimestampTz(v) => Ok(v.with_timezone(&Utc)),
            Value::Timestamp(v) => Ok(v.and_utc()),
            other => Err(ConvertError::mismatch("DateTime<Utc>", &other)),
        }
    }
}

/// Overwrite `slot` with `value`.
#[doc(hidden)]
pub fn assign_scalar<T: FromValue>(slot: &mut T, value: Value) -> Result<(), ConvertError> {
    *slot = T::from_value(value)?;
    Ok(())
}

/// Append `value` to `slot` unless an equal element is already present.
#[doc(hidden)]
pub fn collect_scalar<T: FromValue + PartialEq>(
    slot: &mut Vec<T>,
    value: Value,
) -> Result<(), ConvertError> {
    let item = T::from_value(value)?;
    if !slot.contains(&item) {
        slot.push(item);
    }
    Ok(())
}
