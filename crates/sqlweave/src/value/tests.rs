use super::*;
use chrono::{NaiveDate, NaiveTime, TimeZone};

#[test]
fn literal_forms() {
    assert_eq!(Value::Null.to_literal(), "NULL");
    assert_eq!(Value::Bool(true).to_literal(), "TRUE");
    assert_eq!(Value::Bool(false).to_literal(), "FALSE");
    assert_eq!(Value::Int(-12).to_literal(), "-12");
    assert_eq!(Value::Float(1.5).to_literal(), "1.5");
    assert_eq!(Value::from("o'clock").to_literal(), "'o''clock'");
}

#[test]
fn temporal_literals() {
    let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
    assert_eq!(Value::Date(date).to_literal(), "'2024-03-09'");

    let ts = date.and_hms_opt(8, 5, 0).unwrap();
    assert_eq!(Value::Timestamp(ts).to_literal(), "'2024-03-09 08:05:00'");

    let time = NaiveTime::from_hms_opt(23, 59, 1).unwrap();
    assert_eq!(Value::Time(time).to_literal(), "'23:59:01'");

    let tz = FixedOffset::east_opt(2 * 3600).unwrap();
    let tstz = tz.from_local_datetime(&ts).unwrap();
    assert_eq!(
        Value::TimestampTz(tstz).to_literal(),
        "'2024-03-09 08:05:00+02:00'"
    );
}

#[test]
fn custom_values_have_no_literal() {
    let value = Value::Custom(Param::new(42_i64));
    assert_eq!(value.to_literal(), UNSUPPORTED_LITERAL);
    assert_eq!(value.kind_name(), "custom");
}

#[test]
fn custom_values_never_compare_equal() {
    let a = Value::Custom(Param::new(1_i32));
    let b = a.clone();
    assert!(!a.same_as(&b));
    assert_ne!(a, b);
}

#[test]
fn option_converts_to_null() {
    assert!(Value::from(None::<i32>).is_null());
    assert_eq!(Value::from(Some(3_i32)), Value::Int(3));
}

#[test]
fn widening_conversions() {
    assert_eq!(Value::from(7_u8), Value::Int(7));
    assert_eq!(Value::from(u32::MAX), Value::Int(i64::from(u32::MAX)));
    assert_eq!(Value::from(2.5_f32), Value::Float(2.5));
    assert_eq!(Value::from(vec![1_u8, 2]), Value::Bytes(vec![1, 2]));
}

#[test]
fn key_text_skips_null() {
    let mut key = String::new();
    assert!(!Value::Null.write_key(&mut key));
    assert!(key.is_empty());

    assert!(Value::Int(5).write_key(&mut key));
    assert!(Value::from("a").write_key(&mut key));
    assert_eq!(key, "5a");
}

#[test]
fn utc_timestamps_keep_their_instant() {
    let utc = chrono::Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    match Value::from(utc) {
        Value::TimestampTz(ts) => assert_eq!(ts.timestamp(), utc.timestamp()),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn byte_keys_are_hex() {
    let mut a = String::new();
    let mut b = String::new();
    Value::Bytes(vec![0xff]).write_key(&mut a);
    Value::Bytes(vec![0xfe]).write_key(&mut b);
    assert_eq!(a, "ff");
    assert_ne!(a, b);
}

mod postgres_wire {
    use super::super::pg::PgTimeTz;
    use super::*;
    use bytes::BytesMut;
    use chrono::FixedOffset;
    use tokio_postgres::types::{FromSql, IsNull, ToSql, Type};

    fn one_oclock_plus_one() -> (NaiveTime, FixedOffset) {
        (
            NaiveTime::from_hms_micro_opt(1, 2, 3, 500).unwrap(),
            FixedOffset::east_opt(3600).unwrap(),
        )
    }

    fn timetz_wire(micros: i64, zone_west: i32) -> Vec<u8> {
        let mut raw = micros.to_be_bytes().to_vec();
        raw.extend_from_slice(&zone_west.to_be_bytes());
        raw
    }

    #[test]
    fn timetz_binds_as_micros_and_west_offset() {
        let (time, offset) = one_oclock_plus_one();
        let mut buf = BytesMut::new();
        let is_null = Value::TimeTz(time, offset)
            .to_sql_checked(&Type::TIMETZ, &mut buf)
            .unwrap();
        assert!(matches!(is_null, IsNull::No));
        assert_eq!(&buf[..], timetz_wire(3_723_000_500, -3600).as_slice());

        let mut buf = BytesMut::new();
        assert!(
            Value::TimeTz(time, offset)
                .to_sql_checked(&Type::TIME, &mut buf)
                .is_err()
        );
    }

    #[test]
    fn timetz_decodes_from_wire() {
        let (time, offset) = one_oclock_plus_one();
        let decoded = PgTimeTz::from_sql(&Type::TIMETZ, &timetz_wire(3_723_000_500, -3600)).unwrap();
        assert_eq!(decoded, PgTimeTz(time, offset));

        let west = PgTimeTz::from_sql(&Type::TIMETZ, &timetz_wire(0, 5 * 3600)).unwrap();
        assert_eq!(west.1.local_minus_utc(), -5 * 3600);

        assert!(PgTimeTz::from_sql(&Type::TIMETZ, &[0; 8]).is_err());
        assert!(PgTimeTz::from_sql(&Type::TIMETZ, &timetz_wire(-1, 0)).is_err());
    }

    #[cfg(feature = "rust_decimal")]
    #[test]
    fn plain_numbers_bind_to_numeric() {
        use rust_decimal::Decimal;

        let encoded = |value: Value| {
            let mut buf = BytesMut::new();
            value.to_sql_checked(&Type::NUMERIC, &mut buf).unwrap();
            buf
        };
        let expected = |decimal: Decimal| {
            let mut buf = BytesMut::new();
            decimal.to_sql(&Type::NUMERIC, &mut buf).unwrap();
            buf
        };

        assert_eq!(encoded(Value::Int(42)), expected(Decimal::from(42)));
        assert_eq!(encoded(Value::Float(1.5)), expected(Decimal::new(15, 1)));

        let mut buf = BytesMut::new();
        assert!(Value::Float(f64::NAN).to_sql_checked(&Type::NUMERIC, &mut buf).is_err());
    }

    #[cfg(not(feature = "rust_decimal"))]
    #[test]
    fn numeric_binding_names_the_feature() {
        let mut buf = BytesMut::new();
        let err = Value::Int(42)
            .to_sql_checked(&Type::NUMERIC, &mut buf)
            .err()
            .expect("NUMERIC binding should fail without rust_decimal");
        assert!(err.to_string().contains("rust_decimal"), "{err}");
    }
}
