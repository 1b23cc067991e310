use std::str::FromStr;
use std::sync::Arc;

use chrono::{FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use resultblock::{
    BlockOptions, Calendar, DataBlock, DecodeSettings, SqlType, TemporalRepr, Value,
};
use resultblock_testkit::{AccessorKind, FakeColumn, FakeEngine};
use rust_decimal::Decimal;

fn bound_block(
    engine: &Arc<FakeEngine>,
    options: BlockOptions,
    columns: &[(SqlType, &str)],
) -> DataBlock {
    let codes = columns.iter().map(|(t, _)| t.code()).collect::<Vec<_>>();
    let names = columns.iter().map(|(_, n)| *n).collect::<Vec<_>>();
    let mut block = options.create(engine.row_count(), &codes, &names).unwrap();
    block.bind_next_batch().unwrap();
    block
}

fn ts(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f").unwrap()
}

fn offset(seconds: i32) -> FixedOffset {
    FixedOffset::east_opt(seconds).unwrap()
}

#[test]
fn test_blob_rendering() {
    let engine = Arc::new(FakeEngine::new(vec![FakeColumn::Blobs(vec![
        Some(vec![0x01, 0x02]),
        Some(vec![0x01, 0xff, 0x80]),
        Some(vec![]),
        None,
    ])]));
    let mut block = bound_block(
        &engine,
        BlockOptions::new(engine.clone()),
        &[(SqlType::LongVarbinary, "blob")],
    );

    assert_eq!(block.get_value_as_string(0).unwrap().as_deref(), Some("[1, 2]"));
    assert_eq!(
        block.get_object_value(0).unwrap(),
        Some(Value::Blob(vec![1, 2]))
    );
    // Bytes print signed.
    assert_eq!(block.string_at(0, 1).unwrap().as_deref(), Some("[1, -1, -128]"));
    assert_eq!(
        block.object_at(0, 1).unwrap(),
        Some(Value::Blob(vec![0x01, 0xff, 0x80]))
    );
    assert_eq!(block.string_at(0, 2).unwrap().as_deref(), Some("[]"));

    block.set_current_row(3).unwrap();
    assert_eq!(block.get_value_as_string(0).unwrap(), None);
    assert!(block.was_last_read_null());
    assert_eq!(block.get_object_value(0).unwrap(), None);
    assert!(block.was_last_read_null());
}

#[test]
fn test_text_columns() {
    let engine = Arc::new(FakeEngine::new(vec![
        FakeColumn::strings([Some("héllo"), None]),
        FakeColumn::strings([Some(""), Some("x")]),
    ]));
    let mut block = bound_block(
        &engine,
        BlockOptions::new(engine.clone()),
        &[(SqlType::Varchar, "varchar"), (SqlType::Char, "char")],
    );
    assert_eq!(
        block.get_object_value(0).unwrap(),
        Some(Value::String("héllo".into()))
    );
    // An empty string is a value, not NULL.
    assert_eq!(block.get_value_as_string(1).unwrap().as_deref(), Some(""));
    assert!(!block.was_last_read_null());

    block.next_row();
    assert_eq!(block.get_value_as_string(0).unwrap(), None);
    assert!(block.was_last_read_null());
}

#[test]
fn test_other_dispatch_by_native_name() {
    let engine = Arc::new(FakeEngine::new(vec![
        FakeColumn::RowIds(vec![Some(42), None]),
        FakeColumn::strings([Some(r#"{"a":1}"#), Some("null")]),
    ]));
    let mut block = bound_block(
        &engine,
        BlockOptions::new(engine.clone()),
        &[(SqlType::Other, "oid"), (SqlType::Other, "json")],
    );

    assert_eq!(block.get_value_as_string(0).unwrap().as_deref(), Some("42@0"));
    assert_eq!(engine.last_call(), Some((AccessorKind::RowId, 0, 0)));

    assert_eq!(
        block.get_object_value(1).unwrap(),
        Some(Value::String(r#"{"a":1}"#.into()))
    );
    assert_eq!(engine.last_call(), Some((AccessorKind::String, 1, 0)));

    block.next_row();
    assert_eq!(block.get_object_value(0).unwrap(), None);
    assert!(block.was_last_read_null());
    assert_eq!(engine.last_call(), Some((AccessorKind::RowId, 0, 1)));
}

#[test]
fn test_numeric_text() {
    let engine = Arc::new(FakeEngine::new(vec![
        FakeColumn::bytes([Some(-7)]),
        FakeColumn::longs([Some(1_234_567_890_123)]),
        FakeColumn::floats([Some(0.1)]),
        FakeColumn::doubles([Some(1e300)]),
    ]));
    let mut block = bound_block(
        &engine,
        BlockOptions::new(engine.clone()),
        &[
            (SqlType::TinyInt, "tinyint"),
            (SqlType::BigInt, "bigint"),
            (SqlType::Real, "real"),
            (SqlType::Double, "double"),
        ],
    );
    assert_eq!(block.get_value_as_string(0).unwrap().as_deref(), Some("-7"));
    assert_eq!(
        block.get_value_as_string(1).unwrap().as_deref(),
        Some("1234567890123")
    );
    let real = block.get_value_as_string(2).unwrap().unwrap();
    assert_eq!(f32::from_str(&real).unwrap(), 0.1f32);
    let double = block.get_value_as_string(3).unwrap().unwrap();
    assert_eq!(f64::from_str(&double).unwrap(), 1e300);

    assert_eq!(block.get_object_value(0).unwrap(), Some(Value::Byte(-7)));
    assert_eq!(block.get_object_value(2).unwrap(), Some(Value::Float(0.1)));
}

#[test]
fn test_decimal_columns() {
    let engine = Arc::new(FakeEngine::new(vec![
        FakeColumn::decimals(2, 1, [Some(-99), None]),
        FakeColumn::decimals(4, 2, [Some(1234), Some(5)]),
        FakeColumn::decimals(9, 3, [Some(123_456_789), Some(-1)]),
        FakeColumn::decimals(18, 2, [Some(i64::MAX), Some(0)]),
    ]));
    let mut block = bound_block(
        &engine,
        BlockOptions::new(engine.clone()),
        &[
            (SqlType::Decimal, "decimal"),
            (SqlType::Decimal, "decimal"),
            (SqlType::Decimal, "decimal"),
            (SqlType::Decimal, "decimal"),
        ],
    );

    let expected = ["-9.9", "12.34", "123456.789", "92233720368547758.07"];
    for (column, expected) in expected.into_iter().enumerate() {
        let text = block.get_value_as_string(column).unwrap().unwrap();
        assert_eq!(text, expected);
        let object = block.get_object_value(column).unwrap().unwrap();
        assert_eq!(object.as_decimal(), Some(Decimal::from_str(&text).unwrap()));
    }

    block.next_row();
    assert_eq!(block.get_value_as_string(0).unwrap(), None);
    assert!(block.was_last_read_null());
    assert_eq!(block.get_value_as_string(1).unwrap().as_deref(), Some("0.05"));
    assert_eq!(block.get_value_as_string(2).unwrap().as_deref(), Some("-0.001"));
    assert_eq!(block.get_value_as_string(3).unwrap().as_deref(), Some("0.00"));
}

#[test]
fn test_temporal_text_utc() {
    let engine = Arc::new(FakeEngine::new(vec![
        FakeColumn::Dates(vec![Some(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap())]),
        FakeColumn::Times(vec![Some(
            NaiveTime::from_hms_micro_opt(7, 5, 3, 120).unwrap(),
        )]),
        FakeColumn::Times(vec![Some(NaiveTime::from_hms_opt(23, 59, 59).unwrap())]),
        FakeColumn::Timestamps(vec![Some(ts("1999-12-31 23:59:59.999999"))]),
        FakeColumn::Timestamps(vec![Some(ts("2024-01-15 10:30:00"))]),
    ]));
    let block = bound_block(
        &engine,
        BlockOptions::new(engine.clone()),
        &[
            (SqlType::Date, "date"),
            (SqlType::Time, "time"),
            (SqlType::TimeWithTimezone, "timetz"),
            (SqlType::Timestamp, "timestamp"),
            (SqlType::TimestampWithTimezone, "timestamptz"),
        ],
    );

    let text = (0..5)
        .map(|c| block.string_at(c, 0).unwrap().unwrap())
        .collect::<Vec<_>>();
    assert_eq!(
        text,
        [
            "2024-02-29",
            "07:05:03.000120",
            "23:59:59.000000+00:00",
            "1999-12-31 23:59:59.999999",
            "2024-01-15 10:30:00.000000+00:00",
        ]
    );
}

#[test]
fn test_temporal_text_session_offset() {
    let engine = Arc::new(FakeEngine::new(vec![
        FakeColumn::Times(vec![Some(NaiveTime::from_hms_opt(23, 30, 0).unwrap())]),
        FakeColumn::Timestamps(vec![Some(ts("2024-01-15 23:30:00.5"))]),
        FakeColumn::Timestamps(vec![Some(ts("2024-01-15 23:30:00.5"))]),
    ]));
    let block = bound_block(
        &engine,
        BlockOptions::new(engine.clone()).time_zone(offset(2 * 3600)),
        &[
            (SqlType::TimeWithTimezone, "timetz"),
            (SqlType::TimestampWithTimezone, "timestamptz"),
            (SqlType::Timestamp, "timestamp"),
        ],
    );

    assert_eq!(
        block.string_at(0, 0).unwrap().as_deref(),
        Some("01:30:00.000000+02:00")
    );
    assert_eq!(
        block.string_at(1, 0).unwrap().as_deref(),
        Some("2024-01-16 01:30:00.500000+02:00")
    );
    // Wall clock columns ignore the session offset.
    assert_eq!(
        block.string_at(2, 0).unwrap().as_deref(),
        Some("2024-01-15 23:30:00.500000")
    );
}

#[test]
fn test_temporal_null_is_not_formatted() {
    let engine = Arc::new(FakeEngine::new(vec![
        FakeColumn::Dates(vec![None]),
        FakeColumn::Times(vec![None]),
        FakeColumn::Timestamps(vec![None]),
    ]));
    let mut block = bound_block(
        &engine,
        BlockOptions::new(engine.clone()).temporal_repr(TemporalRepr::Calendar),
        &[
            (SqlType::Date, "date"),
            (SqlType::TimeWithTimezone, "timetz"),
            (SqlType::Timestamp, "timestamp"),
        ],
    );
    for column in 0..3 {
        assert_eq!(block.get_value_as_string(column).unwrap(), None);
        assert!(block.was_last_read_null());
        assert_eq!(block.get_object_value(column).unwrap(), None);
        assert!(block.was_last_read_null());
    }
}

#[test]
fn test_native_temporal_objects() {
    let date = NaiveDate::from_ymd_opt(2020, 6, 1).unwrap();
    let stamp = ts("2020-06-01 12:00:00.25");
    let engine = Arc::new(FakeEngine::new(vec![
        FakeColumn::Dates(vec![Some(date)]),
        FakeColumn::Timestamps(vec![Some(stamp)]),
    ]));
    let block = bound_block(
        &engine,
        BlockOptions::new(engine.clone()).time_zone(offset(-5 * 3600)),
        &[(SqlType::Date, "date"), (SqlType::TimestampWithTimezone, "timestamptz")],
    );
    assert_eq!(block.temporal_repr(), TemporalRepr::Native);
    assert_eq!(block.object_at(0, 0).unwrap(), Some(Value::Date(date)));
    assert_eq!(block.object_at(1, 0).unwrap(), Some(Value::Timestamp(stamp)));
}

#[test]
fn test_calendar_temporal_objects() {
    let settings = DecodeSettings {
        temporal_repr: TemporalRepr::Calendar,
        utc_offset_seconds: 2 * 3600,
    };
    let engine = Arc::new(FakeEngine::new(vec![
        FakeColumn::Dates(vec![Some(NaiveDate::from_ymd_opt(2020, 6, 1).unwrap())]),
        FakeColumn::Times(vec![Some(NaiveTime::from_hms_opt(23, 0, 0).unwrap())]),
        FakeColumn::Timestamps(vec![Some(ts("2020-06-01 23:15:00"))]),
        FakeColumn::Timestamps(vec![Some(ts("2020-06-01 23:15:00"))]),
    ]));
    let block = bound_block(
        &engine,
        BlockOptions::new(engine.clone()).settings(settings),
        &[
            (SqlType::Date, "date"),
            (SqlType::TimeWithTimezone, "timetz"),
            (SqlType::TimestampWithTimezone, "timestamptz"),
            (SqlType::Timestamp, "timestamp"),
        ],
    );
    let tz = offset(2 * 3600);

    let Some(Value::Calendar(date)) = block.object_at(0, 0).unwrap() else {
        panic!("expected a calendar");
    };
    assert_eq!((date.year, date.month, date.day, date.hour), (2020, 6, 1, 0));

    let Some(Value::Calendar(time)) = block.object_at(1, 0).unwrap() else {
        panic!("expected a calendar");
    };
    assert_eq!((time.year, time.month, time.day), (1970, 1, 1));
    assert_eq!((time.hour, time.minute), (1, 0));
    assert_eq!(time.offset, tz);

    assert_eq!(
        block.object_at(2, 0).unwrap(),
        Some(Value::Calendar(Calendar::from_local(ts("2020-06-02 01:15:00"), tz)))
    );
    assert_eq!(
        block.object_at(3, 0).unwrap(),
        Some(Value::Calendar(Calendar::from_local(ts("2020-06-01 23:15:00"), tz)))
    );

    // The string flavor is independent of the object representation.
    assert_eq!(
        block.string_at(2, 0).unwrap().as_deref(),
        Some("2020-06-02 01:15:00.000000+02:00")
    );
}

#[test]
fn test_column_values_use_object_flavor() {
    let engine = Arc::new(FakeEngine::new(vec![FakeColumn::Timestamps(vec![
        Some(ts("2021-03-04 05:06:07")),
        None,
    ])]));
    let block = bound_block(
        &engine,
        BlockOptions::new(engine.clone()).temporal_repr(TemporalRepr::Calendar),
        &[(SqlType::Timestamp, "timestamp")],
    );
    let values = block.column_values(0, 0..2).unwrap();
    assert!(matches!(values[0], Some(Value::Calendar(Calendar { hour: 5, .. }))));
    assert_eq!(values[1], None);
}
