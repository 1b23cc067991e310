//! Client-facing cell values.

use chrono::{
    DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How the object flavor represents temporal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemporalRepr {
    /// `chrono` date/time objects ([`Value::Date`], [`Value::Time`], [`Value::Timestamp`]).
    #[default]
    Native,
    /// Broken-down fields in the session time zone ([`Value::Calendar`]).
    Calendar,
}

/// A broken-down date and time in a fixed time zone.
///
/// Time-only values sit on 1970-01-01; date-only values at midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Calendar {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub nanosecond: u32,
    pub offset: FixedOffset,
}

impl Calendar {
    /// Splits a local date and time into fields, tagged with `offset`.
    pub fn from_local(local: NaiveDateTime, offset: FixedOffset) -> Calendar {
        Calendar {
            year: local.year(),
            month: local.month(),
            day: local.day(),
            hour: local.hour(),
            minute: local.minute(),
            second: local.second(),
            nanosecond: local.nanosecond(),
            offset,
        }
    }

    /// Converts a UTC date and time into fields local to `offset`.
    pub fn from_utc(utc: NaiveDateTime, offset: FixedOffset) -> Calendar {
        Calendar::from_local(offset.from_utc_datetime(&utc).naive_local(), offset)
    }

    pub fn from_date(date: NaiveDate, offset: FixedOffset) -> Calendar {
        Calendar::from_local(date.and_time(NaiveTime::MIN), offset)
    }

    pub fn from_time(time: NaiveTime, offset: FixedOffset) -> Calendar {
        Calendar::from_local(NaiveDate::default().and_time(time), offset)
    }

    /// The local date and time, `None` if the fields do not form a valid instant.
    pub fn naive_local(&self) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)?.and_hms_nano_opt(
            self.hour,
            self.minute,
            self.second,
            self.nanosecond,
        )
    }

    pub fn to_datetime(&self) -> Option<DateTime<FixedOffset>> {
        self.offset
            .from_local_datetime(&self.naive_local()?)
            .single()
    }
}

/// A decoded, non-NULL cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Boolean(bool),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    Blob(Vec<u8>),
    Date(NaiveDate),
    Time(NaiveTime),
    Timestamp(NaiveDateTime),
    Calendar(Calendar),
    Decimal(Decimal),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Boolean(_) => "boolean",
            Value::Byte(_) => "byte",
            Value::Short(_) => "short",
            Value::Int(_) => "int",
            Value::Long(_) => "long",
            Value::Float(_) => "float",
            Value::Double(_) => "double",
            Value::String(_) => "string",
            Value::Blob(_) => "blob",
            Value::Date(_) => "date",
            Value::Time(_) => "time",
            Value::Timestamp(_) => "timestamp",
            Value::Calendar(_) => "calendar",
            Value::Decimal(_) => "decimal",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Blob(b) => Some(b),
            _ => None,
        }
    }

    /// Widens any integer value to `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::Byte(v) => Some(v.into()),
            Value::Short(v) => Some(v.into()),
            Value::Int(v) => Some(v.into()),
            Value::Long(v) => Some(v),
            _ => None,
        }
    }

    /// Widens any floating point value to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Float(v) => Some(v.into()),
            Value::Double(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Value::Decimal(d) => Some(*d),
            _ => None,
        }
    }
}

macro_rules! impl_value_from {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Value {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_value_from!(
    bool => Boolean,
    i8 => Byte,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    String => String,
    Vec<u8> => Blob,
    NaiveDate => Date,
    NaiveTime => Time,
    NaiveDateTime => Timestamp,
    Calendar => Calendar,
    Decimal => Decimal,
);
