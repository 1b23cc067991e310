//! Canonical textual forms of cell values, used by the string decode flavor.
//!
//! Temporal values are rendered through [`EngineFormatters`], which hold one
//! specifier pattern per temporal column type. The engine's canonical patterns are:
//!
//! | Type                     | Pattern                              |
//! |--------------------------|--------------------------------------|
//! | date                     | `yyyy-MM-dd`                         |
//! | time                     | `HH:mm:ss.ffffff`                    |
//! | time with time zone      | `HH:mm:ss.ffffffXXX`                 |
//! | timestamp                | `yyyy-MM-dd HH:mm:ss.ffffff`         |
//! | timestamp with time zone | `yyyy-MM-dd HH:mm:ss.ffffffXXX`      |
//!
//! Values of the time zone variants are stored in UTC and printed in the
//! session offset.

use std::fmt::{self, Write};

use chrono::{
    Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike,
};
use itertools::Itertools;
use rust_decimal::Decimal;

use crate::value::Calendar;

#[allow(non_camel_case_types)]
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormatSpec {
    yyyy,
    MM,
    dd,
    HH,
    mm,
    ss,
    ffffff,
    XXX,
    Delimiter(char),
}

impl FormatSpec {
    fn write<W: Write>(&self, t: &TemporalParts, w: &mut W) -> fmt::Result {
        match *self {
            FormatSpec::yyyy => write!(w, "{:04}", t.year),
            FormatSpec::MM => write!(w, "{:02}", t.month),
            FormatSpec::dd => write!(w, "{:02}", t.day),
            FormatSpec::HH => write!(w, "{:02}", t.hour),
            FormatSpec::mm => write!(w, "{:02}", t.minute),
            FormatSpec::ss => write!(w, "{:02}", t.second),
            FormatSpec::ffffff => write!(w, "{:06}", t.fraction_nanos() / 1_000),
            FormatSpec::XXX => {
                let secs = t.offset.local_minus_utc();
                let sign = if secs < 0 { '-' } else { '+' };
                let secs = secs.unsigned_abs();
                write!(w, "{sign}{:02}:{:02}", secs / 3600, secs % 3600 / 60)
            }
            FormatSpec::Delimiter(ch) => w.write_char(ch),
        }
    }
}

/// Broken-down temporal fields handed to a `TemporalFormat`.
#[derive(Debug, Clone, Copy)]
struct TemporalParts {
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
    nanosecond: u32,
    offset: FixedOffset,
}

impl TemporalParts {
    fn from_datetime(local: NaiveDateTime, offset: FixedOffset) -> TemporalParts {
        TemporalParts {
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

    fn from_date(date: NaiveDate, offset: FixedOffset) -> TemporalParts {
        TemporalParts::from_datetime(date.and_time(NaiveTime::MIN), offset)
    }

    fn from_time(time: NaiveTime, offset: FixedOffset) -> TemporalParts {
        TemporalParts::from_datetime(NaiveDate::default().and_time(time), offset)
    }

    fn from_calendar(cal: &Calendar) -> TemporalParts {
        TemporalParts {
            year: cal.year,
            month: cal.month,
            day: cal.day,
            hour: cal.hour,
            minute: cal.minute,
            second: cal.second,
            nanosecond: cal.nanosecond,
            offset: cal.offset,
        }
    }

    // Leap seconds are represented with nanosecond >= 1e9; they print as
    // the last representable fraction of the second.
    fn fraction_nanos(&self) -> u32 {
        self.nanosecond.min(999_999_999)
    }
}

/// A temporal output pattern as a sequence of specifiers.
#[derive(Debug, Clone)]
struct TemporalFormat {
    specs: Vec<FormatSpec>,
}

impl TemporalFormat {
    fn date() -> TemporalFormat {
        use FormatSpec::*;
        TemporalFormat {
            specs: vec![yyyy, Delimiter('-'), MM, Delimiter('-'), dd],
        }
    }

    fn time(with_tz: bool) -> TemporalFormat {
        use FormatSpec::*;
        let mut specs = vec![HH, Delimiter(':'), mm, Delimiter(':'), ss, Delimiter('.'), ffffff];
        if with_tz {
            specs.push(XXX);
        }
        TemporalFormat { specs }
    }

    fn timestamp(with_tz: bool) -> TemporalFormat {
        let mut specs = TemporalFormat::date().specs;
        specs.push(FormatSpec::Delimiter(' '));
        specs.extend(TemporalFormat::time(with_tz).specs);
        TemporalFormat { specs }
    }

    fn write<W: Write>(&self, parts: &TemporalParts, w: &mut W) -> fmt::Result {
        for spec in self.specs.iter() {
            spec.write(parts, w)?;
        }
        Ok(())
    }

    fn format(&self, parts: &TemporalParts) -> String {
        let mut s = String::with_capacity(32);
        // Writing into a String never fails.
        let _ = self.write(parts, &mut s);
        s
    }
}

/// The engine's canonical printers for every temporal column type, bound to
/// the session time zone offset.
#[derive(Debug, Clone)]
pub struct EngineFormatters {
    date: TemporalFormat,
    time: TemporalFormat,
    time_tz: TemporalFormat,
    timestamp: TemporalFormat,
    timestamp_tz: TemporalFormat,
    offset: FixedOffset,
}

impl EngineFormatters {
    pub fn new(offset: FixedOffset) -> EngineFormatters {
        EngineFormatters {
            date: TemporalFormat::date(),
            time: TemporalFormat::time(false),
            time_tz: TemporalFormat::time(true),
            timestamp: TemporalFormat::timestamp(false),
            timestamp_tz: TemporalFormat::timestamp(true),
            offset,
        }
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn format_date(&self, date: NaiveDate) -> String {
        self.date.format(&TemporalParts::from_date(date, self.offset))
    }

    pub fn format_time(&self, time: NaiveTime, with_tz: bool) -> String {
        if with_tz {
            let local = time + self.offset;
            self.time_tz
                .format(&TemporalParts::from_time(local, self.offset))
        } else {
            self.time.format(&TemporalParts::from_time(time, self.offset))
        }
    }

    pub fn format_timestamp(&self, ts: NaiveDateTime, with_tz: bool) -> String {
        if with_tz {
            let local = self.offset.from_utc_datetime(&ts).naive_local();
            self.timestamp_tz
                .format(&TemporalParts::from_datetime(local, self.offset))
        } else {
            self.timestamp
                .format(&TemporalParts::from_datetime(ts, self.offset))
        }
    }

    /// Prints broken-down fields with the timestamp-with-time-zone pattern,
    /// in the calendar's own offset.
    pub fn format_calendar(&self, cal: &Calendar) -> String {
        self.timestamp_tz.format(&TemporalParts::from_calendar(cal))
    }
}

/// Renders a byte sequence as `[b0, b1, ...]` with signed decimal byte values.
pub fn format_blob(bytes: &[u8]) -> String {
    format!("[{}]", bytes.iter().map(|&b| b as i8).join(", "))
}

/// Renders a decimal in plain notation, keeping its scale.
pub fn format_decimal(value: &Decimal) -> String {
    value.to_string()
}

/// Renders a floating point number in its shortest round-tripping form.
pub fn format_float<F: dtoa::Float>(value: F) -> String {
    dtoa::Buffer::new().format(value).to_string()
}
