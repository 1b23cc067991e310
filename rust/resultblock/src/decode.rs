//! Type-dispatched decoding of block cells.
//!
//! Every flavor goes through [`CellDecoder::read`], which performs the one
//! accessor call a [`CellKind`] maps to and applies the NULL rules. The
//! flavors only differ in how the resulting [`Value`] is projected:
//! primitive (unboxed), object (boxed, temporals in the configured
//! representation) or string (canonical text).

use resultblock_common::Result;

use crate::accessor::{NativeAccessor, RawHandle};
use crate::format::{self, EngineFormatters};
use crate::options::DecodeSettings;
use crate::sentinel::{NullSentinel, decode_boolean};
use crate::types::CellKind;
use crate::value::{Calendar, TemporalRepr, Value};

/// A primitive client type readable through the engine's sentinel-encoded
/// getters.
pub trait PrimitiveValue: Copy + Default + Into<Value> {
    /// Reads the cell and maps the NULL sentinel to `None`.
    fn fetch<A>(accessor: &A, handle: RawHandle, column: usize, row: usize) -> Result<Option<Self>>
    where
        A: NativeAccessor + ?Sized;
}

impl PrimitiveValue for bool {
    fn fetch<A>(accessor: &A, handle: RawHandle, column: usize, row: usize) -> Result<Option<bool>>
    where
        A: NativeAccessor + ?Sized,
    {
        Ok(decode_boolean(accessor.get_byte(handle, column, row)?))
    }
}

macro_rules! impl_primitive_value {
    ($($t:ty => $getter:ident),* $(,)?) => {
        $(
            impl PrimitiveValue for $t {
                fn fetch<A>(
                    accessor: &A,
                    handle: RawHandle,
                    column: usize,
                    row: usize,
                ) -> Result<Option<$t>>
                where
                    A: NativeAccessor + ?Sized,
                {
                    Ok(accessor.$getter(handle, column, row)?.non_null())
                }
            }
        )*
    };
}

impl_primitive_value!(
    i8 => get_byte,
    i16 => get_short,
    i32 => get_int,
    i64 => get_long,
    f32 => get_float,
    f64 => get_double,
);

/// Decodes cells according to the block's [`DecodeSettings`].
#[derive(Debug, Clone)]
pub struct CellDecoder {
    temporal_repr: TemporalRepr,
    formatters: EngineFormatters,
}

impl CellDecoder {
    pub fn new(settings: &DecodeSettings) -> Result<CellDecoder> {
        Ok(CellDecoder {
            temporal_repr: settings.temporal_repr,
            formatters: EngineFormatters::new(settings.time_zone()?),
        })
    }

    pub fn temporal_repr(&self) -> TemporalRepr {
        self.temporal_repr
    }

    /// Reads one cell in its native representation, `None` for NULL.
    pub fn read<A>(
        &self,
        accessor: &A,
        handle: RawHandle,
        kind: CellKind,
        column: usize,
        row: usize,
    ) -> Result<Option<Value>>
    where
        A: NativeAccessor + ?Sized,
    {
        fn boxed<T: PrimitiveValue>(v: Option<T>) -> Option<Value> {
            v.map(Into::into)
        }

        let value = match kind {
            CellKind::Boolean => boxed(bool::fetch(accessor, handle, column, row)?),
            CellKind::Byte => boxed(i8::fetch(accessor, handle, column, row)?),
            CellKind::Short => boxed(i16::fetch(accessor, handle, column, row)?),
            CellKind::Int => boxed(i32::fetch(accessor, handle, column, row)?),
            CellKind::Long => boxed(i64::fetch(accessor, handle, column, row)?),
            CellKind::Float => boxed(f32::fetch(accessor, handle, column, row)?),
            CellKind::Double => boxed(f64::fetch(accessor, handle, column, row)?),
            CellKind::Decimal => accessor
                .get_decimal(handle, column, row)?
                .map(Value::Decimal),
            CellKind::Text => accessor
                .get_string(handle, column, row)?
                .map(Value::String),
            CellKind::RowId => accessor
                .get_row_id(handle, column, row)?
                .map(Value::String),
            CellKind::Blob => accessor.get_blob(handle, column, row)?.map(Value::Blob),
            CellKind::Date => accessor.get_date(handle, column, row)?.map(Value::Date),
            CellKind::Time { .. } => accessor.get_time(handle, column, row)?.map(Value::Time),
            CellKind::Timestamp { .. } => accessor
                .get_timestamp(handle, column, row)?
                .map(Value::Timestamp),
        };
        log::trace!("decoded cell ({column}, {row}) as {kind:?}");
        Ok(value)
    }

    /// Projects a natively read value into the object flavor.
    pub fn to_object(&self, kind: CellKind, value: Value) -> Value {
        if self.temporal_repr == TemporalRepr::Native {
            return value;
        }
        let offset = self.formatters.offset();
        match (kind, value) {
            (_, Value::Date(d)) => Value::Calendar(Calendar::from_date(d, offset)),
            (CellKind::Time { with_tz: true }, Value::Time(t)) => {
                Value::Calendar(Calendar::from_time(t + offset, offset))
            }
            (_, Value::Time(t)) => Value::Calendar(Calendar::from_time(t, offset)),
            (CellKind::Timestamp { with_tz: true }, Value::Timestamp(ts)) => {
                Value::Calendar(Calendar::from_utc(ts, offset))
            }
            (_, Value::Timestamp(ts)) => Value::Calendar(Calendar::from_local(ts, offset)),
            (_, other) => other,
        }
    }

    /// Projects a natively read value into the string flavor.
    pub fn to_text(&self, kind: CellKind, value: Value) -> String {
        match (kind, value) {
            (_, Value::String(s)) => s,
            (_, Value::Boolean(b)) => b.to_string(),
            (_, Value::Byte(v)) => v.to_string(),
            (_, Value::Short(v)) => v.to_string(),
            (_, Value::Int(v)) => v.to_string(),
            (_, Value::Long(v)) => v.to_string(),
            (_, Value::Float(v)) => format::format_float(v),
            (_, Value::Double(v)) => format::format_float(v),
            (_, Value::Decimal(d)) => format::format_decimal(&d),
            (_, Value::Blob(b)) => format::format_blob(&b),
            (_, Value::Date(d)) => self.formatters.format_date(d),
            (CellKind::Time { with_tz }, Value::Time(t)) => {
                self.formatters.format_time(t, with_tz)
            }
            (_, Value::Time(t)) => self.formatters.format_time(t, false),
            (CellKind::Timestamp { with_tz }, Value::Timestamp(ts)) => {
                self.formatters.format_timestamp(ts, with_tz)
            }
            (_, Value::Timestamp(ts)) => self.formatters.format_timestamp(ts, false),
            (_, Value::Calendar(cal)) => self.formatters.format_calendar(&cal),
        }
    }

    /// Object flavor: reads and boxes a cell, `None` for NULL.
    pub fn object<A>(
        &self,
        accessor: &A,
        handle: RawHandle,
        kind: CellKind,
        column: usize,
        row: usize,
    ) -> Result<Option<Value>>
    where
        A: NativeAccessor + ?Sized,
    {
        Ok(self
            .read(accessor, handle, kind, column, row)?
            .map(|value| self.to_object(kind, value)))
    }

    /// String flavor: reads and formats a cell, `None` for NULL.
    pub fn string<A>(
        &self,
        accessor: &A,
        handle: RawHandle,
        kind: CellKind,
        column: usize,
        row: usize,
    ) -> Result<Option<String>>
    where
        A: NativeAccessor + ?Sized,
    {
        Ok(self
            .read(accessor, handle, kind, column, row)?
            .map(|value| self.to_text(kind, value)))
    }
}
