//! The capability surface of the native engine consumed by the decoder.
//!
//! The engine owns the column storage; a block only ever sees it through an
//! opaque [`RawHandle`] and the per-type getters of [`NativeAccessor`]. Every
//! getter assumes the handle is live and `(column, row)` is inside the block;
//! [`crate::block::DataBlock`] checks both before crossing this boundary.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use resultblock_common::Result;
use resultblock_value_conversions::{DecimalStorage, convert_scaled_to_decimal};
use rust_decimal::Decimal;

use crate::sentinel::NullSentinel;
use crate::types::ColumnType;

/// Opaque engine handle of a bound block. Zero is the empty handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RawHandle(u64);

impl RawHandle {
    pub const EMPTY: RawHandle = RawHandle(0);

    pub fn new(value: u64) -> RawHandle {
        RawHandle(value)
    }

    pub fn get(self) -> u64 {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// Per-type cell getters of the native engine.
///
/// Primitive getters return the raw stored value, NULL sentinel included.
/// Object getters return `None` for NULL.
pub trait NativeAccessor: Send + Sync {
    fn get_byte(&self, handle: RawHandle, column: usize, row: usize) -> Result<i8>;

    fn get_short(&self, handle: RawHandle, column: usize, row: usize) -> Result<i16>;

    fn get_int(&self, handle: RawHandle, column: usize, row: usize) -> Result<i32>;

    fn get_long(&self, handle: RawHandle, column: usize, row: usize) -> Result<i64>;

    fn get_float(&self, handle: RawHandle, column: usize, row: usize) -> Result<f32>;

    fn get_double(&self, handle: RawHandle, column: usize, row: usize) -> Result<f64>;

    fn get_string(&self, handle: RawHandle, column: usize, row: usize) -> Result<Option<String>>;

    /// Reads a row identifier in its textual form.
    fn get_row_id(&self, handle: RawHandle, column: usize, row: usize) -> Result<Option<String>>;

    fn get_blob(&self, handle: RawHandle, column: usize, row: usize) -> Result<Option<Vec<u8>>>;

    fn get_date(&self, handle: RawHandle, column: usize, row: usize) -> Result<Option<NaiveDate>>;

    fn get_time(&self, handle: RawHandle, column: usize, row: usize) -> Result<Option<NaiveTime>>;

    fn get_timestamp(
        &self,
        handle: RawHandle,
        column: usize,
        row: usize,
    ) -> Result<Option<NaiveDateTime>>;

    fn get_decimal(&self, handle: RawHandle, column: usize, row: usize)
    -> Result<Option<Decimal>>;
}

/// The engine side of the block lifecycle, on top of the cell getters.
pub trait NativeEngine: NativeAccessor {
    /// Materializes native storage for a block of `row_count` rows.
    fn init_block(&self, row_count: usize, columns: &[ColumnType]) -> Result<RawHandle>;

    /// Releases the storage behind `handle`. Called at most once per handle.
    fn free_block(&self, handle: RawHandle) -> Result<()>;
}

/// Reads a decimal kept by the engine as a scaled integer whose width follows
/// from the declared `digits`.
///
/// Engines storing decimals this way can implement
/// [`NativeAccessor::get_decimal`] on top of their integer getters with this.
pub fn read_scaled_decimal<A>(
    accessor: &A,
    handle: RawHandle,
    column: usize,
    row: usize,
    digits: u32,
    scale: u32,
) -> Result<Option<Decimal>>
where
    A: NativeAccessor + ?Sized,
{
    let unscaled = match DecimalStorage::for_precision(digits) {
        DecimalStorage::Byte => accessor.get_byte(handle, column, row)?.non_null().map(i64::from),
        DecimalStorage::Short => accessor
            .get_short(handle, column, row)?
            .non_null()
            .map(i64::from),
        DecimalStorage::Int => accessor.get_int(handle, column, row)?.non_null().map(i64::from),
        DecimalStorage::Long => accessor.get_long(handle, column, row)?.non_null(),
    };
    unscaled
        .map(|value| convert_scaled_to_decimal(value, scale))
        .transpose()
}
