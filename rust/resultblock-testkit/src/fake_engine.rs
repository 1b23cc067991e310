//! In-memory stand-in for the embedded engine.

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use resultblock::accessor::read_scaled_decimal;
use resultblock::sentinel::NullSentinel;
use resultblock::{ColumnType, NativeAccessor, NativeEngine, RawHandle};
use resultblock_common::{Result, error::Error};
use resultblock_value_conversions::DecimalStorage;
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FakeEngineError {
    #[error("unknown block handle {0}")]
    UnknownHandle(u64),

    #[error("column {column} holds {actual} values, cannot read {requested}")]
    TypeMismatch {
        column: usize,
        actual: &'static str,
        requested: AccessorKind,
    },

    #[error("cell ({column}, {row}) is outside of the fake storage")]
    OutOfBounds { column: usize, row: usize },

    #[error("block has {actual} columns, engine holds {expected}")]
    ColumnCountMismatch { expected: usize, actual: usize },

    #[error("block wants {requested} rows, engine holds {available}")]
    RowCountMismatch { requested: usize, available: usize },

    #[error("injected failure")]
    Injected,
}

/// The getter a native call went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessorKind {
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    String,
    RowId,
    Blob,
    Date,
    Time,
    Timestamp,
    Decimal,
}

impl AccessorKind {
    pub fn name(self) -> &'static str {
        match self {
            AccessorKind::Byte => "byte",
            AccessorKind::Short => "short",
            AccessorKind::Int => "int",
            AccessorKind::Long => "long",
            AccessorKind::Float => "float",
            AccessorKind::Double => "double",
            AccessorKind::String => "string",
            AccessorKind::RowId => "row_id",
            AccessorKind::Blob => "blob",
            AccessorKind::Date => "date",
            AccessorKind::Time => "time",
            AccessorKind::Timestamp => "timestamp",
            AccessorKind::Decimal => "decimal",
        }
    }
}

impl std::fmt::Display for AccessorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One column of fake native storage.
///
/// Primitive columns hold raw values, NULL sentinels included. Decimal columns
/// hold unscaled integers at the width their precision implies.
#[derive(Debug, Clone)]
pub enum FakeColumn {
    Bytes(Vec<i8>),
    Shorts(Vec<i16>),
    Ints(Vec<i32>),
    Longs(Vec<i64>),
    Floats(Vec<f32>),
    Doubles(Vec<f64>),
    Strings(Vec<Option<String>>),
    RowIds(Vec<Option<u64>>),
    Blobs(Vec<Option<Vec<u8>>>),
    Dates(Vec<Option<NaiveDate>>),
    Times(Vec<Option<NaiveTime>>),
    Timestamps(Vec<Option<NaiveDateTime>>),
    Decimals {
        digits: u32,
        scale: u32,
        unscaled: Vec<i64>,
    },
}

fn with_sentinel<T: NullSentinel>(values: impl IntoIterator<Item = Option<T>>) -> Vec<T> {
    values.into_iter().map(|v| v.unwrap_or(T::NULL)).collect()
}

impl FakeColumn {
    /// Booleans in the byte channel: `Some(true)` is stored as `1`.
    pub fn booleans(values: impl IntoIterator<Item = Option<bool>>) -> FakeColumn {
        FakeColumn::Bytes(with_sentinel(values.into_iter().map(|v| v.map(i8::from))))
    }

    pub fn bytes(values: impl IntoIterator<Item = Option<i8>>) -> FakeColumn {
        FakeColumn::Bytes(with_sentinel(values))
    }

    pub fn shorts(values: impl IntoIterator<Item = Option<i16>>) -> FakeColumn {
        FakeColumn::Shorts(with_sentinel(values))
    }

    pub fn ints(values: impl IntoIterator<Item = Option<i32>>) -> FakeColumn {
        FakeColumn::Ints(with_sentinel(values))
    }

    pub fn longs(values: impl IntoIterator<Item = Option<i64>>) -> FakeColumn {
        FakeColumn::Longs(with_sentinel(values))
    }

    pub fn floats(values: impl IntoIterator<Item = Option<f32>>) -> FakeColumn {
        FakeColumn::Floats(with_sentinel(values))
    }

    pub fn doubles(values: impl IntoIterator<Item = Option<f64>>) -> FakeColumn {
        FakeColumn::Doubles(with_sentinel(values))
    }

    pub fn strings<S: Into<String>>(values: impl IntoIterator<Item = Option<S>>) -> FakeColumn {
        FakeColumn::Strings(values.into_iter().map(|v| v.map(Into::into)).collect())
    }

    /// A `DECIMAL(digits, scale)` column from unscaled values.
    ///
    /// # Panics
    ///
    /// Panics if a value does not fit the storage width of `digits`.
    pub fn decimals(
        digits: u32,
        scale: u32,
        values: impl IntoIterator<Item = Option<i64>>,
    ) -> FakeColumn {
        let storage = DecimalStorage::for_precision(digits);
        let unscaled = values
            .into_iter()
            .map(|v| match v {
                Some(v) => {
                    assert!(storage.can_hold(v), "{v} does not fit {storage:?}");
                    v
                }
                None => storage.null_value(),
            })
            .collect();
        FakeColumn::Decimals {
            digits,
            scale,
            unscaled,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            FakeColumn::Bytes(v) => v.len(),
            FakeColumn::Shorts(v) => v.len(),
            FakeColumn::Ints(v) => v.len(),
            FakeColumn::Longs(v) => v.len(),
            FakeColumn::Floats(v) => v.len(),
            FakeColumn::Doubles(v) => v.len(),
            FakeColumn::Strings(v) => v.len(),
            FakeColumn::RowIds(v) => v.len(),
            FakeColumn::Blobs(v) => v.len(),
            FakeColumn::Dates(v) => v.len(),
            FakeColumn::Times(v) => v.len(),
            FakeColumn::Timestamps(v) => v.len(),
            FakeColumn::Decimals { unscaled, .. } => unscaled.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn type_name(&self) -> &'static str {
        match self {
            FakeColumn::Bytes(_) => "byte",
            FakeColumn::Shorts(_) => "short",
            FakeColumn::Ints(_) => "int",
            FakeColumn::Longs(_) => "long",
            FakeColumn::Floats(_) => "float",
            FakeColumn::Doubles(_) => "double",
            FakeColumn::Strings(_) => "string",
            FakeColumn::RowIds(_) => "oid",
            FakeColumn::Blobs(_) => "blob",
            FakeColumn::Dates(_) => "date",
            FakeColumn::Times(_) => "time",
            FakeColumn::Timestamps(_) => "timestamp",
            FakeColumn::Decimals { .. } => "decimal",
        }
    }

    fn decimal_storage(&self) -> Option<DecimalStorage> {
        match self {
            FakeColumn::Decimals { digits, .. } => Some(DecimalStorage::for_precision(*digits)),
            _ => None,
        }
    }
}

/// An in-memory [`NativeEngine`] over a fixed set of columns.
///
/// Every getter call is recorded (see [`FakeEngine::calls`]), as are block
/// initializations and releases, so tests can assert on what crossed the
/// native boundary. Reads and releases can be made to fail on demand.
pub struct FakeEngine {
    columns: Vec<FakeColumn>,
    row_count: usize,
    live: Mutex<HashSet<u64>>,
    next_handle: AtomicU64,
    init_calls: AtomicUsize,
    free_calls: AtomicUsize,
    calls: Mutex<Vec<(AccessorKind, usize, usize)>>,
    fail_reads: AtomicBool,
    fail_free: AtomicBool,
}

impl FakeEngine {
    /// # Panics
    ///
    /// Panics if the columns differ in length.
    pub fn new(columns: Vec<FakeColumn>) -> FakeEngine {
        let row_count = columns.first().map_or(0, FakeColumn::len);
        assert!(
            columns.iter().all(|c| c.len() == row_count),
            "fake columns must have equal lengths"
        );
        FakeEngine {
            columns,
            row_count,
            live: Mutex::new(HashSet::new()),
            next_handle: AtomicU64::new(1),
            init_calls: AtomicUsize::new(0),
            free_calls: AtomicUsize::new(0),
            calls: Mutex::new(Vec::new()),
            fail_reads: AtomicBool::new(false),
            fail_free: AtomicBool::new(false),
        }
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn init_calls(&self) -> usize {
        self.init_calls.load(Ordering::SeqCst)
    }

    pub fn free_calls(&self) -> usize {
        self.free_calls.load(Ordering::SeqCst)
    }

    /// Number of handles initialized and not yet freed.
    pub fn live_blocks(&self) -> usize {
        self.live.lock().expect("lock").len()
    }

    /// All getter calls so far, as `(getter, column, row)`.
    pub fn calls(&self) -> Vec<(AccessorKind, usize, usize)> {
        self.calls.lock().expect("lock").clone()
    }

    pub fn last_call(&self) -> Option<(AccessorKind, usize, usize)> {
        self.calls.lock().expect("lock").last().copied()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().expect("lock").clear();
    }

    /// Makes every subsequent getter call fail.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Makes every subsequent `free_block` fail (after forgetting the handle).
    pub fn fail_free(&self, fail: bool) {
        self.fail_free.store(fail, Ordering::SeqCst);
    }

    fn cell<T>(
        &self,
        handle: RawHandle,
        column: usize,
        row: usize,
        kind: AccessorKind,
        pick: impl FnOnce(&FakeColumn, usize) -> Option<T>,
    ) -> Result<T> {
        self.calls.lock().expect("lock").push((kind, column, row));
        let context = format!("get_{kind}");
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Error::native(context, FakeEngineError::Injected));
        }
        if !self.live.lock().expect("lock").contains(&handle.get()) {
            return Err(Error::native(
                context,
                FakeEngineError::UnknownHandle(handle.get()),
            ));
        }
        let Some(col) = self.columns.get(column).filter(|c| row < c.len()) else {
            return Err(Error::native(
                context,
                FakeEngineError::OutOfBounds { column, row },
            ));
        };
        pick(col, row).ok_or_else(|| {
            Error::native(
                context,
                FakeEngineError::TypeMismatch {
                    column,
                    actual: col.type_name(),
                    requested: kind,
                },
            )
        })
    }
}

impl NativeAccessor for FakeEngine {
    fn get_byte(&self, handle: RawHandle, column: usize, row: usize) -> Result<i8> {
        self.cell(handle, column, row, AccessorKind::Byte, |c, r| match c {
            FakeColumn::Bytes(v) => Some(v[r]),
            FakeColumn::Decimals { unscaled, .. }
                if c.decimal_storage() == Some(DecimalStorage::Byte) =>
            {
                Some(unscaled[r] as i8)
            }
            _ => None,
        })
    }

    fn get_short(&self, handle: RawHandle, column: usize, row: usize) -> Result<i16> {
        self.cell(handle, column, row, AccessorKind::Short, |c, r| match c {
            FakeColumn::Shorts(v) => Some(v[r]),
            FakeColumn::Decimals { unscaled, .. }
                if c.decimal_storage() == Some(DecimalStorage::Short) =>
            {
                Some(unscaled[r] as i16)
            }
            _ => None,
        })
    }

    fn get_int(&self, handle: RawHandle, column: usize, row: usize) -> Result<i32> {
        self.cell(handle, column, row, AccessorKind::Int, |c, r| match c {
            FakeColumn::Ints(v) => Some(v[r]),
            FakeColumn::Decimals { unscaled, .. }
                if c.decimal_storage() == Some(DecimalStorage::Int) =>
            {
                Some(unscaled[r] as i32)
            }
            _ => None,
        })
    }

    fn get_long(&self, handle: RawHandle, column: usize, row: usize) -> Result<i64> {
        self.cell(handle, column, row, AccessorKind::Long, |c, r| match c {
            FakeColumn::Longs(v) => Some(v[r]),
            FakeColumn::Decimals { unscaled, .. }
                if c.decimal_storage() == Some(DecimalStorage::Long) =>
            {
                Some(unscaled[r])
            }
            _ => None,
        })
    }

    fn get_float(&self, handle: RawHandle, column: usize, row: usize) -> Result<f32> {
        self.cell(handle, column, row, AccessorKind::Float, |c, r| match c {
            FakeColumn::Floats(v) => Some(v[r]),
            _ => None,
        })
    }

    fn get_double(&self, handle: RawHandle, column: usize, row: usize) -> Result<f64> {
        self.cell(handle, column, row, AccessorKind::Double, |c, r| match c {
            FakeColumn::Doubles(v) => Some(v[r]),
            _ => None,
        })
    }

    fn get_string(&self, handle: RawHandle, column: usize, row: usize) -> Result<Option<String>> {
        self.cell(handle, column, row, AccessorKind::String, |c, r| match c {
            FakeColumn::Strings(v) => Some(v[r].clone()),
            _ => None,
        })
    }

    fn get_row_id(&self, handle: RawHandle, column: usize, row: usize) -> Result<Option<String>> {
        self.cell(handle, column, row, AccessorKind::RowId, |c, r| match c {
            FakeColumn::RowIds(v) => Some(v[r].map(|oid| format!("{oid}@0"))),
            _ => None,
        })
    }

    fn get_blob(&self, handle: RawHandle, column: usize, row: usize) -> Result<Option<Vec<u8>>> {
        self.cell(handle, column, row, AccessorKind::Blob, |c, r| match c {
            FakeColumn::Blobs(v) => Some(v[r].clone()),
            _ => None,
        })
    }

    fn get_date(&self, handle: RawHandle, column: usize, row: usize) -> Result<Option<NaiveDate>> {
        self.cell(handle, column, row, AccessorKind::Date, |c, r| match c {
            FakeColumn::Dates(v) => Some(v[r]),
            _ => None,
        })
    }

    fn get_time(&self, handle: RawHandle, column: usize, row: usize) -> Result<Option<NaiveTime>> {
        self.cell(handle, column, row, AccessorKind::Time, |c, r| match c {
            FakeColumn::Times(v) => Some(v[r]),
            _ => None,
        })
    }

    fn get_timestamp(
        &self,
        handle: RawHandle,
        column: usize,
        row: usize,
    ) -> Result<Option<NaiveDateTime>> {
        self.cell(handle, column, row, AccessorKind::Timestamp, |c, r| match c {
            FakeColumn::Timestamps(v) => Some(v[r]),
            _ => None,
        })
    }

    fn get_decimal(&self, handle: RawHandle, column: usize, row: usize) -> Result<Option<Decimal>> {
        let (digits, scale) = self.cell(handle, column, row, AccessorKind::Decimal, |c, _| {
            match c {
                FakeColumn::Decimals { digits, scale, .. } => Some((*digits, *scale)),
                _ => None,
            }
        })?;
        read_scaled_decimal(self, handle, column, row, digits, scale)
    }
}

impl NativeEngine for FakeEngine {
    fn init_block(&self, row_count: usize, columns: &[ColumnType]) -> Result<RawHandle> {
        self.init_calls.fetch_add(1, Ordering::SeqCst);
        if columns.len() != self.columns.len() {
            return Err(Error::native(
                "init_block",
                FakeEngineError::ColumnCountMismatch {
                    expected: self.columns.len(),
                    actual: columns.len(),
                },
            ));
        }
        if row_count > self.row_count {
            return Err(Error::native(
                "init_block",
                FakeEngineError::RowCountMismatch {
                    requested: row_count,
                    available: self.row_count,
                },
            ));
        }
        let handle = self.next_handle.fetch_add(1, Ordering::SeqCst);
        self.live.lock().expect("lock").insert(handle);
        log::debug!("fake engine initialized block {handle}");
        Ok(RawHandle::new(handle))
    }

    fn free_block(&self, handle: RawHandle) -> Result<()> {
        self.free_calls.fetch_add(1, Ordering::SeqCst);
        if !self.live.lock().expect("lock").remove(&handle.get()) {
            return Err(Error::native(
                "free_block",
                FakeEngineError::UnknownHandle(handle.get()),
            ));
        }
        if self.fail_free.load(Ordering::SeqCst) {
            return Err(Error::native("free_block", FakeEngineError::Injected));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use resultblock::SqlType;

    use super::*;

    #[test]
    fn test_fake_engine_reads() {
        let engine = FakeEngine::new(vec![
            FakeColumn::ints([Some(1), None]),
            FakeColumn::decimals(4, 2, [Some(-1234), None]),
        ]);
        let columns = [
            ColumnType::from_sql(SqlType::Integer, "int"),
            ColumnType::from_sql(SqlType::Decimal, "decimal"),
        ];
        let handle = engine.init_block(2, &columns).unwrap();
        assert_eq!(engine.get_int(handle, 0, 0).unwrap(), 1);
        assert_eq!(engine.get_int(handle, 0, 1).unwrap(), i32::MIN);
        assert_eq!(engine.get_short(handle, 1, 0).unwrap(), -1234);
        assert_eq!(
            engine.get_decimal(handle, 1, 0).unwrap(),
            Some(Decimal::new(-1234, 2))
        );
        assert_eq!(engine.get_decimal(handle, 1, 1).unwrap(), None);
        assert_eq!(engine.last_call(), Some((AccessorKind::Short, 1, 1)));
        assert!(engine.get_long(handle, 0, 0).unwrap_err().is_native());
        assert!(engine.get_int(handle, 0, 2).unwrap_err().is_native());

        engine.free_block(handle).unwrap();
        assert_eq!(engine.live_blocks(), 0);
        assert!(engine.get_int(handle, 0, 0).unwrap_err().is_native());
        assert!(engine.free_block(handle).is_err());
    }

    #[test]
    fn test_fake_engine_init_checks() {
        let engine = FakeEngine::new(vec![FakeColumn::bytes([Some(1)])]);
        assert!(engine.init_block(1, &[]).is_err());
        let columns = [ColumnType::from_sql(SqlType::TinyInt, "tinyint")];
        assert!(engine.init_block(2, &columns).is_err());
        assert!(!engine.init_block(1, &columns).unwrap().is_empty());
        assert_eq!(engine.init_calls(), 3);
    }
}
