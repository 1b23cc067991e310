//! A fetched block of result rows and its lifecycle.

use std::ops::Range;
use std::sync::Arc;

use resultblock_common::{
    Result,
    error::Error,
    result::{verify_cell, verify_rows},
};

use crate::accessor::{NativeEngine, RawHandle};
use crate::decode::{CellDecoder, PrimitiveValue};
use crate::handle::NativeHandle;
use crate::options::DecodeSettings;
use crate::types::{CellKind, ColumnType};
use crate::value::{TemporalRepr, Value};

/// Lifecycle state of a [`DataBlock`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockState {
    /// No native storage yet; the fetch loop must bind the block.
    Unbound,
    /// Native storage is materialized and cells can be decoded.
    Bound,
    /// Native storage was freed; the block is unusable.
    Released,
}

impl BlockState {
    fn name(self) -> &'static str {
        match self {
            BlockState::Unbound => "unbound",
            BlockState::Bound => "bound",
            BlockState::Released => "released",
        }
    }
}

enum Backing {
    Unbound,
    Bound(NativeHandle),
    Released,
}

/// One fetched batch of result rows, decoded cell by cell from native storage.
///
/// A block is created unbound with its column metadata, bound once by the
/// fetch loop ([`DataBlock::bind_next_batch`]), and released by
/// [`DataBlock::close`] or on drop. Cells can only be decoded while bound.
///
/// Cells are read in three flavors:
/// - primitive (`get_int_value`, ...): the raw value, or zero when NULL;
/// - object ([`DataBlock::get_object_value`]): a boxed [`Value`];
/// - string ([`DataBlock::get_value_as_string`]): the canonical text.
///
/// The `get_*` methods read the current row and record whether the value was
/// NULL, see [`DataBlock::was_last_read_null`]. The `*_at` methods take an
/// explicit row and return `None` for NULL without touching that flag.
pub struct DataBlock {
    engine: Arc<dyn NativeEngine>,
    columns: Vec<ColumnType>,
    kinds: Vec<Option<CellKind>>,
    row_count: usize,
    current_row: usize,
    backing: Backing,
    last_read_was_null: bool,
    decoder: CellDecoder,
}

impl DataBlock {
    /// Creates an unbound block. See also [`crate::options::BlockOptions`].
    pub fn new(
        engine: Arc<dyn NativeEngine>,
        row_count: usize,
        columns: Vec<ColumnType>,
        settings: &DecodeSettings,
    ) -> Result<DataBlock> {
        let decoder = CellDecoder::new(settings)?;
        let kinds = columns.iter().map(ColumnType::cell_kind).collect();
        Ok(DataBlock {
            engine,
            columns,
            kinds,
            row_count,
            current_row: 0,
            backing: Backing::Unbound,
            last_read_was_null: false,
            decoder,
        })
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[ColumnType] {
        &self.columns
    }

    pub fn temporal_repr(&self) -> TemporalRepr {
        self.decoder.temporal_repr()
    }

    pub fn state(&self) -> BlockState {
        match self.backing {
            Backing::Unbound => BlockState::Unbound,
            Backing::Bound(_) => BlockState::Bound,
            Backing::Released => BlockState::Released,
        }
    }

    /// The engine handle of the bound block, [`RawHandle::EMPTY`] otherwise.
    pub fn raw_handle(&self) -> RawHandle {
        match &self.backing {
            Backing::Bound(handle) => handle.raw(),
            _ => RawHandle::EMPTY,
        }
    }

    /// Returns `true` while the block still waits for its native storage.
    pub fn wants_more(&self) -> bool {
        matches!(self.backing, Backing::Unbound)
    }

    /// Binds native storage for all rows of the block.
    ///
    /// Binding an already bound block does nothing. Binding a released block
    /// is an error.
    pub fn bind_next_batch(&mut self) -> Result<()> {
        match self.backing {
            Backing::Unbound => {
                let handle =
                    NativeHandle::acquire(self.engine.clone(), self.row_count, &self.columns)?;
                log::debug!(
                    "bound block of {} rows x {} columns to native handle {}",
                    self.row_count,
                    self.columns.len(),
                    handle.raw().get()
                );
                self.backing = Backing::Bound(handle);
                Ok(())
            }
            Backing::Bound(_) => Ok(()),
            Backing::Released => Err(Error::lifecycle("bind", BlockState::Released.name())),
        }
    }

    /// Releases the native storage. Closing a closed block does nothing.
    ///
    /// An engine failure while freeing is returned, but the block is released
    /// either way.
    pub fn close(&mut self) -> Result<()> {
        match std::mem::replace(&mut self.backing, Backing::Released) {
            Backing::Bound(mut handle) => {
                let raw = handle.raw();
                let result = handle.release();
                match &result {
                    Ok(()) => log::debug!("released native block {}", raw.get()),
                    Err(e) => log::warn!("failed to free native block {}: {e}", raw.get()),
                }
                result
            }
            Backing::Unbound | Backing::Released => Ok(()),
        }
    }

    pub fn current_row(&self) -> usize {
        self.current_row
    }

    /// Moves the cursor to `row`.
    pub fn set_current_row(&mut self, row: usize) -> Result<()> {
        if row >= self.row_count {
            return Err(Error::out_of_range(0, row, self.columns.len(), self.row_count));
        }
        self.current_row = row;
        Ok(())
    }

    /// Advances the cursor; returns `false` when it is already on the last row.
    pub fn next_row(&mut self) -> bool {
        if self.current_row + 1 < self.row_count {
            self.current_row += 1;
            true
        } else {
            false
        }
    }

    /// Whether the last `get_*` read produced SQL NULL. A failed read resets
    /// the flag.
    pub fn was_last_read_null(&self) -> bool {
        self.last_read_was_null
    }

    pub fn get_boolean_value(&mut self, column: usize) -> Result<bool> {
        self.get_primitive(column)
    }

    pub fn get_byte_value(&mut self, column: usize) -> Result<i8> {
        self.get_primitive(column)
    }

    pub fn get_short_value(&mut self, column: usize) -> Result<i16> {
        self.get_primitive(column)
    }

    pub fn get_int_value(&mut self, column: usize) -> Result<i32> {
        self.get_primitive(column)
    }

    pub fn get_long_value(&mut self, column: usize) -> Result<i64> {
        self.get_primitive(column)
    }

    pub fn get_float_value(&mut self, column: usize) -> Result<f32> {
        self.get_primitive(column)
    }

    pub fn get_double_value(&mut self, column: usize) -> Result<f64> {
        self.get_primitive(column)
    }

    /// Reads the current row's cell as an object, `None` for NULL.
    pub fn get_object_value(&mut self, column: usize) -> Result<Option<Value>> {
        self.last_read_was_null = false;
        let value = self.object_at(column, self.current_row)?;
        self.last_read_was_null = value.is_none();
        Ok(value)
    }

    /// Reads the current row's cell as canonical text, `None` for NULL.
    pub fn get_value_as_string(&mut self, column: usize) -> Result<Option<String>> {
        self.last_read_was_null = false;
        let value = self.string_at(column, self.current_row)?;
        self.last_read_was_null = value.is_none();
        Ok(value)
    }

    /// Reads a cell through the primitive getter matching `T`, regardless of
    /// the column's declared type.
    pub fn primitive_at<T: PrimitiveValue>(&self, column: usize, row: usize) -> Result<Option<T>> {
        let handle = self.checked_handle(column, row)?;
        T::fetch(self.engine.as_ref(), handle, column, row)
    }

    pub fn object_at(&self, column: usize, row: usize) -> Result<Option<Value>> {
        let handle = self.checked_handle(column, row)?;
        let kind = self.cell_kind(column)?;
        self.decoder
            .object(self.engine.as_ref(), handle, kind, column, row)
    }

    pub fn string_at(&self, column: usize, row: usize) -> Result<Option<String>> {
        let handle = self.checked_handle(column, row)?;
        let kind = self.cell_kind(column)?;
        self.decoder
            .string(self.engine.as_ref(), handle, kind, column, row)
    }

    /// Object values of a range of rows of one column.
    pub fn column_values(&self, column: usize, rows: Range<usize>) -> Result<Vec<Option<Value>>> {
        let handle = self.bound_handle("decode")?;
        verify_rows(column, &rows, self.columns.len(), self.row_count)?;
        let kind = self.cell_kind(column)?;
        rows.map(|row| {
            self.decoder
                .object(self.engine.as_ref(), handle, kind, column, row)
        })
        .collect()
    }

    /// Per-row NULL flags of a range of rows of one column.
    pub fn null_mask(&self, column: usize, rows: Range<usize>) -> Result<Vec<bool>> {
        let handle = self.bound_handle("decode")?;
        verify_rows(column, &rows, self.columns.len(), self.row_count)?;
        let kind = self.cell_kind(column)?;
        rows.map(|row| {
            self.decoder
                .read(self.engine.as_ref(), handle, kind, column, row)
                .map(|value| value.is_none())
        })
        .collect()
    }

    fn get_primitive<T: PrimitiveValue>(&mut self, column: usize) -> Result<T> {
        self.last_read_was_null = false;
        let value = self.primitive_at::<T>(column, self.current_row)?;
        self.last_read_was_null = value.is_none();
        Ok(value.unwrap_or_default())
    }

    fn bound_handle(&self, operation: &str) -> Result<RawHandle> {
        match &self.backing {
            Backing::Bound(handle) => Ok(handle.raw()),
            _ => Err(Error::lifecycle(operation, self.state().name())),
        }
    }

    fn checked_handle(&self, column: usize, row: usize) -> Result<RawHandle> {
        let handle = self.bound_handle("decode")?;
        verify_cell(column, row, self.columns.len(), self.row_count)?;
        Ok(handle)
    }

    fn cell_kind(&self, column: usize) -> Result<CellKind> {
        self.kinds[column]
            .ok_or_else(|| Error::unrecognized_type_tag(column, self.columns[column].code()))
    }
}

impl std::fmt::Debug for DataBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataBlock")
            .field("columns", &self.columns)
            .field("row_count", &self.row_count)
            .field("current_row", &self.current_row)
            .field("state", &self.state())
            .finish()
    }
}
