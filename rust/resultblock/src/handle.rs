//! Owned native block handle.

use std::sync::Arc;

use resultblock_common::{Result, error::Error};

use crate::accessor::{NativeEngine, RawHandle};
use crate::types::ColumnType;

/// Exclusive owner of a bound block's native storage.
///
/// The storage is freed exactly once: by [`NativeHandle::release`], or on drop
/// if it was never released explicitly. After release the handle reads as
/// [`RawHandle::EMPTY`].
pub struct NativeHandle {
    engine: Arc<dyn NativeEngine>,
    raw: RawHandle,
}

impl NativeHandle {
    /// Asks the engine to materialize storage for the block.
    pub fn acquire(
        engine: Arc<dyn NativeEngine>,
        row_count: usize,
        columns: &[ColumnType],
    ) -> Result<NativeHandle> {
        let raw = engine.init_block(row_count, columns)?;
        if raw.is_empty() {
            return Err(Error::invalid_format(
                "block handle",
                "engine returned the empty handle",
            ));
        }
        Ok(NativeHandle { engine, raw })
    }

    pub fn raw(&self) -> RawHandle {
        self.raw
    }

    pub fn is_released(&self) -> bool {
        self.raw.is_empty()
    }

    /// Frees the native storage. The handle is invalidated even when the
    /// engine reports a failure; subsequent calls do nothing.
    pub fn release(&mut self) -> Result<()> {
        if self.raw.is_empty() {
            return Ok(());
        }
        let result = self.engine.free_block(self.raw);
        self.raw = RawHandle::EMPTY;
        result
    }
}

impl Drop for NativeHandle {
    fn drop(&mut self) {
        let raw = self.raw;
        if let Err(e) = self.release() {
            log::warn!("failed to free native block {}: {e}", raw.get());
        }
    }
}

impl std::fmt::Debug for NativeHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeHandle").field("raw", &self.raw).finish()
    }
}
