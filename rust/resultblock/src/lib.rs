//! Typed materialization of query result blocks held in native engine storage.
//!
//! An embedded engine keeps each fetched batch of rows in its own columnar
//! storage. A [`DataBlock`] binds to that storage once, decodes cells on demand
//! through the engine's [`NativeAccessor`] getters, and frees the storage
//! exactly once.
//!
//! Decoding dispatches on the column's [`SqlType`]: primitive columns carry
//! per-type NULL sentinels (see [`sentinel`]), object columns report NULL as an
//! absent value. Every cell can be read as a primitive, as a boxed [`Value`],
//! or as canonical text (see [`format`]).
//!
//! ```ignore
//! let mut block = BlockOptions::new(engine)
//!     .temporal_repr(TemporalRepr::Native)
//!     .create(rows, &[SqlType::Integer.code()], &["int"])?;
//! while block.wants_more() {
//!     block.bind_next_batch()?;
//! }
//! let v = block.get_int_value(0)?;
//! if block.was_last_read_null() { /* SQL NULL */ }
//! block.close()?;
//! ```

pub mod accessor;
pub mod block;
pub mod decode;
pub mod format;
pub mod handle;
pub mod options;
pub mod sentinel;
pub mod types;
pub mod value;

pub use accessor::{NativeAccessor, NativeEngine, RawHandle};
pub use block::{BlockState, DataBlock};
pub use options::{BlockOptions, DecodeSettings};
pub use types::{CellKind, ColumnType, ROW_ID_TYPE_NAME, SqlType};
pub use value::{Calendar, TemporalRepr, Value};

pub use resultblock_common::{Result, error::Error, error::ErrorKind};
