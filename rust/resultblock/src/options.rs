//! Block creation options.

use std::sync::Arc;

use chrono::FixedOffset;
use resultblock_common::{Result, error::Error, verify_arg};
use serde::{Deserialize, Serialize};

use crate::accessor::NativeEngine;
use crate::block::DataBlock;
use crate::types::ColumnType;
use crate::value::TemporalRepr;

/// The serializable part of the decode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeSettings {
    /// Representation of temporal cells in the object flavor.
    pub temporal_repr: TemporalRepr,
    /// Session time zone as seconds east of UTC. Time zone aware columns are
    /// printed and split into calendars in this offset.
    pub utc_offset_seconds: i32,
}

impl DecodeSettings {
    pub fn time_zone(&self) -> Result<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_seconds).ok_or_else(|| {
            Error::invalid_arg(
                "utc_offset_seconds",
                format!("{} is not a valid UTC offset", self.utc_offset_seconds),
            )
        })
    }
}

/// Options for creating a [`DataBlock`].
pub struct BlockOptions {
    engine: Arc<dyn NativeEngine>,
    settings: DecodeSettings,
}

impl BlockOptions {
    /// Creates options for blocks backed by `engine`, with default settings:
    /// native temporal objects and a UTC session time zone.
    pub fn new(engine: Arc<dyn NativeEngine>) -> BlockOptions {
        BlockOptions {
            engine,
            settings: DecodeSettings::default(),
        }
    }

    /// Replaces all decode settings at once.
    pub fn settings(mut self, settings: DecodeSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Sets the temporal representation of the object flavor.
    pub fn temporal_repr(mut self, repr: TemporalRepr) -> Self {
        self.settings.temporal_repr = repr;
        self
    }

    /// Sets the session time zone.
    pub fn time_zone(mut self, offset: FixedOffset) -> Self {
        self.settings.utc_offset_seconds = offset.local_minus_utc();
        self
    }

    /// Creates an unbound block of `row_count` rows.
    ///
    /// `type_codes` holds the JDBC type code of each column and
    /// `native_types` the engine's type name of each column; both must have
    /// one entry per column. Codes without a decode mapping are accepted here
    /// and reported when such a column is decoded.
    pub fn create<S: AsRef<str>>(
        self,
        row_count: usize,
        type_codes: &[i32],
        native_types: &[S],
    ) -> Result<DataBlock> {
        verify_arg!(native_types, native_types.len() == type_codes.len());
        let columns = type_codes
            .iter()
            .zip(native_types)
            .map(|(&code, name)| ColumnType::new(code, name.as_ref()))
            .collect();
        self.create_with_columns(row_count, columns)
    }

    /// Creates an unbound block from prepared column types.
    pub fn create_with_columns(
        self,
        row_count: usize,
        columns: Vec<ColumnType>,
    ) -> Result<DataBlock> {
        DataBlock::new(self.engine, row_count, columns, &self.settings)
    }
}
