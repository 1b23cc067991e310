//! Decimal conversion utilities for the engine's scaled-integer decimal columns.
//!
//! The engine keeps a `DECIMAL(digits, scale)` column as plain integers holding
//! `value * 10^scale`. The integer width is picked from the declared number of
//! digits, see [`DecimalStorage::for_precision`].

use resultblock_common::{Result, error::Error};
use rust_decimal::Decimal;

/// The largest scale representable by [`Decimal`].
pub const MAX_SCALE: u32 = 28;

/// Native integer width used to store a decimal column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecimalStorage {
    /// Up to 2 digits, 8-bit storage.
    Byte,
    /// Up to 4 digits, 16-bit storage.
    Short,
    /// Up to 8 digits, 32-bit storage.
    Int,
    /// Anything wider, 64-bit storage.
    Long,
}

impl DecimalStorage {
    /// Selects the storage width the engine uses for a decimal with `digits`
    /// total digits.
    pub fn for_precision(digits: u32) -> DecimalStorage {
        match digits {
            0..=2 => DecimalStorage::Byte,
            3..=4 => DecimalStorage::Short,
            5..=8 => DecimalStorage::Int,
            _ => DecimalStorage::Long,
        }
    }

    /// Size of one stored value in bytes.
    pub fn width(self) -> usize {
        match self {
            DecimalStorage::Byte => 1,
            DecimalStorage::Short => 2,
            DecimalStorage::Int => 4,
            DecimalStorage::Long => 8,
        }
    }

    /// The reserved unscaled value marking a NULL decimal at this width
    /// (the minimum of the storage integer type).
    pub fn null_value(self) -> i64 {
        match self {
            DecimalStorage::Byte => i8::MIN as i64,
            DecimalStorage::Short => i16::MIN as i64,
            DecimalStorage::Int => i32::MIN as i64,
            DecimalStorage::Long => i64::MIN,
        }
    }

    /// Returns `true` if `unscaled` fits this width without colliding with the
    /// NULL marker.
    pub fn can_hold(self, unscaled: i64) -> bool {
        let (min, max) = match self {
            DecimalStorage::Byte => (i8::MIN as i64, i8::MAX as i64),
            DecimalStorage::Short => (i16::MIN as i64, i16::MAX as i64),
            DecimalStorage::Int => (i32::MIN as i64, i32::MAX as i64),
            DecimalStorage::Long => (i64::MIN, i64::MAX),
        };
        unscaled > min && unscaled <= max
    }
}

/// Converts an unscaled stored integer to a [`Decimal`] with the column's scale.
///
/// # Arguments
/// * `value` - The stored integer, i.e. the decimal value times `10^scale`
/// * `scale` - The number of digits after the decimal point
pub fn convert_scaled_to_decimal(value: i64, scale: u32) -> Result<Decimal> {
    convert_i128_to_decimal(value as i128, scale)
}

/// Converts a wide unscaled integer to a [`Decimal`].
///
/// Fails when the scale exceeds [`MAX_SCALE`] or the mantissa does not fit the
/// 96 bits [`Decimal`] provides.
pub fn convert_i128_to_decimal(value: i128, scale: u32) -> Result<Decimal> {
    if scale > MAX_SCALE {
        return Err(Error::invalid_format(
            "decimal",
            format!("scale {scale} exceeds the maximum of {MAX_SCALE}"),
        ));
    }
    Decimal::try_from_i128_with_scale(value, scale).map_err(|e| {
        Error::invalid_format("decimal", format!("cannot represent {value}e-{scale}: {e}"))
    })
}
