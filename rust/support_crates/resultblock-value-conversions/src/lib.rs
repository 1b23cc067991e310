//! Conversions between the engine's native value encodings and client-side types.

pub mod decimal_conversions;

pub use decimal_conversions::{DecimalStorage, convert_i128_to_decimal, convert_scaled_to_decimal};
