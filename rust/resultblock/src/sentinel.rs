//! NULL sentinels of the native engine.
//!
//! The engine encodes SQL NULL in primitive columns as a reserved value of the
//! column's storage type: the minimum for integers, and the most negative
//! finite value for floating point numbers. Object-typed cells (strings, blobs,
//! temporals, decimals) have no sentinel; the accessor reports them as absent.

/// A primitive wire type with a reserved NULL value.
pub trait NullSentinel: Copy {
    /// The reserved value meaning "no value".
    const NULL: Self;

    /// Returns `true` if `self` is exactly the reserved NULL value.
    fn is_null_sentinel(self) -> bool;

    /// Maps the sentinel to `None` and every other value to `Some`.
    #[inline]
    fn non_null(self) -> Option<Self> {
        if self.is_null_sentinel() {
            None
        } else {
            Some(self)
        }
    }
}

macro_rules! impl_integer_sentinel {
    ($($t:ty),*) => {
        $(
            impl NullSentinel for $t {
                const NULL: $t = <$t>::MIN;

                #[inline]
                fn is_null_sentinel(self) -> bool {
                    self == Self::NULL
                }
            }
        )*
    };
}

impl_integer_sentinel!(i8, i16, i32, i64);

// Floats are compared bitwise: the sentinel is a specific bit pattern, and
// `-0.0 == 0.0` style equality must not leak into the check.
impl NullSentinel for f32 {
    const NULL: f32 = f32::MIN;

    #[inline]
    fn is_null_sentinel(self) -> bool {
        self.to_bits() == Self::NULL.to_bits()
    }
}

impl NullSentinel for f64 {
    const NULL: f64 = f64::MIN;

    #[inline]
    fn is_null_sentinel(self) -> bool {
        self.to_bits() == Self::NULL.to_bits()
    }
}

pub const BYTE_NULL: i8 = <i8 as NullSentinel>::NULL;
pub const SHORT_NULL: i16 = <i16 as NullSentinel>::NULL;
pub const INT_NULL: i32 = <i32 as NullSentinel>::NULL;
pub const LONG_NULL: i64 = <i64 as NullSentinel>::NULL;
pub const FLOAT_NULL: f32 = <f32 as NullSentinel>::NULL;
pub const DOUBLE_NULL: f64 = <f64 as NullSentinel>::NULL;

/// Decodes a boolean stored in the byte channel.
///
/// Booleans share the byte sentinel: exactly [`BYTE_NULL`] is NULL, `1` is
/// `true` and any other byte is `false`.
#[inline]
pub fn decode_boolean(raw: i8) -> Option<bool> {
    if raw == BYTE_NULL {
        None
    } else {
        Some(raw == 1)
    }
}
