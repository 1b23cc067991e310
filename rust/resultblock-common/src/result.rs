use std::ops::Range;

use crate::error::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Returns an `InvalidArgument` error from the enclosing function when the
/// condition does not hold. The condition text becomes the error message.
#[macro_export]
macro_rules! verify_arg {
    ($name:expr, $expr:expr) => {{
        let result = $expr;
        $crate::result::verify_arg(result, stringify!($name), stringify!($expr))?;
    }};
}

#[inline]
pub fn verify_arg(predicate: bool, name: &str, condition: &str) -> Result<()> {
    if predicate {
        Ok(())
    } else {
        Err(invalid_arg(name, condition))
    }
}

#[cold]
fn invalid_arg(name: &str, condition: &str) -> Error {
    Error::invalid_arg(name, condition)
}

/// Verifies that `(column, row)` addresses a cell of a `columns` x `rows` block.
#[inline]
pub fn verify_cell(column: usize, row: usize, columns: usize, rows: usize) -> Result<()> {
    if column < columns && row < rows {
        Ok(())
    } else {
        Err(Error::out_of_range(column, row, columns, rows))
    }
}

/// Verifies that `rows` is a (possibly empty) range of rows inside a block of
/// `row_count` rows, for the given column.
#[inline]
pub fn verify_rows(
    column: usize,
    rows: &Range<usize>,
    columns: usize,
    row_count: usize,
) -> Result<()> {
    if column >= columns {
        return Err(Error::out_of_range(column, rows.start, columns, row_count));
    }
    if rows.start > rows.end || rows.end > row_count {
        return Err(Error::out_of_range(column, rows.end, columns, row_count));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positive(value: i32) -> Result<i32> {
        crate::verify_arg!(value, value > 0);
        Ok(value)
    }

    #[test]
    fn test_verify_arg_macro() {
        assert_eq!(positive(5).unwrap(), 5);
        let err = positive(-1).unwrap_err();
        assert_eq!(err.to_string(), "invalid argument value: value > 0");
    }

    #[test]
    fn test_verify_cell() {
        assert!(verify_cell(0, 0, 1, 1).is_ok());
        assert!(verify_cell(1, 0, 1, 1).unwrap_err().is_out_of_range());
        assert!(verify_cell(0, 1, 1, 1).unwrap_err().is_out_of_range());
        assert!(verify_cell(0, 0, 3, 0).is_err());
    }

    #[test]
    fn test_verify_rows() {
        assert!(verify_rows(0, &(0..10), 1, 10).is_ok());
        assert!(verify_rows(0, &(10..10), 1, 10).is_ok());
        assert!(verify_rows(0, &(5..11), 1, 10).is_err());
        assert!(verify_rows(1, &(0..1), 1, 10).is_err());
        #[allow(clippy::reversed_empty_ranges)]
        let reversed = 4..2;
        assert!(verify_rows(0, &reversed, 1, 10).is_err());
    }
}
