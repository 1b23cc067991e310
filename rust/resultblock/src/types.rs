//! Logical column types of a result block and the decode table derived from them.

/// Native type name of the engine's row-identifier type.
pub const ROW_ID_TYPE_NAME: &str = "oid";

/// SQL logical type of a column, identified by its JDBC type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum SqlType {
    Boolean = 16,
    TinyInt = -6,
    SmallInt = 5,
    Integer = 4,
    BigInt = -5,
    Real = 7,
    Double = 8,
    Decimal = 3,
    Char = 1,
    Varchar = 12,
    LongVarchar = -1,
    Date = 91,
    Time = 92,
    TimeWithTimezone = 2013,
    Timestamp = 93,
    TimestampWithTimezone = 2014,
    LongVarbinary = -4,
    Blob = 2004,
    Other = 1111,
}

impl SqlType {
    pub const ALL: [SqlType; 19] = [
        SqlType::Boolean,
        SqlType::TinyInt,
        SqlType::SmallInt,
        SqlType::Integer,
        SqlType::BigInt,
        SqlType::Real,
        SqlType::Double,
        SqlType::Decimal,
        SqlType::Char,
        SqlType::Varchar,
        SqlType::LongVarchar,
        SqlType::Date,
        SqlType::Time,
        SqlType::TimeWithTimezone,
        SqlType::Timestamp,
        SqlType::TimestampWithTimezone,
        SqlType::LongVarbinary,
        SqlType::Blob,
        SqlType::Other,
    ];

    /// The JDBC type code.
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Looks up the type for a JDBC type code, `None` for codes without a
    /// decode mapping (arrays, structs, refs, ...).
    pub fn from_code(code: i32) -> Option<SqlType> {
        SqlType::ALL.into_iter().find(|t| t.code() == code)
    }

    /// Resolves how cells of this type are read and post-processed.
    ///
    /// `native_type` only matters for [`SqlType::Other`], where the row
    /// identifier type gets its own accessor and anything else is read as text.
    pub fn cell_kind(self, native_type: &str) -> CellKind {
        match self {
            SqlType::Boolean => CellKind::Boolean,
            SqlType::TinyInt => CellKind::Byte,
            SqlType::SmallInt => CellKind::Short,
            SqlType::Integer => CellKind::Int,
            SqlType::BigInt => CellKind::Long,
            SqlType::Real => CellKind::Float,
            SqlType::Double => CellKind::Double,
            SqlType::Decimal => CellKind::Decimal,
            SqlType::Char | SqlType::Varchar | SqlType::LongVarchar => CellKind::Text,
            SqlType::Other if native_type == ROW_ID_TYPE_NAME => CellKind::RowId,
            SqlType::Other => CellKind::Text,
            SqlType::LongVarbinary | SqlType::Blob => CellKind::Blob,
            SqlType::Date => CellKind::Date,
            SqlType::Time => CellKind::Time { with_tz: false },
            SqlType::TimeWithTimezone => CellKind::Time { with_tz: true },
            SqlType::Timestamp => CellKind::Timestamp { with_tz: false },
            SqlType::TimestampWithTimezone => CellKind::Timestamp { with_tz: true },
        }
    }
}

impl TryFrom<i32> for SqlType {
    type Error = i32;

    fn try_from(code: i32) -> std::result::Result<Self, Self::Error> {
        SqlType::from_code(code).ok_or(code)
    }
}

/// How a cell is fetched from the engine and post-processed, shared by the
/// primitive, object and string decode flavors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    Boolean,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    Decimal,
    Text,
    RowId,
    Blob,
    Date,
    Time { with_tz: bool },
    Timestamp { with_tz: bool },
}

impl CellKind {
    /// Returns `true` for kinds whose NULL is a sentinel value rather than an
    /// absent object.
    pub fn is_primitive(self) -> bool {
        matches!(
            self,
            CellKind::Boolean
                | CellKind::Byte
                | CellKind::Short
                | CellKind::Int
                | CellKind::Long
                | CellKind::Float
                | CellKind::Double
        )
    }
}

/// Type metadata of one block column: the JDBC type code and the engine's
/// native type name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnType {
    code: i32,
    native_type: String,
}

impl ColumnType {
    pub fn new(code: i32, native_type: impl Into<String>) -> ColumnType {
        ColumnType {
            code,
            native_type: native_type.into(),
        }
    }

    pub fn from_sql(sql_type: SqlType, native_type: impl Into<String>) -> ColumnType {
        ColumnType::new(sql_type.code(), native_type)
    }

    pub fn code(&self) -> i32 {
        self.code
    }

    pub fn native_type(&self) -> &str {
        &self.native_type
    }

    pub fn sql_type(&self) -> Option<SqlType> {
        SqlType::from_code(self.code)
    }

    /// The decode table entry for this column, `None` if the type code has no
    /// decode mapping.
    pub fn cell_kind(&self) -> Option<CellKind> {
        self.sql_type()
            .map(|sql_type| sql_type.cell_kind(&self.native_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip() {
        for t in SqlType::ALL {
            assert_eq!(SqlType::from_code(t.code()), Some(t));
            assert_eq!(SqlType::try_from(t.code()), Ok(t));
        }
        assert_eq!(SqlType::from_code(2003), None);
        assert_eq!(SqlType::try_from(0), Err(0));
    }

    #[test]
    fn test_other_dispatch_by_native_name() {
        assert_eq!(SqlType::Other.cell_kind("oid"), CellKind::RowId);
        assert_eq!(SqlType::Other.cell_kind("uuid"), CellKind::Text);
        assert_eq!(SqlType::Other.cell_kind("inet"), CellKind::Text);
        assert_eq!(SqlType::Other.cell_kind(""), CellKind::Text);
        // Only "other" looks at the native name.
        assert_eq!(SqlType::Varchar.cell_kind("oid"), CellKind::Text);
    }

    #[test]
    fn test_every_type_has_a_kind() {
        for t in SqlType::ALL {
            let kind = t.cell_kind("anything");
            let primitive = matches!(
                t,
                SqlType::Boolean
                    | SqlType::TinyInt
                    | SqlType::SmallInt
                    | SqlType::Integer
                    | SqlType::BigInt
                    | SqlType::Real
                    | SqlType::Double
            );
            assert_eq!(kind.is_primitive(), primitive, "{t:?}");
        }
    }

    #[test]
    fn test_column_type() {
        let col = ColumnType::from_sql(SqlType::TimestampWithTimezone, "timestamptz");
        assert_eq!(col.code(), 2014);
        assert_eq!(col.native_type(), "timestamptz");
        assert_eq!(col.cell_kind(), Some(CellKind::Timestamp { with_tz: true }));

        let col = ColumnType::new(2003, "array");
        assert_eq!(col.sql_type(), None);
        assert_eq!(col.cell_kind(), None);
    }
}
