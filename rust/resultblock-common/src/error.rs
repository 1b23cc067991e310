use thiserror::Error;

#[derive(Debug, Error)]
#[error(transparent)]
pub struct Error(Box<ErrorKind>);

pub type StdErrorBoxed = Box<dyn std::error::Error + Send + Sync + 'static>;

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        self.0.as_ref()
    }

    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }

    pub fn invalid_arg(name: impl Into<String>, message: impl Into<String>) -> Error {
        Error(
            ErrorKind::InvalidArgument {
                name: name.into(),
                message: message.into(),
            }
            .into(),
        )
    }

    pub fn invalid_format(element: impl Into<String>, message: impl Into<String>) -> Error {
        Error(
            ErrorKind::InvalidFormat {
                element: element.into(),
                message: message.into(),
            }
            .into(),
        )
    }

    /// Access to a cell outside of the block bounds.
    ///
    /// `columns` and `rows` are the block dimensions the access was checked against.
    pub fn out_of_range(column: usize, row: usize, columns: usize, rows: usize) -> Error {
        Error(
            ErrorKind::OutOfRangeAccess {
                column,
                row,
                columns,
                rows,
            }
            .into(),
        )
    }

    pub fn unrecognized_type_tag(column: usize, code: i32) -> Error {
        Error(ErrorKind::UnrecognizedTypeTag { column, code }.into())
    }

    /// A failure reported by the native engine itself.
    pub fn native<E>(context: impl Into<String>, source: E) -> Error
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error(
            ErrorKind::NativeAccessFailure {
                context: context.into(),
                source: Box::new(source),
            }
            .into(),
        )
    }

    /// Use of a block in a lifecycle state that does not permit `operation`.
    pub fn lifecycle(operation: impl Into<String>, state: impl Into<String>) -> Error {
        Error(
            ErrorKind::Lifecycle {
                operation: operation.into(),
                state: state.into(),
            }
            .into(),
        )
    }

    pub fn is_out_of_range(&self) -> bool {
        matches!(self.kind(), ErrorKind::OutOfRangeAccess { .. })
    }

    pub fn is_lifecycle(&self) -> bool {
        matches!(self.kind(), ErrorKind::Lifecycle { .. })
    }

    pub fn is_native(&self) -> bool {
        matches!(self.kind(), ErrorKind::NativeAccessFailure { .. })
    }
}

#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("invalid argument {name}: {message}")]
    InvalidArgument { name: String, message: String },

    #[error("invalid data format for '{element}': {message}")]
    InvalidFormat { element: String, message: String },

    #[error("cell ({column}, {row}) is outside of the {columns}x{rows} block")]
    OutOfRangeAccess {
        column: usize,
        row: usize,
        columns: usize,
        rows: usize,
    },

    #[error("column {column} has type code {code} with no decode mapping")]
    UnrecognizedTypeTag { column: usize, code: i32 },

    #[error("native engine failure in {context}: {source}")]
    NativeAccessFailure {
        context: String,
        source: StdErrorBoxed,
    },

    #[error("cannot {operation}: block is {state}")]
    Lifecycle { operation: String, state: String },
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error(kind.into())
    }
}
