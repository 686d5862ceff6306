//! Error module
use std::{borrow::Cow, fmt};
use thiserror::Error;

#[derive(Debug, Error)]
/// The error type for SQL generation, operation lookup, identifier
/// handling and type mapping.
pub struct Error {
    kind: ErrorKind,
}

impl Error {
    /// A more specific error type for matching.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.kind.fmt(f)
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self { kind }
    }
}

#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("Operation '{}' is not supported by the {} dialect", operation, dialect)]
    UnsupportedOperation { operation: String, dialect: &'static str },

    #[error("Operation '{}' takes {} arguments, {} given", operation, expected, actual)]
    ArityMismatch {
        operation: String,
        expected: usize,
        actual: usize,
    },

    #[error("Illegal argument: {}", _0)]
    IllegalArgument(Cow<'static, str>),

    #[error("The type {} has no exact representation, the closest match is {}", requested, used)]
    InexactTypeCoercion { requested: String, used: String },

    #[error("The name '{}' is too long: {} where the limit is {}", name, length, limit)]
    NameTooLong {
        name: String,
        length: usize,
        limit: usize,
    },
}

impl ErrorKind {
    pub(crate) fn unsupported_operation(operation: impl Into<String>, dialect: &'static str) -> Self {
        Self::UnsupportedOperation {
            operation: operation.into(),
            dialect,
        }
    }

    pub(crate) fn arity_mismatch(operation: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::ArityMismatch {
            operation: operation.into(),
            expected,
            actual,
        }
    }

    pub(crate) fn illegal_argument(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::IllegalArgument(msg.into())
    }
}

impl From<Error> for ErrorKind {
    fn from(e: Error) -> Self {
        e.kind
    }
}
