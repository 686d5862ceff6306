//! A "prelude" for users of the `parlance` crate.

pub use crate::ast::*;
pub use crate::dialect::{self, Dialect, OperationGenerator};
pub use crate::error::{Error, ErrorKind};
pub use crate::fragment::{BindValue, SqlFragment, SqlPiece};
pub use crate::generator;
pub use crate::naming::{NameEncoding, NamingProperties};
pub use crate::problem::{Problem, ProblemBehavior, Problems};
pub use crate::statement::{PlaceholderFormat, Statement};
pub use crate::types::{ids, Bits, SqlType, SqlTypeReference, TypeMapping, ValueType};
