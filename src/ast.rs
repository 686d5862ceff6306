//! An abstract syntax tree for SQL statements.
//!
//! The tree is deliberately plain data: public fields, `Clone` and
//! `PartialEq` everywhere, and only thin constructors. Fluent query
//! building belongs to layers above; this crate turns finished trees into
//! SQL through the [generator](crate::generator).

mod context;
mod ddl;
mod expression;
mod from_spec;
mod ordering;
mod query;
mod values;

pub use context::Context;
pub use ddl::{ColumnDescription, CreateTable, DropTable, TruncateTable};
pub use expression::Expression;
pub use from_spec::{FromSpec, Join, JoinKind};
pub use ordering::{NullsOrder, Order, OrderDescriptor};
pub use query::{Assignment, Query, SelectItem};
pub use values::Value;
