//! # parlance
//!
//! Dialect-agnostic SQL generation.
//!
//! A query is described once, as a tree of typed constants, columns and
//! named operations, and rendered against a [dialect
//! descriptor](dialect::Dialect) into SQL text plus an ordered list of
//! bind values. Constants never become part of the SQL text, whatever
//! their type or content; they travel as bind values and the text only
//! carries placeholders in the syntax of the dialect.
//!
//! Dialects are plain values: an operation table, a quoting rule and a
//! handful of rendering switches. A new dialect starts from
//! [`dialect::ansi`] and layers its differences on with
//! [`extend_with`](dialect::Dialect::extend_with).
//!
//! ### Feature flags
//!
//! - `sqlite`: the SQLite dialect and type mapping. Enabled by default.
//! - `postgresql`: the PostgreSQL dialect and type mapping. Enabled by
//!   default.
//!
//! ### Example
//!
//! ```rust
//! use parlance::ast::*;
//! use parlance::dialect;
//! use parlance::types::{ids, SqlType};
//!
//! # fn main() -> parlance::Result<()> {
//! let query = Query::select(
//!     vec![SelectItem::new(
//!         Expression::operation(
//!             "+",
//!             [
//!                 Expression::qualified_column("t", "a"),
//!                 Expression::constant(1, SqlType::new(ids::INTEGER, "INTEGER")),
//!             ],
//!         ),
//!         "c",
//!     )],
//!     Context::new(FromSpec::table("t", "t")),
//! );
//!
//! let (sql, parameters) = dialect::ansi().prepare(query)?;
//!
//! assert_eq!("SELECT (\"t\".\"a\" + ?) AS \"c\" FROM \"t\" AS \"t\"", sql);
//! assert_eq!(1, parameters.len());
//! # Ok(())
//! # }
//! ```

pub mod ast;
pub mod dialect;
pub mod error;
pub mod fragment;
pub mod generator;
pub mod naming;
pub mod prelude;
pub mod problem;
pub mod statement;
pub mod types;

pub use error::{Error, ErrorKind};

pub type Result<T> = std::result::Result<T, Error>;
