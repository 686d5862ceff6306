//! Database dialects as data.
//!
//! A [`Dialect`] bundles everything the [generator](crate::generator)
//! needs to know about one database: which operations exist and how each
//! renders, how identifiers are quoted, what the placeholder syntax is
//! and which clause quirks apply. Dialects are plain values; deriving a
//! specialized dialect is [`Dialect::extend_with`] on an existing one,
//! which never mutates the base.

use crate::ast::Query;
use crate::error::{Error, ErrorKind};
use crate::fragment::{BindValue, SqlFragment};
use crate::generator;
use crate::statement::{Params, PlaceholderFormat, Statement};
use std::borrow::Cow;
use std::collections::HashMap;
use tracing::debug;

mod base;
#[cfg(feature = "postgresql")]
mod postgres;
#[cfg(feature = "sqlite")]
mod sqlite;

pub use base::ansi;
#[cfg(feature = "postgresql")]
pub use postgres::{postgres, PostgresTypeMapping};
#[cfg(feature = "sqlite")]
pub use sqlite::{sqlite, SqliteTypeMapping};

/// Signature of a custom operation generator: argument fragments in,
/// operation fragment out.
pub type GenerateFn = for<'a> fn(Vec<SqlFragment<'a>>) -> crate::Result<SqlFragment<'a>>;

/// How a registered operation renders its arguments.
#[derive(Debug, Clone)]
pub enum OperationGenerator {
    /// `(a OP b)`
    BinaryInfix(Cow<'static, str>),
    /// `(OP a)`
    UnaryPrefix(Cow<'static, str>),
    /// `(a OP)`, e.g. `IS NULL`.
    UnaryPostfix(Cow<'static, str>),
    /// `NAME(a, b, …)` with any number of arguments.
    FunctionCall(Cow<'static, str>),
    /// A fixed keyword taking no arguments, e.g. `COUNT(*)`.
    Constant(Cow<'static, str>),
    /// Free-form generation. An `arity` of `None` accepts any argument
    /// count.
    Custom {
        arity: Option<usize>,
        generate: GenerateFn,
    },
}

impl OperationGenerator {
    /// Renders the operation over already generated argument fragments.
    pub(crate) fn apply<'a>(
        &self,
        operation: &str,
        arguments: Vec<SqlFragment<'a>>,
    ) -> crate::Result<SqlFragment<'a>> {
        match self {
            Self::BinaryInfix(op) => {
                let [left, right] = expect_arity(operation, arguments)?;
                Ok((left + " " + op.clone() + " " + right).paren())
            }
            Self::UnaryPrefix(op) => {
                let [argument] = expect_arity(operation, arguments)?;
                Ok((SqlFragment::code(op.clone()) + " " + argument).paren())
            }
            Self::UnaryPostfix(op) => {
                let [argument] = expect_arity(operation, arguments)?;
                Ok((argument + " " + op.clone()).paren())
            }
            Self::FunctionCall(name) => {
                Ok(SqlFragment::code(name.clone()) + SqlFragment::join(", ", arguments).paren())
            }
            Self::Constant(keyword) => {
                if !arguments.is_empty() {
                    let kind = ErrorKind::arity_mismatch(operation, 0, arguments.len());
                    return Err(Error::from(kind));
                }

                Ok(SqlFragment::code(keyword.clone()))
            }
            Self::Custom { arity, generate } => {
                if let Some(expected) = *arity {
                    if arguments.len() != expected {
                        let kind = ErrorKind::arity_mismatch(operation, expected, arguments.len());
                        return Err(Error::from(kind));
                    }
                }

                generate(arguments)
            }
        }
    }
}

/// Moves the arguments into a fixed-arity array or fails with the arity
/// error naming the operation.
pub(crate) fn expect_arity<'a, const N: usize>(
    operation: &str,
    arguments: Vec<SqlFragment<'a>>,
) -> crate::Result<[SqlFragment<'a>; N]> {
    let actual = arguments.len();

    arguments
        .try_into()
        .map_err(|_| Error::from(ErrorKind::arity_mismatch(operation, N, actual)))
}

/// How a dialect renders `OFFSET` without a `LIMIT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffsetStyle {
    /// `OFFSET n` stands alone.
    Plain,
    /// The dialect only accepts `OFFSET` after a `LIMIT`; an unbounded
    /// `LIMIT -1` is inserted when only an offset is present.
    RequiresLimit,
}

/// How a dialect empties a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TruncateStyle {
    /// `TRUNCATE TABLE <t>`
    Truncate,
    /// `DELETE FROM <t>`, for dialects without `TRUNCATE`.
    DeleteFrom,
}

/// A database dialect descriptor. Immutable once built, cheap to clone
/// and freely shareable between threads.
#[derive(Debug, Clone)]
pub struct Dialect {
    pub(crate) name: &'static str,
    pub(crate) operations: HashMap<Cow<'static, str>, OperationGenerator>,
    pub(crate) quote_char: char,
    pub(crate) placeholders: PlaceholderFormat,
    pub(crate) offset_style: OffsetStyle,
    pub(crate) truncate_style: TruncateStyle,
}

impl Dialect {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn placeholders(&self) -> PlaceholderFormat {
        self.placeholders
    }

    pub fn offset_style(&self) -> OffsetStyle {
        self.offset_style
    }

    pub fn truncate_style(&self) -> TruncateStyle {
        self.truncate_style
    }

    /// Looks up the generator for an operation name. Names are
    /// case-sensitive exact keys.
    pub fn operation(&self, name: &str) -> crate::Result<&OperationGenerator> {
        self.operations
            .get(name)
            .ok_or_else(|| Error::from(ErrorKind::unsupported_operation(name, self.name)))
    }

    /// All registered operations.
    pub fn operations(&self) -> impl Iterator<Item = (&str, &OperationGenerator)> + '_ {
        self.operations
            .iter()
            .map(|(name, generator)| (name.as_ref(), generator))
    }

    /// A copy of the dialect with the given operations inserted,
    /// overriding entries of the same name. The original dialect is
    /// untouched.
    ///
    /// ```rust
    /// use parlance::dialect::{self, OperationGenerator};
    ///
    /// let base = dialect::ansi();
    /// let custom = base.extend_with([("REGEXP", OperationGenerator::BinaryInfix("~".into()))]);
    ///
    /// assert!(base.operation("REGEXP").is_err());
    /// assert!(custom.operation("REGEXP").is_ok());
    /// ```
    pub fn extend_with<I, K>(&self, operations: I) -> Dialect
    where
        I: IntoIterator<Item = (K, OperationGenerator)>,
        K: Into<Cow<'static, str>>,
    {
        let mut extended = self.clone();
        extended.operations.extend(
            operations
                .into_iter()
                .map(|(name, generator)| (name.into(), generator)),
        );
        extended
    }

    /// Quotes an identifier with the quote character of the dialect,
    /// doubling embedded quote characters. Identifiers containing a NUL
    /// byte cannot be quoted safely and are rejected.
    pub fn quote_identifier(&self, name: &str) -> crate::Result<SqlFragment<'static>> {
        if name.contains('\0') {
            let kind = ErrorKind::illegal_argument(format!(
                "The identifier '{}' contains a NUL byte",
                name.escape_debug()
            ));
            return Err(Error::from(kind));
        }

        let mut quoted = String::with_capacity(name.len() + 2);
        quoted.push(self.quote_char);

        for c in name.chars() {
            if c == self.quote_char {
                quoted.push(c);
            }
            quoted.push(c);
        }

        quoted.push(self.quote_char);

        Ok(SqlFragment::code(quoted))
    }

    /// Generates the flattened statement for a query.
    pub fn build<'a>(&self, query: Query<'a>) -> crate::Result<Statement<'a>> {
        Ok(generator::generate_query(self, query)?.build())
    }

    /// Generates the executable pair for a query: SQL text in the
    /// placeholder syntax of the dialect plus the ordered bind values.
    pub fn prepare<'a>(&self, query: Query<'a>) -> crate::Result<(String, Vec<BindValue<'a>>)> {
        let (sql, parameters) = self.build(query)?.prepare(&self.placeholders);

        debug!("query: \"{}\", params: {}", sql, Params(&parameters));

        Ok((sql, parameters))
    }
}
