//! The two type vocabularies and the mapping between them.
//!
//! [`ValueType`] is the dialect-agnostic description of a value as the
//! query tree sees it. [`SqlType`] is a concrete database type the way a
//! JDBC-style metadata layer reports it: a numeric type id plus cosmetic
//! display information. A [`TypeMapping`] translates between the two for
//! one database and infers the return types of operations.

use crate::ast::Expression;
use crate::error::{Error, ErrorKind};
use crate::problem::{Problem, ProblemBehavior, Problems};
use itertools::Itertools;
use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Width of an integer or floating point type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bits {
    Bits16,
    Bits32,
    Bits64,
}

impl Bits {
    pub fn bits(self) -> u8 {
        match self {
            Self::Bits16 => 16,
            Self::Bits32 => 32,
            Self::Bits64 => 64,
        }
    }
}

/// The dialect-agnostic type of a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueType {
    /// Signed integer of the given width.
    Integer(Bits),
    /// Floating point number of the given width.
    Float(Bits),
    /// Fixed-point decimal number.
    Decimal {
        precision: Option<u32>,
        scale: Option<i32>,
    },
    /// Character data, fixed or variable length.
    Char { length: Option<u32>, variable: bool },
    Boolean,
    /// Binary data, fixed or variable length.
    Binary { length: Option<u32>, variable: bool },
    Date,
    Time,
    DateTime { with_timezone: bool },
    /// Values of more than one type in the same position.
    Mixed,
    /// A database type with no dialect-agnostic counterpart. Carries the
    /// original type name and, when known, the concrete type behind it.
    Unsupported {
        name: String,
        underlying: Option<SqlType>,
    },
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(bits) => write!(f, "int{}", bits.bits()),
            Self::Float(bits) => write!(f, "float{}", bits.bits()),
            Self::Decimal { precision, scale } => match (precision, scale) {
                (Some(precision), Some(scale)) => write!(f, "decimal({precision},{scale})"),
                (Some(precision), None) => write!(f, "decimal({precision})"),
                _ => f.write_str("decimal"),
            },
            Self::Char { length, variable } => {
                let base = if *variable { "varchar" } else { "char" };
                match length {
                    Some(length) => write!(f, "{base}({length})"),
                    None if *variable => f.write_str("text"),
                    None => f.write_str(base),
                }
            }
            Self::Boolean => f.write_str("boolean"),
            Self::Binary { length, variable } => {
                let base = if *variable { "varbinary" } else { "binary" };
                match length {
                    Some(length) => write!(f, "{base}({length})"),
                    None if *variable => f.write_str("bytes"),
                    None => f.write_str(base),
                }
            }
            Self::Date => f.write_str("date"),
            Self::Time => f.write_str("time"),
            Self::DateTime { with_timezone: true } => f.write_str("datetime with time zone"),
            Self::DateTime { with_timezone: false } => f.write_str("datetime"),
            Self::Mixed => f.write_str("mixed"),
            Self::Unsupported { name, .. } => f.write_str(name),
        }
    }
}

/// Type ids as defined by the JDBC `java.sql.Types` constants, the
/// numbering metadata layers commonly report.
pub mod ids {
    pub const CHAR: i32 = 1;
    pub const NUMERIC: i32 = 2;
    pub const DECIMAL: i32 = 3;
    pub const INTEGER: i32 = 4;
    pub const SMALLINT: i32 = 5;
    pub const FLOAT: i32 = 6;
    pub const REAL: i32 = 7;
    pub const DOUBLE: i32 = 8;
    pub const VARCHAR: i32 = 12;
    pub const BOOLEAN: i32 = 16;
    pub const LONGVARCHAR: i32 = -1;
    pub const BINARY: i32 = -2;
    pub const VARBINARY: i32 = -3;
    pub const LONGVARBINARY: i32 = -4;
    pub const BIGINT: i32 = -5;
    pub const TINYINT: i32 = -6;
    pub const BIT: i32 = -7;
    pub const DATE: i32 = 91;
    pub const TIME: i32 = 92;
    pub const TIMESTAMP: i32 = 93;
    pub const OTHER: i32 = 1111;
    pub const BLOB: i32 = 2004;
    pub const CLOB: i32 = 2005;
    pub const TIME_WITH_TIMEZONE: i32 = 2013;
    pub const TIMESTAMP_WITH_TIMEZONE: i32 = 2014;
}

/// A concrete database type.
///
/// Identity is the numeric [`id`](Self::id) alone; the display name and
/// the size arguments only affect how the type renders in DDL and
/// messages.
#[derive(Debug, Clone, Eq)]
pub struct SqlType {
    id: i32,
    name: Cow<'static, str>,
    precision: Option<u32>,
    scale: Option<i32>,
}

impl SqlType {
    pub fn new(id: i32, name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            id,
            name: name.into(),
            precision: None,
            scale: None,
        }
    }

    pub fn sized(
        id: i32,
        name: impl Into<Cow<'static, str>>,
        precision: Option<u32>,
        scale: Option<i32>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            precision,
            scale,
        }
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn precision(&self) -> Option<u32> {
        self.precision
    }

    pub fn scale(&self) -> Option<i32> {
        self.scale
    }
}

impl PartialEq for SqlType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Hash for SqlType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for SqlType {
    /// The declaration form, e.g. `DECIMAL(10,2)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;

        match (self.precision, self.scale) {
            (Some(precision), Some(scale)) => write!(f, "({precision},{scale})"),
            (Some(precision), None) => write!(f, "({precision})"),
            _ => Ok(()),
        }
    }
}

/// A return type that is either pinned by an inference rule or has to be
/// resolved from live metadata by the execution layer.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlTypeReference {
    Known(SqlType),
    FromMetadata,
}

/// Bidirectional type mapping for one database, plus return-type
/// inference for operations.
///
/// The two directions are deliberately not inverses: `value_type_to_sql`
/// answers "how do I store this", `sql_type_to_value_type` answers "what
/// does this stored type mean". A mapping is inexact exactly when a type
/// does not survive the round trip, and every implementation reports that
/// through the shared problem machinery.
pub trait TypeMapping: Send + Sync {
    /// The concrete type used to store the given value type.
    ///
    /// Inexact mappings are reported per `behavior`. An `Unsupported`
    /// value type without an underlying concrete type cannot be stored
    /// and is an illegal argument.
    fn value_type_to_sql(
        &self,
        value_type: &ValueType,
        behavior: ProblemBehavior,
        problems: &mut Problems,
    ) -> crate::Result<SqlType>;

    /// The dialect-agnostic interpretation of a concrete type. Total;
    /// unknown types come back as [`ValueType::Unsupported`].
    fn sql_type_to_value_type(&self, sql_type: &SqlType) -> ValueType;

    /// The return type of `operation` applied to arguments of the given
    /// types.
    ///
    /// Operations with a fixed or input-determined return type resolve
    /// without touching the database. Everything else is delegated to
    /// `from_metadata`, which may resolve `expression` against live
    /// metadata or defer with [`SqlTypeReference::FromMetadata`].
    fn infer_return_type(
        &self,
        from_metadata: &dyn Fn(&Expression<'_>) -> SqlTypeReference,
        operation: &str,
        arguments: &[SqlTypeReference],
        expression: &Expression<'_>,
    ) -> SqlTypeReference;
}

/// Runs the mapped type through the reverse direction and reports an
/// inexact coercion when the round trip changes the type. Shared by every
/// [`TypeMapping`] implementation.
pub(crate) fn check_round_trip(
    mapping: &dyn TypeMapping,
    value_type: &ValueType,
    sql_type: &SqlType,
    behavior: ProblemBehavior,
    problems: &mut Problems,
) -> crate::Result<()> {
    if mapping.sql_type_to_value_type(sql_type) != *value_type {
        behavior.report(
            Problem::InexactTypeCoercion {
                requested: value_type.to_string(),
                used: sql_type.to_string(),
            },
            problems,
        )?;
    }

    Ok(())
}

pub(crate) fn unsupported_without_underlying_type(name: &str) -> Error {
    Error::from(ErrorKind::illegal_argument(format!(
        "The type '{name}' has no underlying database type to store it as"
    )))
}

/// Operations whose return type is a boolean no matter the arguments.
const BOOLEAN_OPERATIONS: &[&str] = &[
    "=", "==", "!=", "<>", "<", ">", "<=", ">=", "AND", "OR", "NOT", "LIKE", "IS_NULL",
    "IS_NOT_NULL",
];

/// Operations producing character data no matter the arguments.
const TEXT_OPERATIONS: &[&str] = &["CONCAT", "||"];

/// Operations returning one of their inputs unchanged.
const PRESERVE_INPUT_OPERATIONS: &[&str] = &["MAX", "MIN", "FIRST", "LAST", "FILL_NULL", "COALESCE"];

/// The shared inference ladder. Dialects supply their boolean and text
/// types and fall back to the metadata callback for anything the rules do
/// not pin down.
pub(crate) fn infer_with_standard_rules(
    boolean: SqlType,
    text: SqlType,
    from_metadata: &dyn Fn(&Expression<'_>) -> SqlTypeReference,
    operation: &str,
    arguments: &[SqlTypeReference],
    expression: &Expression<'_>,
) -> SqlTypeReference {
    if BOOLEAN_OPERATIONS.contains(&operation) {
        return SqlTypeReference::Known(boolean);
    }

    if TEXT_OPERATIONS.contains(&operation) {
        return SqlTypeReference::Known(text);
    }

    if PRESERVE_INPUT_OPERATIONS.contains(&operation) {
        if let Some(unified) = unify_argument_types(arguments) {
            return unified;
        }
    }

    // The conditional returns its branch type when both branches agree.
    if operation == "IIF" && arguments.len() == 3 {
        if let Some(unified) = unify_argument_types(&arguments[1..]) {
            return unified;
        }
    }

    from_metadata(expression)
}

/// All arguments resolved to the same known type.
fn unify_argument_types(arguments: &[SqlTypeReference]) -> Option<SqlTypeReference> {
    if arguments.is_empty() || !arguments.iter().all_equal() {
        return None;
    }

    match &arguments[0] {
        SqlTypeReference::Known(_) => Some(arguments[0].clone()),
        SqlTypeReference::FromMetadata => None,
    }
}
