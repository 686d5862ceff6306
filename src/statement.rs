//! Flattened statements and their prepared-statement rendering.

use crate::ast::Value;
use crate::fragment::{BindValue, SqlPiece};
use itertools::Itertools;
use std::fmt;

/// Placeholder syntax of a dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaceholderFormat {
    pub prefix: &'static str,
    pub has_numbering: bool,
}

impl PlaceholderFormat {
    /// Unnumbered `?` placeholders.
    pub const QUESTION: PlaceholderFormat = PlaceholderFormat {
        prefix: "?",
        has_numbering: false,
    };

    /// Numbered `$1`, `$2`, … placeholders.
    pub const DOLLAR_NUMBERED: PlaceholderFormat = PlaceholderFormat {
        prefix: "$",
        has_numbering: true,
    };

    fn write(&self, sql: &mut String, placeholder_number: &mut i32) {
        sql.push_str(self.prefix);
        if self.has_numbering {
            sql.push_str(placeholder_number.to_string().as_str());
            *placeholder_number += 1;
        }
    }
}

/// A flattened statement: literal SQL chunks interleaved with bind
/// values, with no two literal chunks adjacent. Produced by
/// [`crate::fragment::SqlFragment::build`].
#[derive(Debug, Clone, PartialEq)]
pub struct Statement<'a> {
    pieces: Vec<SqlPiece<'a>>,
}

impl<'a> Statement<'a> {
    pub(crate) fn new(pieces: Vec<SqlPiece<'a>>) -> Self {
        Self { pieces }
    }

    pub fn pieces(&self) -> &[SqlPiece<'a>] {
        &self.pieces
    }

    /// Renders the executable pair: SQL text with positional placeholders
    /// and the bind values in placeholder order.
    pub fn prepare(self, placeholders: &PlaceholderFormat) -> (String, Vec<BindValue<'a>>) {
        let mut sql = String::new();
        let mut parameters = Vec::new();
        let mut placeholder_number = 1;

        for piece in self.pieces {
            match piece {
                SqlPiece::Literal(chunk) => sql.push_str(&chunk),
                SqlPiece::Interpolation(bind) => {
                    placeholders.write(&mut sql, &mut placeholder_number);
                    parameters.push(bind);
                }
            }
        }

        (sql, parameters)
    }

    /// Renders the statement with the parameter values inlined.
    ///
    /// Only for debugging and logging. The quoting is naive; never
    /// execute the result.
    pub fn unsafe_debug_sql(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Statement<'_> {
    /// Should only be used for debugging and logging; parameter values
    /// are inlined with naive quoting.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for piece in &self.pieces {
            match piece {
                SqlPiece::Literal(chunk) => f.write_str(chunk)?,
                SqlPiece::Interpolation(bind) => write_value_literal(f, &bind.value)?,
            }
        }

        Ok(())
    }
}

fn write_value_literal(f: &mut fmt::Formatter<'_>, value: &Value<'_>) -> fmt::Result {
    let res = match value {
        Value::Integer(val) => val.map(|v| write!(f, "{v}")),
        Value::Float(val) => val.map(|v| write!(f, "{v}")),
        Value::Numeric(val) => val.as_ref().map(|v| write!(f, "{v}")),
        Value::Text(val) => val.as_ref().map(|v| write!(f, "'{}'", v.replace('\'', "''"))),
        Value::Boolean(val) => val.map(|v| f.write_str(if v { "TRUE" } else { "FALSE" })),
        Value::Bytes(val) => val.as_ref().map(|v| write!(f, "x'{}'", hex::encode(v.as_ref()))),
        Value::Date(val) => val.map(|v| write!(f, "'{v}'")),
        Value::Time(val) => val.map(|v| write!(f, "'{v}'")),
        Value::DateTime(val) => val.map(|v| write!(f, "'{}'", v.to_rfc3339())),
    };

    match res {
        Some(r) => r,
        None => f.write_str("NULL"),
    }
}

/// Display wrapper for a parameter list in log events.
pub(crate) struct Params<'a>(pub(crate) &'a [BindValue<'a>]);

impl fmt::Display for Params<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.iter().map(|bind| &bind.value).join(","))
    }
}
