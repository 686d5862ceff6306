use crate::ast::Value;
use crate::types::SqlType;
use std::borrow::Cow;

/// A scalar expression in a query tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression<'a> {
    /// A column reference, optionally qualified with the name of the
    /// table or alias it comes from.
    Column {
        origin: Option<Cow<'a, str>>,
        name: Cow<'a, str>,
    },
    /// A constant. Always rendered as a bind value, never as literal SQL.
    Constant {
        value: Value<'a>,
        sql_type: SqlType,
    },
    /// An operation over argument expressions, resolved against the
    /// operation table of the dialect at generation time.
    Operation {
        name: Cow<'a, str>,
        arguments: Vec<Expression<'a>>,
    },
}

impl<'a> Expression<'a> {
    /// An unqualified column reference.
    pub fn column(name: impl Into<Cow<'a, str>>) -> Self {
        Expression::Column {
            origin: None,
            name: name.into(),
        }
    }

    /// A column reference qualified with its table or alias.
    pub fn qualified_column(origin: impl Into<Cow<'a, str>>, name: impl Into<Cow<'a, str>>) -> Self {
        Expression::Column {
            origin: Some(origin.into()),
            name: name.into(),
        }
    }

    /// A typed constant.
    pub fn constant(value: impl Into<Value<'a>>, sql_type: SqlType) -> Self {
        Expression::Constant {
            value: value.into(),
            sql_type,
        }
    }

    /// An operation by name.
    pub fn operation(
        name: impl Into<Cow<'a, str>>,
        arguments: impl IntoIterator<Item = Expression<'a>>,
    ) -> Self {
        Expression::Operation {
            name: name.into(),
            arguments: arguments.into_iter().collect(),
        }
    }
}
