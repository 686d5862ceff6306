use crate::ast::{Context, Expression};
use std::borrow::Cow;

/// A named result column: an expression with its output alias. Every
/// selected expression is aliased, so result columns have predictable
/// names on every dialect.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectItem<'a> {
    pub expression: Expression<'a>,
    pub alias: Cow<'a, str>,
}

impl<'a> SelectItem<'a> {
    pub fn new(expression: Expression<'a>, alias: impl Into<Cow<'a, str>>) -> Self {
        Self {
            expression,
            alias: alias.into(),
        }
    }
}

/// A column/value pair in an `INSERT` or `UPDATE`.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment<'a> {
    pub column: Cow<'a, str>,
    pub value: Expression<'a>,
}

impl<'a> Assignment<'a> {
    pub fn new(column: impl Into<Cow<'a, str>>, value: Expression<'a>) -> Self {
        Self {
            column: column.into(),
            value,
        }
    }
}

/// A complete data statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Query<'a> {
    /// `SELECT <aliased expressions> FROM …`
    Select {
        items: Vec<SelectItem<'a>>,
        context: Context<'a>,
    },
    /// `SELECT * FROM …`
    SelectAll { context: Context<'a> },
    /// `INSERT INTO <table> (…) VALUES (…)`, or `DEFAULT VALUES` with no
    /// assignments.
    Insert {
        table: Cow<'a, str>,
        assignments: Vec<Assignment<'a>>,
    },
    /// `UPDATE <table> SET … [WHERE …]`
    Update {
        table: Cow<'a, str>,
        assignments: Vec<Assignment<'a>>,
        filters: Vec<Expression<'a>>,
    },
    /// `DELETE FROM <table> [WHERE …]`
    Delete {
        table: Cow<'a, str>,
        filters: Vec<Expression<'a>>,
    },
}

impl<'a> Query<'a> {
    pub fn select(items: Vec<SelectItem<'a>>, context: Context<'a>) -> Self {
        Query::Select { items, context }
    }

    pub fn select_all(context: Context<'a>) -> Self {
        Query::SelectAll { context }
    }

    pub fn insert(table: impl Into<Cow<'a, str>>, assignments: Vec<Assignment<'a>>) -> Self {
        Query::Insert {
            table: table.into(),
            assignments,
        }
    }

    pub fn update(
        table: impl Into<Cow<'a, str>>,
        assignments: Vec<Assignment<'a>>,
        filters: Vec<Expression<'a>>,
    ) -> Self {
        Query::Update {
            table: table.into(),
            assignments,
            filters,
        }
    }

    pub fn delete(table: impl Into<Cow<'a, str>>, filters: Vec<Expression<'a>>) -> Self {
        Query::Delete {
            table: table.into(),
            filters,
        }
    }
}
