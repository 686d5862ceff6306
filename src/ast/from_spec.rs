use crate::ast::{Expression, Query};
use std::borrow::Cow;

/// A source of rows in a `FROM` clause. Every leaf carries the alias the
/// rest of the query refers to it by.
#[derive(Debug, Clone, PartialEq)]
pub enum FromSpec<'a> {
    /// A table.
    Table {
        name: Cow<'a, str>,
        alias: Cow<'a, str>,
    },
    /// Trusted raw SQL, parenthesized and aliased. The text is emitted
    /// verbatim; the caller vouches for it.
    RawQuery {
        sql: Cow<'a, str>,
        alias: Cow<'a, str>,
    },
    /// Two sources combined by a join.
    Join(Box<Join<'a>>),
    /// A nested query as a source.
    SubQuery {
        query: Box<Query<'a>>,
        alias: Cow<'a, str>,
    },
}

impl<'a> FromSpec<'a> {
    pub fn table(name: impl Into<Cow<'a, str>>, alias: impl Into<Cow<'a, str>>) -> Self {
        FromSpec::Table {
            name: name.into(),
            alias: alias.into(),
        }
    }

    pub fn raw_query(sql: impl Into<Cow<'a, str>>, alias: impl Into<Cow<'a, str>>) -> Self {
        FromSpec::RawQuery {
            sql: sql.into(),
            alias: alias.into(),
        }
    }

    pub fn sub_query(query: Query<'a>, alias: impl Into<Cow<'a, str>>) -> Self {
        FromSpec::SubQuery {
            query: Box::new(query),
            alias: alias.into(),
        }
    }

    pub fn join(join: Join<'a>) -> Self {
        FromSpec::Join(Box::new(join))
    }
}

/// A join between two `FROM` sources.
#[derive(Debug, Clone, PartialEq)]
pub struct Join<'a> {
    pub kind: JoinKind,
    pub left: FromSpec<'a>,
    pub right: FromSpec<'a>,
    /// Join conditions, combined with `AND`. Empty only for cross joins.
    pub on: Vec<Expression<'a>>,
}

impl<'a> Join<'a> {
    pub fn new(kind: JoinKind, left: FromSpec<'a>, right: FromSpec<'a>, on: Expression<'a>) -> Self {
        Self {
            kind,
            left,
            right,
            on: vec![on],
        }
    }

    pub fn cross(left: FromSpec<'a>, right: FromSpec<'a>) -> Self {
        Self {
            kind: JoinKind::Cross,
            left,
            right,
            on: Vec::new(),
        }
    }

    /// Adds a further join condition.
    pub fn and_on(mut self, on: Expression<'a>) -> Self {
        self.on.push(on);
        self
    }
}

/// The SQL join types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

impl JoinKind {
    pub(crate) fn keyword(self) -> &'static str {
        match self {
            Self::Inner => "INNER JOIN",
            Self::Left => "LEFT JOIN",
            Self::Right => "RIGHT JOIN",
            Self::Full => "FULL JOIN",
            Self::Cross => "CROSS JOIN",
        }
    }
}
