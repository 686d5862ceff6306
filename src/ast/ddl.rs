use crate::types::ValueType;
use std::borrow::Cow;

/// A column in a `CREATE TABLE` statement. The type is dialect-agnostic
/// and goes through the type mapping of the target dialect.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDescription<'a> {
    pub name: Cow<'a, str>,
    pub value_type: ValueType,
    pub not_null: bool,
    /// Raw default expression, emitted verbatim.
    pub default: Option<Cow<'a, str>>,
}

impl<'a> ColumnDescription<'a> {
    pub fn new(name: impl Into<Cow<'a, str>>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
            not_null: false,
            default: None,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    pub fn default(mut self, default: impl Into<Cow<'a, str>>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// A `CREATE TABLE` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTable<'a> {
    pub name: Cow<'a, str>,
    pub columns: Vec<ColumnDescription<'a>>,
    pub primary_key: Vec<Cow<'a, str>>,
    pub temporary: bool,
    pub if_not_exists: bool,
}

impl<'a> CreateTable<'a> {
    pub fn new(name: impl Into<Cow<'a, str>>, columns: Vec<ColumnDescription<'a>>) -> Self {
        Self {
            name: name.into(),
            columns,
            primary_key: Vec::new(),
            temporary: false,
            if_not_exists: false,
        }
    }

    pub fn primary_key(mut self, columns: impl IntoIterator<Item = impl Into<Cow<'a, str>>>) -> Self {
        self.primary_key = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn temporary(mut self) -> Self {
        self.temporary = true;
        self
    }

    pub fn if_not_exists(mut self) -> Self {
        self.if_not_exists = true;
        self
    }
}

/// A `DROP TABLE` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct DropTable<'a> {
    pub name: Cow<'a, str>,
    pub if_exists: bool,
}

impl<'a> DropTable<'a> {
    pub fn new(name: impl Into<Cow<'a, str>>) -> Self {
        Self {
            name: name.into(),
            if_exists: false,
        }
    }

    pub fn if_exists(mut self) -> Self {
        self.if_exists = true;
        self
    }
}

/// Removes every row of a table. Rendered as `TRUNCATE TABLE` where the
/// dialect has it and as an unfiltered `DELETE` elsewhere.
#[derive(Debug, Clone, PartialEq)]
pub struct TruncateTable<'a> {
    pub name: Cow<'a, str>,
}

impl<'a> TruncateTable<'a> {
    pub fn new(name: impl Into<Cow<'a, str>>) -> Self {
        Self { name: name.into() }
    }
}
