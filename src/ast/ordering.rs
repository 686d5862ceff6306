use crate::ast::Expression;
use std::borrow::Cow;

/// One term of an `ORDER BY` clause.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDescriptor<'a> {
    pub expression: Expression<'a>,
    pub direction: Order,
    pub nulls: Option<NullsOrder>,
    pub collation: Option<Cow<'a, str>>,
}

impl<'a> OrderDescriptor<'a> {
    pub fn new(expression: Expression<'a>, direction: Order) -> Self {
        Self {
            expression,
            direction,
            nulls: None,
            collation: None,
        }
    }

    /// Sets the placement of null values.
    pub fn nulls(mut self, nulls: NullsOrder) -> Self {
        self.nulls = Some(nulls);
        self
    }

    /// Sets the collation the term is compared under.
    pub fn collate(mut self, collation: impl Into<Cow<'a, str>>) -> Self {
        self.collation = Some(collation.into());
        self
    }
}

/// The ordering direction. Rendered explicitly even for the ascending
/// default, so the generated SQL never depends on dialect defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Order {
    #[default]
    Asc,
    Desc,
}

/// Explicit placement of null values in an ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullsOrder {
    First,
    Last,
}
