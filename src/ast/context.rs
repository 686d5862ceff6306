use crate::ast::{Expression, FromSpec, OrderDescriptor};

/// The shared tail of a `SELECT`: the source and everything narrowing or
/// arranging its rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Context<'a> {
    pub from: FromSpec<'a>,
    /// Filter expressions, combined with `AND`.
    pub filters: Vec<Expression<'a>>,
    pub group_by: Vec<Expression<'a>>,
    pub order_by: Vec<OrderDescriptor<'a>>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl<'a> Context<'a> {
    pub fn new(from: FromSpec<'a>) -> Self {
        Self {
            from,
            filters: Vec::new(),
            group_by: Vec::new(),
            order_by: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    /// Adds a filter. Filters combine with `AND`.
    pub fn filter(mut self, filter: Expression<'a>) -> Self {
        self.filters.push(filter);
        self
    }

    /// Adds a grouping expression.
    pub fn group_by(mut self, expression: Expression<'a>) -> Self {
        self.group_by.push(expression);
        self
    }

    /// Adds an ordering term.
    pub fn order_by(mut self, order: OrderDescriptor<'a>) -> Self {
        self.order_by.push(order);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }
}
