//! Composable SQL fragments.
//!
//! A [`SqlFragment`] is an immutable rope of SQL pieces: trusted literal
//! text and interpolated bind values. Fragments concatenate in constant
//! time without copying, so generators can compose deeply nested SQL
//! bottom-up and pay for the text once, in the final [`SqlFragment::build`]
//! pass.

use crate::ast::Value;
use crate::statement::Statement;
use crate::types::SqlType;
use std::borrow::Cow;
use std::ops::Add;

/// A parameter interpolated into a statement, typed with the database
/// type the driver should bind it as.
#[derive(Debug, Clone, PartialEq)]
pub struct BindValue<'a> {
    pub value: Value<'a>,
    pub sql_type: SqlType,
}

impl<'a> BindValue<'a> {
    pub fn new(value: impl Into<Value<'a>>, sql_type: SqlType) -> Self {
        Self {
            value: value.into(),
            sql_type,
        }
    }
}

/// One flattened piece of a statement.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlPiece<'a> {
    /// Trusted SQL text, emitted verbatim.
    Literal(Cow<'a, str>),
    /// A bind value, emitted as a placeholder.
    Interpolation(BindValue<'a>),
}

/// An immutable rope of SQL pieces.
///
/// Everything composes around two properties: concatenation is O(1), and
/// empty fragments are absorbed. `empty ++ f == f ++ empty == f` holds
/// structurally, so generators never special-case absent clauses.
///
/// ```rust
/// use parlance::fragment::SqlFragment;
/// use parlance::statement::PlaceholderFormat;
/// use parlance::types::{ids, SqlType};
///
/// let integer = SqlType::new(ids::INTEGER, "INTEGER");
/// let fragment = SqlFragment::code("SELECT ")
///     + SqlFragment::interpolation(1, integer.clone())
///     + " + "
///     + SqlFragment::interpolation(2, integer);
///
/// let (sql, parameters) = fragment.build().prepare(&PlaceholderFormat::QUESTION);
///
/// assert_eq!("SELECT ? + ?", sql);
/// assert_eq!(2, parameters.len());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SqlFragment<'a>(Repr<'a>);

#[derive(Debug, Clone, PartialEq)]
enum Repr<'a> {
    Empty,
    Piece(SqlPiece<'a>),
    Concat(Box<Repr<'a>>, Box<Repr<'a>>),
}

impl<'a> SqlFragment<'a> {
    /// A fragment with no pieces. The identity of concatenation.
    pub fn empty() -> Self {
        SqlFragment(Repr::Empty)
    }

    /// A literal code fragment. The text is trusted and emitted verbatim;
    /// values coming from the outside belong in
    /// [`SqlFragment::interpolation`]. Empty text produces the empty
    /// fragment.
    pub fn code(code: impl Into<Cow<'a, str>>) -> Self {
        let code = code.into();

        if code.is_empty() {
            Self::empty()
        } else {
            SqlFragment(Repr::Piece(SqlPiece::Literal(code)))
        }
    }

    /// A bind value fragment, rendered as a placeholder in the prepared
    /// statement.
    pub fn interpolation(value: impl Into<Value<'a>>, sql_type: SqlType) -> Self {
        SqlFragment(Repr::Piece(SqlPiece::Interpolation(BindValue::new(value, sql_type))))
    }

    /// `true` if the fragment has no pieces.
    pub fn is_empty(&self) -> bool {
        matches!(self.0, Repr::Empty)
    }

    /// `true` if the fragment is a single interpolated value and nothing
    /// else: the rendered form of one constant.
    ///
    /// Concatenation absorbs empty sides, so a concat node always holds
    /// two non-empty subtrees and a bare interpolation can only be a leaf.
    pub fn is_constant(&self) -> bool {
        matches!(self.0, Repr::Piece(SqlPiece::Interpolation(_)))
    }

    /// Concatenates two fragments in O(1). Empty sides vanish instead of
    /// nesting.
    pub fn concat(self, other: impl Into<SqlFragment<'a>>) -> Self {
        match (self.0, other.into().0) {
            (Repr::Empty, other) => SqlFragment(other),
            (this, Repr::Empty) => SqlFragment(this),
            (this, other) => SqlFragment(Repr::Concat(Box::new(this), Box::new(other))),
        }
    }

    /// Joins fragments with a separator, skipping empty ones so no doubled
    /// separators appear.
    pub fn join<I>(separator: impl Into<Cow<'a, str>>, fragments: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<SqlFragment<'a>>,
    {
        let separator = separator.into();
        let mut result = Self::empty();

        for fragment in fragments {
            let fragment = fragment.into();

            if fragment.is_empty() {
                continue;
            }

            if !result.is_empty() {
                result = result.concat(Self::code(separator.clone()));
            }

            result = result.concat(fragment);
        }

        result
    }

    /// Wraps the fragment in parentheses.
    pub fn paren(self) -> Self {
        Self::code("(") + self + ")"
    }

    /// Prepends `prefix`, except when the fragment is empty. The way
    /// optional clauses such as `WHERE` are rendered only when they have
    /// content.
    pub fn prefixed(self, prefix: impl Into<Cow<'a, str>>) -> Self {
        if self.is_empty() {
            self
        } else {
            Self::code(prefix) + self
        }
    }

    /// Flattens the rope into a [`Statement`] in one pass, merging
    /// adjacent literal pieces. The result never contains two literals in
    /// a row.
    pub fn build(self) -> Statement<'a> {
        let mut pieces: Vec<SqlPiece<'a>> = Vec::new();
        let mut stack = vec![self.0];

        while let Some(node) = stack.pop() {
            match node {
                Repr::Empty => (),
                Repr::Piece(SqlPiece::Literal(text)) => match pieces.last_mut() {
                    Some(SqlPiece::Literal(last)) => last.to_mut().push_str(&text),
                    _ => pieces.push(SqlPiece::Literal(text)),
                },
                Repr::Piece(piece) => pieces.push(piece),
                Repr::Concat(left, right) => {
                    // Left has to pop first to keep the pieces in order.
                    stack.push(*right);
                    stack.push(*left);
                }
            }
        }

        Statement::new(pieces)
    }
}

impl<'a, T> Add<T> for SqlFragment<'a>
where
    T: Into<SqlFragment<'a>>,
{
    type Output = SqlFragment<'a>;

    fn add(self, other: T) -> Self::Output {
        self.concat(other)
    }
}

impl<'a> From<&'a str> for SqlFragment<'a> {
    fn from(code: &'a str) -> Self {
        Self::code(code)
    }
}

impl<'a> From<String> for SqlFragment<'a> {
    fn from(code: String) -> Self {
        Self::code(code)
    }
}

impl<'a> From<Cow<'a, str>> for SqlFragment<'a> {
    fn from(code: Cow<'a, str>) -> Self {
        Self::code(code)
    }
}

impl<'a> From<SqlPiece<'a>> for SqlFragment<'a> {
    fn from(piece: SqlPiece<'a>) -> Self {
        match piece {
            SqlPiece::Literal(text) => Self::code(text),
            piece => SqlFragment(Repr::Piece(piece)),
        }
    }
}
