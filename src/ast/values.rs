use bigdecimal::{BigDecimal, ToPrimitive};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use std::{
    borrow::{Borrow, Cow},
    fmt,
};

/// A value we must parameterize for the prepared statement. Null values
/// should be defined by their corresponding type variants with a `None`
/// value for best compatibility.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    /// 64-bit signed integer.
    Integer(Option<i64>),
    /// 64-bit floating point.
    Float(Option<f64>),
    /// Arbitrary precision numeric value.
    Numeric(Option<BigDecimal>),
    /// String value.
    Text(Option<Cow<'a, str>>),
    /// Boolean value.
    Boolean(Option<bool>),
    /// Bytes value.
    Bytes(Option<Cow<'a, [u8]>>),
    /// A date value.
    Date(Option<NaiveDate>),
    /// A time value.
    Time(Option<NaiveTime>),
    /// A datetime value.
    DateTime(Option<DateTime<Utc>>),
}

impl<'a> Value<'a> {
    /// Creates a new integer value.
    pub fn integer<I>(value: I) -> Self
    where
        I: Into<i64>,
    {
        Value::Integer(Some(value.into()))
    }

    /// Creates a new floating point value.
    pub fn float(value: f64) -> Self {
        Value::Float(Some(value))
    }

    /// Creates a new numeric value.
    pub fn numeric(value: BigDecimal) -> Self {
        Value::Numeric(Some(value))
    }

    /// Creates a new string value.
    pub fn text<T>(value: T) -> Self
    where
        T: Into<Cow<'a, str>>,
    {
        Value::Text(Some(value.into()))
    }

    /// Creates a new boolean value.
    pub fn boolean<B>(value: B) -> Self
    where
        B: Into<bool>,
    {
        Value::Boolean(Some(value.into()))
    }

    /// Creates a new bytes value.
    pub fn bytes<B>(value: B) -> Self
    where
        B: Into<Cow<'a, [u8]>>,
    {
        Value::Bytes(Some(value.into()))
    }

    /// Creates a new date value.
    pub fn date(value: NaiveDate) -> Self {
        Value::Date(Some(value))
    }

    /// Creates a new time value.
    pub fn time(value: NaiveTime) -> Self {
        Value::Time(Some(value))
    }

    /// Creates a new datetime value.
    pub fn datetime(value: DateTime<Utc>) -> Self {
        Value::DateTime(Some(value))
    }

    /// `true` if the `Value` is null.
    pub fn is_null(&self) -> bool {
        match self {
            Value::Integer(i) => i.is_none(),
            Value::Float(r) => r.is_none(),
            Value::Numeric(n) => n.is_none(),
            Value::Text(t) => t.is_none(),
            Value::Boolean(b) => b.is_none(),
            Value::Bytes(b) => b.is_none(),
            Value::Date(d) => d.is_none(),
            Value::Time(t) => t.is_none(),
            Value::DateTime(dt) => dt.is_none(),
        }
    }

    /// `true` if the `Value` is text.
    pub fn is_text(&self) -> bool {
        matches!(self, Value::Text(_))
    }

    /// Returns a &str if the value is text, otherwise `None`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(Some(cow)) => Some(cow.borrow()),
            _ => None,
        }
    }

    /// Returns an i64 if the value is an integer, otherwise `None`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => *i,
            _ => None,
        }
    }

    /// Returns an f64 if the value is a float or a convertible numeric,
    /// otherwise `None`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => *f,
            Value::Numeric(Some(n)) => n.to_f64(),
            _ => None,
        }
    }

    /// Returns a bool if the value is a boolean, otherwise `None`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => *b,
            _ => None,
        }
    }

    /// Returns a bytes slice if the value is text or bytes, otherwise
    /// `None`.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Text(Some(cow)) => Some(cow.as_ref().as_bytes()),
            Value::Bytes(Some(cow)) => Some(cow.as_ref()),
            _ => None,
        }
    }
}

impl<'a> fmt::Display for Value<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let res = match self {
            Value::Integer(val) => val.map(|v| write!(f, "{v}")),
            Value::Float(val) => val.map(|v| write!(f, "{v}")),
            Value::Numeric(val) => val.as_ref().map(|v| write!(f, "{v}")),
            Value::Text(val) => val.as_ref().map(|v| write!(f, "\"{v}\"")),
            Value::Boolean(val) => val.map(|v| write!(f, "{v}")),
            Value::Bytes(val) => val.as_ref().map(|v| write!(f, "<{} bytes blob>", v.len())),
            Value::Date(val) => val.map(|v| write!(f, "{v}")),
            Value::Time(val) => val.map(|v| write!(f, "{v}")),
            Value::DateTime(val) => val.map(|v| write!(f, "{v}")),
        };

        match res {
            Some(r) => r,
            None => write!(f, "null"),
        }
    }
}

impl<'a> From<i64> for Value<'a> {
    fn from(value: i64) -> Self {
        Value::integer(value)
    }
}

impl<'a> From<i32> for Value<'a> {
    fn from(value: i32) -> Self {
        Value::integer(value)
    }
}

impl<'a> From<f64> for Value<'a> {
    fn from(value: f64) -> Self {
        Value::float(value)
    }
}

impl<'a> From<f32> for Value<'a> {
    fn from(value: f32) -> Self {
        Value::float(f64::from(value))
    }
}

impl<'a> From<bool> for Value<'a> {
    fn from(value: bool) -> Self {
        Value::boolean(value)
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(value: &'a str) -> Self {
        Value::text(value)
    }
}

impl<'a> From<String> for Value<'a> {
    fn from(value: String) -> Self {
        Value::text(value)
    }
}

impl<'a> From<&'a [u8]> for Value<'a> {
    fn from(value: &'a [u8]) -> Self {
        Value::bytes(value)
    }
}

impl<'a> From<Vec<u8>> for Value<'a> {
    fn from(value: Vec<u8>) -> Self {
        Value::bytes(value)
    }
}

impl<'a> From<BigDecimal> for Value<'a> {
    fn from(value: BigDecimal) -> Self {
        Value::numeric(value)
    }
}

impl<'a> From<NaiveDate> for Value<'a> {
    fn from(value: NaiveDate) -> Self {
        Value::date(value)
    }
}

impl<'a> From<NaiveTime> for Value<'a> {
    fn from(value: NaiveTime) -> Self {
        Value::time(value)
    }
}

impl<'a> From<DateTime<Utc>> for Value<'a> {
    fn from(value: DateTime<Utc>) -> Self {
        Value::datetime(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_renders_nulls_uniformly() {
        assert_eq!("null", Value::Integer(None).to_string());
        assert_eq!("null", Value::Text(None).to_string());
        assert_eq!("null", Value::Bytes(None).to_string());
    }

    #[test]
    fn display_quotes_text() {
        assert_eq!("\"musti\"", Value::text("musti").to_string());
    }

    #[test]
    fn conversions_pick_the_matching_variant() {
        assert_eq!(Value::Integer(Some(1)), Value::from(1i64));
        assert_eq!(Value::Boolean(Some(true)), Value::from(true));
        assert_eq!(Value::Text(Some("naukio".into())), Value::from("naukio"));
        assert!(Value::from(1.5f64).as_f64().is_some());
    }

    #[test]
    fn null_detection_covers_every_variant() {
        assert!(Value::Numeric(None).is_null());
        assert!(!Value::integer(0).is_null());
        assert!(!Value::text("").is_null());
    }
}
