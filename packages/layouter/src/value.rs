//! Typed attribute values and the text codec.
//!
//! `encode` turns attribute text into a typed value and `decode` renders it
//! back. The numeric heuristic collapses integral floats into integers, so
//! `"3"` and `"3.0"` both become `Integer(3)` and serialize as `3`.

use std::fmt;

/// A typed XML attribute value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AttributeValue {
    /// Whole number.
    Integer(i64),
    /// Non-integral number.
    Float(f64),
    /// `true`/`false`.
    Boolean(bool),
    /// Any other text, whitespace-trimmed.
    String(String),
    /// Declared but unset; never written to XML.
    #[default]
    Absent,
}

impl AttributeValue {
    /// Build a numeric value, collapsing integral floats to integers.
    ///
    /// Non-finite numbers have no attribute form and become strings.
    #[must_use]
    pub fn from_f64(x: f64) -> Self {
        if !x.is_finite() {
            return Self::String(x.to_string());
        }
        if x.trunc() == x && x >= i64::MIN as f64 && x < i64::MAX as f64 {
            #[allow(clippy::cast_possible_truncation)]
            return Self::Integer(x as i64);
        }
        Self::Float(x)
    }

    /// Whether the value is declared-but-unset.
    #[must_use]
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Borrow the string payload, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Boolean payload, if this is a boolean.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Integer payload, if this is an integer.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric payload as a float, for integers and floats.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            #[allow(clippy::cast_precision_loss)]
            Self::Integer(n) => Some(*n as f64),
            Self::Float(x) => Some(*x),
            _ => None,
        }
    }

    /// The value as it reads back after being written and parsed again.
    ///
    /// ```
    /// use ggb_layouter::value::AttributeValue;
    ///
    /// assert_eq!(AttributeValue::from("1").canonical(), AttributeValue::Integer(1));
    /// assert_eq!(AttributeValue::Absent.canonical(), AttributeValue::Absent);
    /// ```
    #[must_use]
    pub fn canonical(&self) -> Self {
        decode(self).map_or(Self::Absent, |text| encode(&text))
    }
}

/// Convert attribute text into a typed value.
///
/// # Examples
/// ```
/// use ggb_layouter::value::{encode, AttributeValue};
///
/// assert_eq!(encode("3"), AttributeValue::Integer(3));
/// assert_eq!(encode("3.0"), AttributeValue::Integer(3));
/// assert_eq!(encode("0.5"), AttributeValue::Float(0.5));
/// assert_eq!(encode("TRUE"), AttributeValue::Boolean(true));
/// assert_eq!(encode("  A  "), AttributeValue::String("A".to_string()));
/// ```
#[must_use]
pub fn encode(text: &str) -> AttributeValue {
    let trimmed = text.trim();

    if let Ok(x) = trimmed.parse::<f64>() {
        if x.is_finite() {
            return AttributeValue::from_f64(x);
        }
    }

    if trimmed.eq_ignore_ascii_case("true") {
        AttributeValue::Boolean(true)
    } else if trimmed.eq_ignore_ascii_case("false") {
        AttributeValue::Boolean(false)
    } else {
        AttributeValue::String(trimmed.to_string())
    }
}

/// Render a typed value as attribute text; absent values yield `None`.
///
/// Escaping of XML special characters happens at serialization time, not here.
#[must_use]
pub fn decode(value: &AttributeValue) -> Option<String> {
    match value {
        AttributeValue::Absent => None,
        AttributeValue::String(s) => Some(s.clone()),
        AttributeValue::Boolean(b) => Some(b.to_string()),
        AttributeValue::Integer(n) => Some(n.to_string()),
        AttributeValue::Float(x) => Some(x.to_string()),
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match decode(self) {
            Some(text) => f.write_str(&text),
            None => f.write_str("<absent>"),
        }
    }
}

impl From<i64> for AttributeValue {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<i32> for AttributeValue {
    fn from(n: i32) -> Self {
        Self::Integer(i64::from(n))
    }
}

impl From<f64> for AttributeValue {
    fn from(x: f64) -> Self {
        Self::from_f64(x)
    }
}

impl From<bool> for AttributeValue {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl<T: Into<AttributeValue>> From<Option<T>> for AttributeValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Absent, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_integer_float_collapse() {
        assert_eq!(encode("3"), encode("3.0"));
        assert_eq!(encode("3.0"), AttributeValue::Integer(3));
        assert_eq!(encode("-5"), AttributeValue::Integer(-5));
        assert_eq!(encode("-0.0"), AttributeValue::Integer(0));
        assert_eq!(encode("1e3"), AttributeValue::Integer(1000));
    }

    #[test]
    fn test_encode_float() {
        assert_eq!(encode("0.5"), AttributeValue::Float(0.5));
        assert_eq!(encode(" 2.25 "), AttributeValue::Float(2.25));
    }

    #[test]
    fn test_encode_boolean_case_insensitive() {
        assert_eq!(encode("true"), AttributeValue::Boolean(true));
        assert_eq!(encode("False"), AttributeValue::Boolean(false));
        assert_eq!(encode("TRUE"), AttributeValue::Boolean(true));
    }

    #[test]
    fn test_encode_string_trimmed() {
        assert_eq!(encode(" hello "), AttributeValue::String("hello".into()));
        assert_eq!(encode("5.0.528.0"), AttributeValue::String("5.0.528.0".into()));
        assert_eq!(encode(""), AttributeValue::String(String::new()));
    }

    #[test]
    fn test_encode_non_finite_stays_text() {
        assert_eq!(encode("nan"), AttributeValue::String("nan".into()));
        assert_eq!(encode("inf"), AttributeValue::String("inf".into()));
        assert_eq!(encode("-Infinity"), AttributeValue::String("-Infinity".into()));
    }

    #[test]
    fn test_decode() {
        assert_eq!(decode(&AttributeValue::Boolean(true)).as_deref(), Some("true"));
        assert_eq!(decode(&AttributeValue::Boolean(false)).as_deref(), Some("false"));
        assert_eq!(decode(&AttributeValue::Integer(42)).as_deref(), Some("42"));
        assert_eq!(decode(&AttributeValue::Float(0.5)).as_deref(), Some("0.5"));
        assert_eq!(decode(&AttributeValue::String("a<b".into())).as_deref(), Some("a<b"));
        assert_eq!(decode(&AttributeValue::Absent), None);
    }

    #[test]
    fn test_codec_idempotence() {
        let values = [
            AttributeValue::Integer(1),
            AttributeValue::Integer(2),
            AttributeValue::Integer(-5),
            AttributeValue::Float(0.5),
            AttributeValue::Boolean(true),
            AttributeValue::Boolean(false),
            AttributeValue::String("hello".into()),
        ];
        for value in values {
            let text = decode(&value).unwrap();
            assert_eq!(encode(&text), value, "round trip of {text}");
        }
    }

    #[test]
    fn test_from_f64_large_integral_stays_float() {
        let big = 1.0e20;
        assert_eq!(AttributeValue::from_f64(big), AttributeValue::Float(big));
        assert_eq!(encode(&decode(&AttributeValue::Float(big)).unwrap()), AttributeValue::Float(big));
    }

    #[test]
    fn test_conversions() {
        assert_eq!(AttributeValue::from(3_i32), AttributeValue::Integer(3));
        assert_eq!(AttributeValue::from(2.0), AttributeValue::Integer(2));
        assert_eq!(AttributeValue::from(None::<i64>), AttributeValue::Absent);
        assert_eq!(AttributeValue::from("x").as_str(), Some("x"));
        assert_eq!(AttributeValue::Integer(4).as_f64(), Some(4.0));
    }

    #[test]
    fn test_canonical_matches_reparse() {
        assert_eq!(AttributeValue::from("1").canonical(), AttributeValue::Integer(1));
        assert_eq!(AttributeValue::from("5.0").canonical(), AttributeValue::Integer(5));
        assert_eq!(AttributeValue::from(" true ").canonical(), AttributeValue::Boolean(true));
        assert_eq!(AttributeValue::from("%n").canonical(), AttributeValue::String("%n".into()));
        assert_eq!(AttributeValue::Float(0.25).canonical(), AttributeValue::Float(0.25));
    }
}
