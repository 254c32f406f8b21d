//! Scalar values produced by argument coercion.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static INTEGER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[+-]?[0-9]+$").unwrap());

static FLOAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?(?:[0-9]+\.[0-9]*|\.[0-9]+)$").unwrap());

/// A coerced shortcode argument.
///
/// Unquoted tokens are coerced by shape: integer first, then float, otherwise
/// the token stays a string. Quoted tokens are always strings.
///
/// # Example
///
/// ```
/// use sc_renderer::Value;
///
/// assert_eq!(Value::coerce("42"), Value::Int(42));
/// assert_eq!(Value::coerce("1.5"), Value::Float(1.5));
/// assert_eq!(Value::coerce("large"), Value::from("large"));
/// assert_eq!(Value::coerce("007"), Value::Int(7));
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Value {
    /// Optional sign followed by ASCII digits.
    Int(i64),
    /// Optional sign, a decimal point, digits on at least one side.
    Float(f64),
    /// Anything else, and every quoted token.
    Str(String),
}

impl Value {
    /// Coerce a raw, unquoted token.
    ///
    /// Digit strings that overflow `i64` are kept as strings so that no
    /// digits are silently lost.
    #[must_use]
    pub fn coerce(token: &str) -> Self {
        if INTEGER.is_match(token) {
            if let Ok(n) = token.parse::<i64>() {
                return Self::Int(n);
            }
        } else if FLOAT.is_match(token)
            && let Ok(f) = token.parse::<f64>()
        {
            return Self::Float(f);
        }
        Self::Str(token.to_owned())
    }

    /// Borrow the string payload, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Whether this value is the string `s`.
    #[must_use]
    pub fn is_str(&self, s: &str) -> bool {
        self.as_str() == Some(s)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            // Whole floats keep a fractional digit: `2.0`, not `2`.
            Self::Float(x) if x.is_finite() && x.fract() == 0.0 => write!(f, "{x:.1}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_integer() {
        assert_eq!(Value::coerce("123"), Value::Int(123));
        assert_eq!(Value::coerce("-5"), Value::Int(-5));
        assert_eq!(Value::coerce("+8"), Value::Int(8));
    }

    #[test]
    fn test_coerce_leading_zeros() {
        assert_eq!(Value::coerce("007"), Value::Int(7));
    }

    #[test]
    fn test_coerce_integer_overflow_stays_string() {
        let big = "99999999999999999999999";
        assert_eq!(Value::coerce(big), Value::from(big));
    }

    #[test]
    fn test_coerce_float() {
        assert_eq!(Value::coerce("1.5"), Value::Float(1.5));
        assert_eq!(Value::coerce(".5"), Value::Float(0.5));
        assert_eq!(Value::coerce("2."), Value::Float(2.0));
        assert_eq!(Value::coerce("-0.25"), Value::Float(-0.25));
    }

    #[test]
    fn test_coerce_string() {
        assert_eq!(Value::coerce("50px"), Value::from("50px"));
        assert_eq!(Value::coerce("1.2.3"), Value::from("1.2.3"));
        assert_eq!(Value::coerce("."), Value::from("."));
        assert_eq!(Value::coerce("-"), Value::from("-"));
        assert_eq!(Value::coerce(""), Value::from(""));
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Int(42).to_string(), "42");
        assert_eq!(Value::Float(1.5).to_string(), "1.5");
        assert_eq!(Value::Float(2.0).to_string(), "2.0");
        assert_eq!(Value::from("a b").to_string(), "a b");
    }

    #[test]
    fn test_is_str() {
        assert!(Value::from("download").is_str("download"));
        assert!(!Value::Int(1).is_str("1"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serialize_untagged() {
        let json = serde_json::to_string(&vec![
            Value::Int(1),
            Value::Float(1.5),
            Value::from("x"),
        ])
        .unwrap();
        assert_eq!(json, r#"[1,1.5,"x"]"#);
    }
}
