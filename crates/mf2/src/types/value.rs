use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};

/// A runtime value passed to a template render or resolved from a literal.
///
/// The `Value` enum provides a dynamic type system for template variables,
/// allowing strings, numbers and datetimes to be passed interchangeably.
///
/// # Example
///
/// ```
/// use mf2::Value;
///
/// // Numbers become Value::Number
/// let count: Value = 42.into();
///
/// // Strings become Value::String
/// let name: Value = "Alice".into();
///
/// assert_eq!(count.as_number(), Some(42.0));
/// assert_eq!(name.as_string(), Some("Alice"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A string value.
    String(String),

    /// A numeric value. Number literals and all numeric inputs resolve to
    /// 64-bit floats, matching the number literal type of the MF2 grammar.
    Number(f64),

    /// A timezone-aware datetime value.
    Datetime(DateTime<FixedOffset>),
}

impl Value {
    /// Get this value as a number, if it is one.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Get this value as a string, if it is one.
    pub fn as_string(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get this value as a datetime, if it is one.
    pub fn as_datetime(&self) -> Option<&DateTime<FixedOffset>> {
        match self {
            Value::Datetime(d) => Some(d),
            _ => None,
        }
    }
}

impl std::fmt::Display for Value {
    /// The canonical string form: numbers print in their shortest plain
    /// decimal form, datetimes in RFC 3339.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::String(s) => write!(f, "{s}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::Datetime(d) => write!(f, "{}", d.to_rfc3339()),
        }
    }
}

// From implementations for common types

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n.into())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(n.into())
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Number(n as f64)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::Number(n.into())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(d: DateTime<FixedOffset>) -> Self {
        Value::Datetime(d)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(d: DateTime<Utc>) -> Self {
        Value::Datetime(d.fixed_offset())
    }
}

impl From<NaiveDateTime> for Value {
    fn from(d: NaiveDateTime) -> Self {
        Value::Datetime(d.and_utc().fixed_offset())
    }
}
