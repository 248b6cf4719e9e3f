//! Typed values and column types carried by statements and rows.

use std::fmt;

/// A single cell value.
///
/// Statements carry literals as `Value`s and the reference backend stores
/// rows as `Value`s, so comparison never needs to go back to SQL text.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// SQL NULL
    Null,
    /// Character data
    Text(String),
    /// Signed integer
    Int(i64),
    /// Floating point
    Float(f64),
    /// Raw bytes (BLOB / BINARY)
    Bytes(Vec<u8>),
}

impl Value {
    /// True for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Numeric interpretation of the value, if it has one.
    ///
    /// Text is trimmed and parsed, integers first.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            Self::Text(s) => parse_number(s),
            Self::Null | Self::Bytes(_) => None,
        }
    }
}

pub(crate) fn parse_number(s: &str) -> Option<f64> {
    let s = s.trim();
    s.parse::<i64>()
        .map(|i| i as f64)
        .ok()
        .or_else(|| s.parse::<f64>().ok())
}

impl fmt::Display for Value {
    /// Natural rendering: what a client would see in a text result set.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Text(s) => write!(f, "{}", s),
            Self::Int(i) => write!(f, "{}", i),
            Self::Float(v) => write!(f, "{}", v),
            Self::Bytes(b) => write!(f, "{}", String::from_utf8_lossy(b)),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Self::Bytes(b)
    }
}

/// Declared column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// INT / BIGINT / TINYINT ...
    Int,
    /// FLOAT / DOUBLE / DECIMAL
    Float,
    /// CHAR / VARCHAR / TEXT
    Text,
    /// BINARY / VARBINARY / BLOB
    Blob,
}

impl DataType {
    /// Convert a literal to this column type when the conversion is lossless
    /// enough to be unsurprising; otherwise keep the literal as given.
    ///
    /// NULL always stays NULL.
    pub fn conform(self, value: Value) -> Value {
        match (self, value) {
            (Self::Int, Value::Text(s)) => match s.trim().parse::<i64>() {
                Ok(i) => Value::Int(i),
                Err(_) => Value::Text(s),
            },
            (Self::Int, Value::Float(f)) if f.fract() == 0.0 => Value::Int(f as i64),
            (Self::Float, Value::Int(i)) => Value::Float(i as f64),
            (Self::Float, Value::Text(s)) => match s.trim().parse::<f64>() {
                Ok(f) => Value::Float(f),
                Err(_) => Value::Text(s),
            },
            (Self::Text, Value::Int(i)) => Value::Text(i.to_string()),
            (Self::Text, Value::Float(f)) => Value::Text(f.to_string()),
            (Self::Blob, Value::Text(s)) => Value::Bytes(s.into_bytes()),
            (_, other) => other,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int => write!(f, "BIGINT"),
            Self::Float => write!(f, "DOUBLE"),
            Self::Text => write!(f, "TEXT"),
            Self::Blob => write!(f, "BLOB"),
        }
    }
}
