//! Column types and typed values
//!
//! The set of column types is closed. Every type stores its statistics as
//! exactly one `Value` variant; temporal types are integers (days for
//! `Date`, epoch milliseconds for the timestamp types).

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Column data types that can carry shard statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Boolean,
    Integer,
    #[serde(rename = "bigint")]
    BigInt,
    Double,
    Varchar,
    /// Days since 1970-01-01
    Date,
    /// Milliseconds since epoch
    Timestamp,
    /// Milliseconds since epoch packed with a zone key in the low 12 bits
    TimestampWithTimeZone,
}

impl ColumnType {
    /// Returns the type name
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Boolean => "boolean",
            ColumnType::Integer => "integer",
            ColumnType::BigInt => "bigint",
            ColumnType::Double => "double",
            ColumnType::Varchar => "varchar",
            ColumnType::Date => "date",
            ColumnType::Timestamp => "timestamp",
            ColumnType::TimestampWithTimeZone => "timestamp_with_time_zone",
        }
    }

    /// True for types usable as a table's temporal column
    pub fn is_temporal(&self) -> bool {
        matches!(
            self,
            ColumnType::Date | ColumnType::Timestamp | ColumnType::TimestampWithTimeZone
        )
    }

    /// Checks that `value` is the variant this type is stored as
    pub fn accepts(&self, value: &Value) -> bool {
        matches!(
            (self, value),
            (ColumnType::Boolean, Value::Boolean(_))
                | (
                    ColumnType::Integer
                        | ColumnType::BigInt
                        | ColumnType::Date
                        | ColumnType::Timestamp
                        | ColumnType::TimestampWithTimeZone,
                    Value::Integer(_)
                )
                | (ColumnType::Double, Value::Double(_))
                | (ColumnType::Varchar, Value::Text(_))
        )
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single typed statistic value
///
/// Ordering is the native ordering of each variant; doubles use IEEE total
/// ordering so that `Value` is `Ord`. Values of different variants order by
/// variant tag, which only happens for ill-typed input.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Boolean(bool),
    Integer(i64),
    Double(f64),
    Text(String),
}

impl Value {
    fn tag(&self) -> u8 {
        match self {
            Value::Boolean(_) => 0,
            Value::Integer(_) => 1,
            Value::Double(_) => 2,
            Value::Text(_) => 3,
        }
    }

    /// Returns the integer payload, if this is an integer value
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Boolean(a), Value::Boolean(b)) => a.cmp(b),
            (Value::Integer(a), Value::Integer(b)) => a.cmp(b),
            (Value::Double(a), Value::Double(b)) => a.total_cmp(b),
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            _ => self.tag().cmp(&other.tag()),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tag().hash(state);
        match self {
            Value::Boolean(v) => v.hash(state),
            Value::Integer(v) => v.hash(state),
            Value::Double(v) => v.to_bits().hash(state),
            Value::Text(v) => v.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Boolean(v) => write!(f, "{}", v),
            Value::Integer(v) => write!(f, "{}", v),
            Value::Double(v) => write!(f, "{}", v),
            Value::Text(v) => write!(f, "'{}'", v),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_ordering_per_variant() {
        assert!(Value::Integer(-5) < Value::Integer(3));
        assert!(Value::Boolean(false) < Value::Boolean(true));
        assert!(Value::from("apple") < Value::from("banana"));
        assert!(Value::Double(-0.5) < Value::Double(1.25));
    }

    #[test]
    fn test_double_total_ordering() {
        assert!(Value::Double(f64::NEG_INFINITY) < Value::Double(0.0));
        assert!(Value::Double(1.0) < Value::Double(f64::NAN));
        assert_eq!(Value::Double(f64::NAN), Value::Double(f64::NAN));
    }

    #[test]
    fn test_accepts_matches_storage_variant() {
        assert!(ColumnType::Date.accepts(&Value::Integer(19000)));
        assert!(ColumnType::Timestamp.accepts(&Value::Integer(0)));
        assert!(ColumnType::Varchar.accepts(&Value::from("x")));
        assert!(!ColumnType::Varchar.accepts(&Value::Integer(1)));
        assert!(!ColumnType::Double.accepts(&Value::Integer(1)));
    }

    #[test]
    fn test_temporal_types() {
        assert!(ColumnType::Date.is_temporal());
        assert!(ColumnType::Timestamp.is_temporal());
        assert!(ColumnType::TimestampWithTimeZone.is_temporal());
        assert!(!ColumnType::BigInt.is_temporal());
        assert!(!ColumnType::Varchar.is_temporal());
    }

    #[test]
    fn test_untagged_json_roundtrip() {
        let values: Vec<Value> = serde_json::from_str(r#"[true, 42, 1.5, "abc"]"#).unwrap();
        assert_eq!(
            values,
            vec![
                Value::Boolean(true),
                Value::Integer(42),
                Value::Double(1.5),
                Value::from("abc"),
            ]
        );
    }

    #[test]
    fn test_column_type_names() {
        let parsed: ColumnType = serde_json::from_str(r#""bigint""#).unwrap();
        assert_eq!(parsed, ColumnType::BigInt);
        let parsed: ColumnType = serde_json::from_str(r#""timestamp_with_time_zone""#).unwrap();
        assert_eq!(parsed, ColumnType::TimestampWithTimeZone);
        assert_eq!(ColumnType::BigInt.to_string(), "bigint");
    }
}
