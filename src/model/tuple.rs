//! Tuples and shard ranges

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::value::{ColumnType, Value};

/// An ordered sequence of typed values
///
/// Tuples compare lexicographically, component by component, using each
/// value's native ordering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tuple {
    types: Vec<ColumnType>,
    values: Vec<Value>,
}

impl Tuple {
    /// Creates a tuple from parallel type and value lists.
    ///
    /// # Panics
    ///
    /// Panics if the lists differ in length or a value is not stored as
    /// its column type requires.
    pub fn new(types: Vec<ColumnType>, values: Vec<Value>) -> Self {
        assert_eq!(
            types.len(),
            values.len(),
            "tuple types and values differ in length"
        );
        for (column_type, value) in types.iter().zip(&values) {
            assert!(
                column_type.accepts(value),
                "value {} is not valid for column type {}",
                value,
                column_type
            );
        }
        Self { types, values }
    }

    /// Creates a single-column tuple
    pub fn single(column_type: ColumnType, value: impl Into<Value>) -> Self {
        Self::new(vec![column_type], vec![value.into()])
    }

    pub fn types(&self) -> &[ColumnType] {
        &self.types
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the only component of a single-column tuple
    pub fn only(&self) -> Option<(ColumnType, &Value)> {
        match (self.types.as_slice(), self.values.as_slice()) {
            ([column_type], [value]) => Some((*column_type, value)),
            _ => None,
        }
    }
}

impl Ord for Tuple {
    fn cmp(&self, other: &Self) -> Ordering {
        self.values
            .cmp(&other.values)
            .then_with(|| self.types.cmp(&other.types))
    }
}

impl PartialOrd for Tuple {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Tuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", value)?;
        }
        write!(f, ")")
    }
}

/// Min/max range of a shard over an ordered list of columns
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShardRange {
    min: Tuple,
    max: Tuple,
}

impl ShardRange {
    /// Creates a range from its bounds.
    ///
    /// # Panics
    ///
    /// Panics if the bounds are over different column types.
    pub fn new(min: Tuple, max: Tuple) -> Self {
        assert_eq!(
            min.types(),
            max.types(),
            "shard range bounds have different column types"
        );
        Self { min, max }
    }

    /// Creates a single-column range
    pub fn single(column_type: ColumnType, min: impl Into<Value>, max: impl Into<Value>) -> Self {
        Self::new(
            Tuple::single(column_type, min),
            Tuple::single(column_type, max),
        )
    }

    pub fn min(&self) -> &Tuple {
        &self.min
    }

    pub fn max(&self) -> &Tuple {
        &self.max
    }

    pub fn column_types(&self) -> &[ColumnType] {
        self.min.types()
    }
}

impl fmt::Display for ShardRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}
