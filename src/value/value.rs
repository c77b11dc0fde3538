//! Runtime values for typed variables
//!
//! [`Value`] is the owned payload a [`Variable`](crate::variable::Variable)
//! holds at run time. It has one variant per [`ValueType`] descriptor, so a
//! value always knows its own type and conversions can match exhaustively.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use ndarray::Array2;

use crate::value::types::ValueType;

/// A typed runtime value.
///
/// Cloning a `Value` is a deep copy: sequences, maps and tables own their
/// elements.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Scalar `f64`.
    Double(f64),
    /// Fixed-size sequence of `f64`.
    ArrayDouble(Vec<f64>),
    /// Unbounded sequence of `f64`.
    ListDouble(Vec<f64>),
    /// Scalar `i32`.
    Integer(i32),
    /// Fixed-size sequence of `i32`.
    ArrayInteger(Vec<i32>),
    /// Unbounded sequence of `i32`.
    ListInteger(Vec<i32>),
    /// Calendar date.
    Date(NaiveDate),
    /// Fixed-size sequence of dates.
    ArrayDate(Vec<NaiveDate>),
    /// Unbounded sequence of dates.
    ListDate(Vec<NaiveDate>),
    /// Scalar string.
    String(String),
    /// Fixed-size sequence of strings.
    ArrayString(Vec<String>),
    /// Unbounded sequence of strings.
    ListString(Vec<String>),
    /// Two-column numeric table; row `i` is `(key, value)`.
    Bidimensional(Array2<f64>),
    /// String-keyed map of strings.
    DictionaryStringString(BTreeMap<String, String>),
    /// String-keyed map of `f64`.
    DictionaryStringDouble(BTreeMap<String, f64>),
    /// `f64`-keyed association list of `f64`, kept in insertion order.
    DictionaryDoubleDouble(Vec<(f64, f64)>),
    /// `i32`-keyed map of `f64`.
    DictionaryIntDouble(BTreeMap<i32, f64>),
    /// Unbounded two-dimensional numeric table (legacy, no converter).
    Matrix(Array2<f64>),
}

impl Value {
    /// The descriptor this value is an instance of.
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Double(_) => ValueType::Double,
            Value::ArrayDouble(_) => ValueType::ArrayDouble,
            Value::ListDouble(_) => ValueType::ListDouble,
            Value::Integer(_) => ValueType::Integer,
            Value::ArrayInteger(_) => ValueType::ArrayInteger,
            Value::ListInteger(_) => ValueType::ListInteger,
            Value::Date(_) => ValueType::Date,
            Value::ArrayDate(_) => ValueType::ArrayDate,
            Value::ListDate(_) => ValueType::ListDate,
            Value::String(_) => ValueType::String,
            Value::ArrayString(_) => ValueType::ArrayString,
            Value::ListString(_) => ValueType::ListString,
            Value::Bidimensional(_) => ValueType::Bidimensional,
            Value::DictionaryStringString(_) => ValueType::DictionaryStringString,
            Value::DictionaryStringDouble(_) => ValueType::DictionaryStringDouble,
            Value::DictionaryDoubleDouble(_) => ValueType::DictionaryDoubleDouble,
            Value::DictionaryIntDouble(_) => ValueType::DictionaryIntDouble,
            Value::Matrix(_) => ValueType::Matrix,
        }
    }

    /// Number of scalar entries in the value: 1 for scalars, the length for
    /// sequences and maps, the row count for tables.
    pub fn element_count(&self) -> usize {
        match self {
            Value::Double(_) | Value::Integer(_) | Value::Date(_) | Value::String(_) => 1,
            Value::ArrayDouble(v) | Value::ListDouble(v) => v.len(),
            Value::ArrayInteger(v) | Value::ListInteger(v) => v.len(),
            Value::ArrayDate(v) | Value::ListDate(v) => v.len(),
            Value::ArrayString(v) | Value::ListString(v) => v.len(),
            Value::Bidimensional(m) | Value::Matrix(m) => m.nrows(),
            Value::DictionaryStringString(m) => m.len(),
            Value::DictionaryStringDouble(m) => m.len(),
            Value::DictionaryDoubleDouble(m) => m.len(),
            Value::DictionaryIntDouble(m) => m.len(),
        }
    }

    /// The numeric reading of a scalar value, if it has one.
    pub fn as_scalar_f64(&self) -> Option<f64> {
        match self {
            Value::Double(v) => Some(*v),
            Value::Integer(v) => Some(f64::from(*v)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;

    #[test]
    fn test_value_type_mapping() {
        assert_eq!(Value::Double(1.0).value_type(), ValueType::Double);
        assert_eq!(
            Value::ListDate(vec![]).value_type(),
            ValueType::ListDate
        );
        assert_eq!(
            Value::Matrix(Array2::zeros((2, 3))).value_type(),
            ValueType::Matrix
        );
    }

    #[test]
    fn test_element_count() {
        assert_eq!(Value::Double(1.0).element_count(), 1);
        assert_eq!(Value::ArrayInteger(vec![1, 2, 3]).element_count(), 3);
        assert_eq!(
            Value::Bidimensional(arr2(&[[1.0, 10.0], [2.0, 20.0]])).element_count(),
            2
        );
        let mut dict = BTreeMap::new();
        dict.insert("a".to_string(), 1.0);
        assert_eq!(Value::DictionaryStringDouble(dict).element_count(), 1);
    }

    #[test]
    fn test_clone_is_deep() {
        let original = Value::ArrayDouble(vec![1.0, 2.0]);
        let copy = original.clone();
        assert_eq!(original, copy);
        if let (Value::ArrayDouble(a), Value::ArrayDouble(b)) = (&original, &copy) {
            assert_ne!(a.as_ptr(), b.as_ptr());
        }
    }

    #[test]
    fn test_as_scalar_f64() {
        assert_eq!(Value::Double(2.5).as_scalar_f64(), Some(2.5));
        assert_eq!(Value::Integer(4).as_scalar_f64(), Some(4.0));
        assert_eq!(Value::String("x".to_string()).as_scalar_f64(), None);
    }
}
