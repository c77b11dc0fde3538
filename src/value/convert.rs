//! Converters between typed values and their external representations
//!
//! Each [`ValueType`] converts its bound payload to and from two string-based
//! forms: the tree form ([`ParameterNode`], mirroring the persisted document
//! shape) and the flat form (one string per scalar entry, as stored in keyed
//! parameter records). Keyed kinds encode flat entries as `value + "$" + key`
//! and decode by splitting on the first `$`.
//!
//! Every conversion checks that the value it is handed belongs to the
//! descriptor it was called on; the legacy [`ValueType::Matrix`] kind fails
//! every conversion.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use ndarray::Array2;

use crate::value::tree::ParameterNode;
use crate::value::types::{ValueError, ValueType};
use crate::value::value::Value;

/// External date format for serialized date values.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Separator between the value and the key in a flat keyed entry.
const KEY_SEPARATOR: char = '$';

/// Builds the flat form of a keyed entry: `value + "$" + key`, or `"$" + key`
/// when there is no value.
pub fn concat_key_value(key: &str, value: Option<&str>) -> String {
    match value {
        Some(v) => format!("{}{}{}", v, KEY_SEPARATOR, key),
        None => format!("{}{}", KEY_SEPARATOR, key),
    }
}

/// Splits a flat keyed entry into `(value, key)`. The key is `None` when the
/// entry carries no separator.
pub fn split_key_value(entry: &str) -> (&str, Option<&str>) {
    match entry.split_once(KEY_SEPARATOR) {
        Some((value, key)) => (value, Some(key)),
        None => (entry, None),
    }
}

fn parse_f64(text: &str) -> Result<f64, ValueError> {
    text.trim().parse::<f64>().map_err(|_| ValueError::Parse {
        text: text.to_string(),
        kind: "double",
    })
}

fn parse_i32(text: &str) -> Result<i32, ValueError> {
    text.trim().parse::<i32>().map_err(|_| ValueError::Parse {
        text: text.to_string(),
        kind: "int",
    })
}

fn parse_date(text: &str) -> Result<NaiveDate, ValueError> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT).map_err(|_| ValueError::Parse {
        text: text.to_string(),
        kind: "Date",
    })
}

fn format_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Flat entries split into `(key, value-text)` pairs, with the bidimensional
/// missing-key fallback left to the caller.
fn keyed_entries(entries: &[String]) -> Result<Vec<(String, String)>, ValueError> {
    entries
        .iter()
        .map(|entry| {
            let (value, key) = split_key_value(entry);
            let key = key.ok_or_else(|| ValueError::MissingKey(entry.clone()))?;
            Ok((key.to_string(), value.to_string()))
        })
        .collect()
}

fn two_column_table(rows: Vec<(f64, f64)>) -> Value {
    let mut table = Array2::zeros((rows.len(), 2));
    for (i, (key, value)) in rows.into_iter().enumerate() {
        table[[i, 0]] = key;
        table[[i, 1]] = value;
    }
    Value::Bidimensional(table)
}

impl ValueType {
    /// Rejects the legacy matrix kind, which has no working converter.
    fn convertible(&self) -> Result<(), ValueError> {
        if *self == ValueType::Matrix {
            Err(ValueError::ConversionUnsupported(self.name()))
        } else {
            Ok(())
        }
    }

    /// Checks that `value` is an instance of this descriptor.
    fn expect_instance(&self, value: &Value) -> Result<(), ValueError> {
        if value.value_type() == *self {
            Ok(())
        } else {
            Err(ValueError::TypeMismatch {
                expected: self.name(),
                actual: value.value_type().name(),
            })
        }
    }

    fn expect_single<'a>(&self, entries: &'a [String]) -> Result<&'a str, ValueError> {
        match entries {
            [only] => Ok(only),
            _ => Err(ValueError::WrongEntryCount {
                expected: self.name(),
                actual: entries.len(),
            }),
        }
    }

    /// Parses the flat string-list form into a typed value.
    ///
    /// Scalar kinds expect exactly one entry; keyed kinds decode each entry
    /// through the `value$key` encoding.
    ///
    /// # Examples
    ///
    /// ```
    /// use agrovar_rs::value::{Value, ValueType};
    ///
    /// let entries = vec!["1.5".to_string(), "2.5".to_string()];
    /// let value = ValueType::ArrayDouble.parse_flat(&entries).unwrap();
    /// assert_eq!(value, Value::ArrayDouble(vec![1.5, 2.5]));
    /// ```
    pub fn parse_flat(&self, entries: &[String]) -> Result<Value, ValueError> {
        self.convertible()?;
        match self {
            ValueType::Double => Ok(Value::Double(parse_f64(self.expect_single(entries)?)?)),
            ValueType::Integer => Ok(Value::Integer(parse_i32(self.expect_single(entries)?)?)),
            ValueType::Date => Ok(Value::Date(parse_date(self.expect_single(entries)?)?)),
            ValueType::String => Ok(Value::String(self.expect_single(entries)?.to_string())),
            ValueType::ArrayDouble | ValueType::ListDouble => {
                let parsed = entries.iter().map(|e| parse_f64(e)).collect::<Result<_, _>>()?;
                Ok(match self {
                    ValueType::ArrayDouble => Value::ArrayDouble(parsed),
                    _ => Value::ListDouble(parsed),
                })
            }
            ValueType::ArrayInteger | ValueType::ListInteger => {
                let parsed = entries.iter().map(|e| parse_i32(e)).collect::<Result<_, _>>()?;
                Ok(match self {
                    ValueType::ArrayInteger => Value::ArrayInteger(parsed),
                    _ => Value::ListInteger(parsed),
                })
            }
            ValueType::ArrayDate | ValueType::ListDate => {
                let parsed = entries.iter().map(|e| parse_date(e)).collect::<Result<_, _>>()?;
                Ok(match self {
                    ValueType::ArrayDate => Value::ArrayDate(parsed),
                    _ => Value::ListDate(parsed),
                })
            }
            ValueType::ArrayString | ValueType::ListString => {
                let parsed: Vec<String> = entries.to_vec();
                Ok(match self {
                    ValueType::ArrayString => Value::ArrayString(parsed),
                    _ => Value::ListString(parsed),
                })
            }
            ValueType::Bidimensional => {
                let rows = entries
                    .iter()
                    .map(|entry| {
                        let (value, key) = split_key_value(entry);
                        let key = parse_f64(key.unwrap_or("0"))?;
                        Ok((key, parse_f64(value)?))
                    })
                    .collect::<Result<Vec<_>, ValueError>>()?;
                Ok(two_column_table(rows))
            }
            ValueType::DictionaryStringString => {
                let map: BTreeMap<String, String> = keyed_entries(entries)?.into_iter().collect();
                Ok(Value::DictionaryStringString(map))
            }
            ValueType::DictionaryStringDouble => {
                let map = keyed_entries(entries)?
                    .into_iter()
                    .map(|(k, v)| Ok((k, parse_f64(&v)?)))
                    .collect::<Result<BTreeMap<_, _>, ValueError>>()?;
                Ok(Value::DictionaryStringDouble(map))
            }
            ValueType::DictionaryDoubleDouble => {
                let pairs = keyed_entries(entries)?
                    .into_iter()
                    .map(|(k, v)| Ok((parse_f64(&k)?, parse_f64(&v)?)))
                    .collect::<Result<Vec<_>, ValueError>>()?;
                Ok(Value::DictionaryDoubleDouble(pairs))
            }
            ValueType::DictionaryIntDouble => {
                let map = keyed_entries(entries)?
                    .into_iter()
                    .map(|(k, v)| Ok((parse_i32(&k)?, parse_f64(&v)?)))
                    .collect::<Result<BTreeMap<_, _>, ValueError>>()?;
                Ok(Value::DictionaryIntDouble(map))
            }
            ValueType::Matrix => unreachable!("rejected by convertible()"),
        }
    }

    /// Serializes a typed value to its flat string-list form.
    pub fn to_flat(&self, value: &Value) -> Result<Vec<String>, ValueError> {
        self.convertible()?;
        self.expect_instance(value)?;
        let entries = match value {
            Value::Double(v) => vec![v.to_string()],
            Value::Integer(v) => vec![v.to_string()],
            Value::Date(v) => vec![format_date(v)],
            Value::String(v) => vec![v.clone()],
            Value::ArrayDouble(v) | Value::ListDouble(v) => {
                v.iter().map(|e| e.to_string()).collect()
            }
            Value::ArrayInteger(v) | Value::ListInteger(v) => {
                v.iter().map(|e| e.to_string()).collect()
            }
            Value::ArrayDate(v) | Value::ListDate(v) => v.iter().map(format_date).collect(),
            Value::ArrayString(v) | Value::ListString(v) => v.clone(),
            Value::Bidimensional(table) => {
                if table.ncols() != 2 {
                    return Err(ValueError::WrongTableShape(table.ncols()));
                }
                table
                    .rows()
                    .into_iter()
                    .map(|row| concat_key_value(&row[0].to_string(), Some(&row[1].to_string())))
                    .collect()
            }
            Value::DictionaryStringString(map) => map
                .iter()
                .map(|(k, v)| concat_key_value(k, Some(v)))
                .collect(),
            Value::DictionaryStringDouble(map) => map
                .iter()
                .map(|(k, v)| concat_key_value(k, Some(&v.to_string())))
                .collect(),
            Value::DictionaryDoubleDouble(pairs) => pairs
                .iter()
                .map(|(k, v)| concat_key_value(&k.to_string(), Some(&v.to_string())))
                .collect(),
            Value::DictionaryIntDouble(map) => map
                .iter()
                .map(|(k, v)| concat_key_value(&k.to_string(), Some(&v.to_string())))
                .collect(),
            Value::Matrix(_) => unreachable!("rejected by convertible()"),
        };
        Ok(entries)
    }

    /// Parses the tree form into a typed value. Keyed kinds require every
    /// entry to carry a key.
    pub fn parse_tree(&self, node: &ParameterNode) -> Result<Value, ValueError> {
        self.convertible()?;
        match self {
            ValueType::Bidimensional => {
                let rows = node
                    .values
                    .iter()
                    .map(|entry| {
                        let key = entry
                            .key
                            .as_deref()
                            .ok_or_else(|| ValueError::MissingKey(entry.text.clone()))?;
                        Ok((parse_f64(key)?, parse_f64(&entry.text)?))
                    })
                    .collect::<Result<Vec<_>, ValueError>>()?;
                Ok(two_column_table(rows))
            }
            ValueType::DictionaryStringString
            | ValueType::DictionaryStringDouble
            | ValueType::DictionaryDoubleDouble
            | ValueType::DictionaryIntDouble => {
                let entries: Vec<String> = node
                    .values
                    .iter()
                    .map(|entry| {
                        let key = entry
                            .key
                            .as_deref()
                            .ok_or_else(|| ValueError::MissingKey(entry.text.clone()))?;
                        Ok(concat_key_value(key, Some(&entry.text)))
                    })
                    .collect::<Result<_, ValueError>>()?;
                self.parse_flat(&entries)
            }
            _ => {
                let entries: Vec<String> =
                    node.values.iter().map(|entry| entry.text.clone()).collect();
                self.parse_flat(&entries)
            }
        }
    }

    /// Serializes a typed value to its tree form under the given variable
    /// name.
    pub fn to_tree(&self, value: &Value, name: &str) -> Result<ParameterNode, ValueError> {
        self.convertible()?;
        self.expect_instance(value)?;
        let mut node = ParameterNode::new(name);
        match value {
            Value::Bidimensional(table) => {
                if table.ncols() != 2 {
                    return Err(ValueError::WrongTableShape(table.ncols()));
                }
                for row in table.rows() {
                    node.push_keyed(row[0].to_string(), row[1].to_string());
                }
            }
            Value::DictionaryStringString(map) => {
                for (k, v) in map {
                    node.push_keyed(k.clone(), v.clone());
                }
            }
            Value::DictionaryStringDouble(map) => {
                for (k, v) in map {
                    node.push_keyed(k.clone(), v.to_string());
                }
            }
            Value::DictionaryDoubleDouble(pairs) => {
                for (k, v) in pairs {
                    node.push_keyed(k.to_string(), v.to_string());
                }
            }
            Value::DictionaryIntDouble(map) => {
                for (k, v) in map {
                    node.push_keyed(k.to_string(), v.to_string());
                }
            }
            _ => {
                for text in self.to_flat(value)? {
                    node.push_value(text);
                }
            }
        }
        Ok(node)
    }

    /// Whether the flat representation and the typed value agree on entry
    /// count.
    pub fn sizes_match_flat(&self, entries: &[String], value: &Value) -> Result<bool, ValueError> {
        self.convertible()?;
        self.expect_instance(value)?;
        Ok(entries.len() == value.element_count())
    }

    /// Whether the tree representation and the typed value agree on entry
    /// count.
    pub fn sizes_match_tree(&self, node: &ParameterNode, value: &Value) -> Result<bool, ValueError> {
        self.convertible()?;
        self.expect_instance(value)?;
        Ok(node.values.len() == value.element_count())
    }

    /// Returns a deep copy of the value, after checking it belongs to this
    /// descriptor. The matrix kind fails like every other conversion.
    pub fn clone_value(&self, value: &Value) -> Result<Value, ValueError> {
        self.convertible()?;
        self.expect_instance(value)?;
        Ok(value.clone())
    }
}
