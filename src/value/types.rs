//! The closed set of value-type descriptors
//!
//! Every [`Variable`](crate::variable::Variable) declares one of the value
//! types defined here. A value type knows the runtime payload it binds to,
//! the prefix/postfix pattern of its persisted type-name string, and (through
//! the converters in [`convert`](crate::value::convert)) how to move values
//! between their typed form and the two external string representations.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Size recorded for list-valued variables, whose length is not fixed by the
/// type definition.
pub const UNBOUNDED_SIZE: i32 = -1;

/// Errors raised by the value-type registry and its converters.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValueError {
    /// A type-name string matched no descriptor, or more than one.
    #[error("value type '{0}' is not supported")]
    UnsupportedTypeName(String),

    /// The size embedded in a type-name string is not a number.
    #[error("invalid size in value type '{0}'")]
    InvalidSize(String),

    /// A converter was handed a value of the wrong runtime variant.
    #[error("type mismatch: expected a {expected} value, got a {actual} value")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    /// The descriptor has no working converter (legacy unbounded matrix).
    #[error("conversion is not supported for value type '{0}'")]
    ConversionUnsupported(&'static str),

    /// A scalar converter expects exactly one entry.
    #[error("a single entry is expected for a {expected} value, got {actual}")]
    WrongEntryCount { expected: &'static str, actual: usize },

    /// A keyed entry is missing its key attribute.
    #[error("value entry '{0}' is missing its key")]
    MissingKey(String),

    /// A bidimensional table must have exactly two columns.
    #[error("a two-column table is expected, got {0} columns")]
    WrongTableShape(usize),

    /// A textual entry could not be parsed into the target scalar type.
    #[error("cannot parse '{text}' as {kind}")]
    Parse { text: String, kind: &'static str },

    /// A variable's value type can be assigned only once.
    #[error("cannot change a value type once set (current: {current}, requested: {requested})")]
    ValueTypeAlreadySet {
        current: &'static str,
        requested: &'static str,
    },
}

/// The closed set of value types a [`Variable`](crate::variable::Variable)
/// can take.
///
/// Each variant is a descriptor: it binds a runtime payload (one variant of
/// [`Value`](crate::value::Value)), a canonical type-name pattern used in
/// persisted records, and a converter selected by exhaustive match. The set
/// is fixed at compile time; adding a kind means adding a variant and letting
/// the compiler point at every match that must learn about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueType {
    /// A scalar `f64`. Type name `double`.
    Double,
    /// A fixed-size sequence of `f64`. Type name `double[n]`.
    ArrayDouble,
    /// An unbounded sequence of `f64`. Type name `List<double>`.
    ListDouble,
    /// A scalar `i32`. Type name `int`.
    Integer,
    /// A fixed-size sequence of `i32`. Type name `int[n]`.
    ArrayInteger,
    /// An unbounded sequence of `i32`. Type name `List<int>`.
    ListInteger,
    /// A calendar date. Type name `Date`.
    Date,
    /// A fixed-size sequence of dates. Type name `Date[n]`.
    ArrayDate,
    /// An unbounded sequence of dates. Type name `List<Date>`.
    ListDate,
    /// A scalar string. Type name `string`.
    String,
    /// A fixed-size sequence of strings. Type name `string[n]`.
    ArrayString,
    /// An unbounded sequence of strings. Type name `List<string>`.
    ListString,
    /// A two-column numeric table with a variable number of rows; the first
    /// column is the key, the second the value. Type name `double[n,2]`.
    Bidimensional,
    /// A string-keyed map of strings. Type name `dictionary<string,string>`.
    DictionaryStringString,
    /// A string-keyed map of `f64`. Type name `dictionary<string,double>`.
    DictionaryStringDouble,
    /// A `f64`-keyed association list of `f64`. Type name
    /// `dictionary<double,double>`.
    DictionaryDoubleDouble,
    /// An `i32`-keyed map of `f64`. Type name `dictionary<int,double>`.
    DictionaryIntDouble,
    /// A two-dimensional numeric table with variable rows and columns.
    /// Legacy kind: it has no type-name pattern and no working converter.
    Matrix,
}

impl ValueType {
    /// Every descriptor, in ordinal order.
    pub const ALL: [ValueType; 18] = [
        ValueType::Double,
        ValueType::ArrayDouble,
        ValueType::ListDouble,
        ValueType::Integer,
        ValueType::ArrayInteger,
        ValueType::ListInteger,
        ValueType::Date,
        ValueType::ArrayDate,
        ValueType::ListDate,
        ValueType::String,
        ValueType::ArrayString,
        ValueType::ListString,
        ValueType::Bidimensional,
        ValueType::DictionaryStringString,
        ValueType::DictionaryStringDouble,
        ValueType::DictionaryDoubleDouble,
        ValueType::DictionaryIntDouble,
        ValueType::Matrix,
    ];

    /// Registry name identifying the descriptor.
    pub fn name(&self) -> &'static str {
        match self {
            ValueType::Double => "Double",
            ValueType::ArrayDouble => "ArrayDouble",
            ValueType::ListDouble => "ListDouble",
            ValueType::Integer => "Integer",
            ValueType::ArrayInteger => "ArrayInteger",
            ValueType::ListInteger => "ListInteger",
            ValueType::Date => "Date",
            ValueType::ArrayDate => "ArrayDate",
            ValueType::ListDate => "ListDate",
            ValueType::String => "String",
            ValueType::ArrayString => "ArrayString",
            ValueType::ListString => "ListString",
            ValueType::Bidimensional => "Bidimensional",
            ValueType::DictionaryStringString => "DictionaryStringString",
            ValueType::DictionaryStringDouble => "DictionaryStringDouble",
            ValueType::DictionaryDoubleDouble => "DictionaryDoubleDouble",
            ValueType::DictionaryIntDouble => "DictionaryIntDouble",
            ValueType::Matrix => "Matrix",
        }
    }

    /// Human-readable label of the type.
    pub fn label(&self) -> &'static str {
        match self {
            ValueType::Double => "double",
            ValueType::ArrayDouble => "double[]",
            ValueType::ListDouble => "List<double>",
            ValueType::Integer => "int",
            ValueType::ArrayInteger => "int[]",
            ValueType::ListInteger => "List<int>",
            ValueType::Date => "Date",
            ValueType::ArrayDate => "Date[]",
            ValueType::ListDate => "List<Date>",
            ValueType::String => "string",
            ValueType::ArrayString => "string[]",
            ValueType::ListString => "List<string>",
            ValueType::Bidimensional => "double[,2]",
            ValueType::DictionaryStringString => "dictionary<string,string>",
            ValueType::DictionaryStringDouble => "dictionary<string,double>",
            ValueType::DictionaryDoubleDouble => "dictionary<double,double>",
            ValueType::DictionaryIntDouble => "dictionary<int,double>",
            ValueType::Matrix => "double[,]",
        }
    }

    /// Ordinal number of the descriptor.
    pub fn ordinal(&self) -> usize {
        Self::ALL.iter().position(|t| t == self).unwrap_or(usize::MAX)
    }

    /// The prefix of the persisted type-name string. Sized kinds embed their
    /// size between prefix and postfix, so the full name is
    /// `prefix + size + postfix`.
    pub fn parsing_prefix(&self) -> &'static str {
        match self {
            ValueType::Double => "double",
            ValueType::ArrayDouble => "double[",
            ValueType::ListDouble => "List<double>",
            ValueType::Integer => "int",
            ValueType::ArrayInteger => "int[",
            ValueType::ListInteger => "List<int>",
            ValueType::Date => "Date",
            ValueType::ArrayDate => "Date[",
            ValueType::ListDate => "List<Date>",
            ValueType::String => "string",
            ValueType::ArrayString => "string[",
            ValueType::ListString => "List<string>",
            ValueType::Bidimensional => "double[",
            ValueType::DictionaryStringString => "dictionary<string,string>",
            ValueType::DictionaryStringDouble => "dictionary<string,double>",
            ValueType::DictionaryDoubleDouble => "dictionary<double,double>",
            ValueType::DictionaryIntDouble => "dictionary<int,double>",
            ValueType::Matrix => "",
        }
    }

    /// The postfix of the persisted type-name string. Empty for kinds whose
    /// name carries no size.
    pub fn parsing_postfix(&self) -> &'static str {
        match self {
            ValueType::ArrayDouble
            | ValueType::ArrayInteger
            | ValueType::ArrayDate
            | ValueType::ArrayString => "]",
            ValueType::Bidimensional => ",2]",
            _ => "",
        }
    }

    /// Whether the persisted type name must embed a size.
    pub fn requires_size(&self) -> bool {
        !self.parsing_postfix().is_empty()
    }

    /// The size a freshly typed variable reports before any explicit size is
    /// assigned: 1 for scalars, [`UNBOUNDED_SIZE`] for list kinds.
    pub fn default_size(&self) -> i32 {
        match self {
            ValueType::ListDouble
            | ValueType::ListInteger
            | ValueType::ListDate
            | ValueType::ListString => UNBOUNDED_SIZE,
            _ => 1,
        }
    }

    /// Looks a descriptor up by its registry [`name`](Self::name).
    pub fn for_name(name: &str) -> Result<ValueType, ValueError> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.name() == name)
            .ok_or_else(|| ValueError::UnsupportedTypeName(name.to_string()))
    }

    /// Resolves a persisted type-name string to its descriptor and size.
    ///
    /// Exactly one descriptor must match: prefix equality when the descriptor
    /// needs no postfix, otherwise prefix/postfix bracketing plus agreement
    /// on the bracket shape (`[` and `,2]` must appear in the source exactly
    /// when they appear in the pattern). The size is the number between
    /// prefix and postfix, or 1 when that span is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use agrovar_rs::value::ValueType;
    ///
    /// assert_eq!(ValueType::resolve("double").unwrap(), (ValueType::Double, 1));
    /// assert_eq!(ValueType::resolve("int[3]").unwrap(), (ValueType::ArrayInteger, 3));
    /// assert_eq!(
    ///     ValueType::resolve("double[5,2]").unwrap(),
    ///     (ValueType::Bidimensional, 5)
    /// );
    /// assert!(ValueType::resolve("float").is_err());
    /// ```
    pub fn resolve(source: &str) -> Result<(ValueType, i32), ValueError> {
        let matches_pattern = |t: &ValueType| {
            let prefix = t.parsing_prefix();
            let postfix = t.parsing_postfix();
            if postfix.is_empty() {
                source == prefix
            } else {
                source.starts_with(prefix)
                    && source.ends_with(postfix)
                    && source.contains('[') == prefix.contains('[')
                    && source.contains(",2]") == postfix.contains(",2]")
            }
        };

        let mut found = Self::ALL.iter().copied().filter(matches_pattern);
        let resolved = match (found.next(), found.next()) {
            (Some(t), None) => t,
            _ => return Err(ValueError::UnsupportedTypeName(source.to_string())),
        };

        let middle = source
            .strip_prefix(resolved.parsing_prefix())
            .and_then(|s| s.strip_suffix(resolved.parsing_postfix()))
            .unwrap_or("");
        let size = if middle.is_empty() {
            1
        } else {
            middle
                .parse::<i32>()
                .map_err(|_| ValueError::InvalidSize(source.to_string()))?
        };
        Ok((resolved, size))
    }

    /// Reconstructs the canonical type-name string for this descriptor, with
    /// the given size embedded where the pattern requires one.
    ///
    /// Round-trip law: `resolve(t.type_name(n)?) == (t, n)` for every
    /// descriptor with a working pattern and every valid size.
    pub fn type_name(&self, size: i32) -> Result<String, ValueError> {
        match self {
            ValueType::Matrix => Err(ValueError::ConversionUnsupported(self.name())),
            _ if self.requires_size() => Ok(format!(
                "{}{}{}",
                self.parsing_prefix(),
                size,
                self.parsing_postfix()
            )),
            _ => Ok(self.label().to_string()),
        }
    }
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
