//! Tree representation of a serialized parameter value
//!
//! The persisted document format represents each variable as a `Parameter`
//! node holding one child `Value` node per scalar entry; keyed kinds attach a
//! `Key` attribute to each entry. The structures here carry that shape as
//! plain data, leaving the concrete document syntax to the reader and writer
//! collaborators.

use serde::{Deserialize, Serialize};

/// One scalar entry of a serialized value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueNode {
    /// The entry key, present only for keyed kinds (tables, dictionaries).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Text form of the entry value.
    pub text: String,
}

/// A serialized variable value: the variable name plus its entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterNode {
    /// Name of the variable this node serializes.
    pub name: String,
    /// The entries, in order.
    #[serde(default)]
    pub values: Vec<ValueNode>,
}

impl ParameterNode {
    /// Creates an empty node for the named variable.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            values: Vec::new(),
        }
    }

    /// Appends a positional entry.
    pub fn push_value(&mut self, text: impl Into<String>) {
        self.values.push(ValueNode {
            key: None,
            text: text.into(),
        });
    }

    /// Appends a keyed entry.
    pub fn push_keyed(&mut self, key: impl Into<String>, text: impl Into<String>) {
        self.values.push(ValueNode {
            key: Some(key.into()),
            text: text.into(),
        });
    }
}
