//! The persisted parameters-set document model
//!
//! A [`ParametersSet`] is the document a reader hands to the persistence
//! coordinator: a descriptor identifying the component and model, the
//! ordered variable definitions, and the keyed records mapping each variable
//! name to the flat string form of its value.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::variable::Variable;

/// Context data of a parameters set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetDescriptor {
    /// Component name.
    #[serde(default)]
    pub component: String,
    /// Model name.
    #[serde(default)]
    pub model: String,
    /// Name of the key type the records are identified by.
    #[serde(default)]
    pub key_type: String,
    /// URL reference for the ontology.
    #[serde(default)]
    pub url: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
}

/// Identity of one keyed record inside a parameters set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterKey {
    /// Numeric record identifier.
    pub id: i32,
    /// Record name, the lookup key.
    pub name: String,
    /// Description of the record.
    #[serde(default)]
    pub description: String,
}

impl ParameterKey {
    /// Creates a key from its parts.
    pub fn new(id: i32, name: &str, description: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            description: description.to_string(),
        }
    }
}

/// One keyed record: the key plus the serialized value of each variable,
/// stored as the flat string-list form keyed by variable name.
///
/// `values` is optional so a record whose value section is missing can be
/// represented (and rejected at load time).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterRecord {
    /// Record identity.
    pub key: ParameterKey,
    /// Serialized values, variable name to flat string list.
    #[serde(default)]
    pub values: Option<BTreeMap<String, Vec<String>>>,
}

impl ParameterRecord {
    /// Creates a record with an empty value map.
    pub fn new(key: ParameterKey) -> Self {
        Self {
            key,
            values: Some(BTreeMap::new()),
        }
    }
}

/// A named set of parameters: descriptor, ordered variable definitions and
/// keyed value records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParametersSet {
    /// Set context data.
    pub descriptor: SetDescriptor,
    /// The variable definitions, in declaration order.
    #[serde(default)]
    pub parameters: Vec<Variable>,
    /// The keyed records, in document order.
    #[serde(default)]
    pub records: Vec<ParameterRecord>,
}

impl ParametersSet {
    /// Creates a set with no records.
    pub fn new(descriptor: SetDescriptor, parameters: Vec<Variable>) -> Self {
        Self {
            descriptor,
            parameters,
            records: Vec::new(),
        }
    }

    /// The variable definition with the given name.
    pub fn parameter(&self, name: &str) -> Option<&Variable> {
        self.parameters.iter().find(|v| v.name() == name)
    }

    /// The record stored under the given key name.
    pub fn record(&self, key_name: &str) -> Option<&ParameterRecord> {
        self.records.iter().find(|r| r.key.name == key_name)
    }

    /// Mutable access to the record stored under the given key name.
    pub fn record_mut(&mut self, key_name: &str) -> Option<&mut ParameterRecord> {
        self.records.iter_mut().find(|r| r.key.name == key_name)
    }

    /// The next free record identifier: one past the highest id in use.
    pub fn next_key_id(&self) -> i32 {
        self.records.iter().map(|r| r.key.id).max().unwrap_or(0) + 1
    }
}
