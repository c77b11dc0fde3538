//! The parameter persistence coordinator
//!
//! [`ParameterIo`] moves parameter values between a keyed record of a
//! [`ParametersSet`] and the properties of a domain object, converting each
//! value through the registry converter of its variable definition. The
//! accessor table of the domain class is resolved once at construction and
//! cached for the life of the coordinator.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::params::set::{ParameterKey, ParameterRecord, ParametersSet};
use crate::params::store::{PersistenceError, ValuesReader, ValuesWriter};
use crate::params::table::{DomainClass, PropertyTable};
use crate::variable::Variable;

/// Coordinates loading and saving the parameters of a domain object.
///
/// The coordinator is handed opaque reader and writer collaborators; it never
/// touches the document syntax itself. Its caches (the property table and
/// the last parsed set) make it unsafe to share across concurrent loads or
/// saves.
pub struct ParameterIo<T: DomainClass> {
    reader: Box<dyn ValuesReader>,
    writer: Box<dyn ValuesWriter>,
    properties: PropertyTable<T>,
    current_set: Option<ParametersSet>,
}

impl<T: DomainClass> ParameterIo<T> {
    /// Create a coordinator over the given reader and writer.
    pub fn new(
        reader: impl ValuesReader + 'static,
        writer: impl ValuesWriter + 'static,
    ) -> Self {
        Self {
            reader: Box::new(reader),
            writer: Box::new(writer),
            properties: T::property_table(),
            current_set: None,
        }
    }

    /// The cached accessor table of the domain class.
    pub fn properties(&self) -> &PropertyTable<T> {
        &self.properties
    }

    /// The parameters set parsed by the last load or save, if any.
    pub fn current_set(&self) -> Option<&ParametersSet> {
        self.current_set.as_ref()
    }

    /// Load the record stored under `key` and assign each of its values to
    /// the matching property of `target`.
    ///
    /// A value whose name matches no property on the target is skipped and
    /// reported in the returned warning list, so a record written against an
    /// older schema still loads. A property whose declared type disagrees
    /// with the variable definition is an error, as is any conversion
    /// failure, which is wrapped with the variable name and the key.
    pub fn load(&mut self, target: &mut T, key: &str) -> Result<Vec<String>, PersistenceError> {
        let set = self.reader.read_values()?;
        let record = set
            .record(key)
            .ok_or_else(|| PersistenceError::UnknownKey(key.to_string()))?;
        let values = record
            .values
            .as_ref()
            .ok_or_else(|| PersistenceError::EmptyRecord(key.to_string()))?;

        let mut warnings = Vec::new();
        for (name, flat) in values {
            let Some(accessor) = self.properties.get(name) else {
                warn!(variable = name.as_str(), key, "no matching property, value skipped");
                warnings.push(format!(
                    "variable '{}' has no matching property on the target; value skipped",
                    name
                ));
                continue;
            };
            let Some(definition) = set.parameter(name) else {
                warn!(variable = name.as_str(), key, "no variable definition, value skipped");
                warnings.push(format!(
                    "variable '{}' has no definition in the parameters set; value skipped",
                    name
                ));
                continue;
            };
            let value_type = definition
                .value_type()
                .ok_or_else(|| PersistenceError::UntypedVariable(name.clone()))?;
            if accessor.value_type != value_type {
                return Err(PersistenceError::PropertyTypeMismatch {
                    property: name.clone(),
                    property_type: accessor.value_type.name(),
                    variable_type: value_type.name(),
                });
            }
            let value = value_type
                .parse_flat(flat)
                .map_err(|source| PersistenceError::VariableRead {
                    variable: name.clone(),
                    key: key.to_string(),
                    source,
                })?;
            (accessor.set)(target, value);
        }
        debug!(key, warnings = warnings.len(), "parameters loaded");
        self.current_set = Some(set);
        Ok(warnings)
    }

    /// Serialize the current property values of `target` into the record
    /// stored under `key` and hand the whole set to the writer.
    ///
    /// The set is re-read from the reader first, so records under other keys
    /// are preserved. A missing record is created with the next free id;
    /// saving over an existing key succeeds and returns an overwrite warning.
    pub fn save(&mut self, target: &T, key: &str) -> Result<Option<String>, PersistenceError> {
        let mut set = self.reader.read_values()?;
        let overwriting = set.record(key).is_some();
        if !overwriting {
            let id = set.next_key_id();
            set.records
                .push(ParameterRecord::new(ParameterKey::new(id, key, key)));
        }

        let mut serialized = Vec::new();
        for definition in &set.parameters {
            let name = definition.name();
            let value_type = definition
                .value_type()
                .ok_or_else(|| PersistenceError::UntypedVariable(name.to_string()))?;
            let accessor = self
                .properties
                .get(name)
                .ok_or_else(|| PersistenceError::UnknownProperty(name.to_string()))?;
            if accessor.value_type != value_type {
                return Err(PersistenceError::PropertyTypeMismatch {
                    property: name.to_string(),
                    property_type: accessor.value_type.name(),
                    variable_type: value_type.name(),
                });
            }
            let value = (accessor.get)(target)
                .ok_or_else(|| PersistenceError::MissingPropertyValue(name.to_string()))?;
            serialized.push((name.to_string(), value_type.to_flat(&value)?));
        }

        let record = set.record_mut(key).expect("record ensured above");
        let values = record.values.get_or_insert_with(BTreeMap::new);
        for (name, flat) in serialized {
            values.insert(name, flat);
        }

        self.writer.write_values(&set)?;
        debug!(key, overwriting, "parameters saved");
        self.current_set = Some(set);
        Ok(overwriting.then(|| format!("Overwriting key value '{}'.", key)))
    }

    /// Assign the current values of the given variables directly to the
    /// matching properties of `target`. The variables may be a sub-set of
    /// the declared parameters; each needs a non-empty name and a current
    /// value, and the target must declare every named property.
    pub fn set_parameters(
        &self,
        target: &mut T,
        variables: &[Variable],
    ) -> Result<(), PersistenceError> {
        for variable in variables {
            if variable.name().trim().is_empty() {
                return Err(PersistenceError::UnnamedVariable);
            }
            let value = variable
                .current_value()
                .ok_or_else(|| PersistenceError::ValuelessVariable(variable.name().to_string()))?;
            let accessor = self
                .properties
                .get(variable.name())
                .ok_or_else(|| PersistenceError::UnknownProperty(variable.name().to_string()))?;
            if accessor.value_type != value.value_type() {
                return Err(PersistenceError::PropertyTypeMismatch {
                    property: variable.name().to_string(),
                    property_type: accessor.value_type.name(),
                    variable_type: value.value_type().name(),
                });
            }
            (accessor.set)(target, value.clone());
        }
        Ok(())
    }

    /// Copy every non-empty property value of `source` onto `target`,
    /// deep-cloning each value.
    pub fn populate_cloned_copy(&self, source: &T, target: &mut T) {
        for (_, accessor) in self.properties.iter() {
            if let Some(value) = (accessor.get)(source) {
                (accessor.set)(target, value.clone());
            }
        }
    }
}
