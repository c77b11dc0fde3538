//! Model variable definition and implementation
//!
//! This module provides the [`Variable`] struct, the named typed cell used
//! throughout the framework for model inputs, outputs and parameters. A
//! variable declares its value type once, carries numeric bounds and
//! metadata, holds its current runtime value, and notifies registered
//! observers synchronously whenever that value is assigned.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::value::{Value, ValueError, ValueType};

/// Role of a variable in the simulated system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VarRole {
    /// A state of the system being modelled.
    State,
    /// A rate of the system being modelled.
    Rate,
    /// A variable which changes during simulation only due to events.
    Parameter,
    /// A variable which changes at each time step but is neither a state nor
    /// a rate.
    Auxiliary,
    /// Another kind of variable, for example an exogenous variable.
    #[default]
    Undefined,
}

/// Callback invoked when a variable's current value is assigned.
pub type ValueObserver = Box<dyn FnMut(&Variable)>;

/// A named, typed, bounded value cell.
///
/// The variable's identity is its name: two variables with the same name are
/// equal and hash alike regardless of every other attribute. This is the
/// supported partial-key pattern for variable collections — callers that need
/// to tell two same-named variables apart must not put both in one collection.
///
/// The value type is write-once: assigning the same descriptor again is a
/// no-op, assigning a different one is an error.
pub struct Variable {
    name: String,
    description: String,
    units: String,
    url: String,
    id: i32,
    size: i32,
    min_value: f64,
    max_value: f64,
    default_value: f64,
    role: VarRole,
    value_type: Option<ValueType>,
    current_value: Option<Value>,
    observers: Vec<ValueObserver>,
}

impl Variable {
    /// Create a new variable with the given name and no value type.
    ///
    /// # Examples
    ///
    /// ```
    /// use agrovar_rs::variable::Variable;
    ///
    /// let var = Variable::new("YieldMax");
    /// assert_eq!(var.name(), "YieldMax");
    /// assert!(var.value_type().is_none());
    /// assert!(var.current_value().is_none());
    /// ```
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: String::new(),
            units: String::new(),
            url: String::new(),
            id: 0,
            size: 1,
            min_value: 0.0,
            max_value: 0.0,
            default_value: 0.0,
            role: VarRole::Undefined,
            value_type: None,
            current_value: None,
            observers: Vec::new(),
        }
    }

    /// Get the name of the variable.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the name of the variable.
    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    /// Get the variable description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Set the variable description.
    pub fn set_description(&mut self, description: &str) {
        self.description = description.to_string();
    }

    /// Get the units of measure of the variable.
    pub fn units(&self) -> &str {
        &self.units
    }

    /// Set the units of measure of the variable.
    pub fn set_units(&mut self, units: &str) {
        self.units = units.to_string();
    }

    /// Get the variable metadata URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Set the variable metadata URL.
    pub fn set_url(&mut self, url: &str) {
        self.url = url.to_string();
    }

    /// Get the numerical identifier of the variable.
    pub fn id(&self) -> i32 {
        self.id
    }

    /// Set the numerical identifier of the variable.
    pub fn set_id(&mut self, id: i32) {
        self.id = id;
    }

    /// Get the minimum value allowed (meaningful for numeric kinds).
    pub fn min_value(&self) -> f64 {
        self.min_value
    }

    /// Set the minimum value allowed.
    pub fn set_min_value(&mut self, min_value: f64) {
        self.min_value = min_value;
    }

    /// Get the maximum value allowed (meaningful for numeric kinds).
    pub fn max_value(&self) -> f64 {
        self.max_value
    }

    /// Set the maximum value allowed.
    pub fn set_max_value(&mut self, max_value: f64) {
        self.max_value = max_value;
    }

    /// Set both bounds at once.
    pub fn set_bounds(&mut self, min_value: f64, max_value: f64) {
        self.min_value = min_value;
        self.max_value = max_value;
    }

    /// Get the default value (meaningful for numeric kinds).
    pub fn default_value(&self) -> f64 {
        self.default_value
    }

    /// Set the default value.
    pub fn set_default_value(&mut self, default_value: f64) {
        self.default_value = default_value;
    }

    /// Get the role of the variable in the simulated system.
    pub fn role(&self) -> VarRole {
        self.role
    }

    /// Set the role of the variable in the simulated system.
    pub fn set_role(&mut self, role: VarRole) {
        self.role = role;
    }

    /// Get the size of the array or list when the value type requires one.
    ///
    /// Scalar numeric kinds always report 1; unbounded list kinds report
    /// [`UNBOUNDED_SIZE`](crate::value::UNBOUNDED_SIZE).
    pub fn size(&self) -> i32 {
        match self.value_type {
            Some(t)
                if matches!(
                    t,
                    ValueType::Double | ValueType::Integer | ValueType::Date | ValueType::String
                ) =>
            {
                1
            }
            Some(t)
                if matches!(
                    t,
                    ValueType::ListDouble
                        | ValueType::ListInteger
                        | ValueType::ListDate
                        | ValueType::ListString
                ) =>
            {
                t.default_size()
            }
            _ => self.size,
        }
    }

    /// Set the size of the array or list.
    pub fn set_size(&mut self, size: i32) {
        self.size = size;
    }

    /// Get the declared value type, if one has been set.
    pub fn value_type(&self) -> Option<ValueType> {
        self.value_type
    }

    /// Declare the value type of the variable.
    ///
    /// The assignment is write-once: declaring the same descriptor again is a
    /// no-op, declaring a different one fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use agrovar_rs::value::ValueType;
    /// use agrovar_rs::variable::Variable;
    ///
    /// let mut var = Variable::new("YieldMax");
    /// var.set_value_type(ValueType::Double).unwrap();
    /// var.set_value_type(ValueType::Double).unwrap(); // no-op
    /// assert!(var.set_value_type(ValueType::Integer).is_err());
    /// ```
    pub fn set_value_type(&mut self, value_type: ValueType) -> Result<(), ValueError> {
        match self.value_type {
            Some(current) if current != value_type => Err(ValueError::ValueTypeAlreadySet {
                current: current.name(),
                requested: value_type.name(),
            }),
            Some(_) => Ok(()),
            None => {
                self.value_type = Some(value_type);
                self.size = value_type.default_size();
                Ok(())
            }
        }
    }

    /// Parse a persisted type-name string and declare the value type and
    /// size it describes.
    ///
    /// # Examples
    ///
    /// ```
    /// use agrovar_rs::value::ValueType;
    /// use agrovar_rs::variable::Variable;
    ///
    /// let mut var = Variable::new("LayerTemp");
    /// var.parse_value_type("double[3]").unwrap();
    /// assert_eq!(var.value_type(), Some(ValueType::ArrayDouble));
    /// assert_eq!(var.size(), 3);
    /// ```
    pub fn parse_value_type(&mut self, source: &str) -> Result<(), ValueError> {
        let (value_type, size) = ValueType::resolve(source)?;
        self.set_value_type(value_type)?;
        self.size = size;
        Ok(())
    }

    /// Get the current runtime value, if one has been assigned.
    pub fn current_value(&self) -> Option<&Value> {
        self.current_value.as_ref()
    }

    /// Assign the current runtime value and notify every registered observer
    /// synchronously, in registration order.
    ///
    /// No type check happens here; use [`is_type_consistent`](Self::is_type_consistent)
    /// to verify the value against the declared type. Observers are not
    /// isolated from one another: a panicking observer unwinds into this
    /// method's caller.
    pub fn set_current_value(&mut self, value: Value) {
        self.current_value = Some(value);
        self.notify_observers();
    }

    /// Remove the current runtime value without notifying observers.
    pub fn clear_current_value(&mut self) -> Option<Value> {
        self.current_value.take()
    }

    /// Register an observer called after every current-value assignment.
    pub fn observe(&mut self, observer: impl FnMut(&Variable) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Number of registered observers.
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    fn notify_observers(&mut self) {
        // Observers receive &self, so the list is moved out for the duration
        // of the walk; re-entrant value assignment from an observer is not
        // supported.
        let mut observers = std::mem::take(&mut self.observers);
        for observer in observers.iter_mut() {
            observer(self);
        }
        self.observers = observers;
    }

    /// Whether the runtime variant of the current value matches the declared
    /// value type. Vacuously true while no value is assigned.
    pub fn is_type_consistent(&self) -> bool {
        match (&self.current_value, self.value_type) {
            (Some(value), Some(value_type)) => value.value_type() == value_type,
            (Some(_), None) => false,
            (None, _) => true,
        }
    }

    /// The canonical type-name string of the declared type, sized with this
    /// variable's size.
    pub fn type_name(&self) -> Option<String> {
        let value_type = self.value_type?;
        value_type.type_name(self.size).ok()
    }
}

impl PartialEq for Variable {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Variable {}

impl std::hash::Hash for Variable {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl Clone for Variable {
    /// Clones every attribute except the observer list, which stays with the
    /// original.
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            description: self.description.clone(),
            units: self.units.clone(),
            url: self.url.clone(),
            id: self.id,
            size: self.size,
            min_value: self.min_value,
            max_value: self.max_value,
            default_value: self.default_value,
            role: self.role,
            value_type: self.value_type,
            current_value: self.current_value.clone(),
            observers: Vec::new(),
        }
    }
}

impl std::fmt::Debug for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Variable")
            .field("name", &self.name)
            .field("value_type", &self.value_type)
            .field("size", &self.size)
            .field("min_value", &self.min_value)
            .field("max_value", &self.max_value)
            .field("default_value", &self.default_value)
            .field("units", &self.units)
            .field("role", &self.role)
            .field("current_value", &self.current_value)
            .finish()
    }
}

/// Persisted form of a variable definition: the VarInfo-attributes record of
/// a parameters set. The current value and the observers never serialize.
#[derive(Serialize, Deserialize)]
struct VarInfoRecord {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    max: f64,
    #[serde(default)]
    min: f64,
    #[serde(default)]
    default: f64,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    type_name: Option<String>,
    #[serde(default)]
    units: String,
    #[serde(default)]
    url: String,
}

impl Serialize for Variable {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        VarInfoRecord {
            name: self.name.clone(),
            description: self.description.clone(),
            max: self.max_value,
            min: self.min_value,
            default: self.default_value,
            type_name: self.type_name(),
            units: self.units.clone(),
            url: self.url.clone(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Variable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let record = VarInfoRecord::deserialize(deserializer)?;
        let mut var = Variable::new(&record.name);
        var.set_description(&record.description);
        var.set_bounds(record.min, record.max);
        var.set_default_value(record.default);
        var.set_units(&record.units);
        var.set_url(&record.url);
        if let Some(type_name) = record.type_name {
            var.parse_value_type(&type_name)
                .map_err(D::Error::custom)?;
        }
        Ok(var)
    }
}
