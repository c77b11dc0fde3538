//! Statically declared property accessor tables
//!
//! Parameter loading and saving address the properties of a domain object by
//! name. Rather than looking those properties up at run time, each domain
//! class declares its accessor table once: a name-keyed set of
//! [`PropertyAccessor`]s pairing the property's value type with a getter and
//! a setter. Tables compose through the builder, which can also merge the
//! table of an embedded class and drop names a class chooses not to expose.

use std::collections::BTreeSet;

use crate::value::{Value, ValueType};

/// Accessor pair for one property of a domain object.
pub struct PropertyAccessor<T> {
    /// Value type of the property.
    pub value_type: ValueType,
    /// Reads the property; `None` when the property holds no value.
    pub get: fn(&T) -> Option<Value>,
    /// Writes the property. The coordinator checks the value's type before
    /// calling.
    pub set: fn(&mut T, Value),
}

impl<T> Clone for PropertyAccessor<T> {
    fn clone(&self) -> Self {
        Self {
            value_type: self.value_type,
            get: self.get,
            set: self.set,
        }
    }
}

impl<T> std::fmt::Debug for PropertyAccessor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertyAccessor")
            .field("value_type", &self.value_type)
            .finish()
    }
}

/// The ordered accessor table of a domain class.
#[derive(Debug, Clone)]
pub struct PropertyTable<T> {
    entries: Vec<(String, PropertyAccessor<T>)>,
}

impl<T> PropertyTable<T> {
    /// Start building a table.
    pub fn builder() -> PropertyTableBuilder<T> {
        PropertyTableBuilder {
            entries: Vec::new(),
            excluded: BTreeSet::new(),
        }
    }

    /// The accessor registered under the given property name.
    pub fn get(&self, name: &str) -> Option<&PropertyAccessor<T>> {
        self.entries
            .iter()
            .find(|(entry_name, _)| entry_name == name)
            .map(|(_, accessor)| accessor)
    }

    /// The registered property names, in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Every (name, accessor) entry, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyAccessor<T>)> {
        self.entries
            .iter()
            .map(|(name, accessor)| (name.as_str(), accessor))
    }

    /// Number of registered properties.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table registers no properties.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Builder assembling a [`PropertyTable`].
pub struct PropertyTableBuilder<T> {
    entries: Vec<(String, PropertyAccessor<T>)>,
    excluded: BTreeSet<String>,
}

impl<T> PropertyTableBuilder<T> {
    /// Register a property. Registering a name twice replaces the earlier
    /// accessor.
    pub fn property(
        mut self,
        name: &str,
        value_type: ValueType,
        get: fn(&T) -> Option<Value>,
        set: fn(&mut T, Value),
    ) -> Self {
        self.entries.retain(|(entry_name, _)| entry_name != name);
        self.entries.push((
            name.to_string(),
            PropertyAccessor {
                value_type,
                get,
                set,
            },
        ));
        self
    }

    /// Merge another table; entries already registered here keep precedence.
    pub fn merge(mut self, table: PropertyTable<T>) -> Self {
        for (name, accessor) in table.entries {
            if !self.entries.iter().any(|(entry_name, _)| *entry_name == name) {
                self.entries.push((name, accessor));
            }
        }
        self
    }

    /// Exclude property names from the finished table. Used when a class
    /// merges an embedded table but does not expose all of it.
    pub fn without(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.excluded.extend(names.into_iter().map(Into::into));
        self
    }

    /// Finish the table.
    pub fn build(self) -> PropertyTable<T> {
        let excluded = self.excluded;
        PropertyTable {
            entries: self
                .entries
                .into_iter()
                .filter(|(name, _)| !excluded.contains(name))
                .collect(),
        }
    }
}

/// A domain class whose properties can be loaded and saved by the
/// persistence coordinator.
pub trait DomainClass: Sized {
    /// The statically declared accessor table of the class.
    fn property_table() -> PropertyTable<Self>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Soil {
        depth: Option<f64>,
        layers: Option<Vec<f64>>,
    }

    fn soil_table() -> PropertyTable<Soil> {
        PropertyTable::builder()
            .property(
                "Depth",
                ValueType::Double,
                |s: &Soil| s.depth.map(Value::Double),
                |s, v| {
                    if let Value::Double(d) = v {
                        s.depth = Some(d);
                    }
                },
            )
            .property(
                "Layers",
                ValueType::ArrayDouble,
                |s| s.layers.clone().map(Value::ArrayDouble),
                |s, v| {
                    if let Value::ArrayDouble(l) = v {
                        s.layers = Some(l);
                    }
                },
            )
            .build()
    }

    #[test]
    fn test_table_lookup_and_order() {
        let table = soil_table();
        assert_eq!(table.len(), 2);
        assert_eq!(table.names().collect::<Vec<_>>(), vec!["Depth", "Layers"]);
        assert!(table.get("Depth").is_some());
        assert!(table.get("Missing").is_none());
    }

    #[test]
    fn test_accessors_read_and_write() {
        let table = soil_table();
        let mut soil = Soil::default();

        let accessor = table.get("Depth").unwrap();
        assert_eq!((accessor.get)(&soil), None);

        (accessor.set)(&mut soil, Value::Double(1.2));
        assert_eq!((accessor.get)(&soil), Some(Value::Double(1.2)));
    }

    #[test]
    fn test_merge_keeps_local_precedence() {
        let local = PropertyTable::builder()
            .property(
                "Depth",
                ValueType::Integer,
                |_: &Soil| Some(Value::Integer(7)),
                |_, _| {},
            )
            .merge(soil_table())
            .build();

        assert_eq!(local.len(), 2);
        assert_eq!(local.get("Depth").unwrap().value_type, ValueType::Integer);
    }

    #[test]
    fn test_without_excludes_names() {
        let table = PropertyTable::builder()
            .merge(soil_table())
            .without(["Layers"])
            .build();

        assert_eq!(table.names().collect::<Vec<_>>(), vec!["Depth"]);
    }
}
