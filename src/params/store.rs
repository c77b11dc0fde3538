//! Reader/writer collaborators for parameters sets
//!
//! The persistence coordinator is agnostic of the document syntax: it asks a
//! [`ValuesReader`] for the parsed [`ParametersSet`] and hands the modified
//! set back to a [`ValuesWriter`]. [`JsonParametersStore`] is the bundled
//! file-backed implementation of both.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::params::set::ParametersSet;
use crate::value::ValueError;

/// Errors raised while loading or saving parameters.
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// I/O failure in a reader or writer.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed parameters document.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The requested record key is not in the set.
    #[error("the parameters key '{0}' is not present")]
    UnknownKey(String),

    /// The record exists but its value section is missing.
    #[error("the values set for the parameters key '{0}' is missing")]
    EmptyRecord(String),

    /// The target object declares no property with this name.
    #[error("the target has no property named '{0}'")]
    UnknownProperty(String),

    /// A property's declared type disagrees with the variable definition.
    #[error(
        "type for property '{property}' ({property_type}) is not coherent with the \
         corresponding variable type ({variable_type})"
    )]
    PropertyTypeMismatch {
        /// Property name.
        property: String,
        /// The type the accessor table declares.
        property_type: &'static str,
        /// The type the variable definition declares.
        variable_type: &'static str,
    },

    /// A variable definition in the set carries no value type.
    #[error("variable '{0}' has no value type")]
    UntypedVariable(String),

    /// Conversion or assignment of one variable failed during a load.
    #[error("error reading variable '{variable}' (parameters key '{key}'): {source}")]
    VariableRead {
        /// The offending variable.
        variable: String,
        /// The record key being loaded.
        key: String,
        /// The underlying conversion failure.
        source: ValueError,
    },

    /// A property had no value to serialize during a save.
    #[error("property '{0}' has no value to save")]
    MissingPropertyValue(String),

    /// A variable used for direct assignment has no name.
    #[error("a variable used to set values must have a name")]
    UnnamedVariable,

    /// A variable used for direct assignment has no current value.
    #[error("a variable used to set values must have a current value (variable '{0}')")]
    ValuelessVariable(String),

    /// Converter failure outside a keyed load.
    #[error(transparent)]
    Value(#[from] ValueError),
}

/// Source of parsed parameters sets.
pub trait ValuesReader {
    /// Read and parse the full parameters set.
    fn read_values(&self) -> Result<ParametersSet, PersistenceError>;
}

/// Destination of parameters sets.
pub trait ValuesWriter {
    /// Persist the full parameters set.
    fn write_values(&mut self, set: &ParametersSet) -> Result<(), PersistenceError>;
}

/// File-backed parameters store serializing the set as pretty-printed JSON.
#[derive(Debug, Clone)]
pub struct JsonParametersStore {
    path: PathBuf,
}

impl JsonParametersStore {
    /// Create a store reading and writing the given file.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// The file backing the store.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ValuesReader for JsonParametersStore {
    fn read_values(&self) -> Result<ParametersSet, PersistenceError> {
        let file = File::open(&self.path)?;
        let set = serde_json::from_reader(BufReader::new(file))?;
        Ok(set)
    }
}

impl ValuesWriter for JsonParametersStore {
    fn write_values(&mut self, set: &ParametersSet) -> Result<(), PersistenceError> {
        let file = File::create(&self.path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), set)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::set::{ParameterKey, ParameterRecord, SetDescriptor};
    use crate::value::ValueType;
    use crate::variable::Variable;

    #[test]
    fn test_json_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crop_parameters.json");

        let mut yield_max = Variable::new("YieldMax");
        yield_max.set_value_type(ValueType::Double).unwrap();
        let mut set = ParametersSet::new(SetDescriptor::default(), vec![yield_max]);
        let mut record = ParameterRecord::new(ParameterKey::new(1, "wheat", ""));
        record
            .values
            .as_mut()
            .unwrap()
            .insert("YieldMax".to_string(), vec!["8.5".to_string()]);
        set.records.push(record);

        let mut store = JsonParametersStore::new(&path);
        store.write_values(&set).unwrap();

        let loaded = store.read_values().unwrap();
        assert_eq!(loaded, set);
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let store = JsonParametersStore::new("/nonexistent/params.json");
        assert!(matches!(
            store.read_values().unwrap_err(),
            PersistenceError::Io(_)
        ));
    }
}
