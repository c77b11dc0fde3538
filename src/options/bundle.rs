//! The bundle of variables active under one switch value

use crate::options::property::PropertyDescription;
use crate::variable::Variable;

/// Container for the options one switch value activates: the parameters,
/// inputs and outputs of the component, plus the names of the linked
/// sub-components it pulls in.
#[derive(Debug, Clone, Default)]
pub struct OptionSet {
    /// Parameters active under this option.
    pub parameters: Vec<Variable>,
    /// Inputs active under this option.
    pub inputs: Vec<PropertyDescription>,
    /// Outputs active under this option.
    pub outputs: Vec<PropertyDescription>,
    /// Names of the linked sub-components active under this option.
    pub linked_components: Vec<String>,
}

impl OptionSet {
    /// Creates an empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a bundle from its parts.
    pub fn with_contents(
        parameters: Vec<Variable>,
        inputs: Vec<PropertyDescription>,
        outputs: Vec<PropertyDescription>,
        linked_components: Vec<String>,
    ) -> Self {
        Self {
            parameters,
            inputs,
            outputs,
            linked_components,
        }
    }
}
