//! A configuration axis selecting one bundle of active variables

use thiserror::Error;

use crate::options::bundle::OptionSet;
use crate::options::property::PropertyDescription;
use crate::variable::Variable;

/// Value of the unique option of a trivial switch.
pub const NO_OPTIONS_VALUE: &str = "The only option";

/// Errors raised by switches and options resolvers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SwitchError {
    /// An assignment named a value outside the acceptable set.
    #[error("wrong switch value: '{value}' is not a valid value for switch '{name}'")]
    InvalidValue {
        /// Switch name.
        name: String,
        /// The offending value.
        value: String,
    },

    /// Bundle data was read from a switch with no selected value.
    #[error("switch '{0}' value not set")]
    ValueNotSet(String),

    /// A resolver was asked about a switch it does not hold.
    #[error("switch '{0}' does not exist")]
    UnknownSwitch(String),

    /// A resolver was asked about a parameter none of its bundles define.
    #[error("parameter '{0}' not found")]
    UnknownParameter(String),
}

/// A choice in the behavior of a model component.
///
/// A switch has a name and a closed, ordered set of acceptable values, each
/// mapped to the [`OptionSet`] it activates. A switch built with zero or one
/// entries degenerates to the trivial single-option switch, whose only value
/// is [`NO_OPTIONS_VALUE`] and which is selected from construction; every
/// other switch starts unselected, and reading its bundle before a value is
/// assigned is an error.
#[derive(Debug, Clone)]
pub struct OptionSwitch {
    name: String,
    description: String,
    options: Vec<(String, OptionSet)>,
    selected: Option<String>,
}

impl OptionSwitch {
    /// Create a switch from its acceptable values and their bundles.
    ///
    /// # Examples
    ///
    /// ```
    /// use agrovar_rs::options::{OptionSet, OptionSwitch, NO_OPTIONS_VALUE};
    ///
    /// // Zero entries degenerate to the pre-selected trivial switch
    /// let trivial = OptionSwitch::new("Mode", "", vec![]);
    /// assert!(trivial.is_no_options());
    /// assert_eq!(trivial.value(), Some(NO_OPTIONS_VALUE));
    ///
    /// let mode = OptionSwitch::new(
    ///     "Mode",
    ///     "Growth model variant",
    ///     vec![
    ///         ("Simple".to_string(), OptionSet::new()),
    ///         ("Detailed".to_string(), OptionSet::new()),
    ///     ],
    /// );
    /// assert!(mode.value().is_none());
    /// ```
    pub fn new(name: &str, description: &str, options: Vec<(String, OptionSet)>) -> Self {
        let mut options = options;
        if options.is_empty() {
            options.push((NO_OPTIONS_VALUE.to_string(), OptionSet::new()));
        }
        let selected = if options.len() == 1 {
            // A single acceptable value is rekeyed to the trivial option and
            // selected from the start.
            let (_, bundle) = options.pop().expect("one entry");
            options.push((NO_OPTIONS_VALUE.to_string(), bundle));
            Some(NO_OPTIONS_VALUE.to_string())
        } else {
            None
        };
        Self {
            name: name.to_string(),
            description: description.to_string(),
            options,
            selected,
        }
    }

    /// The switch name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The switch description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Whether the switch has one single acceptable value.
    pub fn is_no_options(&self) -> bool {
        self.options.len() == 1
    }

    /// The acceptable values, in declaration order.
    pub fn acceptable_values(&self) -> impl Iterator<Item = &str> {
        self.options.iter().map(|(value, _)| value.as_str())
    }

    /// The currently selected value, if any.
    pub fn value(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Select one of the acceptable values.
    pub fn set_value(&mut self, value: &str) -> Result<(), SwitchError> {
        if self.options.iter().any(|(v, _)| v == value) {
            self.selected = Some(value.to_string());
            Ok(())
        } else {
            Err(SwitchError::InvalidValue {
                name: self.name.clone(),
                value: value.to_string(),
            })
        }
    }

    /// Clear the selection without checks.
    pub(crate) fn reset_selection(&mut self) {
        self.selected = None;
    }

    /// The bundle of the currently selected value.
    pub fn selected_bundle(&self) -> Result<&OptionSet, SwitchError> {
        let selected = self
            .selected
            .as_deref()
            .ok_or_else(|| SwitchError::ValueNotSet(self.name.clone()))?;
        Ok(self
            .options
            .iter()
            .find(|(value, _)| value == selected)
            .map(|(_, bundle)| bundle)
            .expect("selected value is always acceptable"))
    }

    /// Mutable access to the bundle of the currently selected value.
    pub(crate) fn selected_bundle_mut(&mut self) -> Result<&mut OptionSet, SwitchError> {
        let selected = self
            .selected
            .clone()
            .ok_or_else(|| SwitchError::ValueNotSet(self.name.clone()))?;
        Ok(self
            .options
            .iter_mut()
            .find(|(value, _)| *value == selected)
            .map(|(_, bundle)| bundle)
            .expect("selected value is always acceptable"))
    }

    /// The parameters active under the current selection.
    pub fn parameters(&self) -> Result<&[Variable], SwitchError> {
        Ok(&self.selected_bundle()?.parameters)
    }

    /// The inputs active under the current selection.
    pub fn inputs(&self) -> Result<&[PropertyDescription], SwitchError> {
        Ok(&self.selected_bundle()?.inputs)
    }

    /// The outputs active under the current selection.
    pub fn outputs(&self) -> Result<&[PropertyDescription], SwitchError> {
        Ok(&self.selected_bundle()?.outputs)
    }

    /// The linked component names active under the current selection.
    pub fn linked_components(&self) -> Result<&[String], SwitchError> {
        Ok(&self.selected_bundle()?.linked_components)
    }

    /// Every (value, bundle) entry, in declaration order.
    pub fn bundles(&self) -> impl Iterator<Item = (&str, &OptionSet)> {
        self.options
            .iter()
            .map(|(value, bundle)| (value.as_str(), bundle))
    }

    /// Mutable walk over every bundle.
    pub(crate) fn bundles_mut(&mut self) -> impl Iterator<Item = &mut OptionSet> {
        self.options.iter_mut().map(|(_, bundle)| bundle)
    }

    /// All parameters across every acceptable value, with repetitions.
    pub fn all_possible_parameters(&self) -> impl Iterator<Item = &Variable> {
        self.options
            .iter()
            .flat_map(|(_, bundle)| bundle.parameters.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ValueType;

    fn param(name: &str) -> Variable {
        let mut var = Variable::new(name);
        var.set_value_type(ValueType::Double).unwrap();
        var
    }

    fn bundle_with(names: &[&str]) -> OptionSet {
        OptionSet::with_contents(
            names.iter().map(|n| param(n)).collect(),
            vec![],
            vec![],
            vec![],
        )
    }

    fn mode_switch() -> OptionSwitch {
        OptionSwitch::new(
            "Mode",
            "Growth model variant",
            vec![
                ("A".to_string(), bundle_with(&["P1"])),
                ("B".to_string(), bundle_with(&["P1", "P2"])),
            ],
        )
    }

    #[test]
    fn test_empty_switch_degenerates() {
        let s = OptionSwitch::new("Mode", "", vec![]);
        assert!(s.is_no_options());
        assert_eq!(s.value(), Some(NO_OPTIONS_VALUE));
        assert!(s.parameters().unwrap().is_empty());
    }

    #[test]
    fn test_single_option_is_rekeyed_and_preselected() {
        let s = OptionSwitch::new(
            "Mode",
            "",
            vec![("OnlyChoice".to_string(), bundle_with(&["P1"]))],
        );
        assert!(s.is_no_options());
        assert_eq!(s.value(), Some(NO_OPTIONS_VALUE));
        assert_eq!(
            s.acceptable_values().collect::<Vec<_>>(),
            vec![NO_OPTIONS_VALUE]
        );
        assert_eq!(s.parameters().unwrap().len(), 1);
    }

    #[test]
    fn test_unset_switch_rejects_reads() {
        let s = mode_switch();
        assert!(matches!(
            s.parameters().unwrap_err(),
            SwitchError::ValueNotSet(name) if name == "Mode"
        ));
        assert!(s.inputs().is_err());
        assert!(s.outputs().is_err());
        assert!(s.linked_components().is_err());
    }

    #[test]
    fn test_set_value_rejects_unacceptable_values() {
        let mut s = mode_switch();
        let err = s.set_value("C").unwrap_err();
        assert!(matches!(err, SwitchError::InvalidValue { value, .. } if value == "C"));
        assert!(s.value().is_none());

        s.set_value("A").unwrap();
        assert_eq!(s.value(), Some("A"));
        assert_eq!(s.parameters().unwrap().len(), 1);

        s.set_value("B").unwrap();
        assert_eq!(s.parameters().unwrap().len(), 2);
    }

    #[test]
    fn test_all_possible_parameters_has_repetitions() {
        let s = mode_switch();
        let all: Vec<&str> = s.all_possible_parameters().map(|v| v.name()).collect();
        assert_eq!(all, vec!["P1", "P1", "P2"]);
    }
}
