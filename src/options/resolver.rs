//! Resolution of the active variable bundles across switches
//!
//! An [`OptionsResolver`] aggregates the switches of a model component (or of
//! several components combined into a composite) and answers two questions:
//! which parameters/inputs/outputs/linked components are active under the
//! current switch selections, and which could ever become active under any
//! combination of acceptable values.

use std::collections::HashSet;

use tracing::warn;

use crate::options::bundle::OptionSet;
use crate::options::property::PropertyDescription;
use crate::options::switch::{OptionSwitch, SwitchError, NO_OPTIONS_VALUE};
use crate::value::Value;
use crate::variable::Variable;

/// Name of the trivial switch.
pub const NO_OPTIONS_SWITCH: &str = "No options";

/// Description of the trivial switch.
const NO_OPTIONS_DESCRIPTION: &str = "";

fn dedup_parameters<'a>(vars: impl IntoIterator<Item = &'a Variable>) -> Vec<&'a Variable> {
    let mut seen = HashSet::new();
    vars.into_iter()
        .filter(|v| seen.insert(v.name().to_string()))
        .collect()
}

fn dedup_properties<'a>(
    properties: impl IntoIterator<Item = &'a PropertyDescription>,
) -> Vec<&'a PropertyDescription> {
    let mut seen = HashSet::new();
    properties
        .into_iter()
        .filter(|p| seen.insert((p.property_name.clone(), p.domain_class.clone())))
        .collect()
}

fn dedup_strings<'a>(items: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    items.into_iter().filter(|s| seen.insert(s.to_string())).collect()
}

/// Manages the parameters, inputs, outputs and linked components of a model
/// component depending on its switches.
///
/// Switch names are unique within a resolver; when two switches compete for
/// one name, the first occurrence wins and later ones are dropped. A
/// component without real switches is represented by the single trivial
/// switch, which is always selected.
#[derive(Debug, Clone)]
pub struct OptionsResolver {
    switches: Vec<OptionSwitch>,
}

impl OptionsResolver {
    /// Build a resolver for a component without switches: the bundle is
    /// wrapped in the trivial switch and never changes.
    pub fn from_options(options: OptionSet) -> Self {
        let switch = OptionSwitch::new(
            NO_OPTIONS_SWITCH,
            NO_OPTIONS_DESCRIPTION,
            vec![(NO_OPTIONS_VALUE.to_string(), options)],
        );
        Self {
            switches: vec![switch],
        }
    }

    /// Build a resolver from a set of switches. On a name collision the
    /// first switch wins.
    pub fn from_switches(switches: impl IntoIterator<Item = OptionSwitch>) -> Self {
        let mut resolver = Self {
            switches: Vec::new(),
        };
        for switch in switches {
            resolver.insert(switch);
        }
        resolver
    }

    /// Build a resolver from a fixed bundle plus a set of switches; the
    /// bundle is carried by the trivial switch next to the real ones.
    pub fn with_options_and_switches(
        options: OptionSet,
        switches: impl IntoIterator<Item = OptionSwitch>,
    ) -> Self {
        let mut resolver = Self::from_switches(switches);
        resolver.insert(OptionSwitch::new(
            NO_OPTIONS_SWITCH,
            NO_OPTIONS_DESCRIPTION,
            vec![(NO_OPTIONS_VALUE.to_string(), options)],
        ));
        resolver
    }

    /// Build the resolver of a composite component from the resolvers of its
    /// children.
    ///
    /// The trivial switches of all children merge into one shared trivial
    /// bundle, de-duplicated by variable name and property identity. Named
    /// switches are kept distinct; on a name collision across children the
    /// first child wins, which is the documented tie-break for composites
    /// re-exporting a child's switch.
    pub fn compose(resolvers: impl IntoIterator<Item = OptionsResolver>) -> Self {
        let mut merged = Self {
            switches: Vec::new(),
        };
        let mut parameters: Vec<Variable> = Vec::new();
        let mut inputs: Vec<PropertyDescription> = Vec::new();
        let mut outputs: Vec<PropertyDescription> = Vec::new();
        let mut linked: Vec<String> = Vec::new();
        let mut saw_trivial = false;

        for resolver in resolvers {
            for switch in resolver.switches {
                if switch.is_no_options() {
                    let bundle = switch
                        .selected_bundle()
                        .expect("a trivial switch is always selected");
                    parameters.extend(bundle.parameters.iter().cloned());
                    inputs.extend(bundle.inputs.iter().cloned());
                    outputs.extend(bundle.outputs.iter().cloned());
                    linked.extend(bundle.linked_components.iter().cloned());
                    saw_trivial = true;
                } else {
                    merged.insert(switch);
                }
            }
        }

        if saw_trivial {
            let bundle = OptionSet::with_contents(
                dedup_parameters(&parameters).into_iter().cloned().collect(),
                dedup_properties(&inputs).into_iter().cloned().collect(),
                dedup_properties(&outputs).into_iter().cloned().collect(),
                dedup_strings(linked.iter().map(String::as_str))
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
            );
            merged.insert(OptionSwitch::new(
                NO_OPTIONS_SWITCH,
                NO_OPTIONS_DESCRIPTION,
                vec![(NO_OPTIONS_VALUE.to_string(), bundle)],
            ));
        }
        merged
    }

    fn insert(&mut self, switch: OptionSwitch) {
        if !self.switches.iter().any(|s| s.name() == switch.name()) {
            self.switches.push(switch);
        }
    }

    fn find(&self, name: &str) -> Result<&OptionSwitch, SwitchError> {
        self.switches
            .iter()
            .find(|s| s.name() == name)
            .ok_or_else(|| SwitchError::UnknownSwitch(name.to_string()))
    }

    fn find_mut(&mut self, name: &str) -> Result<&mut OptionSwitch, SwitchError> {
        self.switches
            .iter_mut()
            .find(|s| s.name() == name)
            .ok_or_else(|| SwitchError::UnknownSwitch(name.to_string()))
    }

    /// Every switch held by the resolver, trivial ones included.
    pub fn switches(&self) -> impl Iterator<Item = &OptionSwitch> {
        self.switches.iter()
    }

    /// The names of the real switches; a trivial switch is not shown.
    pub fn switch_names(&self) -> Vec<&str> {
        self.switches
            .iter()
            .filter(|s| !s.is_no_options())
            .map(|s| s.name())
            .collect()
    }

    /// The acceptable values of the named switch.
    pub fn acceptable_switch_values(&self, name: &str) -> Result<Vec<&str>, SwitchError> {
        Ok(self.find(name)?.acceptable_values().collect())
    }

    /// The current value of the named switch, if one is selected.
    pub fn switch_value(&self, name: &str) -> Result<Option<&str>, SwitchError> {
        Ok(self.find(name)?.value())
    }

    /// Select a value on the named switch.
    pub fn set_switch_value(&mut self, name: &str, value: &str) -> Result<(), SwitchError> {
        self.find_mut(name)?.set_value(value)
    }

    /// The description of the named switch.
    pub fn switch_description(&self, name: &str) -> Result<&str, SwitchError> {
        Ok(self.find(name)?.description())
    }

    /// The parameters active under the current switch selections, union
    /// across switches, de-duplicated by variable name.
    pub fn parameters(&self) -> Result<Vec<&Variable>, SwitchError> {
        let mut all = Vec::new();
        for switch in &self.switches {
            all.extend(switch.parameters()?.iter());
        }
        Ok(dedup_parameters(all))
    }

    /// The inputs active under the current switch selections, de-duplicated
    /// by (property name, domain class).
    pub fn inputs(&self) -> Result<Vec<&PropertyDescription>, SwitchError> {
        let mut all = Vec::new();
        for switch in &self.switches {
            all.extend(switch.inputs()?.iter());
        }
        Ok(dedup_properties(all))
    }

    /// The outputs active under the current switch selections, de-duplicated
    /// by (property name, domain class).
    pub fn outputs(&self) -> Result<Vec<&PropertyDescription>, SwitchError> {
        let mut all = Vec::new();
        for switch in &self.switches {
            all.extend(switch.outputs()?.iter());
        }
        Ok(dedup_properties(all))
    }

    /// The linked component names active under the current switch
    /// selections, de-duplicated.
    pub fn linked_components(&self) -> Result<Vec<&str>, SwitchError> {
        let mut all = Vec::new();
        for switch in &self.switches {
            all.extend(switch.linked_components()?.iter().map(String::as_str));
        }
        Ok(dedup_strings(all))
    }

    /// Every parameter reachable under any combination of switch values,
    /// de-duplicated by variable name.
    ///
    /// The bundles of one switch do not depend on the selections of the
    /// others, so the union walks every bundle directly; switch selections
    /// are left untouched.
    pub fn all_possible_parameters(&self) -> Vec<&Variable> {
        dedup_parameters(
            self.switches
                .iter()
                .flat_map(|s| s.bundles().map(|(_, b)| b))
                .flat_map(|b| b.parameters.iter()),
        )
    }

    /// Every input reachable under any combination of switch values.
    pub fn all_possible_inputs(&self) -> Vec<&PropertyDescription> {
        dedup_properties(
            self.switches
                .iter()
                .flat_map(|s| s.bundles().map(|(_, b)| b))
                .flat_map(|b| b.inputs.iter()),
        )
    }

    /// Every output reachable under any combination of switch values.
    pub fn all_possible_outputs(&self) -> Vec<&PropertyDescription> {
        dedup_properties(
            self.switches
                .iter()
                .flat_map(|s| s.bundles().map(|(_, b)| b))
                .flat_map(|b| b.outputs.iter()),
        )
    }

    /// Every linked component name reachable under any combination of switch
    /// values.
    pub fn all_possible_linked_components(&self) -> Vec<&str> {
        dedup_strings(
            self.switches
                .iter()
                .flat_map(|s| s.bundles().map(|(_, b)| b))
                .flat_map(|b| b.linked_components.iter().map(String::as_str)),
        )
    }

    /// The parameter with the given name, looked up across every bundle.
    pub fn parameter_by_name(&self, name: &str) -> Result<&Variable, SwitchError> {
        self.all_possible_parameters()
            .into_iter()
            .find(|v| v.name() == name)
            .ok_or_else(|| SwitchError::UnknownParameter(name.to_string()))
    }

    /// The currently active input with the given property name and owning
    /// class.
    pub fn input_by_name(
        &self,
        domain_class: &str,
        property_name: &str,
    ) -> Result<Option<&PropertyDescription>, SwitchError> {
        Ok(self
            .inputs()?
            .into_iter()
            .find(|p| p.property_name == property_name && p.domain_class == domain_class))
    }

    /// The currently active output with the given property name and owning
    /// class.
    pub fn output_by_name(
        &self,
        domain_class: &str,
        property_name: &str,
    ) -> Result<Option<&PropertyDescription>, SwitchError> {
        Ok(self
            .outputs()?
            .into_iter()
            .find(|p| p.property_name == property_name && p.domain_class == domain_class))
    }

    /// Assign a current value to every parameter with the given name, across
    /// every bundle of every switch.
    pub fn set_parameter_value(&mut self, name: &str, value: Value) -> Result<(), SwitchError> {
        let mut assigned = false;
        for switch in &mut self.switches {
            for bundle in switch.bundles_mut() {
                for parameter in bundle.parameters.iter_mut() {
                    if parameter.name() == name {
                        parameter.set_current_value(value.clone());
                        assigned = true;
                    }
                }
            }
        }
        if assigned {
            Ok(())
        } else {
            Err(SwitchError::UnknownParameter(name.to_string()))
        }
    }

    /// Set every parameter's current value from its declared default,
    /// converting the numeric default through the flat-list converter of the
    /// parameter's value type.
    ///
    /// Parameters whose defaults cannot be converted (non-scalar kinds, or
    /// no declared type) are left untouched and reported back, one warning
    /// per parameter.
    pub fn apply_default_values(&mut self) -> Vec<String> {
        let mut warnings = Vec::new();
        for switch in &mut self.switches {
            for bundle in switch.bundles_mut() {
                for parameter in bundle.parameters.iter_mut() {
                    let Some(value_type) = parameter.value_type() else {
                        warnings.push(format!(
                            "parameter '{}': no value type declared",
                            parameter.name()
                        ));
                        continue;
                    };
                    let flat = vec![parameter.default_value().to_string()];
                    match value_type.parse_flat(&flat) {
                        Ok(value) => parameter.set_current_value(value),
                        Err(err) => {
                            warn!(
                                parameter = parameter.name(),
                                "default value not applied: {}", err
                            );
                            warnings.push(format!("parameter '{}': {}", parameter.name(), err));
                        }
                    }
                }
            }
        }
        warnings
    }
}
