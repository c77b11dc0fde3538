//! Integration tests for switches and the options resolver.

use agrovar_rs::options::{
    OptionSet, OptionSwitch, OptionsResolver, SwitchError, NO_OPTIONS_VALUE,
};
use agrovar_rs::value::{Value, ValueType};
use agrovar_rs::variable::Variable;

fn param(name: &str) -> Variable {
    let mut var = Variable::new(name);
    var.set_value_type(ValueType::Double).unwrap();
    var.set_default_value(1.0);
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
fn selection_drives_current_parameters() {
    let mut resolver = OptionsResolver::from_switches(vec![mode_switch()]);

    resolver.set_switch_value("Mode", "A").unwrap();
    let names: Vec<&str> = resolver
        .parameters()
        .unwrap()
        .iter()
        .map(|v| v.name())
        .collect();
    assert_eq!(names, vec!["P1"]);
}

#[test]
fn all_possible_parameters_dedup_and_preserve_selection() {
    let mut resolver = OptionsResolver::from_switches(vec![mode_switch()]);
    resolver.set_switch_value("Mode", "A").unwrap();

    let names: Vec<&str> = resolver
        .all_possible_parameters()
        .iter()
        .map(|v| v.name())
        .collect();
    assert_eq!(names, vec!["P1", "P2"]);
    assert_eq!(resolver.switch_value("Mode").unwrap(), Some("A"));
}

#[test]
fn unset_switch_rejects_current_reads() {
    let resolver = OptionsResolver::from_switches(vec![mode_switch()]);
    assert!(matches!(
        resolver.parameters().unwrap_err(),
        SwitchError::ValueNotSet(name) if name == "Mode"
    ));
}

#[test]
fn invalid_switch_value_names_switch_and_value() {
    let mut resolver = OptionsResolver::from_switches(vec![mode_switch()]);
    let err = resolver.set_switch_value("Mode", "C").unwrap_err();
    let message = err.to_string();
    assert!(message.contains("Mode"));
    assert!(message.contains("'C'"));

    assert!(matches!(
        resolver.set_switch_value("Missing", "A").unwrap_err(),
        SwitchError::UnknownSwitch(_)
    ));
}

#[test]
fn trivial_switch_is_preselected() {
    let resolver = OptionsResolver::from_options(bundle_with(&["P1"]));
    assert_eq!(resolver.switch_names().len(), 0);
    let switch = resolver.switches().next().unwrap();
    assert_eq!(switch.value(), Some(NO_OPTIONS_VALUE));
    assert_eq!(resolver.parameters().unwrap().len(), 1);
}

#[test]
fn composing_two_trivial_resolvers_merges_their_bundles() {
    let left = OptionsResolver::from_options(bundle_with(&["P1"]));
    let right = OptionsResolver::from_options(bundle_with(&["P2"]));

    let composite = OptionsResolver::compose(vec![left, right]);
    assert_eq!(composite.switches().count(), 1);

    let names: Vec<&str> = composite
        .parameters()
        .unwrap()
        .iter()
        .map(|v| v.name())
        .collect();
    assert_eq!(names, vec!["P1", "P2"]);
}

#[test]
fn composition_keeps_named_switches_distinct() {
    let trivial = OptionsResolver::from_options(bundle_with(&["P0"]));
    let switched = OptionsResolver::from_switches(vec![mode_switch()]);

    let mut composite = OptionsResolver::compose(vec![trivial, switched]);
    assert_eq!(composite.switch_names(), vec!["Mode"]);

    composite.set_switch_value("Mode", "B").unwrap();
    let names: Vec<&str> = composite
        .parameters()
        .unwrap()
        .iter()
        .map(|v| v.name())
        .collect();
    assert_eq!(names, vec!["P1", "P2", "P0"]);
}

#[test]
fn parameter_assignment_reaches_all_bundles() {
    let mut resolver = OptionsResolver::from_switches(vec![mode_switch()]);
    resolver
        .set_parameter_value("P2", Value::Double(7.5))
        .unwrap();

    resolver.set_switch_value("Mode", "B").unwrap();
    let p2 = resolver.parameter_by_name("P2").unwrap();
    assert_eq!(p2.current_value(), Some(&Value::Double(7.5)));
}

#[test]
fn defaults_apply_to_every_parameter() {
    let mut resolver = OptionsResolver::from_switches(vec![mode_switch()]);
    let warnings = resolver.apply_default_values();
    assert!(warnings.is_empty());

    for name in ["P1", "P2"] {
        assert_eq!(
            resolver.parameter_by_name(name).unwrap().current_value(),
            Some(&Value::Double(1.0))
        );
    }
}
