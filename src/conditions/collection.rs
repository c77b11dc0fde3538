//! Grouping and batch verification of conditions

use std::collections::BTreeMap;

use crate::conditions::condition::{Applicability, Condition, ConditionError, ConditionKind};

/// A collection of conditions grouped by rule kind.
///
/// Conditions are checked for applicability when added; verification runs
/// every registered condition and concatenates the violation text.
#[derive(Debug, Default)]
pub struct ConditionsCollection<'a> {
    conditions: BTreeMap<ConditionKind, Vec<Condition<'a>>>,
}

impl<'a> ConditionsCollection<'a> {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a condition to the collection.
    ///
    /// The condition must be applicable to its variables (a non-applicable
    /// condition is rejected with its reason) and must not already be
    /// registered: two conditions of the same kind controlling the same
    /// variable names count as duplicates.
    ///
    /// # Examples
    ///
    /// ```
    /// use agrovar_rs::conditions::{Condition, ConditionsCollection};
    /// use agrovar_rs::value::{Value, ValueType};
    /// use agrovar_rs::variable::Variable;
    ///
    /// let mut yield_max = Variable::new("YieldMax");
    /// yield_max.set_value_type(ValueType::Double).unwrap();
    /// yield_max.set_bounds(0.0, 100.0);
    /// yield_max.set_current_value(Value::Double(50.0));
    ///
    /// let mut collection = ConditionsCollection::new();
    /// collection.add(Condition::RangeBased(&yield_max)).unwrap();
    /// assert!(collection.add(Condition::RangeBased(&yield_max)).is_err());
    /// ```
    pub fn add(&mut self, condition: Condition<'a>) -> Result<(), ConditionError> {
        let applicability = condition.is_applicable()?;
        if let Applicability::NotApplicable(reason) = applicability {
            return Err(ConditionError::NotApplicable(reason));
        }

        let registered = self.conditions.entry(condition.kind()).or_default();
        let names: Vec<&str> = condition.controlled().iter().map(|v| v.name()).collect();
        let duplicate = registered.iter().any(|existing| {
            let existing_names: Vec<&str> =
                existing.controlled().iter().map(|v| v.name()).collect();
            existing_names == names
        });
        if duplicate {
            return Err(ConditionError::DuplicateCondition);
        }

        registered.push(condition);
        Ok(())
    }

    /// The rule kinds currently registered.
    pub fn kinds(&self) -> Vec<ConditionKind> {
        self.conditions.keys().copied().collect()
    }

    /// The conditions registered for one rule kind.
    pub fn conditions_of(&self, kind: ConditionKind) -> &[Condition<'a>] {
        self.conditions.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of registered conditions across all kinds.
    pub fn len(&self) -> usize {
        self.conditions.values().map(Vec::len).sum()
    }

    /// Whether the collection holds no conditions.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Verify every registered condition and concatenate the violation text.
    ///
    /// Fails if any controlled variable has no current value or if a
    /// condition turns out not to be applicable at verification time. The
    /// `call_id` trace tag is appended to every violation line.
    pub fn verify(&self, call_id: &str) -> Result<String, ConditionError> {
        let mut report = String::new();
        for conditions in self.conditions.values() {
            for condition in conditions {
                for var in condition.controlled() {
                    if var.current_value().is_none() {
                        return Err(ConditionError::MissingCurrentValue(var.name().to_string()));
                    }
                }
                let applicability = condition.is_applicable()?;
                if let Applicability::NotApplicable(reason) = applicability {
                    return Err(ConditionError::NotApplicable(reason));
                }
                report.push_str(&condition.test(call_id)?);
            }
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Value, ValueType};
    use crate::variable::Variable;

    fn bounded_var(name: &str, value: f64, min: f64, max: f64) -> Variable {
        let mut var = Variable::new(name);
        var.set_value_type(ValueType::Double).unwrap();
        var.set_bounds(min, max);
        var.set_current_value(Value::Double(value));
        var
    }

    #[test]
    fn test_add_groups_by_kind() {
        let a = bounded_var("A", 1.0, 0.0, 10.0);
        let b = bounded_var("B", 2.0, 0.0, 10.0);

        let mut collection = ConditionsCollection::new();
        collection.add(Condition::RangeBased(&a)).unwrap();
        collection.add(Condition::RangeBased(&b)).unwrap();
        collection.add(Condition::GreaterThan(&a, &b)).unwrap();

        assert_eq!(collection.len(), 3);
        assert_eq!(
            collection.conditions_of(ConditionKind::RangeBased).len(),
            2
        );
        assert_eq!(
            collection.kinds(),
            vec![ConditionKind::GreaterThan, ConditionKind::RangeBased]
        );
    }

    #[test]
    fn test_duplicates_are_rejected() {
        let a = bounded_var("A", 1.0, 0.0, 10.0);

        let mut collection = ConditionsCollection::new();
        collection.add(Condition::RangeBased(&a)).unwrap();
        let err = collection.add(Condition::RangeBased(&a)).unwrap_err();
        assert!(matches!(err, ConditionError::DuplicateCondition));
    }

    #[test]
    fn test_non_applicable_condition_is_rejected() {
        let mut label = Variable::new("Label");
        label.set_value_type(ValueType::String).unwrap();
        label.set_current_value(Value::String("x".to_string()));

        let mut collection = ConditionsCollection::new();
        let err = collection.add(Condition::RangeBased(&label)).unwrap_err();
        assert!(matches!(err, ConditionError::NotApplicable(_)));
    }

    #[test]
    fn test_verify_concatenates_violations() {
        let a = bounded_var("A", 20.0, 0.0, 10.0);
        let b = bounded_var("B", -5.0, 0.0, 10.0);

        let mut collection = ConditionsCollection::new();
        collection.add(Condition::RangeBased(&a)).unwrap();
        collection.add(Condition::RangeBased(&b)).unwrap();

        let report = collection.verify("verify test").unwrap();
        assert!(report.contains("A = 20"));
        assert!(report.contains("B = -5"));
        assert!(report.contains("verify test"));
    }

    #[test]
    fn test_verify_requires_current_values() {
        let mut var = Variable::new("A");
        var.set_value_type(ValueType::Double).unwrap();
        var.set_bounds(0.0, 10.0);
        var.set_current_value(Value::Double(1.0));

        let mut collection = ConditionsCollection::new();
        collection.add(Condition::RangeBased(&var)).unwrap();

        // A fresh collection over a variable without a value fails
        let mut empty_var = Variable::new("A");
        empty_var.set_value_type(ValueType::Double).unwrap();
        let mut other = ConditionsCollection::new();
        other.add(Condition::RangeBased(&empty_var)).unwrap();
        let err = other.verify("t").unwrap_err();
        assert!(matches!(err, ConditionError::MissingCurrentValue(_)));
    }
}
