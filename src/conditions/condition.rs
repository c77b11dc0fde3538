//! Validation rules over one or two variables
//!
//! A [`Condition`] is a declarative rule checking the current value of the
//! variable(s) it controls. Each rule kind applies to a fixed set of value
//! types; callers ask [`is_applicable`](Condition::is_applicable) before
//! running [`test`](Condition::test), which returns an empty string when the
//! rule is satisfied and one readable line per violation otherwise.

use thiserror::Error;

use crate::value::{Value, ValueType};
use crate::variable::Variable;

/// Errors raised by the condition engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConditionError {
    /// A controlled variable has no declared value type.
    #[error("cannot verify variable '{0}' without a value type")]
    MissingValueType(String),

    /// A controlled variable has no current value.
    #[error("cannot verify conditions for a missing current value (variable '{0}')")]
    MissingCurrentValue(String),

    /// A condition was rejected because it does not apply to its variables.
    #[error("{0}")]
    NotApplicable(String),

    /// The same condition was registered twice in one collection.
    #[error("the conditions collection already contains this condition")]
    DuplicateCondition,

    /// A rule was run against value types outside its applicable set.
    #[error("unsupported value types for a {condition} condition: {first}, {second}")]
    UnsupportedTypes {
        condition: &'static str,
        first: &'static str,
        second: &'static str,
    },
}

/// Tag identifying a rule kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConditionKind {
    /// At least one element of a sequence or table must differ from zero.
    AtLeastOneNonZero,
    /// The first variable must not be smaller than the second.
    GreaterThan,
    /// The first variable must not be zero while the second is non-zero.
    NotZeroIfSecondNonZero,
    /// Every element must lie within the variable's own bounds.
    RangeBased,
    /// The first variable must be in range whenever the second is in range.
    RangeOneRangeTwo,
}

/// Outcome of an applicability check that did not fail outright.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applicability {
    /// The rule applies to its controlled variables.
    Applicable,
    /// The rule does not apply; the reason is reported, not raised.
    NotApplicable(String),
}

impl Applicability {
    /// Whether the rule applies.
    pub fn is_applicable(&self) -> bool {
        matches!(self, Applicability::Applicable)
    }
}

const AT_LEAST_ONE_TYPES: &[ValueType] = &[
    ValueType::ArrayDouble,
    ValueType::ListDouble,
    ValueType::ArrayInteger,
    ValueType::ListInteger,
    ValueType::Bidimensional,
    ValueType::Matrix,
];

const GREATER_THAN_TYPES: &[ValueType] =
    &[ValueType::Date, ValueType::Double, ValueType::Integer];

const SCALAR_NUMERIC_TYPES: &[ValueType] = &[ValueType::Double, ValueType::Integer];

const RANGE_BASED_TYPES: &[ValueType] = &[
    ValueType::Double,
    ValueType::ArrayDouble,
    ValueType::ListDouble,
    ValueType::Integer,
    ValueType::ArrayInteger,
    ValueType::ListInteger,
    ValueType::Bidimensional,
    ValueType::Matrix,
];

/// A validation rule bound to the variable(s) it controls.
#[derive(Debug, Clone)]
pub enum Condition<'a> {
    /// Satisfied unless every element of the controlled sequence or table is
    /// exactly zero.
    AtLeastOneNonZero(&'a Variable),
    /// Satisfied unless the first variable is smaller than the second. Dates
    /// compare only against dates.
    GreaterThan(&'a Variable, &'a Variable),
    /// Satisfied unless the first variable is zero while the second is not.
    NotZeroIfSecondNonZero(&'a Variable, &'a Variable),
    /// Satisfied unless an element lies outside the controlled variable's
    /// `[min, max]` bounds.
    RangeBased(&'a Variable),
    /// Satisfied unless the first variable is outside its own bounds while
    /// the second is inside its own.
    RangeOneRangeTwo(&'a Variable, &'a Variable),
}

impl<'a> Condition<'a> {
    /// The rule-kind tag of this condition.
    pub fn kind(&self) -> ConditionKind {
        match self {
            Condition::AtLeastOneNonZero(_) => ConditionKind::AtLeastOneNonZero,
            Condition::GreaterThan(_, _) => ConditionKind::GreaterThan,
            Condition::NotZeroIfSecondNonZero(_, _) => ConditionKind::NotZeroIfSecondNonZero,
            Condition::RangeBased(_) => ConditionKind::RangeBased,
            Condition::RangeOneRangeTwo(_, _) => ConditionKind::RangeOneRangeTwo,
        }
    }

    /// Human-readable name of the rule kind.
    pub fn name(&self) -> &'static str {
        match self.kind() {
            ConditionKind::AtLeastOneNonZero => "at least one different from zero",
            ConditionKind::GreaterThan => "greater than",
            ConditionKind::NotZeroIfSecondNonZero => "cannot be zero if second is not zero",
            ConditionKind::RangeBased => "range based",
            ConditionKind::RangeOneRangeTwo => "range one range two",
        }
    }

    /// The variables this condition controls.
    pub fn controlled(&self) -> Vec<&'a Variable> {
        match self {
            Condition::AtLeastOneNonZero(var) | Condition::RangeBased(var) => vec![var],
            Condition::GreaterThan(first, second)
            | Condition::NotZeroIfSecondNonZero(first, second)
            | Condition::RangeOneRangeTwo(first, second) => vec![first, second],
        }
    }

    /// The value types this rule kind applies to.
    pub fn applicable_value_types(&self) -> &'static [ValueType] {
        match self.kind() {
            ConditionKind::AtLeastOneNonZero => AT_LEAST_ONE_TYPES,
            ConditionKind::GreaterThan => GREATER_THAN_TYPES,
            ConditionKind::NotZeroIfSecondNonZero => SCALAR_NUMERIC_TYPES,
            ConditionKind::RangeBased => RANGE_BASED_TYPES,
            ConditionKind::RangeOneRangeTwo => SCALAR_NUMERIC_TYPES,
        }
    }

    /// Checks whether this rule applies to its controlled variables.
    ///
    /// Fails fast if a controlled variable has no value type. Reports a
    /// non-applicability reason (without failing) when a value type is
    /// outside the rule's applicable set, when a current value is
    /// inconsistent with its declared type, or when a date would be compared
    /// against a non-date.
    pub fn is_applicable(&self) -> Result<Applicability, ConditionError> {
        for var in self.controlled() {
            if var.value_type().is_none() {
                return Err(ConditionError::MissingValueType(var.name().to_string()));
            }
        }
        for var in self.controlled() {
            let value_type = var.value_type().expect("checked above");
            if !self.applicable_value_types().contains(&value_type) {
                return Ok(Applicability::NotApplicable(format!(
                    "cannot apply a {} condition to the {} variable '{}'",
                    self.name(),
                    value_type.name(),
                    var.name()
                )));
            }
            if !var.is_type_consistent() {
                let actual = var
                    .current_value()
                    .map(|v| v.value_type().name())
                    .unwrap_or("none");
                return Ok(Applicability::NotApplicable(format!(
                    "variable '{}' current value has incorrect type (actual: {}, expected: {})",
                    var.name(),
                    actual,
                    value_type.name()
                )));
            }
        }
        if let Condition::GreaterThan(first, second) = self {
            let first_is_date = first.value_type() == Some(ValueType::Date);
            let second_is_date = second.value_type() == Some(ValueType::Date);
            if first_is_date != second_is_date {
                return Ok(Applicability::NotApplicable(format!(
                    "a greater than condition can verify a Date only against a Date \
                     (variables '{}' and '{}')",
                    first.name(),
                    second.name()
                )));
            }
        }
        Ok(Applicability::Applicable)
    }

    /// Runs the rule against the current values of its variables.
    ///
    /// Returns an empty string when the rule is satisfied; otherwise one
    /// line per violating element or pair, each carrying the variable name,
    /// the offending value(s), the relevant bounds and the caller-supplied
    /// trace tag, terminated by a line break.
    pub fn test(&self, call_id: &str) -> Result<String, ConditionError> {
        match self {
            Condition::RangeBased(var) => self.test_range(var, call_id),
            Condition::AtLeastOneNonZero(var) => self.test_at_least_one(var, call_id),
            Condition::GreaterThan(first, second) => self.test_greater(first, second, call_id),
            Condition::NotZeroIfSecondNonZero(first, second) => {
                self.test_not_zero(first, second, call_id)
            }
            Condition::RangeOneRangeTwo(first, second) => {
                self.test_range_pair(first, second, call_id)
            }
        }
    }

    fn test_range(&self, var: &Variable, call_id: &str) -> Result<String, ConditionError> {
        let value = current_value(var)?;
        let mut report = String::new();
        for (label, element) in indexed_numeric_elements(value) {
            if element > var.max_value() || element < var.min_value() {
                report.push_str(&format!(
                    "{}{} = {} (max={} - min={}) {};\n",
                    var.name(),
                    label,
                    element,
                    var.max_value(),
                    var.min_value(),
                    call_id
                ));
            }
        }
        Ok(report)
    }

    fn test_at_least_one(&self, var: &Variable, call_id: &str) -> Result<String, ConditionError> {
        let value = current_value(var)?;
        let any_non_zero = indexed_numeric_elements(value)
            .into_iter()
            .any(|(_, element)| element != 0.0);
        if any_non_zero {
            return Ok(String::new());
        }
        let index_mark = match value {
            Value::Bidimensional(_) | Value::Matrix(_) => "[,]",
            _ => "[ ]",
        };
        Ok(format!(
            "all {}{} = 0 (at least one should have been different from 0) {};\n",
            var.name(),
            index_mark,
            call_id
        ))
    }

    fn test_greater(
        &self,
        first: &Variable,
        second: &Variable,
        call_id: &str,
    ) -> Result<String, ConditionError> {
        let first_value = current_value(first)?;
        let second_value = current_value(second)?;
        let violated = match (first_value, second_value) {
            (Value::Date(a), Value::Date(b)) => a < b,
            (a, b) => match (a.as_scalar_f64(), b.as_scalar_f64()) {
                (Some(a), Some(b)) => a < b,
                _ => {
                    return Err(ConditionError::UnsupportedTypes {
                        condition: self.name(),
                        first: first_value.value_type().name(),
                        second: second_value.value_type().name(),
                    })
                }
            },
        };
        if violated {
            Ok(format!(
                "{} < {} ({} < {}) {};\n",
                first.name(),
                second.name(),
                display_value(first_value),
                display_value(second_value),
                call_id
            ))
        } else {
            Ok(String::new())
        }
    }

    fn test_not_zero(
        &self,
        first: &Variable,
        second: &Variable,
        call_id: &str,
    ) -> Result<String, ConditionError> {
        let (a, b) = self.scalar_pair(first, second)?;
        if a == 0.0 && b != 0.0 {
            Ok(format!(
                "{} cannot be = 0 if {} is <> 0 ({} = {}) {};\n",
                first.name(),
                second.name(),
                second.name(),
                b,
                call_id
            ))
        } else {
            Ok(String::new())
        }
    }

    fn test_range_pair(
        &self,
        first: &Variable,
        second: &Variable,
        call_id: &str,
    ) -> Result<String, ConditionError> {
        let (a, b) = self.scalar_pair(first, second)?;
        let first_outside = a < first.min_value() || a > first.max_value();
        let second_inside = b >= second.min_value() && b <= second.max_value();
        if first_outside && second_inside {
            Ok(format!(
                "{} = {}. It cannot outrange ({}-{}) if {} is within ({}-{}) {};\n",
                first.name(),
                a,
                first.min_value(),
                first.max_value(),
                second.name(),
                second.min_value(),
                second.max_value(),
                call_id
            ))
        } else {
            Ok(String::new())
        }
    }

    fn scalar_pair(
        &self,
        first: &Variable,
        second: &Variable,
    ) -> Result<(f64, f64), ConditionError> {
        let first_value = current_value(first)?;
        let second_value = current_value(second)?;
        match (first_value.as_scalar_f64(), second_value.as_scalar_f64()) {
            (Some(a), Some(b)) => Ok((a, b)),
            _ => Err(ConditionError::UnsupportedTypes {
                condition: self.name(),
                first: first_value.value_type().name(),
                second: second_value.value_type().name(),
            }),
        }
    }
}

fn current_value<'v>(var: &'v Variable) -> Result<&'v Value, ConditionError> {
    var.current_value()
        .ok_or_else(|| ConditionError::MissingCurrentValue(var.name().to_string()))
}

/// Numeric elements of a value paired with the index label used in violation
/// reports: empty for scalars, `[i]` for sequences, `[i,j]` for tables.
fn indexed_numeric_elements(value: &Value) -> Vec<(String, f64)> {
    match value {
        Value::Double(v) => vec![(String::new(), *v)],
        Value::Integer(v) => vec![(String::new(), f64::from(*v))],
        Value::ArrayDouble(v) | Value::ListDouble(v) => v
            .iter()
            .enumerate()
            .map(|(i, e)| (format!("[{}]", i), *e))
            .collect(),
        Value::ArrayInteger(v) | Value::ListInteger(v) => v
            .iter()
            .enumerate()
            .map(|(i, e)| (format!("[{}]", i), f64::from(*e)))
            .collect(),
        Value::Bidimensional(m) | Value::Matrix(m) => m
            .indexed_iter()
            .map(|((i, j), e)| (format!("[{},{}]", i, j), *e))
            .collect(),
        _ => Vec::new(),
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Double(v) => v.to_string(),
        Value::Integer(v) => v.to_string(),
        Value::Date(v) => v.to_string(),
        other => format!("{:?}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn typed_var(name: &str, value_type: ValueType, value: Value) -> Variable {
        let mut var = Variable::new(name);
        var.set_value_type(value_type).unwrap();
        var.set_current_value(value);
        var
    }

    #[test]
    fn test_range_based_scalar_violation() {
        let mut var = typed_var("Yield", ValueType::Double, Value::Double(150.0));
        var.set_bounds(0.0, 100.0);

        let condition = Condition::RangeBased(&var);
        assert!(condition.is_applicable().unwrap().is_applicable());

        let report = condition.test("unit test").unwrap();
        assert!(report.contains("Yield = 150"));
        assert!(report.contains("max=100"));
        assert!(report.contains("min=0"));
        assert!(report.ends_with(";\n"));
    }

    #[test]
    fn test_range_based_satisfied() {
        let mut var = typed_var("Yield", ValueType::Double, Value::Double(50.0));
        var.set_bounds(0.0, 100.0);
        assert!(Condition::RangeBased(&var).test("t").unwrap().is_empty());
    }

    #[test]
    fn test_range_based_array_reports_each_element() {
        let mut var = typed_var(
            "LayerTemp",
            ValueType::ArrayDouble,
            Value::ArrayDouble(vec![10.0, 200.0, -5.0]),
        );
        var.set_bounds(0.0, 100.0);

        let report = Condition::RangeBased(&var).test("t").unwrap();
        assert!(report.contains("LayerTemp[1] = 200"));
        assert!(report.contains("LayerTemp[2] = -5"));
        assert!(!report.contains("LayerTemp[0]"));
    }

    #[test]
    fn test_range_based_rejects_untyped_variable() {
        let var = Variable::new("Yield");
        let err = Condition::RangeBased(&var).is_applicable().unwrap_err();
        assert!(matches!(err, ConditionError::MissingValueType(_)));
    }

    #[test]
    fn test_range_based_not_applicable_to_strings() {
        let var = typed_var(
            "Label",
            ValueType::String,
            Value::String("x".to_string()),
        );
        let applicability = Condition::RangeBased(&var).is_applicable().unwrap();
        assert!(!applicability.is_applicable());
    }

    #[test]
    fn test_at_least_one_non_zero() {
        let var = typed_var(
            "LayerTemp",
            ValueType::ArrayDouble,
            Value::ArrayDouble(vec![0.0, 0.0, 0.0]),
        );
        let report = Condition::AtLeastOneNonZero(&var).test("t").unwrap();
        assert!(report.contains("LayerTemp[ ]"));
        assert!(report.contains("at least one should have been different from 0"));

        let var = typed_var(
            "LayerTemp",
            ValueType::ArrayDouble,
            Value::ArrayDouble(vec![0.0, 0.1, 0.0]),
        );
        assert!(Condition::AtLeastOneNonZero(&var).test("t").unwrap().is_empty());
    }

    #[test]
    fn test_greater_than_numeric() {
        let sowing = typed_var("SowingDensity", ValueType::Double, Value::Double(2.0));
        let minimum = typed_var("MinimumDensity", ValueType::Integer, Value::Integer(5));

        let condition = Condition::GreaterThan(&sowing, &minimum);
        assert!(condition.is_applicable().unwrap().is_applicable());
        let report = condition.test("t").unwrap();
        assert!(report.contains("SowingDensity < MinimumDensity"));
        assert!(report.contains("(2 < 5)"));
    }

    #[test]
    fn test_greater_than_dates() {
        let harvest = typed_var(
            "HarvestDate",
            ValueType::Date,
            Value::Date(NaiveDate::from_ymd_opt(2021, 6, 1).unwrap()),
        );
        let sowing = typed_var(
            "SowingDate",
            ValueType::Date,
            Value::Date(NaiveDate::from_ymd_opt(2021, 9, 1).unwrap()),
        );

        let report = Condition::GreaterThan(&harvest, &sowing).test("t").unwrap();
        assert!(report.contains("HarvestDate < SowingDate"));
    }

    #[test]
    fn test_greater_than_date_only_against_date() {
        let date = typed_var(
            "HarvestDate",
            ValueType::Date,
            Value::Date(NaiveDate::from_ymd_opt(2021, 6, 1).unwrap()),
        );
        let number = typed_var("Yield", ValueType::Double, Value::Double(1.0));

        let applicability = Condition::GreaterThan(&date, &number).is_applicable().unwrap();
        assert!(!applicability.is_applicable());
    }

    #[test]
    fn test_not_zero_if_second_not_zero() {
        let first = typed_var("RootDepth", ValueType::Double, Value::Double(0.0));
        let second = typed_var("RootGrowthRate", ValueType::Double, Value::Double(3.0));

        let report = Condition::NotZeroIfSecondNonZero(&first, &second)
            .test("t")
            .unwrap();
        assert!(report.contains("RootDepth cannot be = 0 if RootGrowthRate is <> 0"));

        let second = typed_var("RootGrowthRate", ValueType::Double, Value::Double(0.0));
        assert!(Condition::NotZeroIfSecondNonZero(&first, &second)
            .test("t")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_range_one_range_two() {
        let mut first = typed_var("Tmin", ValueType::Double, Value::Double(-50.0));
        first.set_bounds(-20.0, 20.0);
        let mut second = typed_var("Tmax", ValueType::Double, Value::Double(10.0));
        second.set_bounds(0.0, 40.0);

        let report = Condition::RangeOneRangeTwo(&first, &second).test("t").unwrap();
        assert!(report.contains("Tmin = -50"));
        assert!(report.contains("cannot outrange (-20-20)"));
        assert!(report.contains("Tmax is within (0-40)"));

        // Second outside its own range: no violation
        let mut second = typed_var("Tmax", ValueType::Double, Value::Double(99.0));
        second.set_bounds(0.0, 40.0);
        assert!(Condition::RangeOneRangeTwo(&first, &second)
            .test("t")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_inconsistent_current_value_is_not_applicable() {
        let mut var = Variable::new("Yield");
        var.set_value_type(ValueType::Double).unwrap();
        var.set_current_value(Value::Integer(1));

        let applicability = Condition::RangeBased(&var).is_applicable().unwrap();
        assert!(!applicability.is_applicable());
    }

    #[test]
    fn test_missing_current_value_fails_test() {
        let mut var = Variable::new("Yield");
        var.set_value_type(ValueType::Double).unwrap();

        let err = Condition::RangeBased(&var).test("t").unwrap_err();
        assert!(matches!(err, ConditionError::MissingCurrentValue(_)));
    }
}
