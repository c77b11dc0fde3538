//! # Condition Engine
//!
//! Declarative validation of variable values. A [`Condition`] checks one or
//! two [`Variable`](crate::variable::Variable)s against a rule (range,
//! non-zero, ordering); a [`ConditionsCollection`] groups conditions by rule
//! kind and runs them together; [`Preconditions`] is the pre/post phase
//! facade producing labelled, human-readable violation reports.
//!
//! ## Example Usage
//!
//! ```rust
//! use agrovar_rs::conditions::{Condition, ConditionsCollection, Preconditions};
//! use agrovar_rs::value::{Value, ValueType};
//! use agrovar_rs::variable::Variable;
//!
//! let mut yield_max = Variable::new("Yield");
//! yield_max.set_value_type(ValueType::Double).unwrap();
//! yield_max.set_bounds(0.0, 100.0);
//! yield_max.set_current_value(Value::Double(150.0));
//!
//! let mut collection = ConditionsCollection::new();
//! collection.add(Condition::RangeBased(&yield_max)).unwrap();
//!
//! let checks = Preconditions::new();
//! let report = checks
//!     .verify_preconditions(&collection, "component CropGrowth")
//!     .unwrap();
//! assert!(report.contains("Yield = 150"));
//! ```

pub mod checks;
pub mod collection;
pub mod condition;

// Re-export key types
pub use checks::{ChecksOutput, DefaultChecksOutput, Preconditions};
pub use collection::ConditionsCollection;
pub use condition::{Applicability, Condition, ConditionError, ConditionKind};
