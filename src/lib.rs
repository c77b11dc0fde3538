//! # agrovar-rs
//!
//! `agrovar-rs` is the metadata and parameter-management layer for
//! agricultural simulation models. It defines typed variables used as model
//! inputs, outputs and parameters, validates their values against declarative
//! conditions, resolves which variables are active under a configuration
//! switch, and maps variable values to and from persisted parameter records.
//!
//! The library provides:
//! - A closed registry of value types, each with converters between the typed
//!   value and its tree-structured and flat string representations
//! - A [`Variable`](variable::Variable) cell with bounds, units, metadata and
//!   synchronous value-change notification
//! - A condition engine validating one or two variables against numeric and
//!   array constraints, producing readable violation reports
//! - Configuration switches and an options resolver computing the active and
//!   the union-of-all-possible variable bundles
//! - A persistence coordinator mapping keyed parameter records onto the
//!   properties of a domain object through statically declared accessor tables
//!
//! ## Basic Usage
//!
//! ```
//! use agrovar_rs::value::{Value, ValueType};
//! use agrovar_rs::variable::Variable;
//!
//! let mut yield_max = Variable::new("YieldMax");
//! yield_max.set_value_type(ValueType::Double).unwrap();
//! yield_max.set_bounds(0.0, 100.0);
//! yield_max.set_current_value(Value::Double(42.0));
//! assert!(yield_max.is_type_consistent());
//! ```

// Public modules
pub mod error;

// Value-type registry
pub mod value;

// Typed variable cells
pub mod variable;

// Condition engine
pub mod conditions;

// Configuration switches and options resolution
pub mod options;

// Parameter persistence
pub mod params;

// Re-exports for convenience
pub use error::{AgrovarError, Result};

pub use variable::{VarRole, Variable};

pub use value::{Value, ValueType};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
