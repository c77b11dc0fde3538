//! # Options Resolution
//!
//! Configuration switches and the resolver computing which variables a model
//! component exposes. A [`OptionSwitch`] maps each of its acceptable values
//! to an [`OptionSet`] bundle; an [`OptionsResolver`] aggregates switches
//! (possibly merged from the resolvers of child components) and exposes both
//! the currently active bundle and the union of every possible one.
//!
//! ## Example Usage
//!
//! ```rust
//! use agrovar_rs::options::{OptionSet, OptionSwitch, OptionsResolver};
//! use agrovar_rs::value::ValueType;
//! use agrovar_rs::variable::Variable;
//!
//! let mut p1 = Variable::new("P1");
//! p1.set_value_type(ValueType::Double).unwrap();
//!
//! let mut simple = OptionSet::new();
//! simple.parameters.push(p1);
//!
//! let switch = OptionSwitch::new(
//!     "Mode",
//!     "Growth model variant",
//!     vec![
//!         ("Simple".to_string(), simple),
//!         ("Detailed".to_string(), OptionSet::new()),
//!     ],
//! );
//!
//! let mut resolver = OptionsResolver::from_switches(vec![switch]);
//! resolver.set_switch_value("Mode", "Simple").unwrap();
//! assert_eq!(resolver.parameters().unwrap().len(), 1);
//! ```

pub mod bundle;
pub mod property;
pub mod resolver;
pub mod switch;

// Re-export key types
pub use bundle::OptionSet;
pub use property::PropertyDescription;
pub use resolver::{OptionsResolver, NO_OPTIONS_SWITCH};
pub use switch::{OptionSwitch, SwitchError, NO_OPTIONS_VALUE};
