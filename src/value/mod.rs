//! # Value-Type Registry
//!
//! The closed catalogue of value types a model variable can take, together
//! with the converters that move typed values between their runtime form and
//! the two external string representations used by persisted parameter
//! records.
//!
//! ## Core Components
//!
//! - [`ValueType`]: the descriptor set — type names, parsing patterns,
//!   canonical name reconstruction
//! - [`Value`]: the owned runtime payload, one variant per descriptor
//! - [`ParameterNode`]/[`ValueNode`]: the tree form of a serialized value
//! - Converters on [`ValueType`] for the tree and flat forms, size
//!   consistency checks and type-checked cloning
//!
//! ## Example Usage
//!
//! ```rust
//! use agrovar_rs::value::{Value, ValueType};
//!
//! // Resolve a persisted type name to a descriptor and a size
//! let (value_type, size) = ValueType::resolve("double[3]").unwrap();
//! assert_eq!(value_type, ValueType::ArrayDouble);
//! assert_eq!(size, 3);
//!
//! // Parse the flat record form into a typed value and back
//! let entries = vec!["1.5".to_string(), "2.5".to_string(), "3.5".to_string()];
//! let value = value_type.parse_flat(&entries).unwrap();
//! assert_eq!(value, Value::ArrayDouble(vec![1.5, 2.5, 3.5]));
//! assert_eq!(value_type.to_flat(&value).unwrap(), entries);
//! ```

pub mod convert;
pub mod tree;
pub mod types;
pub mod value;

// Re-export key types
pub use convert::{concat_key_value, split_key_value, DATE_FORMAT};
pub use tree::{ParameterNode, ValueNode};
pub use types::{ValueError, ValueType, UNBOUNDED_SIZE};
pub use value::Value;
