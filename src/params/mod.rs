//! # Parameter Persistence
//!
//! Loading and saving keyed parameter records. A [`ParametersSet`] is the
//! document model handed around by the opaque [`ValuesReader`] and
//! [`ValuesWriter`] collaborators; [`ParameterIo`] is the coordinator mapping
//! a record onto the properties of a [`DomainClass`] through its statically
//! declared [`PropertyTable`]. [`JsonParametersStore`] is the bundled
//! file-backed store.
//!
//! ## Example Usage
//!
//! ```rust
//! use agrovar_rs::params::{DomainClass, PropertyTable};
//! use agrovar_rs::value::{Value, ValueType};
//!
//! #[derive(Default)]
//! struct CropParameters {
//!     yield_max: Option<f64>,
//! }
//!
//! impl DomainClass for CropParameters {
//!     fn property_table() -> PropertyTable<Self> {
//!         PropertyTable::builder()
//!             .property(
//!                 "YieldMax",
//!                 ValueType::Double,
//!                 |c| c.yield_max.map(Value::Double),
//!                 |c, v| {
//!                     if let Value::Double(d) = v {
//!                         c.yield_max = Some(d);
//!                     }
//!                 },
//!             )
//!             .build()
//!     }
//! }
//!
//! let table = CropParameters::property_table();
//! assert!(table.get("YieldMax").is_some());
//! ```

pub mod io;
pub mod set;
pub mod store;
pub mod table;

// Re-export key types
pub use io::ParameterIo;
pub use set::{ParameterKey, ParameterRecord, ParametersSet, SetDescriptor};
pub use store::{JsonParametersStore, PersistenceError, ValuesReader, ValuesWriter};
pub use table::{DomainClass, PropertyAccessor, PropertyTable, PropertyTableBuilder};
