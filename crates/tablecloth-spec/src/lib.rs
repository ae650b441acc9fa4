//! Descriptor model for Tablecloth: a Frictionless Tabular Data Package.
//!
//! Only the parts that shape a data-entry template are modelled: resources
//! (tables), fields (columns) with their type and constraints, and foreign
//! keys. The descriptor is assumed to be well-formed; nothing here validates
//! it against the Frictionless meta-schema.

pub mod constraints;
pub mod error;
pub mod foreign_key;
pub mod package;

pub use constraints::{ConstraintKind, Constraints};
pub use error::SpecError;
pub use foreign_key::{FieldList, ForeignKey, Reference, SimpleForeignKey, reduce_foreign_keys};
pub use package::{Field, FieldType, Package, Resource, TableSchema};

/// JSON Schema of the descriptor model as a JSON value.
pub fn generate_schema_value() -> serde_json::Value {
    serde_json::to_value(schemars::schema_for!(Package)).unwrap_or_default()
}

/// JSON Schema of the descriptor model, pretty-printed.
pub fn schema_json() -> String {
    serde_json::to_string_pretty(&generate_schema_value()).unwrap_or_default()
}
