//! Schema and entity model for extstore.
//!
//! Defines the types every extstore subsystem agrees on:
//! - [`SchemaDescriptor`]: a finished, immutable record layout with identity,
//!   vendor ownership and access levels
//! - [`SchemaBuilder`] / [`FieldSpec`]: how layouts are declared and validated
//! - [`Entity`]: one record bound to a schema, with typed, unit-aware access
//!
//! Values are held in internal units inside an [`Entity`]; callers always read
//! and write in a display unit of their choosing.

mod entity;
mod error;
mod schema;

pub use entity::{Entity, FieldData, FieldValue};
pub use error::{ModelError, ModelResult};
pub use schema::{AccessLevel, FieldDescriptor, FieldSpec, FieldType, SchemaBuilder, SchemaDescriptor};
