//! Core type definitions for extstore.
//!
//! This crate defines the host-agnostic value types that every other crate
//! depends on:
//! - Schema and element identifiers
//! - [`Xyz`], the 3D point stored in point fields
//! - Unit categories, display units and the pure [`convert`] function
//!
//! Nothing here knows about schemas or entities; those live in
//! `extstore-model`.

mod ids;
mod point;
mod units;

pub use ids::{ElementId, SchemaId};
pub use point::Xyz;
pub use units::{UnitCategory, UnitType, convert, from_internal, to_internal};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid UUID: {0}")]
    InvalidUuid(#[from] uuid::Error),

    #[error("invalid element id: {0}")]
    InvalidElementId(String),

    #[error("unknown unit: {0}")]
    UnknownUnit(String),

    #[error("cannot convert {from} ({from_category}) to {to} ({to_category})")]
    IncompatibleUnits {
        from: UnitType,
        from_category: UnitCategory,
        to: UnitType,
        to_category: UnitCategory,
    },
}
