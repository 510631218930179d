//! Unit categories and display units.
//!
//! Unit-tagged values are stored in the host's internal unit for their
//! category (decimal feet for lengths, radians for angles). Callers always
//! speak in a display unit; the helpers here move values between the two.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

const FEET_PER_METER: f64 = 1.0 / 0.3048;

/// The physical quantity a field measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitCategory {
    Length,
    Angle,
}

impl UnitCategory {
    /// The unit values of this category are stored in.
    #[must_use]
    pub const fn internal_unit(self) -> UnitType {
        match self {
            UnitCategory::Length => UnitType::Feet,
            UnitCategory::Angle => UnitType::Radians,
        }
    }
}

impl fmt::Display for UnitCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitCategory::Length => write!(f, "length"),
            UnitCategory::Angle => write!(f, "angle"),
        }
    }
}

/// A concrete display unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitType {
    Feet,
    Inches,
    Meters,
    Centimeters,
    Millimeters,
    Radians,
    Degrees,
}

impl UnitType {
    #[must_use]
    pub const fn category(self) -> UnitCategory {
        match self {
            UnitType::Feet
            | UnitType::Inches
            | UnitType::Meters
            | UnitType::Centimeters
            | UnitType::Millimeters => UnitCategory::Length,
            UnitType::Radians | UnitType::Degrees => UnitCategory::Angle,
        }
    }

    /// Number of internal units in one of this unit.
    #[must_use]
    pub fn internal_factor(self) -> f64 {
        match self {
            UnitType::Feet => 1.0,
            UnitType::Inches => 1.0 / 12.0,
            UnitType::Meters => FEET_PER_METER,
            UnitType::Centimeters => FEET_PER_METER / 100.0,
            UnitType::Millimeters => FEET_PER_METER / 1000.0,
            UnitType::Radians => 1.0,
            UnitType::Degrees => std::f64::consts::PI / 180.0,
        }
    }

    /// Short symbol used when rendering values.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            UnitType::Feet => "ft",
            UnitType::Inches => "in",
            UnitType::Meters => "m",
            UnitType::Centimeters => "cm",
            UnitType::Millimeters => "mm",
            UnitType::Radians => "rad",
            UnitType::Degrees => "°",
        }
    }
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for UnitType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ft" | "feet" | "foot" => Ok(UnitType::Feet),
            "in" | "inch" | "inches" => Ok(UnitType::Inches),
            "m" | "meter" | "meters" | "metre" | "metres" => Ok(UnitType::Meters),
            "cm" | "centimeter" | "centimeters" => Ok(UnitType::Centimeters),
            "mm" | "millimeter" | "millimeters" => Ok(UnitType::Millimeters),
            "rad" | "radian" | "radians" => Ok(UnitType::Radians),
            "deg" | "degree" | "degrees" => Ok(UnitType::Degrees),
            other => Err(Error::UnknownUnit(other.to_string())),
        }
    }
}

/// Converts `value` from one display unit to another of the same category.
pub fn convert(value: f64, from: UnitType, to: UnitType) -> Result<f64> {
    if from.category() != to.category() {
        return Err(Error::IncompatibleUnits {
            from,
            from_category: from.category(),
            to,
            to_category: to.category(),
        });
    }
    if from == to {
        return Ok(value);
    }
    Ok(value * from.internal_factor() / to.internal_factor())
}

/// Converts a display value into the internal unit of `unit`'s category.
#[must_use]
pub fn to_internal(value: f64, unit: UnitType) -> f64 {
    value * unit.internal_factor()
}

/// Converts an internally stored value into `unit`.
#[must_use]
pub fn from_internal(value: f64, unit: UnitType) -> f64 {
    value / unit.internal_factor()
}
