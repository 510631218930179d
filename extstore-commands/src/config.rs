//! Command configuration.
//!
//! Every key has a default, so an empty JSON object (or no file at all)
//! yields the stock splice schema owned by the default vendor.

use extstore_types::{UnitCategory, UnitType, Xyz};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::{CommandError, CommandResult};

pub const DEFAULT_SCHEMA_NAME: &str = "MySchema";
pub const DEFAULT_VENDOR_ID: &str = "Khalid";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandConfig {
    pub schema_name: String,
    pub vendor_id: String,
    /// Unit lengths are written in and displayed in.
    pub display_unit: UnitType,
    pub splice: SpliceDefaults,
}

/// Values the write command stores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpliceDefaults {
    pub location: Xyz,
    pub wire_length: f64,
    pub description: String,
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            schema_name: DEFAULT_SCHEMA_NAME.into(),
            vendor_id: DEFAULT_VENDOR_ID.into(),
            display_unit: UnitType::Meters,
            splice: SpliceDefaults::default(),
        }
    }
}

impl Default for SpliceDefaults {
    fn default() -> Self {
        Self {
            location: Xyz::new(1.0, 2.0, 3.0),
            wire_length: 12.5,
            description: "Main splice near junction box".into(),
        }
    }
}

impl CommandConfig {
    /// Loads and validates a JSON config file.
    pub fn from_json_file(path: &Path) -> CommandResult<Self> {
        let raw = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> CommandResult<()> {
        if self.schema_name.trim().is_empty() {
            return Err(CommandError::Config("schema_name is empty".into()));
        }
        if self.vendor_id.trim().is_empty() {
            return Err(CommandError::Config("vendor_id is empty".into()));
        }
        if self.display_unit.category() != UnitCategory::Length {
            return Err(CommandError::Config(format!(
                "display_unit must be a length unit, got {}",
                self.display_unit
            )));
        }
        if !self.splice.wire_length.is_finite() {
            return Err(CommandError::Config("splice.wire_length must be finite".into()));
        }
        let Xyz { x, y, z } = self.splice.location;
        if !(x.is_finite() && y.is_finite() && z.is_finite()) {
            return Err(CommandError::Config("splice.location must be finite".into()));
        }
        Ok(())
    }
}
