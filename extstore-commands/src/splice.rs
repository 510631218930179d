//! The wire splice record: four fields describing where a splice sits, how
//! long its wire run is, what it is, and when it was made.

use chrono::{DateTime, FixedOffset, SecondsFormat};
use extstore_types::{UnitCategory, UnitType, Xyz};
use extstore_model::FieldSpec;

use crate::{CommandConfig, CommandResult, RecordValues, RecordView, SchemaRequest};

pub const LOCATION: &str = "Location";
pub const WIRE_LENGTH: &str = "WireLength";
pub const DESCRIPTION: &str = "Description";
pub const SPLICE_TIME: &str = "SpliceTime";

/// The splice schema as registered for `config`'s name and vendor.
pub fn splice_schema_request(config: &CommandConfig) -> SchemaRequest {
    SchemaRequest::new(&config.schema_name, &config.vendor_id)
        .documentation("Wire splice location, length, description and time.")
        .field(
            FieldSpec::xyz(LOCATION)
                .with_unit(UnitCategory::Length)
                .with_documentation("3D point representing the splice location."),
        )
        .field(
            FieldSpec::double(WIRE_LENGTH)
                .with_unit(UnitCategory::Length)
                .with_documentation("Total wire length from the splice to the endpoint."),
        )
        .field(
            FieldSpec::string(DESCRIPTION)
                .with_documentation("Human-readable description of the wire splice."),
        )
        .field(
            FieldSpec::string(SPLICE_TIME)
                .with_documentation("The date and time of the splice in ISO-8601 format."),
        )
}

/// A splice record in display units.
#[derive(Debug, Clone, PartialEq)]
pub struct SpliceRecord {
    pub location: Xyz,
    pub wire_length: f64,
    pub description: String,
    /// ISO-8601 text, stored verbatim.
    pub splice_time: String,
}

impl SpliceRecord {
    /// The configured splice, stamped with `now`.
    pub fn from_config(config: &CommandConfig, now: DateTime<FixedOffset>) -> Self {
        Self {
            location: config.splice.location,
            wire_length: config.splice.wire_length,
            description: config.splice.description.clone(),
            splice_time: now.to_rfc3339_opts(SecondsFormat::AutoSi, false),
        }
    }

    pub fn to_values(&self, unit: UnitType) -> RecordValues {
        RecordValues::new()
            .xyz(LOCATION, self.location, unit)
            .double(WIRE_LENGTH, self.wire_length, unit)
            .text(DESCRIPTION, self.description.as_str())
            .text(SPLICE_TIME, self.splice_time.as_str())
    }

    pub fn from_view(view: &RecordView) -> CommandResult<Self> {
        Ok(Self {
            location: view.xyz(LOCATION)?,
            wire_length: view.double(WIRE_LENGTH)?,
            description: view.text(DESCRIPTION)?.to_string(),
            splice_time: view.text(SPLICE_TIME)?.to_string(),
        })
    }

    /// Parses the stored time, if it is valid RFC 3339.
    pub fn parsed_time(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.splice_time).ok()
    }

    /// Dialog text: numbers to two decimals, text verbatim.
    pub fn render(&self, unit: UnitType) -> String {
        format!(
            "Extensible Storage Data:\n\n\
             - Location: {:.2}\n\
             - Wire Length: {:.2} {}\n\
             - Description: {}\n\
             - Splice Time: {}",
            self.location, self.wire_length, unit, self.description, self.splice_time
        )
    }
}
