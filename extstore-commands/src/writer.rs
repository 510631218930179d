use extstore_host::{RecordStore, TransactionalScope};
use extstore_model::{Entity, FieldValue, SchemaDescriptor};
use extstore_types::{ElementId, UnitType, Xyz};
use tracing::info;

use crate::{CommandError, CommandResult};

pub const WRITE_TRANSACTION: &str = "Write Extensible Storage";
pub const DELETE_TRANSACTION: &str = "Delete Extensible Storage";

/// One value destined for a record field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldEntry {
    pub name: String,
    pub value: FieldValue,
    /// Display unit of `value`; required for unit-tagged fields.
    pub unit: Option<UnitType>,
}

/// An ordered set of field values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordValues {
    entries: Vec<FieldEntry>,
}

impl RecordValues {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn xyz(mut self, name: &str, point: Xyz, unit: UnitType) -> Self {
        self.push(name, FieldValue::Xyz(point), Some(unit));
        self
    }

    #[must_use]
    pub fn double(mut self, name: &str, value: f64, unit: UnitType) -> Self {
        self.push(name, FieldValue::Double(value), Some(unit));
        self
    }

    /// A scalar without a unit category.
    #[must_use]
    pub fn number(mut self, name: &str, value: f64) -> Self {
        self.push(name, FieldValue::Double(value), None);
        self
    }

    #[must_use]
    pub fn text(mut self, name: &str, value: impl Into<String>) -> Self {
        self.push(name, FieldValue::String(value.into()), None);
        self
    }

    pub fn entries(&self) -> &[FieldEntry] {
        &self.entries
    }

    fn push(&mut self, name: &str, value: FieldValue, unit: Option<UnitType>) {
        self.entries.push(FieldEntry {
            name: name.into(),
            value,
            unit,
        });
    }
}

/// Builds a record for `schema`, converting unit-tagged values into storage
/// units. Every declared field must receive a value.
pub fn build_entity(schema: &SchemaDescriptor, values: &RecordValues) -> CommandResult<Entity> {
    let mut entity = Entity::new(schema);
    for entry in values.entries() {
        entity.set_value(&entry.name, entry.value.clone(), entry.unit)?;
    }
    let missing = entity.missing_fields();
    if !missing.is_empty() {
        return Err(CommandError::MissingFieldValues(
            missing.into_iter().map(String::from).collect(),
        ));
    }
    Ok(entity)
}

/// Attaches `entity` to `element` in one transaction, replacing any record
/// of the same schema. Nothing is kept if any step fails.
pub fn write_record(
    scope: &dyn TransactionalScope,
    records: &dyn RecordStore,
    entity: &Entity,
    element: ElementId,
) -> CommandResult<()> {
    scope.run(WRITE_TRANSACTION, &mut || records.set(element, entity.clone()))?;
    info!(element = %element, schema = entity.schema().name(), "Record written");
    Ok(())
}

/// Removes the record for `schema` from `element` in one transaction.
/// Returns whether a record was attached.
pub fn delete_record(
    scope: &dyn TransactionalScope,
    records: &dyn RecordStore,
    schema: &SchemaDescriptor,
    element: ElementId,
) -> CommandResult<bool> {
    let mut removed = false;
    scope.run(DELETE_TRANSACTION, &mut || {
        removed = records.delete(element, schema)?;
        Ok(())
    })?;
    info!(element = %element, schema = schema.name(), removed, "Record delete finished");
    Ok(removed)
}
