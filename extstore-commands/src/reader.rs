use extstore_host::{RecordStore, SchemaStore};
use extstore_model::{Entity, FieldType, FieldValue, ModelError, ModelResult, SchemaDescriptor};
use extstore_types::{ElementId, SchemaId, UnitCategory, UnitType, Xyz};
use tracing::debug;

use crate::CommandResult;

/// Result of reading a record. Only `Found` carries data; the others are
/// normal negative answers, not failures.
#[derive(Debug, Clone, PartialEq)]
pub enum ReadOutcome {
    SchemaNotFound { name: String, vendor_id: String },
    InvalidObject(ElementId),
    NoData(ElementId),
    Found(RecordView),
}

/// One extracted field.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewField {
    pub name: String,
    pub value: FieldValue,
    /// Unit `value` is expressed in, for unit-tagged fields.
    pub unit: Option<UnitType>,
}

/// Read-only view of every field of a record, in display units.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordView {
    schema_id: SchemaId,
    schema_name: String,
    element: ElementId,
    fields: Vec<ViewField>,
}

impl RecordView {
    /// Extracts every declared field of `entity`.
    ///
    /// Fields measuring the same category as `display_unit` are converted
    /// into it; other unit-tagged fields use their category's internal unit.
    /// A declared field without a value is an error.
    pub fn extract(entity: &Entity, element: ElementId, display_unit: UnitType) -> ModelResult<Self> {
        let schema = entity.schema();
        let fields = schema
            .fields()
            .iter()
            .map(|descriptor| {
                let unit = descriptor
                    .unit_category()
                    .map(|category| unit_for(category, display_unit));
                let value = entity.get_value(descriptor.name(), unit)?;
                Ok(ViewField {
                    name: descriptor.name().to_string(),
                    value,
                    unit,
                })
            })
            .collect::<ModelResult<Vec<_>>>()?;
        Ok(Self {
            schema_id: schema.id(),
            schema_name: schema.name().to_string(),
            element,
            fields,
        })
    }

    pub fn schema_id(&self) -> SchemaId {
        self.schema_id
    }

    pub fn schema_name(&self) -> &str {
        &self.schema_name
    }

    pub fn element(&self) -> ElementId {
        self.element
    }

    pub fn fields(&self) -> &[ViewField] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> ModelResult<&ViewField> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| ModelError::UnknownField {
                schema: self.schema_name.clone(),
                field: name.to_string(),
            })
    }

    pub fn xyz(&self, name: &str) -> ModelResult<Xyz> {
        match &self.field(name)?.value {
            FieldValue::Xyz(p) => Ok(*p),
            other => Err(mismatch(name, other, FieldType::Xyz)),
        }
    }

    pub fn double(&self, name: &str) -> ModelResult<f64> {
        match &self.field(name)?.value {
            FieldValue::Double(v) => Ok(*v),
            other => Err(mismatch(name, other, FieldType::Double)),
        }
    }

    pub fn text(&self, name: &str) -> ModelResult<&str> {
        match &self.field(name)?.value {
            FieldValue::String(s) => Ok(s),
            other => Err(mismatch(name, other, FieldType::String)),
        }
    }
}

fn mismatch(name: &str, stored: &FieldValue, requested: FieldType) -> ModelError {
    ModelError::TypeMismatch {
        field: name.to_string(),
        expected: stored.field_type(),
        actual: requested,
    }
}

fn unit_for(category: UnitCategory, display_unit: UnitType) -> UnitType {
    if display_unit.category() == category {
        display_unit
    } else {
        category.internal_unit()
    }
}

/// Looks up `(name, vendor_id)` and reads its record from `element`.
pub fn read_record(
    schemas: &dyn SchemaStore,
    records: &dyn RecordStore,
    name: &str,
    vendor_id: &str,
    element: ElementId,
    display_unit: UnitType,
) -> CommandResult<ReadOutcome> {
    match schemas.lookup(name, vendor_id)? {
        Some(schema) => read_with_schema(records, &schema, element, display_unit),
        None => {
            debug!(schema = name, vendor = vendor_id, "Schema not registered");
            Ok(ReadOutcome::SchemaNotFound {
                name: name.to_string(),
                vendor_id: vendor_id.to_string(),
            })
        }
    }
}

/// Reads the record for an already resolved schema.
pub fn read_with_schema(
    records: &dyn RecordStore,
    schema: &SchemaDescriptor,
    element: ElementId,
    display_unit: UnitType,
) -> CommandResult<ReadOutcome> {
    if !records.is_valid_object(element)? {
        debug!(element = %element, "Selected element is no longer valid");
        return Ok(ReadOutcome::InvalidObject(element));
    }
    let Some(entity) = records.get(element, schema)? else {
        debug!(element = %element, schema = schema.name(), "No record attached");
        return Ok(ReadOutcome::NoData(element));
    };
    Ok(ReadOutcome::Found(RecordView::extract(&entity, element, display_unit)?))
}
