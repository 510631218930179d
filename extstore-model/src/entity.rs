use extstore_types::{SchemaId, UnitType, Xyz, from_internal, to_internal};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{FieldDescriptor, FieldType, ModelError, ModelResult, SchemaDescriptor};

/// A stored field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Xyz(Xyz),
    Double(f64),
    String(String),
}

impl FieldValue {
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldValue::Xyz(_) => FieldType::Xyz,
            FieldValue::Double(_) => FieldType::Double,
            FieldValue::String(_) => FieldType::String,
        }
    }

    /// False when any numeric component is NaN or infinite.
    pub fn is_finite(&self) -> bool {
        match self {
            FieldValue::Xyz(p) => p.x.is_finite() && p.y.is_finite() && p.z.is_finite(),
            FieldValue::Double(v) => v.is_finite(),
            FieldValue::String(_) => true,
        }
    }

    fn scaled(self, f: impl Fn(f64) -> f64) -> Self {
        match self {
            FieldValue::Xyz(p) => FieldValue::Xyz(p.map(f)),
            FieldValue::Double(v) => FieldValue::Double(f(v)),
            s @ FieldValue::String(_) => s,
        }
    }
}

impl From<Xyz> for FieldValue {
    fn from(p: Xyz) -> Self {
        FieldValue::Xyz(p)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Double(v)
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for extstore_types::Xyz {}
    impl Sealed for f64 {}
    impl Sealed for String {}
}

/// Rust types that map onto a [`FieldType`].
pub trait FieldData: sealed::Sealed + Sized {
    const FIELD_TYPE: FieldType;

    fn into_value(self) -> FieldValue;

    fn from_value(value: FieldValue) -> Option<Self>;
}

impl FieldData for Xyz {
    const FIELD_TYPE: FieldType = FieldType::Xyz;

    fn into_value(self) -> FieldValue {
        FieldValue::Xyz(self)
    }

    fn from_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Xyz(p) => Some(p),
            _ => None,
        }
    }
}

impl FieldData for f64 {
    const FIELD_TYPE: FieldType = FieldType::Double;

    fn into_value(self) -> FieldValue {
        FieldValue::Double(self)
    }

    fn from_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Double(v) => Some(v),
            _ => None,
        }
    }
}

impl FieldData for String {
    const FIELD_TYPE: FieldType = FieldType::String;

    fn into_value(self) -> FieldValue {
        FieldValue::String(self)
    }

    fn from_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }
}

/// One record instance bound to a schema.
///
/// Every access names a declared field and the field's declared type; unit
/// tagged fields additionally need a display unit of the right category.
/// Values are kept in internal units, so two entities holding the same
/// quantity compare equal regardless of the unit they were written in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    schema: SchemaDescriptor,
    values: BTreeMap<String, FieldValue>,
}

impl Entity {
    /// Creates an empty record for `schema`.
    pub fn new(schema: &SchemaDescriptor) -> Self {
        Self {
            schema: schema.clone(),
            values: BTreeMap::new(),
        }
    }

    pub fn schema(&self) -> &SchemaDescriptor {
        &self.schema
    }

    pub fn schema_id(&self) -> SchemaId {
        self.schema.id()
    }

    /// Sets a field without a unit. Fails on unit-tagged fields.
    pub fn set<T: FieldData>(&mut self, field: &str, value: T) -> ModelResult<()> {
        self.set_value(field, value.into_value(), None)
    }

    /// Sets a unit-tagged field from a value expressed in `unit`.
    pub fn set_in<T: FieldData>(&mut self, field: &str, value: T, unit: UnitType) -> ModelResult<()> {
        self.set_value(field, value.into_value(), Some(unit))
    }

    /// Reads a field without a unit. Fails on unit-tagged fields.
    pub fn get<T: FieldData>(&self, field: &str) -> ModelResult<T> {
        self.get_typed(field, None)
    }

    /// Reads a unit-tagged field, converted into `unit`.
    pub fn get_in<T: FieldData>(&self, field: &str, unit: UnitType) -> ModelResult<T> {
        self.get_typed(field, Some(unit))
    }

    /// Untyped setter; the value's type must match the declaration and its
    /// stored form must be finite.
    pub fn set_value(&mut self, field: &str, value: FieldValue, unit: Option<UnitType>) -> ModelResult<()> {
        let descriptor = self.schema.require_field(field)?;
        check_type(descriptor, value.field_type())?;
        let value = match check_unit(descriptor, unit)? {
            Some(unit) => value.scaled(|v| to_internal(v, unit)),
            None => value,
        };
        if !value.is_finite() {
            return Err(ModelError::NonFinite(field.to_string()));
        }
        self.values.insert(field.to_string(), value);
        Ok(())
    }

    /// Untyped getter, converting unit-tagged values into `unit`.
    pub fn get_value(&self, field: &str, unit: Option<UnitType>) -> ModelResult<FieldValue> {
        let descriptor = self.schema.require_field(field)?;
        let unit = check_unit(descriptor, unit)?;
        let stored = self
            .values
            .get(field)
            .cloned()
            .ok_or_else(|| ModelError::FieldNotSet(field.to_string()))?;
        Ok(match unit {
            Some(unit) => stored.scaled(|v| from_internal(v, unit)),
            None => stored,
        })
    }

    /// The stored (internal unit) value of a field, if set.
    pub fn raw(&self, field: &str) -> Option<&FieldValue> {
        self.values.get(field)
    }

    pub fn is_set(&self, field: &str) -> bool {
        self.values.contains_key(field)
    }

    /// Declared fields that have no value yet, in declaration order.
    pub fn missing_fields(&self) -> Vec<&str> {
        self.schema
            .fields()
            .iter()
            .map(FieldDescriptor::name)
            .filter(|name| !self.values.contains_key(*name))
            .collect()
    }

    fn get_typed<T: FieldData>(&self, field: &str, unit: Option<UnitType>) -> ModelResult<T> {
        let descriptor = self.schema.require_field(field)?;
        check_type(descriptor, T::FIELD_TYPE)?;
        let value = self.get_value(field, unit)?;
        let actual = value.field_type();
        T::from_value(value).ok_or_else(|| ModelError::TypeMismatch {
            field: field.to_string(),
            expected: T::FIELD_TYPE,
            actual,
        })
    }
}

fn check_type(descriptor: &FieldDescriptor, actual: FieldType) -> ModelResult<()> {
    if descriptor.field_type() == actual {
        Ok(())
    } else {
        Err(ModelError::TypeMismatch {
            field: descriptor.name().to_string(),
            expected: descriptor.field_type(),
            actual,
        })
    }
}

fn check_unit(descriptor: &FieldDescriptor, unit: Option<UnitType>) -> ModelResult<Option<UnitType>> {
    match (descriptor.unit_category(), unit) {
        (Some(category), Some(unit)) if unit.category() == category => Ok(Some(unit)),
        (Some(category), Some(unit)) => Err(ModelError::UnitMismatch {
            field: descriptor.name().to_string(),
            expected: category,
            actual: unit,
        }),
        (Some(category), None) => Err(ModelError::UnitRequired {
            field: descriptor.name().to_string(),
            category,
        }),
        (None, Some(unit)) => Err(ModelError::UnexpectedUnit {
            field: descriptor.name().to_string(),
            unit,
        }),
        (None, None) => Ok(None),
    }
}
