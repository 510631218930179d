use extstore_types::{SchemaId, UnitCategory};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{ModelError, ModelResult};

/// The value type of a schema field. All field types are simple
/// (single-valued, non-collection).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// A 3D point.
    Xyz,
    /// A double-precision scalar.
    Double,
    /// Free text.
    String,
}

impl FieldType {
    /// Whether fields of this type may carry a unit category.
    #[must_use]
    pub const fn supports_units(self) -> bool {
        matches!(self, FieldType::Xyz | FieldType::Double)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Xyz => write!(f, "xyz"),
            FieldType::Double => write!(f, "double"),
            FieldType::String => write!(f, "string"),
        }
    }
}

/// Who may read or write records of a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    /// Anyone.
    Public,
    /// Only code running under the schema's vendor id.
    Vendor,
    /// Only the application that registered the schema.
    Application,
}

/// A requested field, as handed to [`SchemaBuilder`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_category: Option<UnitCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
}

impl FieldSpec {
    fn simple(name: &str, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            unit_category: None,
            documentation: None,
        }
    }

    /// Shorthand for a point field.
    pub fn xyz(name: &str) -> Self {
        Self::simple(name, FieldType::Xyz)
    }

    /// Shorthand for a scalar field.
    pub fn double(name: &str) -> Self {
        Self::simple(name, FieldType::Double)
    }

    /// Shorthand for a text field.
    pub fn string(name: &str) -> Self {
        Self::simple(name, FieldType::String)
    }

    /// Tags the field with a physical unit category.
    #[must_use]
    pub fn with_unit(mut self, category: UnitCategory) -> Self {
        self.unit_category = Some(category);
        self
    }

    #[must_use]
    pub fn with_documentation(mut self, doc: &str) -> Self {
        self.documentation = Some(doc.into());
        self
    }
}

/// A field of a finished schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    name: String,
    field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    unit_category: Option<UnitCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    documentation: Option<String>,
}

impl FieldDescriptor {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    pub fn unit_category(&self) -> Option<UnitCategory> {
        self.unit_category
    }

    pub fn documentation(&self) -> Option<&str> {
        self.documentation.as_deref()
    }

    /// Whether this descriptor declares exactly what `spec` asks for.
    pub fn matches_spec(&self, spec: &FieldSpec) -> bool {
        self.name == spec.name
            && self.field_type == spec.field_type
            && self.unit_category == spec.unit_category
    }
}

/// A finished record layout.
///
/// Only [`SchemaBuilder::finish`] produces descriptors, so every descriptor in
/// circulation has passed validation. There is no way to change a descriptor's
/// fields or identity afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDescriptor {
    id: SchemaId,
    name: String,
    vendor_id: String,
    read_access: AccessLevel,
    write_access: AccessLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    documentation: Option<String>,
    fields: Vec<FieldDescriptor>,
}

impl SchemaDescriptor {
    pub fn id(&self) -> SchemaId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vendor_id(&self) -> &str {
        &self.vendor_id
    }

    pub fn read_access(&self) -> AccessLevel {
        self.read_access
    }

    pub fn write_access(&self) -> AccessLevel {
        self.write_access
    }

    pub fn documentation(&self) -> Option<&str> {
        self.documentation.as_deref()
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Like [`field`](Self::field), but an undeclared name is an error.
    pub fn require_field(&self, name: &str) -> ModelResult<&FieldDescriptor> {
        self.field(name).ok_or_else(|| ModelError::UnknownField {
            schema: self.name.clone(),
            field: name.to_string(),
        })
    }

    /// True when this schema is the one registered under `(name, vendor_id)`.
    ///
    /// Names compare exactly; vendor ids compare ASCII case-insensitively.
    pub fn matches(&self, name: &str, vendor_id: &str) -> bool {
        self.name == name && self.vendor_id.eq_ignore_ascii_case(vendor_id)
    }

    /// Whether every field in `specs` is declared here with the same name,
    /// type and unit category, in the same order.
    pub fn declares(&self, specs: &[FieldSpec]) -> bool {
        self.fields.len() == specs.len()
            && self.fields.iter().zip(specs).all(|(f, s)| f.matches_spec(s))
    }
}

/// Declares a schema and validates it on [`finish`](Self::finish).
///
/// Read access defaults to [`AccessLevel::Public`], write access to
/// [`AccessLevel::Vendor`].
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    id: SchemaId,
    name: String,
    vendor_id: Option<String>,
    read_access: AccessLevel,
    write_access: AccessLevel,
    documentation: Option<String>,
    fields: Vec<FieldSpec>,
}

impl SchemaBuilder {
    pub fn new(id: SchemaId) -> Self {
        Self {
            id,
            name: String::new(),
            vendor_id: None,
            read_access: AccessLevel::Public,
            write_access: AccessLevel::Vendor,
            documentation: None,
            fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn schema_name(mut self, name: &str) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn vendor_id(mut self, vendor_id: &str) -> Self {
        self.vendor_id = Some(vendor_id.into());
        self
    }

    #[must_use]
    pub fn read_access(mut self, level: AccessLevel) -> Self {
        self.read_access = level;
        self
    }

    #[must_use]
    pub fn write_access(mut self, level: AccessLevel) -> Self {
        self.write_access = level;
        self
    }

    #[must_use]
    pub fn documentation(mut self, doc: &str) -> Self {
        self.documentation = Some(doc.into());
        self
    }

    #[must_use]
    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    #[must_use]
    pub fn fields(mut self, specs: impl IntoIterator<Item = FieldSpec>) -> Self {
        self.fields.extend(specs);
        self
    }

    /// Validates the declaration and produces the immutable descriptor.
    pub fn finish(self) -> ModelResult<SchemaDescriptor> {
        if !is_identifier(&self.name) {
            return Err(ModelError::InvalidSchemaName(self.name));
        }
        let vendor_id = self.vendor_id.ok_or(ModelError::MissingVendorId)?;
        if !is_vendor_id(&vendor_id) {
            return Err(ModelError::InvalidVendorId(vendor_id));
        }

        let mut fields: Vec<FieldDescriptor> = Vec::with_capacity(self.fields.len());
        for spec in self.fields {
            if !is_identifier(&spec.name) {
                return Err(ModelError::InvalidFieldName(spec.name));
            }
            if fields.iter().any(|f| f.name == spec.name) {
                return Err(ModelError::DuplicateField(spec.name));
            }
            if spec.unit_category.is_some() && !spec.field_type.supports_units() {
                return Err(ModelError::UnitNotAllowed {
                    field: spec.name,
                    field_type: spec.field_type,
                });
            }
            fields.push(FieldDescriptor {
                name: spec.name,
                field_type: spec.field_type,
                unit_category: spec.unit_category,
                documentation: spec.documentation,
            });
        }

        Ok(SchemaDescriptor {
            id: self.id,
            name: self.name,
            vendor_id,
            read_access: self.read_access,
            write_access: self.write_access,
            documentation: self.documentation,
            fields,
        })
    }
}

/// Letters, digits and underscores, starting with a letter.
fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn is_vendor_id(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}
