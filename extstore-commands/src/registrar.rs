use extstore_host::{HostError, SchemaStore};
use extstore_model::{AccessLevel, FieldSpec, SchemaBuilder, SchemaDescriptor};
use extstore_types::SchemaId;
use tracing::{debug, info, warn};

use crate::CommandResult;

/// What a caller wants registered.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaRequest {
    pub name: String,
    pub vendor_id: String,
    pub read_access: AccessLevel,
    pub write_access: AccessLevel,
    pub documentation: Option<String>,
    pub fields: Vec<FieldSpec>,
}

impl SchemaRequest {
    /// Public read, vendor-restricted write, no fields yet.
    pub fn new(name: &str, vendor_id: &str) -> Self {
        Self {
            name: name.into(),
            vendor_id: vendor_id.into(),
            read_access: AccessLevel::Public,
            write_access: AccessLevel::Vendor,
            documentation: None,
            fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    #[must_use]
    pub fn documentation(mut self, doc: &str) -> Self {
        self.documentation = Some(doc.into());
        self
    }

    fn build(&self) -> SchemaBuilder {
        let builder = SchemaBuilder::new(SchemaId::new())
            .schema_name(&self.name)
            .vendor_id(&self.vendor_id)
            .read_access(self.read_access)
            .write_access(self.write_access)
            .fields(self.fields.iter().cloned());
        match &self.documentation {
            Some(doc) => builder.documentation(doc),
            None => builder,
        }
    }
}

/// Returns the schema registered under the request's (name, vendor id),
/// registering it first if there is none.
///
/// An existing schema is returned as-is even when its fields differ from the
/// request; the mismatch is only logged.
pub fn ensure_schema(store: &dyn SchemaStore, request: &SchemaRequest) -> CommandResult<SchemaDescriptor> {
    if let Some(existing) = store.lookup(&request.name, &request.vendor_id)? {
        if !existing.declares(&request.fields) {
            warn!(
                schema = %request.name,
                schema_id = %existing.id(),
                "Registered schema declares different fields than requested; using it unchanged"
            );
        }
        debug!(schema = %request.name, schema_id = %existing.id(), "Reusing registered schema");
        return Ok(existing);
    }

    let schema = request.build().finish()?;
    match store.register(schema) {
        Ok(registered) => {
            info!(schema = %request.name, schema_id = %registered.id(), "Schema created");
            Ok(registered)
        }
        Err(HostError::SchemaConflict { existing, .. }) => {
            warn!(schema = %request.name, winner = %existing, "Schema registered concurrently; adopting it");
            store
                .lookup_by_id(existing)?
                .ok_or_else(|| HostError::Host(format!("schema {existing} vanished after conflict")).into())
        }
        Err(e) => Err(e.into()),
    }
}
