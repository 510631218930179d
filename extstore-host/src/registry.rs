use extstore_model::SchemaDescriptor;
use extstore_types::SchemaId;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

use crate::{HostError, HostResult, SchemaStore};

/// In-process schema registry.
///
/// Holds at most one schema per (name, vendor id) pair; a second
/// registration for the same pair is refused with
/// [`HostError::SchemaConflict`] so the first one stays canonical.
#[derive(Debug)]
pub struct MemorySchemaRegistry {
    schemas: Mutex<Vec<SchemaDescriptor>>,
    open: AtomicBool,
}

impl MemorySchemaRegistry {
    pub fn new() -> Self {
        Self::with_schemas(Vec::new())
    }

    pub(crate) fn with_schemas(schemas: Vec<SchemaDescriptor>) -> Self {
        Self {
            schemas: Mutex::new(schemas),
            open: AtomicBool::new(true),
        }
    }

    /// Detaches the registry from its document. Every later call fails
    /// with [`HostError::NoActiveDocument`].
    pub fn close(&self) {
        self.open.store(false, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.schemas().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn schemas(&self) -> MutexGuard<'_, Vec<SchemaDescriptor>> {
        self.schemas.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn ensure_open(&self) -> HostResult<()> {
        if self.open.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(HostError::NoActiveDocument)
        }
    }
}

impl Default for MemorySchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaStore for MemorySchemaRegistry {
    fn lookup(&self, name: &str, vendor_id: &str) -> HostResult<Option<SchemaDescriptor>> {
        self.ensure_open()?;
        let found = self
            .schemas()
            .iter()
            .find(|s| s.matches(name, vendor_id))
            .cloned();
        debug!(schema = name, vendor = vendor_id, found = found.is_some(), "Schema lookup");
        Ok(found)
    }

    fn lookup_by_id(&self, id: SchemaId) -> HostResult<Option<SchemaDescriptor>> {
        self.ensure_open()?;
        Ok(self.schemas().iter().find(|s| s.id() == id).cloned())
    }

    fn register(&self, schema: SchemaDescriptor) -> HostResult<SchemaDescriptor> {
        self.ensure_open()?;
        let mut schemas = self.schemas();
        if schemas.iter().any(|s| s.id() == schema.id()) {
            return Err(HostError::DuplicateSchemaId(schema.id()));
        }
        if let Some(existing) = schemas
            .iter()
            .find(|s| s.matches(schema.name(), schema.vendor_id()))
        {
            return Err(HostError::SchemaConflict {
                name: schema.name().to_string(),
                vendor_id: schema.vendor_id().to_string(),
                existing: existing.id(),
            });
        }
        info!(
            schema_id = %schema.id(),
            schema = schema.name(),
            vendor = schema.vendor_id(),
            fields = schema.fields().len(),
            "Schema registered"
        );
        schemas.push(schema.clone());
        Ok(schema)
    }

    fn list(&self) -> HostResult<Vec<SchemaDescriptor>> {
        self.ensure_open()?;
        Ok(self.schemas().clone())
    }
}
