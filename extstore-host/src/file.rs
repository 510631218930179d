//! JSON file backing for the in-memory host.
//!
//! Lets separate processes share one document: the schema registry and all
//! element records are written to a single file and read back on open.

use extstore_model::SchemaDescriptor;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::info;

use crate::{ElementRecord, HostResult, MemoryDocument, MemorySchemaRegistry, SchemaStore};

const FORMAT_VERSION: u32 = 1;

/// Everything persisted for one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentFile {
    pub version: u32,
    pub vendor_id: String,
    #[serde(default)]
    pub schemas: Vec<SchemaDescriptor>,
    #[serde(default)]
    pub elements: Vec<ElementRecord>,
}

impl DocumentFile {
    /// Captures the current registry and document contents.
    pub fn capture(registry: &MemorySchemaRegistry, document: &MemoryDocument) -> HostResult<Self> {
        Ok(Self {
            version: FORMAT_VERSION,
            vendor_id: document.vendor_id().to_string(),
            schemas: registry.list()?,
            elements: document.to_records(),
        })
    }

    /// Rebuilds a live registry and document.
    pub fn restore(self) -> (MemorySchemaRegistry, MemoryDocument) {
        (
            MemorySchemaRegistry::with_schemas(self.schemas),
            MemoryDocument::from_records(&self.vendor_id, self.elements),
        )
    }

    pub fn read(path: &Path) -> HostResult<Self> {
        let reader = BufReader::new(File::open(path)?);
        let file: Self = serde_json::from_reader(reader)?;
        info!(
            path = %path.display(),
            schemas = file.schemas.len(),
            elements = file.elements.len(),
            "Document loaded"
        );
        Ok(file)
    }

    /// Writes and syncs a sibling temp file, then renames it into place.
    pub fn write(&self, path: &Path) -> HostResult<()> {
        let tmp = path.with_extension("json.tmp");
        {
            let mut writer = BufWriter::new(File::create(&tmp)?);
            serde_json::to_writer_pretty(&mut writer, self)?;
            writer.flush()?;
            writer.get_ref().sync_all()?;
        }
        fs::rename(&tmp, path)?;
        info!(path = %path.display(), "Document saved");
        Ok(())
    }
}
