//! A document opened from (and saved back to) a JSON file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use extstore_commands::{CommandReport, CommandResult, HostContext};
use extstore_host::{DocumentFile, MemoryDocument, MemorySchemaRegistry, Notifier, Selectable};
use tracing::info;

pub struct Session {
    path: PathBuf,
    registry: MemorySchemaRegistry,
    document: MemoryDocument,
}

impl Session {
    /// Opens `path`, or starts an empty document if it does not exist yet.
    ///
    /// `vendor_id` becomes the document's active vendor regardless of who
    /// saved the file last.
    pub fn open(path: &Path, vendor_id: &str) -> Result<Self> {
        let (registry, document) = if path.exists() {
            let mut file = DocumentFile::read(path)
                .with_context(|| format!("Failed to read document {}", path.display()))?;
            file.vendor_id = vendor_id.to_string();
            file.restore()
        } else {
            info!(path = %path.display(), "Starting new document");
            (MemorySchemaRegistry::new(), MemoryDocument::new(vendor_id))
        };
        Ok(Self {
            path: path.to_path_buf(),
            registry,
            document,
        })
    }

    pub fn save(&self) -> Result<()> {
        DocumentFile::capture(&self.registry, &self.document)
            .and_then(|file| file.write(&self.path))
            .with_context(|| format!("Failed to save document {}", self.path.display()))
    }

    /// Runs a modifying command and saves the document whatever its result.
    ///
    /// A failed command has already rolled back its record changes, but a
    /// schema it registered stays registered and is saved with the rest.
    pub fn run_and_save(
        &self,
        picker: &dyn Selectable,
        notifier: &dyn Notifier,
        command: impl FnOnce(&HostContext<'_>) -> CommandResult<CommandReport>,
    ) -> Result<CommandReport> {
        let result = command(&self.context(picker, notifier));
        self.save()?;
        Ok(result?)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn registry(&self) -> &MemorySchemaRegistry {
        &self.registry
    }

    pub fn document(&self) -> &MemoryDocument {
        &self.document
    }

    pub fn context<'a>(&'a self, picker: &'a dyn Selectable, notifier: &'a dyn Notifier) -> HostContext<'a> {
        HostContext {
            schemas: &self.registry,
            records: &self.document,
            scope: &self.document,
            picker,
            notifier,
        }
    }
}
