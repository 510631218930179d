//! In-memory host document.
//!
//! Mirrors the rules a real host enforces on per-element records: writes
//! need an open transaction, vendor-restricted schemas can only be written
//! by their vendor, and deleted elements stop being valid objects.

use extstore_model::{AccessLevel, Entity, SchemaDescriptor};
use extstore_types::{ElementId, SchemaId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

use crate::{HostError, HostResult, RecordStore, TransactionalScope};

const FIRST_ELEMENT_ID: i64 = 1000;

/// Public view of an element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementInfo {
    pub id: ElementId,
    pub name: String,
    pub deleted: bool,
}

/// Serialized form of an element and its records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementRecord {
    pub id: ElementId,
    pub name: String,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub records: Vec<Entity>,
}

#[derive(Debug, Clone)]
struct ElementState {
    name: String,
    deleted: bool,
    records: BTreeMap<SchemaId, Entity>,
}

#[derive(Debug)]
struct DocumentState {
    /// `None` once every id up to `i64::MAX` has been handed out.
    next_id: Option<i64>,
    transactions_started: u64,
    elements: BTreeMap<ElementId, ElementState>,
    transaction: Option<String>,
    fail_next_set: Option<String>,
    fail_next_commit: Option<String>,
}

/// A host document held in memory.
#[derive(Debug)]
pub struct MemoryDocument {
    vendor_id: String,
    state: Mutex<DocumentState>,
}

impl MemoryDocument {
    /// Creates an empty document whose running add-in is `vendor_id`.
    pub fn new(vendor_id: &str) -> Self {
        Self::from_records(vendor_id, Vec::new())
    }

    pub(crate) fn from_records(vendor_id: &str, records: Vec<ElementRecord>) -> Self {
        let elements: BTreeMap<ElementId, ElementState> = records
            .into_iter()
            .map(|r| {
                let state = ElementState {
                    name: r.name,
                    deleted: r.deleted,
                    records: r.records.into_iter().map(|e| (e.schema_id(), e)).collect(),
                };
                (r.id, state)
            })
            .collect();
        let next_id = elements
            .keys()
            .last()
            .map_or(Some(FIRST_ELEMENT_ID), |id| id.value().checked_add(1));
        Self {
            vendor_id: vendor_id.to_string(),
            state: Mutex::new(DocumentState {
                next_id,
                transactions_started: 0,
                elements,
                transaction: None,
                fail_next_set: None,
                fail_next_commit: None,
            }),
        }
    }

    pub(crate) fn to_records(&self) -> Vec<ElementRecord> {
        self.state()
            .elements
            .iter()
            .map(|(id, e)| ElementRecord {
                id: *id,
                name: e.name.clone(),
                deleted: e.deleted,
                records: e.records.values().cloned().collect(),
            })
            .collect()
    }

    /// The vendor id of the add-in operating on this document.
    pub fn vendor_id(&self) -> &str {
        &self.vendor_id
    }

    pub fn add_element(&self, name: &str) -> HostResult<ElementId> {
        let mut state = self.state();
        let next = state.next_id.ok_or(HostError::ElementIdsExhausted)?;
        let id = ElementId::new(next);
        state.next_id = next.checked_add(1);
        state.elements.insert(
            id,
            ElementState {
                name: name.to_string(),
                deleted: false,
                records: BTreeMap::new(),
            },
        );
        debug!(element = %id, name, "Element added");
        Ok(id)
    }

    /// Marks an element deleted. Its handle stays around but is no longer a
    /// valid object.
    pub fn delete_element(&self, id: ElementId) -> HostResult<()> {
        let mut state = self.state();
        let element = state
            .elements
            .get_mut(&id)
            .ok_or(HostError::ElementNotFound(id))?;
        element.deleted = true;
        element.records.clear();
        debug!(element = %id, "Element deleted");
        Ok(())
    }

    pub fn element(&self, id: ElementId) -> Option<ElementInfo> {
        self.state().elements.get(&id).map(|e| ElementInfo {
            id,
            name: e.name.clone(),
            deleted: e.deleted,
        })
    }

    pub fn elements(&self) -> Vec<ElementInfo> {
        self.state()
            .elements
            .iter()
            .map(|(id, e)| ElementInfo {
                id: *id,
                name: e.name.clone(),
                deleted: e.deleted,
            })
            .collect()
    }

    pub fn in_transaction(&self) -> bool {
        self.state().transaction.is_some()
    }

    /// How many transactions have been started on this document, whatever
    /// their outcome.
    pub fn transactions_started(&self) -> u64 {
        self.state().transactions_started
    }

    /// Makes the next [`RecordStore::set`] fail with a host error.
    pub fn fail_next_set(&self, reason: &str) {
        self.state().fail_next_set = Some(reason.to_string());
    }

    /// Makes the next [`Transaction::commit`] fail.
    pub fn fail_next_commit(&self, reason: &str) {
        self.state().fail_next_commit = Some(reason.to_string());
    }

    /// Opens a transaction. Only one may be open at a time.
    pub fn start_transaction(&self, name: &str) -> HostResult<Transaction<'_>> {
        let mut state = self.state();
        if let Some(open) = &state.transaction {
            return Err(HostError::TransactionAlreadyOpen(open.clone()));
        }
        state.transaction = Some(name.to_string());
        state.transactions_started += 1;
        let snapshot = state.elements.clone();
        debug!(transaction = name, "Transaction started");
        Ok(Transaction {
            document: self,
            name: name.to_string(),
            snapshot: Some(snapshot),
        })
    }

    fn state(&self) -> MutexGuard<'_, DocumentState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_access(&self, schema: &SchemaDescriptor, write: bool) -> HostResult<()> {
        let level = if write {
            schema.write_access()
        } else {
            schema.read_access()
        };
        let allowed = match level {
            AccessLevel::Public => true,
            AccessLevel::Vendor | AccessLevel::Application => {
                schema.vendor_id().eq_ignore_ascii_case(&self.vendor_id)
            }
        };
        if allowed {
            return Ok(());
        }
        let schema_name = schema.name().to_string();
        let owner = schema.vendor_id().to_string();
        let active_vendor = self.vendor_id.clone();
        Err(if write {
            HostError::WriteAccessDenied {
                schema: schema_name,
                owner,
                active_vendor,
            }
        } else {
            HostError::ReadAccessDenied {
                schema: schema_name,
                owner,
                active_vendor,
            }
        })
    }
}

impl DocumentState {
    fn live_element(&self, id: ElementId) -> HostResult<&ElementState> {
        match self.elements.get(&id) {
            Some(e) if e.deleted => Err(HostError::InvalidObject(id)),
            Some(e) => Ok(e),
            None => Err(HostError::ElementNotFound(id)),
        }
    }

    fn live_element_mut(&mut self, id: ElementId) -> HostResult<&mut ElementState> {
        match self.elements.get_mut(&id) {
            Some(e) if e.deleted => Err(HostError::InvalidObject(id)),
            Some(e) => Ok(e),
            None => Err(HostError::ElementNotFound(id)),
        }
    }

    fn require_transaction(&self) -> HostResult<()> {
        if self.transaction.is_some() {
            Ok(())
        } else {
            Err(HostError::TransactionRequired)
        }
    }
}

impl RecordStore for MemoryDocument {
    fn is_valid_object(&self, element: ElementId) -> HostResult<bool> {
        Ok(self
            .state()
            .elements
            .get(&element)
            .is_some_and(|e| !e.deleted))
    }

    fn get(&self, element: ElementId, schema: &SchemaDescriptor) -> HostResult<Option<Entity>> {
        self.check_access(schema, false)?;
        let state = self.state();
        let record = state.live_element(element)?.records.get(&schema.id()).cloned();
        debug!(element = %element, schema = schema.name(), found = record.is_some(), "Record fetched");
        Ok(record)
    }

    fn set(&self, element: ElementId, entity: Entity) -> HostResult<()> {
        self.check_access(entity.schema(), true)?;
        let mut state = self.state();
        state.require_transaction()?;
        if let Some(reason) = state.fail_next_set.take() {
            return Err(HostError::Host(reason));
        }
        let target = state.live_element_mut(element)?;
        debug!(element = %element, schema = entity.schema().name(), "Record attached");
        target.records.insert(entity.schema_id(), entity);
        Ok(())
    }

    fn delete(&self, element: ElementId, schema: &SchemaDescriptor) -> HostResult<bool> {
        self.check_access(schema, true)?;
        let mut state = self.state();
        state.require_transaction()?;
        let removed = state
            .live_element_mut(element)?
            .records
            .remove(&schema.id())
            .is_some();
        debug!(element = %element, schema = schema.name(), removed, "Record deleted");
        Ok(removed)
    }

    fn schemas_on(&self, element: ElementId) -> HostResult<Vec<SchemaId>> {
        let state = self.state();
        Ok(state.live_element(element)?.records.keys().copied().collect())
    }
}

impl TransactionalScope for MemoryDocument {
    fn run(&self, name: &str, work: &mut dyn FnMut() -> HostResult<()>) -> HostResult<()> {
        let transaction = self.start_transaction(name)?;
        work()?;
        transaction.commit()
    }
}

/// An open transaction on a [`MemoryDocument`].
///
/// Dropping it without calling [`commit`](Self::commit) restores every
/// element to the state it had when the transaction started.
#[derive(Debug)]
pub struct Transaction<'a> {
    document: &'a MemoryDocument,
    name: String,
    snapshot: Option<BTreeMap<ElementId, ElementState>>,
}

impl Transaction<'_> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn commit(mut self) -> HostResult<()> {
        let mut state = self.document.state();
        if let Some(reason) = state.fail_next_commit.take() {
            drop(state);
            return Err(HostError::CommitFailed {
                name: self.name.clone(),
                reason,
            });
        }
        state.transaction = None;
        self.snapshot = None;
        info!(transaction = %self.name, "Transaction committed");
        Ok(())
    }

    /// Discards every change made since the transaction started.
    pub fn rollback(self) {
        drop(self);
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if let Some(snapshot) = self.snapshot.take() {
            let mut state = self.document.state();
            state.elements = snapshot;
            state.transaction = None;
            warn!(transaction = %self.name, "Transaction rolled back");
        }
    }
}
