use std::collections::HashMap;
use std::sync::RwLock;

use qdl_types::RecordHash;

use crate::error::StoreResult;
use crate::record::Record;
use crate::traits::RecordBackend;

/// In-memory, HashMap-based record backend.
///
/// Intended for tests and embedding. Units are held behind a `RwLock` and
/// cloned on read/write.
pub struct InMemoryBackend {
    units: RwLock<HashMap<RecordHash, Record>>,
}

impl InMemoryBackend {
    /// Create a new empty backend.
    pub fn new() -> Self {
        Self {
            units: RwLock::new(HashMap::new()),
        }
    }

    /// Number of persisted units.
    pub fn len(&self) -> usize {
        self.units.read().expect("lock poisoned").len()
    }

    /// Returns `true` if no units are persisted.
    pub fn is_empty(&self) -> bool {
        self.units.read().expect("lock poisoned").is_empty()
    }

    /// Returns `true` if a unit exists for the given hash.
    pub fn contains(&self, hash: &RecordHash) -> bool {
        self.units.read().expect("lock poisoned").contains_key(hash)
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordBackend for InMemoryBackend {
    fn persist(&self, record: &Record) -> StoreResult<()> {
        let mut units = self.units.write().expect("lock poisoned");
        units.insert(record.content_hash, record.clone());
        Ok(())
    }

    fn remove(&self, hash: &RecordHash) -> StoreResult<bool> {
        let mut units = self.units.write().expect("lock poisoned");
        Ok(units.remove(hash).is_some())
    }

    fn load_all(&self) -> StoreResult<Vec<Record>> {
        let units = self.units.read().expect("lock poisoned");
        let mut records: Vec<Record> = units.values().cloned().collect();
        records.sort_by_key(|r| (r.created_at, r.content_hash));
        Ok(records)
    }
}

impl std::fmt::Debug for InMemoryBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryBackend")
            .field("unit_count", &self.len())
            .finish()
    }
}
