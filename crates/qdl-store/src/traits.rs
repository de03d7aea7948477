use qdl_types::RecordHash;

use crate::error::StoreResult;
use crate::record::Record;

/// Durable storage for records, one addressable unit per content hash.
///
/// All implementations must satisfy these invariants:
/// - `persist` is idempotent: writing the same record twice is harmless.
/// - Units are immutable once written; an update writes the new unit before
///   the old one is removed, so a concurrent scan never observes a gap.
/// - `load_all` reconstructs every live record without external schema.
/// - All I/O errors are propagated, never silently ignored.
pub trait RecordBackend: Send + Sync {
    /// Write one durable unit for the record, keyed by its content hash.
    fn persist(&self, record: &Record) -> StoreResult<()>;

    /// Remove the unit for the given hash. Returns `true` if it existed.
    fn remove(&self, hash: &RecordHash) -> StoreResult<bool>;

    /// Read every persisted unit back, ordered by creation time.
    fn load_all(&self) -> StoreResult<Vec<Record>>;
}
