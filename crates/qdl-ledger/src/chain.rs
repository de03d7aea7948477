use std::sync::{Arc, Mutex};

use qdl_types::{RecordHash, Timestamp};
use tracing::{debug, info};

use crate::block::Block;
use crate::error::{LedgerError, LedgerResult};
use crate::memory::InMemoryBlockBackend;
use crate::traits::BlockBackend;
use crate::verify::{verify_blocks, VerifyReport};

/// Default number of member hashes per sealed block.
pub const DEFAULT_BLOCK_SIZE: usize = 10;

/// Append-only, hash-chained ledger over record content hashes.
///
/// Hashes accumulate in a pending buffer; when the buffer reaches
/// `block_size` it is sealed into a [`Block`] that commits to the previous
/// block's hash. The size check and the seal run inside one critical
/// section, so concurrent appends cannot both observe a full buffer and
/// race to seal.
///
/// Sealing is atomic from the caller's perspective: the block is persisted
/// first, then committed to memory and the buffer cleared. On persistence
/// failure nothing changes.
pub struct IntegrityLedger {
    block_size: usize,
    backend: Arc<dyn BlockBackend>,
    inner: Mutex<ChainState>,
}

#[derive(Default)]
struct ChainState {
    sealed: Vec<Block>,
    pending: Vec<RecordHash>,
}

impl IntegrityLedger {
    /// Create a ledger over the given block backend. A `block_size` of
    /// zero is treated as one.
    pub fn new(block_size: usize, backend: Arc<dyn BlockBackend>) -> Self {
        Self {
            block_size: block_size.max(1),
            backend,
            inner: Mutex::new(ChainState::default()),
        }
    }

    /// Create a ledger backed by in-memory persistence (tests, embedding).
    pub fn in_memory(block_size: usize) -> Self {
        Self::new(block_size, Arc::new(InMemoryBlockBackend::new()))
    }

    /// The configured block size.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Buffer a record hash; seals and returns a block exactly when the
    /// buffer reaches the block size.
    pub fn append(&self, hash: RecordHash) -> LedgerResult<Option<Block>> {
        let mut state = self.inner.lock().expect("ledger lock poisoned");
        state.pending.push(hash);
        debug!(pending = state.pending.len(), ?hash, "hash appended");
        if state.pending.len() >= self.block_size {
            return self.seal_locked(&mut state).map(Some);
        }
        Ok(None)
    }

    /// Seal a short final block from the pending buffer, if non-empty.
    ///
    /// Callers needing durability for tail data use this instead of waiting
    /// for a full block.
    pub fn flush(&self) -> LedgerResult<Option<Block>> {
        let mut state = self.inner.lock().expect("ledger lock poisoned");
        if state.pending.is_empty() {
            return Ok(None);
        }
        self.seal_locked(&mut state).map(Some)
    }

    /// Seal the pending buffer into a new block. Must hold the lock.
    fn seal_locked(&self, state: &mut ChainState) -> LedgerResult<Block> {
        let previous = state
            .sealed
            .last()
            .map(|b| b.block_hash)
            .unwrap_or(RecordHash::GENESIS);
        let block = Block::seal(
            state.sealed.len() as u64,
            state.pending.clone(),
            previous,
            Timestamp::now(),
        );
        // Persist before committing: on failure the pending buffer and
        // chain are exactly as they were.
        self.backend.persist(&block)?;
        state.pending.clear();
        state.sealed.push(block.clone());
        info!(
            height = block.height,
            members = block.len(),
            hash = ?block.block_hash,
            "block sealed"
        );
        Ok(block)
    }

    /// Recompute every sealed block's hash and check linkage.
    ///
    /// A chain with zero sealed blocks is valid regardless of pending
    /// hashes; pending data is unconfirmed until sealed.
    pub fn verify(&self) -> VerifyReport {
        let state = self.inner.lock().expect("ledger lock poisoned");
        verify_blocks(&state.sealed)
    }

    /// Number of sealed blocks.
    pub fn height(&self) -> usize {
        self.inner.lock().expect("ledger lock poisoned").sealed.len()
    }

    /// Number of buffered, not-yet-sealed hashes.
    pub fn pending_len(&self) -> usize {
        self.inner.lock().expect("ledger lock poisoned").pending.len()
    }

    /// Snapshot of the sealed chain.
    pub fn blocks(&self) -> Vec<Block> {
        self.inner.lock().expect("ledger lock poisoned").sealed.clone()
    }

    /// Repopulate the sealed chain from the backend. Returns the number of
    /// blocks loaded. Heights must be contiguous from zero; linkage and
    /// hash integrity are the caller's to check via [`Self::verify`].
    ///
    /// Only a fresh ledger may load. Once anything has been appended or
    /// sealed in memory, loading would discard it, so the call is rejected
    /// instead.
    pub fn load(&self) -> LedgerResult<usize> {
        let mut state = self.inner.lock().expect("ledger lock poisoned");
        if !state.sealed.is_empty() || !state.pending.is_empty() {
            return Err(LedgerError::NotEmpty {
                sealed: state.sealed.len(),
                pending: state.pending.len(),
            });
        }
        let blocks = self.backend.load_all()?;
        for (i, block) in blocks.iter().enumerate() {
            if block.height != i as u64 {
                return Err(LedgerError::CorruptBlock {
                    height: block.height,
                    reason: format!("expected height {i}; the chain has a gap"),
                });
            }
        }
        let loaded = blocks.len();
        state.sealed = blocks;
        info!(loaded, "ledger loaded from backend");
        Ok(loaded)
    }
}

impl std::fmt::Debug for IntegrityLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntegrityLedger")
            .field("block_size", &self.block_size)
            .field("height", &self.height())
            .field("pending", &self.pending_len())
            .finish()
    }
}
