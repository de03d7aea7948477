use std::sync::RwLock;

use crate::block::Block;
use crate::error::LedgerResult;
use crate::traits::BlockBackend;

/// In-memory block backend for tests and embedding.
pub struct InMemoryBlockBackend {
    blocks: RwLock<Vec<Block>>,
}

impl InMemoryBlockBackend {
    /// Create a new empty backend.
    pub fn new() -> Self {
        Self {
            blocks: RwLock::new(Vec::new()),
        }
    }

    /// Number of persisted blocks.
    pub fn len(&self) -> usize {
        self.blocks.read().expect("lock poisoned").len()
    }

    /// Returns `true` if no blocks are persisted.
    pub fn is_empty(&self) -> bool {
        self.blocks.read().expect("lock poisoned").is_empty()
    }
}

impl Default for InMemoryBlockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockBackend for InMemoryBlockBackend {
    fn persist(&self, block: &Block) -> LedgerResult<()> {
        let mut blocks = self.blocks.write().expect("lock poisoned");
        blocks.push(block.clone());
        Ok(())
    }

    fn load_all(&self) -> LedgerResult<Vec<Block>> {
        let blocks = self.blocks.read().expect("lock poisoned");
        let mut out = blocks.clone();
        out.sort_by_key(|b| b.height);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qdl_types::{RecordHash, Timestamp};

    #[test]
    fn persist_and_load_in_height_order() {
        let backend = InMemoryBlockBackend::new();
        let b0 = Block::seal(
            0,
            vec![RecordHash::from_digest([1; 32])],
            RecordHash::GENESIS,
            Timestamp::from_millis(1),
        );
        let b1 = Block::seal(
            1,
            vec![RecordHash::from_digest([2; 32])],
            b0.block_hash,
            Timestamp::from_millis(2),
        );
        backend.persist(&b1).unwrap();
        backend.persist(&b0).unwrap();

        let loaded = backend.load_all().unwrap();
        assert_eq!(loaded, vec![b0, b1]);
    }
}
