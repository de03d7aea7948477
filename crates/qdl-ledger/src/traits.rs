use crate::block::Block;
use crate::error::LedgerResult;

/// Durable storage for sealed blocks, one addressable unit per block.
///
/// Blocks are immutable once sealed; `persist` is only ever called with a
/// freshly sealed block. `load_all` returns blocks in ascending height
/// order. All I/O errors are propagated, never silently ignored.
pub trait BlockBackend: Send + Sync {
    /// Write one durable unit for the sealed block.
    fn persist(&self, block: &Block) -> LedgerResult<()>;

    /// Read every persisted block back, ordered by height.
    fn load_all(&self) -> LedgerResult<Vec<Block>>;
}
