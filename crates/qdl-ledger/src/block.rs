use qdl_crypto::seal_hash;
use qdl_types::{RecordHash, Timestamp};
use serde::{Deserialize, Serialize};

/// One sealed batch of record hashes in the integrity chain.
///
/// `block_hash` commits to the ordered member hashes, the previous block's
/// hash, and the seal time. `height` is reload bookkeeping only and is not
/// part of the hash input; tampering with it is caught by the linkage
/// check, not by recomputation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Position in the chain, starting at 0.
    pub height: u64,
    /// Content hashes of the member records, in arrival order.
    pub member_hashes: Vec<RecordHash>,
    /// Hash of the previous block, or [`RecordHash::GENESIS`] for the first.
    pub previous_block_hash: RecordHash,
    /// When the block was sealed.
    pub sealed_at: Timestamp,
    /// This block's own hash.
    pub block_hash: RecordHash,
}

impl Block {
    /// Seal a block over the given members, computing its hash.
    pub fn seal(
        height: u64,
        member_hashes: Vec<RecordHash>,
        previous_block_hash: RecordHash,
        sealed_at: Timestamp,
    ) -> Self {
        let block_hash = seal_hash(&member_hashes, &previous_block_hash, sealed_at);
        Self {
            height,
            member_hashes,
            previous_block_hash,
            sealed_at,
            block_hash,
        }
    }

    /// Recompute this block's hash from its stored fields.
    pub fn compute_hash(&self) -> RecordHash {
        seal_hash(&self.member_hashes, &self.previous_block_hash, self.sealed_at)
    }

    /// Returns `true` if the stored hash matches the recomputed one.
    pub fn verify_hash(&self) -> bool {
        self.compute_hash() == self.block_hash
    }

    /// Number of member hashes.
    pub fn len(&self) -> usize {
        self.member_hashes.len()
    }

    /// Returns `true` if the block has no members.
    pub fn is_empty(&self) -> bool {
        self.member_hashes.is_empty()
    }
}
