use std::fmt;

use crate::block::Block;

/// Why a block diverged from the expected chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DivergenceReason {
    /// The block's stored hash does not match the recomputed one.
    HashMismatch,
    /// The block's `previous_block_hash` does not match its predecessor.
    BrokenLink,
    /// The first block's `previous_block_hash` is not the genesis sentinel.
    BadGenesis,
}

impl fmt::Display for DivergenceReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HashMismatch => write!(f, "stored hash differs from recomputed hash"),
            Self::BrokenLink => write!(f, "previous hash link mismatch"),
            Self::BadGenesis => write!(f, "first block does not link to the genesis sentinel"),
        }
    }
}

/// The first block at which verification failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Divergence {
    /// Index of the first divergent block.
    pub index: usize,
    /// What diverged.
    pub reason: DivergenceReason,
}

/// Outcome of a chain verification pass.
///
/// A report never repairs anything; it only identifies the first block at
/// which the chain stops being trustworthy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VerifyReport {
    /// Number of blocks examined before stopping.
    pub checked: usize,
    /// The first divergence, if any.
    pub divergence: Option<Divergence>,
}

impl VerifyReport {
    /// Returns `true` if no divergence was found.
    pub fn is_valid(&self) -> bool {
        self.divergence.is_none()
    }

    /// Index of the first divergent block, if any.
    pub fn first_invalid(&self) -> Option<usize> {
        self.divergence.map(|d| d.index)
    }
}

impl fmt::Display for VerifyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.divergence {
            None => write!(f, "chain valid ({} blocks)", self.checked),
            Some(d) => write!(f, "chain invalid at block {}: {}", d.index, d.reason),
        }
    }
}

/// Verify a chain (or any prefix of one).
///
/// For each block: recompute its hash from the stored fields, then confirm
/// linkage to its predecessor (the genesis sentinel for block 0). An empty
/// slice is trivially valid. Because only already-loaded blocks are
/// examined, a partially loaded chain can still be checked for tampering
/// up to its loaded height.
pub fn verify_blocks(blocks: &[Block]) -> VerifyReport {
    for (index, block) in blocks.iter().enumerate() {
        let linked = if index == 0 {
            block.previous_block_hash.is_genesis()
        } else {
            block.previous_block_hash == blocks[index - 1].block_hash
        };
        if !linked {
            let reason = if index == 0 {
                DivergenceReason::BadGenesis
            } else {
                DivergenceReason::BrokenLink
            };
            return VerifyReport {
                checked: index + 1,
                divergence: Some(Divergence { index, reason }),
            };
        }
        if !block.verify_hash() {
            return VerifyReport {
                checked: index + 1,
                divergence: Some(Divergence {
                    index,
                    reason: DivergenceReason::HashMismatch,
                }),
            };
        }
    }
    VerifyReport {
        checked: blocks.len(),
        divergence: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qdl_types::{RecordHash, Timestamp};

    fn build_chain(block_count: usize, members_per_block: u8) -> Vec<Block> {
        let mut chain = Vec::new();
        let mut prev = RecordHash::GENESIS;
        for height in 0..block_count {
            let members: Vec<RecordHash> = (0..members_per_block)
                .map(|i| {
                    let mut digest = [0u8; 32];
                    digest[0] = height as u8;
                    digest[1] = i + 1;
                    RecordHash::from_digest(digest)
                })
                .collect();
            let block = Block::seal(
                height as u64,
                members,
                prev,
                Timestamp::from_millis(1_000 + height as u64),
            );
            prev = block.block_hash;
            chain.push(block);
        }
        chain
    }

    #[test]
    fn empty_chain_is_valid() {
        let report = verify_blocks(&[]);
        assert!(report.is_valid());
        assert_eq!(report.checked, 0);
    }

    #[test]
    fn untampered_chain_is_valid() {
        let chain = build_chain(5, 3);
        let report = verify_blocks(&chain);
        assert!(report.is_valid());
        assert_eq!(report.checked, 5);
    }

    #[test]
    fn flipped_member_byte_reports_that_block() {
        let mut chain = build_chain(4, 3);
        let mut digest: [u8; 32] = (*chain[2].member_hashes[1].as_bytes()).to_owned();
        digest[0] ^= 0x01;
        chain[2].member_hashes[1] = RecordHash::from_digest(digest);

        let report = verify_blocks(&chain);
        assert_eq!(report.first_invalid(), Some(2));
        assert_eq!(
            report.divergence.unwrap().reason,
            DivergenceReason::HashMismatch
        );
    }

    #[test]
    fn broken_link_reports_that_block() {
        let mut chain = build_chain(4, 2);
        chain[3].previous_block_hash = RecordHash::from_digest([0x77; 32]);
        let report = verify_blocks(&chain);
        assert_eq!(report.first_invalid(), Some(3));
        assert_eq!(
            report.divergence.unwrap().reason,
            DivergenceReason::BrokenLink
        );
    }

    #[test]
    fn bad_genesis_reported_at_zero() {
        let mut chain = build_chain(2, 2);
        chain[0].previous_block_hash = RecordHash::from_digest([0x88; 32]);
        let report = verify_blocks(&chain);
        assert_eq!(report.first_invalid(), Some(0));
        assert_eq!(
            report.divergence.unwrap().reason,
            DivergenceReason::BadGenesis
        );
    }

    #[test]
    fn prefix_of_valid_chain_is_valid() {
        let chain = build_chain(6, 2);
        assert!(verify_blocks(&chain[..3]).is_valid());
        assert!(verify_blocks(&chain[..1]).is_valid());
    }

    #[test]
    fn earliest_divergence_wins() {
        let mut chain = build_chain(5, 2);
        chain[1].member_hashes[0] = RecordHash::from_digest([0xaa; 32]);
        chain[3].previous_block_hash = RecordHash::from_digest([0xbb; 32]);
        assert_eq!(verify_blocks(&chain).first_invalid(), Some(1));
    }

    #[test]
    fn report_display() {
        let chain = build_chain(2, 1);
        assert_eq!(verify_blocks(&chain).to_string(), "chain valid (2 blocks)");
    }
}
