use qdl_types::{RecordHash, Timestamp};

use crate::fingerprint::{frame, Fingerprinter};

/// Compute a sealed block's hash.
///
/// The digest commits to the ordered member hashes, the previous block's
/// hash (or the genesis sentinel for the first block), and the seal time. The
/// member list is prefixed with its count; members are fixed-width digests,
/// so the encoding is unambiguous.
pub fn seal_hash(
    member_hashes: &[RecordHash],
    previous_block_hash: &RecordHash,
    sealed_at: Timestamp,
) -> RecordHash {
    let mut hasher = blake3::Hasher::new();
    hasher.update(Fingerprinter::BLOCK.domain().as_bytes());
    hasher.update(b":");
    hasher.update(&(member_hashes.len() as u64).to_le_bytes());
    for member in member_hashes {
        hasher.update(member.as_bytes());
    }
    frame(&mut hasher, previous_block_hash.as_bytes());
    frame(&mut hasher, &sealed_at.as_millis().to_le_bytes());
    RecordHash::from_digest(*hasher.finalize().as_bytes())
}
