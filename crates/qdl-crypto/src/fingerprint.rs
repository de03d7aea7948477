use qdl_types::{Metadata, Payload, QualityScore, RecordHash, Timestamp};

use crate::error::FingerprintError;

/// Domain-separated record fingerprinter.
///
/// The fingerprint is a BLAKE3 digest over the canonical encoding of
/// `(payload, metadata, quality_score, created_at)`. Every field is framed
/// with a little-endian `u64` length prefix before hashing, so the encoding
/// has no concatenation ambiguity across field boundaries. Metadata is
/// serialized from a `BTreeMap`, which fixes key order; two mappings with
/// the same entries always fingerprint identically.
pub struct Fingerprinter {
    domain: &'static str,
}

impl Fingerprinter {
    /// Fingerprinter for data records.
    pub const RECORD: Self = Self {
        domain: "qdl-record-v1",
    };
    /// Fingerprinter for sealed ledger blocks.
    pub const BLOCK: Self = Self {
        domain: "qdl-block-v1",
    };

    /// Create a fingerprinter with a custom domain tag.
    pub const fn new(domain: &'static str) -> Self {
        Self { domain }
    }

    /// The domain tag used by this fingerprinter.
    pub fn domain(&self) -> &str {
        self.domain
    }

    /// Compute the content hash of a record's fields.
    pub fn fingerprint(
        &self,
        payload: &Payload,
        metadata: &Metadata,
        quality_score: QualityScore,
        created_at: Timestamp,
    ) -> Result<RecordHash, FingerprintError> {
        let payload_bytes = payload
            .canonical_bytes()
            .map_err(|e| FingerprintError::Serialization(e.to_string()))?;
        let metadata_bytes = serde_json::to_vec(metadata)
            .map_err(|e| FingerprintError::Serialization(e.to_string()))?;

        let mut hasher = blake3::Hasher::new();
        hasher.update(self.domain.as_bytes());
        hasher.update(b":");
        frame(&mut hasher, &payload_bytes);
        frame(&mut hasher, &metadata_bytes);
        frame(&mut hasher, &quality_score.to_bits().to_le_bytes());
        frame(&mut hasher, &created_at.as_millis().to_le_bytes());
        Ok(RecordHash::from_digest(*hasher.finalize().as_bytes()))
    }
}

/// Write one length-prefixed field into the hasher.
pub(crate) fn frame(hasher: &mut blake3::Hasher, field: &[u8]) {
    hasher.update(&(field.len() as u64).to_le_bytes());
    hasher.update(field);
}
