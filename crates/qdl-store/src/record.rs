use qdl_crypto::Fingerprinter;
use qdl_types::{Metadata, Payload, QualityScore, RecordHash, Timestamp};
use serde::{Deserialize, Serialize};

use crate::error::StoreResult;

/// The atomic unit of storage: an opaque payload plus its classification.
///
/// `content_hash` is a pure function of the four other fields. A record is
/// immutable once admitted; the only sanctioned mutation is
/// [`Tier::update`](crate::Tier::update), which restamps `created_at` and
/// recomputes the hash. The quality score never changes after creation.
///
/// The serde representation is the persisted unit: self-describing JSON
/// with field names preserved, so `load_all` needs no external schema.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub payload: Payload,
    pub metadata: Metadata,
    pub quality_score: QualityScore,
    pub created_at: Timestamp,
    pub content_hash: RecordHash,
}

impl Record {
    /// Create a record stamped with the current time.
    pub fn new(
        payload: Payload,
        metadata: Metadata,
        quality_score: QualityScore,
    ) -> StoreResult<Self> {
        Self::with_created_at(payload, metadata, quality_score, Timestamp::now())
    }

    /// Create a record with an explicit creation time.
    pub fn with_created_at(
        payload: Payload,
        metadata: Metadata,
        quality_score: QualityScore,
        created_at: Timestamp,
    ) -> StoreResult<Self> {
        let content_hash =
            Fingerprinter::RECORD.fingerprint(&payload, &metadata, quality_score, created_at)?;
        Ok(Self {
            payload,
            metadata,
            quality_score,
            created_at,
            content_hash,
        })
    }

    /// Recompute the fingerprint from the current field values.
    pub fn compute_hash(&self) -> StoreResult<RecordHash> {
        Ok(Fingerprinter::RECORD.fingerprint(
            &self.payload,
            &self.metadata,
            self.quality_score,
            self.created_at,
        )?)
    }

    /// Returns `true` if the stored hash matches the recomputed fingerprint.
    pub fn verify_hash(&self) -> StoreResult<bool> {
        Ok(self.compute_hash()? == self.content_hash)
    }

    /// Returns `true` if every key in `query` is present in this record's
    /// metadata with exactly the queried value.
    pub fn matches(&self, query: &Metadata) -> bool {
        query
            .iter()
            .all(|(k, v)| self.metadata.get(k) == Some(v))
    }
}
