use std::path::Path;
use std::sync::Arc;

use qdl_ledger::{Block, FsBlockBackend, IntegrityLedger, VerifyReport};
use qdl_store::{AdmissionPolicy, FsBackend, Record, RetentionSweeper, Tier};
use qdl_types::{Metadata, Payload, RecordHash, Timestamp};
use tracing::info;

use crate::config::DepotConfig;
use crate::error::SdkResult;

/// The collaborator-facing store: two quality tiers plus the integrity
/// ledger behind one surface.
///
/// Admission routes a record to the tier whose policy its score satisfies;
/// lookups, updates, and searches consult the high tier first, then the
/// low. The ledger tracks admitted content hashes; retention sweeps apply
/// to the low tier only.
pub struct Depot {
    high: Tier,
    low: Tier,
    ledger: IntegrityLedger,
    sweeper: RetentionSweeper,
}

impl Depot {
    /// Create a depot with in-memory persistence (tests, embedding).
    pub fn in_memory(config: DepotConfig) -> Self {
        Self {
            high: Tier::in_memory(AdmissionPolicy::HighQuality),
            low: Tier::in_memory(AdmissionPolicy::LowQuality),
            ledger: IntegrityLedger::in_memory(config.block_size),
            sweeper: RetentionSweeper::new(config.retention_period),
        }
    }

    /// Open (or create) an on-disk depot rooted at `root`, reloading both
    /// tiers and the sealed chain.
    ///
    /// Layout: `<root>/high` and `<root>/low` hold record units,
    /// `<root>/ledger` holds block units.
    pub fn open(root: &Path, config: DepotConfig) -> SdkResult<Self> {
        let high = Tier::new(
            AdmissionPolicy::HighQuality,
            Arc::new(FsBackend::open(&root.join("high"))?),
        );
        let low = Tier::new(
            AdmissionPolicy::LowQuality,
            Arc::new(FsBackend::open(&root.join("low"))?),
        );
        let ledger = IntegrityLedger::new(
            config.block_size,
            Arc::new(FsBlockBackend::open(&root.join("ledger"))?),
        );
        high.load_all()?;
        low.load_all()?;
        ledger.load()?;
        info!(
            root = %root.display(),
            high = high.count(),
            low = low.count(),
            blocks = ledger.height(),
            "depot opened"
        );
        Ok(Self {
            high,
            low,
            ledger,
            sweeper: RetentionSweeper::new(config.retention_period),
        })
    }

    /// Admit a record into the tier its quality score belongs to.
    ///
    /// Returns `Ok(false)` only if both tiers reject, which cannot happen
    /// for a well-formed score; the policies partition the range.
    pub fn admit(&self, record: Record) -> SdkResult<bool> {
        if self.high.policy().admits(record.quality_score) {
            Ok(self.high.admit(record)?)
        } else {
            Ok(self.low.admit(record)?)
        }
    }

    /// Admit a record and, on acceptance, track its hash in the ledger.
    /// Returns `true` if the record was admitted.
    pub fn ingest(&self, record: Record) -> SdkResult<bool> {
        let hash = record.content_hash;
        if self.admit(record)? {
            self.ledger.append(hash)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Look up a record in either tier by content hash.
    pub fn get(&self, hash: &RecordHash) -> SdkResult<Option<Record>> {
        if let Some(record) = self.high.get(hash)? {
            return Ok(Some(record));
        }
        Ok(self.low.get(hash)?)
    }

    /// Update a record in whichever tier holds it. The record stays in its
    /// tier regardless of the new content.
    pub fn update(
        &self,
        hash: &RecordHash,
        new_payload: Payload,
        new_metadata: Metadata,
    ) -> SdkResult<bool> {
        if self
            .high
            .update(hash, new_payload.clone(), new_metadata.clone())?
        {
            return Ok(true);
        }
        Ok(self.low.update(hash, new_payload, new_metadata)?)
    }

    /// Exact-match metadata search across both tiers, high tier first.
    pub fn search(&self, query: &Metadata) -> Vec<Record> {
        let mut results = self.high.search(query);
        results.extend(self.low.search(query));
        results
    }

    /// Total live records across both tiers.
    pub fn count(&self) -> usize {
        self.high.count() + self.low.count()
    }

    /// Count-weighted mean quality score across both tiers; 0.0 when empty.
    pub fn average_quality(&self) -> f64 {
        let total = self.count();
        if total == 0 {
            return 0.0;
        }
        let sum = self.high.average_quality() * self.high.count() as f64
            + self.low.average_quality() * self.low.count() as f64;
        sum / total as f64
    }

    /// Track a content hash in the integrity ledger.
    pub fn append_to_ledger(&self, hash: RecordHash) -> SdkResult<Option<Block>> {
        Ok(self.ledger.append(hash)?)
    }

    /// Seal any pending tail hashes into a short block.
    pub fn flush_ledger(&self) -> SdkResult<Option<Block>> {
        Ok(self.ledger.flush()?)
    }

    /// Verify the sealed chain.
    pub fn verify_ledger(&self) -> VerifyReport {
        self.ledger.verify()
    }

    /// Evict expired low-quality records as of `now`. Returns the number
    /// removed.
    pub fn sweep_expired(&self, now: Timestamp) -> SdkResult<usize> {
        Ok(self.sweeper.sweep(&self.low, now)?)
    }

    /// The high-quality tier.
    pub fn high(&self) -> &Tier {
        &self.high
    }

    /// The low-quality tier.
    pub fn low(&self) -> &Tier {
        &self.low
    }

    /// The integrity ledger.
    pub fn ledger(&self) -> &IntegrityLedger {
        &self.ledger
    }
}

impl std::fmt::Debug for Depot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Depot")
            .field("high", &self.high.count())
            .field("low", &self.low.count())
            .field("blocks", &self.ledger.height())
            .finish()
    }
}
