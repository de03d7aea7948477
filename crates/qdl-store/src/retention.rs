use std::time::Duration;

use qdl_types::Timestamp;
use tracing::info;

use crate::error::{StoreError, StoreResult};
use crate::policy::AdmissionPolicy;
use crate::tier::Tier;

/// Time-based eviction for the low-quality tier.
///
/// Removes every record whose age exceeds the retention period: the record
/// leaves the slot arena, the hash index, and the persistence backend. A
/// record exactly at the boundary is kept (eviction requires age strictly
/// greater than the period). Sweeping twice with no newly expired records
/// removes nothing the second time.
///
/// The sweeper refuses to run against the high-quality tier; high-quality
/// records are never expired.
#[derive(Clone, Copy, Debug)]
pub struct RetentionSweeper {
    retention_period: Duration,
}

impl RetentionSweeper {
    /// Create a sweeper with the given retention period.
    pub fn new(retention_period: Duration) -> Self {
        Self { retention_period }
    }

    /// The configured retention period.
    pub fn retention_period(&self) -> Duration {
        self.retention_period
    }

    /// Evict expired records from `tier` as of `now`. Returns the number
    /// of records removed.
    pub fn sweep(&self, tier: &Tier, now: Timestamp) -> StoreResult<usize> {
        if tier.policy() != AdmissionPolicy::LowQuality {
            return Err(StoreError::InvariantViolation(
                "retention sweep attempted on the high-quality tier".into(),
            ));
        }
        let removed = tier.evict_expired(now, self.retention_period)?;
        if removed > 0 {
            info!(removed, remaining = tier.count(), "retention sweep completed");
        }
        Ok(removed)
    }
}
