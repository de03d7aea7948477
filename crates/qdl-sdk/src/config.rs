use std::time::Duration;

use qdl_ledger::DEFAULT_BLOCK_SIZE;

/// Configuration for a [`Depot`](crate::Depot).
#[derive(Clone, Debug)]
pub struct DepotConfig {
    /// Member hashes per sealed ledger block (default: 10).
    pub block_size: usize,
    /// Maximum age a low-quality record may reach before eviction
    /// (default: 30 days). High-quality records are never expired.
    pub retention_period: Duration,
}

impl Default for DepotConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            retention_period: Duration::from_secs(30 * 24 * 60 * 60),
        }
    }
}
