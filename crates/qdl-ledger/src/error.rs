/// Errors from ledger operations.
///
/// Verification failures are not errors; they are reported structurally
/// through [`VerifyReport`](crate::VerifyReport) and never auto-repaired.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// I/O error from the underlying block backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A persisted block unit failed hash verification or is malformed.
    #[error("corrupt block at height {height}: {reason}")]
    CorruptBlock { height: u64, reason: String },

    /// A load was attempted on a ledger that already holds chain state.
    #[error("ledger already holds {sealed} sealed blocks and {pending} pending hashes; load requires a fresh ledger")]
    NotEmpty { sealed: usize, pending: usize },
}

/// Result alias for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;
