use qdl_types::RecordHash;

/// Errors from tiered store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested record was not found.
    #[error("record not found: {0}")]
    NotFound(RecordHash),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Fingerprint computation failed (fatal for well-formed input).
    #[error(transparent)]
    Fingerprint(#[from] qdl_crypto::FingerprintError),

    /// A persisted unit failed hash verification or cannot be decoded.
    #[error("corrupt record {hash}: {reason}")]
    CorruptRecord { hash: RecordHash, reason: String },

    /// The slot arena and hash index disagree. This is a programming
    /// defect, not a recoverable condition.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
