use qdl_ledger::LedgerError;
use qdl_store::StoreError;

/// Errors surfaced by the SDK.
#[derive(Debug, thiserror::Error)]
pub enum SdkError {
    /// Error from the tiered record store.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Error from the integrity ledger.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Result alias for SDK operations.
pub type SdkResult<T> = Result<T, SdkError>;
