/// Errors from fingerprint computation.
///
/// Serialization of a well-formed payload or metadata mapping cannot fail,
/// so callers treat this as fatal rather than recoverable. It is still
/// propagated, never swallowed.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FingerprintError {
    #[error("canonical serialization failed: {0}")]
    Serialization(String),
}
