//! Hashing primitives for the Quality Data Ledger.
//!
//! Two digests are produced here and nowhere else:
//!
//! - [`Fingerprinter`] computes a record's content hash from its payload,
//!   metadata, quality score, and creation time.
//! - [`seal_hash`] computes a sealed block's hash from its member hashes,
//!   the previous block's hash, and the seal time.
//!
//! Both use domain-separated BLAKE3 with length-prefixed field framing, so
//! field boundaries are unambiguous (`"a" + "bc"` and `"ab" + "c"` cannot
//! collide) and a record digest can never equal a block digest.

pub mod error;
pub mod fingerprint;
pub mod seal;

pub use error::FingerprintError;
pub use fingerprint::Fingerprinter;
pub use seal::seal_hash;
