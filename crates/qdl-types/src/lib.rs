//! Foundation types for the Quality Data Ledger (QDL).
//!
//! This crate provides the core identity, temporal, and value types used
//! throughout the QDL system. Every other QDL crate depends on `qdl-types`.
//!
//! # Key Types
//!
//! - [`RecordHash`]: content-addressed identifier (BLAKE3 digest)
//! - [`Payload`]: opaque record content: raw bytes, text, or structured JSON
//! - [`Metadata`]: ordered string-keyed mapping attached to every record
//! - [`QualityScore`]: validated quality score in `[0, 1]`
//! - [`Timestamp`]: millisecond UNIX time with age arithmetic

pub mod error;
pub mod hash;
pub mod payload;
pub mod quality;
pub mod temporal;

pub use error::TypeError;
pub use hash::RecordHash;
pub use payload::{Metadata, Payload};
pub use quality::QualityScore;
pub use temporal::Timestamp;
