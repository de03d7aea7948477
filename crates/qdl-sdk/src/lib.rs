//! High-level SDK for the Quality Data Ledger.
//!
//! [`Depot`] is the surface external collaborators call: token accounting,
//! privacy wrappers, and training pipelines consume records and quality
//! scores through it and never read persisted units directly.

pub mod config;
pub mod depot;
pub mod error;

pub use config::DepotConfig;
pub use depot::Depot;
pub use error::{SdkError, SdkResult};

// Re-export key types so embedders need only this crate.
pub use qdl_ledger::{Block, VerifyReport};
pub use qdl_store::{AdmissionPolicy, Record, Tier};
pub use qdl_types::{Metadata, Payload, QualityScore, RecordHash, Timestamp};
