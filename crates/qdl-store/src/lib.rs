//! Quality-tiered, content-addressed record storage for the Quality Data
//! Ledger.
//!
//! Every ingested data point becomes an immutable [`Record`] keyed by its
//! content hash. Records are partitioned into two [`Tier`]s by an
//! [`AdmissionPolicy`]: high quality (score >= 0.8) and low quality
//! (score < 0.8). The low tier is additionally subject to time-based
//! eviction through the [`RetentionSweeper`].
//!
//! # Persistence Backends
//!
//! All backends implement the [`RecordBackend`] trait:
//!
//! - [`InMemoryBackend`] -- `HashMap`-based, for tests and embedding
//! - [`FsBackend`] -- one self-describing JSON unit per content hash
//!
//! # Design Rules
//!
//! 1. A rejected record leaves the tier and its backend untouched.
//! 2. Mutations hold the tier's write lock end to end, including the
//!    persisted-unit write; readers never observe a half-applied mutation.
//! 3. Removal tombstones the record's slot; live slots never move, so the
//!    hash index stays valid without reindexing.
//! 4. Persistence failures propagate to the caller. A record either exists
//!    in both the tier and its backend, or in neither.

pub mod error;
pub mod fs;
pub mod memory;
pub mod policy;
pub mod record;
pub mod retention;
pub mod tier;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use fs::FsBackend;
pub use memory::InMemoryBackend;
pub use policy::{AdmissionPolicy, QUALITY_THRESHOLD};
pub use record::Record;
pub use retention::RetentionSweeper;
pub use tier::Tier;
pub use traits::RecordBackend;
