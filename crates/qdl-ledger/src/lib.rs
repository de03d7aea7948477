//! Append-only integrity ledger for the Quality Data Ledger.
//!
//! Content hashes of admitted records are buffered and sealed into
//! fixed-size [`Block`]s. Each block commits to the hash of the previous
//! block (`RecordHash::GENESIS` for the first), forming a tamper-evident chain:
//! altering, reordering, or truncating sealed data is detectable by
//! recomputation alone.
//!
//! # Key Pieces
//!
//! - [`IntegrityLedger`] -- pending buffer plus sealed chain; `append`
//!   seals automatically at the block boundary, `flush` seals a short
//!   final block on demand
//! - [`verify_blocks`] -- recomputes hashes and checks linkage over any
//!   chain prefix, reporting the first divergent block
//! - [`BlockBackend`] -- durable storage, one unit per sealed block, with
//!   [`InMemoryBlockBackend`] and [`FsBlockBackend`] implementations

pub mod block;
pub mod chain;
pub mod error;
pub mod fs;
pub mod memory;
pub mod traits;
pub mod verify;

pub use block::Block;
pub use chain::{IntegrityLedger, DEFAULT_BLOCK_SIZE};
pub use error::{LedgerError, LedgerResult};
pub use fs::FsBlockBackend;
pub use memory::InMemoryBlockBackend;
pub use traits::BlockBackend;
pub use verify::{verify_blocks, Divergence, DivergenceReason, VerifyReport};
