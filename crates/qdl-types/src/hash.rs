use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// BLAKE3 digest naming a record or a sealed ledger block.
///
/// Hashes are minted by the fingerprinting and sealing routines upstream;
/// this type only carries the finished digest. Identical canonical content
/// yields the same hash, so the hash doubles as the storage key and the
/// ledger member identity.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordHash([u8; Self::LEN]);

impl RecordHash {
    /// Digest width in bytes.
    pub const LEN: usize = 32;

    /// The all-zero hash. The first ledger block links to this sentinel in
    /// place of a real predecessor; no fingerprint ever produces it.
    pub const GENESIS: Self = Self([0u8; Self::LEN]);

    /// Wrap a finished BLAKE3 digest.
    pub const fn from_digest(digest: [u8; Self::LEN]) -> Self {
        Self(digest)
    }

    /// Whether this hash is the genesis sentinel.
    pub fn is_genesis(&self) -> bool {
        *self == Self::GENESIS
    }

    /// The raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; Self::LEN] {
        &self.0
    }

    /// Lowercase hex, 64 characters. Persisted units are named with this.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse the 64-character hex form back into a hash.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        if s.len() != 2 * Self::LEN {
            return Err(TypeError::InvalidLength {
                expected: Self::LEN,
                actual: s.len() / 2,
            });
        }
        let mut digest = [0u8; Self::LEN];
        hex::decode_to_slice(s, &mut digest)
            .map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        Ok(Self(digest))
    }
}

impl fmt::Debug for RecordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Logs carry the leading four bytes; the full digest is in Display.
        write!(f, "RecordHash({}..)", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for RecordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
