use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::TypeError;

/// Ordered metadata mapping attached to every record.
///
/// Backed by a `BTreeMap` so iteration (and therefore serialization) always
/// visits keys in sorted order. This is what makes metadata hashing immune
/// to insertion-order differences.
pub type Metadata = BTreeMap<String, Value>;

/// Opaque record content.
///
/// The store never interprets a payload's internal structure; the variants
/// exist only so callers can round-trip their data without re-encoding it.
/// The kind tag participates in the content hash, so a byte payload and a
/// text payload with identical bytes hash differently.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Payload {
    /// Raw bytes.
    Bytes(Vec<u8>),
    /// UTF-8 text.
    Text(String),
    /// Structured JSON value.
    Json(Value),
}

impl Payload {
    /// Single-byte kind tag used in the canonical encoding.
    pub fn kind_tag(&self) -> u8 {
        match self {
            Self::Bytes(_) => 0,
            Self::Text(_) => 1,
            Self::Json(_) => 2,
        }
    }

    /// Canonical byte encoding: kind tag followed by the payload bytes.
    ///
    /// JSON values are serialized with sorted object keys (`serde_json`'s
    /// default map representation), so semantically identical objects encode
    /// identically regardless of how they were built.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>, TypeError> {
        let mut out = vec![self.kind_tag()];
        match self {
            Self::Bytes(data) => out.extend_from_slice(data),
            Self::Text(text) => out.extend_from_slice(text.as_bytes()),
            Self::Json(value) => {
                let encoded = serde_json::to_vec(value)
                    .map_err(|e| TypeError::Serialization(e.to_string()))?;
                out.extend_from_slice(&encoded);
            }
        }
        Ok(out)
    }

    /// Approximate payload size in bytes.
    pub fn size_hint(&self) -> usize {
        match self {
            Self::Bytes(data) => data.len(),
            Self::Text(text) => text.len(),
            Self::Json(value) => serde_json::to_vec(value).map(|v| v.len()).unwrap_or(0),
        }
    }
}

impl From<Vec<u8>> for Payload {
    fn from(data: Vec<u8>) -> Self {
        Self::Bytes(data)
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}
