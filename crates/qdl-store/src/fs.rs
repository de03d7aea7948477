use std::fs;
use std::path::{Path, PathBuf};

use qdl_types::RecordHash;
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};
use crate::record::Record;
use crate::traits::RecordBackend;

/// Filesystem record backend: one JSON unit per content hash.
///
/// Units are written to `<root>/<hash>.json` via a temp-file rename, so a
/// concurrent directory scan only ever sees complete units. On load, every
/// unit's stored hash is checked against a recomputed fingerprint; a
/// mismatch is reported as corruption rather than loaded silently.
pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    /// Open (or create) the unit directory.
    pub fn open(root: &Path) -> StoreResult<Self> {
        fs::create_dir_all(root)?;
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    /// Directory holding the persisted units.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn unit_path(&self, hash: &RecordHash) -> PathBuf {
        self.root.join(format!("{}.json", hash.to_hex()))
    }
}

impl RecordBackend for FsBackend {
    fn persist(&self, record: &Record) -> StoreResult<()> {
        let data = serde_json::to_vec(record)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        let path = self.unit_path(&record.content_hash);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, &data)?;
        fs::rename(&tmp, &path)?;
        debug!(hash = ?record.content_hash, bytes = data.len(), "persisted record unit");
        Ok(())
    }

    fn remove(&self, hash: &RecordHash) -> StoreResult<bool> {
        match fs::remove_file(self.unit_path(hash)) {
            Ok(()) => {
                debug!(?hash, "removed record unit");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn load_all(&self) -> StoreResult<Vec<Record>> {
        let mut records = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().map(|e| e == "json").unwrap_or(false) {
                let data = fs::read(&path)?;
                let record: Record = serde_json::from_slice(&data)
                    .map_err(|e| StoreError::Serialization(e.to_string()))?;
                // The file name is the hash; a misnamed unit is as suspect
                // as a tampered one.
                let named = path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .and_then(|s| RecordHash::from_hex(s).ok());
                if named != Some(record.content_hash) {
                    return Err(StoreError::CorruptRecord {
                        hash: record.content_hash,
                        reason: "unit file name does not match the stored hash".into(),
                    });
                }
                if !record.verify_hash()? {
                    return Err(StoreError::CorruptRecord {
                        hash: record.content_hash,
                        reason: "stored hash does not match recomputed fingerprint".into(),
                    });
                }
                records.push(record);
            } else if path.extension().map(|e| e == "tmp").unwrap_or(false) {
                // Leftover from an interrupted write; the complete unit, if
                // any, lives under its final name.
                warn!(path = %path.display(), "skipping stale temp unit");
            }
        }
        records.sort_by_key(|r| (r.created_at, r.content_hash));
        Ok(records)
    }
}

impl std::fmt::Debug for FsBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FsBackend").field("root", &self.root).finish()
    }
}
