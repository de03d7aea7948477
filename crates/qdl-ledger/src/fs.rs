use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::block::Block;
use crate::error::{LedgerError, LedgerResult};
use crate::traits::BlockBackend;

/// Filesystem block backend: one JSON unit per sealed block.
///
/// Units are written to `<root>/<block_hash>.json` via a temp-file rename.
/// On load, each unit's stored hash is checked against a recomputed one; a
/// mismatch is reported as corruption, not loaded silently.
pub struct FsBlockBackend {
    root: PathBuf,
}

impl FsBlockBackend {
    /// Open (or create) the block directory.
    pub fn open(root: &Path) -> LedgerResult<Self> {
        fs::create_dir_all(root)?;
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    /// Directory holding the persisted blocks.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn unit_path(&self, block: &Block) -> PathBuf {
        self.root.join(format!("{}.json", block.block_hash.to_hex()))
    }
}

impl BlockBackend for FsBlockBackend {
    fn persist(&self, block: &Block) -> LedgerResult<()> {
        let data = serde_json::to_vec(block)
            .map_err(|e| LedgerError::Serialization(e.to_string()))?;
        let path = self.unit_path(block);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, &data)?;
        fs::rename(&tmp, &path)?;
        debug!(
            height = block.height,
            hash = ?block.block_hash,
            "persisted block unit"
        );
        Ok(())
    }

    fn load_all(&self) -> LedgerResult<Vec<Block>> {
        let mut blocks = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if !path.extension().map(|e| e == "json").unwrap_or(false) {
                continue;
            }
            let data = fs::read(&path)?;
            let block: Block = serde_json::from_slice(&data)
                .map_err(|e| LedgerError::Serialization(e.to_string()))?;
            if !block.verify_hash() {
                return Err(LedgerError::CorruptBlock {
                    height: block.height,
                    reason: "stored hash does not match recomputed hash".into(),
                });
            }
            blocks.push(block);
        }
        blocks.sort_by_key(|b| b.height);
        Ok(blocks)
    }
}

impl std::fmt::Debug for FsBlockBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FsBlockBackend")
            .field("root", &self.root)
            .finish()
    }
}
