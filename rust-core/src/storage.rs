// Snapshot persistence: whole-ledger JSON image, written atomically (tmp + rename).

use crate::account::{AccountId, AccountRecord};
use crate::config::LedgerConfig;
use crate::timestamps::TimestampEntry;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const SNAPSHOT_FILE: &str = "ledger_snapshot.json";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AccountEntry {
    pub identity: AccountId,
    #[serde(flatten)]
    pub record: AccountRecord,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PersistedSnapshot {
    pub version: u8,
    pub ledger_id: String,
    pub owner: AccountId,
    #[serde(default)]
    pub config: LedgerConfig,
    #[serde(default)]
    pub accounts: Vec<AccountEntry>,
    #[serde(default)]
    pub timestamps: Vec<TimestampEntry>,
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("snapshot json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("snapshot version {found} is not supported (expected {expected})")]
    Version { found: u8, expected: u8 },
    #[error("snapshot is corrupt: {0}")]
    Corrupt(String),
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> StorageError + '_ {
    move |source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    }
}

pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Result<Self, StorageError> {
        let dir = data_dir.as_ref();
        fs::create_dir_all(dir).map_err(io_err(dir))?;
        Ok(Self {
            path: dir.join(SNAPSHOT_FILE),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Option<PersistedSnapshot>, StorageError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let data = fs::read(&self.path).map_err(io_err(&self.path))?;
        let snap = serde_json::from_slice::<PersistedSnapshot>(&data)?;
        Ok(Some(snap))
    }

    pub fn save(&self, snapshot: &PersistedSnapshot) -> Result<(), StorageError> {
        let data = serde_json::to_vec_pretty(snapshot)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, data).map_err(io_err(&tmp_path))?;
        fs::rename(&tmp_path, &self.path).map_err(io_err(&self.path))?;
        Ok(())
    }
}
