use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{DraftConfig, DraftFormat, CHECKPOINT_VERSION};
use crate::draft_order::DraftOrder;
use crate::engine::DraftState;
use crate::error::{DraftError, Result};
use crate::keepers::KeeperSet;

/// The durable snapshot written after every committed pick.
///
/// `state` holds the *next* pick to make, so a resumed draft continues from
/// the turn after the last one committed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftCheckpoint {
    pub version: u32,
    pub format: DraftFormat,
    pub year: i32,
    pub state: DraftState,
}

impl DraftCheckpoint {
    pub fn new(format: DraftFormat, year: i32, state: DraftState) -> Self {
        Self {
            version: CHECKPOINT_VERSION,
            format,
            year,
            state,
        }
    }
}

/// Per-year JSON files for keepers, draft order and the pick checkpoint.
#[derive(Debug, Clone)]
pub struct CheckpointStore {
    dir: PathBuf,
    format: DraftFormat,
    year: i32,
}

impl CheckpointStore {
    pub fn new(config: &DraftConfig) -> Self {
        Self {
            dir: config.year_dir(),
            format: config.format,
            year: config.year,
        }
    }

    fn keepers_path(&self) -> PathBuf {
        self.dir.join("keepers.json")
    }

    fn draft_order_path(&self) -> PathBuf {
        self.dir.join("draft_order.json")
    }

    fn checkpoint_path(&self) -> PathBuf {
        self.dir.join("draft_params.json")
    }

    pub fn load_keepers(&self) -> Result<Option<KeeperSet>> {
        load_json(&self.keepers_path())
    }

    pub fn save_keepers(&self, keepers: &KeeperSet) -> Result<()> {
        save_json(&self.keepers_path(), keepers)
    }

    pub fn load_draft_order(&self) -> Result<Option<DraftOrder>> {
        load_json(&self.draft_order_path())
    }

    pub fn save_draft_order(&self, order: &DraftOrder) -> Result<()> {
        save_json(&self.draft_order_path(), order)
    }

    pub fn has_checkpoint(&self) -> bool {
        self.checkpoint_path().exists()
    }

    /// Loads the checkpoint, refusing one written by another version or format.
    pub fn load_checkpoint(&self) -> Result<Option<DraftCheckpoint>> {
        let Some(checkpoint) = load_json::<DraftCheckpoint>(&self.checkpoint_path())? else {
            return Ok(None);
        };
        if checkpoint.version != CHECKPOINT_VERSION {
            return Err(DraftError::CheckpointVersion(checkpoint.version));
        }
        if checkpoint.format != self.format {
            return Err(DraftError::Config(format!(
                "the {} checkpoint was written by a {} draft",
                checkpoint.year, checkpoint.format
            )));
        }
        Ok(Some(checkpoint))
    }

    pub fn save_checkpoint(&self, state: &DraftState) -> Result<()> {
        let checkpoint = DraftCheckpoint::new(self.format, self.year, state.clone());
        save_json(&self.checkpoint_path(), &checkpoint)?;
        debug!(next_pick = state.next_pick, round = state.round, "Checkpoint written");
        Ok(())
    }
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Writes to a sibling temp file and renames it into place, so a crash leaves
/// either the old file or the new one.
fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let content = serde_json::to_vec_pretty(value)?;
    let temp_path = path.with_extension("json.tmp");

    let persist = |target: &Path| -> io::Result<()> {
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(&content)?;
        file.sync_all()?;
        drop(file);
        match fs::rename(&temp_path, target) {
            Ok(()) => Ok(()),
            Err(e) => {
                let _ = fs::remove_file(&temp_path);
                Err(e)
            }
        }
    };

    persist(path).map_err(|source| DraftError::Persistence {
        path: path.to_path_buf(),
        source,
    })
}
