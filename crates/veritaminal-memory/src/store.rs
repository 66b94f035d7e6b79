//! JSON save files on disk.
//!
//! `SaveStore` owns a directory (`saves/` by default) and persists one
//! `SaveGame` per file. Loading re-verifies the hash chain, so a save file
//! edited by hand is rejected with `TamperDetected` rather than silently
//! resuming a falsified career.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use veritaminal_contracts::error::{GameResult, VeritaminalError};

use crate::log::MemoryLog;

/// Save format version written into every file.
///
/// Bumped when the on-disk schema changes shape; `load` rejects files from
/// other versions instead of guessing at their layout.
pub const SAVE_VERSION: u32 = 1;

/// The top-level structure of a save file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveGame {
    /// Schema version, currently [`SAVE_VERSION`].
    pub version: u32,

    /// Wall-clock time (UTC) the save was written.
    pub saved_at: DateTime<Utc>,

    /// The full career memory being persisted.
    pub career: MemoryLog,
}

/// A directory entry describing one save file, as shown in the load menu.
#[derive(Debug, Clone)]
pub struct SaveEntry {
    /// Full path to the save file.
    pub path: PathBuf,

    /// Border the career is served at.
    pub border_id: String,

    /// Career day the save was taken on.
    pub day: u32,

    /// Score at save time.
    pub score: u32,

    /// When the save was written.
    pub saved_at: DateTime<Utc>,
}

/// Reads and writes save files under a single directory.
#[derive(Debug, Clone)]
pub struct SaveStore {
    dir: PathBuf,
}

impl SaveStore {
    /// A store rooted at `dir`. The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The directory this store reads and writes.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The path a save of `log` would be written to.
    ///
    /// One file per border and day: saving twice on the same day overwrites,
    /// which keeps the directory to at most one entry per checkpoint.
    pub fn save_path(&self, log: &MemoryLog) -> PathBuf {
        self.dir
            .join(format!("{}_day{:02}.json", log.border_id, log.story.day))
    }

    /// Write `log` to disk and return the path written.
    ///
    /// Returns `VeritaminalError::SaveIo` if the directory cannot be created
    /// or the file cannot be written.
    pub fn save(&self, log: &MemoryLog) -> GameResult<PathBuf> {
        fs::create_dir_all(&self.dir).map_err(|e| VeritaminalError::SaveIo {
            reason: format!("failed to create save directory '{}': {}", self.dir.display(), e),
        })?;

        let save = SaveGame {
            version: SAVE_VERSION,
            saved_at: Utc::now(),
            career: log.clone(),
        };

        let json = serde_json::to_string_pretty(&save).map_err(|e| VeritaminalError::SaveIo {
            reason: format!("failed to serialize save: {}", e),
        })?;

        let path = self.save_path(log);
        fs::write(&path, json).map_err(|e| VeritaminalError::SaveIo {
            reason: format!("failed to write save file '{}': {}", path.display(), e),
        })?;

        info!(
            path = %path.display(),
            border = %log.border_id,
            day = log.story.day,
            "career saved"
        );

        Ok(path)
    }

    /// Load and validate the save file at `path`.
    ///
    /// Three failure classes, in the order they are checked:
    ///
    /// - `SaveIo`: the file cannot be read.
    /// - `SaveCorrupt`: the contents are not a save of a supported version.
    /// - `TamperDetected`: the JSON parses but the hash chain does not hold.
    pub fn load(&self, path: &Path) -> GameResult<MemoryLog> {
        let contents = fs::read_to_string(path).map_err(|e| VeritaminalError::SaveIo {
            reason: format!("failed to read save file '{}': {}", path.display(), e),
        })?;

        let save: SaveGame =
            serde_json::from_str(&contents).map_err(|e| VeritaminalError::SaveCorrupt {
                reason: format!("save file '{}' is not valid JSON: {}", path.display(), e),
            })?;

        if save.version != SAVE_VERSION {
            return Err(VeritaminalError::SaveCorrupt {
                reason: format!(
                    "save file '{}' has version {} but this build reads version {}",
                    path.display(),
                    save.version,
                    SAVE_VERSION
                ),
            });
        }

        save.career.verify_integrity()?;

        info!(
            path = %path.display(),
            border = %save.career.border_id,
            day = save.career.story.day,
            travelers = save.career.len(),
            "career loaded"
        );

        Ok(save.career)
    }

    /// List the save files in the store's directory, most recent first.
    ///
    /// A missing directory means no saves exist yet and yields an empty list.
    /// Files that cannot be parsed are skipped with a warning so one corrupt
    /// file does not hide the rest of the menu.
    pub fn list(&self) -> GameResult<Vec<SaveEntry>> {
        let read_dir = match fs::read_dir(&self.dir) {
            Ok(rd) => rd,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(VeritaminalError::SaveIo {
                    reason: format!(
                        "failed to read save directory '{}': {}",
                        self.dir.display(),
                        e
                    ),
                })
            }
        };

        let mut entries = Vec::new();
        for dir_entry in read_dir {
            let dir_entry = dir_entry.map_err(|e| VeritaminalError::SaveIo {
                reason: format!("failed to read save directory entry: {}", e),
            })?;
            let path = dir_entry.path();

            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }

            let save: SaveGame = match fs::read_to_string(&path)
                .map_err(|e| e.to_string())
                .and_then(|s| serde_json::from_str(&s).map_err(|e| e.to_string()))
            {
                Ok(save) => save,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping unreadable save file");
                    continue;
                }
            };

            entries.push(SaveEntry {
                path,
                border_id: save.career.border_id.clone(),
                day: save.career.story.day,
                score: save.career.score,
                saved_at: save.saved_at,
            });
        }

        entries.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));
        Ok(entries)
    }
}

impl Default for SaveStore {
    /// The conventional save location, `saves/` under the working directory.
    fn default() -> Self {
        Self::new("saves")
    }
}
