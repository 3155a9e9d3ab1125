//! On-disk layout of the local vector index.
//!
//! The storage path holds generation directories named by UUID, each with a
//! complete `index.json`. Exactly one generation is live at a time; a full
//! replace writes a fresh generation and removes the old one once the new one
//! is on disk.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, info, warn};
use uuid::Uuid;

use leavekb_core::{Error, IndexEntry, Result};

pub const INDEX_FILE: &str = "index.json";

const UUID_LEN: usize = 36;

/// Serialized form of one generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedIndex {
    pub collection: String,
    pub entries: Vec<IndexEntry>,
}

#[derive(Debug)]
struct Generation {
    path: PathBuf,
    modified: SystemTime,
    has_index: bool,
}

fn is_generation_name(name: &str) -> bool {
    name.len() == UUID_LEN && Uuid::parse_str(name).is_ok()
}

fn list_generations(root: &Path) -> Result<Vec<Generation>> {
    let mut generations = Vec::new();

    for item in fs::read_dir(root)? {
        let item = item?;
        let path = item.path();
        let name = item.file_name();

        if !path.is_dir() || !is_generation_name(&name.to_string_lossy()) {
            continue;
        }

        let index_file = path.join(INDEX_FILE);
        let has_index = index_file.is_file();
        let modified = fs::metadata(if has_index { &index_file } else { &path })
            .and_then(|m| m.modified())
            .unwrap_or(SystemTime::UNIX_EPOCH);

        generations.push(Generation {
            path,
            modified,
            has_index,
        });
    }

    Ok(generations)
}

/// Remove stray generations under `root`, keeping at most one.
///
/// Generations are tried newest first; the first whose index file parses
/// survives and every other generation is removed. Returns the survivor
/// together with its contents.
pub fn reclaim_generations(root: &Path) -> Result<Option<(PathBuf, PersistedIndex)>> {
    fs::create_dir_all(root)?;

    let mut generations = list_generations(root)?;
    if generations.is_empty() {
        return Ok(None);
    }

    generations.sort_by(|a, b| b.modified.cmp(&a.modified));

    let mut survivor = None;
    for (i, generation) in generations.iter().enumerate() {
        if !generation.has_index {
            continue;
        }
        match read_generation(&generation.path) {
            Ok(index) => {
                survivor = Some((i, index));
                break;
            }
            Err(e) => warn!(
                path = %generation.path.display(),
                error = %e,
                "Skipping unreadable generation"
            ),
        }
    }
    let keep = survivor.map(|(i, index)| (generations.remove(i).path, index));

    if !generations.is_empty() {
        info!(
            stale = generations.len(),
            root = %root.display(),
            "Reclaiming stale index generations"
        );
    }

    for stale in &generations {
        if let Err(e) = fs::remove_dir_all(&stale.path) {
            warn!(path = %stale.path.display(), error = %e, "Failed to remove stale generation");
        }
    }

    Ok(keep)
}

/// Path for a brand-new generation under `root` (not yet created)
pub fn new_generation_path(root: &Path) -> PathBuf {
    root.join(Uuid::new_v4().to_string())
}

/// Read a generation's index file
pub fn read_generation(generation: &Path) -> Result<PersistedIndex> {
    let content = fs::read_to_string(generation.join(INDEX_FILE))?;
    serde_json::from_str(&content).map_err(|e| {
        Error::VectorIndex(format!("Corrupt index at {}: {}", generation.display(), e))
    })
}

/// Write a generation's index file, creating the directory if needed.
///
/// The file is written next to its final name and renamed into place.
pub async fn write_generation(generation: &Path, index: &PersistedIndex) -> Result<()> {
    let content = serde_json::to_string(index)?;

    tokio::fs::create_dir_all(generation).await?;
    let tmp = generation.join(format!("{}.tmp", INDEX_FILE));
    tokio::fs::write(&tmp, content).await?;
    tokio::fs::rename(&tmp, generation.join(INDEX_FILE)).await?;

    debug!(
        generation = %generation.display(),
        entries = index.entries.len(),
        "Persisted index generation"
    );
    Ok(())
}

/// Remove a retired generation; failures are logged, not returned
pub async fn retire_generation(generation: &Path) {
    if let Err(e) = tokio::fs::remove_dir_all(generation).await {
        warn!(path = %generation.display(), error = %e, "Failed to remove retired generation");
    }
}
