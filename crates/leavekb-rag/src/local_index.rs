//! Local vector index: in-memory, optionally persisted as storage generations

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::Mutex;
use tracing::{debug, info};

use leavekb_core::{Error, IndexEntry, IndexHit, MetadataFilter, Result, VectorIndex};

use crate::storage::{self, PersistedIndex};

/// Cosine distance (`1 - cosine similarity`), never negative.
///
/// Zero vectors and mismatched lengths are treated as unrelated (distance 1).
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 1.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }

    (1.0 - dot_product / (norm_a * norm_b)).max(0.0)
}

struct State {
    entries: Vec<IndexEntry>,
    generation: Option<PathBuf>,
}

/// Local vector index
///
/// Readers only take the state lock. Writers additionally hold `writer` for
/// the whole mutation, so the disk write happens outside the state lock and
/// concurrent writers cannot interleave.
pub struct LocalVectorIndex {
    name: String,
    root: Option<PathBuf>,
    state: RwLock<State>,
    writer: Mutex<()>,
}

impl LocalVectorIndex {
    fn with_state(name: String, root: Option<PathBuf>, state: State) -> Self {
        Self {
            name,
            root,
            state: RwLock::new(state),
            writer: Mutex::new(()),
        }
    }

    /// Create an index that lives only in memory
    pub fn in_memory(name: impl Into<String>) -> Self {
        Self::with_state(
            name.into(),
            None,
            State {
                entries: Vec::new(),
                generation: None,
            },
        )
    }

    /// Open the index persisted under `root`.
    ///
    /// Stray generations are reclaimed first; the surviving one (if any) is
    /// loaded.
    pub fn open(name: impl Into<String>, root: impl AsRef<Path>) -> Result<Self> {
        let name = name.into();
        let root = root.as_ref().to_path_buf();

        let (entries, generation) = match storage::reclaim_generations(&root)? {
            Some((path, persisted)) => {
                if persisted.collection != name {
                    return Err(Error::VectorIndex(format!(
                        "Generation {} belongs to collection '{}', expected '{}'",
                        path.display(),
                        persisted.collection,
                        name
                    )));
                }
                (persisted.entries, Some(path))
            }
            None => (Vec::new(), None),
        };

        info!(
            collection = %name,
            documents = entries.len(),
            root = %root.display(),
            "Opened local vector index"
        );

        Ok(Self::with_state(
            name,
            Some(root),
            State {
                entries,
                generation,
            },
        ))
    }

    /// Live generation directory, if the index is persisted and non-fresh
    pub fn generation(&self) -> Option<PathBuf> {
        self.read().ok().and_then(|state| state.generation.clone())
    }

    /// Write the current state to disk (no-op for in-memory indexes)
    pub async fn flush(&self) -> Result<()> {
        let _writer = self.writer.lock().await;
        let (entries, generation) = {
            let state = self.read()?;
            (state.entries.clone(), state.generation.clone())
        };

        let generation = self.persist(entries, generation).await?;
        self.write()?.generation = generation;
        Ok(())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, State>> {
        self.state
            .read()
            .map_err(|e| Error::VectorIndex(format!("Lock error: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, State>> {
        self.state
            .write()
            .map_err(|e| Error::VectorIndex(format!("Lock error: {}", e)))
    }

    fn snapshot(&self, entries: Vec<IndexEntry>) -> PersistedIndex {
        PersistedIndex {
            collection: self.name.clone(),
            entries,
        }
    }

    /// Write `entries` into `generation` (a new one if `None`) and return the
    /// generation written. In-memory indexes write nothing.
    async fn persist(
        &self,
        entries: Vec<IndexEntry>,
        generation: Option<PathBuf>,
    ) -> Result<Option<PathBuf>> {
        let Some(root) = &self.root else {
            return Ok(None);
        };

        let generation = generation.unwrap_or_else(|| storage::new_generation_path(root));
        storage::write_generation(&generation, &self.snapshot(entries)).await?;
        Ok(Some(generation))
    }

    /// Swap in `entries` as a new generation; the old one is retired only
    /// after the new one is fully written.
    async fn swap(&self, entries: Vec<IndexEntry>) -> Result<()> {
        let _writer = self.writer.lock().await;

        let new_generation = match &self.root {
            Some(root) => {
                let path = storage::new_generation_path(root);
                let snapshot = self.snapshot(entries.clone());
                if let Err(e) = storage::write_generation(&path, &snapshot).await {
                    storage::retire_generation(&path).await;
                    return Err(e);
                }
                Some(path)
            }
            None => None,
        };

        let retired = {
            let mut state = self.write()?;
            state.entries = entries;
            std::mem::replace(&mut state.generation, new_generation)
        };

        if let Some(old) = retired {
            storage::retire_generation(&old).await;
        }
        Ok(())
    }
}

fn merge(entries: &mut Vec<IndexEntry>, incoming: Vec<IndexEntry>) {
    for entry in incoming {
        match entries.iter_mut().find(|existing| existing.id == entry.id) {
            Some(existing) => *existing = entry,
            None => entries.push(entry),
        }
    }
}

#[async_trait]
impl VectorIndex for LocalVectorIndex {
    fn name(&self) -> &str {
        &self.name
    }

    async fn upsert(&self, entries: Vec<IndexEntry>) -> Result<()> {
        let _writer = self.writer.lock().await;
        let (mut merged, generation) = {
            let state = self.read()?;
            (state.entries.clone(), state.generation.clone())
        };
        merge(&mut merged, entries);

        // Nothing changes in memory unless the write succeeded
        let generation = self.persist(merged.clone(), generation).await?;
        let documents = merged.len();
        {
            let mut state = self.write()?;
            state.entries = merged;
            state.generation = generation;
        }

        debug!(collection = %self.name, documents, "Upserted entries");
        Ok(())
    }

    async fn query(
        &self,
        vector: &[f32],
        k: usize,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<IndexHit>> {
        let state = self.read()?;

        if let Some(stored) = state.entries.first() {
            if stored.vector.len() != vector.len() {
                return Err(Error::VectorIndex(format!(
                    "Query vector has dimension {}, index holds dimension {}",
                    vector.len(),
                    stored.vector.len()
                )));
            }
        }

        let mut hits: Vec<IndexHit> = state
            .entries
            .iter()
            .filter(|entry| filter.is_none_or(|f| f.matches(&entry.metadata)))
            .map(|entry| IndexHit {
                id: entry.id.clone(),
                document: entry.document.clone(),
                metadata: entry.metadata.clone(),
                distance: cosine_distance(vector, &entry.vector),
            })
            .collect();

        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits.truncate(k);
        Ok(hits)
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.read()?.entries.len())
    }

    async fn reset(&self) -> Result<()> {
        info!(collection = %self.name, "Resetting collection");
        self.swap(Vec::new()).await
    }

    async fn replace_all(&self, entries: Vec<IndexEntry>) -> Result<()> {
        let mut fresh = Vec::with_capacity(entries.len());
        merge(&mut fresh, entries);
        info!(collection = %self.name, documents = fresh.len(), "Replacing collection");
        self.swap(fresh).await
    }
}
