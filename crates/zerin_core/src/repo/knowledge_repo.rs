//! Knowledge source collection persistence.
//!
//! # Responsibility
//! - Provide CRUD over the registered knowledge sources.
//! - Serve the demonstration sources when storage has never been written.
//!
//! # Invariants
//! - The demo sources are returned, not persisted; the first real write
//!   materializes whatever `list()` returned at that point.
//! - `update` on an unknown id is a no-op. The knowledge service relies on
//!   this as the guard for deferred completions racing a delete.

use crate::model::knowledge::{KnowledgePatch, KnowledgeSource, SourceKind, SourceStatus};
use crate::repo::kv::{keys, read_json, write_json, KvStore, StoreResult};

/// Persistent collection of knowledge sources.
pub struct KnowledgeBase<'a, S: KvStore> {
    kv: &'a S,
}

impl<'a, S: KvStore> KnowledgeBase<'a, S> {
    pub fn new(kv: &'a S) -> Self {
        Self { kv }
    }

    /// Returns all sources, or the demonstration pair when storage is empty.
    pub fn list(&self) -> StoreResult<Vec<KnowledgeSource>> {
        match read_json(self.kv, keys::KNOWLEDGE)? {
            Some(sources) => Ok(sources),
            None => Ok(demo_sources()),
        }
    }

    /// Replaces the whole persisted collection.
    pub fn save_all(&self, sources: &[KnowledgeSource]) -> StoreResult<()> {
        write_json(self.kv, keys::KNOWLEDGE, &sources)
    }

    /// Appends one source and persists the collection.
    pub fn insert(&self, source: KnowledgeSource) -> StoreResult<()> {
        let mut sources = self.list()?;
        sources.push(source);
        self.save_all(&sources)
    }

    /// Merges `patch` into the source with `id`.
    ///
    /// Returns whether a source matched; unknown ids leave storage untouched.
    pub fn update(&self, id: &str, patch: &KnowledgePatch) -> StoreResult<bool> {
        let mut sources = self.list()?;
        let Some(source) = sources.iter_mut().find(|source| source.id == id) else {
            return Ok(false);
        };
        patch.apply(source);
        self.save_all(&sources)?;
        Ok(true)
    }

    /// Removes the source with `id` regardless of its status.
    pub fn delete(&self, id: &str) -> StoreResult<()> {
        let mut sources = self.list()?;
        sources.retain(|source| source.id != id);
        self.save_all(&sources)
    }
}

fn demo_sources() -> Vec<KnowledgeSource> {
    vec![
        KnowledgeSource {
            id: "1".to_string(),
            name: "Zerin Protocol Alpha".to_string(),
            kind: SourceKind::Pdf,
            link: "https://cdn.zerin.ai/docs/alpha.pdf".to_string(),
            status: SourceStatus::Indexed,
            last_updated: "2023-10-27".to_string(),
            size: None,
        },
        KnowledgeSource {
            id: "2".to_string(),
            name: "Global Population Metrics".to_string(),
            kind: SourceKind::GoogleSheets,
            link: "https://docs.google.com/spreadsheets/d/1...".to_string(),
            status: SourceStatus::Synced,
            last_updated: "2023-10-28".to_string(),
            size: None,
        },
    ]
}
