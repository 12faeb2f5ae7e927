//! Knowledge indexing lifecycle service.
//!
//! # Responsibility
//! - Validate and register knowledge sources, then complete their simulated
//!   indexing after a configurable delay.
//! - Keep deferred completions cancellable by source id.
//!
//! # Invariants
//! - A source enters storage in `Indexing` status and flips to `Indexed`
//!   only through `poll`.
//! - Deleting a source cancels its pending completion; a completion whose
//!   source was deleted anyway (e.g. through a second service instance)
//!   applies to nothing.
//! - The store stays fully mutable while completions are pending; nothing
//!   here blocks.

use crate::collab::Announcer;
use crate::model::knowledge::{
    KnowledgeDraft, KnowledgePatch, KnowledgeSource, SourceStatus,
};
use crate::repo::knowledge_repo::KnowledgeBase;
use crate::repo::kv::{KvStore, StoreError, StoreResult};
use chrono::Utc;
use log::info;
use std::cell::RefCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Observed indexing delay of the system being replaced.
pub const DEFAULT_INDEXING_DELAY: Duration = Duration::from_secs(3);

/// Knowledge registration failures.
#[derive(Debug)]
pub enum KnowledgeError {
    /// The draft's name was empty.
    MissingName,
    /// The draft's link was empty.
    MissingLink,
    Store(StoreError),
}

impl Display for KnowledgeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingName => write!(f, "a source name must be defined before indexing"),
            Self::MissingLink => write!(f, "a source link must be defined before indexing"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for KnowledgeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for KnowledgeError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

struct PendingCompletion {
    id: String,
    due: Instant,
}

/// Drives the add -> indexing -> indexed lifecycle over a `KnowledgeBase`.
///
/// Deferred completions are held in-process and applied when the host's
/// event loop calls `poll`; there is no background thread.
pub struct KnowledgeService<'a, S: KvStore> {
    base: KnowledgeBase<'a, S>,
    announcer: &'a dyn Announcer,
    delay: Duration,
    pending: RefCell<Vec<PendingCompletion>>,
}

impl<'a, S: KvStore> KnowledgeService<'a, S> {
    pub fn new(kv: &'a S, announcer: &'a dyn Announcer) -> Self {
        Self::with_delay(kv, announcer, DEFAULT_INDEXING_DELAY)
    }

    /// Service with an explicit indexing delay. Tests use short or zero
    /// delays to drive the lifecycle deterministically.
    pub fn with_delay(kv: &'a S, announcer: &'a dyn Announcer, delay: Duration) -> Self {
        Self {
            base: KnowledgeBase::new(kv),
            announcer,
            delay,
            pending: RefCell::new(Vec::new()),
        }
    }

    /// All registered sources.
    pub fn list(&self) -> StoreResult<Vec<KnowledgeSource>> {
        self.base.list()
    }

    /// Number of completions scheduled but not yet applied.
    pub fn pending_completions(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Registers a new source in `Indexing` status and schedules its
    /// completion.
    pub fn add(&self, draft: KnowledgeDraft) -> Result<KnowledgeSource, KnowledgeError> {
        if draft.name.is_empty() {
            return Err(KnowledgeError::MissingName);
        }
        if draft.link.is_empty() {
            return Err(KnowledgeError::MissingLink);
        }

        let source = KnowledgeSource {
            id: Uuid::new_v4().to_string(),
            name: draft.name,
            kind: draft.kind,
            link: draft.link,
            status: SourceStatus::Indexing,
            last_updated: today_stamp(),
            size: None,
        };
        self.base.insert(source.clone())?;

        self.pending.borrow_mut().push(PendingCompletion {
            id: source.id.clone(),
            due: Instant::now() + self.delay,
        });
        info!(
            "event=knowledge_add module=knowledge status=ok source_id={} kind={}",
            source.id, source.kind
        );
        self.announcer.announce(&format!(
            "The {} resource is being assimilated into the knowledge core.",
            source.kind
        ));

        Ok(source)
    }

    /// Deletes a source immediately, whatever its status, and cancels any
    /// pending completion for it.
    pub fn remove(&self, id: &str) -> StoreResult<()> {
        self.base.delete(id)?;
        self.pending.borrow_mut().retain(|pending| pending.id != id);
        info!("event=knowledge_remove module=knowledge status=ok source_id={id}");
        self.announcer
            .announce("The source link has been purged from the knowledge core.");
        Ok(())
    }

    /// Applies every completion due at `now` and returns the ids that were
    /// actually transitioned.
    ///
    /// A due completion whose source no longer exists matches nothing and is
    /// dropped silently.
    pub fn poll(&self, now: Instant) -> StoreResult<Vec<String>> {
        let due: Vec<PendingCompletion> = {
            let mut pending = self.pending.borrow_mut();
            let mut due = Vec::new();
            let mut index = 0;
            while index < pending.len() {
                if pending[index].due <= now {
                    due.push(pending.swap_remove(index));
                } else {
                    index += 1;
                }
            }
            due
        };

        let mut completed = Vec::new();
        for completion in due {
            let applied = self.base.update(
                &completion.id,
                &KnowledgePatch::status_on(SourceStatus::Indexed, today_stamp()),
            )?;
            if applied {
                info!(
                    "event=knowledge_indexed module=knowledge status=ok source_id={}",
                    completion.id
                );
                completed.push(completion.id);
            }
        }

        Ok(completed)
    }

    /// `poll` against the current instant.
    pub fn poll_now(&self) -> StoreResult<Vec<String>> {
        self.poll(Instant::now())
    }

    /// Flips every source back to `Indexing` and schedules re-completion
    /// for all of them.
    pub fn sync_all(&self) -> StoreResult<()> {
        let mut sources = self.base.list()?;
        for source in &mut sources {
            source.status = SourceStatus::Indexing;
        }
        self.base.save_all(&sources)?;

        let due = Instant::now() + self.delay;
        let mut pending = self.pending.borrow_mut();
        pending.clear();
        for source in &sources {
            pending.push(PendingCompletion {
                id: source.id.clone(),
                due,
            });
        }
        info!(
            "event=knowledge_sync_all module=knowledge status=ok count={}",
            sources.len()
        );
        Ok(())
    }
}

fn today_stamp() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}
