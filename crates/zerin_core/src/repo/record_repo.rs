//! Personal record stores: tasks, schedule, meetings, notes.
//!
//! # Responsibility
//! - Provide the uniform add/list/remove contract shared by all four record
//!   collections.
//!
//! # Invariants
//! - No update-in-place operation exists; records are added and removed
//!   only.
//! - `add` silently rejects drafts whose required field is empty; the
//!   collection is left untouched and no id is consumed from storage.
//! - Issued ids are strictly increasing within one store instance, derived
//!   from the wall clock with a tie-break for same-millisecond inserts.

use crate::model::record::{EventDraft, EventEntry, Note, NoteDraft, Task, TaskDraft};
use crate::repo::kv::{keys, read_json, write_json, KvStore, StoreResult};
use log::info;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::Cell;
use std::marker::PhantomData;
use std::time::{SystemTime, UNIX_EPOCH};

/// A record shape storable in a `RecordStore`.
pub trait RecordEntry: Serialize + DeserializeOwned + Clone {
    type Draft;

    /// Builds a record from a draft, or `None` when the draft's required
    /// field is empty.
    fn from_draft(id: String, draft: Self::Draft) -> Option<Self>;

    fn id(&self) -> &str;
}

impl RecordEntry for Task {
    type Draft = TaskDraft;

    fn from_draft(id: String, draft: TaskDraft) -> Option<Self> {
        if draft.description.is_empty() {
            return None;
        }
        Some(Self {
            id,
            description: draft.description,
            frequency: draft.frequency,
        })
    }

    fn id(&self) -> &str {
        &self.id
    }
}

impl RecordEntry for EventEntry {
    type Draft = EventDraft;

    fn from_draft(id: String, draft: EventDraft) -> Option<Self> {
        if draft.title.is_empty() {
            return None;
        }
        Some(Self {
            id,
            title: draft.title,
            date: draft.date,
            time: draft.time,
            details: draft.details,
        })
    }

    fn id(&self) -> &str {
        &self.id
    }
}

impl RecordEntry for Note {
    type Draft = NoteDraft;

    fn from_draft(id: String, draft: NoteDraft) -> Option<Self> {
        if draft.title.is_empty() {
            return None;
        }
        Some(Self {
            id,
            title: draft.title,
            content: draft.content,
        })
    }

    fn id(&self) -> &str {
        &self.id
    }
}

/// One durable record collection with add/list/remove semantics.
pub struct RecordStore<'a, S: KvStore, T: RecordEntry> {
    kv: &'a S,
    key: &'static str,
    label: &'static str,
    last_issued_id: Cell<u64>,
    _entry: PhantomData<T>,
}

/// The daily-tasks collection.
pub fn task_store<S: KvStore>(kv: &S) -> RecordStore<'_, S, Task> {
    RecordStore::new(kv, keys::TASKS, "task")
}

/// The schedule collection.
pub fn schedule_store<S: KvStore>(kv: &S) -> RecordStore<'_, S, EventEntry> {
    RecordStore::new(kv, keys::SCHEDULE, "schedule")
}

/// The meetings collection. Same shape as the schedule, separate storage.
pub fn meeting_store<S: KvStore>(kv: &S) -> RecordStore<'_, S, EventEntry> {
    RecordStore::new(kv, keys::MEETINGS, "meeting")
}

/// The daily-notes collection.
pub fn note_store<S: KvStore>(kv: &S) -> RecordStore<'_, S, Note> {
    RecordStore::new(kv, keys::NOTES, "note")
}

impl<'a, S: KvStore, T: RecordEntry> RecordStore<'a, S, T> {
    fn new(kv: &'a S, key: &'static str, label: &'static str) -> Self {
        Self {
            kv,
            key,
            label,
            last_issued_id: Cell::new(0),
            _entry: PhantomData,
        }
    }

    /// Returns all records in insertion order.
    pub fn list(&self) -> StoreResult<Vec<T>> {
        Ok(read_json(self.kv, self.key)?.unwrap_or_default())
    }

    /// Appends a record built from `draft` and persists the collection.
    ///
    /// Returns `Ok(None)` without touching storage when the draft's required
    /// field is empty; callers treat that as a silent rejection, not an
    /// error.
    pub fn add(&self, draft: T::Draft) -> StoreResult<Option<T>> {
        let Some(record) = T::from_draft(self.next_id(), draft) else {
            info!(
                "event=record_add module=record_repo status=rejected kind={} reason=missing_required_field",
                self.label
            );
            return Ok(None);
        };

        let mut records = self.list()?;
        records.push(record.clone());
        write_json(self.kv, self.key, &records)?;
        info!(
            "event=record_add module=record_repo status=ok kind={} record_id={}",
            self.label,
            record.id()
        );

        Ok(Some(record))
    }

    /// Removes the record with `id` and persists the collection.
    ///
    /// Silent no-op when no record matches.
    pub fn remove(&self, id: &str) -> StoreResult<()> {
        let mut records = self.list()?;
        records.retain(|record| record.id() != id);
        write_json(self.kv, self.key, &records)?;
        info!(
            "event=record_remove module=record_repo status=ok kind={} record_id={id}",
            self.label
        );
        Ok(())
    }

    /// Issues the next record id from the wall clock.
    ///
    /// Two adds within the same millisecond still get distinct, increasing
    /// ids.
    fn next_id(&self) -> String {
        let now_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as u64)
            .unwrap_or(0);
        let issued = now_ms.max(self.last_issued_id.get() + 1);
        self.last_issued_id.set(issued);
        issued.to_string()
    }
}
