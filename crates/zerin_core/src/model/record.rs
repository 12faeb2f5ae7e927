//! Personal-productivity record models.
//!
//! # Responsibility
//! - Define the task/schedule/meeting/note record shapes and their draft
//!   inputs.
//!
//! # Invariants
//! - Record ids are unique within their own collection.
//! - Schedule entries and meeting entries share one shape (`EventEntry`) but
//!   live in separate collections.

use serde::{Deserialize, Serialize};

/// Recurring task entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    #[serde(rename = "desc")]
    pub description: String,
    #[serde(rename = "freq")]
    pub frequency: String,
}

/// Draft input for a new task. `description` is required.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub description: String,
    pub frequency: String,
}

/// Calendar entry used by both the schedule and meetings collections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEntry {
    pub id: String,
    pub title: String,
    pub date: String,
    pub time: String,
    pub details: String,
}

/// Draft input for a new schedule/meeting entry. `title` is required.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventDraft {
    pub title: String,
    pub date: String,
    pub time: String,
    pub details: String,
}

/// Free-form note entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub title: String,
    pub content: String,
}

/// Draft input for a new note. `title` is required.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
}
