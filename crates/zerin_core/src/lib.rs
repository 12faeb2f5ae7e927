//! Core state and session model for the Zerin virtual assistant.
//! This crate is the single source of truth for directory, session, record,
//! and configuration invariants; presentation hosts stay thin.

pub mod collab;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use collab::{
    visual_context_sentence, Announcer, AssistantBrain, BrainRequest, NullAnnouncer,
    OfflineBrain, QUERY_FALLBACK,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::knowledge::{
    KnowledgeDraft, KnowledgePatch, KnowledgeSource, SourceKind, SourceStatus,
};
pub use model::persona::{
    AvatarMediaConfig, AvatarMediaPatch, PersonaConfig, PersonaPatch,
};
pub use model::record::{EventDraft, EventEntry, Note, NoteDraft, Task, TaskDraft};
pub use model::user::{NewUser, Tier, User, UserPatch, UserStatus};
pub use repo::knowledge_repo::KnowledgeBase;
pub use repo::kv::{KvStore, MemoryKvStore, SqliteKvStore, StoreError, StoreResult};
pub use repo::persona_repo::{AvatarMediaStore, PersonaStore};
pub use repo::record_repo::{
    meeting_store, note_store, schedule_store, task_store, RecordEntry, RecordStore,
};
pub use repo::user_repo::UserDirectory;
pub use service::knowledge::{KnowledgeError, KnowledgeService, DEFAULT_INDEXING_DELAY};
pub use service::session::{
    EnrollmentForm, LoginMethod, Panel, RegistrationForm, SessionError, SessionManager,
    SessionState,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
