//! External collaborator seams: speech sink and language-model boundary.
//!
//! # Responsibility
//! - Define the interfaces the core consumes from its host: a
//!   fire-and-forget announcement sink and the remote language-model query
//!   service.
//!
//! # Invariants
//! - `AssistantBrain::query` never fails: implementations recover internally
//!   and return a user-legible fallback string instead.
//! - `Announcer::announce` returns nothing; the core never depends on its
//!   outcome.

/// Fallback reply implementations should return when the remote model is
/// unreachable or errors out.
pub const QUERY_FALLBACK: &str =
    "I am having temporary trouble analyzing that. Please check the connection and try again.";

/// Speech/notification sink. Fire-and-forget; no return value is consumed.
pub trait Announcer {
    fn announce(&self, text: &str);
}

/// Announcer that discards everything. Default for headless use.
#[derive(Debug, Default)]
pub struct NullAnnouncer;

impl Announcer for NullAnnouncer {
    fn announce(&self, _text: &str) {}
}

/// One query to the remote language model.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrainRequest {
    /// The user's command text.
    pub prompt: String,
    /// Labels of objects currently detected by the host's vision loop.
    pub context_labels: Vec<String>,
    /// Optional base64 image attachment.
    pub image_data: Option<String>,
    /// Optional persona system instruction overriding the model default.
    pub system_instruction: Option<String>,
}

/// Remote language-model query service.
pub trait AssistantBrain {
    /// Returns the model's reply text, or a fallback string on any failure.
    fn query(&self, request: &BrainRequest) -> String;
}

/// Brain that always answers with the fallback string. Used when no remote
/// model is wired up.
#[derive(Debug, Default)]
pub struct OfflineBrain;

impl AssistantBrain for OfflineBrain {
    fn query(&self, _request: &BrainRequest) -> String {
        QUERY_FALLBACK.to_string()
    }
}

/// Builds the visual-context sentence prepended to the system instruction
/// when the host's vision loop is reporting detections.
pub fn visual_context_sentence(labels: &[String]) -> Option<String> {
    if labels.is_empty() {
        return None;
    }
    Some(format!(
        "Visual sensors are active. Currently detecting: {}.",
        labels.join(", ")
    ))
}
