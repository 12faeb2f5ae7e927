//! Knowledge source domain model.
//!
//! # Responsibility
//! - Define registered retrieval sources and their indexing lifecycle states.
//!
//! # Invariants
//! - A source is created in `Indexing` status and only leaves it through the
//!   deferred completion applied by the knowledge service, or a `Failed`
//!   mark.

use serde::{Deserialize, Serialize};

/// Media kind of a registered knowledge source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceKind {
    #[default]
    #[serde(rename = "PDF")]
    Pdf,
    #[serde(rename = "E-BOOK")]
    EBook,
    #[serde(rename = "WEBSITE")]
    Website,
    #[serde(rename = "GOOGLE DRIVE")]
    GoogleDrive,
    #[serde(rename = "GOOGLE SHEETS")]
    GoogleSheets,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "PDF",
            Self::EBook => "E-BOOK",
            Self::Website => "WEBSITE",
            Self::GoogleDrive => "GOOGLE DRIVE",
            Self::GoogleSheets => "GOOGLE SHEETS",
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Indexing lifecycle state of a knowledge source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SourceStatus {
    Indexing,
    Indexed,
    Synced,
    Failed,
}

impl SourceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Indexing => "INDEXING",
            Self::Indexed => "INDEXED",
            Self::Synced => "SYNCED",
            Self::Failed => "FAILED",
        }
    }
}

impl std::fmt::Display for SourceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A document or reference registered for the assistant's retrieval context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeSource {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: SourceKind,
    pub link: String,
    pub status: SourceStatus,
    /// Calendar date (`YYYY-MM-DD`) of the last status change.
    #[serde(rename = "lastUpdated")]
    pub last_updated: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

/// Draft input for registering a new knowledge source.
///
/// `name` and `link` are required; the service rejects empty values before
/// anything is persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnowledgeDraft {
    pub name: String,
    pub kind: SourceKind,
    pub link: String,
}

/// Field-by-field partial update for a knowledge source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnowledgePatch {
    pub name: Option<String>,
    pub kind: Option<SourceKind>,
    pub link: Option<String>,
    pub status: Option<SourceStatus>,
    pub last_updated: Option<String>,
    pub size: Option<String>,
}

impl KnowledgePatch {
    /// Applies every present field onto `source`.
    pub fn apply(&self, source: &mut KnowledgeSource) {
        if let Some(name) = &self.name {
            source.name = name.clone();
        }
        if let Some(kind) = self.kind {
            source.kind = kind;
        }
        if let Some(link) = &self.link {
            source.link = link.clone();
        }
        if let Some(status) = self.status {
            source.status = status;
        }
        if let Some(last_updated) = &self.last_updated {
            source.last_updated = last_updated.clone();
        }
        if let Some(size) = &self.size {
            source.size = Some(size.clone());
        }
    }

    /// Convenience patch marking a status transition on `date`.
    pub fn status_on(status: SourceStatus, date: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            last_updated: Some(date.into()),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{KnowledgeSource, SourceKind, SourceStatus};

    #[test]
    fn source_json_keeps_external_field_names() {
        let source = KnowledgeSource {
            id: "1".to_string(),
            name: "Handbook".to_string(),
            kind: SourceKind::GoogleSheets,
            link: "https://example.com".to_string(),
            status: SourceStatus::Indexing,
            last_updated: "2024-01-01".to_string(),
            size: None,
        };
        let json = serde_json::to_string(&source).unwrap();
        assert!(json.contains("\"type\":\"GOOGLE SHEETS\""));
        assert!(json.contains("\"status\":\"INDEXING\""));
        assert!(json.contains("\"lastUpdated\":\"2024-01-01\""));
        assert!(!json.contains("\"size\""));
    }
}
