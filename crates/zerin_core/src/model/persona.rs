//! Persona and avatar media configuration models.
//!
//! # Responsibility
//! - Define the mutable assistant configuration bundles and their patch
//!   types.
//!
//! # Invariants
//! - Each config is persisted as one whole object per save, never a diff.

use serde::{Deserialize, Serialize};

/// Default system instruction shipped with the assistant. Kept verbatim from
/// the original deployment because it is persisted product data.
pub const DEFAULT_SYSTEM_INSTRUCTION: &str = "You are Zerin, a highly intelligent and professional virtual assistant. \nPersonality: Courteous, futuristic, and efficient. \nMANDATORY RULE: Never use the word \"নমস্কার\" (Namaskar). Instead, use \"Hello sir\" or \"আসসালামু আলাইকুম\" where appropriate.\nConstraint: Keep responses concise and meaningful.";

/// The assistant's configurable identity bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaConfig {
    pub name: String,
    pub tone: String,
    pub language: String,
    #[serde(rename = "systemInstruction")]
    pub system_instruction: String,
}

impl Default for PersonaConfig {
    fn default() -> Self {
        Self {
            name: "ZERIN".to_string(),
            tone: "PROFESSIONAL".to_string(),
            language: "BENGALI".to_string(),
            system_instruction: DEFAULT_SYSTEM_INSTRUCTION.to_string(),
        }
    }
}

/// Field-by-field partial update for the persona config.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonaPatch {
    pub name: Option<String>,
    pub tone: Option<String>,
    pub language: Option<String>,
    pub system_instruction: Option<String>,
}

impl PersonaPatch {
    /// Applies every present field onto `config`.
    pub fn apply(&self, config: &mut PersonaConfig) {
        if let Some(name) = &self.name {
            config.name = name.clone();
        }
        if let Some(tone) = &self.tone {
            config.tone = tone.clone();
        }
        if let Some(language) = &self.language {
            config.language = language.clone();
        }
        if let Some(system_instruction) = &self.system_instruction {
            config.system_instruction = system_instruction.clone();
        }
    }
}

/// Media references backing the avatar's three animation states.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvatarMediaConfig {
    pub silent: String,
    pub think: String,
    pub speak: String,
}

impl Default for AvatarMediaConfig {
    fn default() -> Self {
        Self {
            silent: "assets/silent.mp4#t=1".to_string(),
            think: "assets/think.mp4".to_string(),
            speak: "assets/speak.mp4".to_string(),
        }
    }
}

/// Field-by-field partial update for the avatar media config.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvatarMediaPatch {
    pub silent: Option<String>,
    pub think: Option<String>,
    pub speak: Option<String>,
}

impl AvatarMediaPatch {
    /// Applies every present field onto `config`.
    pub fn apply(&self, config: &mut AvatarMediaConfig) {
        if let Some(silent) = &self.silent {
            config.silent = silent.clone();
        }
        if let Some(think) = &self.think {
            config.think = think.clone();
        }
        if let Some(speak) = &self.speak {
            config.speak = speak.clone();
        }
    }
}
