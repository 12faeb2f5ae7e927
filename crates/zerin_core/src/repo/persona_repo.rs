//! Persona and avatar media configuration stores.
//!
//! # Responsibility
//! - Hold, merge, and persist the assistant's mutable configuration bundles.
//! - Fire the spoken confirmation exactly once per successful save.
//!
//! # Invariants
//! - Every save persists the entire merged object, not a diff.
//! - The confirmation announcement fires after persistence succeeded, never
//!   on a failed save.

use crate::collab::Announcer;
use crate::model::persona::{
    AvatarMediaConfig, AvatarMediaPatch, PersonaConfig, PersonaPatch,
};
use crate::repo::kv::{keys, read_json, write_json, KvStore, StoreResult};

/// Store for the assistant's identity bundle.
pub struct PersonaStore<'a, S: KvStore> {
    kv: &'a S,
    announcer: &'a dyn Announcer,
}

impl<'a, S: KvStore> PersonaStore<'a, S> {
    pub fn new(kv: &'a S, announcer: &'a dyn Announcer) -> Self {
        Self { kv, announcer }
    }

    /// Returns the persisted persona, or the shipped default when absent.
    pub fn load(&self) -> StoreResult<PersonaConfig> {
        Ok(read_json(self.kv, keys::PERSONA)?.unwrap_or_default())
    }

    /// Merges `patch` into the held persona and persists the whole result.
    pub fn save(&self, patch: &PersonaPatch) -> StoreResult<PersonaConfig> {
        let mut config = self.load()?;
        patch.apply(&mut config);
        write_json(self.kv, keys::PERSONA, &config)?;
        self.announcer.announce(&format!(
            "Identity settings for {} have been committed.",
            config.name
        ));
        Ok(config)
    }
}

/// Store for the avatar's animation media references.
pub struct AvatarMediaStore<'a, S: KvStore> {
    kv: &'a S,
    announcer: &'a dyn Announcer,
}

impl<'a, S: KvStore> AvatarMediaStore<'a, S> {
    pub fn new(kv: &'a S, announcer: &'a dyn Announcer) -> Self {
        Self { kv, announcer }
    }

    /// Returns the persisted media config, or the shipped default when
    /// absent.
    pub fn load(&self) -> StoreResult<AvatarMediaConfig> {
        Ok(read_json(self.kv, keys::AVATAR_MEDIA)?.unwrap_or_default())
    }

    /// Merges `patch` into the held media config and persists the whole
    /// result.
    pub fn save(&self, patch: &AvatarMediaPatch) -> StoreResult<AvatarMediaConfig> {
        let mut config = self.load()?;
        patch.apply(&mut config);
        write_json(self.kv, keys::AVATAR_MEDIA, &config)?;
        self.announcer
            .announce("Avatar media configuration has been updated.");
        Ok(config)
    }
}
