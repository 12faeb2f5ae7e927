//! User directory and session-snapshot persistence.
//!
//! # Responsibility
//! - Own the registered-user collection and the persisted current-session
//!   snapshot.
//! - Enforce the seed-account guarantee and the revocation gate.
//!
//! # Invariants
//! - The seed default user is re-inserted (and persisted) whenever a
//!   directory read finds it missing.
//! - `register` always creates FREE/ACTIVE accounts regardless of input.
//! - The session snapshot is a copy; it drifts from the directory until a
//!   matching `update_user` refreshes it or a new login replaces it.
//! - Duplicate emails are accepted; the directory performs no uniqueness
//!   check on insert.

use crate::model::user::{NewUser, Tier, User, UserPatch, UserStatus};
use crate::repo::kv::{keys, read_json, write_json, KvStore, StoreResult};
use log::info;
use uuid::Uuid;

/// The authoritative collection of registered users, plus the persisted
/// "current user" snapshot that survives process restarts.
pub struct UserDirectory<'a, S: KvStore> {
    kv: &'a S,
}

impl<'a, S: KvStore> UserDirectory<'a, S> {
    pub fn new(kv: &'a S) -> Self {
        Self { kv }
    }

    /// Returns all users in insertion order.
    ///
    /// Guarantees the seed default user is present, appending and persisting
    /// it when absent (matched by email). Works from empty storage.
    pub fn list_users(&self) -> StoreResult<Vec<User>> {
        let mut users: Vec<User> = read_json(self.kv, keys::USERS)?.unwrap_or_default();

        let seed = User::seed_default();
        if !users.iter().any(|user| user.email == seed.email) {
            users.push(seed);
            write_json(self.kv, keys::USERS, &users)?;
            info!("event=seed_user_restored module=user_repo status=ok");
        }

        Ok(users)
    }

    /// Registers a new user and persists the grown directory.
    ///
    /// Assigns a fresh id and forces `tier = FREE`, `status = ACTIVE`
    /// regardless of the caller-supplied values. Does not check email
    /// uniqueness; duplicates are stored as-is.
    pub fn register(&self, input: NewUser) -> StoreResult<User> {
        let mut users = self.list_users()?;

        let user = User {
            id: Uuid::new_v4().to_string(),
            email: input.email,
            password: input.password,
            pin: input.pin,
            mobile: input.mobile,
            profile_pic: input.profile_pic,
            name: input.name,
            tier: Tier::Free,
            status: UserStatus::Active,
        };

        users.push(user.clone());
        write_json(self.kv, keys::USERS, &users)?;
        info!(
            "event=user_registered module=user_repo status=ok user_id={}",
            user.id
        );

        Ok(user)
    }

    /// Attempts a login by email plus either credential.
    ///
    /// Returns `None` when no user matches the email, when the matched user
    /// is revoked, or when neither the password nor the pin matches. Either
    /// credential alone is sufficient; this is dual-credential login, not a
    /// two-factor scheme.
    pub fn login(
        &self,
        email: &str,
        password: Option<&str>,
        pin: Option<&str>,
    ) -> StoreResult<Option<User>> {
        let users = self.list_users()?;
        let Some(user) = users.into_iter().find(|user| user.email == email) else {
            return Ok(None);
        };

        if user.status == UserStatus::Revoked {
            info!(
                "event=login module=user_repo status=denied reason=revoked user_id={}",
                user.id
            );
            return Ok(None);
        }

        let password_ok = password.is_some() && password == user.password.as_deref();
        let pin_ok = matches!(pin, Some(given) if given == user.pin);

        if password_ok || pin_ok {
            info!(
                "event=login module=user_repo status=ok user_id={}",
                user.id
            );
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }

    /// Merges `patch` into the user with `id` and persists the directory.
    ///
    /// Silent no-op when the id is unknown. When the patched user is also
    /// the current session user, the persisted snapshot is refreshed to
    /// match.
    pub fn update_user(&self, id: &str, patch: &UserPatch) -> StoreResult<()> {
        let mut users = self.list_users()?;
        let Some(user) = users.iter_mut().find(|user| user.id == id) else {
            return Ok(());
        };

        patch.apply(user);
        let updated = user.clone();
        write_json(self.kv, keys::USERS, &users)?;

        if let Some(current) = self.current_user()? {
            if current.id == id {
                write_json(self.kv, keys::CURRENT_USER, &updated)?;
            }
        }

        info!(
            "event=user_updated module=user_repo status=ok user_id={id}"
        );
        Ok(())
    }

    /// Removes the user with `id` from the directory.
    ///
    /// An active session snapshot referencing that id is left in place and
    /// goes stale; re-entry still succeeds against the snapshot's pin. This
    /// matches the observed system and is a documented gap.
    pub fn delete_user(&self, id: &str) -> StoreResult<()> {
        let mut users = self.list_users()?;
        users.retain(|user| user.id != id);
        write_json(self.kv, keys::USERS, &users)?;
        info!(
            "event=user_deleted module=user_repo status=ok user_id={id}"
        );
        Ok(())
    }

    /// Persists or clears the current-session snapshot.
    pub fn set_current_user(&self, user: Option<&User>) -> StoreResult<()> {
        match user {
            Some(user) => write_json(self.kv, keys::CURRENT_USER, user),
            None => self.kv.remove(keys::CURRENT_USER),
        }
    }

    /// Returns the persisted current-session snapshot, if any.
    pub fn current_user(&self) -> StoreResult<Option<User>> {
        read_json(self.kv, keys::CURRENT_USER)
    }

    /// Compares `candidate` against the snapshot's pin.
    ///
    /// Deliberately does not re-fetch from the directory; the snapshot is
    /// the authority for re-entry.
    pub fn verify_pin(&self, candidate: &str) -> StoreResult<Option<User>> {
        let Some(current) = self.current_user()? else {
            return Ok(None);
        };
        if current.pin == candidate {
            Ok(Some(current))
        } else {
            Ok(None)
        }
    }

    /// Simulated pin-recovery mail: returns the stored pin for a known email.
    ///
    /// The pin itself is never logged.
    pub fn reset_pin(&self, email: &str) -> StoreResult<Option<String>> {
        let users = self.list_users()?;
        let found = users.into_iter().find(|user| user.email == email);
        match found {
            Some(user) => {
                info!(
                    "event=pin_reset module=user_repo status=ok user_id={}",
                    user.id
                );
                Ok(Some(user.pin))
            }
            None => {
                info!("event=pin_reset module=user_repo status=denied reason=unknown_email");
                Ok(None)
            }
        }
    }
}
