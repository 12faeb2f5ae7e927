//! User domain model.
//!
//! # Responsibility
//! - Define the registered-user record, its subscription tier and account
//!   status, and the explicit patch type used for partial updates.
//!
//! # Invariants
//! - `id` is stable and never reused for another user.
//! - Credentials (password, pin) are stored in plain text. This mirrors the
//!   system being replaced and is documented as a known gap, not a feature.

use serde::{Deserialize, Serialize};

/// Subscription tier of a registered user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tier {
    #[default]
    Free,
    Pro,
    Enterprise,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "FREE",
            Self::Pro => "PRO",
            Self::Enterprise => "ENTERPRISE",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account status of a registered user.
///
/// A revoked user stays in the directory but can no longer log in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserStatus {
    #[default]
    Active,
    Revoked,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Revoked => "REVOKED",
        }
    }
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registered user record as stored in the directory.
///
/// `tier` and `status` default on deserialization so directories written by
/// older deployments (where both were optional) stay readable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Four-digit access pin, stored as text.
    pub pin: String,
    pub mobile: String,
    #[serde(
        rename = "profilePic",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub profile_pic: Option<String>,
    pub name: String,
    #[serde(default)]
    pub tier: Tier,
    #[serde(default)]
    pub status: UserStatus,
}

impl User {
    /// The directory's guaranteed demonstration/testing account.
    ///
    /// Re-inserted on every directory read if missing (matched by email).
    pub fn seed_default() -> Self {
        Self {
            id: "default-tester-id".to_string(),
            email: "info@ab.com".to_string(),
            password: Some("password123".to_string()),
            pin: "1234".to_string(),
            mobile: "0000000000".to_string(),
            profile_pic: None,
            name: "System Tester".to_string(),
            tier: Tier::Enterprise,
            status: UserStatus::Active,
        }
    }
}

/// Registration input: a user without an assigned id.
///
/// `tier` and `status` may be supplied but are overwritten by
/// `UserDirectory::register`, which always creates FREE/ACTIVE accounts.
/// Admin enrollment applies its requested tier through a follow-up patch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub password: Option<String>,
    pub pin: String,
    pub mobile: String,
    pub profile_pic: Option<String>,
    pub name: String,
    pub tier: Tier,
    pub status: UserStatus,
}

/// Field-by-field partial update for a user record.
///
/// `None` fields are left untouched. There is no way to clear an optional
/// field through a patch; that matches the original merge semantics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub email: Option<String>,
    pub password: Option<String>,
    pub pin: Option<String>,
    pub mobile: Option<String>,
    pub profile_pic: Option<String>,
    pub name: Option<String>,
    pub tier: Option<Tier>,
    pub status: Option<UserStatus>,
}

impl UserPatch {
    /// Applies every present field onto `user`.
    pub fn apply(&self, user: &mut User) {
        if let Some(email) = &self.email {
            user.email = email.clone();
        }
        if let Some(password) = &self.password {
            user.password = Some(password.clone());
        }
        if let Some(pin) = &self.pin {
            user.pin = pin.clone();
        }
        if let Some(mobile) = &self.mobile {
            user.mobile = mobile.clone();
        }
        if let Some(profile_pic) = &self.profile_pic {
            user.profile_pic = Some(profile_pic.clone());
        }
        if let Some(name) = &self.name {
            user.name = name.clone();
        }
        if let Some(tier) = self.tier {
            user.tier = tier;
        }
        if let Some(status) = self.status {
            user.status = status;
        }
    }

    /// Convenience patch changing only the tier.
    pub fn tier(tier: Tier) -> Self {
        Self {
            tier: Some(tier),
            ..Self::default()
        }
    }

    /// Convenience patch changing only the status.
    pub fn status(status: UserStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}
