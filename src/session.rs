//! Client-held authentication state: tokens and the signed-in user's profile.
//!
//! DESIGN
//! ======
//! `SessionStore` is the only reader/writer of the three persisted slots. It is
//! cheap to clone and every clone shares one backend, so the dispatcher and the
//! session manager always observe each other's writes. Nothing is cached in
//! memory: each accessor goes back to storage, which is how a freshly
//! refreshed token reaches the next request.
//!
//! Role checks here gate which pages render. They are not a security
//! boundary; the server re-validates every call.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::storage::Storage;

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";
pub const USER_KEY: &str = "user";

// =============================================================================
// ROLE
// =============================================================================

/// Account roles the backend assigns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Student,
    Cook,
    Admin,
}

impl Role {
    /// Exact wire spelling used by the backend.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Cook => "cook",
            Self::Admin => "admin",
        }
    }

    /// Dashboard route each role lands on after login.
    #[must_use]
    pub fn landing_path(self) -> &'static str {
        match self {
            Self::Student => "/student/dashboard",
            Self::Cook => "/cook/dashboard",
            Self::Admin => "/admin/dashboard",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Self::Student),
            "cook" => Ok(Self::Cook),
            "admin" => Ok(Self::Admin),
            other => Err(UnknownRole(other.to_owned())),
        }
    }
}

// =============================================================================
// USER PROFILE
// =============================================================================

/// The signed-in user as returned by `/api/auth/login` and `/api/auth/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    #[serde(default)]
    pub email: String,
    /// Display name.
    pub full_name: String,
    /// Role string exactly as the server sent it.
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl UserProfile {
    /// Parsed role, or `None` when the server sent a role this client does not know.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.role.parse().ok()
    }

    /// Case-sensitive exact comparison against the wire spelling.
    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.role == role.as_str()
    }
}

// =============================================================================
// SESSION
// =============================================================================

/// All three persisted fields, read together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub user: Option<UserProfile>,
}

impl Session {
    /// True when no field is set, the state logout leaves behind.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none() && self.user.is_none()
    }
}

/// Shared handle over the session slots of one storage backend.
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn Storage>,
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore").finish_non_exhaustive()
    }
}

impl SessionStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        non_empty(self.storage.get(ACCESS_TOKEN_KEY))
    }

    #[must_use]
    pub fn refresh_token(&self) -> Option<String> {
        non_empty(self.storage.get(REFRESH_TOKEN_KEY))
    }

    /// The stored profile. Unset or malformed JSON both read as `None`.
    #[must_use]
    pub fn user(&self) -> Option<UserProfile> {
        let raw = self.storage.get(USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::debug!(error = %e, "stored user profile is malformed; ignoring");
                None
            }
        }
    }

    /// Local presence check only; expiry and signature are the server's concern.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.access_token().is_some()
    }

    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.user().is_some_and(|user| user.has_role(role))
    }

    #[must_use]
    pub fn snapshot(&self) -> Session {
        Session { access_token: self.access_token(), refresh_token: self.refresh_token(), user: self.user() }
    }

    pub fn set_access_token(&self, token: &str) {
        self.storage.set(ACCESS_TOKEN_KEY, token);
    }

    pub fn set_user(&self, user: &UserProfile) {
        match serde_json::to_string(user) {
            Ok(raw) => self.storage.set(USER_KEY, &raw),
            Err(e) => tracing::warn!(error = %e, "user profile serialization failed"),
        }
    }

    /// Store a complete session after a successful login.
    pub fn save_login(&self, access_token: &str, refresh_token: &str, user: &UserProfile) {
        self.storage.set(ACCESS_TOKEN_KEY, access_token);
        self.storage.set(REFRESH_TOKEN_KEY, refresh_token);
        self.set_user(user);
    }

    /// Remove all three slots.
    pub fn clear(&self) {
        self.storage.remove(ACCESS_TOKEN_KEY);
        self.storage.remove(REFRESH_TOKEN_KEY);
        self.storage.remove(USER_KEY);
    }
}

// `localStorage` hands back "" for values written from JS as empty strings;
// treat those like missing tokens.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
