//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Replace the stored password hash.
    ///
    /// The caller is responsible for hashing; a plaintext or empty value
    /// here is a programming error upstream.
    pub fn set_password_hash(&mut self, hash: String) {
        self.password_hash = hash;
        self.updated_at = Utc::now();
    }
}

/// Password update data transfer object.
///
/// Carries the raw submission for the duration of a single request;
/// nothing in it is persisted as-is.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePassword {
    /// Submitted CSRF token
    pub token: String,
    /// Raw password, sanitized before use
    pub password: String,
}

/// User row as rendered by the listing view (safe to expose)
#[derive(Debug, Clone, Serialize)]
pub struct UserListEntry {
    pub id: i64,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserListEntry {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            created_at: user.created_at,
        }
    }
}
