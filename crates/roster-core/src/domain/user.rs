//! User entity.

use crate::UserId;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A stored user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Store-assigned identity, immutable.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address, unique across the store, compared as stored.
    pub email: String,
    /// Age in years.
    pub age: i32,
    /// Creation timestamp, immutable.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp, never earlier than `created_at`.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Applies `changes` and refreshes `updated_at`.
    pub fn apply(&mut self, changes: &UserChanges, now: DateTime<Utc>) {
        if let Some(name) = &changes.name {
            self.name.clone_from(name);
        }
        if let Some(email) = &changes.email {
            self.email.clone_from(email);
        }
        if let Some(age) = changes.age {
            self.age = age;
        }
        self.updated_at = next_updated_at(self.updated_at, now);
    }
}

/// Fields of a user about to be inserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub age: i32,
}

/// Partial replacement of a user's fields. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<i32>,
}

/// The timestamp a mutation stamps on a record last touched at `previous`.
///
/// Strictly greater than `previous` even when the clock has not advanced.
#[must_use]
pub fn next_updated_at(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    now.max(previous + Duration::microseconds(1))
}
