//! Repository trait definitions.

use async_trait::async_trait;
use roster_core::{Interface, NewUser, PageRequest, RosterResult, User, UserChanges, UserId};

/// Durable user storage.
///
/// Absence is reported as `None` / `false`, never as an error. Uniqueness of
/// `email` is enforced here and surfaces as `RosterError::DuplicateKey`.
#[async_trait]
pub trait UserRepository: Interface + Send + Sync {
    /// Finds a user by ID.
    async fn find_by_id(&self, id: UserId) -> RosterResult<Option<User>>;

    /// Finds a user by exact email.
    async fn find_by_email(&self, email: &str) -> RosterResult<Option<User>>;

    /// Returns up to `page.limit` users after skipping `page.skip`, in id order.
    async fn find_all(&self, page: PageRequest) -> RosterResult<Vec<User>>;

    /// Case-insensitive substring match on name or email.
    ///
    /// An absent or empty term behaves exactly like [`find_all`](Self::find_all).
    async fn search(&self, term: Option<&str>, page: PageRequest) -> RosterResult<Vec<User>>;

    /// Counts all users.
    async fn count(&self) -> RosterResult<u64>;

    /// Inserts a user, assigning its identity and both timestamps.
    async fn create(&self, user: &NewUser) -> RosterResult<User>;

    /// Applies a partial update. Returns `None` if `id` is unknown.
    async fn update(&self, id: UserId, changes: &UserChanges) -> RosterResult<Option<User>>;

    /// Hard-deletes a user. Returns `false` if `id` is unknown.
    async fn delete(&self, id: UserId) -> RosterResult<bool>;
}

/// Normalizes a search term: an empty term means "no filter".
#[must_use]
pub fn effective_term(term: Option<&str>) -> Option<&str> {
    term.filter(|t| !t.is_empty())
}
