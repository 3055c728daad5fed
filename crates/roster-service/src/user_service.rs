//! User service trait definition.

use crate::dto::{CountResponse, CreateUserRequest, UpdateUserRequest, UserResponse};
use async_trait::async_trait;
use roster_core::{Interface, PageRequest, RosterResult, UserId};

/// User service trait.
///
/// Reads go through the cache, mutations invalidate it. Cache failures never
/// surface here: the only errors are store failures, `NotFound`,
/// `DuplicateKey` and validation.
#[async_trait]
pub trait UserService: Interface + Send + Sync {
    /// Creates a new user.
    async fn create_user(&self, request: CreateUserRequest) -> RosterResult<UserResponse>;

    /// Gets a user by ID.
    async fn get_user(&self, id: UserId) -> RosterResult<UserResponse>;

    /// Lists users in id order.
    async fn list_users(&self, page: PageRequest) -> RosterResult<Vec<UserResponse>>;

    /// Searches name and email for `term`. No term means [`Self::list_users`].
    async fn search_users(
        &self,
        term: Option<String>,
        page: PageRequest,
    ) -> RosterResult<Vec<UserResponse>>;

    /// Counts every stored user.
    async fn count_users(&self) -> RosterResult<CountResponse>;

    /// Replaces the supplied fields of a user.
    async fn update_user(&self, id: UserId, request: UpdateUserRequest)
        -> RosterResult<UserResponse>;

    /// Deletes a user.
    async fn delete_user(&self, id: UserId) -> RosterResult<()>;
}
