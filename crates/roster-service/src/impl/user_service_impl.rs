//! Cache-aside user service.

use crate::cache::{cache_keys, CacheExt, CacheLookup, CacheStore, DEFAULT_TTL};
use crate::dto::{CountResponse, CreateUserRequest, UpdateUserRequest, UserResponse};
use crate::user_service::UserService;
use async_trait::async_trait;
use roster_core::{
    NewUser, PageRequest, RosterError, RosterResult, User, UserChanges, UserId, ValidateExt,
};
use roster_repository::UserRepository;
use shaku::Component;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// User service backed by a record store with a cache in front of it.
///
/// Reads consult the cache first and populate it on a miss. Mutations hit
/// the store first, then drop the affected point key and sweep every list
/// and search key.
#[derive(Component)]
#[shaku(interface = UserService)]
pub struct UserServiceImpl {
    #[shaku(inject)]
    user_repository: Arc<dyn UserRepository>,
    #[shaku(inject)]
    cache: Arc<dyn CacheStore>,
    /// Expiry applied to every populated entry.
    #[shaku(default = DEFAULT_TTL)]
    ttl: Duration,
}

impl UserServiceImpl {
    /// Creates a new user service.
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        cache: Arc<dyn CacheStore>,
        ttl: Duration,
    ) -> Self {
        Self {
            user_repository,
            cache,
            ttl,
        }
    }

    /// Serves a collection from `key`, loading it with `load` on a miss.
    ///
    /// Empty collections are returned without being cached.
    async fn read_collection<Fut>(&self, key: &str, load: Fut) -> RosterResult<Vec<UserResponse>>
    where
        Fut: Future<Output = RosterResult<Vec<User>>> + Send,
    {
        if let CacheLookup::Hit(users) = self.cache.lookup::<Vec<UserResponse>>(key).await {
            return Ok(users);
        }

        let users: Vec<UserResponse> = load.await?.into_iter().map(UserResponse::from).collect();
        if !users.is_empty() {
            self.cache.store(key, &users, self.ttl).await;
        }
        Ok(users)
    }

    /// Drops every cached list and search page.
    async fn sweep_collections(&self) {
        let swept = self.cache.sweep(cache_keys::COLLECTIONS_PREFIX).await;
        debug!("Swept {} collection keys", swept);
    }

    /// Drops the point key of `id` and every collection key.
    async fn invalidate_user(&self, id: UserId) {
        self.cache.invalidate(&cache_keys::user_by_id(id)).await;
        self.sweep_collections().await;
    }
}

#[async_trait]
impl UserService for UserServiceImpl {
    #[instrument(skip(self, request))]
    async fn create_user(&self, request: CreateUserRequest) -> RosterResult<UserResponse> {
        request.validate_request()?;

        if self
            .user_repository
            .find_by_email(&request.email)
            .await?
            .is_some()
        {
            return Err(RosterError::duplicate_key("Email already registered"));
        }

        let user = self.user_repository.create(&NewUser::from(request)).await?;
        self.sweep_collections().await;

        info!("User created: {}", user.id);
        Ok(UserResponse::from(user))
    }

    #[instrument(skip(self))]
    async fn get_user(&self, id: UserId) -> RosterResult<UserResponse> {
        let cache_key = cache_keys::user_by_id(id);

        if let CacheLookup::Hit(cached) = self.cache.lookup::<UserResponse>(&cache_key).await {
            return Ok(cached);
        }

        let user = self
            .user_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| RosterError::not_found("User", id))?;

        let response = UserResponse::from(user);
        self.cache.store(&cache_key, &response, self.ttl).await;

        Ok(response)
    }

    #[instrument(skip(self))]
    async fn list_users(&self, page: PageRequest) -> RosterResult<Vec<UserResponse>> {
        let cache_key = cache_keys::user_list(page);
        self.read_collection(&cache_key, self.user_repository.find_all(page))
            .await
    }

    #[instrument(skip(self))]
    async fn search_users(
        &self,
        term: Option<String>,
        page: PageRequest,
    ) -> RosterResult<Vec<UserResponse>> {
        let term = term.filter(|t| !t.is_empty());
        let Some(term) = term.as_deref() else {
            return self.list_users(page).await;
        };

        let cache_key = cache_keys::user_search(term, page);
        self.read_collection(&cache_key, self.user_repository.search(Some(term), page))
            .await
    }

    #[instrument(skip(self))]
    async fn count_users(&self) -> RosterResult<CountResponse> {
        let total = self.user_repository.count().await?;
        Ok(CountResponse { total })
    }

    #[instrument(skip(self, request))]
    async fn update_user(
        &self,
        id: UserId,
        request: UpdateUserRequest,
    ) -> RosterResult<UserResponse> {
        request.validate_request()?;

        let updated = self
            .user_repository
            .update(id, &UserChanges::from(request))
            .await?
            .ok_or_else(|| RosterError::not_found("User", id))?;

        self.invalidate_user(id).await;

        info!("User updated: {}", id);
        Ok(UserResponse::from(updated))
    }

    #[instrument(skip(self))]
    async fn delete_user(&self, id: UserId) -> RosterResult<()> {
        if !self.user_repository.delete(id).await? {
            return Err(RosterError::not_found("User", id));
        }

        self.invalidate_user(id).await;

        info!("User deleted: {}", id);
        Ok(())
    }
}

impl std::fmt::Debug for UserServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserServiceImpl")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
