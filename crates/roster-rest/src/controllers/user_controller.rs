//! User management controller.

use crate::{
    extractors::{JsonBody, PaginationQuery, QueryParams, SearchQuery},
    responses::{created, no_content, ok, ApiResult, AppError},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use roster_core::{RosterError, UserId};
use roster_service::{CountResponse, CreateUserRequest, UpdateUserRequest, UserResponse};
use tracing::debug;

/// Creates the user router.
///
/// Collection routes answer with and without a trailing slash.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/", get(list_users).post(create_user))
        .route("/users/search", get(search_users))
        .route("/users/count", get(count_users))
        .route(
            "/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
}

/// List users.
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    params(PaginationQuery),
    responses(
        (status = 200, description = "A page of users in id order", body = [UserResponse])
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    QueryParams(pagination): QueryParams<PaginationQuery>,
) -> ApiResult<Vec<UserResponse>> {
    let page = pagination.into();
    debug!(?page, "List users request");

    let users = state.user_service.list_users(page).await?;
    ok(users)
}

/// Create a new user.
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Invalid request", body = roster_core::ErrorResponse),
        (status = 409, description = "Email already registered", body = roster_core::ErrorResponse)
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    debug!("Create user request: {}", request.email);

    let user = state.user_service.create_user(request).await?;
    Ok(created(user))
}

/// Search users by name or email.
#[utoipa::path(
    get,
    path = "/users/search",
    tag = "users",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching users in id order", body = [UserResponse])
    )
)]
pub async fn search_users(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<SearchQuery>,
) -> ApiResult<Vec<UserResponse>> {
    let (term, page) = query.into_parts();
    debug!(?term, ?page, "Search users request");

    let users = state.user_service.search_users(term, page).await?;
    ok(users)
}

/// Count all users.
#[utoipa::path(
    get,
    path = "/users/count",
    tag = "users",
    responses(
        (status = 200, description = "Total number of users", body = CountResponse)
    )
)]
pub async fn count_users(State(state): State<AppState>) -> ApiResult<CountResponse> {
    let count = state.user_service.count_users().await?;
    ok(count)
}

/// Get a user by ID.
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "User not found", body = roster_core::ErrorResponse)
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<UserResponse> {
    debug!("Get user request: {}", id);

    let user_id = parse_user_id(&id)?;
    let user = state.user_service.get_user(user_id).await?;
    ok(user)
}

/// Update a user. Fields left out of the body are unchanged.
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Invalid request", body = roster_core::ErrorResponse),
        (status = 404, description = "User not found", body = roster_core::ErrorResponse),
        (status = 409, description = "Email already registered", body = roster_core::ErrorResponse)
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(request): JsonBody<UpdateUserRequest>,
) -> ApiResult<UserResponse> {
    debug!("Update user request: {}", id);

    let user_id = parse_user_id(&id)?;
    let user = state.user_service.update_user(user_id, request).await?;
    ok(user)
}

/// Delete a user.
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found", body = roster_core::ErrorResponse)
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    debug!("Delete user request: {}", id);

    let user_id = parse_user_id(&id)?;
    state.user_service.delete_user(user_id).await?;

    Ok(no_content())
}

fn parse_user_id(id: &str) -> Result<UserId, AppError> {
    id.parse()
        .map_err(|_| AppError(RosterError::validation(format!("Invalid user ID: {id}"))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_user_id() {
        assert_eq!(parse_user_id("42").unwrap(), UserId(42));
        assert_eq!(parse_user_id("abc").unwrap_err().0.status_code(), 400);
    }
}
