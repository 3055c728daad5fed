//! Query-string extractor with uniform error bodies.

use crate::responses::AppError;
use axum::{
    async_trait,
    extract::{rejection::QueryRejection, FromRequestParts, Query},
    http::request::Parts,
};
use roster_core::RosterError;
use serde::de::DeserializeOwned;

/// Like [`axum::extract::Query`], but an unparsable query string (for
/// example `?limit=abc` or `?skip=-1`) is reported as a `VALIDATION_ERROR`
/// [`roster_core::ErrorResponse`] with status 400.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryParams<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection: QueryRejection| {
                AppError(RosterError::validation(rejection.body_text()))
            })?;
        Ok(Self(value))
    }
}
