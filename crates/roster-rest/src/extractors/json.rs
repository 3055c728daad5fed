//! JSON body extractor with uniform error bodies.

use crate::responses::AppError;
use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use roster_core::RosterError;
use serde::de::DeserializeOwned;

/// Like [`axum::Json`], but a malformed body is reported as a
/// `VALIDATION_ERROR` [`roster_core::ErrorResponse`] with status 400.
///
/// Field rules are checked by the service, not here.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| {
                AppError(RosterError::validation(rejection.body_text()))
            })?;
        Ok(Self(value))
    }
}
