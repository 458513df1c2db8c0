use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde_json::Value;

use crate::error::AppError;
use crate::models::Collection;

/// A record read from a JSON request body and validated on the way in.
///
/// Bodies that are not JSON are rejected with [`AppError::MalformedBody`];
/// JSON that does not form a valid record is rejected with
/// [`AppError::Validation`], listing every offending field.
#[derive(Debug, Clone)]
pub struct Validated<T>(pub T);

impl<T, S> FromRequest<S> for Validated<T>
where
    T: Collection + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::MalformedBody(rejection.body_text()))?;

        let record = T::from_value(&body).inspect_err(|err| {
            tracing::debug!(collection = T::NAME, "rejected request body: {}", err);
        })?;

        Ok(Validated(record))
    }
}
