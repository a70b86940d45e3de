/**
 * JSON Body Extractor
 *
 * `JsonBody<T>` is `axum::Json<T>` with the rejection folded into
 * `BackendError`, so a bad body gets the same `{"error", "status"}` shape
 * as every other failure. Every rejection (syntax, wrong shape, missing
 * content type) is a 400.
 */

use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

use crate::backend::error::BackendError;
use crate::shared::SharedError;

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!("Rejected request body: {}", rejection.body_text());
                Err(SharedError::malformed_body(rejection.body_text()).into())
            }
        }
    }
}
