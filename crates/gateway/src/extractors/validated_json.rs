//! Validated JSON extractor.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use tracing::debug;
use validator::{Validate, ValidationErrors};

use common::AppError;

/// JSON extractor that rejects bodies failing their form rules.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::bad_request(e.body_text()))?;

        value.validate().map_err(|errors| {
            debug!(%errors, "Request body failed validation");
            AppError::validation(first_message(&errors))
        })?;

        Ok(ValidatedJson(value))
    }
}

/// Message of the first failing field, as the form would show it.
fn first_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(_, errors)| errors.iter())
        .find_map(|error| error.message.as_ref())
        .map(|msg| msg.to_string())
        .unwrap_or_else(|| "Validation failed".to_string())
}
