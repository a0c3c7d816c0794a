//! Request extractors that fail with `AppError` instead of axum's plain-text rejections

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        FromRef, FromRequest, FromRequestParts, Path, Query, Request,
    },
    http::{request::Parts, StatusCode},
    Json,
};
use pressroom_common::{AppConfig, AppError, Result};
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// JSON request body
pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    Arc<AppConfig>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                let limit = Arc::<AppConfig>::from_ref(state).server.body_limit_bytes;
                Err(json_error(rejection, limit))
            }
        }
    }
}

/// Query string parameters
pub struct AppQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for AppQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self> {
        Query::<T>::from_request_parts(parts, state)
            .await
            .map(|Query(value)| Self(value))
            .map_err(|rejection: QueryRejection| AppError::InvalidFormat {
                message: rejection.body_text(),
            })
    }
}

/// Path parameters
pub struct AppPath<T>(pub T);

impl<S, T> FromRequestParts<S> for AppPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self> {
        Path::<T>::from_request_parts(parts, state)
            .await
            .map(|Path(value)| Self(value))
            .map_err(|rejection: PathRejection| AppError::InvalidFormat {
                message: rejection.body_text(),
            })
    }
}

fn json_error(rejection: JsonRejection, limit: usize) -> AppError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::PayloadTooLarge { limit };
    }

    let message = rejection.body_text();
    match missing_field(&message) {
        Some(field) => AppError::MissingField { field },
        None => AppError::InvalidFormat { message },
    }
}

/// Field name out of serde's "missing field `name`" message
fn missing_field(message: &str) -> Option<String> {
    let (_, rest) = message.split_once("missing field `")?;
    let (field, _) = rest.split_once('`')?;
    Some(field.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field() {
        assert_eq!(
            missing_field(
                "Failed to deserialize the JSON body into the target type: missing field `title` at line 1 column 11"
            ),
            Some("title".to_string())
        );
        assert_eq!(missing_field("invalid type: integer `5`, expected a string"), None);
    }
}
