use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Field-keyed validation messages, collected across all checks before a
/// response is produced. Inserting twice for the same field keeps the later
/// message (last error per field wins).
#[derive(Debug, Default, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<&'static str, &'static str>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: &'static str, message: &'static str) {
        self.0.insert(field, message);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Failures raised by the persistence layer. Malformed object ids surface
/// here rather than as validation errors: the id only fails once it is cast
/// for a store lookup, matching the document store's own cast semantics.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Mongo(#[from] mongodb::error::Error),
    #[error("invalid object id: {0}")]
    InvalidId(#[from] bson::oid::Error),
    #[error("malformed document: {0}")]
    Document(#[from] bson::de::Error),
    #[cfg(test)]
    #[error("store unavailable: {0}")]
    Unavailable(&'static str),
}

#[derive(Debug)]
pub enum ApiError {
    /// 400 with the bare field→message map as the body.
    Validation(FieldErrors),
    /// 400 `{"error": message}` for a malformed path id.
    InvalidId(&'static str),
    /// 404 `{"error": message}`.
    NotFound(&'static str),
    /// 500 `{"error": <store error text>}`.
    Store(StoreError),
}

impl From<StoreError> for ApiError {
    fn from(error: StoreError) -> Self {
        ApiError::Store(error)
    }
}

impl From<bson::oid::Error> for ApiError {
    fn from(error: bson::oid::Error) -> Self {
        ApiError::Store(StoreError::InvalidId(error))
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => {
                (StatusCode::BAD_REQUEST, Json(errors)).into_response()
            }
            ApiError::InvalidId(message) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorBody { error: message.to_string() }),
            )
                .into_response(),
            ApiError::NotFound(message) => (
                StatusCode::NOT_FOUND,
                Json(ErrorBody { error: message.to_string() }),
            )
                .into_response(),
            ApiError::Store(error) => {
                tracing::error!(error = %error, "store operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorBody { error: error.to_string() }),
                )
                    .into_response()
            }
        }
    }
}
