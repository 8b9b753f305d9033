//! Error responses for the todo API
//!
//! Each variant maps to a fixed status and plain-text message. The
//! underlying cause is logged and never sent to the client.

use crate::storage::StoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Error fetching todos")]
    Fetch(#[source] StoreError),

    #[error("Error scanning row")]
    Scan(#[source] StoreError),

    #[error("Error decoding JSON")]
    DecodeCreate(#[source] serde_json::Error),

    #[error("Error adding todo")]
    Insert(#[source] StoreError),

    #[error("Invalid input")]
    DecodeUpdate(#[source] serde_json::Error),

    #[error("Error updating todo")]
    Update(#[source] StoreError),

    #[error("Error deleting todo")]
    Delete(#[source] StoreError),

    #[error("Method not allowed")]
    MethodNotAllowed,
}

impl ApiError {
    /// Splits list failures into statement and row-decoding errors.
    pub fn from_list(err: StoreError) -> Self {
        match err {
            StoreError::Row(_) => Self::Scan(err),
            _ => Self::Fetch(err),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::DecodeCreate(_) | Self::DecodeUpdate(_) => StatusCode::BAD_REQUEST,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Fetch(_) | Self::Scan(_) | Self::Insert(_) | Self::Update(_) | Self::Delete(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Some(cause) = std::error::Error::source(&self) {
            error!("{}: {}", self, cause);
        }

        (self.status(), self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_error() -> serde_json::Error {
        serde_json::from_str::<todo_types::Item>("{").unwrap_err()
    }

    #[test]
    fn test_list_error_split() {
        let scan = ApiError::from_list(StoreError::Row(sqlx::Error::RowNotFound));
        assert!(matches!(scan, ApiError::Scan(_)));
        assert_eq!(scan.to_string(), "Error scanning row");

        let fetch = ApiError::from_list(StoreError::Query(sqlx::Error::PoolClosed));
        assert!(matches!(fetch, ApiError::Fetch(_)));
        assert_eq!(fetch.to_string(), "Error fetching todos");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::DecodeCreate(decode_error()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::DecodeUpdate(decode_error()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Insert(StoreError::Query(sqlx::Error::PoolClosed)).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::MethodNotAllowed.status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
    }

    #[test]
    fn test_cause_kept_for_logging() {
        use std::error::Error;

        let decode = ApiError::DecodeUpdate(decode_error());
        assert!(decode.source().is_some());
        assert!(!decode.to_string().contains("EOF"));

        let store = ApiError::Fetch(StoreError::Query(sqlx::Error::PoolClosed));
        assert!(store.source().is_some());

        assert!(ApiError::MethodNotAllowed.source().is_none());
    }

    #[tokio::test]
    async fn test_body_is_plain_message() {
        let response = ApiError::Delete(StoreError::Query(sqlx::Error::PoolClosed)).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.headers()["content-type"],
            "text/plain; charset=utf-8"
        );

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"Error deleting todo");
    }
}
