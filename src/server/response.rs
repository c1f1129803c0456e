use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::error::Error;

/// Body of every non-listing response: `{"message": "..."}`.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Pairs a message body with a status code.
    pub fn with_status(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<Self>) {
        (status, Json(Self::new(message)))
    }
}

/// API error that converts to a proper HTTP response
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::CONFLICT,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

/// Default status for each error kind. Handlers override individual kinds
/// where an endpoint reports them differently.
impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        match e {
            Error::Validation(_)
            | Error::Forbidden(_)
            | Error::CategoryNotEmpty => ApiError::bad_request(e.to_string()),
            Error::NotFound(_) | Error::ItemsNotRegistered => ApiError::not_found(e.to_string()),
            Error::NameConflict(_) | Error::CapacityExceeded => ApiError::conflict(e.to_string()),
            Error::Database(_)
            | Error::Io(_)
            | Error::Config(_)
            | Error::TokenLookupCollision
            | Error::InvalidTokenFormat => {
                tracing::error!("request failed: {e}");
                ApiError::internal("internal server error")
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        MessageResponse::with_status(self.status, self.message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_status_mapping() {
        let cases = [
            (Error::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (Error::NotFound("gone".into()), StatusCode::NOT_FOUND),
            (Error::Forbidden("no".into()), StatusCode::BAD_REQUEST),
            (Error::NameConflict("dup".into()), StatusCode::CONFLICT),
            (Error::CapacityExceeded, StatusCode::CONFLICT),
            (Error::CategoryNotEmpty, StatusCode::BAD_REQUEST),
            (Error::ItemsNotRegistered, StatusCode::NOT_FOUND),
            (Error::Config("oops".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, status) in cases {
            assert_eq!(ApiError::from(error).status, status);
        }
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let err = ApiError::from(Error::Config("secret path".into()));
        assert_eq!(err.message, "internal server error");

        let err = ApiError::from(Error::NotFound("item not found".into()));
        assert_eq!(err.message, "item not found");
    }
}
