//! Mapping of internal outcomes to HTTP responses.
//!
//! Every failure renders as `{"error": ..., "message": ...}`. Data-loading and
//! internal failures are logged in full and rendered generically.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::dataset::StoreError;
use crate::lookup::LookupError;
use crate::security::auth::AuthError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{error}: {message}")]
    Validation {
        error: &'static str,
        message: String,
    },
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    NotFound(#[from] LookupError),
    #[error("data unavailable: {0}")]
    DataUnavailable(#[source] StoreError),
    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl ApiError {
    pub fn validation(error: &'static str, message: impl Into<String>) -> Self {
        ApiError::Validation {
            error,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::Auth(AuthError::Forbidden) => StatusCode::FORBIDDEN,
            ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::DataUnavailable(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn body(&self) -> ErrorBody {
        let (error, message) = match self {
            ApiError::Validation { error, message } => (*error, message.clone()),
            ApiError::Auth(AuthError::Unauthenticated) => (
                "Authentication required",
                "Provide an X-API-Key header, an api_key parameter or HTTP Basic credentials"
                    .to_string(),
            ),
            ApiError::Auth(AuthError::Forbidden) => (
                "Invalid credentials",
                "The supplied credentials were not accepted".to_string(),
            ),
            ApiError::Auth(AuthError::BadFormat) => (
                "Invalid authentication format",
                "Authorization header must be 'Basic base64(username:password)'".to_string(),
            ),
            ApiError::NotFound(LookupError::YearNotFound(year)) => (
                "Data not found",
                format!("No Wimbledon final data available for year {year}"),
            ),
            ApiError::NotFound(LookupError::PlayerNotFound(name)) => (
                "No finals found",
                format!("No Wimbledon finals found for player '{name}'"),
            ),
            ApiError::DataUnavailable(_) => (
                "Data not available",
                "The finals dataset could not be loaded".to_string(),
            ),
            ApiError::Internal(_) => (
                "Internal server error",
                "An unexpected error occurred while processing your request".to_string(),
            ),
        };
        ErrorBody { error, message }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(_) => ApiError::DataUnavailable(err),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }
        (status, Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::ProducerError;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::validation("Invalid year parameter", "x").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(AuthError::Unauthenticated).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::from(AuthError::BadFormat).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::from(AuthError::Forbidden).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::from(LookupError::YearNotFound(1900)).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(StoreError::Unavailable(ProducerError::Disabled)).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_bad_format_is_distinct_from_missing() {
        let missing = ApiError::from(AuthError::Unauthenticated).body();
        let malformed = ApiError::from(AuthError::BadFormat).body();
        assert_ne!(missing.error, malformed.error);
    }

    #[test]
    fn test_store_detail_is_not_rendered() {
        let err = ApiError::from(StoreError::Unavailable(ProducerError::Failed {
            code: Some(1),
            stderr: "secret path /srv/data".into(),
        }));
        assert!(!err.body().message.contains("/srv/data"));
    }
}
