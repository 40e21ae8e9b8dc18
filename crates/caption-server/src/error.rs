//! HTTP mapping for [`ApiError`].

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use caption_core::ApiError;

/// Wrapper giving [`ApiError`] an HTTP representation.
///
/// Handlers return `Result<_, HttpError>` and use `?` on `ApiError`
/// results; the body is the wire-format `{ code, message }` object.
#[derive(Debug)]
pub struct HttpError(pub ApiError);

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        Self(err)
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            ApiError::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Provider { .. } => StatusCode::BAD_GATEWAY,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self.0.to_error_body())).into_response()
    }
}

/// Result alias for HTTP handlers.
pub type HttpResult<T> = Result<T, HttpError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: ApiError) -> StatusCode {
        HttpError(err).into_response().status()
    }

    #[test]
    fn invalid_request_is_400() {
        assert_eq!(
            status_of(ApiError::invalid_request("bad")),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn not_found_is_404() {
        assert_eq!(status_of(ApiError::not_found("gone")), StatusCode::NOT_FOUND);
    }

    #[test]
    fn provider_is_502() {
        assert_eq!(
            status_of(ApiError::provider("upstream down")),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn internal_is_500() {
        assert_eq!(
            status_of(ApiError::internal("boom")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
