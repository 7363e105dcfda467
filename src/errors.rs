use axum::{
    Json,
    extract::{
        FromRequest, FromRequestParts, Path, Request,
        rejection::{JsonRejection, PathRejection},
    },
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use utoipa::ToSchema;

use crate::auth::AuthError;

/// ErrorResponse
///
/// The uniform JSON envelope every failed request returns, regardless of
/// which layer produced the failure.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    /// The HTTP status code, repeated in the body.
    pub error: u16,
    pub message: String,
}

/// Builds the envelope body for a status code and message.
/// Shared between `ApiError`, `AuthError`, and the router fallbacks.
pub fn error_body(status: StatusCode, message: &str) -> Json<ErrorResponse> {
    Json(ErrorResponse {
        success: false,
        error: status.as_u16(),
        message: message.to_string(),
    })
}

/// ApiError
///
/// The closed set of failures a handler can surface. Persistence failures of
/// any kind are coerced to `Unprocessable`; there is deliberately no finer
/// taxonomy and no retry behavior.
#[derive(Debug)]
pub enum ApiError {
    BadRequest,
    NotFound,
    MethodNotAllowed,
    Conflict,
    Unprocessable,
    Auth(AuthError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Conflict => StatusCode::CONFLICT,
            ApiError::Unprocessable => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Auth(e) => e.status(),
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ApiError::BadRequest => "bad request",
            ApiError::NotFound => "resource not found",
            ApiError::MethodNotAllowed => "not allowed",
            ApiError::Conflict => "conflicts with some rule already established",
            ApiError::Unprocessable => "unprocessable",
            ApiError::Auth(e) => e.message(),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        ApiError::Auth(e)
    }
}

// Extractor rejections stay inside the envelope: a body that is not valid
// JSON or a path id that is not a UUID is a plain 400.

impl From<JsonRejection> for ApiError {
    fn from(_: JsonRejection) -> Self {
        ApiError::BadRequest
    }
}

impl From<PathRejection> for ApiError {
    fn from(_: PathRejection) -> Self {
        ApiError::BadRequest
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, error_body(status, self.message())).into_response()
    }
}

/// ApiJson
///
/// A `Json` body extractor whose rejection is an `ApiError`, so malformed
/// request bodies render the uniform envelope instead of axum's plain-text
/// default.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(ApiJson(value))
    }
}

/// ApiPath
///
/// A `Path` extractor whose rejection is an `ApiError`; an id segment that
/// does not parse is a 400 inside the envelope.
pub struct ApiPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state).await?;
        Ok(ApiPath(value))
    }
}

/// Fallback handler for requests that match no route.
pub async fn not_found_fallback() -> ApiError {
    ApiError::NotFound
}

/// Fallback handler for requests that match a route but not its method set.
pub async fn method_not_allowed_fallback() -> ApiError {
    ApiError::MethodNotAllowed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_covers_the_closed_set() {
        assert_eq!(ApiError::BadRequest.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::MethodNotAllowed.status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(ApiError::Conflict.status(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::Unprocessable.status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::Auth(AuthError::MissingHeader).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Auth(AuthError::InsufficientPermissions).status(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn envelope_repeats_the_status_code() {
        let Json(body) = error_body(StatusCode::CONFLICT, "conflict");
        assert!(!body.success);
        assert_eq!(body.error, 409);
    }
}
