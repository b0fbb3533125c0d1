//! Mapping of service errors onto HTTP responses.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::{auth::AuthError, store::StoreError, surveys::SurveyError};

#[derive(Debug)]
pub enum ApiError {
    Auth(AuthError),
    /// Field-level messages from the survey validator.
    Validation(Vec<String>),
    BadRequest(String),
    Internal(String),
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Store(e) => e.into(),
            AuthError::Crypto(msg) => ApiError::Internal(msg),
            other => ApiError::Auth(other),
        }
    }
}

impl From<SurveyError> for ApiError {
    fn from(e: SurveyError) -> Self {
        match e {
            SurveyError::Invalid(errors) => ApiError::Validation(errors),
            SurveyError::Store(e) => e.into(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

fn unauthorized(message: &str) -> Response {
    let mut res = (StatusCode::UNAUTHORIZED, Json(json!({ "error": message }))).into_response();
    res.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        HeaderValue::from_static(r#"Basic realm="surveys""#),
    );
    res
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "errors": errors }))).into_response()
            }
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            ApiError::Internal(detail) => {
                error!(error = %detail, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "internal server error" })),
                )
                    .into_response()
            }
            ApiError::Auth(e) => match e {
                AuthError::MissingField(field) => (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": format!("You must provide a {field}") })),
                )
                    .into_response(),
                AuthError::DuplicateUsername(name) => (
                    StatusCode::CONFLICT,
                    Json(json!({ "error": format!("Username '{name}' is already taken") })),
                )
                    .into_response(),
                AuthError::MissingCredentials => unauthorized("Authentication required"),
                AuthError::MalformedCredentials => unauthorized("Invalid Authorization header"),
                AuthError::UnknownUser | AuthError::BadPassword => {
                    unauthorized("Invalid credentials")
                }
                AuthError::InvalidToken => unauthorized("Invalid token"),
                AuthError::ExpiredToken => unauthorized("Token expired"),
                AuthError::Crypto(msg) => ApiError::Internal(msg).into_response(),
                AuthError::Store(e) => ApiError::from(e).into_response(),
            },
        }
    }
}
