use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use bytes::Bytes;
use serde_json::Value;
use tracing::instrument;

use super::{dto::SurveyView, services::SurveyService};
use crate::{
    auth::{dto::SuccessResponse, extractors::AuthUser},
    error::ApiError,
    state::AppState,
};

pub fn survey_routes() -> Router<AppState> {
    Router::new().route("/survey", get(list_surveys).post(create_survey))
}

#[instrument(skip(surveys))]
pub async fn list_surveys(
    State(surveys): State<SurveyService>,
) -> Result<Json<Vec<SurveyView>>, ApiError> {
    Ok(Json(surveys.list_surveys().await?))
}

/// The auth gate has already run: `author` is present whenever
/// authentication is enabled, and absent for anonymous surveys otherwise.
#[instrument(skip_all)]
pub async fn create_survey(
    State(surveys): State<SurveyService>,
    author: Option<AuthUser>,
    body: Bytes,
) -> Result<(StatusCode, Json<SuccessResponse>), ApiError> {
    // Unparseable bodies fall through to the validator's shape check.
    let payload: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    surveys
        .create_survey(&payload, author.as_ref().map(|AuthUser(user)| user))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SuccessResponse {
            success: "Your survey was successfully added to the database.".into(),
        }),
    ))
}
