use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{RegisterRequest, SuccessResponse, TokenResponse},
        extractors::AuthUser,
        services::CredentialVerifier,
    },
    error::ApiError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/token", get(token))
}

#[instrument(skip(verifier, payload))]
pub async fn register(
    State(verifier): State<CredentialVerifier>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SuccessResponse>), ApiError> {
    let Json(payload) = payload.map_err(|e| {
        warn!(error = %e, "register payload rejected");
        ApiError::BadRequest("You have to send a valid JSON".into())
    })?;

    let user = verifier
        .register(&payload.username, &payload.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SuccessResponse {
            success: format!("User '{}' was successfully registered.", user.username),
        }),
    ))
}

#[instrument(skip_all)]
pub async fn token(
    State(verifier): State<CredentialVerifier>,
    user: AuthUser,
) -> Result<Json<TokenResponse>, ApiError> {
    let AuthUser(user) = user;
    let token = verifier.issue_token(&user)?;
    info!(user_id = user.id, "token issued");
    Ok(Json(TokenResponse { token }))
}
