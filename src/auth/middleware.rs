use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use super::{
    extractors::{credential_from_headers, AuthUser},
    policy::requires_auth,
};
use crate::{error::ApiError, state::AppState};

/// Authenticates requests the access policy marks as protected and stores the
/// caller as an [`AuthUser`] extension. Public requests pass through untouched.
pub async fn auth_gate(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    if !requires_auth(req.method(), req.uri().path(), state.config.auth_enabled) {
        return next.run(req).await;
    }

    let user = match credential_from_headers(req.headers()) {
        Ok(credential) => state.verifier.authenticate(&credential).await,
        Err(e) => Err(e),
    };

    match user {
        Ok(user) => {
            debug!(user_id = user.id, "request authenticated");
            req.extensions_mut().insert(AuthUser(user));
            next.run(req).await
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}
