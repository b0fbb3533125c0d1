use crate::state::AppState;
use axum::Router;

mod claims;
pub(crate) mod dto;
mod errors;
pub(crate) mod extractors;
pub mod handlers;
pub mod jwt;
pub mod middleware;
mod password;
pub mod policy;
pub mod repo_types;
pub mod services;

pub use errors::AuthError;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::auth_routes())
}
