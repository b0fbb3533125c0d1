mod dates;
pub mod dto;
pub mod handlers;
pub mod repo_types;
pub mod services;
pub mod validation;

pub use services::SurveyError;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::survey_routes())
}
