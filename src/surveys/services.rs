use std::sync::Arc;

use axum::extract::FromRef;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use super::{dto::SurveyView, repo_types::Survey, validation};
use crate::{
    auth::repo_types::User,
    state::AppState,
    store::{StoreError, SurveyStore},
};

#[derive(Debug, Error)]
pub enum SurveyError {
    #[error("invalid survey: {}", .0.join("; "))]
    Invalid(Vec<String>),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Clone)]
pub struct SurveyService {
    store: Arc<dyn SurveyStore>,
}

impl FromRef<AppState> for SurveyService {
    fn from_ref(state: &AppState) -> Self {
        state.surveys.clone()
    }
}

impl SurveyService {
    pub fn new(store: Arc<dyn SurveyStore>) -> Self {
        Self { store }
    }

    /// Validates `payload` and stores the survey with its questions in one
    /// transaction. Nothing is written when validation fails.
    pub async fn create_survey(
        &self,
        payload: &Value,
        author: Option<&User>,
    ) -> Result<Survey, SurveyError> {
        let mut survey = validation::check(payload).map_err(|errors| {
            debug!(?errors, "survey payload rejected");
            SurveyError::Invalid(errors)
        })?;
        survey.user_id = author.map(|u| u.id);

        let created = self.store.create_survey_with_questions(survey).await?;
        info!(
            survey_id = created.id,
            user_id = ?created.user_id,
            questions = created.questions.len(),
            "survey created"
        );
        Ok(created)
    }

    pub async fn list_surveys(&self) -> Result<Vec<SurveyView>, SurveyError> {
        let surveys = self.store.list_surveys().await?;
        Ok(surveys.into_iter().map(SurveyView::from).collect())
    }
}
