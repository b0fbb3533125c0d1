use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use super::{StoreError, SurveyStore, UserStore};
use crate::auth::repo_types::User;
use crate::surveys::repo_types::{NewSurvey, Question, Survey};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    surveys: Vec<Survey>,
    next_user_id: i64,
    next_survey_id: i64,
    next_question_id: i64,
}

/// Process-local store. Every write holds the lock for its whole duration,
/// so readers never observe a survey without its questions.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, username: &str, password_hash: &str) -> Result<User, StoreError> {
        let mut t = self.tables.write().await;
        if t.users.iter().any(|u| u.username == username) {
            return Err(StoreError::Duplicate);
        }
        t.next_user_id += 1;
        let user = User {
            id: t.next_user_id,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        t.users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let t = self.tables.read().await;
        Ok(t.users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        let t = self.tables.read().await;
        Ok(t.users.iter().find(|u| u.id == id).cloned())
    }
}

#[async_trait]
impl SurveyStore for MemoryStore {
    async fn create_survey_with_questions(&self, survey: NewSurvey) -> Result<Survey, StoreError> {
        let mut t = self.tables.write().await;
        t.next_survey_id += 1;
        let survey_id = t.next_survey_id;

        let mut questions = Vec::with_capacity(survey.questions.len());
        for q in survey.questions {
            t.next_question_id += 1;
            questions.push(Question {
                id: t.next_question_id,
                survey_id,
                body: q.body,
                note: q.note,
            });
        }

        let stored = Survey {
            id: survey_id,
            name: survey.name,
            description: survey.description,
            start_date: survey.start_date,
            end_date: survey.end_date,
            user_id: survey.user_id,
            questions,
        };
        t.surveys.push(stored.clone());
        Ok(stored)
    }

    async fn find_survey_by_id(&self, id: i64) -> Result<Option<Survey>, StoreError> {
        let t = self.tables.read().await;
        Ok(t.surveys.iter().find(|s| s.id == id).cloned())
    }

    async fn list_surveys(&self) -> Result<Vec<Survey>, StoreError> {
        let t = self.tables.read().await;
        Ok(t.surveys.clone())
    }
}
