//! Persistence capabilities used by the services.
//!
//! `PgStore` is the production implementation; `MemoryStore` backs the test
//! suite and deployments without a configured database.

use async_trait::async_trait;
use thiserror::Error;

use crate::auth::repo_types::User;
use crate::surveys::repo_types::{NewSurvey, Survey};

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record already exists")]
    Duplicate,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with `StoreError::Duplicate` when the username is taken.
    async fn create_user(&self, username: &str, password_hash: &str) -> Result<User, StoreError>;
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;
    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, StoreError>;
}

#[async_trait]
pub trait SurveyStore: Send + Sync {
    /// Persists the survey and all of its questions atomically.
    async fn create_survey_with_questions(&self, survey: NewSurvey) -> Result<Survey, StoreError>;
    async fn find_survey_by_id(&self, id: i64) -> Result<Option<Survey>, StoreError>;
    /// All surveys in insertion order, each with its questions.
    async fn list_surveys(&self) -> Result<Vec<Survey>, StoreError>;
}
