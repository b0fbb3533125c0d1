use std::collections::HashMap;

use anyhow::Context;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::debug;

use super::{StoreError, SurveyStore, UserStore};
use crate::auth::repo_types::User;
use crate::surveys::repo_types::{NewSurvey, Question, Survey, SurveyRow};

#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let db = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("connect to database")?;
        Ok(Self { db })
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.db)
            .await
            .context("run migrations")?;
        Ok(())
    }
}

fn map_insert_error(e: sqlx::Error) -> StoreError {
    match e {
        sqlx::Error::Database(ref db) if db.is_unique_violation() => StoreError::Duplicate,
        other => StoreError::Database(other),
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, username: &str, password_hash: &str) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash)
            VALUES ($1, $2)
            RETURNING id, username, password_hash, created_at
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.db)
        .await
        .map_err(map_insert_error)?;
        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"SELECT id, username, password_hash, created_at FROM users WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }
}

#[async_trait]
impl SurveyStore for PgStore {
    async fn create_survey_with_questions(&self, survey: NewSurvey) -> Result<Survey, StoreError> {
        // Dropping `tx` before commit rolls everything back.
        let mut tx = self.db.begin().await?;

        let row = sqlx::query_as::<_, SurveyRow>(
            r#"
            INSERT INTO surveys (name, description, start_date, end_date, user_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, description, start_date, end_date, user_id
            "#,
        )
        .bind(&survey.name)
        .bind(&survey.description)
        .bind(survey.start_date)
        .bind(survey.end_date)
        .bind(survey.user_id)
        .fetch_one(&mut *tx)
        .await?;

        let mut questions = Vec::with_capacity(survey.questions.len());
        for q in &survey.questions {
            let question = sqlx::query_as::<_, Question>(
                r#"
                INSERT INTO questions (survey_id, body, note)
                VALUES ($1, $2, $3)
                RETURNING id, survey_id, body, note
                "#,
            )
            .bind(row.id)
            .bind(&q.body)
            .bind(&q.note)
            .fetch_one(&mut *tx)
            .await?;
            questions.push(question);
        }

        tx.commit().await?;
        debug!(survey_id = row.id, questions = questions.len(), "survey committed");
        Ok(Survey::from_row(row, questions))
    }

    async fn find_survey_by_id(&self, id: i64) -> Result<Option<Survey>, StoreError> {
        let Some(row) = sqlx::query_as::<_, SurveyRow>(
            r#"
            SELECT id, name, description, start_date, end_date, user_id
            FROM surveys
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        else {
            return Ok(None);
        };

        let questions = sqlx::query_as::<_, Question>(
            r#"
            SELECT id, survey_id, body, note
              FROM questions
             WHERE survey_id = $1
             ORDER BY id ASC
            "#,
        )
        .bind(id)
        .fetch_all(&self.db)
        .await?;

        Ok(Some(Survey::from_row(row, questions)))
    }

    async fn list_surveys(&self) -> Result<Vec<Survey>, StoreError> {
        let rows = sqlx::query_as::<_, SurveyRow>(
            r#"
            SELECT id, name, description, start_date, end_date, user_id
            FROM surveys
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        let questions = sqlx::query_as::<_, Question>(
            r#"
            SELECT id, survey_id, body, note
              FROM questions
             ORDER BY survey_id ASC, id ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        // Questions of surveys committed after the first query have no row here and are dropped.
        let mut by_survey: HashMap<i64, Vec<Question>> = HashMap::new();
        for q in questions {
            by_survey.entry(q.survey_id).or_default().push(q);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let questions = by_survey.remove(&row.id).unwrap_or_default();
                Survey::from_row(row, questions)
            })
            .collect())
    }
}
