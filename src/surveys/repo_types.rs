use sqlx::FromRow;
use time::PrimitiveDateTime;

/// Survey row as stored in `surveys`.
#[derive(Debug, Clone, FromRow)]
pub struct SurveyRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub start_date: PrimitiveDateTime,
    pub end_date: Option<PrimitiveDateTime>,
    pub user_id: Option<i64>,
}

/// Question row as stored in `questions`.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Question {
    pub id: i64,
    pub survey_id: i64,
    pub body: String,
    pub note: Option<String>,
}

/// A survey together with the questions it owns.
#[derive(Debug, Clone)]
pub struct Survey {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub start_date: PrimitiveDateTime,
    pub end_date: Option<PrimitiveDateTime>,
    pub user_id: Option<i64>,
    pub questions: Vec<Question>,
}

impl Survey {
    pub(crate) fn from_row(row: SurveyRow, questions: Vec<Question>) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            start_date: row.start_date,
            end_date: row.end_date,
            user_id: row.user_id,
            questions,
        }
    }
}

/// Validated input for a new survey; produced only by the request validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSurvey {
    pub name: String,
    pub description: Option<String>,
    pub start_date: PrimitiveDateTime,
    pub end_date: Option<PrimitiveDateTime>,
    pub user_id: Option<i64>,
    pub questions: Vec<NewQuestion>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuestion {
    pub body: String,
    pub note: Option<String>,
}
