use serde::Serialize;
use time::PrimitiveDateTime;

use super::{
    dates,
    repo_types::{Question, Survey},
};

/// Public representation of a survey, as returned by `GET /survey`.
#[derive(Debug, Serialize)]
pub struct SurveyView {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    #[serde(serialize_with = "dates::serialize")]
    pub start_date: PrimitiveDateTime,
    #[serde(serialize_with = "dates::serialize_option")]
    pub end_date: Option<PrimitiveDateTime>,
    pub questions: Vec<QuestionEntry>,
}

/// Each question is wrapped as `{"question": {...}}`.
#[derive(Debug, Serialize)]
pub struct QuestionEntry {
    pub question: QuestionView,
}

#[derive(Debug, Serialize)]
pub struct QuestionView {
    pub body: String,
    pub note: Option<String>,
}

impl From<Question> for QuestionEntry {
    fn from(q: Question) -> Self {
        Self {
            question: QuestionView {
                body: q.body,
                note: q.note,
            },
        }
    }
}

impl From<Survey> for SurveyView {
    fn from(s: Survey) -> Self {
        Self {
            id: s.id,
            name: s.name,
            description: s.description,
            start_date: s.start_date,
            end_date: s.end_date,
            questions: s.questions.into_iter().map(QuestionEntry::from).collect(),
        }
    }
}
