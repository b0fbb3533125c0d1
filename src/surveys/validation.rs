//! Checks for `POST /survey` payloads.
//!
//! Every rule runs and all messages are collected; only a payload that is not
//! a JSON object stops early. A payload that passes becomes a [`NewSurvey`].

use serde_json::{Map, Value};

use super::{
    dates,
    repo_types::{NewQuestion, NewSurvey},
};

pub const INVALID_JSON: &str = "You have to send a valid JSON";
pub const NAME_REQUIRED: &str = "You must provide a survey name";
pub const START_DATE_REQUIRED: &str = "You must provide a start_date";
pub const START_DATE_FORMAT: &str = "Incorrect start_date format, should be (dd/mm/yyyy HH:MM)";
pub const END_DATE_FORMAT: &str = "Incorrect end_date format, should be (dd/mm/yyyy HH:MM)";
pub const QUESTIONS_REQUIRED: &str = "You must provide at least one question";
pub const QUESTION_BODY_REQUIRED: &str = "You must provide a question body";

/// Messages for every rule the payload breaks; empty when it is valid.
pub fn validate(payload: &Value) -> Vec<String> {
    check(payload).err().unwrap_or_default()
}

pub fn check(payload: &Value) -> Result<NewSurvey, Vec<String>> {
    let Some(obj) = payload.as_object() else {
        return Err(vec![INVALID_JSON.to_string()]);
    };
    let mut errors: Vec<String> = Vec::new();

    let name = match field(obj, "name") {
        Field::Text(name) => Some(name.to_string()),
        Field::Absent | Field::Other => {
            errors.push(NAME_REQUIRED.into());
            None
        }
    };

    let start_date = match field(obj, "start_date") {
        Field::Absent => {
            errors.push(START_DATE_REQUIRED.into());
            None
        }
        Field::Text(raw) => dates::parse(raw)
            .map_err(|_| errors.push(START_DATE_FORMAT.into()))
            .ok(),
        Field::Other => {
            errors.push(START_DATE_FORMAT.into());
            None
        }
    };

    // `None` here means either absent or unparseable; `end_date_ok` tells them apart.
    let mut end_date_ok = true;
    let end_date = match field(obj, "end_date") {
        Field::Absent => None,
        Field::Text(raw) => dates::parse(raw)
            .map_err(|_| end_date_ok = false)
            .ok(),
        Field::Other => {
            end_date_ok = false;
            None
        }
    };
    if !end_date_ok {
        errors.push(END_DATE_FORMAT.into());
    }

    let questions = match obj.get("questions").and_then(Value::as_array) {
        Some(items) if !items.is_empty() => {
            let parsed: Vec<Option<NewQuestion>> = items.iter().map(question).collect();
            if parsed.iter().any(Option::is_none) {
                errors.push(QUESTION_BODY_REQUIRED.into());
            }
            parsed.into_iter().flatten().collect()
        }
        _ => {
            errors.push(QUESTIONS_REQUIRED.into());
            Vec::new()
        }
    };

    match (name, start_date) {
        (Some(name), Some(start_date)) if errors.is_empty() => Ok(NewSurvey {
            name,
            description: obj
                .get("description")
                .and_then(Value::as_str)
                .map(str::to_owned),
            start_date,
            end_date,
            user_id: None,
            questions,
        }),
        _ => Err(errors),
    }
}

enum Field<'a> {
    /// Missing, `null` or the empty string.
    Absent,
    Text(&'a str),
    Other,
}

fn field<'a>(obj: &'a Map<String, Value>, key: &str) -> Field<'a> {
    match obj.get(key) {
        None | Some(Value::Null) => Field::Absent,
        Some(Value::String(s)) if s.is_empty() => Field::Absent,
        Some(Value::String(s)) => Field::Text(s),
        Some(_) => Field::Other,
    }
}

/// `{"question": {"body": "...", "note": "..."}}`
fn question(item: &Value) -> Option<NewQuestion> {
    let q = item.get("question")?.as_object()?;
    let body = match field(q, "body") {
        Field::Text(body) => body.to_string(),
        _ => return None,
    };
    Some(NewQuestion {
        body,
        note: q.get("note").and_then(Value::as_str).map(str::to_owned),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use time::macros::datetime;

    fn valid() -> Value {
        json!({
            "name": "S",
            "start_date": "01/01/2025 10:00",
            "questions": [{"question": {"body": "Q1"}}]
        })
    }

    fn with(key: &str, value: Value) -> Value {
        let mut payload = valid();
        payload[key] = value;
        payload
    }

    fn without(key: &str) -> Value {
        let mut payload = valid();
        payload.as_object_mut().unwrap().remove(key);
        payload
    }

    #[test]
    fn minimal_payload_is_valid() {
        assert!(validate(&valid()).is_empty());
        let survey = check(&valid()).unwrap();
        assert_eq!(survey.name, "S");
        assert_eq!(survey.start_date, datetime!(2025-01-01 10:00));
        assert_eq!(survey.end_date, None);
        assert_eq!(survey.description, None);
        assert_eq!(
            survey.questions,
            vec![NewQuestion {
                body: "Q1".into(),
                note: None
            }]
        );
    }

    #[test]
    fn full_payload_copies_fields() {
        let payload = json!({
            "name": "Team survey",
            "description": "quarterly",
            "start_date": "25/12/2024 14:30",
            "end_date": "31/12/2024 23:59",
            "questions": [
                {"question": {"body": "How are you?", "note": "be honest"}},
                {"question": {"body": "Anything else?"}}
            ]
        });
        let survey = check(&payload).unwrap();
        assert_eq!(survey.description.as_deref(), Some("quarterly"));
        assert_eq!(survey.end_date, Some(datetime!(2024-12-31 23:59)));
        assert_eq!(survey.questions.len(), 2);
        assert_eq!(survey.questions[0].note.as_deref(), Some("be honest"));
        assert_eq!(survey.questions[1].note, None);
    }

    #[test]
    fn non_object_payload_short_circuits() {
        for payload in [json!(null), json!("text"), json!(42), json!([valid()])] {
            assert_eq!(validate(&payload), vec![INVALID_JSON.to_string()]);
        }
    }

    #[test]
    fn missing_name() {
        for payload in [without("name"), with("name", json!("")), with("name", json!(null)), with("name", json!(7))] {
            assert!(validate(&payload).contains(&NAME_REQUIRED.to_string()));
        }
    }

    #[test]
    fn missing_start_date() {
        let errors = validate(&without("start_date"));
        assert_eq!(errors, vec![START_DATE_REQUIRED.to_string()]);
    }

    #[test]
    fn start_date_format() {
        for bad in [
            "2025-01-01 10:00",
            "1/1/2025 10:00",
            "01/01/2025",
            "01/01/2025 10:00 PM",
            "01/01/+2025 10:00",
            "01/01/-2025 10:00",
            "01/01/0000 10:00",
        ] {
            let errors = validate(&with("start_date", json!(bad)));
            assert_eq!(errors, vec![START_DATE_FORMAT.to_string()], "{bad}");
        }
        assert_eq!(
            validate(&with("start_date", json!(20250101))),
            vec![START_DATE_FORMAT.to_string()]
        );
        for good in ["31/12/1999 23:59", "29/02/2024 00:00", "15/06/2030 12:05"] {
            assert!(validate(&with("start_date", json!(good))).is_empty(), "{good}");
        }
    }

    #[test]
    fn end_date_is_optional_but_checked() {
        assert!(validate(&with("end_date", json!(null))).is_empty());
        assert!(validate(&with("end_date", json!(""))).is_empty());
        assert!(validate(&with("end_date", json!("02/01/2025 10:00"))).is_empty());
        assert_eq!(
            validate(&with("end_date", json!("tomorrow"))),
            vec![END_DATE_FORMAT.to_string()]
        );
    }

    #[test]
    fn end_before_start_is_accepted() {
        let payload = with("end_date", json!("01/01/2020 10:00"));
        assert!(validate(&payload).is_empty());
    }

    #[test]
    fn questions_must_be_a_non_empty_list() {
        for payload in [without("questions"), with("questions", json!([])), with("questions", json!("Q1"))] {
            assert_eq!(validate(&payload), vec![QUESTIONS_REQUIRED.to_string()]);
        }
    }

    #[test]
    fn bad_question_bodies_yield_one_generic_error() {
        let payload = with(
            "questions",
            json!([
                {"question": {"body": "ok"}},
                {"question": {"body": ""}},
                {"question": {"note": "no body"}},
                {"body": "not wrapped"},
                "scalar"
            ]),
        );
        assert_eq!(validate(&payload), vec![QUESTION_BODY_REQUIRED.to_string()]);
    }

    #[test]
    fn all_violations_are_collected() {
        let payload = json!({
            "start_date": "bad",
            "end_date": "worse",
            "questions": []
        });
        assert_eq!(
            validate(&payload),
            vec![
                NAME_REQUIRED.to_string(),
                START_DATE_FORMAT.to_string(),
                END_DATE_FORMAT.to_string(),
                QUESTIONS_REQUIRED.to_string(),
            ]
        );
    }
}
