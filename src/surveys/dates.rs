//! The `dd/mm/yyyy HH:MM` wire format for survey dates.

use serde::Serializer;
use thiserror::Error;
use time::{macros::format_description, PrimitiveDateTime};

const SHAPE: &[u8; 16] = b"dd/dd/dddd dd:dd";

#[derive(Debug, Error)]
pub enum DateError {
    #[error("expected dd/mm/yyyy HH:MM")]
    Shape,
    #[error("year must be between 0001 and 9999")]
    Year,
    #[error(transparent)]
    Parse(#[from] time::error::Parse),
}

/// Strict `dd/mm/yyyy HH:MM`: fixed-width ASCII digits, no sign, year 0001-9999.
pub fn parse(value: &str) -> Result<PrimitiveDateTime, DateError> {
    let bytes = value.as_bytes();
    if bytes.len() != SHAPE.len() {
        return Err(DateError::Shape);
    }
    let shaped = bytes.iter().zip(SHAPE).all(|(&b, &want)| match want {
        b'd' => b.is_ascii_digit(),
        sep => b == sep,
    });
    if !shaped {
        return Err(DateError::Shape);
    }

    let parsed = PrimitiveDateTime::parse(
        value,
        format_description!("[day]/[month]/[year] [hour]:[minute]"),
    )?;
    if parsed.year() < 1 {
        return Err(DateError::Year);
    }
    Ok(parsed)
}

pub fn format(value: &PrimitiveDateTime) -> Result<String, time::error::Format> {
    value.format(format_description!("[day]/[month]/[year] [hour]:[minute]"))
}

pub fn serialize<S: Serializer>(value: &PrimitiveDateTime, s: S) -> Result<S::Ok, S::Error> {
    let text = format(value).map_err(serde::ser::Error::custom)?;
    s.serialize_str(&text)
}

pub fn serialize_option<S: Serializer>(
    value: &Option<PrimitiveDateTime>,
    s: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(v) => serialize(v, s),
        None => s.serialize_none(),
    }
}
