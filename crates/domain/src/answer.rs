// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Type-aware answer validation and canonical storage encoding.
//!
//! Every answer is stored as a single text column. The question kind decides
//! both what submitted JSON values are acceptable and how the accepted value
//! is rendered into that column.

use crate::error::DomainError;
use crate::options::OptionsList;
use crate::types::QuestionKind;
use serde_json::Value;

/// A decoded answer value, typed by the question kind it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub enum AnswerPayload {
    /// Free text, or a choice value for radio and dropdown questions.
    Text(String),
    /// A whole number answer to a number question.
    Integer(i64),
    /// A fractional answer to a number question.
    Float(f64),
    /// The selected values of a checkbox question.
    Selections(Vec<String>),
    /// A scale answer in [1, 5].
    Scale(i64),
}

/// Validates a submitted answer value against its question kind and returns
/// the canonical stored encoding.
///
/// `options` must be present for radio, checkbox, and dropdown questions and
/// is ignored for the other kinds.
///
/// # Errors
///
/// Returns an error if the value's JSON type does not match the question
/// kind, a choice value is not among the declared options, or a scale value
/// is outside [1, 5].
pub fn validate_answer(
    kind: QuestionKind,
    options: Option<&OptionsList>,
    value: &Value,
) -> Result<String, DomainError> {
    match kind {
        QuestionKind::Text => validate_text(value),
        QuestionKind::Number => validate_number(value),
        QuestionKind::Radio | QuestionKind::Dropdown => validate_choice(kind, options, value),
        QuestionKind::Checkbox => validate_checkbox(options, value),
        QuestionKind::Scale => validate_scale(value),
    }
}

/// Decodes a stored answer back into its typed payload.
///
/// Stored values are trusted; a value that fails to decode falls back to
/// `Text` rather than erroring, so historical rows written before a question
/// changed kind still read back.
#[must_use]
pub fn decode_answer(kind: QuestionKind, stored: &str) -> AnswerPayload {
    match kind {
        QuestionKind::Text | QuestionKind::Radio | QuestionKind::Dropdown => {
            AnswerPayload::Text(stored.to_string())
        }
        QuestionKind::Number => decode_number(stored),
        QuestionKind::Checkbox => serde_json::from_str::<Vec<String>>(stored).map_or_else(
            |_| AnswerPayload::Text(stored.to_string()),
            AnswerPayload::Selections,
        ),
        QuestionKind::Scale => stored.parse::<i64>().map_or_else(
            |_| AnswerPayload::Text(stored.to_string()),
            AnswerPayload::Scale,
        ),
    }
}

fn decode_number(stored: &str) -> AnswerPayload {
    if stored.contains('.') {
        stored.parse::<f64>().map_or_else(
            |_| AnswerPayload::Text(stored.to_string()),
            AnswerPayload::Float,
        )
    } else {
        stored.parse::<i64>().map_or_else(
            |_| AnswerPayload::Text(stored.to_string()),
            AnswerPayload::Integer,
        )
    }
}

fn validate_text(value: &Value) -> Result<String, DomainError> {
    value.as_str().map(ToString::to_string).ok_or_else(|| {
        DomainError::AnswerTypeMismatch {
            kind: QuestionKind::Text.as_str(),
            message: String::from("expected a string"),
        }
    })
}

/// Accepts either a JSON number or a string holding one, which is how form
/// clients submit numeric answers.
fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(_) => value.as_f64(),
        Value::String(raw) => raw.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn validate_number(value: &Value) -> Result<String, DomainError> {
    let number: f64 =
        numeric_value(value).ok_or_else(|| DomainError::AnswerTypeMismatch {
            kind: QuestionKind::Number.as_str(),
            message: String::from("expected a number"),
        })?;
    if !number.is_finite() {
        return Err(DomainError::AnswerTypeMismatch {
            kind: QuestionKind::Number.as_str(),
            message: String::from("expected a finite number"),
        });
    }
    // Whole values store without a trailing ".0" so they read back as
    // integers.
    if number.fract() == 0.0 && number.abs() < 9_007_199_254_740_992.0 {
        #[allow(clippy::cast_possible_truncation)]
        return Ok(format!("{}", number as i64));
    }
    Ok(format!("{number}"))
}

fn validate_choice(
    kind: QuestionKind,
    options: Option<&OptionsList>,
    value: &Value,
) -> Result<String, DomainError> {
    let chosen: &str = value
        .as_str()
        .ok_or_else(|| DomainError::AnswerTypeMismatch {
            kind: kind.as_str(),
            message: String::from("expected a string"),
        })?;
    let options: &OptionsList = options.ok_or_else(|| DomainError::InvalidOptions {
        message: String::from("question has no declared options"),
    })?;
    if options.contains(chosen) {
        Ok(chosen.to_string())
    } else {
        Err(DomainError::ValueNotInOptions {
            value: chosen.to_string(),
        })
    }
}

fn validate_checkbox(options: Option<&OptionsList>, value: &Value) -> Result<String, DomainError> {
    let selections: Vec<String> = checkbox_selections(value)?;
    let options: &OptionsList = options.ok_or_else(|| DomainError::InvalidOptions {
        message: String::from("question has no declared options"),
    })?;
    for selection in &selections {
        if !options.contains(selection) {
            return Err(DomainError::ValueNotInOptions {
                value: selection.clone(),
            });
        }
    }
    serde_json::to_string(&selections).map_err(|e| DomainError::AnswerTypeMismatch {
        kind: QuestionKind::Checkbox.as_str(),
        message: format!("could not encode selections: {e}"),
    })
}

/// Accepts either a JSON array of strings or a string holding a JSON-encoded
/// array, which is how some clients submit checkbox answers.
fn checkbox_selections(value: &Value) -> Result<Vec<String>, DomainError> {
    let mismatch = || DomainError::AnswerTypeMismatch {
        kind: QuestionKind::Checkbox.as_str(),
        message: String::from("expected an array of strings"),
    };
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_str().map(ToString::to_string).ok_or_else(mismatch))
            .collect(),
        Value::String(raw) => serde_json::from_str::<Vec<String>>(raw).map_err(|_| mismatch()),
        _ => Err(mismatch()),
    }
}

fn validate_scale(value: &Value) -> Result<String, DomainError> {
    let parsed: Option<i64> = match value {
        Value::Number(_) => value.as_i64(),
        Value::String(raw) => raw.trim().parse::<i64>().ok(),
        _ => None,
    };
    let scale: i64 = parsed.ok_or_else(|| DomainError::AnswerTypeMismatch {
        kind: QuestionKind::Scale.as_str(),
        message: String::from("expected an integer"),
    })?;
    if (1..=5).contains(&scale) {
        Ok(format!("{scale}"))
    } else {
        Err(DomainError::ScaleOutOfRange { value: scale })
    }
}
