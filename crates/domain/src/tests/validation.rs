// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    AnswerPayload, DomainError, OptionsList, QuestionKind, decode_answer, validate_answer,
    validate_branch,
};
use serde_json::json;

fn sample_options() -> OptionsList {
    OptionsList::from_values(vec![
        String::from("Employed"),
        String::from("Studying"),
        String::from("Searching"),
    ])
    .unwrap()
}

#[test]
fn options_parse_canonical_json_array() {
    let options: OptionsList = OptionsList::parse(r#"["Yes","No"]"#).unwrap();
    assert!(options.contains("Yes"));
    assert!(!options.contains("Maybe"));
    assert_eq!(options.to_json(), r#"["Yes","No"]"#);
}

#[test]
fn options_reject_non_array_and_blank_entries() {
    assert!(matches!(
        OptionsList::parse("Yes\nNo"),
        Err(DomainError::InvalidOptions { .. })
    ));
    assert!(matches!(
        OptionsList::parse(r#"["Yes",""]"#),
        Err(DomainError::InvalidOptions { .. })
    ));
    assert!(matches!(
        OptionsList::parse("[]"),
        Err(DomainError::InvalidOptions { .. })
    ));
}

#[test]
fn text_answers_must_be_strings() {
    let stored: String =
        validate_answer(QuestionKind::Text, None, &json!("some feedback")).unwrap();
    assert_eq!(stored, "some feedback");

    let result = validate_answer(QuestionKind::Text, None, &json!(12));
    assert!(matches!(
        result,
        Err(DomainError::AnswerTypeMismatch { kind: "text", .. })
    ));
}

#[test]
fn whole_numbers_store_without_a_fraction() {
    let stored: String = validate_answer(QuestionKind::Number, None, &json!(4.0)).unwrap();
    assert_eq!(stored, "4");
    assert_eq!(
        decode_answer(QuestionKind::Number, &stored),
        AnswerPayload::Integer(4)
    );
}

#[test]
fn fractional_numbers_round_trip_as_floats() {
    let stored: String = validate_answer(QuestionKind::Number, None, &json!(3.5)).unwrap();
    assert_eq!(stored, "3.5");
    assert_eq!(
        decode_answer(QuestionKind::Number, &stored),
        AnswerPayload::Float(3.5)
    );
}

#[test]
fn number_answers_accept_numeric_strings() {
    let stored: String = validate_answer(QuestionKind::Number, None, &json!("3.5")).unwrap();
    assert_eq!(stored, "3.5");
    assert_eq!(
        decode_answer(QuestionKind::Number, &stored),
        AnswerPayload::Float(3.5)
    );

    let stored: String = validate_answer(QuestionKind::Number, None, &json!("4")).unwrap();
    assert_eq!(stored, "4");
    assert_eq!(
        decode_answer(QuestionKind::Number, &stored),
        AnswerPayload::Integer(4)
    );
}

#[test]
fn number_answers_reject_non_numeric_values() {
    for value in [json!("lots"), json!(true), json!(["4"])] {
        let result = validate_answer(QuestionKind::Number, None, &value);
        assert!(matches!(
            result,
            Err(DomainError::AnswerTypeMismatch { kind: "number", .. })
        ));
    }
}

#[test]
fn radio_answers_must_match_a_declared_option() {
    let options: OptionsList = sample_options();
    let stored: String =
        validate_answer(QuestionKind::Radio, Some(&options), &json!("Employed")).unwrap();
    assert_eq!(stored, "Employed");

    let result = validate_answer(QuestionKind::Radio, Some(&options), &json!("Retired"));
    assert_eq!(
        result,
        Err(DomainError::ValueNotInOptions {
            value: String::from("Retired"),
        })
    );
}

#[test]
fn dropdown_answers_validate_like_radio() {
    let options: OptionsList = sample_options();
    let result = validate_answer(QuestionKind::Dropdown, Some(&options), &json!("Retired"));
    assert_eq!(
        result,
        Err(DomainError::ValueNotInOptions {
            value: String::from("Retired"),
        })
    );
}

#[test]
fn checkbox_answers_store_as_a_json_array() {
    let options: OptionsList = sample_options();
    let stored: String = validate_answer(
        QuestionKind::Checkbox,
        Some(&options),
        &json!(["Employed", "Studying"]),
    )
    .unwrap();
    assert_eq!(stored, r#"["Employed","Studying"]"#);
    assert_eq!(
        decode_answer(QuestionKind::Checkbox, &stored),
        AnswerPayload::Selections(vec![String::from("Employed"), String::from("Studying")])
    );
}

#[test]
fn checkbox_accepts_a_json_encoded_string_body() {
    let options: OptionsList = sample_options();
    let stored: String = validate_answer(
        QuestionKind::Checkbox,
        Some(&options),
        &json!(r#"["Searching"]"#),
    )
    .unwrap();
    assert_eq!(stored, r#"["Searching"]"#);
}

#[test]
fn checkbox_rejects_values_outside_the_options() {
    let options: OptionsList = sample_options();
    let result = validate_answer(
        QuestionKind::Checkbox,
        Some(&options),
        &json!(["Employed", "Retired"]),
    );
    assert_eq!(
        result,
        Err(DomainError::ValueNotInOptions {
            value: String::from("Retired"),
        })
    );
}

#[test]
fn scale_answers_accept_the_closed_range_one_to_five() {
    assert_eq!(
        validate_answer(QuestionKind::Scale, None, &json!(1)).unwrap(),
        "1"
    );
    assert_eq!(
        validate_answer(QuestionKind::Scale, None, &json!(5)).unwrap(),
        "5"
    );
    assert_eq!(
        validate_answer(QuestionKind::Scale, None, &json!(0)),
        Err(DomainError::ScaleOutOfRange { value: 0 })
    );
    assert_eq!(
        validate_answer(QuestionKind::Scale, None, &json!(6)),
        Err(DomainError::ScaleOutOfRange { value: 6 })
    );
}

#[test]
fn scale_answers_accept_integer_strings() {
    assert_eq!(
        validate_answer(QuestionKind::Scale, None, &json!("4")).unwrap(),
        "4"
    );
    assert_eq!(
        validate_answer(QuestionKind::Scale, None, &json!("9")),
        Err(DomainError::ScaleOutOfRange { value: 9 })
    );
    assert!(matches!(
        validate_answer(QuestionKind::Scale, None, &json!("soso")),
        Err(DomainError::AnswerTypeMismatch { kind: "scale", .. })
    ));
    assert!(matches!(
        validate_answer(QuestionKind::Scale, None, &json!(4.5)),
        Err(DomainError::AnswerTypeMismatch { kind: "scale", .. })
    ));
}

#[test]
fn choice_questions_without_options_are_invalid() {
    let result = validate_answer(QuestionKind::Radio, None, &json!("Employed"));
    assert!(matches!(result, Err(DomainError::InvalidOptions { .. })));
}

#[test]
fn branches_only_attach_to_radio_questions() {
    let options: OptionsList = sample_options();
    assert!(validate_branch(QuestionKind::Radio, Some(&options), "Employed").is_ok());

    let result = validate_branch(QuestionKind::Checkbox, Some(&options), "Employed");
    assert_eq!(
        result,
        Err(DomainError::BranchOnNonRadio { kind: "checkbox" })
    );
}

#[test]
fn branch_trigger_must_be_a_declared_option() {
    let options: OptionsList = sample_options();
    let result = validate_branch(QuestionKind::Radio, Some(&options), "Retired");
    assert_eq!(
        result,
        Err(DomainError::BranchValueNotInOptions {
            value: String::from("Retired"),
        })
    );
}
