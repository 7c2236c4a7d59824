// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde_json::json;
use tracer_domain::RoleKind;
use tracer_persistence::SqlitePersistence;

use super::helpers::{
    seed_alumni, seed_global_actor, seed_program_study, seed_question, seed_scoped_actor,
    seed_survey_with_section, test_db,
};
use crate::answers;
use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::mail::LogMailer;
use crate::request_response::{AnswerInfo, AnswerSubmission, BulkAnswerRequest};

fn submission(question_id: i64, value: serde_json::Value) -> AnswerSubmission {
    AnswerSubmission {
        question_id: Some(question_id),
        program_question_id: None,
        value,
    }
}

#[test]
fn a_text_answer_round_trips() {
    let mut db: SqlitePersistence = test_db();
    let alumni: AuthenticatedUser = seed_alumni(&mut db, "1901001", None);
    let (survey_id, section_id) = seed_survey_with_section(&mut db, "exit");
    let question_id: i64 = seed_question(&mut db, section_id, "text", None, true);

    let stored: AnswerInfo = answers::submit_answer(
        &mut db,
        &LogMailer,
        &alumni,
        survey_id,
        &submission(question_id, json!("Working at a startup")),
    )
    .unwrap();

    assert_eq!(stored.value, json!("Working at a startup"));
    assert_eq!(stored.user_id, "1901001");
    assert_eq!(stored.question_id, Some(question_id));
}

#[test]
fn a_number_answer_round_trips_typed() {
    let mut db: SqlitePersistence = test_db();
    let alumni: AuthenticatedUser = seed_alumni(&mut db, "1901001", None);
    let (survey_id, section_id) = seed_survey_with_section(&mut db, "exit");
    let question_id: i64 = seed_question(&mut db, section_id, "number", None, true);

    let stored: AnswerInfo = answers::submit_answer(
        &mut db,
        &LogMailer,
        &alumni,
        survey_id,
        &submission(question_id, json!(8_500_000)),
    )
    .unwrap();

    assert_eq!(stored.value, json!(8_500_000));
}

#[test]
fn a_checkbox_answer_keeps_its_selections() {
    let mut db: SqlitePersistence = test_db();
    let alumni: AuthenticatedUser = seed_alumni(&mut db, "1901001", None);
    let (survey_id, section_id) = seed_survey_with_section(&mut db, "exit");
    let question_id: i64 = seed_question(
        &mut db,
        section_id,
        "checkbox",
        Some(r#"["Java","Rust","SQL"]"#),
        true,
    );

    let stored: AnswerInfo = answers::submit_answer(
        &mut db,
        &LogMailer,
        &alumni,
        survey_id,
        &submission(question_id, json!(["Rust", "SQL"])),
    )
    .unwrap();

    assert_eq!(stored.value, json!(["Rust", "SQL"]));
}

#[test]
fn a_radio_answer_must_be_a_declared_option() {
    let mut db: SqlitePersistence = test_db();
    let alumni: AuthenticatedUser = seed_alumni(&mut db, "1901001", None);
    let (survey_id, section_id) = seed_survey_with_section(&mut db, "exit");
    let question_id: i64 =
        seed_question(&mut db, section_id, "radio", Some(r#"["Yes","No"]"#), true);

    let err: ApiError = answers::submit_answer(
        &mut db,
        &LogMailer,
        &alumni,
        survey_id,
        &submission(question_id, json!("Maybe")),
    )
    .unwrap_err();

    assert!(
        matches!(err, ApiError::DomainRuleViolation { ref rule, .. } if rule == "value_in_options")
    );
}

#[test]
fn a_scale_answer_outside_the_range_is_rejected() {
    let mut db: SqlitePersistence = test_db();
    let alumni: AuthenticatedUser = seed_alumni(&mut db, "1901001", None);
    let (survey_id, section_id) = seed_survey_with_section(&mut db, "exit");
    let question_id: i64 = seed_question(&mut db, section_id, "scale", None, true);

    let err: ApiError = answers::submit_answer(
        &mut db,
        &LogMailer,
        &alumni,
        survey_id,
        &submission(question_id, json!(6)),
    )
    .unwrap_err();

    assert!(matches!(err, ApiError::DomainRuleViolation { ref rule, .. } if rule == "scale_range"));
}

#[test]
fn resubmitting_a_question_overwrites_the_previous_answer() {
    let mut db: SqlitePersistence = test_db();
    let alumni: AuthenticatedUser = seed_alumni(&mut db, "1901001", None);
    let (survey_id, section_id) = seed_survey_with_section(&mut db, "exit");
    let question_id: i64 = seed_question(&mut db, section_id, "text", None, true);

    let first: AnswerInfo = answers::submit_answer(
        &mut db,
        &LogMailer,
        &alumni,
        survey_id,
        &submission(question_id, json!("first draft")),
    )
    .unwrap();
    let second: AnswerInfo = answers::submit_answer(
        &mut db,
        &LogMailer,
        &alumni,
        survey_id,
        &submission(question_id, json!("final answer")),
    )
    .unwrap();

    assert_eq!(first.answer_id, second.answer_id);
    assert_eq!(second.value, json!("final answer"));

    let mine = answers::list_answers(&mut db, &alumni, survey_id).unwrap();
    assert_eq!(mine.len(), 1);
}

#[test]
fn a_submission_must_target_exactly_one_question() {
    let mut db: SqlitePersistence = test_db();
    let alumni: AuthenticatedUser = seed_alumni(&mut db, "1901001", None);
    let (survey_id, section_id) = seed_survey_with_section(&mut db, "exit");
    let question_id: i64 = seed_question(&mut db, section_id, "text", None, true);

    let err: ApiError = answers::submit_answer(
        &mut db,
        &LogMailer,
        &alumni,
        survey_id,
        &AnswerSubmission {
            question_id: Some(question_id),
            program_question_id: Some(1),
            value: json!("hello"),
        },
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput { .. }));

    let err: ApiError = answers::submit_answer(
        &mut db,
        &LogMailer,
        &alumni,
        survey_id,
        &AnswerSubmission {
            question_id: None,
            program_question_id: None,
            value: json!("hello"),
        },
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput { .. }));
}

#[test]
fn only_alumni_may_submit() {
    let mut db: SqlitePersistence = test_db();
    let tracer: AuthenticatedUser = seed_global_actor(&mut db, "staff-1", RoleKind::Tracer);
    let (survey_id, section_id) = seed_survey_with_section(&mut db, "exit");
    let question_id: i64 = seed_question(&mut db, section_id, "text", None, true);

    let err: ApiError = answers::submit_answer(
        &mut db,
        &LogMailer,
        &tracer,
        survey_id,
        &submission(question_id, json!("nope")),
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized { .. }));
}

#[test]
fn submitting_advances_progression_without_regressing() {
    let mut db: SqlitePersistence = test_db();
    let alumni: AuthenticatedUser = seed_alumni(&mut db, "1901001", None);
    let (exit_survey, exit_section) = seed_survey_with_section(&mut db, "exit");
    let (lv1_survey, lv1_section) = seed_survey_with_section(&mut db, "lv1");
    let exit_question: i64 = seed_question(&mut db, exit_section, "text", None, true);
    let lv1_question: i64 = seed_question(&mut db, lv1_section, "text", None, true);

    answers::submit_answer(
        &mut db,
        &LogMailer,
        &alumni,
        exit_survey,
        &submission(exit_question, json!("done")),
    )
    .unwrap();
    assert_eq!(
        db.get_user_by_id("1901001").unwrap().unwrap().last_survey,
        "exit"
    );

    answers::submit_answer(
        &mut db,
        &LogMailer,
        &alumni,
        lv1_survey,
        &submission(lv1_question, json!("employed")),
    )
    .unwrap();
    assert_eq!(
        db.get_user_by_id("1901001").unwrap().unwrap().last_survey,
        "lv1"
    );

    // A later exit submission must not move the marker backward.
    answers::submit_answer(
        &mut db,
        &LogMailer,
        &alumni,
        exit_survey,
        &submission(exit_question, json!("revised")),
    )
    .unwrap();
    assert_eq!(
        db.get_user_by_id("1901001").unwrap().unwrap().last_survey,
        "lv1"
    );
}

#[test]
fn bulk_submission_reports_per_index_outcomes() {
    let mut db: SqlitePersistence = test_db();
    let alumni: AuthenticatedUser = seed_alumni(&mut db, "1901001", None);
    let (survey_id, section_id) = seed_survey_with_section(&mut db, "exit");
    let text_question: i64 = seed_question(&mut db, section_id, "text", None, true);
    let scale_question: i64 = seed_question(&mut db, section_id, "scale", None, true);

    let outcome = answers::submit_answers_bulk(
        &mut db,
        &LogMailer,
        &alumni,
        survey_id,
        &BulkAnswerRequest {
            answers: vec![
                submission(text_question, json!("stored")),
                submission(scale_question, json!(9)),
            ],
        },
    )
    .unwrap();

    assert_eq!(outcome.successes.len(), 1);
    assert_eq!(outcome.successes[0].index, 0);
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].index, 1);

    // The one stored answer still advances progression.
    assert_eq!(
        db.get_user_by_id("1901001").unwrap().unwrap().last_survey,
        "exit"
    );
}

#[test]
fn answering_an_overlay_question_requires_program_membership() {
    let mut db: SqlitePersistence = test_db();
    let (survey_id, _section_id) = seed_survey_with_section(&mut db, "exit");
    let own: i64 = seed_program_study(&mut db, "Informatika");
    let other: i64 = seed_program_study(&mut db, "Matematika");
    let member: AuthenticatedUser = seed_alumni(&mut db, "1901001", Some(own));
    let outsider: AuthenticatedUser = seed_alumni(&mut db, "1901002", Some(other));

    let program_question_id: i64 = db
        .create_program_question(
            survey_id,
            own,
            &tracer_persistence::NewQuestion {
                prompt: String::from("Lab equipment rating?"),
                question_kind: String::from("scale"),
                options: None,
                code: None,
                is_required: true,
                sort_order: 0,
            },
        )
        .unwrap();

    let overlay_submission = AnswerSubmission {
        question_id: None,
        program_question_id: Some(program_question_id),
        value: json!(4),
    };

    let stored: AnswerInfo =
        answers::submit_answer(&mut db, &LogMailer, &member, survey_id, &overlay_submission)
            .unwrap();
    assert_eq!(stored.program_question_id, Some(program_question_id));
    assert_eq!(stored.value, json!(4));

    let err: ApiError =
        answers::submit_answer(&mut db, &LogMailer, &outsider, survey_id, &overlay_submission)
            .unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized { .. }));
}

#[test]
fn listings_are_filtered_to_the_caller_scope() {
    let mut db: SqlitePersistence = test_db();
    let (survey_id, section_id) = seed_survey_with_section(&mut db, "exit");
    let question_id: i64 = seed_question(&mut db, section_id, "text", None, true);
    let program_study_id: i64 = seed_program_study(&mut db, "Informatika");

    let member: AuthenticatedUser = seed_alumni(&mut db, "1901001", Some(program_study_id));
    let outsider: AuthenticatedUser = seed_alumni(&mut db, "1901002", None);
    let admin: AuthenticatedUser = seed_global_actor(&mut db, "admin-1", RoleKind::Admin);
    let scoped: AuthenticatedUser = seed_scoped_actor(&mut db, "staff-2", program_study_id);

    answers::submit_answer(
        &mut db,
        &LogMailer,
        &member,
        survey_id,
        &submission(question_id, json!("from the member")),
    )
    .unwrap();
    answers::submit_answer(
        &mut db,
        &LogMailer,
        &outsider,
        survey_id,
        &submission(question_id, json!("from the outsider")),
    )
    .unwrap();

    assert_eq!(answers::list_answers(&mut db, &admin, survey_id).unwrap().len(), 2);

    let scoped_rows = answers::list_answers(&mut db, &scoped, survey_id).unwrap();
    assert_eq!(scoped_rows.len(), 1);
    assert_eq!(scoped_rows[0].user_id, "1901001");

    let own_rows = answers::list_answers(&mut db, &outsider, survey_id).unwrap();
    assert_eq!(own_rows.len(), 1);
    assert_eq!(own_rows[0].user_id, "1901002");

    let by_question = answers::list_answers_by_question(&mut db, &scoped, survey_id, question_id)
        .unwrap();
    assert_eq!(by_question.len(), 1);
    assert_eq!(by_question[0].user_id, "1901001");
}

#[test]
fn overlay_question_listings_are_scoped_and_checked() {
    let mut db: SqlitePersistence = test_db();
    let (survey_id, _section_id) = seed_survey_with_section(&mut db, "exit");
    let program_study_id: i64 = seed_program_study(&mut db, "Informatika");
    let member: AuthenticatedUser = seed_alumni(&mut db, "1901001", Some(program_study_id));
    let peer: AuthenticatedUser = seed_alumni(&mut db, "1901002", Some(program_study_id));
    let admin: AuthenticatedUser = seed_global_actor(&mut db, "admin-1", RoleKind::Admin);

    let program_question_id: i64 = db
        .create_program_question(
            survey_id,
            program_study_id,
            &tracer_persistence::NewQuestion {
                prompt: String::from("Lab equipment rating?"),
                question_kind: String::from("scale"),
                options: None,
                code: None,
                is_required: true,
                sort_order: 0,
            },
        )
        .unwrap();

    for (alumni, value) in [(&member, json!(4)), (&peer, json!(5))] {
        answers::submit_answer(
            &mut db,
            &LogMailer,
            alumni,
            survey_id,
            &AnswerSubmission {
                question_id: None,
                program_question_id: Some(program_question_id),
                value,
            },
        )
        .unwrap();
    }

    let all = answers::list_answers_by_program_question(
        &mut db,
        &admin,
        survey_id,
        program_study_id,
        program_question_id,
    )
    .unwrap();
    assert_eq!(all.len(), 2);

    let own = answers::list_answers_by_program_question(
        &mut db,
        &member,
        survey_id,
        program_study_id,
        program_question_id,
    )
    .unwrap();
    assert_eq!(own.len(), 1);
    assert_eq!(own[0].user_id, "1901001");
    assert_eq!(own[0].value, json!(4));

    // The overlay question must belong to the addressed program study.
    let other: i64 = seed_program_study(&mut db, "Matematika");
    let err: ApiError = answers::list_answers_by_program_question(
        &mut db,
        &admin,
        survey_id,
        other,
        program_question_id,
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::ResourceNotFound { .. }));
}

#[test]
fn reading_another_alumni_answer_is_denied() {
    let mut db: SqlitePersistence = test_db();
    let (survey_id, section_id) = seed_survey_with_section(&mut db, "exit");
    let question_id: i64 = seed_question(&mut db, section_id, "text", None, true);
    let owner: AuthenticatedUser = seed_alumni(&mut db, "1901001", None);
    let peer: AuthenticatedUser = seed_alumni(&mut db, "1901002", None);

    let stored: AnswerInfo = answers::submit_answer(
        &mut db,
        &LogMailer,
        &owner,
        survey_id,
        &submission(question_id, json!("private")),
    )
    .unwrap();

    answers::get_answer(&mut db, &owner, survey_id, stored.answer_id).unwrap();

    let err: ApiError =
        answers::get_answer(&mut db, &peer, survey_id, stored.answer_id).unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized { .. }));
}

#[test]
fn only_the_owner_may_update_an_answer() {
    let mut db: SqlitePersistence = test_db();
    let (survey_id, section_id) = seed_survey_with_section(&mut db, "exit");
    let question_id: i64 = seed_question(&mut db, section_id, "text", None, true);
    let owner: AuthenticatedUser = seed_alumni(&mut db, "1901001", None);
    let peer: AuthenticatedUser = seed_alumni(&mut db, "1901002", None);

    let stored: AnswerInfo = answers::submit_answer(
        &mut db,
        &LogMailer,
        &owner,
        survey_id,
        &submission(question_id, json!("original")),
    )
    .unwrap();

    let err: ApiError = answers::update_answer(
        &mut db,
        &peer,
        survey_id,
        stored.answer_id,
        &json!("hijacked"),
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized { .. }));

    let updated: AnswerInfo = answers::update_answer(
        &mut db,
        &owner,
        survey_id,
        stored.answer_id,
        &json!("revised"),
    )
    .unwrap();
    assert_eq!(updated.value, json!("revised"));
}

#[test]
fn admins_may_delete_any_answer_but_peers_may_not() {
    let mut db: SqlitePersistence = test_db();
    let (survey_id, section_id) = seed_survey_with_section(&mut db, "exit");
    let question_id: i64 = seed_question(&mut db, section_id, "text", None, true);
    let owner: AuthenticatedUser = seed_alumni(&mut db, "1901001", None);
    let peer: AuthenticatedUser = seed_alumni(&mut db, "1901002", None);
    let admin: AuthenticatedUser = seed_global_actor(&mut db, "admin-1", RoleKind::Admin);

    let stored: AnswerInfo = answers::submit_answer(
        &mut db,
        &LogMailer,
        &owner,
        survey_id,
        &submission(question_id, json!("to delete")),
    )
    .unwrap();

    let err: ApiError =
        answers::delete_answer(&mut db, &peer, survey_id, stored.answer_id).unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized { .. }));

    answers::delete_answer(&mut db, &admin, survey_id, stored.answer_id).unwrap();
    assert!(answers::list_answers(&mut db, &admin, survey_id).unwrap().is_empty());
}
