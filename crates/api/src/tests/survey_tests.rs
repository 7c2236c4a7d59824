// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use tracer_domain::RoleKind;
use tracer_persistence::SqlitePersistence;

use super::helpers::{
    seed_global_actor, seed_program_study, seed_scoped_actor, seed_survey_with_section, test_db,
};
use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::request_response::{
    BranchPayload, QuestionPayload, SectionPayload, SurveyPayload,
};
use crate::surveys;

fn survey_payload(kind: &str) -> SurveyPayload {
    SurveyPayload {
        title: String::from("Graduate exit survey"),
        description: None,
        survey_kind: kind.to_string(),
        is_active: true,
        period_id: None,
        start_at: None,
        end_at: None,
    }
}

fn question_payload(kind: &str, options: Option<Vec<String>>) -> QuestionPayload {
    QuestionPayload {
        prompt: String::from("How satisfied are you?"),
        question_kind: kind.to_string(),
        options,
        code: None,
        is_required: true,
        sort_order: 0,
        branches: Vec::new(),
    }
}

#[test]
fn a_tracer_can_author_a_survey_with_sections_and_questions() {
    let mut db: SqlitePersistence = test_db();
    let tracer: AuthenticatedUser = seed_global_actor(&mut db, "staff-1", RoleKind::Tracer);

    let survey_id: i64 = surveys::create_survey(&mut db, &tracer, &survey_payload("exit")).unwrap();
    let section_id: i64 = surveys::create_section(
        &mut db,
        &tracer,
        survey_id,
        &SectionPayload {
            title: String::from("Employment"),
            description: None,
            sort_order: 0,
        },
    )
    .unwrap();

    let question_id: i64 = surveys::create_question(
        &mut db,
        &tracer,
        survey_id,
        section_id,
        &question_payload("text", None),
    )
    .unwrap();

    let info = surveys::get_question(&mut db, survey_id, section_id, question_id).unwrap();
    assert_eq!(info.question.prompt, "How satisfied are you?");
    assert!(info.branches.is_empty());

    let stored = surveys::get_survey(&mut db, survey_id).unwrap();
    assert_eq!(stored.created_by.as_deref(), Some("staff-1"));
}

#[test]
fn an_alumni_cannot_author_surveys() {
    let mut db: SqlitePersistence = test_db();
    let alumni: AuthenticatedUser = seed_global_actor(&mut db, "1901001", RoleKind::Alumni);

    let err: ApiError =
        surveys::create_survey(&mut db, &alumni, &survey_payload("exit")).unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized { .. }));
}

#[test]
fn an_unknown_survey_kind_is_rejected() {
    let mut db: SqlitePersistence = test_db();
    let tracer: AuthenticatedUser = seed_global_actor(&mut db, "staff-1", RoleKind::Tracer);

    let err: ApiError =
        surveys::create_survey(&mut db, &tracer, &survey_payload("census")).unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput { ref field, .. } if field == "survey_kind"));
}

#[test]
fn a_malformed_window_timestamp_is_rejected() {
    let mut db: SqlitePersistence = test_db();
    let tracer: AuthenticatedUser = seed_global_actor(&mut db, "staff-1", RoleKind::Tracer);

    let mut payload: SurveyPayload = survey_payload("exit");
    payload.start_at = Some(String::from("next tuesday"));

    let err: ApiError = surveys::create_survey(&mut db, &tracer, &payload).unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput { ref field, .. } if field == "start_at"));
}

#[test]
fn updating_a_survey_preserves_its_creator() {
    let mut db: SqlitePersistence = test_db();
    let tracer: AuthenticatedUser = seed_global_actor(&mut db, "staff-1", RoleKind::Tracer);
    let admin: AuthenticatedUser = seed_global_actor(&mut db, "admin-1", RoleKind::Admin);

    let survey_id: i64 = surveys::create_survey(&mut db, &tracer, &survey_payload("exit")).unwrap();

    let mut payload: SurveyPayload = survey_payload("exit");
    payload.title = String::from("Revised exit survey");
    surveys::update_survey(&mut db, &admin, survey_id, &payload).unwrap();

    let stored = surveys::get_survey(&mut db, survey_id).unwrap();
    assert_eq!(stored.title, "Revised exit survey");
    assert_eq!(stored.created_by.as_deref(), Some("staff-1"));
}

#[test]
fn option_lists_are_stored_in_canonical_json() {
    let mut db: SqlitePersistence = test_db();
    let tracer: AuthenticatedUser = seed_global_actor(&mut db, "staff-1", RoleKind::Tracer);
    let (survey_id, section_id) = seed_survey_with_section(&mut db, "exit");

    let question_id: i64 = surveys::create_question(
        &mut db,
        &tracer,
        survey_id,
        section_id,
        &question_payload(
            "radio",
            Some(vec![String::from("Yes"), String::from("No")]),
        ),
    )
    .unwrap();

    let info = surveys::get_question(&mut db, survey_id, section_id, question_id).unwrap();
    assert_eq!(info.question.options.as_deref(), Some(r#"["Yes","No"]"#));
}

#[test]
fn branches_are_only_allowed_on_radio_questions() {
    let mut db: SqlitePersistence = test_db();
    let tracer: AuthenticatedUser = seed_global_actor(&mut db, "staff-1", RoleKind::Tracer);
    let (survey_id, section_id) = seed_survey_with_section(&mut db, "exit");

    let mut payload: QuestionPayload = question_payload("text", None);
    payload.branches = vec![BranchPayload {
        answer_value: String::from("Yes"),
        next_section_id: section_id,
    }];

    let err: ApiError =
        surveys::create_question(&mut db, &tracer, survey_id, section_id, &payload).unwrap_err();
    assert!(
        matches!(err, ApiError::DomainRuleViolation { ref rule, .. } if rule == "branch_on_radio")
    );
}

#[test]
fn a_branch_trigger_must_be_a_declared_option() {
    let mut db: SqlitePersistence = test_db();
    let tracer: AuthenticatedUser = seed_global_actor(&mut db, "staff-1", RoleKind::Tracer);
    let (survey_id, section_id) = seed_survey_with_section(&mut db, "exit");

    let mut payload: QuestionPayload = question_payload(
        "radio",
        Some(vec![String::from("Yes"), String::from("No")]),
    );
    payload.branches = vec![BranchPayload {
        answer_value: String::from("Maybe"),
        next_section_id: section_id,
    }];

    let err: ApiError =
        surveys::create_question(&mut db, &tracer, survey_id, section_id, &payload).unwrap_err();
    assert!(
        matches!(err, ApiError::DomainRuleViolation { ref rule, .. } if rule == "branch_value_in_options")
    );
}

#[test]
fn a_branch_target_must_be_a_section_of_the_same_survey() {
    let mut db: SqlitePersistence = test_db();
    let tracer: AuthenticatedUser = seed_global_actor(&mut db, "staff-1", RoleKind::Tracer);
    let (survey_id, section_id) = seed_survey_with_section(&mut db, "exit");
    let (_other_survey, other_section) = seed_survey_with_section(&mut db, "lv1");

    let mut payload: QuestionPayload = question_payload(
        "radio",
        Some(vec![String::from("Yes"), String::from("No")]),
    );
    payload.branches = vec![BranchPayload {
        answer_value: String::from("Yes"),
        next_section_id: other_section,
    }];

    let err: ApiError =
        surveys::create_question(&mut db, &tracer, survey_id, section_id, &payload).unwrap_err();
    assert!(
        matches!(err, ApiError::DomainRuleViolation { ref rule, .. } if rule == "branch_target_in_survey")
    );
}

#[test]
fn a_valid_branch_is_stored_with_the_question() {
    let mut db: SqlitePersistence = test_db();
    let tracer: AuthenticatedUser = seed_global_actor(&mut db, "staff-1", RoleKind::Tracer);
    let (survey_id, section_id) = seed_survey_with_section(&mut db, "exit");
    let follow_up: i64 = surveys::create_section(
        &mut db,
        &tracer,
        survey_id,
        &SectionPayload {
            title: String::from("Follow up"),
            description: None,
            sort_order: 1,
        },
    )
    .unwrap();

    let mut payload: QuestionPayload = question_payload(
        "radio",
        Some(vec![String::from("Yes"), String::from("No")]),
    );
    payload.branches = vec![BranchPayload {
        answer_value: String::from("Yes"),
        next_section_id: follow_up,
    }];

    let question_id: i64 =
        surveys::create_question(&mut db, &tracer, survey_id, section_id, &payload).unwrap();

    let info = surveys::get_question(&mut db, survey_id, section_id, question_id).unwrap();
    assert_eq!(info.branches.len(), 1);
    assert_eq!(info.branches[0].answer_value, "Yes");
    assert_eq!(info.branches[0].next_section_id, follow_up);
}

#[test]
fn a_section_of_another_survey_is_not_found() {
    let mut db: SqlitePersistence = test_db();
    let tracer: AuthenticatedUser = seed_global_actor(&mut db, "staff-1", RoleKind::Tracer);
    let (survey_id, _section_id) = seed_survey_with_section(&mut db, "exit");
    let (_other_survey, other_section) = seed_survey_with_section(&mut db, "lv1");

    let err: ApiError = surveys::create_question(
        &mut db,
        &tracer,
        survey_id,
        other_section,
        &question_payload("text", None),
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::ResourceNotFound { .. }));
}

#[test]
fn a_program_team_may_only_touch_its_own_overlay() {
    let mut db: SqlitePersistence = test_db();
    let (survey_id, _section_id) = seed_survey_with_section(&mut db, "exit");
    let own: i64 = seed_program_study(&mut db, "Informatika");
    let other: i64 = seed_program_study(&mut db, "Matematika");
    let scoped: AuthenticatedUser = seed_scoped_actor(&mut db, "staff-2", own);

    let program_question_id: i64 = surveys::create_program_question(
        &mut db,
        &scoped,
        survey_id,
        own,
        &question_payload("text", None),
    )
    .unwrap();
    assert!(program_question_id > 0);

    let err: ApiError = surveys::create_program_question(
        &mut db,
        &scoped,
        survey_id,
        other,
        &question_payload("text", None),
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized { .. }));
}

#[test]
fn overlay_questions_may_not_declare_branches() {
    let mut db: SqlitePersistence = test_db();
    let tracer: AuthenticatedUser = seed_global_actor(&mut db, "staff-1", RoleKind::Tracer);
    let (survey_id, section_id) = seed_survey_with_section(&mut db, "exit");
    let program_study_id: i64 = seed_program_study(&mut db, "Informatika");

    let mut payload: QuestionPayload = question_payload(
        "radio",
        Some(vec![String::from("Yes"), String::from("No")]),
    );
    payload.branches = vec![BranchPayload {
        answer_value: String::from("Yes"),
        next_section_id: section_id,
    }];

    let err: ApiError = surveys::create_program_question(
        &mut db,
        &tracer,
        survey_id,
        program_study_id,
        &payload,
    )
    .unwrap_err();
    assert!(
        matches!(err, ApiError::DomainRuleViolation { ref rule, .. } if rule == "no_overlay_branches")
    );
}

#[test]
fn deleting_a_question_removes_it_from_the_section() {
    let mut db: SqlitePersistence = test_db();
    let tracer: AuthenticatedUser = seed_global_actor(&mut db, "staff-1", RoleKind::Tracer);
    let (survey_id, section_id) = seed_survey_with_section(&mut db, "exit");

    let question_id: i64 = surveys::create_question(
        &mut db,
        &tracer,
        survey_id,
        section_id,
        &question_payload("text", None),
    )
    .unwrap();

    surveys::delete_question(&mut db, &tracer, survey_id, section_id, question_id).unwrap();

    let remaining = surveys::list_questions(&mut db, survey_id, section_id).unwrap();
    assert!(remaining.is_empty());
}
