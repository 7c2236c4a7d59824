// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{
    create_test_question_input, create_test_user_input, seed_program_study,
    seed_survey_with_section,
};
use crate::{PersistenceError, SqlitePersistence};
use tracer_domain::AnswerTarget;

#[test]
fn resubmitting_an_answer_updates_in_place() {
    let mut db: SqlitePersistence = SqlitePersistence::new_in_memory().unwrap();

    let (survey_id, section_id) = seed_survey_with_section(&mut db, "exit");
    let question_id: i64 = db
        .create_question(
            section_id,
            &create_test_question_input("Feedback?", "text", true),
            &[],
        )
        .unwrap();
    db.create_user(&create_test_user_input("1901001")).unwrap();

    let first: i64 = db
        .upsert_answer(survey_id, "1901001", AnswerTarget::Question(question_id), "good")
        .unwrap();
    let second: i64 = db
        .upsert_answer(survey_id, "1901001", AnswerTarget::Question(question_id), "great")
        .unwrap();

    assert_eq!(first, second);

    let answers = db.list_answers_for_user(survey_id, "1901001").unwrap();
    assert_eq!(answers.len(), 1);
    assert_eq!(answers[0].value, "great");
}

#[test]
fn question_and_program_question_targets_are_distinct() {
    let mut db: SqlitePersistence = SqlitePersistence::new_in_memory().unwrap();

    let (survey_id, section_id) = seed_survey_with_section(&mut db, "exit");
    let program_study_id: i64 = seed_program_study(&mut db, "Informatika");
    let question_id: i64 = db
        .create_question(
            section_id,
            &create_test_question_input("Feedback?", "text", true),
            &[],
        )
        .unwrap();
    let program_question_id: i64 = db
        .create_program_question(
            survey_id,
            program_study_id,
            &create_test_question_input("Lab rating?", "scale", true),
        )
        .unwrap();
    db.create_user(&create_test_user_input("1901001")).unwrap();

    db.upsert_answer(survey_id, "1901001", AnswerTarget::Question(question_id), "fine")
        .unwrap();
    db.upsert_answer(
        survey_id,
        "1901001",
        AnswerTarget::ProgramQuestion(program_question_id),
        "4",
    )
    .unwrap();

    let answers = db.list_answers_for_user(survey_id, "1901001").unwrap();
    assert_eq!(answers.len(), 2);

    let overlay = answers
        .iter()
        .find(|a| a.program_question_id.is_some())
        .unwrap();
    assert_eq!(overlay.question_id, None);
    assert_eq!(overlay.value, "4");
}

#[test]
fn answers_list_by_overlay_question() {
    let mut db: SqlitePersistence = SqlitePersistence::new_in_memory().unwrap();

    let (survey_id, _section_id) = seed_survey_with_section(&mut db, "exit");
    let program_study_id: i64 = seed_program_study(&mut db, "Informatika");
    let program_question_id: i64 = db
        .create_program_question(
            survey_id,
            program_study_id,
            &create_test_question_input("Lab rating?", "scale", true),
        )
        .unwrap();
    let other_question_id: i64 = db
        .create_program_question(
            survey_id,
            program_study_id,
            &create_test_question_input("Library rating?", "scale", true),
        )
        .unwrap();
    db.create_user(&create_test_user_input("1901001")).unwrap();

    db.upsert_answer(
        survey_id,
        "1901001",
        AnswerTarget::ProgramQuestion(program_question_id),
        "4",
    )
    .unwrap();
    db.upsert_answer(
        survey_id,
        "1901001",
        AnswerTarget::ProgramQuestion(other_question_id),
        "2",
    )
    .unwrap();

    let listing = db
        .list_answers_by_program_question(survey_id, program_question_id)
        .unwrap();
    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0].value, "4");
    assert_eq!(listing[0].program_question_id, Some(program_question_id));
}

#[test]
fn answer_listing_scopes_by_program_study() {
    let mut db: SqlitePersistence = SqlitePersistence::new_in_memory().unwrap();

    let (survey_id, section_id) = seed_survey_with_section(&mut db, "exit");
    let program_study_id: i64 = seed_program_study(&mut db, "Informatika");
    let question_id: i64 = db
        .create_question(
            section_id,
            &create_test_question_input("Feedback?", "text", true),
            &[],
        )
        .unwrap();

    let mut insider = create_test_user_input("1901001");
    insider.program_study_id = Some(program_study_id);
    db.create_user(&insider).unwrap();
    db.create_user(&create_test_user_input("1901002")).unwrap();

    db.upsert_answer(survey_id, "1901001", AnswerTarget::Question(question_id), "in")
        .unwrap();
    db.upsert_answer(survey_id, "1901002", AnswerTarget::Question(question_id), "out")
        .unwrap();

    let all = db.list_answers_for_survey(survey_id).unwrap();
    assert_eq!(all.len(), 2);

    let scoped = db
        .list_answers_for_survey_by_program(survey_id, program_study_id)
        .unwrap();
    assert_eq!(scoped.len(), 1);
    assert_eq!(scoped[0].user_id, "1901001");
}

#[test]
fn reminder_counts_track_required_questions_only() {
    let mut db: SqlitePersistence = SqlitePersistence::new_in_memory().unwrap();

    let (survey_id, section_id) = seed_survey_with_section(&mut db, "exit");
    let required: i64 = db
        .create_question(
            section_id,
            &create_test_question_input("Required one", "text", true),
            &[],
        )
        .unwrap();
    db.create_question(
        section_id,
        &create_test_question_input("Optional one", "text", false),
        &[],
    )
    .unwrap();
    let required_two: i64 = db
        .create_question(
            section_id,
            &create_test_question_input("Required two", "text", true),
            &[],
        )
        .unwrap();
    db.create_user(&create_test_user_input("1901001")).unwrap();

    assert_eq!(db.count_required_questions(survey_id).unwrap(), 2);
    assert_eq!(db.count_required_answers(survey_id, "1901001").unwrap(), 0);

    db.upsert_answer(survey_id, "1901001", AnswerTarget::Question(required), "a")
        .unwrap();
    assert_eq!(db.count_required_answers(survey_id, "1901001").unwrap(), 1);

    db.upsert_answer(survey_id, "1901001", AnswerTarget::Question(required_two), "b")
        .unwrap();
    assert_eq!(db.count_required_answers(survey_id, "1901001").unwrap(), 2);
}

#[test]
fn delete_answer_then_lookup_fails() {
    let mut db: SqlitePersistence = SqlitePersistence::new_in_memory().unwrap();

    let (survey_id, section_id) = seed_survey_with_section(&mut db, "exit");
    let question_id: i64 = db
        .create_question(
            section_id,
            &create_test_question_input("Feedback?", "text", true),
            &[],
        )
        .unwrap();
    db.create_user(&create_test_user_input("1901001")).unwrap();

    let answer_id: i64 = db
        .upsert_answer(survey_id, "1901001", AnswerTarget::Question(question_id), "x")
        .unwrap();

    db.delete_answer(answer_id).unwrap();
    assert!(db.get_answer(answer_id).unwrap().is_none());
    assert!(matches!(
        db.delete_answer(answer_id),
        Err(PersistenceError::NotFound(_))
    ));
}
