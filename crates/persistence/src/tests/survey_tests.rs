// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{
    create_test_question_input, create_test_survey_input, seed_program_study,
    seed_survey_with_section,
};
use crate::data_models::{NewBranch, NewSection};
use crate::{PersistenceError, SqlitePersistence};

#[test]
fn survey_crud_round_trips() {
    let mut db: SqlitePersistence = SqlitePersistence::new_in_memory().unwrap();

    let survey_id: i64 = db.create_survey(&create_test_survey_input("exit")).unwrap();

    let survey = db.get_survey(survey_id).unwrap().unwrap();
    assert_eq!(survey.survey_kind, "exit");
    assert!(survey.is_active);

    let mut changes = create_test_survey_input("exit");
    changes.is_active = false;
    changes.title = String::from("Exit survey 2026");
    db.update_survey(survey_id, &changes).unwrap();

    let survey = db.get_survey(survey_id).unwrap().unwrap();
    assert!(!survey.is_active);
    assert_eq!(survey.title, "Exit survey 2026");

    db.delete_survey(survey_id).unwrap();
    assert!(db.get_survey(survey_id).unwrap().is_none());
}

#[test]
fn deleting_a_survey_cascades_to_sections_and_questions() {
    let mut db: SqlitePersistence = SqlitePersistence::new_in_memory().unwrap();

    let (survey_id, section_id) = seed_survey_with_section(&mut db, "exit");
    let question_id: i64 = db
        .create_question(
            section_id,
            &create_test_question_input("How satisfied are you?", "scale", true),
            &[],
        )
        .unwrap();

    db.delete_survey(survey_id).unwrap();

    assert!(db.get_section(section_id).unwrap().is_none());
    assert!(db.get_question(question_id).unwrap().is_none());
}

#[test]
fn sections_list_in_sort_order() {
    let mut db: SqlitePersistence = SqlitePersistence::new_in_memory().unwrap();

    let survey_id: i64 = db.create_survey(&create_test_survey_input("exit")).unwrap();
    for (title, sort_order) in [("Second", 2), ("First", 1)] {
        db.create_section(
            survey_id,
            &NewSection {
                title: title.to_string(),
                description: None,
                sort_order,
            },
        )
        .unwrap();
    }

    let sections = db.list_sections(survey_id).unwrap();
    assert_eq!(sections[0].title, "First");
    assert_eq!(sections[1].title, "Second");
}

#[test]
fn question_branches_replace_wholesale_on_update() {
    let mut db: SqlitePersistence = SqlitePersistence::new_in_memory().unwrap();

    let (survey_id, section_id) = seed_survey_with_section(&mut db, "exit");
    let follow_up: i64 = db
        .create_section(
            survey_id,
            &NewSection {
                title: String::from("Employment details"),
                description: None,
                sort_order: 1,
            },
        )
        .unwrap();

    let mut question = create_test_question_input("Current status?", "radio", true);
    question.options = Some(String::from(r#"["Employed","Searching"]"#));

    let question_id: i64 = db
        .create_question(
            section_id,
            &question,
            &[NewBranch {
                answer_value: String::from("Employed"),
                next_section_id: follow_up,
            }],
        )
        .unwrap();

    assert_eq!(db.list_branches(question_id).unwrap().len(), 1);

    db.update_question(
        question_id,
        &question,
        &[
            NewBranch {
                answer_value: String::from("Employed"),
                next_section_id: follow_up,
            },
            NewBranch {
                answer_value: String::from("Searching"),
                next_section_id: follow_up,
            },
        ],
    )
    .unwrap();

    let branches = db.list_branches(question_id).unwrap();
    assert_eq!(branches.len(), 2);
    assert_eq!(branches[0].answer_value, "Employed");
    assert_eq!(branches[1].answer_value, "Searching");

    db.update_question(question_id, &question, &[]).unwrap();
    assert!(db.list_branches(question_id).unwrap().is_empty());
}

#[test]
fn find_question_by_code_scopes_to_the_survey() {
    let mut db: SqlitePersistence = SqlitePersistence::new_in_memory().unwrap();

    let (survey_id, section_id) = seed_survey_with_section(&mut db, "lv1");
    let (other_survey_id, other_section_id) = seed_survey_with_section(&mut db, "exit");

    let mut question = create_test_question_input("Supervisor email?", "text", true);
    question.code = Some(String::from("supervisor_email"));
    db.create_question(section_id, &question, &[]).unwrap();
    db.create_question(other_section_id, &create_test_question_input("Other", "text", false), &[])
        .unwrap();

    assert!(
        db.find_question_by_code(survey_id, "supervisor_email")
            .unwrap()
            .is_some()
    );
    assert!(
        db.find_question_by_code(other_survey_id, "supervisor_email")
            .unwrap()
            .is_none()
    );
}

#[test]
fn supervisor_survey_prefers_newest_active_skp() {
    let mut db: SqlitePersistence = SqlitePersistence::new_in_memory().unwrap();

    assert!(db.find_supervisor_survey().unwrap().is_none());

    let mut inactive = create_test_survey_input("skp");
    inactive.is_active = false;
    let inactive_id: i64 = db.create_survey(&inactive).unwrap();

    // Only an inactive skp survey exists: fall back to it.
    assert_eq!(
        db.find_supervisor_survey().unwrap().unwrap().survey_id,
        inactive_id
    );

    let _older_active_id: i64 = db.create_survey(&create_test_survey_input("skp")).unwrap();
    let newest_active_id: i64 = db.create_survey(&create_test_survey_input("skp")).unwrap();

    assert_eq!(
        db.find_supervisor_survey().unwrap().unwrap().survey_id,
        newest_active_id
    );
}

#[test]
fn program_questions_scope_to_survey_and_program() {
    let mut db: SqlitePersistence = SqlitePersistence::new_in_memory().unwrap();

    let (survey_id, _) = seed_survey_with_section(&mut db, "exit");
    let program_study_id: i64 = seed_program_study(&mut db, "Informatika");

    let program_question_id: i64 = db
        .create_program_question(
            survey_id,
            program_study_id,
            &create_test_question_input("Lab facilities rating?", "scale", false),
        )
        .unwrap();

    let listed = db
        .list_program_questions(survey_id, program_study_id)
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].program_question_id, program_question_id);

    assert!(
        db.list_program_questions(survey_id, program_study_id + 1)
            .unwrap()
            .is_empty()
    );
}

#[test]
fn missing_rows_report_not_found_on_update() {
    let mut db: SqlitePersistence = SqlitePersistence::new_in_memory().unwrap();

    let result = db.update_survey(404, &create_test_survey_input("exit"));
    assert!(matches!(result, Err(PersistenceError::NotFound(_))));

    let result = db.delete_question(404);
    assert!(matches!(result, Err(PersistenceError::NotFound(_))));
}
