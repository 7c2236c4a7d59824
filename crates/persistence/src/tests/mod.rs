// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

mod answer_tests;
mod survey_tests;
mod user_tests;

use crate::data_models::{NewQuestion, NewSection, NewSurvey, NewUser};
use crate::SqlitePersistence;

pub fn create_test_user_input(user_id: &str) -> NewUser {
    NewUser {
        user_id: user_id.to_string(),
        full_name: format!("Test User {user_id}"),
        email: Some(format!("{user_id}@example.edu")),
        password: String::from("correct-horse-battery"),
        role_id: None,
        program_study_id: None,
        address: None,
        phone_number: None,
    }
}

pub fn create_test_survey_input(kind: &str) -> NewSurvey {
    NewSurvey {
        title: format!("{kind} survey"),
        description: None,
        survey_kind: kind.to_string(),
        is_active: true,
        period_id: None,
        created_by: None,
        start_at: None,
        end_at: None,
    }
}

pub fn create_test_question_input(prompt: &str, kind: &str, required: bool) -> NewQuestion {
    NewQuestion {
        prompt: prompt.to_string(),
        question_kind: kind.to_string(),
        options: None,
        code: None,
        is_required: required,
        sort_order: 0,
    }
}

/// Seeds a survey with one section and returns (survey_id, section_id).
pub fn seed_survey_with_section(db: &mut SqlitePersistence, kind: &str) -> (i64, i64) {
    let survey_id: i64 = db.create_survey(&create_test_survey_input(kind)).unwrap();
    let section_id: i64 = db
        .create_section(
            survey_id,
            &NewSection {
                title: String::from("Section A"),
                description: None,
                sort_order: 0,
            },
        )
        .unwrap();
    (survey_id, section_id)
}

/// Seeds a faculty, department, and program study; returns the program
/// study ID.
pub fn seed_program_study(db: &mut SqlitePersistence, name: &str) -> i64 {
    let faculty_id: i64 = db.create_faculty("Engineering").unwrap();
    let department_id: i64 = db.create_department(faculty_id, "Computing").unwrap();
    db.create_program_study(department_id, name).unwrap()
}

#[test]
fn persistence_initializes_in_memory() {
    let result: Result<SqlitePersistence, crate::error::PersistenceError> =
        SqlitePersistence::new_in_memory();
    assert!(result.is_ok());
}

#[test]
fn in_memory_instances_are_isolated() {
    let mut db1: SqlitePersistence = SqlitePersistence::new_in_memory().unwrap();
    let mut db2: SqlitePersistence = SqlitePersistence::new_in_memory().unwrap();

    db1.create_user(&create_test_user_input("1901001")).unwrap();

    assert_eq!(db1.list_users().unwrap().len(), 1);
    assert_eq!(db2.list_users().unwrap().len(), 0);
}

#[test]
fn config_entries_enforce_unique_keys() {
    let mut db: SqlitePersistence = SqlitePersistence::new_in_memory().unwrap();

    let config_id: i64 = db
        .create_config_entry("supervisor_email_question_code", "supervisor_email")
        .unwrap();

    assert_eq!(
        db.get_config_value("supervisor_email_question_code")
            .unwrap()
            .as_deref(),
        Some("supervisor_email")
    );

    let duplicate = db.create_config_entry("supervisor_email_question_code", "other");
    assert!(matches!(
        duplicate,
        Err(crate::PersistenceError::Conflict(_))
    ));

    db.update_config_entry(config_id, "supervisor_email_question_code", "email_q")
        .unwrap();
    assert_eq!(
        db.get_config_value("supervisor_email_question_code")
            .unwrap()
            .as_deref(),
        Some("email_q")
    );

    db.delete_config_entry(config_id).unwrap();
    assert!(
        db.get_config_value("supervisor_email_question_code")
            .unwrap()
            .is_none()
    );
}

#[test]
fn migrations_applied_on_initialization() {
    // If migrations didn't run, the schema wouldn't exist and this would fail
    let mut db: SqlitePersistence = SqlitePersistence::new_in_memory().unwrap();

    assert!(db.list_surveys().is_ok());
    assert!(db.list_roles().is_ok());
    assert!(db.list_config_entries().is_ok());
}
