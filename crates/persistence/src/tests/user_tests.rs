// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::create_test_user_input;
use crate::data_models::UserChanges;
use crate::{PersistenceError, SqlitePersistence, UserData};

#[test]
fn create_and_get_user() {
    let mut db: SqlitePersistence = SqlitePersistence::new_in_memory().unwrap();

    db.create_user(&create_test_user_input("1901001")).unwrap();

    let user: UserData = db.get_user_by_id("1901001").unwrap().unwrap();
    assert_eq!(user.full_name, "Test User 1901001");
    assert_eq!(user.last_survey, "none");
    // The stored hash must never be the plain-text password.
    assert_ne!(user.password_hash, "correct-horse-battery");
    assert!(bcrypt::verify("correct-horse-battery", &user.password_hash).unwrap());
}

#[test]
fn duplicate_user_id_is_a_conflict() {
    let mut db: SqlitePersistence = SqlitePersistence::new_in_memory().unwrap();

    db.create_user(&create_test_user_input("1901001")).unwrap();
    let result = db.create_user(&create_test_user_input("1901001"));

    assert!(matches!(result, Err(PersistenceError::Conflict(_))));
}

#[test]
fn update_user_profile_fields() {
    let mut db: SqlitePersistence = SqlitePersistence::new_in_memory().unwrap();

    db.create_user(&create_test_user_input("1901001")).unwrap();
    db.update_user(
        "1901001",
        &UserChanges {
            full_name: String::from("Renamed"),
            email: None,
            role_id: None,
            program_study_id: None,
            address: Some(String::from("Jl. Sudirman 1")),
            phone_number: None,
        },
    )
    .unwrap();

    let user: UserData = db.get_user_by_id("1901001").unwrap().unwrap();
    assert_eq!(user.full_name, "Renamed");
    assert_eq!(user.address.as_deref(), Some("Jl. Sudirman 1"));
    assert_eq!(user.email, None);
}

#[test]
fn update_missing_user_reports_not_found() {
    let mut db: SqlitePersistence = SqlitePersistence::new_in_memory().unwrap();

    let result = db.update_last_survey("9999999", "exit");
    assert!(matches!(result, Err(PersistenceError::UserNotFound(_))));
}

#[test]
fn last_survey_marker_round_trips() {
    let mut db: SqlitePersistence = SqlitePersistence::new_in_memory().unwrap();

    db.create_user(&create_test_user_input("1901001")).unwrap();
    db.update_last_survey("1901001", "lv1").unwrap();

    let user: UserData = db.get_user_by_id("1901001").unwrap().unwrap();
    assert_eq!(user.last_survey, "lv1");
}

#[test]
fn session_lifecycle() {
    let mut db: SqlitePersistence = SqlitePersistence::new_in_memory().unwrap();

    db.create_user(&create_test_user_input("1901001")).unwrap();
    db.create_session("token-abc", "1901001", "2027-01-01T00:00:00Z")
        .unwrap();

    let session = db.get_session_by_token("token-abc").unwrap().unwrap();
    assert_eq!(session.user_id, "1901001");
    assert_eq!(session.expires_at, "2027-01-01T00:00:00Z");

    db.extend_session("token-abc", "2027-06-01T00:00:00Z").unwrap();
    let session = db.get_session_by_token("token-abc").unwrap().unwrap();
    assert_eq!(session.expires_at, "2027-06-01T00:00:00Z");

    db.delete_session("token-abc").unwrap();
    assert!(db.get_session_by_token("token-abc").unwrap().is_none());
}

#[test]
fn session_requires_an_existing_user() {
    let mut db: SqlitePersistence = SqlitePersistence::new_in_memory().unwrap();

    // Foreign keys are enforced, so a session for a missing user fails.
    let result = db.create_session("token-abc", "9999999", "2027-01-01T00:00:00Z");
    assert!(result.is_err());
}

#[test]
fn a_password_reset_token_redeems_exactly_once() {
    let mut db: SqlitePersistence = SqlitePersistence::new_in_memory().unwrap();

    db.create_user(&create_test_user_input("1901001")).unwrap();
    db.create_password_reset("reset-1", "1901001", "2027-01-01T00:00:00Z")
        .unwrap();

    let reset = db.redeem_password_reset("reset-1").unwrap();
    assert_eq!(reset.user_id, "1901001");
    assert!(reset.is_used);

    let second = db.redeem_password_reset("reset-1");
    assert!(matches!(second, Err(PersistenceError::TokenAlreadyUsed(_))));

    let unknown = db.redeem_password_reset("no-such-reset");
    assert!(matches!(unknown, Err(PersistenceError::TokenNotFound(_))));
}

#[test]
fn roles_round_trip_with_scope() {
    let mut db: SqlitePersistence = SqlitePersistence::new_in_memory().unwrap();

    let admin_id: i64 = db.create_role("Admin", None).unwrap();
    let role = db.get_role(admin_id).unwrap().unwrap();
    assert_eq!(role.name, "Admin");
    assert_eq!(role.program_study_id, None);

    assert!(db.get_role_by_name("Admin").unwrap().is_some());
    assert!(db.get_role_by_name("Tracer").unwrap().is_none());
}

#[test]
fn deleting_a_role_leaves_users_unroled() {
    let mut db: SqlitePersistence = SqlitePersistence::new_in_memory().unwrap();

    let role_id: i64 = db.create_role("Alumni", None).unwrap();
    let mut input = create_test_user_input("1901001");
    input.role_id = Some(role_id);
    db.create_user(&input).unwrap();

    db.delete_role(role_id).unwrap();

    // ON DELETE SET NULL: the user survives without a role.
    let user: UserData = db.get_user_by_id("1901001").unwrap().unwrap();
    assert_eq!(user.role_id, None);
}
