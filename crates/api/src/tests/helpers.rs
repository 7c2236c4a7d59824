// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shared fixtures for API tests.

use std::sync::Mutex;

use tracer_domain::RoleKind;
use tracer_persistence::{NewQuestion, NewSection, NewSurvey, NewUser, SqlitePersistence};

use crate::auth::AuthenticatedUser;
use crate::mail::{MailError, MailMessage, Mailer};

/// A mailer that records every message instead of delivering it.
pub struct RecordingMailer {
    sent: Mutex<Vec<MailMessage>>,
    fail: bool,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    /// A mailer whose every send fails.
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<MailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

impl Mailer for RecordingMailer {
    fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        if self.fail {
            return Err(MailError {
                message: String::from("transport down"),
            });
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

pub fn test_db() -> SqlitePersistence {
    SqlitePersistence::new_in_memory().unwrap()
}

/// Creates a user holding a global role and returns them as an
/// authenticated caller. The role row is provisioned on first use.
pub fn seed_global_actor(
    db: &mut SqlitePersistence,
    user_id: &str,
    kind: RoleKind,
) -> AuthenticatedUser {
    let role_id: i64 = match db.get_role_by_name(kind.kind_name()).unwrap() {
        Some(role) => role.role_id,
        None => db.create_role(kind.kind_name(), None).unwrap(),
    };
    seed_user(db, user_id, Some(role_id), None);
    AuthenticatedUser::new(user_id.to_string(), full_name_for(user_id), Some(kind))
}

/// Creates an alumni user, optionally affiliated with a program study.
pub fn seed_alumni(
    db: &mut SqlitePersistence,
    user_id: &str,
    program_study_id: Option<i64>,
) -> AuthenticatedUser {
    let role_id: i64 = match db.get_role_by_name(RoleKind::Alumni.kind_name()).unwrap() {
        Some(role) => role.role_id,
        None => db.create_role(RoleKind::Alumni.kind_name(), None).unwrap(),
    };
    seed_user(db, user_id, Some(role_id), program_study_id);
    AuthenticatedUser::new(
        user_id.to_string(),
        full_name_for(user_id),
        Some(RoleKind::Alumni),
    )
}

/// Creates a user holding the auto-provisioned role of a program study.
pub fn seed_scoped_actor(
    db: &mut SqlitePersistence,
    user_id: &str,
    program_study_id: i64,
) -> AuthenticatedUser {
    let role = db
        .find_role_for_program_study(program_study_id)
        .unwrap()
        .unwrap();
    seed_user(db, user_id, Some(role.role_id), Some(program_study_id));
    AuthenticatedUser::new(
        user_id.to_string(),
        full_name_for(user_id),
        Some(RoleKind::ProgramScoped { program_study_id }),
    )
}

/// Seeds a faculty and department and returns a fresh program study ID.
pub fn seed_program_study(db: &mut SqlitePersistence, name: &str) -> i64 {
    let faculty_id: i64 = db.create_faculty(&format!("Faculty of {name}")).unwrap();
    let department_id: i64 = db
        .create_department(faculty_id, &format!("Department of {name}"))
        .unwrap();
    db.create_program_study(department_id, name).unwrap()
}

/// Seeds an active survey with one section and returns
/// (survey_id, section_id).
pub fn seed_survey_with_section(db: &mut SqlitePersistence, kind: &str) -> (i64, i64) {
    let survey_id: i64 = db
        .create_survey(&NewSurvey {
            title: format!("{kind} survey"),
            description: None,
            survey_kind: kind.to_string(),
            is_active: true,
            period_id: None,
            created_by: None,
            start_at: None,
            end_at: None,
        })
        .unwrap();
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

/// Seeds a question directly through the persistence layer.
pub fn seed_question(
    db: &mut SqlitePersistence,
    section_id: i64,
    kind: &str,
    options: Option<&str>,
    required: bool,
) -> i64 {
    db.create_question(
        section_id,
        &NewQuestion {
            prompt: format!("A {kind} question"),
            question_kind: kind.to_string(),
            options: options.map(str::to_string),
            code: None,
            is_required: required,
            sort_order: 0,
        },
        &[],
    )
    .unwrap()
}

fn seed_user(
    db: &mut SqlitePersistence,
    user_id: &str,
    role_id: Option<i64>,
    program_study_id: Option<i64>,
) {
    db.create_user(&NewUser {
        user_id: user_id.to_string(),
        full_name: full_name_for(user_id),
        email: Some(format!("{user_id}@example.edu")),
        password: String::from("Sunny-day-42"),
        role_id,
        program_study_id,
        address: None,
        phone_number: None,
    })
    .unwrap();
}

fn full_name_for(user_id: &str) -> String {
    format!("Test User {user_id}")
}
