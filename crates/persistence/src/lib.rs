// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the Tracer Study Platform.
//!
//! This crate provides `SQLite` persistence for users, sessions,
//! organizational units, surveys, answers, supervisor tokens, and system
//! configuration. It is built on Diesel with embedded migrations.
//!
//! ## Layout
//!
//! - `queries` — Read-only lookups, scoped listings, and counts
//! - `mutations` — Inserts, updates, upserts, and deletes
//! - `connection` — Connection setup, PRAGMAs, and migration execution
//!
//! All domain rules (role taxonomy, answer validation, progression) live in
//! `tracer-domain`; this crate stores and retrieves their string encodings.
//!
//! ## Testing
//!
//! Unit tests run against isolated in-memory databases. Each call to
//! [`SqlitePersistence::new_in_memory`] receives a unique shared-cache
//! database name from an atomic counter, so parallel tests never collide.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use tracer_domain::AnswerTarget;

mod connection;
mod data_models;
mod error;
mod mutations;
mod queries;
mod schema;

#[cfg(test)]
mod tests;

pub use data_models::{
    AnswerData, BranchData, ConfigEntryData, DepartmentData, FacultyData, NewBranch, NewQuestion,
    NewSection, NewSurvey, NewUser, PasswordResetData, PeriodData, ProgramQuestionData,
    ProgramStudyData, QuestionData, RoleData, SectionData, SessionData, SupervisorAnswerData,
    SupervisorTokenData, SurveyData, UserChanges, UserData,
};
pub use error::PersistenceError;

/// Atomic counter for generating unique in-memory database names.
///
/// This ensures deterministic test isolation by eliminating time-based
/// collisions. Each call to `new_in_memory()` receives a unique sequential
/// ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistence adapter over a single `SQLite` connection.
///
/// The server shares one adapter behind a mutex; every method takes
/// `&mut self` and runs against that connection.
pub struct SqlitePersistence {
    conn: SqliteConnection,
}

impl SqlitePersistence {
    /// Creates a new persistence adapter with an in-memory `SQLite`
    /// database.
    ///
    /// Each call receives a unique database instance via atomic counter,
    /// ensuring deterministic test isolation without time-based collisions.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let db_name: String = format!("memdb_test_{db_id}");
        let shared_memory_url: String = format!("file:{db_name}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = connection::initialize_database(&shared_memory_url)?;
        connection::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite`
    /// database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = connection::initialize_database(path_str)?;
        connection::enable_wal_mode(&mut conn)?;
        connection::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    // ========================================================================
    // Users, roles, sessions
    // ========================================================================

    /// Creates a new user. See [`mutations::users::create_user`].
    ///
    /// # Errors
    ///
    /// Returns an error if the user cannot be created.
    pub fn create_user(&mut self, new_user: &NewUser) -> Result<(), PersistenceError> {
        mutations::users::create_user(&mut self.conn, new_user)
    }

    /// Updates a user's profile fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the user is not found or the update fails.
    pub fn update_user(
        &mut self,
        user_id: &str,
        changes: &UserChanges,
    ) -> Result<(), PersistenceError> {
        mutations::users::update_user(&mut self.conn, user_id, changes)
    }

    /// Deletes a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the user is not found or the delete fails.
    pub fn delete_user(&mut self, user_id: &str) -> Result<(), PersistenceError> {
        mutations::users::delete_user(&mut self.conn, user_id)
    }

    /// Updates a user's password.
    ///
    /// # Errors
    ///
    /// Returns an error if the user is not found or the update fails.
    pub fn update_password(
        &mut self,
        user_id: &str,
        new_password: &str,
    ) -> Result<(), PersistenceError> {
        mutations::users::update_password(&mut self.conn, user_id, new_password)
    }

    /// Stores a user's survey progression marker.
    ///
    /// # Errors
    ///
    /// Returns an error if the user is not found or the update fails.
    pub fn update_last_survey(
        &mut self,
        user_id: &str,
        last_survey: &str,
    ) -> Result<(), PersistenceError> {
        mutations::users::update_last_survey(&mut self.conn, user_id, last_survey)
    }

    /// Retrieves a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_user_by_id(&mut self, user_id: &str) -> Result<Option<UserData>, PersistenceError> {
        queries::users::get_user_by_id(&mut self.conn, user_id)
    }

    /// Retrieves all users.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_users(&mut self) -> Result<Vec<UserData>, PersistenceError> {
        queries::users::list_users(&mut self.conn)
    }

    /// Retrieves all alumni.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_alumni(&mut self) -> Result<Vec<UserData>, PersistenceError> {
        queries::users::list_alumni(&mut self.conn)
    }

    /// Retrieves all alumni of a program study.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_alumni_by_program_study(
        &mut self,
        program_study_id: i64,
    ) -> Result<Vec<UserData>, PersistenceError> {
        queries::users::list_alumni_by_program_study(&mut self.conn, program_study_id)
    }

    /// Retrieves the alumni among an explicit list of user IDs.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn filter_alumni(&mut self, user_ids: &[String]) -> Result<Vec<UserData>, PersistenceError> {
        queries::users::filter_alumni(&mut self.conn, user_ids)
    }

    /// Creates a role.
    ///
    /// # Errors
    ///
    /// Returns an error if the role cannot be created.
    pub fn create_role(
        &mut self,
        name: &str,
        program_study_id: Option<i64>,
    ) -> Result<i64, PersistenceError> {
        mutations::users::create_role(&mut self.conn, name, program_study_id)
    }

    /// Updates a role.
    ///
    /// # Errors
    ///
    /// Returns an error if the role is not found or the update fails.
    pub fn update_role(
        &mut self,
        role_id: i64,
        name: &str,
        program_study_id: Option<i64>,
    ) -> Result<(), PersistenceError> {
        mutations::users::update_role(&mut self.conn, role_id, name, program_study_id)
    }

    /// Deletes a role.
    ///
    /// # Errors
    ///
    /// Returns an error if the role is not found or the delete fails.
    pub fn delete_role(&mut self, role_id: i64) -> Result<(), PersistenceError> {
        mutations::users::delete_role(&mut self.conn, role_id)
    }

    /// Retrieves a role by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_role(&mut self, role_id: i64) -> Result<Option<RoleData>, PersistenceError> {
        queries::users::get_role(&mut self.conn, role_id)
    }

    /// Retrieves all roles.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_roles(&mut self) -> Result<Vec<RoleData>, PersistenceError> {
        queries::users::list_roles(&mut self.conn)
    }

    /// Retrieves an unscoped role by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_role_by_name(&mut self, name: &str) -> Result<Option<RoleData>, PersistenceError> {
        queries::users::get_role_by_name(&mut self.conn, name)
    }

    /// Retrieves the role bound to a program study.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn find_role_for_program_study(
        &mut self,
        program_study_id: i64,
    ) -> Result<Option<RoleData>, PersistenceError> {
        queries::users::find_role_for_program_study(&mut self.conn, program_study_id)
    }

    /// Creates a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be created.
    pub fn create_session(
        &mut self,
        session_token: &str,
        user_id: &str,
        expires_at: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::users::create_session(&mut self.conn, session_token, user_id, expires_at)
    }

    /// Retrieves a session by token.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_session_by_token(
        &mut self,
        session_token: &str,
    ) -> Result<Option<SessionData>, PersistenceError> {
        queries::users::get_session_by_token(&mut self.conn, session_token)
    }

    /// Updates a session's last activity timestamp.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_session_activity(&mut self, session_id: i64) -> Result<(), PersistenceError> {
        mutations::users::update_session_activity(&mut self.conn, session_id)
    }

    /// Extends a session's expiration.
    ///
    /// # Errors
    ///
    /// Returns an error if the session is not found or the update fails.
    pub fn extend_session(
        &mut self,
        session_token: &str,
        expires_at: &str,
    ) -> Result<(), PersistenceError> {
        mutations::users::extend_session(&mut self.conn, session_token, expires_at)
    }

    /// Deletes a session by token.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_session(&mut self, session_token: &str) -> Result<(), PersistenceError> {
        mutations::users::delete_session(&mut self.conn, session_token)
    }

    /// Deletes all expired sessions.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_expired_sessions(&mut self) -> Result<usize, PersistenceError> {
        mutations::users::delete_expired_sessions(&mut self.conn)
    }

    /// Creates a password reset token for a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the reset cannot be created.
    pub fn create_password_reset(
        &mut self,
        token: &str,
        user_id: &str,
        expires_at: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::users::create_password_reset(&mut self.conn, token, user_id, expires_at)
    }

    /// Redeems a password reset token exactly once.
    ///
    /// # Errors
    ///
    /// Returns `TokenNotFound` for an unknown token and `TokenAlreadyUsed`
    /// for one redeemed before.
    pub fn redeem_password_reset(
        &mut self,
        token: &str,
    ) -> Result<PasswordResetData, PersistenceError> {
        mutations::users::redeem_password_reset(&mut self.conn, token)
    }

    /// Retrieves a password reset by its token string.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_password_reset(
        &mut self,
        token: &str,
    ) -> Result<Option<PasswordResetData>, PersistenceError> {
        queries::users::get_password_reset(&mut self.conn, token)
    }

    // ========================================================================
    // Organizational units & periods
    // ========================================================================

    /// Creates a faculty.
    ///
    /// # Errors
    ///
    /// Returns an error if the faculty cannot be created.
    pub fn create_faculty(&mut self, name: &str) -> Result<i64, PersistenceError> {
        mutations::units::create_faculty(&mut self.conn, name)
    }

    /// Renames a faculty.
    ///
    /// # Errors
    ///
    /// Returns an error if the faculty is not found or the update fails.
    pub fn update_faculty(&mut self, faculty_id: i64, name: &str) -> Result<(), PersistenceError> {
        mutations::units::update_faculty(&mut self.conn, faculty_id, name)
    }

    /// Deletes a faculty.
    ///
    /// # Errors
    ///
    /// Returns an error if the faculty is not found or the delete fails.
    pub fn delete_faculty(&mut self, faculty_id: i64) -> Result<(), PersistenceError> {
        mutations::units::delete_faculty(&mut self.conn, faculty_id)
    }

    /// Retrieves a faculty by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_faculty(&mut self, faculty_id: i64) -> Result<Option<FacultyData>, PersistenceError> {
        queries::units::get_faculty(&mut self.conn, faculty_id)
    }

    /// Retrieves all faculties.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_faculties(&mut self) -> Result<Vec<FacultyData>, PersistenceError> {
        queries::units::list_faculties(&mut self.conn)
    }

    /// Creates a department.
    ///
    /// # Errors
    ///
    /// Returns an error if the department cannot be created.
    pub fn create_department(
        &mut self,
        faculty_id: i64,
        name: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::units::create_department(&mut self.conn, faculty_id, name)
    }

    /// Updates a department.
    ///
    /// # Errors
    ///
    /// Returns an error if the department is not found or the update fails.
    pub fn update_department(
        &mut self,
        department_id: i64,
        faculty_id: i64,
        name: &str,
    ) -> Result<(), PersistenceError> {
        mutations::units::update_department(&mut self.conn, department_id, faculty_id, name)
    }

    /// Deletes a department.
    ///
    /// # Errors
    ///
    /// Returns an error if the department is not found or the delete fails.
    pub fn delete_department(&mut self, department_id: i64) -> Result<(), PersistenceError> {
        mutations::units::delete_department(&mut self.conn, department_id)
    }

    /// Retrieves a department by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_department(
        &mut self,
        department_id: i64,
    ) -> Result<Option<DepartmentData>, PersistenceError> {
        queries::units::get_department(&mut self.conn, department_id)
    }

    /// Retrieves all departments.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_departments(&mut self) -> Result<Vec<DepartmentData>, PersistenceError> {
        queries::units::list_departments(&mut self.conn)
    }

    /// Creates a program study and its program-scoped role.
    ///
    /// # Errors
    ///
    /// Returns an error if either insert fails.
    pub fn create_program_study(
        &mut self,
        department_id: i64,
        name: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::units::create_program_study(&mut self.conn, department_id, name)
    }

    /// Updates a program study.
    ///
    /// # Errors
    ///
    /// Returns an error if the program study is not found or the update
    /// fails.
    pub fn update_program_study(
        &mut self,
        program_study_id: i64,
        department_id: i64,
        name: &str,
    ) -> Result<(), PersistenceError> {
        mutations::units::update_program_study(&mut self.conn, program_study_id, department_id, name)
    }

    /// Deletes a program study and its program-scoped role.
    ///
    /// # Errors
    ///
    /// Returns an error if the program study is not found or the delete
    /// fails.
    pub fn delete_program_study(&mut self, program_study_id: i64) -> Result<(), PersistenceError> {
        mutations::units::delete_program_study(&mut self.conn, program_study_id)
    }

    /// Retrieves a program study by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_program_study(
        &mut self,
        program_study_id: i64,
    ) -> Result<Option<ProgramStudyData>, PersistenceError> {
        queries::units::get_program_study(&mut self.conn, program_study_id)
    }

    /// Retrieves all program studies.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_program_studies(&mut self) -> Result<Vec<ProgramStudyData>, PersistenceError> {
        queries::units::list_program_studies(&mut self.conn)
    }

    /// Creates a period.
    ///
    /// # Errors
    ///
    /// Returns an error if the period cannot be created.
    pub fn create_period(
        &mut self,
        category: &str,
        sort_order: i32,
    ) -> Result<i64, PersistenceError> {
        mutations::units::create_period(&mut self.conn, category, sort_order)
    }

    /// Updates a period.
    ///
    /// # Errors
    ///
    /// Returns an error if the period is not found or the update fails.
    pub fn update_period(
        &mut self,
        period_id: i64,
        category: &str,
        sort_order: i32,
    ) -> Result<(), PersistenceError> {
        mutations::units::update_period(&mut self.conn, period_id, category, sort_order)
    }

    /// Deletes a period.
    ///
    /// # Errors
    ///
    /// Returns an error if the period is not found or the delete fails.
    pub fn delete_period(&mut self, period_id: i64) -> Result<(), PersistenceError> {
        mutations::units::delete_period(&mut self.conn, period_id)
    }

    /// Retrieves a period by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_period(&mut self, period_id: i64) -> Result<Option<PeriodData>, PersistenceError> {
        queries::units::get_period(&mut self.conn, period_id)
    }

    /// Retrieves all periods in sort order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_periods(&mut self) -> Result<Vec<PeriodData>, PersistenceError> {
        queries::units::list_periods(&mut self.conn)
    }

    // ========================================================================
    // Surveys, sections, questions
    // ========================================================================

    /// Creates a survey.
    ///
    /// # Errors
    ///
    /// Returns an error if the survey cannot be created.
    pub fn create_survey(&mut self, new_survey: &NewSurvey) -> Result<i64, PersistenceError> {
        mutations::surveys::create_survey(&mut self.conn, new_survey)
    }

    /// Updates a survey.
    ///
    /// # Errors
    ///
    /// Returns an error if the survey is not found or the update fails.
    pub fn update_survey(
        &mut self,
        survey_id: i64,
        changes: &NewSurvey,
    ) -> Result<(), PersistenceError> {
        mutations::surveys::update_survey(&mut self.conn, survey_id, changes)
    }

    /// Deletes a survey.
    ///
    /// # Errors
    ///
    /// Returns an error if the survey is not found or the delete fails.
    pub fn delete_survey(&mut self, survey_id: i64) -> Result<(), PersistenceError> {
        mutations::surveys::delete_survey(&mut self.conn, survey_id)
    }

    /// Retrieves a survey by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_survey(&mut self, survey_id: i64) -> Result<Option<SurveyData>, PersistenceError> {
        queries::surveys::get_survey(&mut self.conn, survey_id)
    }

    /// Retrieves all surveys.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_surveys(&mut self) -> Result<Vec<SurveyData>, PersistenceError> {
        queries::surveys::list_surveys(&mut self.conn)
    }

    /// Retrieves all surveys flagged active.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_active_surveys(&mut self) -> Result<Vec<SurveyData>, PersistenceError> {
        queries::surveys::list_active_surveys(&mut self.conn)
    }

    /// Selects the survey a supervisor token should point at.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn find_supervisor_survey(&mut self) -> Result<Option<SurveyData>, PersistenceError> {
        queries::surveys::find_supervisor_survey(&mut self.conn)
    }

    /// Creates a section.
    ///
    /// # Errors
    ///
    /// Returns an error if the section cannot be created.
    pub fn create_section(
        &mut self,
        survey_id: i64,
        new_section: &NewSection,
    ) -> Result<i64, PersistenceError> {
        mutations::surveys::create_section(&mut self.conn, survey_id, new_section)
    }

    /// Updates a section.
    ///
    /// # Errors
    ///
    /// Returns an error if the section is not found or the update fails.
    pub fn update_section(
        &mut self,
        section_id: i64,
        changes: &NewSection,
    ) -> Result<(), PersistenceError> {
        mutations::surveys::update_section(&mut self.conn, section_id, changes)
    }

    /// Deletes a section.
    ///
    /// # Errors
    ///
    /// Returns an error if the section is not found or the delete fails.
    pub fn delete_section(&mut self, section_id: i64) -> Result<(), PersistenceError> {
        mutations::surveys::delete_section(&mut self.conn, section_id)
    }

    /// Retrieves a section by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_section(&mut self, section_id: i64) -> Result<Option<SectionData>, PersistenceError> {
        queries::surveys::get_section(&mut self.conn, section_id)
    }

    /// Retrieves the sections of a survey.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_sections(&mut self, survey_id: i64) -> Result<Vec<SectionData>, PersistenceError> {
        queries::surveys::list_sections(&mut self.conn, survey_id)
    }

    /// Creates a question with its branches.
    ///
    /// # Errors
    ///
    /// Returns an error if any insert fails.
    pub fn create_question(
        &mut self,
        section_id: i64,
        new_question: &NewQuestion,
        branches: &[NewBranch],
    ) -> Result<i64, PersistenceError> {
        mutations::surveys::create_question(&mut self.conn, section_id, new_question, branches)
    }

    /// Updates a question, replacing its branch list wholesale.
    ///
    /// # Errors
    ///
    /// Returns an error if the question is not found or any statement
    /// fails.
    pub fn update_question(
        &mut self,
        question_id: i64,
        changes: &NewQuestion,
        branches: &[NewBranch],
    ) -> Result<(), PersistenceError> {
        mutations::surveys::update_question(&mut self.conn, question_id, changes, branches)
    }

    /// Deletes a question.
    ///
    /// # Errors
    ///
    /// Returns an error if the question is not found or the delete fails.
    pub fn delete_question(&mut self, question_id: i64) -> Result<(), PersistenceError> {
        mutations::surveys::delete_question(&mut self.conn, question_id)
    }

    /// Retrieves a question by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_question(
        &mut self,
        question_id: i64,
    ) -> Result<Option<QuestionData>, PersistenceError> {
        queries::surveys::get_question(&mut self.conn, question_id)
    }

    /// Retrieves the questions of a section.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_questions(&mut self, section_id: i64) -> Result<Vec<QuestionData>, PersistenceError> {
        queries::surveys::list_questions(&mut self.conn, section_id)
    }

    /// Retrieves every question of a survey.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_questions_for_survey(
        &mut self,
        survey_id: i64,
    ) -> Result<Vec<QuestionData>, PersistenceError> {
        queries::surveys::list_questions_for_survey(&mut self.conn, survey_id)
    }

    /// Finds a survey question by its short code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn find_question_by_code(
        &mut self,
        survey_id: i64,
        code: &str,
    ) -> Result<Option<QuestionData>, PersistenceError> {
        queries::surveys::find_question_by_code(&mut self.conn, survey_id, code)
    }

    /// Retrieves the branches of a question.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_branches(&mut self, question_id: i64) -> Result<Vec<BranchData>, PersistenceError> {
        queries::surveys::list_branches(&mut self.conn, question_id)
    }

    /// Creates an overlay question.
    ///
    /// # Errors
    ///
    /// Returns an error if the overlay question cannot be created.
    pub fn create_program_question(
        &mut self,
        survey_id: i64,
        program_study_id: i64,
        new_question: &NewQuestion,
    ) -> Result<i64, PersistenceError> {
        mutations::surveys::create_program_question(
            &mut self.conn,
            survey_id,
            program_study_id,
            new_question,
        )
    }

    /// Updates an overlay question.
    ///
    /// # Errors
    ///
    /// Returns an error if the overlay question is not found or the update
    /// fails.
    pub fn update_program_question(
        &mut self,
        program_question_id: i64,
        changes: &NewQuestion,
    ) -> Result<(), PersistenceError> {
        mutations::surveys::update_program_question(&mut self.conn, program_question_id, changes)
    }

    /// Deletes an overlay question.
    ///
    /// # Errors
    ///
    /// Returns an error if the overlay question is not found or the delete
    /// fails.
    pub fn delete_program_question(
        &mut self,
        program_question_id: i64,
    ) -> Result<(), PersistenceError> {
        mutations::surveys::delete_program_question(&mut self.conn, program_question_id)
    }

    /// Retrieves an overlay question by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_program_question(
        &mut self,
        program_question_id: i64,
    ) -> Result<Option<ProgramQuestionData>, PersistenceError> {
        queries::surveys::get_program_question(&mut self.conn, program_question_id)
    }

    /// Retrieves the overlay questions of a survey for one program study.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_program_questions(
        &mut self,
        survey_id: i64,
        program_study_id: i64,
    ) -> Result<Vec<ProgramQuestionData>, PersistenceError> {
        queries::surveys::list_program_questions(&mut self.conn, survey_id, program_study_id)
    }

    // ========================================================================
    // Answers
    // ========================================================================

    /// Inserts or updates a user's answer to a question.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert or update fails.
    pub fn upsert_answer(
        &mut self,
        survey_id: i64,
        user_id: &str,
        target: AnswerTarget,
        value: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::answers::upsert_answer(&mut self.conn, survey_id, user_id, target, value)
    }

    /// Overwrites an existing answer's value.
    ///
    /// # Errors
    ///
    /// Returns an error if the answer is not found or the update fails.
    pub fn update_answer(&mut self, answer_id: i64, value: &str) -> Result<(), PersistenceError> {
        mutations::answers::update_answer(&mut self.conn, answer_id, value)
    }

    /// Deletes an answer.
    ///
    /// # Errors
    ///
    /// Returns an error if the answer is not found or the delete fails.
    pub fn delete_answer(&mut self, answer_id: i64) -> Result<(), PersistenceError> {
        mutations::answers::delete_answer(&mut self.conn, answer_id)
    }

    /// Retrieves an answer by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_answer(&mut self, answer_id: i64) -> Result<Option<AnswerData>, PersistenceError> {
        queries::answers::get_answer(&mut self.conn, answer_id)
    }

    /// Retrieves every answer of a survey.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_answers_for_survey(
        &mut self,
        survey_id: i64,
    ) -> Result<Vec<AnswerData>, PersistenceError> {
        queries::answers::list_answers_for_survey(&mut self.conn, survey_id)
    }

    /// Retrieves a survey's answers from users of one program study.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_answers_for_survey_by_program(
        &mut self,
        survey_id: i64,
        program_study_id: i64,
    ) -> Result<Vec<AnswerData>, PersistenceError> {
        queries::answers::list_answers_for_survey_by_program(
            &mut self.conn,
            survey_id,
            program_study_id,
        )
    }

    /// Retrieves one user's answers to a survey.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_answers_for_user(
        &mut self,
        survey_id: i64,
        user_id: &str,
    ) -> Result<Vec<AnswerData>, PersistenceError> {
        queries::answers::list_answers_for_user(&mut self.conn, survey_id, user_id)
    }

    /// Retrieves all answers to one question of a survey.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_answers_by_question(
        &mut self,
        survey_id: i64,
        question_id: i64,
    ) -> Result<Vec<AnswerData>, PersistenceError> {
        queries::answers::list_answers_by_question(&mut self.conn, survey_id, question_id)
    }

    /// Retrieves all answers to one overlay question of a survey.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_answers_by_program_question(
        &mut self,
        survey_id: i64,
        program_question_id: i64,
    ) -> Result<Vec<AnswerData>, PersistenceError> {
        queries::answers::list_answers_by_program_question(
            &mut self.conn,
            survey_id,
            program_question_id,
        )
    }

    /// Retrieves one user's answer to one question, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_user_answer_to_question(
        &mut self,
        user_id: &str,
        question_id: i64,
    ) -> Result<Option<AnswerData>, PersistenceError> {
        queries::answers::get_user_answer_to_question(&mut self.conn, user_id, question_id)
    }

    /// Counts the required section questions of a survey.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn count_required_questions(&mut self, survey_id: i64) -> Result<i64, PersistenceError> {
        queries::answers::count_required_questions(&mut self.conn, survey_id)
    }

    /// Counts one user's answers to the required questions of a survey.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn count_required_answers(
        &mut self,
        survey_id: i64,
        user_id: &str,
    ) -> Result<i64, PersistenceError> {
        queries::answers::count_required_answers(&mut self.conn, survey_id, user_id)
    }

    // ========================================================================
    // Supervisor tokens & answers
    // ========================================================================

    /// Creates a supervisor token.
    ///
    /// # Errors
    ///
    /// Returns an error if the token cannot be created.
    pub fn create_supervisor_token(
        &mut self,
        token: &str,
        alumni_user_id: &str,
        survey_id: i64,
    ) -> Result<i64, PersistenceError> {
        mutations::supervisor::create_supervisor_token(
            &mut self.conn,
            token,
            alumni_user_id,
            survey_id,
        )
    }

    /// Redeems a supervisor token exactly once.
    ///
    /// # Errors
    ///
    /// Returns `TokenNotFound` for an unknown token, `TokenAlreadyUsed` for
    /// a spent one, or a database error.
    pub fn redeem_supervisor_token(
        &mut self,
        token: &str,
    ) -> Result<SupervisorTokenData, PersistenceError> {
        mutations::supervisor::redeem_supervisor_token(&mut self.conn, token)
    }

    /// Retrieves a supervisor token by its token string.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_supervisor_token(
        &mut self,
        token: &str,
    ) -> Result<Option<SupervisorTokenData>, PersistenceError> {
        queries::supervisor::get_supervisor_token(&mut self.conn, token)
    }

    /// Inserts or updates a supervisor's answer under a token.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert or update fails.
    pub fn upsert_supervisor_answer(
        &mut self,
        token_id: i64,
        question_id: i64,
        value: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::supervisor::upsert_supervisor_answer(&mut self.conn, token_id, question_id, value)
    }

    /// Retrieves the answers recorded under a supervisor token.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_supervisor_answers(
        &mut self,
        token_id: i64,
    ) -> Result<Vec<SupervisorAnswerData>, PersistenceError> {
        queries::supervisor::list_supervisor_answers(&mut self.conn, token_id)
    }

    // ========================================================================
    // System configuration
    // ========================================================================

    /// Creates a configuration entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry cannot be created.
    pub fn create_config_entry(&mut self, key: &str, value: &str) -> Result<i64, PersistenceError> {
        mutations::config::create_config_entry(&mut self.conn, key, value)
    }

    /// Updates a configuration entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry is not found or the update fails.
    pub fn update_config_entry(
        &mut self,
        config_id: i64,
        key: &str,
        value: &str,
    ) -> Result<(), PersistenceError> {
        mutations::config::update_config_entry(&mut self.conn, config_id, key, value)
    }

    /// Deletes a configuration entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry is not found or the delete fails.
    pub fn delete_config_entry(&mut self, config_id: i64) -> Result<(), PersistenceError> {
        mutations::config::delete_config_entry(&mut self.conn, config_id)
    }

    /// Retrieves a configuration entry by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_config_entry(
        &mut self,
        config_id: i64,
    ) -> Result<Option<ConfigEntryData>, PersistenceError> {
        queries::config::get_config_entry(&mut self.conn, config_id)
    }

    /// Retrieves the value stored under a configuration key.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_config_value(&mut self, key: &str) -> Result<Option<String>, PersistenceError> {
        queries::config::get_config_value(&mut self.conn, key)
    }

    /// Retrieves all configuration entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_config_entries(&mut self) -> Result<Vec<ConfigEntryData>, PersistenceError> {
        queries::config::list_config_entries(&mut self.conn)
    }
}
