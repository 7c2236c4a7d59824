// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Plain data structs returned by queries and accepted by mutations.
//!
//! These are storage-shaped: enums such as role kind and question kind are
//! carried as their stored strings here and converted to domain types at the
//! API layer.

use serde::{Deserialize, Serialize};

/// A role row. Global roles carry no program study; program-scoped roles do.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleData {
    pub role_id: i64,
    pub name: String,
    pub program_study_id: Option<i64>,
}

/// A user row. The primary key is the student identification number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserData {
    pub user_id: String,
    pub full_name: String,
    pub email: Option<String>,
    pub password_hash: String,
    pub role_id: Option<i64>,
    pub program_study_id: Option<i64>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub last_survey: String,
}

/// Fields for creating a new user. The password is plain text and is hashed
/// by the mutation.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub user_id: String,
    pub full_name: String,
    pub email: Option<String>,
    pub password: String,
    pub role_id: Option<i64>,
    pub program_study_id: Option<i64>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
}

/// Mutable profile fields of an existing user.
#[derive(Debug, Clone)]
pub struct UserChanges {
    pub full_name: String,
    pub email: Option<String>,
    pub role_id: Option<i64>,
    pub program_study_id: Option<i64>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
}

/// A session row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    pub session_id: i64,
    pub session_token: String,
    pub user_id: String,
    pub created_at: String,
    pub last_activity_at: String,
    pub expires_at: String,
}

/// A faculty row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacultyData {
    pub faculty_id: i64,
    pub name: String,
}

/// A department row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepartmentData {
    pub department_id: i64,
    pub faculty_id: i64,
    pub name: String,
}

/// A program study row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramStudyData {
    pub program_study_id: i64,
    pub department_id: i64,
    pub name: String,
}

/// A period row. Both the category and the sort order are unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodData {
    pub period_id: i64,
    pub category: String,
    pub sort_order: i32,
}

/// A survey row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyData {
    pub survey_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub survey_kind: String,
    pub is_active: bool,
    pub period_id: Option<i64>,
    pub created_by: Option<String>,
    pub start_at: Option<String>,
    pub end_at: Option<String>,
    pub created_at: String,
}

/// Fields for creating or replacing a survey.
#[derive(Debug, Clone)]
pub struct NewSurvey {
    pub title: String,
    pub description: Option<String>,
    pub survey_kind: String,
    pub is_active: bool,
    pub period_id: Option<i64>,
    pub created_by: Option<String>,
    pub start_at: Option<String>,
    pub end_at: Option<String>,
}

/// A section row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionData {
    pub section_id: i64,
    pub survey_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub sort_order: i32,
    pub created_at: String,
}

/// Fields for creating or replacing a section.
#[derive(Debug, Clone)]
pub struct NewSection {
    pub title: String,
    pub description: Option<String>,
    pub sort_order: i32,
}

/// A question row. Options are the canonical JSON-array encoding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionData {
    pub question_id: i64,
    pub section_id: i64,
    pub prompt: String,
    pub question_kind: String,
    pub options: Option<String>,
    pub code: Option<String>,
    pub is_required: bool,
    pub sort_order: i32,
    pub created_at: String,
}

/// Fields for creating or replacing a question.
#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub prompt: String,
    pub question_kind: String,
    pub options: Option<String>,
    pub code: Option<String>,
    pub is_required: bool,
    pub sort_order: i32,
}

/// A conditional branch row on a radio question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchData {
    pub branch_id: i64,
    pub question_id: i64,
    pub answer_value: String,
    pub next_section_id: i64,
}

/// A branch declaration: when the parent question is answered with
/// `answer_value`, the respondent continues at `next_section_id`.
#[derive(Debug, Clone)]
pub struct NewBranch {
    pub answer_value: String,
    pub next_section_id: i64,
}

/// A program-study overlay question row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramQuestionData {
    pub program_question_id: i64,
    pub survey_id: i64,
    pub program_study_id: i64,
    pub prompt: String,
    pub question_kind: String,
    pub options: Option<String>,
    pub code: Option<String>,
    pub is_required: bool,
    pub sort_order: i32,
    pub created_at: String,
}

/// An answer row. Exactly one of `question_id` and `program_question_id`
/// is set; the persistence layer never writes both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerData {
    pub answer_id: i64,
    pub survey_id: i64,
    pub user_id: String,
    pub question_id: Option<i64>,
    pub program_question_id: Option<i64>,
    pub value: String,
    pub created_at: String,
}

/// A supervisor token row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupervisorTokenData {
    pub token_id: i64,
    pub token: String,
    pub alumni_user_id: String,
    pub survey_id: i64,
    pub is_used: bool,
    pub created_at: String,
}

/// A supervisor answer row, unique per (token, question).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupervisorAnswerData {
    pub supervisor_answer_id: i64,
    pub token_id: i64,
    pub question_id: i64,
    pub value: String,
    pub created_at: String,
}

/// A password reset token row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordResetData {
    pub reset_id: i64,
    pub token: String,
    pub user_id: String,
    pub expires_at: String,
    pub is_used: bool,
    pub created_at: String,
}

/// A system configuration row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigEntryData {
    pub config_id: i64,
    pub key: String,
    pub value: String,
}
