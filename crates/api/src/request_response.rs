// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracer_persistence::{BranchData, QuestionData, UserData};

/// Request to register a new alumni account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// The student identification number.
    pub user_id: String,
    /// The user's full name.
    pub full_name: String,
    /// The plain-text password.
    pub password: String,
    /// The password confirmation.
    pub password_confirmation: String,
    /// An optional contact email.
    pub email: Option<String>,
}

/// Request to authenticate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    /// The student identification number.
    pub user_id: String,
    /// The plain-text password.
    pub password: String,
}

/// Response for a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// The opaque session token.
    pub session_token: String,
    /// The authenticated user's identifier.
    pub user_id: String,
    /// The authenticated user's full name.
    pub full_name: String,
    /// The display name of the user's role, if any.
    pub role: Option<String>,
}

/// Response for a successful session refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshResponse {
    /// The new expiration timestamp.
    pub expires_at: String,
}

/// Request to change the caller's own password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangePasswordRequest {
    /// The current password.
    pub old_password: String,
    /// The new password.
    pub new_password: String,
    /// The new password confirmation.
    pub new_password_confirmation: String,
}

/// Request to start a password reset for an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordResetRequest {
    /// The account to reset.
    pub user_id: String,
}

/// Request to redeem a reset token and set a new password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetPasswordRequest {
    /// The one-time reset token from the email.
    pub token: String,
    /// The new password.
    pub new_password: String,
    /// The new password confirmation.
    pub new_password_confirmation: String,
}

/// Request to create a user administratively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateUserRequest {
    /// The student identification number or staff identifier.
    pub user_id: String,
    /// The user's full name.
    pub full_name: String,
    /// An optional contact email.
    pub email: Option<String>,
    /// The initial plain-text password.
    pub password: String,
    /// The role to assign, if any.
    pub role_id: Option<i64>,
    /// The program study affiliation, if any.
    pub program_study_id: Option<i64>,
    /// An optional postal address.
    pub address: Option<String>,
    /// An optional phone number.
    pub phone_number: Option<String>,
}

/// Request to update a user's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    /// The user's full name.
    pub full_name: String,
    /// An optional contact email.
    pub email: Option<String>,
    /// The role to assign, if any.
    pub role_id: Option<i64>,
    /// The program study affiliation, if any.
    pub program_study_id: Option<i64>,
    /// An optional postal address.
    pub address: Option<String>,
    /// An optional phone number.
    pub phone_number: Option<String>,
}

/// A user's profile without credential material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    /// The student identification number or staff identifier.
    pub user_id: String,
    /// The user's full name.
    pub full_name: String,
    /// The contact email, if any.
    pub email: Option<String>,
    /// The assigned role, if any.
    pub role_id: Option<i64>,
    /// The program study affiliation, if any.
    pub program_study_id: Option<i64>,
    /// The postal address, if any.
    pub address: Option<String>,
    /// The phone number, if any.
    pub phone_number: Option<String>,
    /// The survey progression marker: none, exit, lv1, or lv2.
    pub last_survey: String,
}

impl From<UserData> for UserInfo {
    fn from(user: UserData) -> Self {
        Self {
            user_id: user.user_id,
            full_name: user.full_name,
            email: user.email,
            role_id: user.role_id,
            program_study_id: user.program_study_id,
            address: user.address,
            phone_number: user.phone_number,
            last_survey: user.last_survey,
        }
    }
}

/// Request to create or update a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePayload {
    /// The role's display name.
    pub name: String,
    /// The bound program study for program-scoped roles.
    pub program_study_id: Option<i64>,
}

/// Request to create or rename a faculty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacultyPayload {
    /// The faculty name.
    pub name: String,
}

/// Request to create or update a department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentPayload {
    /// The owning faculty.
    pub faculty_id: i64,
    /// The department name.
    pub name: String,
}

/// Request to create or update a program study.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramStudyPayload {
    /// The owning department.
    pub department_id: i64,
    /// The program study name.
    pub name: String,
}

/// Request to create or update a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodPayload {
    /// The period category, unique across periods.
    pub category: String,
    /// The display order, unique across periods.
    pub sort_order: i32,
}

/// Request to create or update a configuration entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigPayload {
    /// The configuration key, unique across entries.
    pub key: String,
    /// The configuration value.
    pub value: String,
}

/// Request to create or update a survey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyPayload {
    /// The survey title.
    pub title: String,
    /// An optional description.
    pub description: Option<String>,
    /// The survey kind: exit, lv1, lv2, or skp.
    pub survey_kind: String,
    /// Whether the survey is open for answers.
    pub is_active: bool,
    /// An optional period tag.
    pub period_id: Option<i64>,
    /// The opening timestamp (ISO 8601), if windowed.
    pub start_at: Option<String>,
    /// The closing timestamp (ISO 8601), if windowed.
    pub end_at: Option<String>,
}

/// Request to create or update a section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionPayload {
    /// The section title.
    pub title: String,
    /// An optional description.
    pub description: Option<String>,
    /// The display order within the survey.
    pub sort_order: i32,
}

/// A branch declaration on a radio question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchPayload {
    /// The answer value that triggers the branch.
    pub answer_value: String,
    /// The section the respondent continues at.
    pub next_section_id: i64,
}

/// Request to create or update a question.
///
/// The branch list replaces the question's existing branches wholesale on
/// update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionPayload {
    /// The question prompt.
    pub prompt: String,
    /// The question kind: text, number, radio, checkbox, scale, dropdown.
    pub question_kind: String,
    /// The declared options for choice questions.
    pub options: Option<Vec<String>>,
    /// An optional stable code for config-driven lookups.
    pub code: Option<String>,
    /// Whether an answer is required.
    pub is_required: bool,
    /// The display order within the section.
    pub sort_order: i32,
    /// Conditional branches, valid only on radio questions.
    #[serde(default)]
    pub branches: Vec<BranchPayload>,
}

/// A question together with its branches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionInfo {
    /// The question row.
    pub question: QuestionData,
    /// The question's branches in declaration order.
    pub branches: Vec<BranchData>,
}

/// A single answer submission.
///
/// Exactly one of `question_id` and `program_question_id` must be set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerSubmission {
    /// The section question being answered.
    pub question_id: Option<i64>,
    /// The program-study overlay question being answered.
    pub program_question_id: Option<i64>,
    /// The submitted value, typed per the question kind.
    pub value: Value,
}

/// An answer with its stored value decoded to its typed form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerInfo {
    /// The answer identifier.
    pub answer_id: i64,
    /// The survey the answer belongs to.
    pub survey_id: i64,
    /// The respondent.
    pub user_id: String,
    /// The section question, if the answer targets one.
    pub question_id: Option<i64>,
    /// The overlay question, if the answer targets one.
    pub program_question_id: Option<i64>,
    /// The decoded answer value.
    pub value: Value,
    /// The creation timestamp.
    pub created_at: String,
}

/// Request to submit several answers at once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkAnswerRequest {
    /// The submissions, validated independently.
    pub answers: Vec<AnswerSubmission>,
}

/// A successful entry of a bulk submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkAnswerSuccess {
    /// The index of the submission in the request.
    pub index: usize,
    /// The stored answer's identifier.
    pub answer_id: i64,
}

/// A failed entry of a bulk submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkAnswerFailure {
    /// The index of the submission in the request.
    pub index: usize,
    /// A human-readable description of the failure.
    pub error: String,
}

/// The outcome of a bulk answer submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkAnswerOutcome {
    /// The submissions that were stored.
    pub successes: Vec<BulkAnswerSuccess>,
    /// The submissions that were rejected, with per-index errors.
    pub failures: Vec<BulkAnswerFailure>,
}

/// One supervisor answer under a token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupervisorAnswerSubmission {
    /// The skp survey question being answered.
    pub question_id: i64,
    /// The submitted value, typed per the question kind.
    pub value: Value,
}

/// Request to redeem a supervisor token and submit its answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupervisorSubmissionRequest {
    /// The one-time token from the emailed link.
    pub token: String,
    /// The supervisor's answers.
    pub answers: Vec<SupervisorAnswerSubmission>,
}

/// Response for a successful supervisor submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupervisorSubmissionResponse {
    /// The skp survey the answers were recorded against.
    pub survey_id: i64,
    /// How many answers were stored.
    pub stored: usize,
}

/// Request to remind an explicit list of users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemindUsersRequest {
    /// The user IDs to consider; non-alumni entries are ignored.
    pub user_ids: Vec<String>,
}

/// The outcome of a reminder run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderReport {
    /// How many active, in-window surveys were considered.
    pub surveys_considered: usize,
    /// How many reminder emails were sent.
    pub reminders_sent: usize,
}
