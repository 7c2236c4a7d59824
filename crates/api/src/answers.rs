// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Answer intake, validation, scoped listing, and survey progression.
//!
//! Submissions are validated against the target question's kind before
//! storage and upsert in place, so a respondent answers each question at
//! most once. A successful submission to an exit/lv1/lv2 survey advances
//! the respondent's progression marker, and an lv1 submission additionally
//! kicks off the supervisor notification chain.

use serde_json::Value;
use std::str::FromStr;
use tracing::info;
use tracer_domain::{
    AnswerPayload, AnswerTarget, OptionsList, QuestionKind, SurveyKind, SurveyProgress,
    decode_answer, validate_answer,
};
use tracer_persistence::{AnswerData, SqlitePersistence, SurveyData, UserData};

use crate::auth::{AnswerScope, AuthenticatedUser, AuthorizationService};
use crate::error::{ApiError, translate_domain_error, translate_persistence_error};
use crate::mail::Mailer;
use crate::request_response::{
    AnswerInfo, AnswerSubmission, BulkAnswerFailure, BulkAnswerOutcome, BulkAnswerRequest,
    BulkAnswerSuccess,
};
use crate::surveys::get_survey;

/// Submits a single answer.
///
/// # Errors
///
/// Returns an error if the caller is not an Alumni, the survey or target
/// question does not exist, or the value fails validation.
pub fn submit_answer(
    persistence: &mut SqlitePersistence,
    mailer: &dyn Mailer,
    user: &AuthenticatedUser,
    survey_id: i64,
    submission: &AnswerSubmission,
) -> Result<AnswerInfo, ApiError> {
    AuthorizationService::authorize_submit_answers(user)?;
    let survey: SurveyData = get_survey(persistence, survey_id)?;

    let answer_id: i64 = store_answer(persistence, user, survey_id, submission)?;
    finish_submission(persistence, mailer, user, &survey);

    let answer: AnswerData = persistence
        .get_answer(answer_id)
        .map_err(|e| translate_persistence_error("Answer", e))?
        .ok_or_else(|| ApiError::Internal {
            message: format!("Stored answer {answer_id} could not be read back"),
        })?;

    decode_answer_row(persistence, answer)
}

/// Submits several answers, validating each independently.
///
/// Progression advances once if at least one answer was stored. The server
/// layer renders a partial failure as 207 Multi-Status.
///
/// # Errors
///
/// Returns an error if the caller is not an Alumni or the survey does not
/// exist. Per-answer failures are reported in the outcome, not as an
/// error.
pub fn submit_answers_bulk(
    persistence: &mut SqlitePersistence,
    mailer: &dyn Mailer,
    user: &AuthenticatedUser,
    survey_id: i64,
    request: &BulkAnswerRequest,
) -> Result<BulkAnswerOutcome, ApiError> {
    AuthorizationService::authorize_submit_answers(user)?;
    let survey: SurveyData = get_survey(persistence, survey_id)?;

    let mut successes: Vec<BulkAnswerSuccess> = Vec::new();
    let mut failures: Vec<BulkAnswerFailure> = Vec::new();

    for (index, submission) in request.answers.iter().enumerate() {
        match store_answer(persistence, user, survey_id, submission) {
            Ok(answer_id) => successes.push(BulkAnswerSuccess { index, answer_id }),
            Err(e) => failures.push(BulkAnswerFailure {
                index,
                error: e.to_string(),
            }),
        }
    }

    if !successes.is_empty() {
        finish_submission(persistence, mailer, user, &survey);
    }

    info!(
        user_id = %user.user_id,
        survey_id,
        stored = successes.len(),
        rejected = failures.len(),
        "Bulk answer submission"
    );

    Ok(BulkAnswerOutcome {
        successes,
        failures,
    })
}

/// Retrieves the answers of a survey visible to the caller.
///
/// # Errors
///
/// Returns an error if the survey does not exist.
pub fn list_answers(
    persistence: &mut SqlitePersistence,
    user: &AuthenticatedUser,
    survey_id: i64,
) -> Result<Vec<AnswerInfo>, ApiError> {
    get_survey(persistence, survey_id)?;

    let rows: Vec<AnswerData> = match AuthorizationService::answer_scope(user) {
        AnswerScope::All => persistence
            .list_answers_for_survey(survey_id)
            .map_err(|e| translate_persistence_error("Answer", e))?,
        AnswerScope::ProgramStudy(program_study_id) => persistence
            .list_answers_for_survey_by_program(survey_id, program_study_id)
            .map_err(|e| translate_persistence_error("Answer", e))?,
        AnswerScope::SelfOnly => persistence
            .list_answers_for_user(survey_id, &user.user_id)
            .map_err(|e| translate_persistence_error("Answer", e))?,
    };

    rows.into_iter()
        .map(|row| decode_answer_row(persistence, row))
        .collect()
}

/// Retrieves all answers to one question of a survey, filtered to the
/// caller's scope.
///
/// # Errors
///
/// Returns an error if the survey or question does not exist.
pub fn list_answers_by_question(
    persistence: &mut SqlitePersistence,
    user: &AuthenticatedUser,
    survey_id: i64,
    question_id: i64,
) -> Result<Vec<AnswerInfo>, ApiError> {
    get_survey(persistence, survey_id)?;
    require_question_in_survey(persistence, survey_id, question_id)?;

    let rows: Vec<AnswerData> = persistence
        .list_answers_by_question(survey_id, question_id)
        .map_err(|e| translate_persistence_error("Answer", e))?;
    let rows: Vec<AnswerData> = filter_rows_to_scope(persistence, user, rows)?;

    rows.into_iter()
        .map(|row| decode_answer_row(persistence, row))
        .collect()
}

/// Retrieves all answers to one overlay question of a survey, filtered to
/// the caller's scope.
///
/// # Errors
///
/// Returns an error if the survey does not exist or the overlay question
/// does not belong to the given survey and program study.
pub fn list_answers_by_program_question(
    persistence: &mut SqlitePersistence,
    user: &AuthenticatedUser,
    survey_id: i64,
    program_study_id: i64,
    program_question_id: i64,
) -> Result<Vec<AnswerInfo>, ApiError> {
    get_survey(persistence, survey_id)?;
    crate::surveys::require_program_question_in_overlay(
        persistence,
        survey_id,
        program_study_id,
        program_question_id,
    )?;

    let rows: Vec<AnswerData> = persistence
        .list_answers_by_program_question(survey_id, program_question_id)
        .map_err(|e| translate_persistence_error("Answer", e))?;
    let rows: Vec<AnswerData> = filter_rows_to_scope(persistence, user, rows)?;

    rows.into_iter()
        .map(|row| decode_answer_row(persistence, row))
        .collect()
}

/// Drops the rows the caller's answer scope does not cover.
fn filter_rows_to_scope(
    persistence: &mut SqlitePersistence,
    user: &AuthenticatedUser,
    rows: Vec<AnswerData>,
) -> Result<Vec<AnswerData>, ApiError> {
    let filtered: Vec<AnswerData> = match AuthorizationService::answer_scope(user) {
        AnswerScope::All => rows,
        AnswerScope::ProgramStudy(program_study_id) => {
            let members: Vec<String> = persistence
                .list_alumni_by_program_study(program_study_id)
                .map_err(|e| translate_persistence_error("User", e))?
                .into_iter()
                .map(|u| u.user_id)
                .collect();
            rows.into_iter()
                .filter(|row| members.contains(&row.user_id))
                .collect()
        }
        AnswerScope::SelfOnly => rows
            .into_iter()
            .filter(|row| row.user_id == user.user_id)
            .collect(),
    };
    Ok(filtered)
}

/// Retrieves one answer if it is visible to the caller.
///
/// # Errors
///
/// Returns an error if the answer is not part of the survey or the caller
/// may not see it.
pub fn get_answer(
    persistence: &mut SqlitePersistence,
    user: &AuthenticatedUser,
    survey_id: i64,
    answer_id: i64,
) -> Result<AnswerInfo, ApiError> {
    let answer: AnswerData = require_answer_in_survey(persistence, survey_id, answer_id)?;
    require_answer_visible(persistence, user, &answer)?;
    decode_answer_row(persistence, answer)
}

/// Overwrites an answer's value after re-validation.
///
/// Only the answer's owner may update it.
///
/// # Errors
///
/// Returns an error if the caller does not own the answer or the new
/// value fails validation.
pub fn update_answer(
    persistence: &mut SqlitePersistence,
    user: &AuthenticatedUser,
    survey_id: i64,
    answer_id: i64,
    value: &Value,
) -> Result<AnswerInfo, ApiError> {
    AuthorizationService::authorize_submit_answers(user)?;
    let answer: AnswerData = require_answer_in_survey(persistence, survey_id, answer_id)?;

    if answer.user_id != user.user_id {
        return Err(ApiError::Unauthorized {
            action: String::from("update_answer"),
            required_role: String::from("the answer's owner"),
        });
    }

    let target: AnswerTarget =
        AnswerTarget::from_parts(answer.question_id, answer.program_question_id)
            .map_err(translate_domain_error)?;
    let (kind, options) = resolve_target(persistence, survey_id, user, target)?;

    let stored: String =
        validate_answer(kind, options.as_ref(), value).map_err(translate_domain_error)?;

    persistence
        .update_answer(answer_id, &stored)
        .map_err(|e| translate_persistence_error("Answer", e))?;

    let refreshed: AnswerData = require_answer_in_survey(persistence, survey_id, answer_id)?;
    decode_answer_row(persistence, refreshed)
}

/// Deletes an answer.
///
/// The owner may delete their own answer; Admins and Tracers may delete
/// any.
///
/// # Errors
///
/// Returns an error if the answer is not part of the survey or the caller
/// may not delete it.
pub fn delete_answer(
    persistence: &mut SqlitePersistence,
    user: &AuthenticatedUser,
    survey_id: i64,
    answer_id: i64,
) -> Result<(), ApiError> {
    let answer: AnswerData = require_answer_in_survey(persistence, survey_id, answer_id)?;

    let is_owner: bool = answer.user_id == user.user_id;
    let sees_all: bool = AuthorizationService::answer_scope(user) == AnswerScope::All;
    if !is_owner && !sees_all {
        return Err(ApiError::Unauthorized {
            action: String::from("delete_answer"),
            required_role: String::from("the answer's owner, a Tracer, or an Admin"),
        });
    }

    persistence
        .delete_answer(answer_id)
        .map_err(|e| translate_persistence_error("Answer", e))
}

/// Validates one submission and upserts it.
fn store_answer(
    persistence: &mut SqlitePersistence,
    user: &AuthenticatedUser,
    survey_id: i64,
    submission: &AnswerSubmission,
) -> Result<i64, ApiError> {
    let target: AnswerTarget =
        AnswerTarget::from_parts(submission.question_id, submission.program_question_id)
            .map_err(translate_domain_error)?;

    let (kind, options) = resolve_target(persistence, survey_id, user, target)?;

    let stored: String = validate_answer(kind, options.as_ref(), &submission.value)
        .map_err(translate_domain_error)?;

    persistence
        .upsert_answer(survey_id, &user.user_id, target, &stored)
        .map_err(|e| translate_persistence_error("Answer", e))
}

/// Resolves an answer target to its question kind and parsed options,
/// checking the question belongs to the survey and, for overlay questions,
/// that the respondent belongs to the program study.
fn resolve_target(
    persistence: &mut SqlitePersistence,
    survey_id: i64,
    user: &AuthenticatedUser,
    target: AnswerTarget,
) -> Result<(QuestionKind, Option<OptionsList>), ApiError> {
    match target {
        AnswerTarget::Question(question_id) => {
            let question = require_question_in_survey(persistence, survey_id, question_id)?;
            let kind: QuestionKind =
                QuestionKind::from_str(&question.question_kind).map_err(translate_domain_error)?;
            let options: Option<OptionsList> = parse_stored_options(question.options.as_deref())?;
            Ok((kind, options))
        }
        AnswerTarget::ProgramQuestion(program_question_id) => {
            let question = persistence
                .get_program_question(program_question_id)
                .map_err(|e| translate_persistence_error("Program question", e))?
                .filter(|q| q.survey_id == survey_id)
                .ok_or_else(|| ApiError::ResourceNotFound {
                    resource_type: String::from("Program question"),
                    message: format!(
                        "Program question {program_question_id} is not part of survey {survey_id}"
                    ),
                })?;

            let respondent: UserData = require_user(persistence, &user.user_id)?;
            if respondent.program_study_id != Some(question.program_study_id) {
                return Err(ApiError::Unauthorized {
                    action: String::from("answer_program_question"),
                    required_role: String::from("membership in the question's program study"),
                });
            }

            let kind: QuestionKind =
                QuestionKind::from_str(&question.question_kind).map_err(translate_domain_error)?;
            let options: Option<OptionsList> = parse_stored_options(question.options.as_deref())?;
            Ok((kind, options))
        }
    }
}

/// Advances progression and fires the supervisor chain after a stored
/// submission.
fn finish_submission(
    persistence: &mut SqlitePersistence,
    mailer: &dyn Mailer,
    user: &AuthenticatedUser,
    survey: &SurveyData,
) {
    let Ok(kind) = SurveyKind::from_str(&survey.survey_kind) else {
        tracing::warn!(
            survey_id = survey.survey_id,
            kind = %survey.survey_kind,
            "Stored survey kind is invalid; skipping progression"
        );
        return;
    };

    if let Err(e) = advance_progression(persistence, &user.user_id, kind) {
        tracing::warn!(
            user_id = %user.user_id,
            error = %e,
            "Failed to advance survey progression"
        );
    }

    if kind == SurveyKind::Lv1 {
        crate::supervisor::notify_supervisor(persistence, mailer, &user.user_id, survey.survey_id);
    }
}

/// Moves a user's progression marker forward, never backward.
fn advance_progression(
    persistence: &mut SqlitePersistence,
    user_id: &str,
    kind: SurveyKind,
) -> Result<(), ApiError> {
    let user: UserData = require_user(persistence, user_id)?;

    let current: SurveyProgress =
        SurveyProgress::from_str(&user.last_survey).map_err(|e| ApiError::Internal {
            message: format!("Stored progression marker is invalid: {e}"),
        })?;

    let next: SurveyProgress = current.advanced_by(kind);
    if next != current {
        persistence
            .update_last_survey(user_id, next.as_str())
            .map_err(|e| translate_persistence_error("User", e))?;
        info!(user_id = %user_id, marker = %next, "Advanced survey progression");
    }
    Ok(())
}

/// Decodes a stored answer row into its typed response form.
fn decode_answer_row(
    persistence: &mut SqlitePersistence,
    answer: AnswerData,
) -> Result<AnswerInfo, ApiError> {
    let kind: QuestionKind = match (answer.question_id, answer.program_question_id) {
        (Some(question_id), _) => persistence
            .get_question(question_id)
            .map_err(|e| translate_persistence_error("Question", e))?
            .map_or(QuestionKind::Text, |q| {
                QuestionKind::from_str(&q.question_kind).unwrap_or(QuestionKind::Text)
            }),
        (None, Some(program_question_id)) => persistence
            .get_program_question(program_question_id)
            .map_err(|e| translate_persistence_error("Program question", e))?
            .map_or(QuestionKind::Text, |q| {
                QuestionKind::from_str(&q.question_kind).unwrap_or(QuestionKind::Text)
            }),
        (None, None) => QuestionKind::Text,
    };

    let value: Value = payload_to_value(decode_answer(kind, &answer.value));

    Ok(AnswerInfo {
        answer_id: answer.answer_id,
        survey_id: answer.survey_id,
        user_id: answer.user_id,
        question_id: answer.question_id,
        program_question_id: answer.program_question_id,
        value,
        created_at: answer.created_at,
    })
}

/// Renders a decoded answer payload as a JSON value.
fn payload_to_value(payload: AnswerPayload) -> Value {
    match payload {
        AnswerPayload::Text(text) => Value::String(text),
        AnswerPayload::Integer(n) | AnswerPayload::Scale(n) => Value::from(n),
        AnswerPayload::Float(x) => Value::from(x),
        AnswerPayload::Selections(values) => Value::from(values),
    }
}

fn parse_stored_options(raw: Option<&str>) -> Result<Option<OptionsList>, ApiError> {
    raw.map(|s| {
        OptionsList::parse(s).map_err(|e| ApiError::Internal {
            message: format!("Stored options are not canonical: {e}"),
        })
    })
    .transpose()
}

fn require_user(
    persistence: &mut SqlitePersistence,
    user_id: &str,
) -> Result<UserData, ApiError> {
    persistence
        .get_user_by_id(user_id)
        .map_err(|e| translate_persistence_error("User", e))?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("User"),
            message: format!("User '{user_id}' does not exist"),
        })
}

/// Loads a question and checks it belongs to the survey through its
/// section.
pub(crate) fn require_question_in_survey(
    persistence: &mut SqlitePersistence,
    survey_id: i64,
    question_id: i64,
) -> Result<tracer_persistence::QuestionData, ApiError> {
    let question = persistence
        .get_question(question_id)
        .map_err(|e| translate_persistence_error("Question", e))?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Question"),
            message: format!("Question {question_id} does not exist"),
        })?;

    let section = persistence
        .get_section(question.section_id)
        .map_err(|e| translate_persistence_error("Section", e))?
        .filter(|s| s.survey_id == survey_id);
    if section.is_none() {
        return Err(ApiError::ResourceNotFound {
            resource_type: String::from("Question"),
            message: format!("Question {question_id} is not part of survey {survey_id}"),
        });
    }
    Ok(question)
}

fn require_answer_in_survey(
    persistence: &mut SqlitePersistence,
    survey_id: i64,
    answer_id: i64,
) -> Result<AnswerData, ApiError> {
    persistence
        .get_answer(answer_id)
        .map_err(|e| translate_persistence_error("Answer", e))?
        .filter(|a| a.survey_id == survey_id)
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Answer"),
            message: format!("Answer {answer_id} is not part of survey {survey_id}"),
        })
}

/// Denies reads of answers outside the caller's scope.
fn require_answer_visible(
    persistence: &mut SqlitePersistence,
    user: &AuthenticatedUser,
    answer: &AnswerData,
) -> Result<(), ApiError> {
    match AuthorizationService::answer_scope(user) {
        AnswerScope::All => Ok(()),
        AnswerScope::ProgramStudy(program_study_id) => {
            let owner: UserData = require_user(persistence, &answer.user_id)?;
            if owner.program_study_id == Some(program_study_id) {
                Ok(())
            } else {
                Err(ApiError::Unauthorized {
                    action: String::from("read_answer"),
                    required_role: String::from("scope covering the answer's owner"),
                })
            }
        }
        AnswerScope::SelfOnly => {
            if answer.user_id == user.user_id {
                Ok(())
            } else {
                Err(ApiError::Unauthorized {
                    action: String::from("read_answer"),
                    required_role: String::from("the answer's owner"),
                })
            }
        }
    }
}
