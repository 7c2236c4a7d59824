// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Survey authoring: surveys, sections, questions, branches, and
//! program-study overlay questions.
//!
//! All option lists are canonicalized to a JSON array of strings before
//! storage, and branch declarations are checked against the domain rules
//! (radio questions only, trigger value among the declared options).

use std::str::FromStr;
use time::OffsetDateTime;
use time::format_description::well_known::Iso8601;
use tracing::info;
use tracer_domain::{OptionsList, QuestionKind, SurveyKind, validate_branch};
use tracer_persistence::{
    NewBranch, NewQuestion, NewSection, NewSurvey, ProgramQuestionData, SectionData,
    SqlitePersistence, SurveyData,
};

use crate::auth::{AuthenticatedUser, AuthorizationService};
use crate::error::{ApiError, translate_domain_error, translate_persistence_error};
use crate::request_response::{QuestionInfo, QuestionPayload, SectionPayload, SurveyPayload};

/// Creates a survey.
///
/// # Errors
///
/// Returns an error if the caller may not author surveys, the kind is not
/// one of exit/lv1/lv2/skp, or a window timestamp is malformed.
pub fn create_survey(
    persistence: &mut SqlitePersistence,
    actor: &AuthenticatedUser,
    request: &SurveyPayload,
) -> Result<i64, ApiError> {
    AuthorizationService::authorize_manage_surveys(actor)?;
    validate_survey_payload(persistence, request)?;

    let new_survey: NewSurvey = NewSurvey {
        title: request.title.clone(),
        description: request.description.clone(),
        survey_kind: request.survey_kind.clone(),
        is_active: request.is_active,
        period_id: request.period_id,
        created_by: Some(actor.user_id.clone()),
        start_at: request.start_at.clone(),
        end_at: request.end_at.clone(),
    };

    let survey_id: i64 = persistence
        .create_survey(&new_survey)
        .map_err(|e| translate_persistence_error("Survey", e))?;

    info!(actor = %actor.user_id, survey_id, kind = %request.survey_kind, "Created survey");
    Ok(survey_id)
}

/// Updates a survey, preserving its creator reference.
///
/// # Errors
///
/// Returns an error if the caller may not author surveys, the survey does
/// not exist, or the payload is invalid.
pub fn update_survey(
    persistence: &mut SqlitePersistence,
    actor: &AuthenticatedUser,
    survey_id: i64,
    request: &SurveyPayload,
) -> Result<(), ApiError> {
    AuthorizationService::authorize_manage_surveys(actor)?;
    validate_survey_payload(persistence, request)?;

    let existing: SurveyData = get_survey(persistence, survey_id)?;

    let changes: NewSurvey = NewSurvey {
        title: request.title.clone(),
        description: request.description.clone(),
        survey_kind: request.survey_kind.clone(),
        is_active: request.is_active,
        period_id: request.period_id,
        created_by: existing.created_by,
        start_at: request.start_at.clone(),
        end_at: request.end_at.clone(),
    };

    persistence
        .update_survey(survey_id, &changes)
        .map_err(|e| translate_persistence_error("Survey", e))
}

/// Deletes a survey and everything beneath it.
///
/// # Errors
///
/// Returns an error if the caller may not author surveys or the survey
/// does not exist.
pub fn delete_survey(
    persistence: &mut SqlitePersistence,
    actor: &AuthenticatedUser,
    survey_id: i64,
) -> Result<(), ApiError> {
    AuthorizationService::authorize_manage_surveys(actor)?;

    persistence
        .delete_survey(survey_id)
        .map_err(|e| translate_persistence_error("Survey", e))?;

    info!(actor = %actor.user_id, survey_id, "Deleted survey");
    Ok(())
}

/// Retrieves a survey.
///
/// # Errors
///
/// Returns an error if the survey does not exist.
pub fn get_survey(
    persistence: &mut SqlitePersistence,
    survey_id: i64,
) -> Result<SurveyData, ApiError> {
    persistence
        .get_survey(survey_id)
        .map_err(|e| translate_persistence_error("Survey", e))?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Survey"),
            message: format!("Survey {survey_id} does not exist"),
        })
}

/// Retrieves all surveys.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_surveys(persistence: &mut SqlitePersistence) -> Result<Vec<SurveyData>, ApiError> {
    persistence
        .list_surveys()
        .map_err(|e| translate_persistence_error("Survey", e))
}

/// Creates a section in a survey.
///
/// # Errors
///
/// Returns an error if the caller may not author surveys or the survey
/// does not exist.
pub fn create_section(
    persistence: &mut SqlitePersistence,
    actor: &AuthenticatedUser,
    survey_id: i64,
    request: &SectionPayload,
) -> Result<i64, ApiError> {
    AuthorizationService::authorize_manage_surveys(actor)?;
    get_survey(persistence, survey_id)?;

    let new_section: NewSection = NewSection {
        title: request.title.clone(),
        description: request.description.clone(),
        sort_order: request.sort_order,
    };

    persistence
        .create_section(survey_id, &new_section)
        .map_err(|e| translate_persistence_error("Section", e))
}

/// Updates a section.
///
/// # Errors
///
/// Returns an error if the caller may not author surveys or the section
/// is not part of the survey.
pub fn update_section(
    persistence: &mut SqlitePersistence,
    actor: &AuthenticatedUser,
    survey_id: i64,
    section_id: i64,
    request: &SectionPayload,
) -> Result<(), ApiError> {
    AuthorizationService::authorize_manage_surveys(actor)?;
    require_section_in_survey(persistence, survey_id, section_id)?;

    let changes: NewSection = NewSection {
        title: request.title.clone(),
        description: request.description.clone(),
        sort_order: request.sort_order,
    };

    persistence
        .update_section(section_id, &changes)
        .map_err(|e| translate_persistence_error("Section", e))
}

/// Deletes a section and its questions.
///
/// # Errors
///
/// Returns an error if the caller may not author surveys or the section
/// is not part of the survey.
pub fn delete_section(
    persistence: &mut SqlitePersistence,
    actor: &AuthenticatedUser,
    survey_id: i64,
    section_id: i64,
) -> Result<(), ApiError> {
    AuthorizationService::authorize_manage_surveys(actor)?;
    require_section_in_survey(persistence, survey_id, section_id)?;

    persistence
        .delete_section(section_id)
        .map_err(|e| translate_persistence_error("Section", e))
}

/// Retrieves the sections of a survey in sort order.
///
/// # Errors
///
/// Returns an error if the survey does not exist.
pub fn list_sections(
    persistence: &mut SqlitePersistence,
    survey_id: i64,
) -> Result<Vec<SectionData>, ApiError> {
    get_survey(persistence, survey_id)?;

    persistence
        .list_sections(survey_id)
        .map_err(|e| translate_persistence_error("Section", e))
}

/// Creates a question in a section, with its branches.
///
/// # Errors
///
/// Returns an error if the caller may not author surveys, the section is
/// not part of the survey, the payload is invalid, or a branch violates
/// the branch rules.
pub fn create_question(
    persistence: &mut SqlitePersistence,
    actor: &AuthenticatedUser,
    survey_id: i64,
    section_id: i64,
    request: &QuestionPayload,
) -> Result<i64, ApiError> {
    AuthorizationService::authorize_manage_surveys(actor)?;
    require_section_in_survey(persistence, survey_id, section_id)?;

    let (new_question, branches) = validate_question_payload(persistence, survey_id, request)?;

    let question_id: i64 = persistence
        .create_question(section_id, &new_question, &branches)
        .map_err(|e| translate_persistence_error("Question", e))?;

    info!(actor = %actor.user_id, survey_id, question_id, "Created question");
    Ok(question_id)
}

/// Updates a question, replacing its branch list wholesale.
///
/// # Errors
///
/// Returns an error if the caller may not author surveys, the question is
/// not part of the section, or the payload is invalid.
pub fn update_question(
    persistence: &mut SqlitePersistence,
    actor: &AuthenticatedUser,
    survey_id: i64,
    section_id: i64,
    question_id: i64,
    request: &QuestionPayload,
) -> Result<(), ApiError> {
    AuthorizationService::authorize_manage_surveys(actor)?;
    require_question_in_section(persistence, survey_id, section_id, question_id)?;

    let (changes, branches) = validate_question_payload(persistence, survey_id, request)?;

    persistence
        .update_question(question_id, &changes, &branches)
        .map_err(|e| translate_persistence_error("Question", e))
}

/// Deletes a question and its branches.
///
/// # Errors
///
/// Returns an error if the caller may not author surveys or the question
/// is not part of the section.
pub fn delete_question(
    persistence: &mut SqlitePersistence,
    actor: &AuthenticatedUser,
    survey_id: i64,
    section_id: i64,
    question_id: i64,
) -> Result<(), ApiError> {
    AuthorizationService::authorize_manage_surveys(actor)?;
    require_question_in_section(persistence, survey_id, section_id, question_id)?;

    persistence
        .delete_question(question_id)
        .map_err(|e| translate_persistence_error("Question", e))
}

/// Retrieves a question with its branches.
///
/// # Errors
///
/// Returns an error if the question is not part of the section.
pub fn get_question(
    persistence: &mut SqlitePersistence,
    survey_id: i64,
    section_id: i64,
    question_id: i64,
) -> Result<QuestionInfo, ApiError> {
    let question = require_question_in_section(persistence, survey_id, section_id, question_id)?;

    let branches = persistence
        .list_branches(question_id)
        .map_err(|e| translate_persistence_error("Branch", e))?;

    Ok(QuestionInfo { question, branches })
}

/// Retrieves the questions of a section, each with its branches.
///
/// # Errors
///
/// Returns an error if the section is not part of the survey.
pub fn list_questions(
    persistence: &mut SqlitePersistence,
    survey_id: i64,
    section_id: i64,
) -> Result<Vec<QuestionInfo>, ApiError> {
    require_section_in_survey(persistence, survey_id, section_id)?;

    let questions = persistence
        .list_questions(section_id)
        .map_err(|e| translate_persistence_error("Question", e))?;

    let mut infos: Vec<QuestionInfo> = Vec::with_capacity(questions.len());
    for question in questions {
        let branches = persistence
            .list_branches(question.question_id)
            .map_err(|e| translate_persistence_error("Branch", e))?;
        infos.push(QuestionInfo { question, branches });
    }
    Ok(infos)
}

/// Creates a program-study overlay question.
///
/// Overlay questions carry no branches.
///
/// # Errors
///
/// Returns an error if the caller may not touch the program study's
/// overlay, the survey or program study does not exist, or the payload is
/// invalid.
pub fn create_program_question(
    persistence: &mut SqlitePersistence,
    actor: &AuthenticatedUser,
    survey_id: i64,
    program_study_id: i64,
    request: &QuestionPayload,
) -> Result<i64, ApiError> {
    AuthorizationService::authorize_manage_program_questions(actor, program_study_id)?;
    get_survey(persistence, survey_id)?;
    crate::units::get_program_study(persistence, program_study_id)?;

    let new_question: NewQuestion = validate_overlay_payload(request)?;

    let program_question_id: i64 = persistence
        .create_program_question(survey_id, program_study_id, &new_question)
        .map_err(|e| translate_persistence_error("Program question", e))?;

    info!(
        actor = %actor.user_id,
        survey_id,
        program_study_id,
        program_question_id,
        "Created program question"
    );
    Ok(program_question_id)
}

/// Updates a program-study overlay question.
///
/// # Errors
///
/// Returns an error if the caller may not touch the program study's
/// overlay or the question is not part of the (survey, program study)
/// overlay.
pub fn update_program_question(
    persistence: &mut SqlitePersistence,
    actor: &AuthenticatedUser,
    survey_id: i64,
    program_study_id: i64,
    program_question_id: i64,
    request: &QuestionPayload,
) -> Result<(), ApiError> {
    AuthorizationService::authorize_manage_program_questions(actor, program_study_id)?;
    require_program_question_in_overlay(
        persistence,
        survey_id,
        program_study_id,
        program_question_id,
    )?;

    let changes: NewQuestion = validate_overlay_payload(request)?;

    persistence
        .update_program_question(program_question_id, &changes)
        .map_err(|e| translate_persistence_error("Program question", e))
}

/// Deletes a program-study overlay question.
///
/// # Errors
///
/// Returns an error if the caller may not touch the program study's
/// overlay or the question is not part of the overlay.
pub fn delete_program_question(
    persistence: &mut SqlitePersistence,
    actor: &AuthenticatedUser,
    survey_id: i64,
    program_study_id: i64,
    program_question_id: i64,
) -> Result<(), ApiError> {
    AuthorizationService::authorize_manage_program_questions(actor, program_study_id)?;
    require_program_question_in_overlay(
        persistence,
        survey_id,
        program_study_id,
        program_question_id,
    )?;

    persistence
        .delete_program_question(program_question_id)
        .map_err(|e| translate_persistence_error("Program question", e))
}

/// Retrieves the overlay questions of a survey for one program study.
///
/// # Errors
///
/// Returns an error if the survey does not exist.
pub fn list_program_questions(
    persistence: &mut SqlitePersistence,
    survey_id: i64,
    program_study_id: i64,
) -> Result<Vec<ProgramQuestionData>, ApiError> {
    get_survey(persistence, survey_id)?;

    persistence
        .list_program_questions(survey_id, program_study_id)
        .map_err(|e| translate_persistence_error("Program question", e))
}

/// Checks the survey kind and window timestamps of a survey payload.
fn validate_survey_payload(
    persistence: &mut SqlitePersistence,
    request: &SurveyPayload,
) -> Result<(), ApiError> {
    SurveyKind::from_str(&request.survey_kind).map_err(translate_domain_error)?;

    validate_window_timestamp("start_at", request.start_at.as_deref())?;
    validate_window_timestamp("end_at", request.end_at.as_deref())?;

    if let Some(period_id) = request.period_id {
        crate::units::get_period(persistence, period_id)?;
    }
    Ok(())
}

fn validate_window_timestamp(field: &str, value: Option<&str>) -> Result<(), ApiError> {
    if let Some(raw) = value {
        OffsetDateTime::parse(raw, &Iso8601::DEFAULT).map_err(|e| ApiError::InvalidInput {
            field: field.to_string(),
            message: format!("'{raw}' is not an ISO 8601 timestamp: {e}"),
        })?;
    }
    Ok(())
}

/// Validates a question payload and its branches against the domain rules.
///
/// Branch targets must be sections of the same survey.
fn validate_question_payload(
    persistence: &mut SqlitePersistence,
    survey_id: i64,
    request: &QuestionPayload,
) -> Result<(NewQuestion, Vec<NewBranch>), ApiError> {
    let kind: QuestionKind =
        QuestionKind::from_str(&request.question_kind).map_err(translate_domain_error)?;

    let options: Option<OptionsList> = parse_options(request)?;

    let mut branches: Vec<NewBranch> = Vec::with_capacity(request.branches.len());
    for branch in &request.branches {
        validate_branch(kind, options.as_ref(), &branch.answer_value)
            .map_err(translate_domain_error)?;

        let target: SectionData =
            require_section_in_survey(persistence, survey_id, branch.next_section_id).map_err(
                |_| ApiError::DomainRuleViolation {
                    rule: String::from("branch_target_in_survey"),
                    message: format!(
                        "Branch target section {} is not part of survey {survey_id}",
                        branch.next_section_id
                    ),
                },
            )?;

        branches.push(NewBranch {
            answer_value: branch.answer_value.clone(),
            next_section_id: target.section_id,
        });
    }

    Ok((build_new_question(request, options.as_ref()), branches))
}

/// Validates an overlay question payload, which may not carry branches.
fn validate_overlay_payload(request: &QuestionPayload) -> Result<NewQuestion, ApiError> {
    QuestionKind::from_str(&request.question_kind).map_err(translate_domain_error)?;

    if !request.branches.is_empty() {
        return Err(ApiError::DomainRuleViolation {
            rule: String::from("no_overlay_branches"),
            message: String::from("Program questions may not declare branches"),
        });
    }

    let options: Option<OptionsList> = parse_options(request)?;
    Ok(build_new_question(request, options.as_ref()))
}

fn parse_options(request: &QuestionPayload) -> Result<Option<OptionsList>, ApiError> {
    request
        .options
        .clone()
        .map(|values| OptionsList::from_values(values).map_err(translate_domain_error))
        .transpose()
}

fn build_new_question(request: &QuestionPayload, options: Option<&OptionsList>) -> NewQuestion {
    NewQuestion {
        prompt: request.prompt.clone(),
        question_kind: request.question_kind.clone(),
        options: options.map(OptionsList::to_json),
        code: request.code.clone(),
        is_required: request.is_required,
        sort_order: request.sort_order,
    }
}

/// Loads a section and checks it belongs to the survey.
fn require_section_in_survey(
    persistence: &mut SqlitePersistence,
    survey_id: i64,
    section_id: i64,
) -> Result<SectionData, ApiError> {
    let section = persistence
        .get_section(section_id)
        .map_err(|e| translate_persistence_error("Section", e))?
        .filter(|s| s.survey_id == survey_id)
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Section"),
            message: format!("Section {section_id} is not part of survey {survey_id}"),
        })?;
    Ok(section)
}

/// Loads a question and checks it belongs to the section and survey.
fn require_question_in_section(
    persistence: &mut SqlitePersistence,
    survey_id: i64,
    section_id: i64,
    question_id: i64,
) -> Result<tracer_persistence::QuestionData, ApiError> {
    require_section_in_survey(persistence, survey_id, section_id)?;

    let question = persistence
        .get_question(question_id)
        .map_err(|e| translate_persistence_error("Question", e))?
        .filter(|q| q.section_id == section_id)
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Question"),
            message: format!("Question {question_id} is not part of section {section_id}"),
        })?;
    Ok(question)
}

/// Loads an overlay question and checks its (survey, program study) scope.
pub(crate) fn require_program_question_in_overlay(
    persistence: &mut SqlitePersistence,
    survey_id: i64,
    program_study_id: i64,
    program_question_id: i64,
) -> Result<ProgramQuestionData, ApiError> {
    let question = persistence
        .get_program_question(program_question_id)
        .map_err(|e| translate_persistence_error("Program question", e))?
        .filter(|q| q.survey_id == survey_id && q.program_study_id == program_study_id)
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Program question"),
            message: format!(
                "Program question {program_question_id} is not part of survey {survey_id} for program study {program_study_id}"
            ),
        })?;
    Ok(question)
}
