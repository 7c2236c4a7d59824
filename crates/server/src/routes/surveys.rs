// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Survey authoring routes: surveys, sections, questions, and program-study
//! overlay questions.

use axum::Json;
use axum::extract::{Path, State as AxumState};
use axum::http::{HeaderMap, StatusCode};
use tracing::info;
use tracer_api::AuthenticatedUser;
use tracer_api::request_response::{QuestionInfo, QuestionPayload, SectionPayload, SurveyPayload};
use tracer_api::surveys;
use tracer_persistence::{ProgramQuestionData, SectionData, SurveyData};

use crate::error::HttpError;
use crate::routes::{CreatedResponse, StatusResponse};
use crate::state::{AppState, authenticate};

/// Handler for GET `/api/surveys`.
pub async fn handle_list_surveys(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<SurveyData>>, HttpError> {
    authenticate(&app_state, &headers).await?;

    let mut persistence = app_state.persistence.lock().await;
    let surveys: Vec<SurveyData> = surveys::list_surveys(&mut persistence)?;
    drop(persistence);

    Ok(Json(surveys))
}

/// Handler for POST `/api/surveys`.
pub async fn handle_create_survey(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Json(req): Json<SurveyPayload>,
) -> Result<(StatusCode, Json<CreatedResponse>), HttpError> {
    let actor: AuthenticatedUser = authenticate(&app_state, &headers).await?;
    info!(actor = %actor.user_id, title = %req.title, "Handling create_survey request");

    let mut persistence = app_state.persistence.lock().await;
    let survey_id: i64 = surveys::create_survey(&mut persistence, &actor, &req)?;
    drop(persistence);

    Ok((StatusCode::CREATED, Json(CreatedResponse { id: survey_id })))
}

/// Handler for GET `/api/surveys/{survey_id}`.
pub async fn handle_get_survey(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Path(survey_id): Path<i64>,
) -> Result<Json<SurveyData>, HttpError> {
    authenticate(&app_state, &headers).await?;

    let mut persistence = app_state.persistence.lock().await;
    let survey: SurveyData = surveys::get_survey(&mut persistence, survey_id)?;
    drop(persistence);

    Ok(Json(survey))
}

/// Handler for PUT `/api/surveys/{survey_id}`.
pub async fn handle_update_survey(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Path(survey_id): Path<i64>,
    Json(req): Json<SurveyPayload>,
) -> Result<Json<StatusResponse>, HttpError> {
    let actor: AuthenticatedUser = authenticate(&app_state, &headers).await?;
    info!(actor = %actor.user_id, survey_id, "Handling update_survey request");

    let mut persistence = app_state.persistence.lock().await;
    surveys::update_survey(&mut persistence, &actor, survey_id, &req)?;
    drop(persistence);

    Ok(Json(StatusResponse::ok()))
}

/// Handler for DELETE `/api/surveys/{survey_id}`.
pub async fn handle_delete_survey(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Path(survey_id): Path<i64>,
) -> Result<Json<StatusResponse>, HttpError> {
    let actor: AuthenticatedUser = authenticate(&app_state, &headers).await?;
    info!(actor = %actor.user_id, survey_id, "Handling delete_survey request");

    let mut persistence = app_state.persistence.lock().await;
    surveys::delete_survey(&mut persistence, &actor, survey_id)?;
    drop(persistence);

    Ok(Json(StatusResponse::ok()))
}

/// Handler for GET `/api/surveys/{survey_id}/sections`.
pub async fn handle_list_sections(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Path(survey_id): Path<i64>,
) -> Result<Json<Vec<SectionData>>, HttpError> {
    authenticate(&app_state, &headers).await?;

    let mut persistence = app_state.persistence.lock().await;
    let sections: Vec<SectionData> = surveys::list_sections(&mut persistence, survey_id)?;
    drop(persistence);

    Ok(Json(sections))
}

/// Handler for POST `/api/surveys/{survey_id}/sections`.
pub async fn handle_create_section(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Path(survey_id): Path<i64>,
    Json(req): Json<SectionPayload>,
) -> Result<(StatusCode, Json<CreatedResponse>), HttpError> {
    let actor: AuthenticatedUser = authenticate(&app_state, &headers).await?;
    info!(actor = %actor.user_id, survey_id, "Handling create_section request");

    let mut persistence = app_state.persistence.lock().await;
    let section_id: i64 = surveys::create_section(&mut persistence, &actor, survey_id, &req)?;
    drop(persistence);

    Ok((StatusCode::CREATED, Json(CreatedResponse { id: section_id })))
}

/// Handler for PUT `/api/surveys/{survey_id}/sections/{section_id}`.
pub async fn handle_update_section(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Path((survey_id, section_id)): Path<(i64, i64)>,
    Json(req): Json<SectionPayload>,
) -> Result<Json<StatusResponse>, HttpError> {
    let actor: AuthenticatedUser = authenticate(&app_state, &headers).await?;
    info!(actor = %actor.user_id, survey_id, section_id, "Handling update_section request");

    let mut persistence = app_state.persistence.lock().await;
    surveys::update_section(&mut persistence, &actor, survey_id, section_id, &req)?;
    drop(persistence);

    Ok(Json(StatusResponse::ok()))
}

/// Handler for DELETE `/api/surveys/{survey_id}/sections/{section_id}`.
pub async fn handle_delete_section(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Path((survey_id, section_id)): Path<(i64, i64)>,
) -> Result<Json<StatusResponse>, HttpError> {
    let actor: AuthenticatedUser = authenticate(&app_state, &headers).await?;
    info!(actor = %actor.user_id, survey_id, section_id, "Handling delete_section request");

    let mut persistence = app_state.persistence.lock().await;
    surveys::delete_section(&mut persistence, &actor, survey_id, section_id)?;
    drop(persistence);

    Ok(Json(StatusResponse::ok()))
}

/// Handler for GET `/api/surveys/{survey_id}/sections/{section_id}/questions`.
pub async fn handle_list_questions(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Path((survey_id, section_id)): Path<(i64, i64)>,
) -> Result<Json<Vec<QuestionInfo>>, HttpError> {
    authenticate(&app_state, &headers).await?;

    let mut persistence = app_state.persistence.lock().await;
    let questions: Vec<QuestionInfo> =
        surveys::list_questions(&mut persistence, survey_id, section_id)?;
    drop(persistence);

    Ok(Json(questions))
}

/// Handler for POST `/api/surveys/{survey_id}/sections/{section_id}/questions`.
pub async fn handle_create_question(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Path((survey_id, section_id)): Path<(i64, i64)>,
    Json(req): Json<QuestionPayload>,
) -> Result<(StatusCode, Json<CreatedResponse>), HttpError> {
    let actor: AuthenticatedUser = authenticate(&app_state, &headers).await?;
    info!(actor = %actor.user_id, survey_id, section_id, "Handling create_question request");

    let mut persistence = app_state.persistence.lock().await;
    let question_id: i64 =
        surveys::create_question(&mut persistence, &actor, survey_id, section_id, &req)?;
    drop(persistence);

    Ok((StatusCode::CREATED, Json(CreatedResponse { id: question_id })))
}

/// Handler for GET
/// `/api/surveys/{survey_id}/sections/{section_id}/questions/{question_id}`.
pub async fn handle_get_question(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Path((survey_id, section_id, question_id)): Path<(i64, i64, i64)>,
) -> Result<Json<QuestionInfo>, HttpError> {
    authenticate(&app_state, &headers).await?;

    let mut persistence = app_state.persistence.lock().await;
    let question: QuestionInfo =
        surveys::get_question(&mut persistence, survey_id, section_id, question_id)?;
    drop(persistence);

    Ok(Json(question))
}

/// Handler for PUT
/// `/api/surveys/{survey_id}/sections/{section_id}/questions/{question_id}`.
pub async fn handle_update_question(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Path((survey_id, section_id, question_id)): Path<(i64, i64, i64)>,
    Json(req): Json<QuestionPayload>,
) -> Result<Json<StatusResponse>, HttpError> {
    let actor: AuthenticatedUser = authenticate(&app_state, &headers).await?;
    info!(
        actor = %actor.user_id,
        survey_id,
        question_id,
        "Handling update_question request"
    );

    let mut persistence = app_state.persistence.lock().await;
    surveys::update_question(
        &mut persistence,
        &actor,
        survey_id,
        section_id,
        question_id,
        &req,
    )?;
    drop(persistence);

    Ok(Json(StatusResponse::ok()))
}

/// Handler for DELETE
/// `/api/surveys/{survey_id}/sections/{section_id}/questions/{question_id}`.
pub async fn handle_delete_question(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Path((survey_id, section_id, question_id)): Path<(i64, i64, i64)>,
) -> Result<Json<StatusResponse>, HttpError> {
    let actor: AuthenticatedUser = authenticate(&app_state, &headers).await?;
    info!(
        actor = %actor.user_id,
        survey_id,
        question_id,
        "Handling delete_question request"
    );

    let mut persistence = app_state.persistence.lock().await;
    surveys::delete_question(&mut persistence, &actor, survey_id, section_id, question_id)?;
    drop(persistence);

    Ok(Json(StatusResponse::ok()))
}

/// Handler for GET
/// `/api/surveys/{survey_id}/program-studies/{program_study_id}/questions`.
pub async fn handle_list_program_questions(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Path((survey_id, program_study_id)): Path<(i64, i64)>,
) -> Result<Json<Vec<ProgramQuestionData>>, HttpError> {
    authenticate(&app_state, &headers).await?;

    let mut persistence = app_state.persistence.lock().await;
    let questions: Vec<ProgramQuestionData> =
        surveys::list_program_questions(&mut persistence, survey_id, program_study_id)?;
    drop(persistence);

    Ok(Json(questions))
}

/// Handler for POST
/// `/api/surveys/{survey_id}/program-studies/{program_study_id}/questions`.
pub async fn handle_create_program_question(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Path((survey_id, program_study_id)): Path<(i64, i64)>,
    Json(req): Json<QuestionPayload>,
) -> Result<(StatusCode, Json<CreatedResponse>), HttpError> {
    let actor: AuthenticatedUser = authenticate(&app_state, &headers).await?;
    info!(
        actor = %actor.user_id,
        survey_id,
        program_study_id,
        "Handling create_program_question request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let question_id: i64 =
        surveys::create_program_question(&mut persistence, &actor, survey_id, program_study_id, &req)?;
    drop(persistence);

    Ok((StatusCode::CREATED, Json(CreatedResponse { id: question_id })))
}

/// Handler for PUT
/// `/api/surveys/{survey_id}/program-studies/{program_study_id}/questions/{question_id}`.
pub async fn handle_update_program_question(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Path((survey_id, program_study_id, question_id)): Path<(i64, i64, i64)>,
    Json(req): Json<QuestionPayload>,
) -> Result<Json<StatusResponse>, HttpError> {
    let actor: AuthenticatedUser = authenticate(&app_state, &headers).await?;
    info!(
        actor = %actor.user_id,
        survey_id,
        program_study_id,
        question_id,
        "Handling update_program_question request"
    );

    let mut persistence = app_state.persistence.lock().await;
    surveys::update_program_question(
        &mut persistence,
        &actor,
        survey_id,
        program_study_id,
        question_id,
        &req,
    )?;
    drop(persistence);

    Ok(Json(StatusResponse::ok()))
}

/// Handler for DELETE
/// `/api/surveys/{survey_id}/program-studies/{program_study_id}/questions/{question_id}`.
pub async fn handle_delete_program_question(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Path((survey_id, program_study_id, question_id)): Path<(i64, i64, i64)>,
) -> Result<Json<StatusResponse>, HttpError> {
    let actor: AuthenticatedUser = authenticate(&app_state, &headers).await?;
    info!(
        actor = %actor.user_id,
        survey_id,
        program_study_id,
        question_id,
        "Handling delete_program_question request"
    );

    let mut persistence = app_state.persistence.lock().await;
    surveys::delete_program_question(
        &mut persistence,
        &actor,
        survey_id,
        program_study_id,
        question_id,
    )?;
    drop(persistence);

    Ok(Json(StatusResponse::ok()))
}
