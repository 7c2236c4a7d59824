// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Answer intake routes and the tokenized supervisor submission route.

use axum::Json;
use axum::extract::{Path, State as AxumState};
use axum::http::{HeaderMap, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use tracer_api::AuthenticatedUser;
use tracer_api::answers;
use tracer_api::request_response::{
    AnswerInfo, AnswerSubmission, BulkAnswerOutcome, BulkAnswerRequest,
    SupervisorSubmissionRequest, SupervisorSubmissionResponse,
};
use tracer_api::supervisor;

use crate::error::HttpError;
use crate::routes::StatusResponse;
use crate::state::{AppState, authenticate};

/// Request to replace a stored answer's value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateAnswerRequest {
    /// The new value, typed per the question kind.
    pub value: Value,
}

/// Handler for GET `/api/surveys/{survey_id}/answers`.
///
/// The listing is filtered to the caller's answer scope.
pub async fn handle_list_answers(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Path(survey_id): Path<i64>,
) -> Result<Json<Vec<AnswerInfo>>, HttpError> {
    let user: AuthenticatedUser = authenticate(&app_state, &headers).await?;

    let mut persistence = app_state.persistence.lock().await;
    let listing: Vec<AnswerInfo> = answers::list_answers(&mut persistence, &user, survey_id)?;
    drop(persistence);

    Ok(Json(listing))
}

/// Handler for POST `/api/surveys/{survey_id}/answers`.
pub async fn handle_submit_answer(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Path(survey_id): Path<i64>,
    Json(req): Json<AnswerSubmission>,
) -> Result<(StatusCode, Json<AnswerInfo>), HttpError> {
    let user: AuthenticatedUser = authenticate(&app_state, &headers).await?;
    info!(user_id = %user.user_id, survey_id, "Handling submit_answer request");

    let mut persistence = app_state.persistence.lock().await;
    let answer: AnswerInfo = answers::submit_answer(
        &mut persistence,
        app_state.mailer.as_ref(),
        &user,
        survey_id,
        &req,
    )?;
    drop(persistence);

    Ok((StatusCode::CREATED, Json(answer)))
}

/// Handler for POST `/api/surveys/{survey_id}/answers/bulk`.
///
/// Responds 207 Multi-Status when some submissions failed; the body carries
/// per-index successes and failures either way.
pub async fn handle_submit_answers_bulk(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Path(survey_id): Path<i64>,
    Json(req): Json<BulkAnswerRequest>,
) -> Result<(StatusCode, Json<BulkAnswerOutcome>), HttpError> {
    let user: AuthenticatedUser = authenticate(&app_state, &headers).await?;
    info!(
        user_id = %user.user_id,
        survey_id,
        count = req.answers.len(),
        "Handling bulk answer request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let outcome: BulkAnswerOutcome = answers::submit_answers_bulk(
        &mut persistence,
        app_state.mailer.as_ref(),
        &user,
        survey_id,
        &req,
    )?;
    drop(persistence);

    let status: StatusCode = if outcome.failures.is_empty() {
        StatusCode::OK
    } else {
        StatusCode::MULTI_STATUS
    };

    Ok((status, Json(outcome)))
}

/// Handler for GET `/api/surveys/{survey_id}/answers/{answer_id}`.
pub async fn handle_get_answer(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Path((survey_id, answer_id)): Path<(i64, i64)>,
) -> Result<Json<AnswerInfo>, HttpError> {
    let user: AuthenticatedUser = authenticate(&app_state, &headers).await?;

    let mut persistence = app_state.persistence.lock().await;
    let answer: AnswerInfo = answers::get_answer(&mut persistence, &user, survey_id, answer_id)?;
    drop(persistence);

    Ok(Json(answer))
}

/// Handler for PUT `/api/surveys/{survey_id}/answers/{answer_id}`.
pub async fn handle_update_answer(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Path((survey_id, answer_id)): Path<(i64, i64)>,
    Json(req): Json<UpdateAnswerRequest>,
) -> Result<Json<AnswerInfo>, HttpError> {
    let user: AuthenticatedUser = authenticate(&app_state, &headers).await?;
    info!(user_id = %user.user_id, survey_id, answer_id, "Handling update_answer request");

    let mut persistence = app_state.persistence.lock().await;
    let answer: AnswerInfo =
        answers::update_answer(&mut persistence, &user, survey_id, answer_id, &req.value)?;
    drop(persistence);

    Ok(Json(answer))
}

/// Handler for DELETE `/api/surveys/{survey_id}/answers/{answer_id}`.
pub async fn handle_delete_answer(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Path((survey_id, answer_id)): Path<(i64, i64)>,
) -> Result<Json<StatusResponse>, HttpError> {
    let user: AuthenticatedUser = authenticate(&app_state, &headers).await?;
    info!(user_id = %user.user_id, survey_id, answer_id, "Handling delete_answer request");

    let mut persistence = app_state.persistence.lock().await;
    answers::delete_answer(&mut persistence, &user, survey_id, answer_id)?;
    drop(persistence);

    Ok(Json(StatusResponse::ok()))
}

/// Handler for GET `/api/surveys/{survey_id}/questions/{question_id}/answers`.
pub async fn handle_list_answers_by_question(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Path((survey_id, question_id)): Path<(i64, i64)>,
) -> Result<Json<Vec<AnswerInfo>>, HttpError> {
    let user: AuthenticatedUser = authenticate(&app_state, &headers).await?;

    let mut persistence = app_state.persistence.lock().await;
    let listing: Vec<AnswerInfo> =
        answers::list_answers_by_question(&mut persistence, &user, survey_id, question_id)?;
    drop(persistence);

    Ok(Json(listing))
}

/// Handler for GET
/// `/api/surveys/{survey_id}/program-studies/{program_study_id}/questions/{question_id}/answers`.
pub async fn handle_list_answers_by_program_question(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Path((survey_id, program_study_id, question_id)): Path<(i64, i64, i64)>,
) -> Result<Json<Vec<AnswerInfo>>, HttpError> {
    let user: AuthenticatedUser = authenticate(&app_state, &headers).await?;

    let mut persistence = app_state.persistence.lock().await;
    let listing: Vec<AnswerInfo> = answers::list_answers_by_program_question(
        &mut persistence,
        &user,
        survey_id,
        program_study_id,
        question_id,
    )?;
    drop(persistence);

    Ok(Json(listing))
}

/// Handler for POST `/api/supervisor-answers`.
///
/// Authenticated by the one-time token in the body, not by a bearer
/// session.
pub async fn handle_supervisor_answers(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<SupervisorSubmissionRequest>,
) -> Result<Json<SupervisorSubmissionResponse>, HttpError> {
    info!(count = req.answers.len(), "Handling supervisor answer request");

    let mut persistence = app_state.persistence.lock().await;
    let response: SupervisorSubmissionResponse =
        supervisor::submit_supervisor_answers(&mut persistence, &req)?;
    drop(persistence);

    Ok(Json(response))
}
