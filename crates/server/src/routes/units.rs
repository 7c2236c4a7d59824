// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Academic unit routes: faculties, departments, program studies, and
//! periods.

use axum::Json;
use axum::extract::{Path, State as AxumState};
use axum::http::{HeaderMap, StatusCode};
use tracing::info;
use tracer_api::AuthenticatedUser;
use tracer_api::request_response::{
    DepartmentPayload, FacultyPayload, PeriodPayload, ProgramStudyPayload,
};
use tracer_api::units;
use tracer_persistence::{DepartmentData, FacultyData, PeriodData, ProgramStudyData};

use crate::error::HttpError;
use crate::routes::{CreatedResponse, StatusResponse};
use crate::state::{AppState, authenticate};

/// Handler for GET `/api/faculties`.
pub async fn handle_list_faculties(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<FacultyData>>, HttpError> {
    authenticate(&app_state, &headers).await?;

    let mut persistence = app_state.persistence.lock().await;
    let faculties: Vec<FacultyData> = units::list_faculties(&mut persistence)?;
    drop(persistence);

    Ok(Json(faculties))
}

/// Handler for POST `/api/faculties`.
pub async fn handle_create_faculty(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Json(req): Json<FacultyPayload>,
) -> Result<(StatusCode, Json<CreatedResponse>), HttpError> {
    let actor: AuthenticatedUser = authenticate(&app_state, &headers).await?;
    info!(actor = %actor.user_id, name = %req.name, "Handling create_faculty request");

    let mut persistence = app_state.persistence.lock().await;
    let faculty_id: i64 = units::create_faculty(&mut persistence, &actor, &req)?;
    drop(persistence);

    Ok((StatusCode::CREATED, Json(CreatedResponse { id: faculty_id })))
}

/// Handler for GET `/api/faculties/{faculty_id}`.
pub async fn handle_get_faculty(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Path(faculty_id): Path<i64>,
) -> Result<Json<FacultyData>, HttpError> {
    authenticate(&app_state, &headers).await?;

    let mut persistence = app_state.persistence.lock().await;
    let faculty: FacultyData = units::get_faculty(&mut persistence, faculty_id)?;
    drop(persistence);

    Ok(Json(faculty))
}

/// Handler for PUT `/api/faculties/{faculty_id}`.
pub async fn handle_update_faculty(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Path(faculty_id): Path<i64>,
    Json(req): Json<FacultyPayload>,
) -> Result<Json<StatusResponse>, HttpError> {
    let actor: AuthenticatedUser = authenticate(&app_state, &headers).await?;
    info!(actor = %actor.user_id, faculty_id, "Handling update_faculty request");

    let mut persistence = app_state.persistence.lock().await;
    units::update_faculty(&mut persistence, &actor, faculty_id, &req)?;
    drop(persistence);

    Ok(Json(StatusResponse::ok()))
}

/// Handler for DELETE `/api/faculties/{faculty_id}`.
pub async fn handle_delete_faculty(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Path(faculty_id): Path<i64>,
) -> Result<Json<StatusResponse>, HttpError> {
    let actor: AuthenticatedUser = authenticate(&app_state, &headers).await?;
    info!(actor = %actor.user_id, faculty_id, "Handling delete_faculty request");

    let mut persistence = app_state.persistence.lock().await;
    units::delete_faculty(&mut persistence, &actor, faculty_id)?;
    drop(persistence);

    Ok(Json(StatusResponse::ok()))
}

/// Handler for GET `/api/departments`.
pub async fn handle_list_departments(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<DepartmentData>>, HttpError> {
    authenticate(&app_state, &headers).await?;

    let mut persistence = app_state.persistence.lock().await;
    let departments: Vec<DepartmentData> = units::list_departments(&mut persistence)?;
    drop(persistence);

    Ok(Json(departments))
}

/// Handler for POST `/api/departments`.
pub async fn handle_create_department(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Json(req): Json<DepartmentPayload>,
) -> Result<(StatusCode, Json<CreatedResponse>), HttpError> {
    let actor: AuthenticatedUser = authenticate(&app_state, &headers).await?;
    info!(actor = %actor.user_id, name = %req.name, "Handling create_department request");

    let mut persistence = app_state.persistence.lock().await;
    let department_id: i64 = units::create_department(&mut persistence, &actor, &req)?;
    drop(persistence);

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse { id: department_id }),
    ))
}

/// Handler for GET `/api/departments/{department_id}`.
pub async fn handle_get_department(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Path(department_id): Path<i64>,
) -> Result<Json<DepartmentData>, HttpError> {
    authenticate(&app_state, &headers).await?;

    let mut persistence = app_state.persistence.lock().await;
    let department: DepartmentData = units::get_department(&mut persistence, department_id)?;
    drop(persistence);

    Ok(Json(department))
}

/// Handler for PUT `/api/departments/{department_id}`.
pub async fn handle_update_department(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Path(department_id): Path<i64>,
    Json(req): Json<DepartmentPayload>,
) -> Result<Json<StatusResponse>, HttpError> {
    let actor: AuthenticatedUser = authenticate(&app_state, &headers).await?;
    info!(actor = %actor.user_id, department_id, "Handling update_department request");

    let mut persistence = app_state.persistence.lock().await;
    units::update_department(&mut persistence, &actor, department_id, &req)?;
    drop(persistence);

    Ok(Json(StatusResponse::ok()))
}

/// Handler for DELETE `/api/departments/{department_id}`.
pub async fn handle_delete_department(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Path(department_id): Path<i64>,
) -> Result<Json<StatusResponse>, HttpError> {
    let actor: AuthenticatedUser = authenticate(&app_state, &headers).await?;
    info!(actor = %actor.user_id, department_id, "Handling delete_department request");

    let mut persistence = app_state.persistence.lock().await;
    units::delete_department(&mut persistence, &actor, department_id)?;
    drop(persistence);

    Ok(Json(StatusResponse::ok()))
}

/// Handler for GET `/api/program-studies`.
pub async fn handle_list_program_studies(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<ProgramStudyData>>, HttpError> {
    authenticate(&app_state, &headers).await?;

    let mut persistence = app_state.persistence.lock().await;
    let program_studies: Vec<ProgramStudyData> = units::list_program_studies(&mut persistence)?;
    drop(persistence);

    Ok(Json(program_studies))
}

/// Handler for POST `/api/program-studies`.
pub async fn handle_create_program_study(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Json(req): Json<ProgramStudyPayload>,
) -> Result<(StatusCode, Json<CreatedResponse>), HttpError> {
    let actor: AuthenticatedUser = authenticate(&app_state, &headers).await?;
    info!(actor = %actor.user_id, name = %req.name, "Handling create_program_study request");

    let mut persistence = app_state.persistence.lock().await;
    let program_study_id: i64 = units::create_program_study(&mut persistence, &actor, &req)?;
    drop(persistence);

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            id: program_study_id,
        }),
    ))
}

/// Handler for GET `/api/program-studies/{program_study_id}`.
pub async fn handle_get_program_study(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Path(program_study_id): Path<i64>,
) -> Result<Json<ProgramStudyData>, HttpError> {
    authenticate(&app_state, &headers).await?;

    let mut persistence = app_state.persistence.lock().await;
    let program_study: ProgramStudyData =
        units::get_program_study(&mut persistence, program_study_id)?;
    drop(persistence);

    Ok(Json(program_study))
}

/// Handler for PUT `/api/program-studies/{program_study_id}`.
pub async fn handle_update_program_study(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Path(program_study_id): Path<i64>,
    Json(req): Json<ProgramStudyPayload>,
) -> Result<Json<StatusResponse>, HttpError> {
    let actor: AuthenticatedUser = authenticate(&app_state, &headers).await?;
    info!(actor = %actor.user_id, program_study_id, "Handling update_program_study request");

    let mut persistence = app_state.persistence.lock().await;
    units::update_program_study(&mut persistence, &actor, program_study_id, &req)?;
    drop(persistence);

    Ok(Json(StatusResponse::ok()))
}

/// Handler for DELETE `/api/program-studies/{program_study_id}`.
pub async fn handle_delete_program_study(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Path(program_study_id): Path<i64>,
) -> Result<Json<StatusResponse>, HttpError> {
    let actor: AuthenticatedUser = authenticate(&app_state, &headers).await?;
    info!(actor = %actor.user_id, program_study_id, "Handling delete_program_study request");

    let mut persistence = app_state.persistence.lock().await;
    units::delete_program_study(&mut persistence, &actor, program_study_id)?;
    drop(persistence);

    Ok(Json(StatusResponse::ok()))
}

/// Handler for GET `/api/periods`.
pub async fn handle_list_periods(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<PeriodData>>, HttpError> {
    authenticate(&app_state, &headers).await?;

    let mut persistence = app_state.persistence.lock().await;
    let periods: Vec<PeriodData> = units::list_periods(&mut persistence)?;
    drop(persistence);

    Ok(Json(periods))
}

/// Handler for POST `/api/periods`.
pub async fn handle_create_period(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Json(req): Json<PeriodPayload>,
) -> Result<(StatusCode, Json<CreatedResponse>), HttpError> {
    let actor: AuthenticatedUser = authenticate(&app_state, &headers).await?;
    info!(actor = %actor.user_id, category = %req.category, "Handling create_period request");

    let mut persistence = app_state.persistence.lock().await;
    let period_id: i64 = units::create_period(&mut persistence, &actor, &req)?;
    drop(persistence);

    Ok((StatusCode::CREATED, Json(CreatedResponse { id: period_id })))
}

/// Handler for GET `/api/periods/{period_id}`.
pub async fn handle_get_period(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Path(period_id): Path<i64>,
) -> Result<Json<PeriodData>, HttpError> {
    authenticate(&app_state, &headers).await?;

    let mut persistence = app_state.persistence.lock().await;
    let period: PeriodData = units::get_period(&mut persistence, period_id)?;
    drop(persistence);

    Ok(Json(period))
}

/// Handler for PUT `/api/periods/{period_id}`.
pub async fn handle_update_period(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Path(period_id): Path<i64>,
    Json(req): Json<PeriodPayload>,
) -> Result<Json<StatusResponse>, HttpError> {
    let actor: AuthenticatedUser = authenticate(&app_state, &headers).await?;
    info!(actor = %actor.user_id, period_id, "Handling update_period request");

    let mut persistence = app_state.persistence.lock().await;
    units::update_period(&mut persistence, &actor, period_id, &req)?;
    drop(persistence);

    Ok(Json(StatusResponse::ok()))
}

/// Handler for DELETE `/api/periods/{period_id}`.
pub async fn handle_delete_period(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Path(period_id): Path<i64>,
) -> Result<Json<StatusResponse>, HttpError> {
    let actor: AuthenticatedUser = authenticate(&app_state, &headers).await?;
    info!(actor = %actor.user_id, period_id, "Handling delete_period request");

    let mut persistence = app_state.persistence.lock().await;
    units::delete_period(&mut persistence, &actor, period_id)?;
    drop(persistence);

    Ok(Json(StatusResponse::ok()))
}
