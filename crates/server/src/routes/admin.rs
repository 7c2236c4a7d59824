// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Configuration and reminder routes.

use axum::Json;
use axum::extract::{Path, State as AxumState};
use axum::http::{HeaderMap, StatusCode};
use tracing::info;
use tracer_api::AuthenticatedUser;
use tracer_api::config;
use tracer_api::reminders;
use tracer_api::request_response::{ConfigPayload, RemindUsersRequest, ReminderReport};
use tracer_persistence::ConfigEntryData;

use crate::error::HttpError;
use crate::routes::{CreatedResponse, StatusResponse};
use crate::state::{AppState, authenticate};

/// Handler for GET `/api/config`.
pub async fn handle_list_config(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<ConfigEntryData>>, HttpError> {
    let actor: AuthenticatedUser = authenticate(&app_state, &headers).await?;

    let mut persistence = app_state.persistence.lock().await;
    let entries: Vec<ConfigEntryData> = config::list_config_entries(&mut persistence, &actor)?;
    drop(persistence);

    Ok(Json(entries))
}

/// Handler for POST `/api/config`.
pub async fn handle_create_config(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Json(req): Json<ConfigPayload>,
) -> Result<(StatusCode, Json<CreatedResponse>), HttpError> {
    let actor: AuthenticatedUser = authenticate(&app_state, &headers).await?;
    info!(actor = %actor.user_id, key = %req.key, "Handling create_config request");

    let mut persistence = app_state.persistence.lock().await;
    let config_id: i64 = config::create_config_entry(&mut persistence, &actor, &req)?;
    drop(persistence);

    Ok((StatusCode::CREATED, Json(CreatedResponse { id: config_id })))
}

/// Handler for GET `/api/config/{config_id}`.
pub async fn handle_get_config(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Path(config_id): Path<i64>,
) -> Result<Json<ConfigEntryData>, HttpError> {
    let actor: AuthenticatedUser = authenticate(&app_state, &headers).await?;

    let mut persistence = app_state.persistence.lock().await;
    let entry: ConfigEntryData = config::get_config_entry(&mut persistence, &actor, config_id)?;
    drop(persistence);

    Ok(Json(entry))
}

/// Handler for PUT `/api/config/{config_id}`.
pub async fn handle_update_config(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Path(config_id): Path<i64>,
    Json(req): Json<ConfigPayload>,
) -> Result<Json<StatusResponse>, HttpError> {
    let actor: AuthenticatedUser = authenticate(&app_state, &headers).await?;
    info!(actor = %actor.user_id, config_id, "Handling update_config request");

    let mut persistence = app_state.persistence.lock().await;
    config::update_config_entry(&mut persistence, &actor, config_id, &req)?;
    drop(persistence);

    Ok(Json(StatusResponse::ok()))
}

/// Handler for DELETE `/api/config/{config_id}`.
pub async fn handle_delete_config(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Path(config_id): Path<i64>,
) -> Result<Json<StatusResponse>, HttpError> {
    let actor: AuthenticatedUser = authenticate(&app_state, &headers).await?;
    info!(actor = %actor.user_id, config_id, "Handling delete_config request");

    let mut persistence = app_state.persistence.lock().await;
    config::delete_config_entry(&mut persistence, &actor, config_id)?;
    drop(persistence);

    Ok(Json(StatusResponse::ok()))
}

/// Handler for POST `/api/mail/remind-all`.
pub async fn handle_remind_all(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
) -> Result<Json<ReminderReport>, HttpError> {
    let actor: AuthenticatedUser = authenticate(&app_state, &headers).await?;
    info!(actor = %actor.user_id, "Handling remind_all request");

    let mut persistence = app_state.persistence.lock().await;
    let report: ReminderReport =
        reminders::remind_all(&mut persistence, app_state.mailer.as_ref(), &actor)?;
    drop(persistence);

    Ok(Json(report))
}

/// Handler for POST `/api/mail/remind-program-study`.
///
/// The target program study is the one bound to the caller's role.
pub async fn handle_remind_program_study(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
) -> Result<Json<ReminderReport>, HttpError> {
    let actor: AuthenticatedUser = authenticate(&app_state, &headers).await?;
    info!(actor = %actor.user_id, "Handling remind_program_study request");

    let mut persistence = app_state.persistence.lock().await;
    let report: ReminderReport =
        reminders::remind_program_study(&mut persistence, app_state.mailer.as_ref(), &actor)?;
    drop(persistence);

    Ok(Json(report))
}

/// Handler for POST `/api/mail/remind-users`.
pub async fn handle_remind_users(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Json(req): Json<RemindUsersRequest>,
) -> Result<Json<ReminderReport>, HttpError> {
    let actor: AuthenticatedUser = authenticate(&app_state, &headers).await?;
    info!(
        actor = %actor.user_id,
        count = req.user_ids.len(),
        "Handling remind_users request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let report: ReminderReport = reminders::remind_users(
        &mut persistence,
        app_state.mailer.as_ref(),
        &actor,
        &req,
    )?;
    drop(persistence);

    Ok(Json(report))
}
