// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! User and role administration routes.

use axum::Json;
use axum::extract::{Path, State as AxumState};
use axum::http::{HeaderMap, StatusCode};
use tracing::info;
use tracer_api::AuthenticatedUser;
use tracer_api::request_response::{CreateUserRequest, RolePayload, UpdateUserRequest, UserInfo};
use tracer_api::users;
use tracer_persistence::RoleData;

use crate::error::HttpError;
use crate::routes::{CreatedResponse, StatusResponse};
use crate::state::{AppState, authenticate};

/// Handler for GET `/api/users`.
pub async fn handle_list_users(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<UserInfo>>, HttpError> {
    let actor: AuthenticatedUser = authenticate(&app_state, &headers).await?;

    let mut persistence = app_state.persistence.lock().await;
    let listing: Vec<UserInfo> = users::list_users(&mut persistence, &actor)?;
    drop(persistence);

    Ok(Json(listing))
}

/// Handler for POST `/api/users`.
pub async fn handle_create_user(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<StatusResponse>), HttpError> {
    let actor: AuthenticatedUser = authenticate(&app_state, &headers).await?;
    info!(actor = %actor.user_id, user_id = %req.user_id, "Handling create_user request");

    let mut persistence = app_state.persistence.lock().await;
    users::create_user(&mut persistence, &actor, &req)?;
    drop(persistence);

    Ok((StatusCode::CREATED, Json(StatusResponse::ok())))
}

/// Handler for GET `/api/users/{user_id}`.
///
/// A user may fetch their own profile; everyone else's requires the Admin
/// role.
pub async fn handle_get_user(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Path(user_id): Path<String>,
) -> Result<Json<UserInfo>, HttpError> {
    let actor: AuthenticatedUser = authenticate(&app_state, &headers).await?;

    let mut persistence = app_state.persistence.lock().await;
    let user: UserInfo = users::get_user(&mut persistence, &actor, &user_id)?;
    drop(persistence);

    Ok(Json(user))
}

/// Handler for PUT `/api/users/{user_id}`.
pub async fn handle_update_user(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Path(user_id): Path<String>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<StatusResponse>, HttpError> {
    let actor: AuthenticatedUser = authenticate(&app_state, &headers).await?;
    info!(actor = %actor.user_id, user_id = %user_id, "Handling update_user request");

    let mut persistence = app_state.persistence.lock().await;
    users::update_user(&mut persistence, &actor, &user_id, &req)?;
    drop(persistence);

    Ok(Json(StatusResponse::ok()))
}

/// Handler for DELETE `/api/users/{user_id}`.
pub async fn handle_delete_user(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Path(user_id): Path<String>,
) -> Result<Json<StatusResponse>, HttpError> {
    let actor: AuthenticatedUser = authenticate(&app_state, &headers).await?;
    info!(actor = %actor.user_id, user_id = %user_id, "Handling delete_user request");

    let mut persistence = app_state.persistence.lock().await;
    users::delete_user(&mut persistence, &actor, &user_id)?;
    drop(persistence);

    Ok(Json(StatusResponse::ok()))
}

/// Handler for GET `/api/roles`.
pub async fn handle_list_roles(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<RoleData>>, HttpError> {
    let actor: AuthenticatedUser = authenticate(&app_state, &headers).await?;

    let mut persistence = app_state.persistence.lock().await;
    let roles: Vec<RoleData> = users::list_roles(&mut persistence, &actor)?;
    drop(persistence);

    Ok(Json(roles))
}

/// Handler for POST `/api/roles`.
pub async fn handle_create_role(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Json(req): Json<RolePayload>,
) -> Result<(StatusCode, Json<CreatedResponse>), HttpError> {
    let actor: AuthenticatedUser = authenticate(&app_state, &headers).await?;
    info!(actor = %actor.user_id, name = %req.name, "Handling create_role request");

    let mut persistence = app_state.persistence.lock().await;
    let role_id: i64 = users::create_role(&mut persistence, &actor, &req)?;
    drop(persistence);

    Ok((StatusCode::CREATED, Json(CreatedResponse { id: role_id })))
}

/// Handler for PUT `/api/roles/{role_id}`.
pub async fn handle_update_role(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Path(role_id): Path<i64>,
    Json(req): Json<RolePayload>,
) -> Result<Json<StatusResponse>, HttpError> {
    let actor: AuthenticatedUser = authenticate(&app_state, &headers).await?;
    info!(actor = %actor.user_id, role_id, "Handling update_role request");

    let mut persistence = app_state.persistence.lock().await;
    users::update_role(&mut persistence, &actor, role_id, &req)?;
    drop(persistence);

    Ok(Json(StatusResponse::ok()))
}

/// Handler for DELETE `/api/roles/{role_id}`.
pub async fn handle_delete_role(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Path(role_id): Path<i64>,
) -> Result<Json<StatusResponse>, HttpError> {
    let actor: AuthenticatedUser = authenticate(&app_state, &headers).await?;
    info!(actor = %actor.user_id, role_id, "Handling delete_role request");

    let mut persistence = app_state.persistence.lock().await;
    users::delete_role(&mut persistence, &actor, role_id)?;
    drop(persistence);

    Ok(Json(StatusResponse::ok()))
}
