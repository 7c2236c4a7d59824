// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Account routes: registration, login, session lifecycle, and password
//! change and reset.

use axum::Json;
use axum::extract::State as AxumState;
use axum::http::{HeaderMap, StatusCode};
use tracing::info;
use tracer_api::AuthenticatedUser;
use tracer_api::accounts;
use tracer_api::request_response::{
    ChangePasswordRequest, LoginRequest, LoginResponse, PasswordResetRequest, RefreshResponse,
    RegisterRequest, ResetPasswordRequest,
};

use crate::error::HttpError;
use crate::routes::StatusResponse;
use crate::state::{AppState, authenticate, bearer_token};

/// Handler for POST `/accounts/register`.
pub async fn handle_register(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<StatusResponse>), HttpError> {
    info!(user_id = %req.user_id, "Handling register request");

    let mut persistence = app_state.persistence.lock().await;
    accounts::register(&mut persistence, &req)?;
    drop(persistence);

    Ok((StatusCode::CREATED, Json(StatusResponse::ok())))
}

/// Handler for POST `/accounts/login`.
pub async fn handle_login(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, HttpError> {
    info!(user_id = %req.user_id, "Handling login request");

    let mut persistence = app_state.persistence.lock().await;
    let response: LoginResponse = accounts::login(&mut persistence, &req)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/accounts/refresh`.
pub async fn handle_refresh(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
) -> Result<Json<RefreshResponse>, HttpError> {
    let token: String = bearer_token(&headers)?.to_string();

    let mut persistence = app_state.persistence.lock().await;
    let response: RefreshResponse = accounts::refresh(&mut persistence, &token)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/accounts/logout`.
pub async fn handle_logout(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
) -> Result<Json<StatusResponse>, HttpError> {
    let token: String = bearer_token(&headers)?.to_string();

    let mut persistence = app_state.persistence.lock().await;
    accounts::logout(&mut persistence, &token)?;
    drop(persistence);

    Ok(Json(StatusResponse::ok()))
}

/// Handler for POST `/accounts/password/change`.
pub async fn handle_change_password(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Json<StatusResponse>, HttpError> {
    let user: AuthenticatedUser = authenticate(&app_state, &headers).await?;
    info!(user_id = %user.user_id, "Handling change_password request");

    let mut persistence = app_state.persistence.lock().await;
    accounts::change_password(&mut persistence, &user, &req)?;
    drop(persistence);

    Ok(Json(StatusResponse::ok()))
}

/// Handler for POST `/accounts/password/reset-request`.
///
/// Always reports success so the response does not reveal whether the
/// account exists.
pub async fn handle_reset_request(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<PasswordResetRequest>,
) -> Result<Json<StatusResponse>, HttpError> {
    info!(user_id = %req.user_id, "Handling password reset request");

    let mut persistence = app_state.persistence.lock().await;
    accounts::request_password_reset(&mut persistence, app_state.mailer.as_ref(), &req)?;
    drop(persistence);

    Ok(Json(StatusResponse::ok()))
}

/// Handler for POST `/accounts/password/reset`.
pub async fn handle_reset_password(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<ResetPasswordRequest>,
) -> Result<Json<StatusResponse>, HttpError> {
    info!("Handling password reset redemption");

    let mut persistence = app_state.persistence.lock().await;
    accounts::reset_password(&mut persistence, &req)?;
    drop(persistence);

    Ok(Json(StatusResponse::ok()))
}
