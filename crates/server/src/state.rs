// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shared application state and bearer-token session handling.

use std::sync::Arc;

use axum::http::HeaderMap;
use tokio::sync::Mutex;
use tracer_api::{AuthenticatedUser, AuthenticationService, Mailer};
use tracer_ml::ModelRegistry;
use tracer_persistence::SqlitePersistence;

use crate::error::HttpError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The persistence layer wrapped in a mutex for concurrent access.
    pub persistence: Arc<Mutex<SqlitePersistence>>,
    /// The outbound mail seam.
    pub mailer: Arc<dyn Mailer>,
    /// The lazily loaded analytics model registry.
    pub models: Arc<ModelRegistry>,
}

/// Extracts the bearer token from the Authorization header.
///
/// # Errors
///
/// Returns a 401 error if the header is missing or malformed.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, HttpError> {
    headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(HttpError::missing_bearer)
}

/// Resolves the bearer token to an authenticated user.
///
/// # Errors
///
/// Returns a 401 error if the token is missing, unknown, or expired.
pub async fn authenticate(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<AuthenticatedUser, HttpError> {
    let token: &str = bearer_token(headers)?;
    let mut persistence = state.persistence.lock().await;
    let user: AuthenticatedUser = AuthenticationService::validate_session(&mut persistence, token)?;
    drop(persistence);
    Ok(user)
}
