// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! System configuration management.
//!
//! A flat key-value store. Its one load-bearing key is
//! [`SUPERVISOR_EMAIL_QUESTION_CODE`], which names the question code that
//! holds a respondent's supervisor email address.

use tracing::info;
use tracer_persistence::{ConfigEntryData, SqlitePersistence};

use crate::auth::{AuthenticatedUser, AuthorizationService};
use crate::error::{ApiError, translate_persistence_error};
use crate::request_response::ConfigPayload;

/// The config key naming the question code that carries the supervisor's
/// email address in an lv1 survey.
pub const SUPERVISOR_EMAIL_QUESTION_CODE: &str = "supervisor_email_question_code";

/// Creates a configuration entry.
///
/// # Errors
///
/// Returns an error if the caller is not an Admin or the key is taken.
pub fn create_config_entry(
    persistence: &mut SqlitePersistence,
    actor: &AuthenticatedUser,
    request: &ConfigPayload,
) -> Result<i64, ApiError> {
    AuthorizationService::authorize_manage_config(actor)?;

    let config_id: i64 = persistence
        .create_config_entry(&request.key, &request.value)
        .map_err(|e| translate_persistence_error("Config entry", e))?;

    info!(actor = %actor.user_id, key = %request.key, "Created config entry");
    Ok(config_id)
}

/// Updates a configuration entry.
///
/// # Errors
///
/// Returns an error if the caller is not an Admin, the entry does not
/// exist, or the new key is taken.
pub fn update_config_entry(
    persistence: &mut SqlitePersistence,
    actor: &AuthenticatedUser,
    config_id: i64,
    request: &ConfigPayload,
) -> Result<(), ApiError> {
    AuthorizationService::authorize_manage_config(actor)?;

    persistence
        .update_config_entry(config_id, &request.key, &request.value)
        .map_err(|e| translate_persistence_error("Config entry", e))?;

    info!(actor = %actor.user_id, key = %request.key, "Updated config entry");
    Ok(())
}

/// Deletes a configuration entry.
///
/// # Errors
///
/// Returns an error if the caller is not an Admin or the entry does not
/// exist.
pub fn delete_config_entry(
    persistence: &mut SqlitePersistence,
    actor: &AuthenticatedUser,
    config_id: i64,
) -> Result<(), ApiError> {
    AuthorizationService::authorize_manage_config(actor)?;

    persistence
        .delete_config_entry(config_id)
        .map_err(|e| translate_persistence_error("Config entry", e))
}

/// Retrieves a configuration entry.
///
/// # Errors
///
/// Returns an error if the caller is not an Admin or the entry does not
/// exist.
pub fn get_config_entry(
    persistence: &mut SqlitePersistence,
    actor: &AuthenticatedUser,
    config_id: i64,
) -> Result<ConfigEntryData, ApiError> {
    AuthorizationService::authorize_manage_config(actor)?;

    persistence
        .get_config_entry(config_id)
        .map_err(|e| translate_persistence_error("Config entry", e))?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Config entry"),
            message: format!("Config entry {config_id} does not exist"),
        })
}

/// Retrieves all configuration entries.
///
/// # Errors
///
/// Returns an error if the caller is not an Admin.
pub fn list_config_entries(
    persistence: &mut SqlitePersistence,
    actor: &AuthenticatedUser,
) -> Result<Vec<ConfigEntryData>, ApiError> {
    AuthorizationService::authorize_manage_config(actor)?;

    persistence
        .list_config_entries()
        .map_err(|e| translate_persistence_error("Config entry", e))
}
