// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Administrative user and role management.

use tracing::info;
use tracer_domain::RoleKind;
use tracer_persistence::{NewUser, RoleData, SqlitePersistence, UserChanges};

use crate::auth::{AuthenticatedUser, AuthorizationService};
use crate::error::{ApiError, translate_domain_error, translate_persistence_error};
use crate::password_policy::PasswordPolicy;
use crate::request_response::{CreateUserRequest, RolePayload, UpdateUserRequest, UserInfo};

/// Creates a user administratively.
///
/// # Errors
///
/// Returns an error if the caller is not an Admin, a referenced role or
/// program study does not exist, the initial password violates policy, or
/// the user ID is taken.
pub fn create_user(
    persistence: &mut SqlitePersistence,
    actor: &AuthenticatedUser,
    request: &CreateUserRequest,
) -> Result<(), ApiError> {
    AuthorizationService::authorize_manage_users(actor)?;

    if request.user_id.trim().is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("user_id"),
            message: String::from("User ID must not be empty"),
        });
    }

    PasswordPolicy::default().validate(
        &request.password,
        &request.password,
        &request.user_id,
        &request.full_name,
    )?;

    if let Some(role_id) = request.role_id {
        require_role_exists(persistence, role_id)?;
    }
    if let Some(program_study_id) = request.program_study_id {
        require_program_study_exists(persistence, program_study_id)?;
    }

    let new_user: NewUser = NewUser {
        user_id: request.user_id.clone(),
        full_name: request.full_name.clone(),
        email: request.email.clone(),
        password: request.password.clone(),
        role_id: request.role_id,
        program_study_id: request.program_study_id,
        address: request.address.clone(),
        phone_number: request.phone_number.clone(),
    };

    persistence
        .create_user(&new_user)
        .map_err(|e| translate_persistence_error("User", e))?;

    info!(actor = %actor.user_id, user_id = %request.user_id, "Created user");
    Ok(())
}

/// Updates a user's profile fields.
///
/// # Errors
///
/// Returns an error if the caller is not an Admin or the user does not
/// exist.
pub fn update_user(
    persistence: &mut SqlitePersistence,
    actor: &AuthenticatedUser,
    user_id: &str,
    request: &UpdateUserRequest,
) -> Result<(), ApiError> {
    AuthorizationService::authorize_manage_users(actor)?;

    if let Some(role_id) = request.role_id {
        require_role_exists(persistence, role_id)?;
    }
    if let Some(program_study_id) = request.program_study_id {
        require_program_study_exists(persistence, program_study_id)?;
    }

    let changes: UserChanges = UserChanges {
        full_name: request.full_name.clone(),
        email: request.email.clone(),
        role_id: request.role_id,
        program_study_id: request.program_study_id,
        address: request.address.clone(),
        phone_number: request.phone_number.clone(),
    };

    persistence
        .update_user(user_id, &changes)
        .map_err(|e| translate_persistence_error("User", e))?;

    info!(actor = %actor.user_id, user_id = %user_id, "Updated user");
    Ok(())
}

/// Deletes a user.
///
/// # Errors
///
/// Returns an error if the caller is not an Admin or the user does not
/// exist.
pub fn delete_user(
    persistence: &mut SqlitePersistence,
    actor: &AuthenticatedUser,
    user_id: &str,
) -> Result<(), ApiError> {
    AuthorizationService::authorize_manage_users(actor)?;

    persistence
        .delete_user(user_id)
        .map_err(|e| translate_persistence_error("User", e))?;

    info!(actor = %actor.user_id, user_id = %user_id, "Deleted user");
    Ok(())
}

/// Retrieves a user's profile.
///
/// Admins may read anyone; everyone else only themselves.
///
/// # Errors
///
/// Returns an error if the caller may not read the profile or the user
/// does not exist.
pub fn get_user(
    persistence: &mut SqlitePersistence,
    actor: &AuthenticatedUser,
    user_id: &str,
) -> Result<UserInfo, ApiError> {
    if actor.user_id != user_id {
        AuthorizationService::authorize_manage_users(actor)?;
    }

    let user = persistence
        .get_user_by_id(user_id)
        .map_err(|e| translate_persistence_error("User", e))?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("User"),
            message: format!("User '{user_id}' does not exist"),
        })?;

    Ok(UserInfo::from(user))
}

/// Retrieves all users.
///
/// # Errors
///
/// Returns an error if the caller is not an Admin.
pub fn list_users(
    persistence: &mut SqlitePersistence,
    actor: &AuthenticatedUser,
) -> Result<Vec<UserInfo>, ApiError> {
    AuthorizationService::authorize_manage_users(actor)?;

    let users = persistence
        .list_users()
        .map_err(|e| translate_persistence_error("User", e))?;

    Ok(users.into_iter().map(UserInfo::from).collect())
}

/// Creates a role.
///
/// Unscoped roles must use one of the global role names; scoped roles may
/// use any display name but must reference an existing program study.
///
/// # Errors
///
/// Returns an error if the caller is not an Admin, the name is not a valid
/// global role for an unscoped role, or the program study does not exist.
pub fn create_role(
    persistence: &mut SqlitePersistence,
    actor: &AuthenticatedUser,
    request: &RolePayload,
) -> Result<i64, ApiError> {
    AuthorizationService::authorize_manage_users(actor)?;
    validate_role_payload(persistence, request)?;

    let role_id: i64 = persistence
        .create_role(&request.name, request.program_study_id)
        .map_err(|e| translate_persistence_error("Role", e))?;

    info!(actor = %actor.user_id, role = %request.name, "Created role");
    Ok(role_id)
}

/// Updates a role.
///
/// # Errors
///
/// Returns an error if the caller is not an Admin, the payload is invalid,
/// or the role does not exist.
pub fn update_role(
    persistence: &mut SqlitePersistence,
    actor: &AuthenticatedUser,
    role_id: i64,
    request: &RolePayload,
) -> Result<(), ApiError> {
    AuthorizationService::authorize_manage_users(actor)?;
    validate_role_payload(persistence, request)?;

    persistence
        .update_role(role_id, &request.name, request.program_study_id)
        .map_err(|e| translate_persistence_error("Role", e))?;

    info!(actor = %actor.user_id, role_id, "Updated role");
    Ok(())
}

/// Deletes a role.
///
/// # Errors
///
/// Returns an error if the caller is not an Admin or the role does not
/// exist.
pub fn delete_role(
    persistence: &mut SqlitePersistence,
    actor: &AuthenticatedUser,
    role_id: i64,
) -> Result<(), ApiError> {
    AuthorizationService::authorize_manage_users(actor)?;

    persistence
        .delete_role(role_id)
        .map_err(|e| translate_persistence_error("Role", e))?;

    info!(actor = %actor.user_id, role_id, "Deleted role");
    Ok(())
}

/// Retrieves all roles.
///
/// # Errors
///
/// Returns an error if the caller is not an Admin.
pub fn list_roles(
    persistence: &mut SqlitePersistence,
    actor: &AuthenticatedUser,
) -> Result<Vec<RoleData>, ApiError> {
    AuthorizationService::authorize_manage_users(actor)?;

    persistence
        .list_roles()
        .map_err(|e| translate_persistence_error("Role", e))
}

/// Rejects role payloads outside the closed taxonomy.
fn validate_role_payload(
    persistence: &mut SqlitePersistence,
    request: &RolePayload,
) -> Result<(), ApiError> {
    RoleKind::from_parts(&request.name, request.program_study_id)
        .map_err(translate_domain_error)?;

    if let Some(program_study_id) = request.program_study_id {
        require_program_study_exists(persistence, program_study_id)?;
    }
    Ok(())
}

fn require_role_exists(
    persistence: &mut SqlitePersistence,
    role_id: i64,
) -> Result<(), ApiError> {
    persistence
        .get_role(role_id)
        .map_err(|e| translate_persistence_error("Role", e))?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Role"),
            message: format!("Role {role_id} does not exist"),
        })?;
    Ok(())
}

fn require_program_study_exists(
    persistence: &mut SqlitePersistence,
    program_study_id: i64,
) -> Result<(), ApiError> {
    persistence
        .get_program_study(program_study_id)
        .map_err(|e| translate_persistence_error("Program study", e))?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Program study"),
            message: format!("Program study {program_study_id} does not exist"),
        })?;
    Ok(())
}
