// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! User, role, and session mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::{debug, info};

use crate::connection::get_last_insert_rowid;
use crate::data_models::{NewUser, PasswordResetData, UserChanges};
use crate::error::PersistenceError;
use crate::queries::users::get_password_reset;
use crate::schema::{password_resets, roles, sessions, users};

/// Creates a new user.
///
/// The plain-text password is hashed with bcrypt before storage. The
/// progression marker starts at its default.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `new_user` - The user fields, including the plain-text password
///
/// # Errors
///
/// Returns an error if the user cannot be created or the ID already exists.
pub fn create_user(conn: &mut SqliteConnection, new_user: &NewUser) -> Result<(), PersistenceError> {
    info!(
        "Creating user with ID: {}, full_name: {}",
        new_user.user_id, new_user.full_name
    );

    let password_hash: String = bcrypt::hash(&new_user.password, bcrypt::DEFAULT_COST)
        .map_err(|e| PersistenceError::Other(format!("Failed to hash password: {e}")))?;

    diesel::insert_into(users::table)
        .values((
            users::user_id.eq(&new_user.user_id),
            users::full_name.eq(&new_user.full_name),
            users::email.eq(&new_user.email),
            users::password_hash.eq(&password_hash),
            users::role_id.eq(new_user.role_id),
            users::program_study_id.eq(new_user.program_study_id),
            users::address.eq(&new_user.address),
            users::phone_number.eq(&new_user.phone_number),
        ))
        .execute(conn)?;

    info!("Created user with ID: {}", new_user.user_id);
    Ok(())
}

/// Updates the profile fields of a user.
///
/// # Errors
///
/// Returns an error if the user is not found or the update fails.
pub fn update_user(
    conn: &mut SqliteConnection,
    user_id: &str,
    changes: &UserChanges,
) -> Result<(), PersistenceError> {
    debug!("Updating user: {}", user_id);

    let rows_affected: usize = diesel::update(users::table)
        .filter(users::user_id.eq(user_id))
        .set((
            users::full_name.eq(&changes.full_name),
            users::email.eq(&changes.email),
            users::role_id.eq(changes.role_id),
            users::program_study_id.eq(changes.program_study_id),
            users::address.eq(&changes.address),
            users::phone_number.eq(&changes.phone_number),
        ))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::UserNotFound(format!(
            "User with ID {user_id} not found"
        )));
    }

    Ok(())
}

/// Deletes a user.
///
/// # Errors
///
/// Returns an error if the user is not found or the delete fails.
pub fn delete_user(conn: &mut SqliteConnection, user_id: &str) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::delete(users::table)
        .filter(users::user_id.eq(user_id))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::UserNotFound(format!(
            "User with ID {user_id} not found"
        )));
    }

    info!("Deleted user ID: {}", user_id);
    Ok(())
}

/// Updates a user's password.
///
/// The plain-text password is hashed with bcrypt before storage.
///
/// # Errors
///
/// Returns an error if the user is not found or the update fails.
pub fn update_password(
    conn: &mut SqliteConnection,
    user_id: &str,
    new_password: &str,
) -> Result<(), PersistenceError> {
    debug!("Updating password for user: {}", user_id);

    let password_hash: String = bcrypt::hash(new_password, bcrypt::DEFAULT_COST)
        .map_err(|e| PersistenceError::Other(format!("Failed to hash password: {e}")))?;

    let rows_affected: usize = diesel::update(users::table)
        .filter(users::user_id.eq(user_id))
        .set(users::password_hash.eq(&password_hash))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::UserNotFound(format!(
            "User with ID {user_id} not found"
        )));
    }

    Ok(())
}

/// Updates a user's survey progression marker.
///
/// The caller is responsible for computing the forward-only advancement;
/// this mutation stores whatever marker it is given.
///
/// # Errors
///
/// Returns an error if the user is not found or the update fails.
pub fn update_last_survey(
    conn: &mut SqliteConnection,
    user_id: &str,
    last_survey: &str,
) -> Result<(), PersistenceError> {
    debug!(
        "Updating last_survey for user {} to {}",
        user_id, last_survey
    );

    let rows_affected: usize = diesel::update(users::table)
        .filter(users::user_id.eq(user_id))
        .set(users::last_survey.eq(last_survey))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::UserNotFound(format!(
            "User with ID {user_id} not found"
        )));
    }

    Ok(())
}

/// Creates a new role.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `name` - The role's display name
/// * `program_study_id` - The bound program study for scoped roles
///
/// # Errors
///
/// Returns an error if the role cannot be created.
pub fn create_role(
    conn: &mut SqliteConnection,
    name: &str,
    program_study_id: Option<i64>,
) -> Result<i64, PersistenceError> {
    info!(
        "Creating role: {} (program_study_id: {:?})",
        name, program_study_id
    );

    diesel::insert_into(roles::table)
        .values((
            roles::name.eq(name),
            roles::program_study_id.eq(program_study_id),
        ))
        .execute(conn)?;

    let role_id: i64 = get_last_insert_rowid(conn)?;

    info!(role_id, "Role created");
    Ok(role_id)
}

/// Updates a role's name and scope.
///
/// # Errors
///
/// Returns an error if the role is not found or the update fails.
pub fn update_role(
    conn: &mut SqliteConnection,
    role_id: i64,
    name: &str,
    program_study_id: Option<i64>,
) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::update(roles::table)
        .filter(roles::role_id.eq(role_id))
        .set((
            roles::name.eq(name),
            roles::program_study_id.eq(program_study_id),
        ))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Role with ID {role_id} not found"
        )));
    }

    Ok(())
}

/// Deletes a role.
///
/// # Errors
///
/// Returns an error if the role is not found or the delete fails.
pub fn delete_role(conn: &mut SqliteConnection, role_id: i64) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::delete(roles::table)
        .filter(roles::role_id.eq(role_id))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Role with ID {role_id} not found"
        )));
    }

    info!("Deleted role ID: {}", role_id);
    Ok(())
}

/// Creates a new session for a user.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `session_token` - The unique session token
/// * `user_id` - The user ID
/// * `expires_at` - The expiration timestamp (ISO 8601 format)
///
/// # Errors
///
/// Returns an error if the session cannot be created.
pub fn create_session(
    conn: &mut SqliteConnection,
    session_token: &str,
    user_id: &str,
    expires_at: &str,
) -> Result<i64, PersistenceError> {
    debug!(
        "Creating session for user ID: {} with expiration: {}",
        user_id, expires_at
    );

    diesel::insert_into(sessions::table)
        .values((
            sessions::session_token.eq(session_token),
            sessions::user_id.eq(user_id),
            sessions::expires_at.eq(expires_at),
        ))
        .execute(conn)?;

    let session_id: i64 = get_last_insert_rowid(conn)?;

    debug!(session_id, "Session created");
    Ok(session_id)
}

/// Updates the last activity timestamp for a session.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn update_session_activity(
    conn: &mut SqliteConnection,
    session_id: i64,
) -> Result<(), PersistenceError> {
    debug!("Updating last_activity_at for session ID: {}", session_id);

    diesel::update(sessions::table)
        .filter(sessions::session_id.eq(session_id))
        .set(
            sessions::last_activity_at.eq(diesel::dsl::sql::<diesel::sql_types::Text>(
                "CURRENT_TIMESTAMP",
            )),
        )
        .execute(conn)?;

    Ok(())
}

/// Extends a session's expiration.
///
/// This is the refresh operation: the token stays the same, the expiry
/// moves forward.
///
/// # Errors
///
/// Returns an error if the session is not found or the update fails.
pub fn extend_session(
    conn: &mut SqliteConnection,
    session_token: &str,
    expires_at: &str,
) -> Result<(), PersistenceError> {
    debug!("Extending session expiration to {}", expires_at);

    let rows_affected: usize = diesel::update(sessions::table)
        .filter(sessions::session_token.eq(session_token))
        .set(sessions::expires_at.eq(expires_at))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::SessionNotFound(
            "Session not found for refresh".to_string(),
        ));
    }

    Ok(())
}

/// Deletes a session by token.
///
/// This is used for logout operations.
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_session(
    conn: &mut SqliteConnection,
    session_token: &str,
) -> Result<(), PersistenceError> {
    debug!("Deleting session by token");

    diesel::delete(sessions::table)
        .filter(sessions::session_token.eq(session_token))
        .execute(conn)?;

    Ok(())
}

/// Creates a password reset token for a user.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `token` - The token string (a fresh UUID)
/// * `user_id` - The user whose password may be reset
/// * `expires_at` - The expiration timestamp (ISO 8601 format)
///
/// # Errors
///
/// Returns an error if the reset cannot be created.
pub fn create_password_reset(
    conn: &mut SqliteConnection,
    token: &str,
    user_id: &str,
    expires_at: &str,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(password_resets::table)
        .values((
            password_resets::token.eq(token),
            password_resets::user_id.eq(user_id),
            password_resets::expires_at.eq(expires_at),
        ))
        .execute(conn)?;

    let reset_id: i64 = get_last_insert_rowid(conn)?;

    info!(reset_id, user_id, "Password reset created");
    Ok(reset_id)
}

/// Redeems a password reset token exactly once.
///
/// The redemption is a single conditional update so two submissions racing
/// on the same token cannot both win: whichever statement runs second
/// affects zero rows and fails.
///
/// # Errors
///
/// Returns `TokenNotFound` if the token does not exist and
/// `TokenAlreadyUsed` if it was redeemed before. Returns a database error
/// if the statement fails.
pub fn redeem_password_reset(
    conn: &mut SqliteConnection,
    token: &str,
) -> Result<PasswordResetData, PersistenceError> {
    let rows_affected: usize = diesel::update(password_resets::table)
        .filter(password_resets::token.eq(token))
        .filter(password_resets::is_used.eq(0))
        .set(password_resets::is_used.eq(1))
        .execute(conn)?;

    if rows_affected == 0 {
        // Distinguish an unknown token from one that lost the race.
        return match get_password_reset(conn, token)? {
            Some(_) => Err(PersistenceError::TokenAlreadyUsed(token.to_string())),
            None => Err(PersistenceError::TokenNotFound(token.to_string())),
        };
    }

    debug!("Password reset token redeemed");

    get_password_reset(conn, token)?.ok_or_else(|| {
        PersistenceError::TokenNotFound(format!("Token {token} vanished after redemption"))
    })
}

/// Deletes all expired sessions.
///
/// This is a cleanup operation that should be run periodically.
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_expired_sessions(conn: &mut SqliteConnection) -> Result<usize, PersistenceError> {
    debug!("Deleting expired sessions");

    let rows_affected: usize = diesel::delete(sessions::table)
        .filter(
            sessions::expires_at.lt(diesel::dsl::sql::<diesel::sql_types::Text>(
                "CURRENT_TIMESTAMP",
            )),
        )
        .execute(conn)?;

    info!("Deleted {} expired sessions", rows_affected);
    Ok(rows_affected)
}
