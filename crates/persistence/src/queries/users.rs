// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! User, role, and session queries.

use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::debug;

use crate::data_models::{PasswordResetData, RoleData, SessionData, UserData};
use crate::error::PersistenceError;
use crate::schema::{password_resets, roles, sessions, users};
use tracer_domain::RoleKind;

/// Diesel Queryable struct for user rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = users)]
struct UserRow {
    user_id: String,
    full_name: String,
    email: Option<String>,
    password_hash: String,
    role_id: Option<i64>,
    program_study_id: Option<i64>,
    address: Option<String>,
    phone_number: Option<String>,
    last_survey: String,
}

impl From<UserRow> for UserData {
    fn from(row: UserRow) -> Self {
        Self {
            user_id: row.user_id,
            full_name: row.full_name,
            email: row.email,
            password_hash: row.password_hash,
            role_id: row.role_id,
            program_study_id: row.program_study_id,
            address: row.address,
            phone_number: row.phone_number,
            last_survey: row.last_survey,
        }
    }
}

/// Diesel Queryable struct for role rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = roles)]
struct RoleRow {
    role_id: i64,
    name: String,
    program_study_id: Option<i64>,
}

impl From<RoleRow> for RoleData {
    fn from(row: RoleRow) -> Self {
        Self {
            role_id: row.role_id,
            name: row.name,
            program_study_id: row.program_study_id,
        }
    }
}

/// Diesel Queryable struct for session rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = sessions)]
struct SessionRow {
    session_id: i64,
    session_token: String,
    user_id: String,
    created_at: String,
    last_activity_at: String,
    expires_at: String,
}

/// Retrieves a user by ID.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `user_id` - The user ID (student identification number)
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the user is not found.
pub fn get_user_by_id(
    conn: &mut SqliteConnection,
    user_id: &str,
) -> Result<Option<UserData>, PersistenceError> {
    debug!("Looking up user by ID: {}", user_id);

    let result: Result<UserRow, diesel::result::Error> = users::table
        .filter(users::user_id.eq(user_id))
        .select(UserRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(UserData::from(row))),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Retrieves all users ordered by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_users(conn: &mut SqliteConnection) -> Result<Vec<UserData>, PersistenceError> {
    let rows: Vec<UserRow> = users::table
        .order(users::user_id.asc())
        .select(UserRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(UserData::from).collect())
}

/// Retrieves all users whose role is the global Alumni role.
///
/// This is the candidate set for the remind-all operation.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_alumni(conn: &mut SqliteConnection) -> Result<Vec<UserData>, PersistenceError> {
    let rows: Vec<UserRow> = users::table
        .inner_join(roles::table)
        .filter(roles::name.eq(RoleKind::Alumni.kind_name()))
        .filter(roles::program_study_id.is_null())
        .order(users::user_id.asc())
        .select(UserRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(UserData::from).collect())
}

/// Retrieves all alumni belonging to a program study.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `program_study_id` - The program study to filter by
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_alumni_by_program_study(
    conn: &mut SqliteConnection,
    program_study_id: i64,
) -> Result<Vec<UserData>, PersistenceError> {
    let rows: Vec<UserRow> = users::table
        .inner_join(roles::table)
        .filter(roles::name.eq(RoleKind::Alumni.kind_name()))
        .filter(roles::program_study_id.is_null())
        .filter(users::program_study_id.eq(program_study_id))
        .order(users::user_id.asc())
        .select(UserRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(UserData::from).collect())
}

/// Retrieves the alumni among an explicit list of user IDs.
///
/// IDs that do not exist or do not belong to alumni are silently dropped;
/// the remind-users operation targets whoever remains.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `user_ids` - The candidate user IDs
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn filter_alumni(
    conn: &mut SqliteConnection,
    user_ids: &[String],
) -> Result<Vec<UserData>, PersistenceError> {
    let rows: Vec<UserRow> = users::table
        .inner_join(roles::table)
        .filter(roles::name.eq(RoleKind::Alumni.kind_name()))
        .filter(roles::program_study_id.is_null())
        .filter(users::user_id.eq_any(user_ids))
        .order(users::user_id.asc())
        .select(UserRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(UserData::from).collect())
}

/// Retrieves a role by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the role is not found.
pub fn get_role(
    conn: &mut SqliteConnection,
    role_id: i64,
) -> Result<Option<RoleData>, PersistenceError> {
    let result: Result<RoleRow, diesel::result::Error> = roles::table
        .filter(roles::role_id.eq(role_id))
        .select(RoleRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(RoleData::from(row))),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Retrieves all roles ordered by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_roles(conn: &mut SqliteConnection) -> Result<Vec<RoleData>, PersistenceError> {
    let rows: Vec<RoleRow> = roles::table
        .order(roles::role_id.asc())
        .select(RoleRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(RoleData::from).collect())
}

/// Retrieves an unscoped role by name.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if no such role exists.
pub fn get_role_by_name(
    conn: &mut SqliteConnection,
    name: &str,
) -> Result<Option<RoleData>, PersistenceError> {
    let result: Result<RoleRow, diesel::result::Error> = roles::table
        .filter(roles::name.eq(name))
        .filter(roles::program_study_id.is_null())
        .select(RoleRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(RoleData::from(row))),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Retrieves the role bound to a program study, if one exists.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn find_role_for_program_study(
    conn: &mut SqliteConnection,
    program_study_id: i64,
) -> Result<Option<RoleData>, PersistenceError> {
    let result: Result<RoleRow, diesel::result::Error> = roles::table
        .filter(roles::program_study_id.eq(program_study_id))
        .select(RoleRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(RoleData::from(row))),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Retrieves a session by token.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the session is not found.
pub fn get_session_by_token(
    conn: &mut SqliteConnection,
    session_token: &str,
) -> Result<Option<SessionData>, PersistenceError> {
    debug!("Looking up session by token");

    let result: Result<SessionRow, diesel::result::Error> = sessions::table
        .filter(sessions::session_token.eq(session_token))
        .select(SessionRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(SessionData {
            session_id: row.session_id,
            session_token: row.session_token,
            user_id: row.user_id,
            created_at: row.created_at,
            last_activity_at: row.last_activity_at,
            expires_at: row.expires_at,
        })),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Diesel Queryable struct for password reset rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = password_resets)]
struct PasswordResetRow {
    reset_id: i64,
    token: String,
    user_id: String,
    expires_at: String,
    is_used: i32,
    created_at: String,
}

impl From<PasswordResetRow> for PasswordResetData {
    fn from(row: PasswordResetRow) -> Self {
        Self {
            reset_id: row.reset_id,
            token: row.token,
            user_id: row.user_id,
            expires_at: row.expires_at,
            is_used: row.is_used != 0,
            created_at: row.created_at,
        }
    }
}

/// Retrieves a password reset by its token string.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the token is not found.
pub fn get_password_reset(
    conn: &mut SqliteConnection,
    token: &str,
) -> Result<Option<PasswordResetData>, PersistenceError> {
    debug!("Looking up password reset by token");

    let result: Result<PasswordResetRow, diesel::result::Error> = password_resets::table
        .filter(password_resets::token.eq(token))
        .select(PasswordResetRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(PasswordResetData::from(row))),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
