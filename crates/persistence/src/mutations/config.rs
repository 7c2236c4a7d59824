// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! System configuration mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::info;

use crate::connection::get_last_insert_rowid;
use crate::error::PersistenceError;
use crate::schema::system_config;

/// Creates a configuration entry.
///
/// Keys are unique; a duplicate surfaces as a `Conflict` error.
///
/// # Errors
///
/// Returns an error if the entry cannot be created.
pub fn create_config_entry(
    conn: &mut SqliteConnection,
    key: &str,
    value: &str,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(system_config::table)
        .values((system_config::key.eq(key), system_config::value.eq(value)))
        .execute(conn)?;

    let config_id: i64 = get_last_insert_rowid(conn)?;

    info!(config_id, key, "Configuration entry created");
    Ok(config_id)
}

/// Updates a configuration entry.
///
/// # Errors
///
/// Returns an error if the entry is not found or the update fails.
pub fn update_config_entry(
    conn: &mut SqliteConnection,
    config_id: i64,
    key: &str,
    value: &str,
) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::update(system_config::table)
        .filter(system_config::config_id.eq(config_id))
        .set((system_config::key.eq(key), system_config::value.eq(value)))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Configuration entry with ID {config_id} not found"
        )));
    }

    Ok(())
}

/// Deletes a configuration entry.
///
/// # Errors
///
/// Returns an error if the entry is not found or the delete fails.
pub fn delete_config_entry(
    conn: &mut SqliteConnection,
    config_id: i64,
) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::delete(system_config::table)
        .filter(system_config::config_id.eq(config_id))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Configuration entry with ID {config_id} not found"
        )));
    }

    info!("Deleted configuration entry ID: {}", config_id);
    Ok(())
}
