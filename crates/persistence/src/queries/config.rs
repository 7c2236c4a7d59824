// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! System configuration queries.

use diesel::SqliteConnection;
use diesel::prelude::*;

use crate::data_models::ConfigEntryData;
use crate::error::PersistenceError;
use crate::schema::system_config;

/// Retrieves a configuration entry by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the entry is not found.
pub fn get_config_entry(
    conn: &mut SqliteConnection,
    config_id: i64,
) -> Result<Option<ConfigEntryData>, PersistenceError> {
    let result: Result<(i64, String, String), diesel::result::Error> = system_config::table
        .filter(system_config::config_id.eq(config_id))
        .select((
            system_config::config_id,
            system_config::key,
            system_config::value,
        ))
        .first(conn);

    match result {
        Ok((config_id, key, value)) => Ok(Some(ConfigEntryData {
            config_id,
            key,
            value,
        })),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Retrieves the value stored under a configuration key.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the key is not set.
pub fn get_config_value(
    conn: &mut SqliteConnection,
    key: &str,
) -> Result<Option<String>, PersistenceError> {
    let result: Result<String, diesel::result::Error> = system_config::table
        .filter(system_config::key.eq(key))
        .select(system_config::value)
        .first(conn);

    match result {
        Ok(value) => Ok(Some(value)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Retrieves all configuration entries ordered by key.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_config_entries(
    conn: &mut SqliteConnection,
) -> Result<Vec<ConfigEntryData>, PersistenceError> {
    let rows: Vec<(i64, String, String)> = system_config::table
        .order(system_config::key.asc())
        .select((
            system_config::config_id,
            system_config::key,
            system_config::value,
        ))
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(|(config_id, key, value)| ConfigEntryData {
            config_id,
            key,
            value,
        })
        .collect())
}
