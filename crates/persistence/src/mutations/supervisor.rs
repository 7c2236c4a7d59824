// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Supervisor token and supervisor answer mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::{debug, info};

use crate::connection::get_last_insert_rowid;
use crate::data_models::SupervisorTokenData;
use crate::error::PersistenceError;
use crate::queries::supervisor::get_supervisor_token;
use crate::schema::{supervisor_answers, supervisor_tokens};

/// Creates a supervisor token pointing at a skp survey on behalf of an
/// alumni.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `token` - The token string (a fresh UUID)
/// * `alumni_user_id` - The alumni whose supervisor is being asked
/// * `survey_id` - The skp survey the token unlocks
///
/// # Errors
///
/// Returns an error if the token cannot be created.
pub fn create_supervisor_token(
    conn: &mut SqliteConnection,
    token: &str,
    alumni_user_id: &str,
    survey_id: i64,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(supervisor_tokens::table)
        .values((
            supervisor_tokens::token.eq(token),
            supervisor_tokens::alumni_user_id.eq(alumni_user_id),
            supervisor_tokens::survey_id.eq(survey_id),
        ))
        .execute(conn)?;

    let token_id: i64 = get_last_insert_rowid(conn)?;

    info!(token_id, survey_id, "Supervisor token created");
    Ok(token_id)
}

/// Redeems a supervisor token exactly once.
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
pub fn redeem_supervisor_token(
    conn: &mut SqliteConnection,
    token: &str,
) -> Result<SupervisorTokenData, PersistenceError> {
    let rows_affected: usize = diesel::update(supervisor_tokens::table)
        .filter(supervisor_tokens::token.eq(token))
        .filter(supervisor_tokens::is_used.eq(0))
        .set(supervisor_tokens::is_used.eq(1))
        .execute(conn)?;

    if rows_affected == 0 {
        // Distinguish an unknown token from one that lost the race.
        return match get_supervisor_token(conn, token)? {
            Some(_) => Err(PersistenceError::TokenAlreadyUsed(token.to_string())),
            None => Err(PersistenceError::TokenNotFound(token.to_string())),
        };
    }

    debug!("Supervisor token redeemed");

    get_supervisor_token(conn, token)?.ok_or_else(|| {
        PersistenceError::TokenNotFound(format!("Token {token} vanished after redemption"))
    })
}

/// Inserts or updates a supervisor's answer to one question under a token.
///
/// # Errors
///
/// Returns an error if the insert or update fails.
pub fn upsert_supervisor_answer(
    conn: &mut SqliteConnection,
    token_id: i64,
    question_id: i64,
    value: &str,
) -> Result<i64, PersistenceError> {
    conn.transaction(|conn| {
        let existing: Option<i64> = supervisor_answers::table
            .filter(supervisor_answers::token_id.eq(token_id))
            .filter(supervisor_answers::question_id.eq(question_id))
            .select(supervisor_answers::supervisor_answer_id)
            .first(conn)
            .optional()?;

        if let Some(supervisor_answer_id) = existing {
            diesel::update(supervisor_answers::table)
                .filter(supervisor_answers::supervisor_answer_id.eq(supervisor_answer_id))
                .set(supervisor_answers::value.eq(value))
                .execute(conn)?;

            return Ok(supervisor_answer_id);
        }

        diesel::insert_into(supervisor_answers::table)
            .values((
                supervisor_answers::token_id.eq(token_id),
                supervisor_answers::question_id.eq(question_id),
                supervisor_answers::value.eq(value),
            ))
            .execute(conn)?;

        let supervisor_answer_id: i64 = get_last_insert_rowid(conn)?;
        Ok(supervisor_answer_id)
    })
}
