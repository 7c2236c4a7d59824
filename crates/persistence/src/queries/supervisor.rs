// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Supervisor token and supervisor answer queries.

use diesel::SqliteConnection;
use diesel::prelude::*;

use crate::data_models::{SupervisorAnswerData, SupervisorTokenData};
use crate::error::PersistenceError;
use crate::schema::{supervisor_answers, supervisor_tokens};

/// Diesel Queryable struct for supervisor token rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = supervisor_tokens)]
struct TokenRow {
    token_id: i64,
    token: String,
    alumni_user_id: String,
    survey_id: i64,
    is_used: i32,
    created_at: String,
}

impl From<TokenRow> for SupervisorTokenData {
    fn from(row: TokenRow) -> Self {
        Self {
            token_id: row.token_id,
            token: row.token,
            alumni_user_id: row.alumni_user_id,
            survey_id: row.survey_id,
            is_used: row.is_used != 0,
            created_at: row.created_at,
        }
    }
}

/// Retrieves a supervisor token by its token string.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the token is not found.
pub fn get_supervisor_token(
    conn: &mut SqliteConnection,
    token: &str,
) -> Result<Option<SupervisorTokenData>, PersistenceError> {
    let result: Result<TokenRow, diesel::result::Error> = supervisor_tokens::table
        .filter(supervisor_tokens::token.eq(token))
        .select(TokenRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(SupervisorTokenData::from(row))),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Retrieves the answers recorded under a supervisor token.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_supervisor_answers(
    conn: &mut SqliteConnection,
    token_id: i64,
) -> Result<Vec<SupervisorAnswerData>, PersistenceError> {
    let rows: Vec<(i64, i64, i64, String, String)> = supervisor_answers::table
        .filter(supervisor_answers::token_id.eq(token_id))
        .order(supervisor_answers::supervisor_answer_id.asc())
        .select((
            supervisor_answers::supervisor_answer_id,
            supervisor_answers::token_id,
            supervisor_answers::question_id,
            supervisor_answers::value,
            supervisor_answers::created_at,
        ))
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(
            |(supervisor_answer_id, token_id, question_id, value, created_at)| {
                SupervisorAnswerData {
                    supervisor_answer_id,
                    token_id,
                    question_id,
                    value,
                    created_at,
                }
            },
        )
        .collect())
}
