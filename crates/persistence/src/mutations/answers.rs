// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Answer mutations.
//!
//! Submissions upsert: a user re-answering a question overwrites their
//! earlier value instead of producing a duplicate row. The partial unique
//! indexes on (user, question) and (user, program question) back this up at
//! the storage level.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::debug;

use crate::connection::get_last_insert_rowid;
use crate::error::PersistenceError;
use crate::schema::answers;
use tracer_domain::AnswerTarget;

/// Inserts or updates a user's answer to a question.
///
/// Exactly one of the two target columns is written, chosen by the tagged
/// `AnswerTarget`. Returns the answer ID, whether fresh or reused.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `survey_id` - The survey the answer belongs to
/// * `user_id` - The submitting user
/// * `target` - The question or overlay question being answered
/// * `value` - The canonical stored encoding of the answer
///
/// # Errors
///
/// Returns an error if the insert or update fails.
pub fn upsert_answer(
    conn: &mut SqliteConnection,
    survey_id: i64,
    user_id: &str,
    target: AnswerTarget,
    value: &str,
) -> Result<i64, PersistenceError> {
    conn.transaction(|conn| {
        let existing: Option<i64> = match target {
            AnswerTarget::Question(question_id) => answers::table
                .filter(answers::user_id.eq(user_id))
                .filter(answers::question_id.eq(question_id))
                .select(answers::answer_id)
                .first(conn)
                .optional()?,
            AnswerTarget::ProgramQuestion(program_question_id) => answers::table
                .filter(answers::user_id.eq(user_id))
                .filter(answers::program_question_id.eq(program_question_id))
                .select(answers::answer_id)
                .first(conn)
                .optional()?,
        };

        if let Some(answer_id) = existing {
            diesel::update(answers::table)
                .filter(answers::answer_id.eq(answer_id))
                .set(answers::value.eq(value))
                .execute(conn)?;

            debug!(answer_id, user_id, "Answer updated in place");
            return Ok(answer_id);
        }

        diesel::insert_into(answers::table)
            .values((
                answers::survey_id.eq(survey_id),
                answers::user_id.eq(user_id),
                answers::question_id.eq(target.question_id()),
                answers::program_question_id.eq(target.program_question_id()),
                answers::value.eq(value),
            ))
            .execute(conn)?;

        let answer_id: i64 = get_last_insert_rowid(conn)?;

        debug!(answer_id, user_id, "Answer inserted");
        Ok(answer_id)
    })
}

/// Overwrites the value of an existing answer.
///
/// # Errors
///
/// Returns an error if the answer is not found or the update fails.
pub fn update_answer(
    conn: &mut SqliteConnection,
    answer_id: i64,
    value: &str,
) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::update(answers::table)
        .filter(answers::answer_id.eq(answer_id))
        .set(answers::value.eq(value))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Answer with ID {answer_id} not found"
        )));
    }

    Ok(())
}

/// Deletes an answer.
///
/// # Errors
///
/// Returns an error if the answer is not found or the delete fails.
pub fn delete_answer(conn: &mut SqliteConnection, answer_id: i64) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::delete(answers::table)
        .filter(answers::answer_id.eq(answer_id))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Answer with ID {answer_id} not found"
        )));
    }

    Ok(())
}
