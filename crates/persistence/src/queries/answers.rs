// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Answer queries: lookups, scoped listings, and reminder counts.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::debug;

use crate::data_models::AnswerData;
use crate::error::PersistenceError;
use crate::schema::{answers, questions, sections, users};

/// Diesel Queryable struct for answer rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = answers)]
struct AnswerRow {
    answer_id: i64,
    survey_id: i64,
    user_id: String,
    question_id: Option<i64>,
    program_question_id: Option<i64>,
    value: String,
    created_at: String,
}

impl From<AnswerRow> for AnswerData {
    fn from(row: AnswerRow) -> Self {
        Self {
            answer_id: row.answer_id,
            survey_id: row.survey_id,
            user_id: row.user_id,
            question_id: row.question_id,
            program_question_id: row.program_question_id,
            value: row.value,
            created_at: row.created_at,
        }
    }
}

/// Retrieves an answer by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the answer is not found.
pub fn get_answer(
    conn: &mut SqliteConnection,
    answer_id: i64,
) -> Result<Option<AnswerData>, PersistenceError> {
    let result: Result<AnswerRow, diesel::result::Error> = answers::table
        .filter(answers::answer_id.eq(answer_id))
        .select(AnswerRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(AnswerData::from(row))),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Retrieves every answer of a survey.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_answers_for_survey(
    conn: &mut SqliteConnection,
    survey_id: i64,
) -> Result<Vec<AnswerData>, PersistenceError> {
    let rows: Vec<AnswerRow> = answers::table
        .filter(answers::survey_id.eq(survey_id))
        .order(answers::answer_id.asc())
        .select(AnswerRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(AnswerData::from).collect())
}

/// Retrieves the answers of a survey submitted by users of one program
/// study.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_answers_for_survey_by_program(
    conn: &mut SqliteConnection,
    survey_id: i64,
    program_study_id: i64,
) -> Result<Vec<AnswerData>, PersistenceError> {
    let rows: Vec<AnswerRow> = answers::table
        .inner_join(users::table)
        .filter(answers::survey_id.eq(survey_id))
        .filter(users::program_study_id.eq(program_study_id))
        .order(answers::answer_id.asc())
        .select(AnswerRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(AnswerData::from).collect())
}

/// Retrieves one user's answers to a survey.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_answers_for_user(
    conn: &mut SqliteConnection,
    survey_id: i64,
    user_id: &str,
) -> Result<Vec<AnswerData>, PersistenceError> {
    let rows: Vec<AnswerRow> = answers::table
        .filter(answers::survey_id.eq(survey_id))
        .filter(answers::user_id.eq(user_id))
        .order(answers::answer_id.asc())
        .select(AnswerRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(AnswerData::from).collect())
}

/// Retrieves all answers to one question of a survey.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_answers_by_question(
    conn: &mut SqliteConnection,
    survey_id: i64,
    question_id: i64,
) -> Result<Vec<AnswerData>, PersistenceError> {
    let rows: Vec<AnswerRow> = answers::table
        .filter(answers::survey_id.eq(survey_id))
        .filter(answers::question_id.eq(question_id))
        .order(answers::answer_id.asc())
        .select(AnswerRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(AnswerData::from).collect())
}

/// Retrieves all answers to one overlay question of a survey.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_answers_by_program_question(
    conn: &mut SqliteConnection,
    survey_id: i64,
    program_question_id: i64,
) -> Result<Vec<AnswerData>, PersistenceError> {
    let rows: Vec<AnswerRow> = answers::table
        .filter(answers::survey_id.eq(survey_id))
        .filter(answers::program_question_id.eq(program_question_id))
        .order(answers::answer_id.asc())
        .select(AnswerRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(AnswerData::from).collect())
}

/// Retrieves one user's answer to one section question, if any.
///
/// Used to read the supervisor email address out of an lv1 submission.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_user_answer_to_question(
    conn: &mut SqliteConnection,
    user_id: &str,
    question_id: i64,
) -> Result<Option<AnswerData>, PersistenceError> {
    let result: Result<AnswerRow, diesel::result::Error> = answers::table
        .filter(answers::user_id.eq(user_id))
        .filter(answers::question_id.eq(question_id))
        .select(AnswerRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(AnswerData::from(row))),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Counts the required section questions of a survey.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_required_questions(
    conn: &mut SqliteConnection,
    survey_id: i64,
) -> Result<i64, PersistenceError> {
    let count: i64 = questions::table
        .inner_join(sections::table)
        .filter(sections::survey_id.eq(survey_id))
        .filter(questions::is_required.eq(1))
        .count()
        .get_result(conn)?;

    Ok(count)
}

/// Counts one user's answers to the required questions of a survey.
///
/// A user whose count falls short of `count_required_questions` has not
/// completed the survey and is a reminder candidate.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_required_answers(
    conn: &mut SqliteConnection,
    survey_id: i64,
    user_id: &str,
) -> Result<i64, PersistenceError> {
    debug!(
        "Counting required answers for user {} in survey {}",
        user_id, survey_id
    );

    let count: i64 = answers::table
        .inner_join(questions::table.inner_join(sections::table))
        .filter(sections::survey_id.eq(survey_id))
        .filter(questions::is_required.eq(1))
        .filter(answers::user_id.eq(user_id))
        .count()
        .get_result(conn)?;

    Ok(count)
}
