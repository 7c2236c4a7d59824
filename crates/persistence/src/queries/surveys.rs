// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Survey, section, question, branch, and overlay question queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::debug;

use crate::data_models::{BranchData, ProgramQuestionData, QuestionData, SectionData, SurveyData};
use crate::error::PersistenceError;
use crate::schema::{program_questions, question_branches, questions, sections, surveys};
use tracer_domain::SurveyKind;

/// Diesel Queryable struct for survey rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = surveys)]
struct SurveyRow {
    survey_id: i64,
    title: String,
    description: Option<String>,
    survey_kind: String,
    is_active: i32,
    period_id: Option<i64>,
    created_by: Option<String>,
    start_at: Option<String>,
    end_at: Option<String>,
    created_at: String,
}

impl From<SurveyRow> for SurveyData {
    fn from(row: SurveyRow) -> Self {
        Self {
            survey_id: row.survey_id,
            title: row.title,
            description: row.description,
            survey_kind: row.survey_kind,
            is_active: row.is_active != 0,
            period_id: row.period_id,
            created_by: row.created_by,
            start_at: row.start_at,
            end_at: row.end_at,
            created_at: row.created_at,
        }
    }
}

/// Diesel Queryable struct for section rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = sections)]
struct SectionRow {
    section_id: i64,
    survey_id: i64,
    title: String,
    description: Option<String>,
    sort_order: i32,
    created_at: String,
}

impl From<SectionRow> for SectionData {
    fn from(row: SectionRow) -> Self {
        Self {
            section_id: row.section_id,
            survey_id: row.survey_id,
            title: row.title,
            description: row.description,
            sort_order: row.sort_order,
            created_at: row.created_at,
        }
    }
}

/// Diesel Queryable struct for question rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = questions)]
struct QuestionRow {
    question_id: i64,
    section_id: i64,
    prompt: String,
    question_kind: String,
    options: Option<String>,
    code: Option<String>,
    is_required: i32,
    sort_order: i32,
    created_at: String,
}

impl From<QuestionRow> for QuestionData {
    fn from(row: QuestionRow) -> Self {
        Self {
            question_id: row.question_id,
            section_id: row.section_id,
            prompt: row.prompt,
            question_kind: row.question_kind,
            options: row.options,
            code: row.code,
            is_required: row.is_required != 0,
            sort_order: row.sort_order,
            created_at: row.created_at,
        }
    }
}

/// Diesel Queryable struct for overlay question rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = program_questions)]
struct ProgramQuestionRow {
    program_question_id: i64,
    survey_id: i64,
    program_study_id: i64,
    prompt: String,
    question_kind: String,
    options: Option<String>,
    code: Option<String>,
    is_required: i32,
    sort_order: i32,
    created_at: String,
}

impl From<ProgramQuestionRow> for ProgramQuestionData {
    fn from(row: ProgramQuestionRow) -> Self {
        Self {
            program_question_id: row.program_question_id,
            survey_id: row.survey_id,
            program_study_id: row.program_study_id,
            prompt: row.prompt,
            question_kind: row.question_kind,
            options: row.options,
            code: row.code,
            is_required: row.is_required != 0,
            sort_order: row.sort_order,
            created_at: row.created_at,
        }
    }
}

/// Retrieves a survey by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the survey is not found.
pub fn get_survey(
    conn: &mut SqliteConnection,
    survey_id: i64,
) -> Result<Option<SurveyData>, PersistenceError> {
    let result: Result<SurveyRow, diesel::result::Error> = surveys::table
        .filter(surveys::survey_id.eq(survey_id))
        .select(SurveyRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(SurveyData::from(row))),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Retrieves all surveys, newest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_surveys(conn: &mut SqliteConnection) -> Result<Vec<SurveyData>, PersistenceError> {
    let rows: Vec<SurveyRow> = surveys::table
        .order(surveys::survey_id.desc())
        .select(SurveyRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(SurveyData::from).collect())
}

/// Retrieves all surveys that are flagged active, newest first.
///
/// The window check against `start_at`/`end_at` happens in the API layer,
/// which owns the clock.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_active_surveys(
    conn: &mut SqliteConnection,
) -> Result<Vec<SurveyData>, PersistenceError> {
    let rows: Vec<SurveyRow> = surveys::table
        .filter(surveys::is_active.eq(1))
        .order(surveys::survey_id.desc())
        .select(SurveyRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(SurveyData::from).collect())
}

/// Selects the survey a supervisor token should point at.
///
/// Prefers the newest active skp survey and falls back to the newest skp
/// survey of any status.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if no skp survey exists at all.
pub fn find_supervisor_survey(
    conn: &mut SqliteConnection,
) -> Result<Option<SurveyData>, PersistenceError> {
    let active: Result<SurveyRow, diesel::result::Error> = surveys::table
        .filter(surveys::survey_kind.eq(SurveyKind::Skp.as_str()))
        .filter(surveys::is_active.eq(1))
        .order(surveys::survey_id.desc())
        .select(SurveyRow::as_select())
        .first(conn);

    match active {
        Ok(row) => return Ok(Some(SurveyData::from(row))),
        Err(diesel::result::Error::NotFound) => {
            debug!("No active skp survey; falling back to newest of any status");
        }
        Err(e) => return Err(PersistenceError::from(e)),
    }

    let any: Result<SurveyRow, diesel::result::Error> = surveys::table
        .filter(surveys::survey_kind.eq(SurveyKind::Skp.as_str()))
        .order(surveys::survey_id.desc())
        .select(SurveyRow::as_select())
        .first(conn);

    match any {
        Ok(row) => Ok(Some(SurveyData::from(row))),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Retrieves a section by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the section is not found.
pub fn get_section(
    conn: &mut SqliteConnection,
    section_id: i64,
) -> Result<Option<SectionData>, PersistenceError> {
    let result: Result<SectionRow, diesel::result::Error> = sections::table
        .filter(sections::section_id.eq(section_id))
        .select(SectionRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(SectionData::from(row))),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Retrieves the sections of a survey in sort order.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_sections(
    conn: &mut SqliteConnection,
    survey_id: i64,
) -> Result<Vec<SectionData>, PersistenceError> {
    let rows: Vec<SectionRow> = sections::table
        .filter(sections::survey_id.eq(survey_id))
        .order((sections::sort_order.asc(), sections::section_id.asc()))
        .select(SectionRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(SectionData::from).collect())
}

/// Retrieves a question by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the question is not found.
pub fn get_question(
    conn: &mut SqliteConnection,
    question_id: i64,
) -> Result<Option<QuestionData>, PersistenceError> {
    let result: Result<QuestionRow, diesel::result::Error> = questions::table
        .filter(questions::question_id.eq(question_id))
        .select(QuestionRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(QuestionData::from(row))),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Retrieves the questions of a section in sort order.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_questions(
    conn: &mut SqliteConnection,
    section_id: i64,
) -> Result<Vec<QuestionData>, PersistenceError> {
    let rows: Vec<QuestionRow> = questions::table
        .filter(questions::section_id.eq(section_id))
        .order((questions::sort_order.asc(), questions::question_id.asc()))
        .select(QuestionRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(QuestionData::from).collect())
}

/// Retrieves every question of a survey across all its sections.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_questions_for_survey(
    conn: &mut SqliteConnection,
    survey_id: i64,
) -> Result<Vec<QuestionData>, PersistenceError> {
    let rows: Vec<QuestionRow> = questions::table
        .inner_join(sections::table)
        .filter(sections::survey_id.eq(survey_id))
        .order((
            sections::sort_order.asc(),
            questions::sort_order.asc(),
            questions::question_id.asc(),
        ))
        .select(QuestionRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(QuestionData::from).collect())
}

/// Finds a survey question by its short code.
///
/// Codes identify well-known questions (e.g., the supervisor email
/// question) independently of their database IDs.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if no question in the survey carries the code.
pub fn find_question_by_code(
    conn: &mut SqliteConnection,
    survey_id: i64,
    code: &str,
) -> Result<Option<QuestionData>, PersistenceError> {
    let result: Result<QuestionRow, diesel::result::Error> = questions::table
        .inner_join(sections::table)
        .filter(sections::survey_id.eq(survey_id))
        .filter(questions::code.eq(code))
        .select(QuestionRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(QuestionData::from(row))),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Retrieves the branches of a question.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_branches(
    conn: &mut SqliteConnection,
    question_id: i64,
) -> Result<Vec<BranchData>, PersistenceError> {
    let rows: Vec<(i64, i64, String, i64)> = question_branches::table
        .filter(question_branches::question_id.eq(question_id))
        .order(question_branches::branch_id.asc())
        .select((
            question_branches::branch_id,
            question_branches::question_id,
            question_branches::answer_value,
            question_branches::next_section_id,
        ))
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(
            |(branch_id, question_id, answer_value, next_section_id)| BranchData {
                branch_id,
                question_id,
                answer_value,
                next_section_id,
            },
        )
        .collect())
}

/// Retrieves an overlay question by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the overlay question is not found.
pub fn get_program_question(
    conn: &mut SqliteConnection,
    program_question_id: i64,
) -> Result<Option<ProgramQuestionData>, PersistenceError> {
    let result: Result<ProgramQuestionRow, diesel::result::Error> = program_questions::table
        .filter(program_questions::program_question_id.eq(program_question_id))
        .select(ProgramQuestionRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(ProgramQuestionData::from(row))),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Retrieves the overlay questions of a survey for one program study.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_program_questions(
    conn: &mut SqliteConnection,
    survey_id: i64,
    program_study_id: i64,
) -> Result<Vec<ProgramQuestionData>, PersistenceError> {
    let rows: Vec<ProgramQuestionRow> = program_questions::table
        .filter(program_questions::survey_id.eq(survey_id))
        .filter(program_questions::program_study_id.eq(program_study_id))
        .order((
            program_questions::sort_order.asc(),
            program_questions::program_question_id.asc(),
        ))
        .select(ProgramQuestionRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(ProgramQuestionData::from).collect())
}
