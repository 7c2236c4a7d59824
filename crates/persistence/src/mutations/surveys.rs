// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Survey, section, question, branch, and overlay question mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::{debug, info};

use crate::connection::get_last_insert_rowid;
use crate::data_models::{NewBranch, NewQuestion, NewSection, NewSurvey};
use crate::error::PersistenceError;
use crate::schema::{program_questions, question_branches, questions, sections, surveys};

/// Creates a new survey.
///
/// # Errors
///
/// Returns an error if the survey cannot be created.
pub fn create_survey(
    conn: &mut SqliteConnection,
    new_survey: &NewSurvey,
) -> Result<i64, PersistenceError> {
    info!(
        "Creating {} survey: {}",
        new_survey.survey_kind, new_survey.title
    );

    diesel::insert_into(surveys::table)
        .values((
            surveys::title.eq(&new_survey.title),
            surveys::description.eq(&new_survey.description),
            surveys::survey_kind.eq(&new_survey.survey_kind),
            surveys::is_active.eq(i32::from(new_survey.is_active)),
            surveys::period_id.eq(new_survey.period_id),
            surveys::created_by.eq(&new_survey.created_by),
            surveys::start_at.eq(&new_survey.start_at),
            surveys::end_at.eq(&new_survey.end_at),
        ))
        .execute(conn)?;

    let survey_id: i64 = get_last_insert_rowid(conn)?;

    info!(survey_id, "Survey created");
    Ok(survey_id)
}

/// Replaces a survey's mutable fields.
///
/// # Errors
///
/// Returns an error if the survey is not found or the update fails.
pub fn update_survey(
    conn: &mut SqliteConnection,
    survey_id: i64,
    changes: &NewSurvey,
) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::update(surveys::table)
        .filter(surveys::survey_id.eq(survey_id))
        .set((
            surveys::title.eq(&changes.title),
            surveys::description.eq(&changes.description),
            surveys::survey_kind.eq(&changes.survey_kind),
            surveys::is_active.eq(i32::from(changes.is_active)),
            surveys::period_id.eq(changes.period_id),
            surveys::start_at.eq(&changes.start_at),
            surveys::end_at.eq(&changes.end_at),
        ))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Survey with ID {survey_id} not found"
        )));
    }

    Ok(())
}

/// Deletes a survey and, through cascades, its sections, questions,
/// branches, overlay questions, and answers.
///
/// # Errors
///
/// Returns an error if the survey is not found or the delete fails.
pub fn delete_survey(conn: &mut SqliteConnection, survey_id: i64) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::delete(surveys::table)
        .filter(surveys::survey_id.eq(survey_id))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Survey with ID {survey_id} not found"
        )));
    }

    info!("Deleted survey ID: {}", survey_id);
    Ok(())
}

/// Creates a new section in a survey.
///
/// # Errors
///
/// Returns an error if the section cannot be created.
pub fn create_section(
    conn: &mut SqliteConnection,
    survey_id: i64,
    new_section: &NewSection,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(sections::table)
        .values((
            sections::survey_id.eq(survey_id),
            sections::title.eq(&new_section.title),
            sections::description.eq(&new_section.description),
            sections::sort_order.eq(new_section.sort_order),
        ))
        .execute(conn)?;

    let section_id: i64 = get_last_insert_rowid(conn)?;

    info!(section_id, survey_id, "Section created");
    Ok(section_id)
}

/// Replaces a section's mutable fields.
///
/// # Errors
///
/// Returns an error if the section is not found or the update fails.
pub fn update_section(
    conn: &mut SqliteConnection,
    section_id: i64,
    changes: &NewSection,
) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::update(sections::table)
        .filter(sections::section_id.eq(section_id))
        .set((
            sections::title.eq(&changes.title),
            sections::description.eq(&changes.description),
            sections::sort_order.eq(changes.sort_order),
        ))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Section with ID {section_id} not found"
        )));
    }

    Ok(())
}

/// Deletes a section.
///
/// # Errors
///
/// Returns an error if the section is not found or the delete fails.
pub fn delete_section(
    conn: &mut SqliteConnection,
    section_id: i64,
) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::delete(sections::table)
        .filter(sections::section_id.eq(section_id))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Section with ID {section_id} not found"
        )));
    }

    info!("Deleted section ID: {}", section_id);
    Ok(())
}

/// Creates a new question in a section, together with its branches.
///
/// The question insert and the branch inserts run in one transaction.
///
/// # Errors
///
/// Returns an error if any insert fails.
pub fn create_question(
    conn: &mut SqliteConnection,
    section_id: i64,
    new_question: &NewQuestion,
    branches: &[NewBranch],
) -> Result<i64, PersistenceError> {
    let question_id: i64 = conn.transaction(|conn| {
        diesel::insert_into(questions::table)
            .values((
                questions::section_id.eq(section_id),
                questions::prompt.eq(&new_question.prompt),
                questions::question_kind.eq(&new_question.question_kind),
                questions::options.eq(&new_question.options),
                questions::code.eq(&new_question.code),
                questions::is_required.eq(i32::from(new_question.is_required)),
                questions::sort_order.eq(new_question.sort_order),
            ))
            .execute(conn)?;

        let question_id: i64 = get_last_insert_rowid(conn)?;

        insert_branches(conn, question_id, branches)?;

        Ok::<i64, PersistenceError>(question_id)
    })?;

    info!(question_id, section_id, "Question created");
    Ok(question_id)
}

/// Replaces a question's fields and its entire branch list.
///
/// Branch replacement is wholesale: existing branches are deleted and the
/// given list is inserted in their place.
///
/// # Errors
///
/// Returns an error if the question is not found or any statement fails.
pub fn update_question(
    conn: &mut SqliteConnection,
    question_id: i64,
    changes: &NewQuestion,
    branches: &[NewBranch],
) -> Result<(), PersistenceError> {
    conn.transaction(|conn| {
        let rows_affected: usize = diesel::update(questions::table)
            .filter(questions::question_id.eq(question_id))
            .set((
                questions::prompt.eq(&changes.prompt),
                questions::question_kind.eq(&changes.question_kind),
                questions::options.eq(&changes.options),
                questions::code.eq(&changes.code),
                questions::is_required.eq(i32::from(changes.is_required)),
                questions::sort_order.eq(changes.sort_order),
            ))
            .execute(conn)?;

        if rows_affected == 0 {
            return Err(PersistenceError::NotFound(format!(
                "Question with ID {question_id} not found"
            )));
        }

        let deleted: usize = diesel::delete(question_branches::table)
            .filter(question_branches::question_id.eq(question_id))
            .execute(conn)?;
        debug!(question_id, deleted, "Replaced branch list");

        insert_branches(conn, question_id, branches)?;

        Ok(())
    })
}

/// Deletes a question.
///
/// # Errors
///
/// Returns an error if the question is not found or the delete fails.
pub fn delete_question(
    conn: &mut SqliteConnection,
    question_id: i64,
) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::delete(questions::table)
        .filter(questions::question_id.eq(question_id))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Question with ID {question_id} not found"
        )));
    }

    info!("Deleted question ID: {}", question_id);
    Ok(())
}

fn insert_branches(
    conn: &mut SqliteConnection,
    question_id: i64,
    branches: &[NewBranch],
) -> Result<(), PersistenceError> {
    for branch in branches {
        diesel::insert_into(question_branches::table)
            .values((
                question_branches::question_id.eq(question_id),
                question_branches::answer_value.eq(&branch.answer_value),
                question_branches::next_section_id.eq(branch.next_section_id),
            ))
            .execute(conn)?;
    }
    Ok(())
}

/// Creates a new overlay question for a program study.
///
/// # Errors
///
/// Returns an error if the overlay question cannot be created.
pub fn create_program_question(
    conn: &mut SqliteConnection,
    survey_id: i64,
    program_study_id: i64,
    new_question: &NewQuestion,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(program_questions::table)
        .values((
            program_questions::survey_id.eq(survey_id),
            program_questions::program_study_id.eq(program_study_id),
            program_questions::prompt.eq(&new_question.prompt),
            program_questions::question_kind.eq(&new_question.question_kind),
            program_questions::options.eq(&new_question.options),
            program_questions::code.eq(&new_question.code),
            program_questions::is_required.eq(i32::from(new_question.is_required)),
            program_questions::sort_order.eq(new_question.sort_order),
        ))
        .execute(conn)?;

    let program_question_id: i64 = get_last_insert_rowid(conn)?;

    info!(
        program_question_id,
        survey_id, program_study_id, "Overlay question created"
    );
    Ok(program_question_id)
}

/// Replaces an overlay question's fields.
///
/// # Errors
///
/// Returns an error if the overlay question is not found or the update
/// fails.
pub fn update_program_question(
    conn: &mut SqliteConnection,
    program_question_id: i64,
    changes: &NewQuestion,
) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::update(program_questions::table)
        .filter(program_questions::program_question_id.eq(program_question_id))
        .set((
            program_questions::prompt.eq(&changes.prompt),
            program_questions::question_kind.eq(&changes.question_kind),
            program_questions::options.eq(&changes.options),
            program_questions::code.eq(&changes.code),
            program_questions::is_required.eq(i32::from(changes.is_required)),
            program_questions::sort_order.eq(changes.sort_order),
        ))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Overlay question with ID {program_question_id} not found"
        )));
    }

    Ok(())
}

/// Deletes an overlay question.
///
/// # Errors
///
/// Returns an error if the overlay question is not found or the delete
/// fails.
pub fn delete_program_question(
    conn: &mut SqliteConnection,
    program_question_id: i64,
) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::delete(program_questions::table)
        .filter(program_questions::program_question_id.eq(program_question_id))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Overlay question with ID {program_question_id} not found"
        )));
    }

    info!("Deleted overlay question ID: {}", program_question_id);
    Ok(())
}
