// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Faculty, department, program study, and period queries.

use diesel::SqliteConnection;
use diesel::prelude::*;

use crate::data_models::{DepartmentData, FacultyData, PeriodData, ProgramStudyData};
use crate::error::PersistenceError;
use crate::schema::{departments, faculties, periods, program_studies};

/// Retrieves a faculty by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the faculty is not found.
pub fn get_faculty(
    conn: &mut SqliteConnection,
    faculty_id: i64,
) -> Result<Option<FacultyData>, PersistenceError> {
    let result: Result<(i64, String), diesel::result::Error> = faculties::table
        .filter(faculties::faculty_id.eq(faculty_id))
        .select((faculties::faculty_id, faculties::name))
        .first(conn);

    match result {
        Ok((faculty_id, name)) => Ok(Some(FacultyData { faculty_id, name })),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Retrieves all faculties ordered by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_faculties(conn: &mut SqliteConnection) -> Result<Vec<FacultyData>, PersistenceError> {
    let rows: Vec<(i64, String)> = faculties::table
        .order(faculties::faculty_id.asc())
        .select((faculties::faculty_id, faculties::name))
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(|(faculty_id, name)| FacultyData { faculty_id, name })
        .collect())
}

/// Retrieves a department by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the department is not found.
pub fn get_department(
    conn: &mut SqliteConnection,
    department_id: i64,
) -> Result<Option<DepartmentData>, PersistenceError> {
    let result: Result<(i64, i64, String), diesel::result::Error> = departments::table
        .filter(departments::department_id.eq(department_id))
        .select((
            departments::department_id,
            departments::faculty_id,
            departments::name,
        ))
        .first(conn);

    match result {
        Ok((department_id, faculty_id, name)) => Ok(Some(DepartmentData {
            department_id,
            faculty_id,
            name,
        })),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Retrieves all departments ordered by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_departments(
    conn: &mut SqliteConnection,
) -> Result<Vec<DepartmentData>, PersistenceError> {
    let rows: Vec<(i64, i64, String)> = departments::table
        .order(departments::department_id.asc())
        .select((
            departments::department_id,
            departments::faculty_id,
            departments::name,
        ))
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(|(department_id, faculty_id, name)| DepartmentData {
            department_id,
            faculty_id,
            name,
        })
        .collect())
}

/// Retrieves a program study by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the program study is not found.
pub fn get_program_study(
    conn: &mut SqliteConnection,
    program_study_id: i64,
) -> Result<Option<ProgramStudyData>, PersistenceError> {
    let result: Result<(i64, i64, String), diesel::result::Error> = program_studies::table
        .filter(program_studies::program_study_id.eq(program_study_id))
        .select((
            program_studies::program_study_id,
            program_studies::department_id,
            program_studies::name,
        ))
        .first(conn);

    match result {
        Ok((program_study_id, department_id, name)) => Ok(Some(ProgramStudyData {
            program_study_id,
            department_id,
            name,
        })),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Retrieves all program studies ordered by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_program_studies(
    conn: &mut SqliteConnection,
) -> Result<Vec<ProgramStudyData>, PersistenceError> {
    let rows: Vec<(i64, i64, String)> = program_studies::table
        .order(program_studies::program_study_id.asc())
        .select((
            program_studies::program_study_id,
            program_studies::department_id,
            program_studies::name,
        ))
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(|(program_study_id, department_id, name)| ProgramStudyData {
            program_study_id,
            department_id,
            name,
        })
        .collect())
}

/// Retrieves a period by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the period is not found.
pub fn get_period(
    conn: &mut SqliteConnection,
    period_id: i64,
) -> Result<Option<PeriodData>, PersistenceError> {
    let result: Result<(i64, String, i32), diesel::result::Error> = periods::table
        .filter(periods::period_id.eq(period_id))
        .select((periods::period_id, periods::category, periods::sort_order))
        .first(conn);

    match result {
        Ok((period_id, category, sort_order)) => Ok(Some(PeriodData {
            period_id,
            category,
            sort_order,
        })),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Retrieves all periods in sort order.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_periods(conn: &mut SqliteConnection) -> Result<Vec<PeriodData>, PersistenceError> {
    let rows: Vec<(i64, String, i32)> = periods::table
        .order(periods::sort_order.asc())
        .select((periods::period_id, periods::category, periods::sort_order))
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(|(period_id, category, sort_order)| PeriodData {
            period_id,
            category,
            sort_order,
        })
        .collect())
}
