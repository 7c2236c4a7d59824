// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Faculty, department, program study, and period mutations.
//!
//! Program study creation auto-provisions the program-scoped role for the
//! new unit; deletion removes that role again. Both run in one transaction
//! so the role and the unit never drift apart.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::info;

use crate::connection::get_last_insert_rowid;
use crate::error::PersistenceError;
use crate::schema::{departments, faculties, periods, program_studies, roles};

/// Creates a new faculty.
///
/// # Errors
///
/// Returns an error if the faculty cannot be created.
pub fn create_faculty(conn: &mut SqliteConnection, name: &str) -> Result<i64, PersistenceError> {
    diesel::insert_into(faculties::table)
        .values(faculties::name.eq(name))
        .execute(conn)?;

    let faculty_id: i64 = get_last_insert_rowid(conn)?;

    info!(faculty_id, "Faculty created");
    Ok(faculty_id)
}

/// Renames a faculty.
///
/// # Errors
///
/// Returns an error if the faculty is not found or the update fails.
pub fn update_faculty(
    conn: &mut SqliteConnection,
    faculty_id: i64,
    name: &str,
) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::update(faculties::table)
        .filter(faculties::faculty_id.eq(faculty_id))
        .set(faculties::name.eq(name))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Faculty with ID {faculty_id} not found"
        )));
    }

    Ok(())
}

/// Deletes a faculty and, through cascades, its departments and program
/// studies.
///
/// # Errors
///
/// Returns an error if the faculty is not found or the delete fails.
pub fn delete_faculty(
    conn: &mut SqliteConnection,
    faculty_id: i64,
) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::delete(faculties::table)
        .filter(faculties::faculty_id.eq(faculty_id))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Faculty with ID {faculty_id} not found"
        )));
    }

    info!("Deleted faculty ID: {}", faculty_id);
    Ok(())
}

/// Creates a new department under a faculty.
///
/// # Errors
///
/// Returns an error if the department cannot be created.
pub fn create_department(
    conn: &mut SqliteConnection,
    faculty_id: i64,
    name: &str,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(departments::table)
        .values((
            departments::faculty_id.eq(faculty_id),
            departments::name.eq(name),
        ))
        .execute(conn)?;

    let department_id: i64 = get_last_insert_rowid(conn)?;

    info!(department_id, "Department created");
    Ok(department_id)
}

/// Updates a department's faculty and name.
///
/// # Errors
///
/// Returns an error if the department is not found or the update fails.
pub fn update_department(
    conn: &mut SqliteConnection,
    department_id: i64,
    faculty_id: i64,
    name: &str,
) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::update(departments::table)
        .filter(departments::department_id.eq(department_id))
        .set((
            departments::faculty_id.eq(faculty_id),
            departments::name.eq(name),
        ))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Department with ID {department_id} not found"
        )));
    }

    Ok(())
}

/// Deletes a department.
///
/// # Errors
///
/// Returns an error if the department is not found or the delete fails.
pub fn delete_department(
    conn: &mut SqliteConnection,
    department_id: i64,
) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::delete(departments::table)
        .filter(departments::department_id.eq(department_id))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Department with ID {department_id} not found"
        )));
    }

    info!("Deleted department ID: {}", department_id);
    Ok(())
}

/// Creates a new program study and its program-scoped role.
///
/// Both inserts run in one transaction.
///
/// # Errors
///
/// Returns an error if either insert fails.
pub fn create_program_study(
    conn: &mut SqliteConnection,
    department_id: i64,
    name: &str,
) -> Result<i64, PersistenceError> {
    let program_study_id: i64 = conn.transaction(|conn| {
        diesel::insert_into(program_studies::table)
            .values((
                program_studies::department_id.eq(department_id),
                program_studies::name.eq(name),
            ))
            .execute(conn)?;

        let program_study_id: i64 = get_last_insert_rowid(conn)?;

        let role_name: String = format!("Prodi {name}");
        diesel::insert_into(roles::table)
            .values((
                roles::name.eq(&role_name),
                roles::program_study_id.eq(program_study_id),
            ))
            .execute(conn)?;

        Ok::<i64, PersistenceError>(program_study_id)
    })?;

    info!(
        program_study_id,
        "Program study created with its scoped role"
    );
    Ok(program_study_id)
}

/// Updates a program study's department and name.
///
/// The scoped role's display name follows the new unit name.
///
/// # Errors
///
/// Returns an error if the program study is not found or the update fails.
pub fn update_program_study(
    conn: &mut SqliteConnection,
    program_study_id: i64,
    department_id: i64,
    name: &str,
) -> Result<(), PersistenceError> {
    conn.transaction(|conn| {
        let rows_affected: usize = diesel::update(program_studies::table)
            .filter(program_studies::program_study_id.eq(program_study_id))
            .set((
                program_studies::department_id.eq(department_id),
                program_studies::name.eq(name),
            ))
            .execute(conn)?;

        if rows_affected == 0 {
            return Err(PersistenceError::NotFound(format!(
                "Program study with ID {program_study_id} not found"
            )));
        }

        let role_name: String = format!("Prodi {name}");
        diesel::update(roles::table)
            .filter(roles::program_study_id.eq(program_study_id))
            .set(roles::name.eq(&role_name))
            .execute(conn)?;

        Ok(())
    })
}

/// Deletes a program study and its program-scoped role.
///
/// # Errors
///
/// Returns an error if the program study is not found or the delete fails.
pub fn delete_program_study(
    conn: &mut SqliteConnection,
    program_study_id: i64,
) -> Result<(), PersistenceError> {
    conn.transaction(|conn| {
        diesel::delete(roles::table)
            .filter(roles::program_study_id.eq(program_study_id))
            .execute(conn)?;

        let rows_affected: usize = diesel::delete(program_studies::table)
            .filter(program_studies::program_study_id.eq(program_study_id))
            .execute(conn)?;

        if rows_affected == 0 {
            return Err(PersistenceError::NotFound(format!(
                "Program study with ID {program_study_id} not found"
            )));
        }

        Ok(())
    })?;

    info!("Deleted program study ID: {}", program_study_id);
    Ok(())
}

/// Creates a new period.
///
/// Both the category and the sort order are unique; duplicates surface as
/// `Conflict` errors.
///
/// # Errors
///
/// Returns an error if the period cannot be created.
pub fn create_period(
    conn: &mut SqliteConnection,
    category: &str,
    sort_order: i32,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(periods::table)
        .values((
            periods::category.eq(category),
            periods::sort_order.eq(sort_order),
        ))
        .execute(conn)?;

    let period_id: i64 = get_last_insert_rowid(conn)?;

    info!(period_id, "Period created");
    Ok(period_id)
}

/// Updates a period's category and sort order.
///
/// # Errors
///
/// Returns an error if the period is not found, a uniqueness constraint is
/// violated, or the update fails.
pub fn update_period(
    conn: &mut SqliteConnection,
    period_id: i64,
    category: &str,
    sort_order: i32,
) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::update(periods::table)
        .filter(periods::period_id.eq(period_id))
        .set((
            periods::category.eq(category),
            periods::sort_order.eq(sort_order),
        ))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Period with ID {period_id} not found"
        )));
    }

    Ok(())
}

/// Deletes a period.
///
/// # Errors
///
/// Returns an error if the period is not found or the delete fails.
pub fn delete_period(conn: &mut SqliteConnection, period_id: i64) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::delete(periods::table)
        .filter(periods::period_id.eq(period_id))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Period with ID {period_id} not found"
        )));
    }

    info!("Deleted period ID: {}", period_id);
    Ok(())
}
