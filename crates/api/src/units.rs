// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Organizational unit and period management.
//!
//! Faculties, departments, and program studies form a fixed three-level
//! hierarchy. Creating a program study auto-provisions its program-scoped
//! role in the persistence layer; deleting one removes that role. Reads are
//! open to any authenticated user, mutations to Admins.

use tracing::info;
use tracer_persistence::{
    DepartmentData, FacultyData, PeriodData, ProgramStudyData, SqlitePersistence,
};

use crate::auth::{AuthenticatedUser, AuthorizationService};
use crate::error::{ApiError, translate_persistence_error};
use crate::request_response::{
    DepartmentPayload, FacultyPayload, PeriodPayload, ProgramStudyPayload,
};

/// Creates a faculty.
///
/// # Errors
///
/// Returns an error if the caller is not an Admin.
pub fn create_faculty(
    persistence: &mut SqlitePersistence,
    actor: &AuthenticatedUser,
    request: &FacultyPayload,
) -> Result<i64, ApiError> {
    AuthorizationService::authorize_manage_units(actor)?;

    let faculty_id: i64 = persistence
        .create_faculty(&request.name)
        .map_err(|e| translate_persistence_error("Faculty", e))?;

    info!(actor = %actor.user_id, faculty_id, "Created faculty");
    Ok(faculty_id)
}

/// Renames a faculty.
///
/// # Errors
///
/// Returns an error if the caller is not an Admin or the faculty does not
/// exist.
pub fn update_faculty(
    persistence: &mut SqlitePersistence,
    actor: &AuthenticatedUser,
    faculty_id: i64,
    request: &FacultyPayload,
) -> Result<(), ApiError> {
    AuthorizationService::authorize_manage_units(actor)?;

    persistence
        .update_faculty(faculty_id, &request.name)
        .map_err(|e| translate_persistence_error("Faculty", e))
}

/// Deletes a faculty and everything beneath it.
///
/// # Errors
///
/// Returns an error if the caller is not an Admin or the faculty does not
/// exist.
pub fn delete_faculty(
    persistence: &mut SqlitePersistence,
    actor: &AuthenticatedUser,
    faculty_id: i64,
) -> Result<(), ApiError> {
    AuthorizationService::authorize_manage_units(actor)?;

    persistence
        .delete_faculty(faculty_id)
        .map_err(|e| translate_persistence_error("Faculty", e))?;

    info!(actor = %actor.user_id, faculty_id, "Deleted faculty");
    Ok(())
}

/// Retrieves a faculty.
///
/// # Errors
///
/// Returns an error if the faculty does not exist.
pub fn get_faculty(
    persistence: &mut SqlitePersistence,
    faculty_id: i64,
) -> Result<FacultyData, ApiError> {
    persistence
        .get_faculty(faculty_id)
        .map_err(|e| translate_persistence_error("Faculty", e))?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Faculty"),
            message: format!("Faculty {faculty_id} does not exist"),
        })
}

/// Retrieves all faculties.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_faculties(
    persistence: &mut SqlitePersistence,
) -> Result<Vec<FacultyData>, ApiError> {
    persistence
        .list_faculties()
        .map_err(|e| translate_persistence_error("Faculty", e))
}

/// Creates a department.
///
/// # Errors
///
/// Returns an error if the caller is not an Admin or the owning faculty
/// does not exist.
pub fn create_department(
    persistence: &mut SqlitePersistence,
    actor: &AuthenticatedUser,
    request: &DepartmentPayload,
) -> Result<i64, ApiError> {
    AuthorizationService::authorize_manage_units(actor)?;
    get_faculty(persistence, request.faculty_id)?;

    let department_id: i64 = persistence
        .create_department(request.faculty_id, &request.name)
        .map_err(|e| translate_persistence_error("Department", e))?;

    info!(actor = %actor.user_id, department_id, "Created department");
    Ok(department_id)
}

/// Updates a department.
///
/// # Errors
///
/// Returns an error if the caller is not an Admin or the department or
/// faculty does not exist.
pub fn update_department(
    persistence: &mut SqlitePersistence,
    actor: &AuthenticatedUser,
    department_id: i64,
    request: &DepartmentPayload,
) -> Result<(), ApiError> {
    AuthorizationService::authorize_manage_units(actor)?;
    get_faculty(persistence, request.faculty_id)?;

    persistence
        .update_department(department_id, request.faculty_id, &request.name)
        .map_err(|e| translate_persistence_error("Department", e))
}

/// Deletes a department and its program studies.
///
/// # Errors
///
/// Returns an error if the caller is not an Admin or the department does
/// not exist.
pub fn delete_department(
    persistence: &mut SqlitePersistence,
    actor: &AuthenticatedUser,
    department_id: i64,
) -> Result<(), ApiError> {
    AuthorizationService::authorize_manage_units(actor)?;

    persistence
        .delete_department(department_id)
        .map_err(|e| translate_persistence_error("Department", e))?;

    info!(actor = %actor.user_id, department_id, "Deleted department");
    Ok(())
}

/// Retrieves a department.
///
/// # Errors
///
/// Returns an error if the department does not exist.
pub fn get_department(
    persistence: &mut SqlitePersistence,
    department_id: i64,
) -> Result<DepartmentData, ApiError> {
    persistence
        .get_department(department_id)
        .map_err(|e| translate_persistence_error("Department", e))?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Department"),
            message: format!("Department {department_id} does not exist"),
        })
}

/// Retrieves all departments.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_departments(
    persistence: &mut SqlitePersistence,
) -> Result<Vec<DepartmentData>, ApiError> {
    persistence
        .list_departments()
        .map_err(|e| translate_persistence_error("Department", e))
}

/// Creates a program study and its program-scoped role.
///
/// # Errors
///
/// Returns an error if the caller is not an Admin or the owning department
/// does not exist.
pub fn create_program_study(
    persistence: &mut SqlitePersistence,
    actor: &AuthenticatedUser,
    request: &ProgramStudyPayload,
) -> Result<i64, ApiError> {
    AuthorizationService::authorize_manage_units(actor)?;
    get_department(persistence, request.department_id)?;

    let program_study_id: i64 = persistence
        .create_program_study(request.department_id, &request.name)
        .map_err(|e| translate_persistence_error("Program study", e))?;

    info!(actor = %actor.user_id, program_study_id, "Created program study");
    Ok(program_study_id)
}

/// Updates a program study, renaming its role alongside it.
///
/// # Errors
///
/// Returns an error if the caller is not an Admin or the program study or
/// department does not exist.
pub fn update_program_study(
    persistence: &mut SqlitePersistence,
    actor: &AuthenticatedUser,
    program_study_id: i64,
    request: &ProgramStudyPayload,
) -> Result<(), ApiError> {
    AuthorizationService::authorize_manage_units(actor)?;
    get_department(persistence, request.department_id)?;

    persistence
        .update_program_study(program_study_id, request.department_id, &request.name)
        .map_err(|e| translate_persistence_error("Program study", e))
}

/// Deletes a program study and its auto-provisioned role.
///
/// # Errors
///
/// Returns an error if the caller is not an Admin or the program study
/// does not exist.
pub fn delete_program_study(
    persistence: &mut SqlitePersistence,
    actor: &AuthenticatedUser,
    program_study_id: i64,
) -> Result<(), ApiError> {
    AuthorizationService::authorize_manage_units(actor)?;

    persistence
        .delete_program_study(program_study_id)
        .map_err(|e| translate_persistence_error("Program study", e))?;

    info!(actor = %actor.user_id, program_study_id, "Deleted program study");
    Ok(())
}

/// Retrieves a program study.
///
/// # Errors
///
/// Returns an error if the program study does not exist.
pub fn get_program_study(
    persistence: &mut SqlitePersistence,
    program_study_id: i64,
) -> Result<ProgramStudyData, ApiError> {
    persistence
        .get_program_study(program_study_id)
        .map_err(|e| translate_persistence_error("Program study", e))?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Program study"),
            message: format!("Program study {program_study_id} does not exist"),
        })
}

/// Retrieves all program studies.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_program_studies(
    persistence: &mut SqlitePersistence,
) -> Result<Vec<ProgramStudyData>, ApiError> {
    persistence
        .list_program_studies()
        .map_err(|e| translate_persistence_error("Program study", e))
}

/// Creates a period.
///
/// # Errors
///
/// Returns an error if the caller is not an Admin or the category or sort
/// order collides with an existing period.
pub fn create_period(
    persistence: &mut SqlitePersistence,
    actor: &AuthenticatedUser,
    request: &PeriodPayload,
) -> Result<i64, ApiError> {
    AuthorizationService::authorize_manage_units(actor)?;

    let period_id: i64 = persistence
        .create_period(&request.category, request.sort_order)
        .map_err(|e| translate_persistence_error("Period", e))?;

    info!(actor = %actor.user_id, period_id, "Created period");
    Ok(period_id)
}

/// Updates a period.
///
/// # Errors
///
/// Returns an error if the caller is not an Admin, the period does not
/// exist, or the new category or sort order collides.
pub fn update_period(
    persistence: &mut SqlitePersistence,
    actor: &AuthenticatedUser,
    period_id: i64,
    request: &PeriodPayload,
) -> Result<(), ApiError> {
    AuthorizationService::authorize_manage_units(actor)?;

    persistence
        .update_period(period_id, &request.category, request.sort_order)
        .map_err(|e| translate_persistence_error("Period", e))
}

/// Deletes a period.
///
/// # Errors
///
/// Returns an error if the caller is not an Admin or the period does not
/// exist.
pub fn delete_period(
    persistence: &mut SqlitePersistence,
    actor: &AuthenticatedUser,
    period_id: i64,
) -> Result<(), ApiError> {
    AuthorizationService::authorize_manage_units(actor)?;

    persistence
        .delete_period(period_id)
        .map_err(|e| translate_persistence_error("Period", e))
}

/// Retrieves a period.
///
/// # Errors
///
/// Returns an error if the period does not exist.
pub fn get_period(
    persistence: &mut SqlitePersistence,
    period_id: i64,
) -> Result<PeriodData, ApiError> {
    persistence
        .get_period(period_id)
        .map_err(|e| translate_persistence_error("Period", e))?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Period"),
            message: format!("Period {period_id} does not exist"),
        })
}

/// Retrieves all periods in sort order.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_periods(persistence: &mut SqlitePersistence) -> Result<Vec<PeriodData>, ApiError> {
    persistence
        .list_periods()
        .map_err(|e| translate_persistence_error("Period", e))
}
