// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Route handlers and router assembly.

pub mod accounts;
pub mod admin;
pub mod answers;
pub mod ml;
pub mod surveys;
pub mod units;
pub mod users;

use axum::Router;
use axum::routing::{get, post, put};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Response carrying the identifier of a newly created resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedResponse {
    /// The new resource's identifier.
    pub id: i64,
}

/// Response for write operations without a payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Success indicator.
    pub success: bool,
    /// Optional message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StatusResponse {
    /// A bare success response.
    pub const fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }
}

/// Builds the application router with all endpoints.
pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/accounts/register", post(accounts::handle_register))
        .route("/accounts/login", post(accounts::handle_login))
        .route("/accounts/refresh", post(accounts::handle_refresh))
        .route("/accounts/logout", post(accounts::handle_logout))
        .route(
            "/accounts/password/change",
            post(accounts::handle_change_password),
        )
        .route(
            "/accounts/password/reset-request",
            post(accounts::handle_reset_request),
        )
        .route(
            "/accounts/password/reset",
            post(accounts::handle_reset_password),
        )
        .route(
            "/api/surveys",
            get(surveys::handle_list_surveys).post(surveys::handle_create_survey),
        )
        .route(
            "/api/surveys/{survey_id}",
            get(surveys::handle_get_survey)
                .put(surveys::handle_update_survey)
                .delete(surveys::handle_delete_survey),
        )
        .route(
            "/api/surveys/{survey_id}/sections",
            get(surveys::handle_list_sections).post(surveys::handle_create_section),
        )
        .route(
            "/api/surveys/{survey_id}/sections/{section_id}",
            put(surveys::handle_update_section).delete(surveys::handle_delete_section),
        )
        .route(
            "/api/surveys/{survey_id}/sections/{section_id}/questions",
            get(surveys::handle_list_questions).post(surveys::handle_create_question),
        )
        .route(
            "/api/surveys/{survey_id}/sections/{section_id}/questions/{question_id}",
            get(surveys::handle_get_question)
                .put(surveys::handle_update_question)
                .delete(surveys::handle_delete_question),
        )
        .route(
            "/api/surveys/{survey_id}/program-studies/{program_study_id}/questions",
            get(surveys::handle_list_program_questions)
                .post(surveys::handle_create_program_question),
        )
        .route(
            "/api/surveys/{survey_id}/program-studies/{program_study_id}/questions/{question_id}",
            put(surveys::handle_update_program_question)
                .delete(surveys::handle_delete_program_question),
        )
        .route(
            "/api/surveys/{survey_id}/answers",
            get(answers::handle_list_answers).post(answers::handle_submit_answer),
        )
        .route(
            "/api/surveys/{survey_id}/answers/bulk",
            post(answers::handle_submit_answers_bulk),
        )
        .route(
            "/api/surveys/{survey_id}/answers/{answer_id}",
            get(answers::handle_get_answer)
                .put(answers::handle_update_answer)
                .delete(answers::handle_delete_answer),
        )
        .route(
            "/api/surveys/{survey_id}/questions/{question_id}/answers",
            get(answers::handle_list_answers_by_question),
        )
        .route(
            "/api/surveys/{survey_id}/program-studies/{program_study_id}/questions/{question_id}/answers",
            get(answers::handle_list_answers_by_program_question),
        )
        .route(
            "/api/supervisor-answers",
            post(answers::handle_supervisor_answers),
        )
        .route(
            "/api/faculties",
            get(units::handle_list_faculties).post(units::handle_create_faculty),
        )
        .route(
            "/api/faculties/{faculty_id}",
            get(units::handle_get_faculty)
                .put(units::handle_update_faculty)
                .delete(units::handle_delete_faculty),
        )
        .route(
            "/api/departments",
            get(units::handle_list_departments).post(units::handle_create_department),
        )
        .route(
            "/api/departments/{department_id}",
            get(units::handle_get_department)
                .put(units::handle_update_department)
                .delete(units::handle_delete_department),
        )
        .route(
            "/api/program-studies",
            get(units::handle_list_program_studies).post(units::handle_create_program_study),
        )
        .route(
            "/api/program-studies/{program_study_id}",
            get(units::handle_get_program_study)
                .put(units::handle_update_program_study)
                .delete(units::handle_delete_program_study),
        )
        .route(
            "/api/periods",
            get(units::handle_list_periods).post(units::handle_create_period),
        )
        .route(
            "/api/periods/{period_id}",
            get(units::handle_get_period)
                .put(units::handle_update_period)
                .delete(units::handle_delete_period),
        )
        .route(
            "/api/roles",
            get(users::handle_list_roles).post(users::handle_create_role),
        )
        .route(
            "/api/roles/{role_id}",
            put(users::handle_update_role).delete(users::handle_delete_role),
        )
        .route(
            "/api/users",
            get(users::handle_list_users).post(users::handle_create_user),
        )
        .route(
            "/api/users/{user_id}",
            get(users::handle_get_user)
                .put(users::handle_update_user)
                .delete(users::handle_delete_user),
        )
        .route(
            "/api/config",
            get(admin::handle_list_config).post(admin::handle_create_config),
        )
        .route(
            "/api/config/{config_id}",
            get(admin::handle_get_config)
                .put(admin::handle_update_config)
                .delete(admin::handle_delete_config),
        )
        .route("/api/mail/remind-all", post(admin::handle_remind_all))
        .route(
            "/api/mail/remind-program-study",
            post(admin::handle_remind_program_study),
        )
        .route("/api/mail/remind-users", post(admin::handle_remind_users))
        .route("/api/ml/classification", post(ml::handle_classification))
        .route("/api/ml/clustering", post(ml::handle_clustering))
        .route("/api/ml/forecast", post(ml::handle_forecast))
        .with_state(app_state)
}
