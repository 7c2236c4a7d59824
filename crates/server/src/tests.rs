// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Router tests exercising the HTTP surface end to end against an
//! in-memory database.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tokio::sync::Mutex;
use tower::ServiceExt;
use tracer_api::LogMailer;
use tracer_domain::RoleKind;
use tracer_ml::ModelRegistry;
use tracer_persistence::{NewQuestion, NewSection, NewSurvey, NewUser, SqlitePersistence};

use crate::routes::build_router;
use crate::state::AppState;

const PASSWORD: &str = "Sunny-day-42";

fn scratch_models_dir(tag: &str) -> PathBuf {
    let dir: PathBuf =
        std::env::temp_dir().join(format!("tracer-server-{tag}-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn test_state(models_dir: PathBuf) -> AppState {
    let persistence: SqlitePersistence =
        SqlitePersistence::new_in_memory().expect("Failed to create in-memory persistence");
    AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        mailer: Arc::new(LogMailer),
        models: Arc::new(ModelRegistry::new(models_dir)),
    }
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Registers an alumni account over HTTP and returns a session token.
async fn register_and_login(app: &Router, user_id: &str) -> String {
    let register = json!({
        "user_id": user_id,
        "full_name": "Siti Rahma",
        "password": PASSWORD,
        "password_confirmation": PASSWORD,
        "email": format!("{user_id}@example.edu"),
    });
    let response = app
        .clone()
        .oneshot(json_request("POST", "/accounts/register", None, &register))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    login(app, user_id).await
}

async fn login(app: &Router, user_id: &str) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/accounts/login",
            None,
            &json!({ "user_id": user_id, "password": PASSWORD }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = body_json(response).await;
    body["session_token"].as_str().unwrap().to_string()
}

/// Seeds a user holding a global role directly and logs them in over HTTP.
async fn seed_staff(app: &Router, state: &AppState, user_id: &str, kind: RoleKind) -> String {
    let mut persistence = state.persistence.lock().await;
    let role_id: i64 = match persistence.get_role_by_name(kind.kind_name()).unwrap() {
        Some(role) => role.role_id,
        None => persistence.create_role(kind.kind_name(), None).unwrap(),
    };
    persistence
        .create_user(&NewUser {
            user_id: user_id.to_string(),
            full_name: format!("Staff {user_id}"),
            email: Some(format!("{user_id}@example.edu")),
            password: PASSWORD.to_string(),
            role_id: Some(role_id),
            program_study_id: None,
            address: None,
            phone_number: None,
        })
        .unwrap();
    drop(persistence);

    login(app, user_id).await
}

/// Seeds an active survey with one section and returns (survey, section).
async fn seed_survey(state: &AppState, kind: &str) -> (i64, i64) {
    let mut persistence = state.persistence.lock().await;
    let survey_id: i64 = persistence
        .create_survey(&NewSurvey {
            title: format!("{kind} survey"),
            description: None,
            survey_kind: kind.to_string(),
            is_active: true,
            period_id: None,
            created_by: None,
            start_at: None,
            end_at: None,
        })
        .unwrap();
    let section_id: i64 = persistence
        .create_section(
            survey_id,
            &NewSection {
                title: String::from("Section A"),
                description: None,
                sort_order: 0,
            },
        )
        .unwrap();
    drop(persistence);
    (survey_id, section_id)
}

async fn seed_question(state: &AppState, section_id: i64, kind: &str) -> i64 {
    let mut persistence = state.persistence.lock().await;
    let question_id: i64 = persistence
        .create_question(
            section_id,
            &NewQuestion {
                prompt: format!("A {kind} question"),
                question_kind: kind.to_string(),
                options: None,
                code: None,
                is_required: true,
                sort_order: 0,
            },
            &[],
        )
        .unwrap();
    drop(persistence);
    question_id
}

#[tokio::test]
async fn a_request_without_a_bearer_token_is_unauthorized() {
    let app: Router = build_router(test_state(scratch_models_dir("no-bearer")));

    let response = app
        .oneshot(get_request("/api/surveys", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn an_unknown_session_token_is_unauthorized() {
    let app: Router = build_router(test_state(scratch_models_dir("bad-token")));

    let response = app
        .oneshot(get_request("/api/surveys", Some("not-a-session")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn registration_and_login_round_trip_over_http() {
    let app: Router = build_router(test_state(scratch_models_dir("register")));

    let token: String = register_and_login(&app, "1901001").await;

    let response = app
        .oneshot(get_request("/api/surveys", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn a_duplicate_registration_is_unprocessable() {
    let app: Router = build_router(test_state(scratch_models_dir("duplicate")));
    register_and_login(&app, "1901002").await;

    let register = json!({
        "user_id": "1901002",
        "full_name": "Siti Rahma",
        "password": PASSWORD,
        "password_confirmation": PASSWORD,
        "email": null,
    });
    let response = app
        .oneshot(json_request("POST", "/accounts/register", None, &register))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn a_weak_password_is_a_bad_request() {
    let app: Router = build_router(test_state(scratch_models_dir("weak-password")));

    let register = json!({
        "user_id": "1901003",
        "full_name": "Siti Rahma",
        "password": "short",
        "password_confirmation": "short",
        "email": null,
    });
    let response = app
        .oneshot(json_request("POST", "/accounts/register", None, &register))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn logout_invalidates_the_session_over_http() {
    let app: Router = build_router(test_state(scratch_models_dir("logout")));
    let token: String = register_and_login(&app, "1901004").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/accounts/logout",
            Some(&token),
            &json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get_request("/api/surveys", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn a_password_reset_token_sets_a_new_password_over_http() {
    let state: AppState = test_state(scratch_models_dir("reset"));
    let app: Router = build_router(state.clone());
    register_and_login(&app, "1901016").await;

    let mut persistence = state.persistence.lock().await;
    persistence
        .create_password_reset("reset-http-1", "1901016", "9999-01-01T00:00:00Z")
        .unwrap();
    drop(persistence);

    let redeem = json!({
        "token": "reset-http-1",
        "new_password": "Rainy-day-43",
        "new_password_confirmation": "Rainy-day-43",
    });
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/accounts/password/reset",
            None,
            &redeem,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/accounts/login",
            None,
            &json!({ "user_id": "1901016", "password": "Rainy-day-43" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // The token is single use.
    let response = app
        .oneshot(json_request(
            "POST",
            "/accounts/password/reset",
            None,
            &redeem,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn a_reset_request_does_not_reveal_unknown_accounts() {
    let app: Router = build_router(test_state(scratch_models_dir("reset-request")));

    let response = app
        .oneshot(json_request(
            "POST",
            "/accounts/password/reset-request",
            None,
            &json!({ "user_id": "9999999" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn an_alumni_cannot_author_surveys_over_http() {
    let app: Router = build_router(test_state(scratch_models_dir("alumni-forbidden")));
    let token: String = register_and_login(&app, "1901005").await;

    let payload = json!({
        "title": "Exit survey",
        "description": null,
        "survey_kind": "exit",
        "is_active": true,
        "period_id": null,
        "start_at": null,
        "end_at": null,
    });
    let response = app
        .oneshot(json_request("POST", "/api/surveys", Some(&token), &payload))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn a_tracer_authors_a_survey_end_to_end() {
    let state: AppState = test_state(scratch_models_dir("authoring"));
    let app: Router = build_router(state.clone());
    let token: String = seed_staff(&app, &state, "staff-1", RoleKind::Tracer).await;

    let survey = json!({
        "title": "Exit survey",
        "description": "For fresh graduates",
        "survey_kind": "exit",
        "is_active": true,
        "period_id": null,
        "start_at": null,
        "end_at": null,
    });
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/surveys", Some(&token), &survey))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let survey_id: i64 = body_json(response).await["id"].as_i64().unwrap();

    let section = json!({ "title": "Employment", "description": null, "sort_order": 0 });
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/surveys/{survey_id}/sections"),
            Some(&token),
            &section,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let section_id: i64 = body_json(response).await["id"].as_i64().unwrap();

    let question = json!({
        "prompt": "Are you employed?",
        "question_kind": "radio",
        "options": ["Yes", "No"],
        "code": null,
        "is_required": true,
        "sort_order": 0,
        "branches": [],
    });
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/surveys/{survey_id}/sections/{section_id}/questions"),
            Some(&token),
            &question,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .oneshot(get_request(
            &format!("/api/surveys/{survey_id}/sections/{section_id}/questions"),
            Some(&token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let listing: Value = body_json(response).await;
    assert_eq!(listing.as_array().unwrap().len(), 1);
    assert_eq!(
        listing[0]["question"]["options"].as_str().unwrap(),
        r#"["Yes","No"]"#
    );
}

#[tokio::test]
async fn an_unknown_survey_kind_is_a_bad_request() {
    let state: AppState = test_state(scratch_models_dir("bad-kind"));
    let app: Router = build_router(state.clone());
    let token: String = seed_staff(&app, &state, "staff-2", RoleKind::Tracer).await;

    let survey = json!({
        "title": "Census",
        "description": null,
        "survey_kind": "census",
        "is_active": true,
        "period_id": null,
        "start_at": null,
        "end_at": null,
    });
    let response = app
        .oneshot(json_request("POST", "/api/surveys", Some(&token), &survey))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn a_missing_survey_is_not_found() {
    let app: Router = build_router(test_state(scratch_models_dir("missing-survey")));
    let token: String = register_and_login(&app, "1901006").await;

    let response = app
        .oneshot(get_request("/api/surveys/999", Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn an_alumni_submits_an_answer_and_reads_it_back() {
    let state: AppState = test_state(scratch_models_dir("submit"));
    let app: Router = build_router(state.clone());
    let token: String = register_and_login(&app, "1901007").await;
    let (survey_id, section_id) = seed_survey(&state, "exit").await;
    let question_id: i64 = seed_question(&state, section_id, "text").await;

    let submission = json!({
        "question_id": question_id,
        "program_question_id": null,
        "value": "Software engineer",
    });
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/surveys/{survey_id}/answers"),
            Some(&token),
            &submission,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let answer: Value = body_json(response).await;
    assert_eq!(answer["value"].as_str().unwrap(), "Software engineer");

    let response = app
        .oneshot(get_request(
            &format!("/api/surveys/{survey_id}/answers"),
            Some(&token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let listing: Value = body_json(response).await;
    assert_eq!(listing.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn overlay_question_answers_list_over_http() {
    let state: AppState = test_state(scratch_models_dir("overlay-answers"));
    let app: Router = build_router(state.clone());
    let (survey_id, _section_id) = seed_survey(&state, "exit").await;

    let mut persistence = state.persistence.lock().await;
    let faculty_id: i64 = persistence.create_faculty("Engineering").unwrap();
    let department_id: i64 = persistence
        .create_department(faculty_id, "Informatics")
        .unwrap();
    let program_study_id: i64 = persistence
        .create_program_study(department_id, "Software Engineering")
        .unwrap();
    let program_question_id: i64 = persistence
        .create_program_question(
            survey_id,
            program_study_id,
            &NewQuestion {
                prompt: String::from("Rate the lab facilities"),
                question_kind: String::from("scale"),
                options: None,
                code: None,
                is_required: false,
                sort_order: 0,
            },
        )
        .unwrap();
    let role_id: i64 = match persistence
        .get_role_by_name(RoleKind::Alumni.kind_name())
        .unwrap()
    {
        Some(role) => role.role_id,
        None => persistence
            .create_role(RoleKind::Alumni.kind_name(), None)
            .unwrap(),
    };
    persistence
        .create_user(&NewUser {
            user_id: String::from("1901017"),
            full_name: String::from("Alumni 1901017"),
            email: Some(String::from("1901017@example.edu")),
            password: PASSWORD.to_string(),
            role_id: Some(role_id),
            program_study_id: Some(program_study_id),
            address: None,
            phone_number: None,
        })
        .unwrap();
    drop(persistence);

    let token: String = login(&app, "1901017").await;

    let submission = json!({
        "question_id": null,
        "program_question_id": program_question_id,
        "value": 4,
    });
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/surveys/{survey_id}/answers"),
            Some(&token),
            &submission,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(get_request(
            &format!(
                "/api/surveys/{survey_id}/program-studies/{program_study_id}/questions/{program_question_id}/answers"
            ),
            Some(&token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let listing: Value = body_json(response).await;
    assert_eq!(listing.as_array().unwrap().len(), 1);
    assert_eq!(listing[0]["value"].as_i64().unwrap(), 4);

    // An overlay question outside the survey's overlay is not found.
    let response = app
        .oneshot(get_request(
            &format!(
                "/api/surveys/{survey_id}/program-studies/{program_study_id}/questions/999/answers"
            ),
            Some(&token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn bulk_submission_returns_multi_status_on_partial_failure() {
    let state: AppState = test_state(scratch_models_dir("bulk"));
    let app: Router = build_router(state.clone());
    let token: String = register_and_login(&app, "1901008").await;
    let (survey_id, section_id) = seed_survey(&state, "exit").await;
    let text_question: i64 = seed_question(&state, section_id, "text").await;
    let scale_question: i64 = seed_question(&state, section_id, "scale").await;

    let bulk = json!({
        "answers": [
            { "question_id": text_question, "program_question_id": null, "value": "Fine" },
            { "question_id": scale_question, "program_question_id": null, "value": 9 },
        ],
    });
    let response = app
        .oneshot(json_request(
            "POST",
            &format!("/api/surveys/{survey_id}/answers/bulk"),
            Some(&token),
            &bulk,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::MULTI_STATUS);
    let outcome: Value = body_json(response).await;
    assert_eq!(outcome["successes"].as_array().unwrap().len(), 1);
    assert_eq!(outcome["failures"].as_array().unwrap().len(), 1);
    assert_eq!(outcome["failures"][0]["index"].as_u64().unwrap(), 1);
}

#[tokio::test]
async fn supervisor_answers_need_no_bearer() {
    let state: AppState = test_state(scratch_models_dir("supervisor"));
    let app: Router = build_router(state.clone());
    register_and_login(&app, "1901009").await;
    let (survey_id, section_id) = seed_survey(&state, "skp").await;
    let question_id: i64 = seed_question(&state, section_id, "scale").await;

    let mut persistence = state.persistence.lock().await;
    persistence
        .create_supervisor_token("tok-http-1", "1901009", survey_id)
        .unwrap();
    drop(persistence);

    let submission = json!({
        "token": "tok-http-1",
        "answers": [{ "question_id": question_id, "value": 4 }],
    });
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/supervisor-answers",
            None,
            &submission,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = body_json(response).await;
    assert_eq!(body["survey_id"].as_i64().unwrap(), survey_id);
    assert_eq!(body["stored"].as_u64().unwrap(), 1);
}

#[tokio::test]
async fn a_used_supervisor_token_is_unprocessable() {
    let state: AppState = test_state(scratch_models_dir("token-reuse"));
    let app: Router = build_router(state.clone());
    register_and_login(&app, "1901010").await;
    let (survey_id, section_id) = seed_survey(&state, "skp").await;
    let question_id: i64 = seed_question(&state, section_id, "scale").await;

    let mut persistence = state.persistence.lock().await;
    persistence
        .create_supervisor_token("tok-http-2", "1901010", survey_id)
        .unwrap();
    drop(persistence);

    let submission = json!({
        "token": "tok-http-2",
        "answers": [{ "question_id": question_id, "value": 3 }],
    });
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/supervisor-answers",
            None,
            &submission,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/supervisor-answers",
            None,
            &submission,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn unit_administration_requires_the_admin_role() {
    let state: AppState = test_state(scratch_models_dir("units-admin"));
    let app: Router = build_router(state.clone());
    let admin_token: String = seed_staff(&app, &state, "admin-1", RoleKind::Admin).await;
    let alumni_token: String = register_and_login(&app, "1901011").await;

    let payload = json!({ "name": "Faculty of Engineering" });
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/faculties",
            Some(&alumni_token),
            &payload,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/faculties",
            Some(&admin_token),
            &payload,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert!(body_json(response).await["id"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn a_reminder_run_reports_its_outcome() {
    let state: AppState = test_state(scratch_models_dir("reminders"));
    let app: Router = build_router(state.clone());
    let token: String = seed_staff(&app, &state, "staff-3", RoleKind::Admin).await;
    register_and_login(&app, "1901012").await;
    let (_survey_id, section_id) = seed_survey(&state, "exit").await;
    seed_question(&state, section_id, "text").await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/mail/remind-all",
            Some(&token),
            &json!({}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let report: Value = body_json(response).await;
    assert_eq!(report["surveys_considered"].as_u64().unwrap(), 1);
    assert_eq!(report["reminders_sent"].as_u64().unwrap(), 1);
}

#[tokio::test]
async fn a_forecast_round_trips_and_validates_the_horizon() {
    let dir: PathBuf = scratch_models_dir("forecast");
    let artifact = json!({
        "coefficients": [1.0],
        "intercept": 0.0,
        "history": [120.0, 120.0, 120.0],
        "last_period": 2026,
    });
    std::fs::write(
        dir.join(ModelRegistry::FORECAST_FILE),
        serde_json::to_string(&artifact).unwrap(),
    )
    .unwrap();

    let state: AppState = test_state(dir);
    let app: Router = build_router(state.clone());
    let token: String = register_and_login(&app, "1901013").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/ml/forecast",
            Some(&token),
            &json!({ "horizon": 2 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let forecast: Value = body_json(response).await;
    assert_eq!(forecast["periods"], json!([2027, 2028]));
    assert_eq!(forecast["values"], json!([120.0, 120.0]));

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/ml/forecast",
            Some(&token),
            &json!({ "horizon": 0 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn the_classifier_labels_a_payload_over_http() {
    let dir: PathBuf = scratch_models_dir("classification");
    let artifact = json!({
        "features": ["salary_wait"],
        "labels": ["Low salary", "High salary"],
        "weights": [[-1.0], [1.0]],
        "intercepts": [0.0, 0.0],
    });
    std::fs::write(
        dir.join(ModelRegistry::CLASSIFIER_FILE),
        serde_json::to_string(&artifact).unwrap(),
    )
    .unwrap();

    let state: AppState = test_state(dir);
    let app: Router = build_router(state.clone());
    let token: String = register_and_login(&app, "1901014").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/ml/classification",
            Some(&token),
            &json!({ "features": { "salary_wait": 2.0 } }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let outcome: Value = body_json(response).await;
    assert_eq!(outcome["label"].as_str().unwrap(), "High salary");

    // A payload missing a declared feature is a client error.
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/ml/classification",
            Some(&token),
            &json!({ "features": {} }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn a_missing_model_artifact_is_an_internal_error() {
    let app: Router = build_router(test_state(scratch_models_dir("no-artifact")));
    let token: String = register_and_login(&app, "1901015").await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/ml/clustering",
            Some(&token),
            &json!({ "features": {} }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
