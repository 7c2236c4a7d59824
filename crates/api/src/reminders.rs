// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reminder emails for unanswered required questions.
//!
//! A reminder run walks every survey that is active and inside its time
//! window, counts each candidate's answers to the survey's required
//! questions, and emails everyone with a shortfall. Mail failures are
//! logged and never surfaced; the report counts messages actually sent.

use time::OffsetDateTime;
use time::format_description::well_known::Iso8601;
use tracing::{info, warn};
use tracer_persistence::{SqlitePersistence, SurveyData, UserData};

use crate::auth::{AuthenticatedUser, AuthorizationService};
use crate::error::{ApiError, translate_persistence_error};
use crate::mail::{MailMessage, Mailer};
use crate::request_response::{ReminderReport, RemindUsersRequest};

/// Reminds every alumni with unanswered required questions.
///
/// # Errors
///
/// Returns an error if the caller is not a Tracer or an Admin.
pub fn remind_all(
    persistence: &mut SqlitePersistence,
    mailer: &dyn Mailer,
    actor: &AuthenticatedUser,
) -> Result<ReminderReport, ApiError> {
    AuthorizationService::authorize_remind_broadcast(actor)?;

    let candidates: Vec<UserData> = persistence
        .list_alumni()
        .map_err(|e| translate_persistence_error("User", e))?;

    run_reminders(persistence, mailer, &candidates)
}

/// Reminds the alumni of the caller's own program study.
///
/// # Errors
///
/// Returns an error unless the caller holds a program-scoped role.
pub fn remind_program_study(
    persistence: &mut SqlitePersistence,
    mailer: &dyn Mailer,
    actor: &AuthenticatedUser,
) -> Result<ReminderReport, ApiError> {
    let program_study_id: i64 = AuthorizationService::authorize_remind_program_study(actor)?;

    let candidates: Vec<UserData> = persistence
        .list_alumni_by_program_study(program_study_id)
        .map_err(|e| translate_persistence_error("User", e))?;

    run_reminders(persistence, mailer, &candidates)
}

/// Reminds an explicit list of users, ignoring non-alumni entries.
///
/// # Errors
///
/// Returns an error if the caller is not a Tracer or an Admin.
pub fn remind_users(
    persistence: &mut SqlitePersistence,
    mailer: &dyn Mailer,
    actor: &AuthenticatedUser,
    request: &RemindUsersRequest,
) -> Result<ReminderReport, ApiError> {
    AuthorizationService::authorize_remind_broadcast(actor)?;

    let candidates: Vec<UserData> = persistence
        .filter_alumni(&request.user_ids)
        .map_err(|e| translate_persistence_error("User", e))?;

    run_reminders(persistence, mailer, &candidates)
}

/// Walks the open surveys and mails every candidate with a shortfall.
fn run_reminders(
    persistence: &mut SqlitePersistence,
    mailer: &dyn Mailer,
    candidates: &[UserData],
) -> Result<ReminderReport, ApiError> {
    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let surveys: Vec<SurveyData> = persistence
        .list_active_surveys()
        .map_err(|e| translate_persistence_error("Survey", e))?
        .into_iter()
        .filter(|survey| is_in_window(survey, now))
        .collect();

    let mut reminders_sent: usize = 0;

    for survey in &surveys {
        let required: i64 = persistence
            .count_required_questions(survey.survey_id)
            .map_err(|e| translate_persistence_error("Question", e))?;
        if required == 0 {
            continue;
        }

        for candidate in candidates {
            let answered: i64 = persistence
                .count_required_answers(survey.survey_id, &candidate.user_id)
                .map_err(|e| translate_persistence_error("Answer", e))?;
            if answered >= required {
                continue;
            }

            let Some(email) = candidate.email.as_deref() else {
                warn!(
                    user_id = %candidate.user_id,
                    survey_id = survey.survey_id,
                    "Skipping reminder: user has no email address"
                );
                continue;
            };

            let message: MailMessage = MailMessage {
                to: email.to_string(),
                subject: format!("Reminder: {}", survey.title),
                body: format!(
                    "You have {} required questions left to answer in the \
                     survey \"{}\". Please log in and complete it.",
                    required - answered,
                    survey.title
                ),
            };

            match mailer.send(&message) {
                Ok(()) => reminders_sent += 1,
                Err(e) => {
                    warn!(
                        user_id = %candidate.user_id,
                        survey_id = survey.survey_id,
                        error = %e,
                        "Reminder delivery failed"
                    );
                }
            }
        }
    }

    info!(
        surveys = surveys.len(),
        sent = reminders_sent,
        "Reminder run finished"
    );

    Ok(ReminderReport {
        surveys_considered: surveys.len(),
        reminders_sent,
    })
}

/// Checks a survey's [start, end] window, treating missing or unparseable
/// bounds as unbounded.
fn is_in_window(survey: &SurveyData, now: OffsetDateTime) -> bool {
    if let Some(start) = parse_bound(survey, survey.start_at.as_deref()) {
        if now < start {
            return false;
        }
    }
    if let Some(end) = parse_bound(survey, survey.end_at.as_deref()) {
        if now > end {
            return false;
        }
    }
    true
}

fn parse_bound(survey: &SurveyData, raw: Option<&str>) -> Option<OffsetDateTime> {
    let raw: &str = raw?;
    match OffsetDateTime::parse(raw, &Iso8601::DEFAULT) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            warn!(
                survey_id = survey.survey_id,
                value = %raw,
                error = %e,
                "Unparseable survey window bound; treating as unbounded"
            );
            None
        }
    }
}
