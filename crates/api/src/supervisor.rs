// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The one-time-token supervisor workflow.
//!
//! After an alumni answers an lv1 survey, the system emails their
//! supervisor a single-use link to the current skp survey. The supervisor
//! submits answers under that token without holding an account. Issuance
//! is fire-and-forget: the alumni's own submission already succeeded, so
//! every failure along the notification chain is logged and swallowed.

use serde_json::Value;
use std::str::FromStr;
use tracing::{info, warn};
use tracer_domain::{OptionsList, QuestionKind, validate_answer};
use tracer_persistence::{
    AnswerData, QuestionData, SqlitePersistence, SupervisorTokenData, SurveyData,
};
use uuid::Uuid;

use crate::answers::require_question_in_survey;
use crate::config::SUPERVISOR_EMAIL_QUESTION_CODE;
use crate::error::{ApiError, translate_domain_error, translate_persistence_error};
use crate::mail::{MailMessage, Mailer};
use crate::request_response::{SupervisorSubmissionRequest, SupervisorSubmissionResponse};

/// Issues a supervisor token for an alumni and emails the submission link.
///
/// Never fails the caller: every error in the chain is logged at `warn`
/// and swallowed.
pub fn notify_supervisor(
    persistence: &mut SqlitePersistence,
    mailer: &dyn Mailer,
    alumni_user_id: &str,
    lv1_survey_id: i64,
) {
    match try_notify(persistence, mailer, alumni_user_id, lv1_survey_id) {
        Ok(()) => {
            info!(user_id = %alumni_user_id, "Supervisor notification sent");
        }
        Err(reason) => {
            warn!(
                user_id = %alumni_user_id,
                survey_id = lv1_survey_id,
                reason = %reason,
                "Supervisor notification skipped"
            );
        }
    }
}

/// Redeems a supervisor token and stores the supervisor's answers.
///
/// The payload is validated against the token's skp survey before the
/// token is spent, so a malformed submission does not burn the link. The
/// redemption itself is a single conditional update; a lost race yields a
/// validation error rather than a duplicate submission.
///
/// # Errors
///
/// Returns an error if the token is unknown or already used, a question is
/// not part of the skp survey, or a value fails validation.
pub fn submit_supervisor_answers(
    persistence: &mut SqlitePersistence,
    request: &SupervisorSubmissionRequest,
) -> Result<SupervisorSubmissionResponse, ApiError> {
    let pending: SupervisorTokenData = persistence
        .get_supervisor_token(&request.token)
        .map_err(|e| translate_persistence_error("Supervisor token", e))?
        .ok_or_else(|| ApiError::DomainRuleViolation {
            rule: String::from("token_valid"),
            message: String::from("The supervisor token does not exist"),
        })?;

    let mut validated: Vec<(i64, String)> = Vec::with_capacity(request.answers.len());
    for answer in &request.answers {
        let question: QuestionData =
            require_question_in_survey(persistence, pending.survey_id, answer.question_id)?;
        let stored: String = validate_supervisor_value(&question, &answer.value)?;
        validated.push((question.question_id, stored));
    }

    let token: SupervisorTokenData = persistence
        .redeem_supervisor_token(&request.token)
        .map_err(|e| translate_persistence_error("Supervisor token", e))?;

    for (question_id, stored) in &validated {
        persistence
            .upsert_supervisor_answer(token.token_id, *question_id, stored)
            .map_err(|e| translate_persistence_error("Supervisor answer", e))?;
    }

    info!(
        token_id = token.token_id,
        survey_id = token.survey_id,
        stored = validated.len(),
        "Supervisor submission recorded"
    );

    Ok(SupervisorSubmissionResponse {
        survey_id: token.survey_id,
        stored: validated.len(),
    })
}

/// Runs the notification chain, reporting the first failure as a reason
/// string.
fn try_notify(
    persistence: &mut SqlitePersistence,
    mailer: &dyn Mailer,
    alumni_user_id: &str,
    lv1_survey_id: i64,
) -> Result<(), String> {
    let code: String = persistence
        .get_config_value(SUPERVISOR_EMAIL_QUESTION_CODE)
        .map_err(|e| format!("config lookup failed: {e}"))?
        .ok_or_else(|| format!("config key '{SUPERVISOR_EMAIL_QUESTION_CODE}' is not set"))?;

    let question: QuestionData = persistence
        .find_question_by_code(lv1_survey_id, &code)
        .map_err(|e| format!("question lookup failed: {e}"))?
        .ok_or_else(|| format!("survey has no question with code '{code}'"))?;

    let answer: AnswerData = persistence
        .get_user_answer_to_question(alumni_user_id, question.question_id)
        .map_err(|e| format!("answer lookup failed: {e}"))?
        .ok_or_else(|| String::from("alumni did not answer the supervisor email question"))?;
    let supervisor_email: String = answer.value;

    let skp_survey: SurveyData = persistence
        .find_supervisor_survey()
        .map_err(|e| format!("skp survey lookup failed: {e}"))?
        .ok_or_else(|| String::from("no skp survey exists"))?;

    let token: String = Uuid::new_v4().to_string();
    persistence
        .create_supervisor_token(&token, alumni_user_id, skp_survey.survey_id)
        .map_err(|e| format!("token creation failed: {e}"))?;

    let message: MailMessage = MailMessage {
        to: supervisor_email,
        subject: format!("Assessment request: {}", skp_survey.title),
        body: format!(
            "A graduate you supervised has asked you to fill in a short \
             assessment survey. Submit your answers with this one-time \
             token: {token}"
        ),
    };
    mailer
        .send(&message)
        .map_err(|e| format!("mail delivery failed: {e}"))
}

/// Validates one supervisor value against its question.
fn validate_supervisor_value(question: &QuestionData, value: &Value) -> Result<String, ApiError> {
    let kind: QuestionKind =
        QuestionKind::from_str(&question.question_kind).map_err(translate_domain_error)?;

    let options: Option<OptionsList> = question
        .options
        .as_deref()
        .map(|raw| {
            OptionsList::parse(raw).map_err(|e| ApiError::Internal {
                message: format!("Stored options are not canonical: {e}"),
            })
        })
        .transpose()?;

    validate_answer(kind, options.as_ref(), value).map_err(translate_domain_error)
}
