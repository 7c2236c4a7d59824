// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use crate::password_policy::PasswordPolicyError;
use tracer_domain::DomainError;
use tracer_persistence::PersistenceError;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from domain and persistence errors and represent the
/// API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed - the actor does not have permission.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
    /// A domain rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
    /// Password policy violation.
    PasswordPolicyViolation {
        /// A human-readable description of the policy violation.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
            Self::PasswordPolicyViolation { message } => {
                write!(f, "Password policy violation: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized {
                action,
                required_role,
            } => Self::Unauthorized {
                action,
                required_role,
            },
        }
    }
}

impl From<PasswordPolicyError> for ApiError {
    fn from(err: PasswordPolicyError) -> Self {
        Self::PasswordPolicyViolation {
            message: err.to_string(),
        }
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked
/// directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidRole(name) => ApiError::InvalidInput {
            field: String::from("role"),
            message: format!("'{name}' is not a recognized role name"),
        },
        DomainError::InvalidSurveyKind(kind) => ApiError::InvalidInput {
            field: String::from("survey_kind"),
            message: format!("'{kind}' is not one of exit, lv1, lv2, skp"),
        },
        DomainError::InvalidQuestionKind(kind) => ApiError::InvalidInput {
            field: String::from("question_kind"),
            message: format!(
                "'{kind}' is not one of text, number, radio, checkbox, scale, dropdown"
            ),
        },
        DomainError::InvalidProgress(value) => ApiError::InvalidInput {
            field: String::from("last_survey"),
            message: format!("'{value}' is not one of none, exit, lv1, lv2"),
        },
        DomainError::InvalidOptions { message } => ApiError::InvalidInput {
            field: String::from("options"),
            message,
        },
        DomainError::AnswerTypeMismatch { kind, message } => ApiError::InvalidInput {
            field: String::from("value"),
            message: format!("invalid answer for {kind} question: {message}"),
        },
        DomainError::ValueNotInOptions { value } => ApiError::DomainRuleViolation {
            rule: String::from("value_in_options"),
            message: format!("Value '{value}' is not one of the declared options"),
        },
        DomainError::ScaleOutOfRange { value } => ApiError::DomainRuleViolation {
            rule: String::from("scale_range"),
            message: format!("Scale answer {value} is outside the range 1-5"),
        },
        DomainError::AmbiguousAnswerTarget => ApiError::InvalidInput {
            field: String::from("question_id"),
            message: String::from(
                "An answer must reference exactly one of question or program question, not both",
            ),
        },
        DomainError::MissingAnswerTarget => ApiError::InvalidInput {
            field: String::from("question_id"),
            message: String::from("An answer must reference a question or a program question"),
        },
        DomainError::BranchOnNonRadio { kind } => ApiError::DomainRuleViolation {
            rule: String::from("branch_on_radio"),
            message: format!("Branches may only be declared on radio questions, not {kind}"),
        },
        DomainError::BranchValueNotInOptions { value } => ApiError::DomainRuleViolation {
            rule: String::from("branch_value_in_options"),
            message: format!(
                "Branch trigger value '{value}' is not one of the question's options"
            ),
        },
    }
}

/// Translates a persistence error into an API error.
///
/// `resource_type` names the resource the failed operation was about and is
/// used for the not-found and conflict messages.
#[must_use]
pub fn translate_persistence_error(resource_type: &str, err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::NotFound(message)
        | PersistenceError::UserNotFound(message)
        | PersistenceError::SessionNotFound(message) => ApiError::ResourceNotFound {
            resource_type: resource_type.to_string(),
            message,
        },
        PersistenceError::Conflict(message) => ApiError::DomainRuleViolation {
            rule: String::from("uniqueness"),
            message,
        },
        PersistenceError::TokenNotFound(message) => ApiError::DomainRuleViolation {
            rule: String::from("token_valid"),
            message,
        },
        PersistenceError::TokenAlreadyUsed(message) => ApiError::DomainRuleViolation {
            rule: String::from("token_single_use"),
            message,
        },
        other => ApiError::Internal {
            message: format!("Persistence failure: {other}"),
        },
    }
}
