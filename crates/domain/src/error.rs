// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for domain rule validation.

/// Errors raised by domain rule validation.
///
/// These errors never leak to the HTTP surface directly; the API layer
/// translates them into its own error contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The role name is not part of the closed role taxonomy.
    InvalidRole(String),
    /// The survey kind string is not one of exit/lv1/lv2/skp.
    InvalidSurveyKind(String),
    /// The question kind string is not recognized.
    InvalidQuestionKind(String),
    /// The survey progression marker string is not recognized.
    InvalidProgress(String),
    /// The options list is not a valid JSON array of non-empty strings.
    InvalidOptions {
        /// A human-readable description of the problem.
        message: String,
    },
    /// The submitted answer value does not match the question kind.
    AnswerTypeMismatch {
        /// The question kind the answer was validated against.
        kind: &'static str,
        /// A human-readable description of the mismatch.
        message: String,
    },
    /// The submitted value is not among the question's declared options.
    ValueNotInOptions {
        /// The offending value.
        value: String,
    },
    /// A scale answer is outside the closed range [1, 5].
    ScaleOutOfRange {
        /// The offending value.
        value: i64,
    },
    /// An answer referenced both a question and a program question.
    AmbiguousAnswerTarget,
    /// An answer referenced neither a question nor a program question.
    MissingAnswerTarget,
    /// A branch was declared on a question kind other than radio.
    BranchOnNonRadio {
        /// The question kind the branch was declared on.
        kind: &'static str,
    },
    /// A branch trigger value is not among the question's declared options.
    BranchValueNotInOptions {
        /// The offending trigger value.
        value: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRole(name) => write!(f, "Invalid role name: '{name}'"),
            Self::InvalidSurveyKind(kind) => {
                write!(
                    f,
                    "Invalid survey kind: '{kind}'. Must be one of exit, lv1, lv2, skp"
                )
            }
            Self::InvalidQuestionKind(kind) => {
                write!(
                    f,
                    "Invalid question kind: '{kind}'. Must be one of text, number, radio, checkbox, scale, dropdown"
                )
            }
            Self::InvalidProgress(value) => {
                write!(
                    f,
                    "Invalid survey progression marker: '{value}'. Must be one of none, exit, lv1, lv2"
                )
            }
            Self::InvalidOptions { message } => write!(f, "Invalid options list: {message}"),
            Self::AnswerTypeMismatch { kind, message } => {
                write!(f, "Invalid answer for {kind} question: {message}")
            }
            Self::ValueNotInOptions { value } => {
                write!(f, "Value '{value}' is not one of the declared options")
            }
            Self::ScaleOutOfRange { value } => {
                write!(f, "Scale answer {value} is outside the range 1-5")
            }
            Self::AmbiguousAnswerTarget => {
                write!(
                    f,
                    "An answer must reference exactly one of question or program question, not both"
                )
            }
            Self::MissingAnswerTarget => {
                write!(
                    f,
                    "An answer must reference a question or a program question"
                )
            }
            Self::BranchOnNonRadio { kind } => {
                write!(f, "Branches may only be declared on radio questions, not {kind}")
            }
            Self::BranchValueNotInOptions { value } => {
                write!(
                    f,
                    "Branch trigger value '{value}' is not one of the question's options"
                )
            }
        }
    }
}

impl std::error::Error for DomainError {}
