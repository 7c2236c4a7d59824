// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The closed role taxonomy.
///
/// Role kinds drive every authorization decision. A program-study-scoped
/// role carries its scope structurally instead of encoding it in the role
/// name, so ownership checks compare identifiers rather than string
/// prefixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoleKind {
    /// Full administrative authority: organizational units, users, roles,
    /// system configuration, and everything a Tracer can do.
    Admin,
    /// Survey authoring authority: surveys, sections, questions, branches,
    /// program questions, and reminder sending.
    Tracer,
    /// Graduate respondent: submits and reads their own answers.
    Alumni,
    /// Unit leadership: read-only access to aggregate survey data.
    Leadership,
    /// A role bound to one specific program study. Authorized only within
    /// that scope (overlay questions, scoped answer listing, scoped
    /// reminders).
    ProgramScoped {
        /// The program study this role is bound to.
        program_study_id: i64,
    },
}

impl RoleKind {
    /// Reconstructs a role kind from its stored name and optional scope.
    ///
    /// A non-null scope always yields `ProgramScoped`, regardless of the
    /// display name chosen for the role.
    ///
    /// # Errors
    ///
    /// Returns an error if the role is unscoped and its name is not one of
    /// the global role names.
    pub fn from_parts(name: &str, program_study_id: Option<i64>) -> Result<Self, DomainError> {
        if let Some(program_study_id) = program_study_id {
            return Ok(Self::ProgramScoped { program_study_id });
        }
        match name {
            "Admin" => Ok(Self::Admin),
            "Tracer" => Ok(Self::Tracer),
            "Alumni" => Ok(Self::Alumni),
            "Leadership" => Ok(Self::Leadership),
            _ => Err(DomainError::InvalidRole(name.to_string())),
        }
    }

    /// Returns the kind name used in error messages and audit logs.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Tracer => "Tracer",
            Self::Alumni => "Alumni",
            Self::Leadership => "Leadership",
            Self::ProgramScoped { .. } => "Program Study Team",
        }
    }

    /// Returns the bound program study for program-scoped roles.
    #[must_use]
    pub const fn program_study_id(&self) -> Option<i64> {
        match self {
            Self::ProgramScoped { program_study_id } => Some(*program_study_id),
            _ => None,
        }
    }
}

impl std::fmt::Display for RoleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind_name())
    }
}

/// The survey kinds.
///
/// Exit, lv1, and lv2 are alumni-facing; skp is the supervisor-facing kind
/// answered through a one-time token rather than an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SurveyKind {
    /// Exit survey, answered at graduation.
    Exit,
    /// Level-1 follow-up survey.
    Lv1,
    /// Level-2 follow-up survey.
    Lv2,
    /// Supervisor survey, answered by a third party via token.
    Skp,
}

impl SurveyKind {
    /// Converts this kind to its stored string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Exit => "exit",
            Self::Lv1 => "lv1",
            Self::Lv2 => "lv2",
            Self::Skp => "skp",
        }
    }
}

impl FromStr for SurveyKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exit" => Ok(Self::Exit),
            "lv1" => Ok(Self::Lv1),
            "lv2" => Ok(Self::Lv2),
            "skp" => Ok(Self::Skp),
            _ => Err(DomainError::InvalidSurveyKind(s.to_string())),
        }
    }
}

impl std::fmt::Display for SurveyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The alumni survey-progression marker.
///
/// Ordered none < exit < lv1 < lv2. Answering a survey advances the marker
/// forward; it never regresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SurveyProgress {
    /// No survey answered yet.
    #[default]
    None,
    /// The exit survey has been answered.
    Exit,
    /// The level-1 survey has been answered.
    Lv1,
    /// The level-2 survey has been answered.
    Lv2,
}

impl SurveyProgress {
    /// Converts this marker to its stored string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Exit => "exit",
            Self::Lv1 => "lv1",
            Self::Lv2 => "lv2",
        }
    }

    /// The position of this marker in the progression order.
    const fn rank(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Exit => 1,
            Self::Lv1 => 2,
            Self::Lv2 => 3,
        }
    }

    /// Returns the marker after answering a survey of the given kind.
    ///
    /// Skp surveys are supervisor-facing and never move the marker.
    #[must_use]
    pub const fn advanced_by(self, kind: SurveyKind) -> Self {
        let candidate: Self = match kind {
            SurveyKind::Exit => Self::Exit,
            SurveyKind::Lv1 => Self::Lv1,
            SurveyKind::Lv2 => Self::Lv2,
            SurveyKind::Skp => return self,
        };
        if candidate.rank() > self.rank() {
            candidate
        } else {
            self
        }
    }
}

impl FromStr for SurveyProgress {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "exit" => Ok(Self::Exit),
            "lv1" => Ok(Self::Lv1),
            "lv2" => Ok(Self::Lv2),
            _ => Err(DomainError::InvalidProgress(s.to_string())),
        }
    }
}

impl std::fmt::Display for SurveyProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The question kinds a survey may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestionKind {
    /// Free text.
    Text,
    /// A floating-point or integer value.
    Number,
    /// Single choice from a declared options list.
    Radio,
    /// Multiple choice from a declared options list.
    Checkbox,
    /// An integer in the closed range [1, 5].
    Scale,
    /// Single choice rendered as a dropdown; validated like radio.
    Dropdown,
}

impl QuestionKind {
    /// Converts this kind to its stored string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Radio => "radio",
            Self::Checkbox => "checkbox",
            Self::Scale => "scale",
            Self::Dropdown => "dropdown",
        }
    }
}

impl FromStr for QuestionKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "number" => Ok(Self::Number),
            "radio" => Ok(Self::Radio),
            "checkbox" => Ok(Self::Checkbox),
            "scale" => Ok(Self::Scale),
            "dropdown" => Ok(Self::Dropdown),
            _ => Err(DomainError::InvalidQuestionKind(s.to_string())),
        }
    }
}

impl std::fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The question an answer is bound to.
///
/// An answer targets exactly one of a section question or a program-study
/// overlay question. The tagged union makes "both set" and "neither set"
/// unrepresentable past the API boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnswerTarget {
    /// A question belonging to a survey section.
    Question(i64),
    /// A program-study overlay question.
    ProgramQuestion(i64),
}

impl AnswerTarget {
    /// Builds a target from the two optional identifiers of a request body.
    ///
    /// # Errors
    ///
    /// Returns an error if both identifiers are present or both are absent.
    pub const fn from_parts(
        question_id: Option<i64>,
        program_question_id: Option<i64>,
    ) -> Result<Self, DomainError> {
        match (question_id, program_question_id) {
            (Some(id), None) => Ok(Self::Question(id)),
            (None, Some(id)) => Ok(Self::ProgramQuestion(id)),
            (Some(_), Some(_)) => Err(DomainError::AmbiguousAnswerTarget),
            (None, None) => Err(DomainError::MissingAnswerTarget),
        }
    }

    /// The section-question identifier, if this target is one.
    #[must_use]
    pub const fn question_id(&self) -> Option<i64> {
        match self {
            Self::Question(id) => Some(*id),
            Self::ProgramQuestion(_) => None,
        }
    }

    /// The program-question identifier, if this target is one.
    #[must_use]
    pub const fn program_question_id(&self) -> Option<i64> {
        match self {
            Self::Question(_) => None,
            Self::ProgramQuestion(id) => Some(*id),
        }
    }
}
