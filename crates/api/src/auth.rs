// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication and authorization types and services.

use time::format_description::well_known::Iso8601;
use time::{Duration, OffsetDateTime};
use tracer_domain::RoleKind;
use tracer_persistence::{SessionData, SqlitePersistence, UserData};
use uuid::Uuid;

use crate::error::AuthError;

/// An authenticated user with their resolved role.
///
/// A user with no role has zero privileges: every authorization check
/// denies explicitly rather than panicking or falling through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// The student identification number or staff identifier.
    pub user_id: String,
    /// The user's full name.
    pub full_name: String,
    /// The resolved role, if the user has one.
    pub role: Option<RoleKind>,
}

impl AuthenticatedUser {
    /// Creates a new authenticated user.
    #[must_use]
    pub const fn new(user_id: String, full_name: String, role: Option<RoleKind>) -> Self {
        Self {
            user_id,
            full_name,
            role,
        }
    }
}

/// The answer rows visible to a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerScope {
    /// Every answer of the survey.
    All,
    /// Answers from users affiliated with one program study.
    ProgramStudy(i64),
    /// Only the caller's own answers.
    SelfOnly,
}

/// Authorization service for enforcing role-based access control.
///
/// This service determines whether an authenticated user has permission
/// to perform a specific action based on their role.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Checks if a user may create, update, or delete surveys, sections,
    /// questions, and branches.
    ///
    /// # Errors
    ///
    /// Returns an error unless the user is a Tracer or an Admin.
    pub fn authorize_manage_surveys(user: &AuthenticatedUser) -> Result<(), AuthError> {
        match user.role {
            Some(RoleKind::Admin | RoleKind::Tracer) => Ok(()),
            _ => Err(AuthError::Unauthorized {
                action: String::from("manage_surveys"),
                required_role: String::from("Tracer or Admin"),
            }),
        }
    }

    /// Checks if a user may mutate organizational units and periods.
    ///
    /// # Errors
    ///
    /// Returns an error unless the user is an Admin.
    pub fn authorize_manage_units(user: &AuthenticatedUser) -> Result<(), AuthError> {
        match user.role {
            Some(RoleKind::Admin) => Ok(()),
            _ => Err(AuthError::Unauthorized {
                action: String::from("manage_units"),
                required_role: String::from("Admin"),
            }),
        }
    }

    /// Checks if a user may administer users and roles.
    ///
    /// # Errors
    ///
    /// Returns an error unless the user is an Admin.
    pub fn authorize_manage_users(user: &AuthenticatedUser) -> Result<(), AuthError> {
        match user.role {
            Some(RoleKind::Admin) => Ok(()),
            _ => Err(AuthError::Unauthorized {
                action: String::from("manage_users"),
                required_role: String::from("Admin"),
            }),
        }
    }

    /// Checks if a user may mutate system configuration.
    ///
    /// # Errors
    ///
    /// Returns an error unless the user is an Admin.
    pub fn authorize_manage_config(user: &AuthenticatedUser) -> Result<(), AuthError> {
        match user.role {
            Some(RoleKind::Admin) => Ok(()),
            _ => Err(AuthError::Unauthorized {
                action: String::from("manage_config"),
                required_role: String::from("Admin"),
            }),
        }
    }

    /// Checks if a user may mutate the overlay questions of a program
    /// study.
    ///
    /// Admins and Tracers may touch any program study's overlay; a
    /// program-scoped role only its own.
    ///
    /// # Errors
    ///
    /// Returns an error if the user holds neither a global authoring role
    /// nor the program-scoped role bound to `program_study_id`.
    pub fn authorize_manage_program_questions(
        user: &AuthenticatedUser,
        program_study_id: i64,
    ) -> Result<(), AuthError> {
        match user.role {
            Some(RoleKind::Admin | RoleKind::Tracer) => Ok(()),
            Some(RoleKind::ProgramScoped {
                program_study_id: bound,
            }) if bound == program_study_id => Ok(()),
            _ => Err(AuthError::Unauthorized {
                action: String::from("manage_program_questions"),
                required_role: String::from("Tracer, Admin, or the program study's own team"),
            }),
        }
    }

    /// Checks if a user may submit answers.
    ///
    /// # Errors
    ///
    /// Returns an error unless the user is an Alumni.
    pub fn authorize_submit_answers(user: &AuthenticatedUser) -> Result<(), AuthError> {
        match user.role {
            Some(RoleKind::Alumni) => Ok(()),
            _ => Err(AuthError::Unauthorized {
                action: String::from("submit_answers"),
                required_role: String::from("Alumni"),
            }),
        }
    }

    /// Resolves the answer rows a user may read.
    ///
    /// Admins and Tracers see everything; a program-scoped role sees its
    /// program study's respondents; everyone else sees only their own rows.
    #[must_use]
    pub const fn answer_scope(user: &AuthenticatedUser) -> AnswerScope {
        match user.role {
            Some(RoleKind::Admin | RoleKind::Tracer) => AnswerScope::All,
            Some(RoleKind::ProgramScoped { program_study_id }) => {
                AnswerScope::ProgramStudy(program_study_id)
            }
            _ => AnswerScope::SelfOnly,
        }
    }

    /// Checks if a user may send reminders to all alumni or to an explicit
    /// user list.
    ///
    /// # Errors
    ///
    /// Returns an error unless the user is a Tracer or an Admin.
    pub fn authorize_remind_broadcast(user: &AuthenticatedUser) -> Result<(), AuthError> {
        match user.role {
            Some(RoleKind::Admin | RoleKind::Tracer) => Ok(()),
            _ => Err(AuthError::Unauthorized {
                action: String::from("remind_broadcast"),
                required_role: String::from("Tracer or Admin"),
            }),
        }
    }

    /// Checks if a user may send reminders scoped to a program study and
    /// returns the program study their role is bound to.
    ///
    /// # Errors
    ///
    /// Returns an error unless the user holds a program-scoped role.
    pub fn authorize_remind_program_study(user: &AuthenticatedUser) -> Result<i64, AuthError> {
        match user.role {
            Some(RoleKind::ProgramScoped { program_study_id }) => Ok(program_study_id),
            _ => Err(AuthError::Unauthorized {
                action: String::from("remind_program_study"),
                required_role: String::from("a program study team role"),
            }),
        }
    }
}

/// Authentication service for login, session validation, and logout.
pub struct AuthenticationService;

impl AuthenticationService {
    /// How long a fresh or refreshed session stays valid.
    pub const DEFAULT_SESSION_EXPIRATION: Duration = Duration::days(30);

    /// Authenticates a user and creates a session.
    ///
    /// Expired sessions are swept opportunistically on every login.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `user_id` - The student identification number
    /// * `password` - The plain-text password
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are invalid or session creation
    /// fails.
    pub fn login(
        persistence: &mut SqlitePersistence,
        user_id: &str,
        password: &str,
    ) -> Result<(String, AuthenticatedUser), AuthError> {
        let user: UserData = persistence
            .get_user_by_id(user_id)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to look up user: {e}"),
            })?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Invalid user ID or password"),
            })?;

        let password_matches: bool = bcrypt::verify(password, &user.password_hash).map_err(
            |e| AuthError::AuthenticationFailed {
                reason: format!("Password verification failed: {e}"),
            },
        )?;
        if !password_matches {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Invalid user ID or password"),
            });
        }

        let role: Option<RoleKind> = Self::resolve_role(persistence, &user)?;

        if let Err(e) = persistence.delete_expired_sessions() {
            tracing::warn!(error = %e, "Failed to sweep expired sessions");
        }

        let session_token: String = Self::generate_session_token();
        let expires_at: String =
            Self::format_timestamp(OffsetDateTime::now_utc() + Self::DEFAULT_SESSION_EXPIRATION)?;

        persistence
            .create_session(&session_token, &user.user_id, &expires_at)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to create session: {e}"),
            })?;

        let authenticated: AuthenticatedUser =
            AuthenticatedUser::new(user.user_id, user.full_name, role);

        Ok((session_token, authenticated))
    }

    /// Validates a session token and returns the authenticated user.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is unknown, the session has expired,
    /// or the session's user no longer exists.
    pub fn validate_session(
        persistence: &mut SqlitePersistence,
        session_token: &str,
    ) -> Result<AuthenticatedUser, AuthError> {
        let session: SessionData = persistence
            .get_session_by_token(session_token)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to look up session: {e}"),
            })?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Invalid session token"),
            })?;

        let expires_at: OffsetDateTime =
            OffsetDateTime::parse(&session.expires_at, &Iso8601::DEFAULT).map_err(|e| {
                AuthError::AuthenticationFailed {
                    reason: format!("Failed to parse session expiration: {e}"),
                }
            })?;

        if expires_at < OffsetDateTime::now_utc() {
            if let Err(e) = persistence.delete_session(session_token) {
                tracing::warn!(error = %e, "Failed to delete expired session");
            }
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Session has expired"),
            });
        }

        persistence
            .update_session_activity(session.session_id)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to record session activity: {e}"),
            })?;

        let user: UserData = persistence
            .get_user_by_id(&session.user_id)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to look up user: {e}"),
            })?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Session user no longer exists"),
            })?;

        let role: Option<RoleKind> = Self::resolve_role(persistence, &user)?;

        Ok(AuthenticatedUser::new(user.user_id, user.full_name, role))
    }

    /// Extends a session's expiration and returns the new expiry.
    ///
    /// # Errors
    ///
    /// Returns an error if the session is invalid or the extension fails.
    pub fn refresh_session(
        persistence: &mut SqlitePersistence,
        session_token: &str,
    ) -> Result<String, AuthError> {
        Self::validate_session(persistence, session_token)?;

        let expires_at: String =
            Self::format_timestamp(OffsetDateTime::now_utc() + Self::DEFAULT_SESSION_EXPIRATION)?;

        persistence
            .extend_session(session_token, &expires_at)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to extend session: {e}"),
            })?;

        Ok(expires_at)
    }

    /// Deletes a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the deletion fails.
    pub fn logout(
        persistence: &mut SqlitePersistence,
        session_token: &str,
    ) -> Result<(), AuthError> {
        persistence
            .delete_session(session_token)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to delete session: {e}"),
            })
    }

    /// Resolves a user's stored role reference into a role kind.
    ///
    /// # Errors
    ///
    /// Returns an error if the role row cannot be loaded or names an
    /// unknown global role.
    pub fn resolve_role(
        persistence: &mut SqlitePersistence,
        user: &UserData,
    ) -> Result<Option<RoleKind>, AuthError> {
        let Some(role_id) = user.role_id else {
            return Ok(None);
        };

        let role = persistence
            .get_role(role_id)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to look up role: {e}"),
            })?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: format!("Role {role_id} no longer exists"),
            })?;

        let kind: RoleKind = RoleKind::from_parts(&role.name, role.program_study_id).map_err(
            |e| AuthError::AuthenticationFailed {
                reason: format!("Stored role is invalid: {e}"),
            },
        )?;

        Ok(Some(kind))
    }

    /// Generates a new opaque session token.
    fn generate_session_token() -> String {
        Uuid::new_v4().to_string()
    }

    /// Formats a timestamp as an ISO 8601 string for storage.
    fn format_timestamp(value: OffsetDateTime) -> Result<String, AuthError> {
        value
            .format(&Iso8601::DEFAULT)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to format timestamp: {e}"),
            })
    }
}
