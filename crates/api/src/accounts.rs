// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Account operations: registration, login, session refresh, logout, and
//! password change and reset.

use time::format_description::well_known::Iso8601;
use time::{Duration, OffsetDateTime};
use tracing::{info, warn};
use tracer_domain::RoleKind;
use tracer_persistence::{NewUser, PasswordResetData, SqlitePersistence, UserData};
use uuid::Uuid;

use crate::auth::{AuthenticatedUser, AuthenticationService};
use crate::error::{ApiError, translate_persistence_error};
use crate::mail::{MailMessage, Mailer};
use crate::password_policy::PasswordPolicy;
use crate::request_response::{
    ChangePasswordRequest, LoginRequest, LoginResponse, PasswordResetRequest, RefreshResponse,
    RegisterRequest, ResetPasswordRequest,
};

/// How long a password reset link stays valid.
const RESET_TOKEN_EXPIRATION: Duration = Duration::hours(2);

/// Registers a new alumni account.
///
/// Registration always assigns the global Alumni role, provisioning the
/// role row on first use.
///
/// # Errors
///
/// Returns an error if a field is empty, the password violates policy, or
/// the user ID is already taken.
pub fn register(
    persistence: &mut SqlitePersistence,
    request: &RegisterRequest,
) -> Result<(), ApiError> {
    if request.user_id.trim().is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("user_id"),
            message: String::from("User ID must not be empty"),
        });
    }
    if request.full_name.trim().is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("full_name"),
            message: String::from("Full name must not be empty"),
        });
    }

    PasswordPolicy::default().validate(
        &request.password,
        &request.password_confirmation,
        &request.user_id,
        &request.full_name,
    )?;

    let alumni_role_id: i64 = resolve_alumni_role(persistence)?;

    let new_user: NewUser = NewUser {
        user_id: request.user_id.clone(),
        full_name: request.full_name.clone(),
        email: request.email.clone(),
        password: request.password.clone(),
        role_id: Some(alumni_role_id),
        program_study_id: None,
        address: None,
        phone_number: None,
    };

    persistence
        .create_user(&new_user)
        .map_err(|e| translate_persistence_error("User", e))?;

    info!(user_id = %request.user_id, "Registered alumni account");
    Ok(())
}

/// Authenticates a user and issues a session token.
///
/// # Errors
///
/// Returns an error if the credentials are invalid.
pub fn login(
    persistence: &mut SqlitePersistence,
    request: &LoginRequest,
) -> Result<LoginResponse, ApiError> {
    let (session_token, user) =
        AuthenticationService::login(persistence, &request.user_id, &request.password)?;

    info!(user_id = %user.user_id, "User logged in");

    Ok(LoginResponse {
        session_token,
        user_id: user.user_id,
        full_name: user.full_name,
        role: user.role.map(|r| r.kind_name().to_string()),
    })
}

/// Extends the current session's expiration.
///
/// # Errors
///
/// Returns an error if the session is invalid or expired.
pub fn refresh(
    persistence: &mut SqlitePersistence,
    session_token: &str,
) -> Result<RefreshResponse, ApiError> {
    let expires_at: String = AuthenticationService::refresh_session(persistence, session_token)?;
    Ok(RefreshResponse { expires_at })
}

/// Deletes the current session.
///
/// # Errors
///
/// Returns an error if the deletion fails.
pub fn logout(persistence: &mut SqlitePersistence, session_token: &str) -> Result<(), ApiError> {
    AuthenticationService::logout(persistence, session_token)?;
    Ok(())
}

/// Changes the caller's own password.
///
/// # Errors
///
/// Returns an error if the old password does not match or the new password
/// violates policy.
pub fn change_password(
    persistence: &mut SqlitePersistence,
    user: &AuthenticatedUser,
    request: &ChangePasswordRequest,
) -> Result<(), ApiError> {
    let stored: UserData = persistence
        .get_user_by_id(&user.user_id)
        .map_err(|e| translate_persistence_error("User", e))?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("User"),
            message: format!("User '{}' does not exist", user.user_id),
        })?;

    let old_matches: bool =
        bcrypt::verify(&request.old_password, &stored.password_hash).map_err(|e| {
            ApiError::Internal {
                message: format!("Password verification failed: {e}"),
            }
        })?;
    if !old_matches {
        return Err(ApiError::AuthenticationFailed {
            reason: String::from("Old password does not match"),
        });
    }

    PasswordPolicy::default().validate(
        &request.new_password,
        &request.new_password_confirmation,
        &stored.user_id,
        &stored.full_name,
    )?;

    persistence
        .update_password(&user.user_id, &request.new_password)
        .map_err(|e| translate_persistence_error("User", e))?;

    info!(user_id = %user.user_id, "Password changed");
    Ok(())
}

/// Issues a password reset token and emails it to the account's address.
///
/// The response never reveals whether the account exists: an unknown user,
/// a missing email address, and a mail failure are all logged at `warn`
/// and swallowed.
///
/// # Errors
///
/// Returns an error only if the user ID field is empty.
pub fn request_password_reset(
    persistence: &mut SqlitePersistence,
    mailer: &dyn Mailer,
    request: &PasswordResetRequest,
) -> Result<(), ApiError> {
    if request.user_id.trim().is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("user_id"),
            message: String::from("User ID must not be empty"),
        });
    }

    match try_issue_reset(persistence, mailer, &request.user_id) {
        Ok(()) => {
            info!(user_id = %request.user_id, "Password reset email sent");
        }
        Err(reason) => {
            warn!(
                user_id = %request.user_id,
                reason = %reason,
                "Password reset request skipped"
            );
        }
    }
    Ok(())
}

/// Redeems a reset token and sets the account's new password.
///
/// The new password is validated before the token is spent, so a rejected
/// password does not burn the link.
///
/// # Errors
///
/// Returns an error if the token is unknown, expired, or already used, or
/// if the new password violates policy.
pub fn reset_password(
    persistence: &mut SqlitePersistence,
    request: &ResetPasswordRequest,
) -> Result<(), ApiError> {
    let pending: PasswordResetData = persistence
        .get_password_reset(&request.token)
        .map_err(|e| translate_persistence_error("Password reset", e))?
        .ok_or_else(|| ApiError::DomainRuleViolation {
            rule: String::from("token_valid"),
            message: String::from("The reset token does not exist"),
        })?;

    let expires_at: OffsetDateTime = OffsetDateTime::parse(&pending.expires_at, &Iso8601::DEFAULT)
        .map_err(|e| ApiError::Internal {
            message: format!("Stored expiration is invalid: {e}"),
        })?;
    if expires_at < OffsetDateTime::now_utc() {
        return Err(ApiError::DomainRuleViolation {
            rule: String::from("token_valid"),
            message: String::from("The reset token has expired"),
        });
    }

    let user: UserData = persistence
        .get_user_by_id(&pending.user_id)
        .map_err(|e| translate_persistence_error("User", e))?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("User"),
            message: format!("User '{}' does not exist", pending.user_id),
        })?;

    PasswordPolicy::default().validate(
        &request.new_password,
        &request.new_password_confirmation,
        &user.user_id,
        &user.full_name,
    )?;

    let redeemed: PasswordResetData = persistence
        .redeem_password_reset(&request.token)
        .map_err(|e| translate_persistence_error("Password reset", e))?;

    persistence
        .update_password(&redeemed.user_id, &request.new_password)
        .map_err(|e| translate_persistence_error("User", e))?;

    info!(user_id = %redeemed.user_id, "Password reset completed");
    Ok(())
}

/// Runs the reset issuance chain, reporting the first failure as a reason
/// string.
fn try_issue_reset(
    persistence: &mut SqlitePersistence,
    mailer: &dyn Mailer,
    user_id: &str,
) -> Result<(), String> {
    let user: UserData = persistence
        .get_user_by_id(user_id)
        .map_err(|e| format!("user lookup failed: {e}"))?
        .ok_or_else(|| String::from("no such user"))?;

    let email: String = user
        .email
        .ok_or_else(|| String::from("user has no email address"))?;

    let token: String = Uuid::new_v4().to_string();
    let expires_at: String = (OffsetDateTime::now_utc() + RESET_TOKEN_EXPIRATION)
        .format(&Iso8601::DEFAULT)
        .map_err(|e| format!("failed to format expiration: {e}"))?;
    persistence
        .create_password_reset(&token, &user.user_id, &expires_at)
        .map_err(|e| format!("reset creation failed: {e}"))?;

    let message: MailMessage = MailMessage {
        to: email,
        subject: String::from("Password reset request"),
        body: format!(
            "A password reset was requested for your account. Set a new \
             password with this one-time token: {token}"
        ),
    };
    mailer
        .send(&message)
        .map_err(|e| format!("mail delivery failed: {e}"))
}

/// Looks up the global Alumni role, creating it on first use.
fn resolve_alumni_role(persistence: &mut SqlitePersistence) -> Result<i64, ApiError> {
    let name: &str = RoleKind::Alumni.kind_name();
    if let Some(role) = persistence
        .get_role_by_name(name)
        .map_err(|e| translate_persistence_error("Role", e))?
    {
        return Ok(role.role_id);
    }
    persistence
        .create_role(name, None)
        .map_err(|e| translate_persistence_error("Role", e))
}
