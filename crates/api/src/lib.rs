// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary layer for the Tracer Study Platform.
//!
//! This crate orchestrates every operation the HTTP surface exposes:
//! authentication and session handling, role-based authorization, survey
//! authoring, answer intake with domain validation, the supervisor token
//! workflow, reminder emails, and system configuration. The server binary
//! maps these operations onto routes and status codes; the persistence and
//! domain crates do the storage and the rule checking.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

pub mod accounts;
pub mod answers;
pub mod auth;
pub mod config;
pub mod error;
pub mod mail;
pub mod password_policy;
pub mod reminders;
pub mod request_response;
pub mod supervisor;
pub mod surveys;
pub mod units;
pub mod users;

#[cfg(test)]
mod tests;

pub use auth::{AnswerScope, AuthenticatedUser, AuthenticationService, AuthorizationService};
pub use config::SUPERVISOR_EMAIL_QUESTION_CODE;
pub use error::{ApiError, AuthError, translate_domain_error, translate_persistence_error};
pub use mail::{LogMailer, MailError, MailMessage, Mailer};
pub use password_policy::{PasswordPolicy, PasswordPolicyError};
