// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Outbound mail seam.
//!
//! Reminder and supervisor-link delivery goes through the [`Mailer`] trait.
//! The platform ships no SMTP transport; the default implementation logs
//! each message. Callers treat delivery as fire-and-forget: a send failure
//! is logged by the caller and never fails the triggering request.

use tracing::info;

/// An outbound email message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    /// The recipient address.
    pub to: String,
    /// The subject line.
    pub subject: String,
    /// The plain-text body.
    pub body: String,
}

/// A mail delivery failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailError {
    /// A description of the delivery failure.
    pub message: String,
}

impl std::fmt::Display for MailError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Mail delivery failed: {}", self.message)
    }
}

impl std::error::Error for MailError {}

/// Delivery seam for outbound mail.
pub trait Mailer: Send + Sync {
    /// Delivers a single message.
    ///
    /// # Errors
    ///
    /// Returns an error if the message cannot be delivered.
    fn send(&self, message: &MailMessage) -> Result<(), MailError>;
}

/// A mailer that logs messages instead of delivering them.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogMailer;

impl Mailer for LogMailer {
    fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        info!(
            to = %message.to,
            subject = %message.subject,
            "Outbound mail (log transport)"
        );
        Ok(())
    }
}
