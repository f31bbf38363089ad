//! Collaborator interfaces consumed by the flow controller.
//!
//! The front door owns no durable state; credential checks, password changes
//! and the reset-token lifecycle all happen behind [`AuthService`], and the
//! caller's authentication state is resolved per user area by
//! [`SessionService`]. Both are trait objects so the flow can be exercised
//! with in-memory fakes.

use crate::flow::{
    commands::{
        ChangePasswordCommand, ForgotPasswordCommand, LoginCommand, PasswordResetCommand,
        ResetRequest, Validation,
    },
    urls,
};
use anyhow::Result;
use async_trait::async_trait;

/// The caller's authentication state for one user area.
///
/// Read-only to the flow; mutations happen through [`AuthService`] calls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionContext {
    pub is_logged_in: bool,
    pub is_password_change_required: bool,
}

/// Session grant minted upstream on a successful login, surfaced to the HTTP
/// layer for cookie issuance. The token is opaque here.
#[derive(Clone, Debug)]
pub struct SessionGrant {
    pub token: String,
}

/// Result of a login attempt.
#[derive(Debug)]
pub enum LoginOutcome {
    Success(SessionGrant),
    PasswordChangeRequired,
    Failure(Validation),
}

/// Outcome of parsing and validating an incoming reset link.
#[derive(Clone, Debug, Default)]
pub struct ResetRequestValidation {
    pub request_id: String,
    pub token: String,
    pub validation: Validation,
}

impl ResetRequestValidation {
    #[must_use]
    pub fn invalid(message: &str) -> Self {
        Self {
            validation: Validation::single("token", message),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validation.is_valid()
    }
}

#[async_trait]
pub trait SessionService: Send + Sync {
    /// Resolve the current caller's [`SessionContext`] for a user area.
    async fn current_context(
        &self,
        area: &str,
        session_token: Option<&str>,
    ) -> Result<SessionContext>;
}

#[async_trait]
pub trait AuthService: Send + Sync {
    async fn login(&self, command: &LoginCommand) -> Result<LoginOutcome>;

    /// Best-effort and idempotent; the flow never surfaces logout errors.
    async fn logout(&self, session_token: Option<&str>) -> Result<()>;

    /// Errors come back as validation state on the command.
    async fn change_password(&self, command: &mut ChangePasswordCommand) -> Result<()>;

    /// Ask the upstream to mail a reset link built from `reset_url_template`.
    /// Must not reveal whether the account exists.
    async fn send_reset_notification(
        &self,
        command: &mut ForgotPasswordCommand,
        reset_url_template: &str,
    ) -> Result<()>;

    async fn parse_reset_request(&self, request: &ResetRequest) -> Result<ResetRequestValidation>;

    /// Errors come back as validation state on the command.
    async fn complete_reset(&self, command: &mut PasswordResetCommand) -> Result<()>;

    /// Validate a caller-supplied post-login redirect target.
    fn validated_return_url(&self, raw: Option<&str>) -> Option<String> {
        urls::validate_return_url(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_context_default_is_anonymous() {
        let context = SessionContext::default();
        assert!(!context.is_logged_in);
        assert!(!context.is_password_change_required);
    }

    #[test]
    fn test_reset_request_validation_invalid_carries_detail() {
        let result = ResetRequestValidation::invalid("Token has expired");
        assert!(!result.is_valid());
        assert_eq!(result.validation.errors()[0].message, "Token has expired");
    }
}
