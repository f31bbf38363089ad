//! The authentication flow controller as pure decision logic.
//!
//! Each method mirrors one route behavior: read a command, call one
//! collaborator method, branch on a small enumerated result and pick a view
//! or a redirect. No axum types appear here; the HTTP layer in
//! [`crate::entrata`] is a thin adapter over [`FlowResponse`], so every
//! branch can be tested without a request pipeline.

pub mod commands;
pub mod service;
pub mod urls;

use crate::flow::{
    commands::{
        ChangePasswordCommand, ForgotPasswordCommand, LoginCommand, PasswordResetCommand,
        ResetRequest,
    },
    service::{AuthService, LoginOutcome, SessionContext, SessionGrant, SessionService},
};
use anyhow::Result;
use std::sync::Arc;
use tracing::warn;

/// A view to render, chosen by the flow. Rendering itself happens in the
/// HTTP layer; the flow only carries the model.
#[derive(Debug)]
pub enum View {
    Login(LoginCommand),
    ChangePassword(ChangePasswordCommand),
    ChangePasswordComplete { return_url: Option<String> },
    ForgotPassword(ForgotPasswordCommand),
    ResetPassword(PasswordResetCommand),
    ResetPasswordInvalid(service::ResetRequestValidation),
    ResetPasswordComplete,
}

/// What the HTTP layer should answer with.
#[derive(Debug)]
pub enum FlowResponse {
    Render(View),
    Redirect(String),
    PermanentRedirect(String),
}

/// Login additionally carries the upstream session grant so the adapter can
/// set the session cookie alongside the redirect.
#[derive(Debug)]
pub struct LoginFlowResponse {
    pub response: FlowResponse,
    pub session: Option<SessionGrant>,
}

/// Flow-level configuration.
#[derive(Clone, Debug)]
pub struct FlowConfig {
    reset_url_template: String,
}

impl FlowConfig {
    /// Build the reset-link template from the public base URL of this
    /// deployment; the upstream appends the `i`/`t` parameters.
    #[must_use]
    pub fn new(public_base_url: &str) -> Self {
        Self {
            reset_url_template: format!(
                "{}{}",
                public_base_url.trim_end_matches('/'),
                urls::RESET_PASSWORD
            ),
        }
    }

    #[must_use]
    pub fn reset_url_template(&self) -> &str {
        &self.reset_url_template
    }
}

pub struct AuthFlow {
    auth: Arc<dyn AuthService>,
    sessions: Arc<dyn SessionService>,
    config: FlowConfig,
}

impl AuthFlow {
    #[must_use]
    pub fn new(
        auth: Arc<dyn AuthService>,
        sessions: Arc<dyn SessionService>,
        config: FlowConfig,
    ) -> Self {
        Self {
            auth,
            sessions,
            config,
        }
    }

    /// Resolve the caller's context for the partner area.
    pub async fn current_context(&self, session_token: Option<&str>) -> Result<SessionContext> {
        self.sessions
            .current_context(urls::USER_AREA, session_token)
            .await
    }

    /// GET /partner/auth
    #[must_use]
    pub fn index(&self) -> FlowResponse {
        FlowResponse::PermanentRedirect(urls::LOGIN.to_string())
    }

    /// GET /partner/auth/login
    #[must_use]
    pub fn show_login(&self, context: SessionContext) -> FlowResponse {
        if context.is_logged_in {
            return FlowResponse::Redirect(urls::DEFAULT_LANDING.to_string());
        }
        FlowResponse::Render(View::Login(LoginCommand::default()))
    }

    /// POST /partner/auth/login
    pub async fn submit_login(
        &self,
        mut command: LoginCommand,
        raw_return_url: Option<&str>,
    ) -> Result<LoginFlowResponse> {
        command.validate();
        if !command.validation.is_valid() {
            return Ok(LoginFlowResponse {
                response: FlowResponse::Render(View::Login(command)),
                session: None,
            });
        }

        let outcome = self.auth.login(&command).await?;
        let return_url = self.auth.validated_return_url(raw_return_url);

        let (response, session) = match outcome {
            LoginOutcome::PasswordChangeRequired => (
                FlowResponse::Redirect(urls::change_password_with_return(return_url.as_deref())),
                None,
            ),
            LoginOutcome::Success(grant) => {
                let location = return_url.unwrap_or_else(|| urls::DEFAULT_LANDING.to_string());
                (FlowResponse::Redirect(location), Some(grant))
            }
            LoginOutcome::Failure(validation) => {
                command.validation = validation;
                (FlowResponse::Render(View::Login(command)), None)
            }
        };

        Ok(LoginFlowResponse { response, session })
    }

    /// GET /partner/auth/change-password
    ///
    /// A return URL pending from login is carried into the form so it
    /// survives the post back.
    pub async fn show_change_password(
        &self,
        context: SessionContext,
        session_token: Option<&str>,
        raw_return_url: Option<&str>,
    ) -> Result<FlowResponse> {
        if let Some(redirect) = self.change_password_guard(context, session_token).await {
            return Ok(redirect);
        }
        Ok(FlowResponse::Render(View::ChangePassword(
            ChangePasswordCommand {
                return_url: self.auth.validated_return_url(raw_return_url),
                ..ChangePasswordCommand::default()
            },
        )))
    }

    /// POST /partner/auth/change-password
    pub async fn submit_change_password(
        &self,
        context: SessionContext,
        session_token: Option<&str>,
        mut command: ChangePasswordCommand,
    ) -> Result<FlowResponse> {
        if let Some(redirect) = self.change_password_guard(context, session_token).await {
            return Ok(redirect);
        }

        command.validate();
        if command.validation.is_valid() {
            self.auth.change_password(&mut command).await?;
        }

        if !command.validation.is_valid() {
            return Ok(FlowResponse::Render(View::ChangePassword(command)));
        }

        let return_url = self.auth.validated_return_url(command.return_url.as_deref());
        Ok(FlowResponse::Render(View::ChangePasswordComplete {
            return_url,
        }))
    }

    /// A caller with a full session and no pending change does not belong
    /// here. A caller with a full session *and* the pending-change flag is in
    /// an inconsistent state (a pending change should block full login), so
    /// the session is dropped before the flow continues. Fallback inherited
    /// from the source system, not a security control.
    async fn change_password_guard(
        &self,
        context: SessionContext,
        session_token: Option<&str>,
    ) -> Option<FlowResponse> {
        if !context.is_logged_in {
            return None;
        }
        if !context.is_password_change_required {
            return Some(FlowResponse::Redirect(urls::DEFAULT_LANDING.to_string()));
        }
        if let Err(err) = self.auth.logout(session_token).await {
            warn!("Failed to drop inconsistent session: {err}");
        }
        None
    }

    /// GET /partner/auth/logout
    pub async fn logout(&self, session_token: Option<&str>) -> FlowResponse {
        if let Err(err) = self.auth.logout(session_token).await {
            warn!("Logout failed: {err}");
        }
        FlowResponse::Redirect(urls::LOGIN.to_string())
    }

    /// GET /partner/auth/forgot-password
    #[must_use]
    pub fn show_forgot_password(
        &self,
        context: SessionContext,
        email: Option<String>,
    ) -> FlowResponse {
        if context.is_logged_in {
            return FlowResponse::Redirect(urls::DEFAULT_LANDING.to_string());
        }
        FlowResponse::Render(View::ForgotPassword(ForgotPasswordCommand {
            username: email.unwrap_or_default(),
            ..ForgotPasswordCommand::default()
        }))
    }

    /// POST /partner/auth/forgot-password
    ///
    /// Always re-renders the same view, whatever the upstream said: the
    /// response must not reveal whether the account exists, including when
    /// the collaborator call itself fails.
    pub async fn submit_forgot_password(&self, mut command: ForgotPasswordCommand) -> FlowResponse {
        if let Err(err) = self
            .auth
            .send_reset_notification(&mut command, self.config.reset_url_template())
            .await
        {
            warn!("Reset notification failed: {err}");
        }
        FlowResponse::Render(View::ForgotPassword(command))
    }

    /// GET /partner/auth/reset-password
    pub async fn show_reset_password(
        &self,
        context: SessionContext,
        request: ResetRequest,
    ) -> Result<FlowResponse> {
        if context.is_logged_in {
            return Ok(FlowResponse::Redirect(urls::DEFAULT_LANDING.to_string()));
        }

        let result = self.auth.parse_reset_request(&request).await?;
        if !result.is_valid() {
            return Ok(FlowResponse::Render(View::ResetPasswordInvalid(result)));
        }

        Ok(FlowResponse::Render(View::ResetPassword(
            PasswordResetCommand {
                request_id: result.request_id,
                token: result.token,
                ..PasswordResetCommand::default()
            },
        )))
    }

    /// POST /partner/auth/reset-password
    pub async fn submit_reset_password(
        &self,
        context: SessionContext,
        mut command: PasswordResetCommand,
    ) -> Result<FlowResponse> {
        if context.is_logged_in {
            return Ok(FlowResponse::Redirect(urls::DEFAULT_LANDING.to_string()));
        }

        command.validate();
        if command.validation.is_valid() {
            self.auth.complete_reset(&mut command).await?;
        }

        if command.validation.is_valid() {
            return Ok(FlowResponse::Render(View::ResetPasswordComplete));
        }
        Ok(FlowResponse::Render(View::ResetPassword(command)))
    }
}
