//! Transient per-request commands and their validation state.
//!
//! Commands are created from form input, handed to the collaborators and
//! discarded after the response is chosen. Collaborator failures come back as
//! field-level errors on the command, never as panics.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

/// A single field-level validation error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Validation state attached to a command.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Validation {
    errors: Vec<FieldError>,
}

impl Validation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn single(field: &str, message: &str) -> Self {
        let mut validation = Self::new();
        validation.add(field, message);
        validation
    }

    pub fn add(&mut self, field: &str, message: &str) {
        self.errors.push(FieldError {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginCommand {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: SecretString,
    #[serde(skip)]
    pub validation: Validation,
}

impl LoginCommand {
    /// Required-field checks before the upstream call is attempted.
    pub fn validate(&mut self) {
        if self.username.trim().is_empty() {
            self.validation.add("username", "Username is required");
        }
        if self.password.expose_secret().is_empty() {
            self.validation.add("password", "Password is required");
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ChangePasswordCommand {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub current_password: SecretString,
    #[serde(default)]
    pub new_password: SecretString,
    #[serde(default)]
    pub return_url: Option<String>,
    #[serde(skip)]
    pub validation: Validation,
}

impl ChangePasswordCommand {
    pub fn validate(&mut self) {
        if self.username.trim().is_empty() {
            self.validation.add("username", "Username is required");
        }
        if self.current_password.expose_secret().is_empty() {
            self.validation
                .add("current_password", "Current password is required");
        }
        if self.new_password.expose_secret().is_empty() {
            self.validation
                .add("new_password", "New password is required");
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ForgotPasswordCommand {
    #[serde(default)]
    pub username: String,
    #[serde(skip)]
    pub validation: Validation,
}

#[derive(Debug, Default, Deserialize)]
pub struct PasswordResetCommand {
    /// Reset request id, the `i` query parameter of the emailed link.
    #[serde(default)]
    pub request_id: String,
    /// Opaque reset token, the `t` query parameter of the emailed link.
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub new_password: SecretString,
    #[serde(skip)]
    pub validation: Validation,
}

impl PasswordResetCommand {
    pub fn validate(&mut self) {
        if self.request_id.trim().is_empty() || self.token.trim().is_empty() {
            self.validation.add("token", "Invalid password reset request");
        }
        if self.new_password.expose_secret().is_empty() {
            self.validation
                .add("new_password", "New password is required");
        }
    }
}

/// Raw `i`/`t` query parameters of an incoming reset link, before the
/// upstream service has validated them.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ResetRequest {
    #[serde(rename = "i")]
    pub request_id: Option<String>,
    #[serde(rename = "t")]
    pub token: Option<String>,
}
