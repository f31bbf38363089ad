//! Route library for the partner user area.

use url::form_urlencoded;

/// User area identifier handed to the session service.
pub const USER_AREA: &str = "partner";

pub const AUTH_ROOT: &str = "/partner/auth";
pub const LOGIN: &str = "/partner/auth/login";
pub const CHANGE_PASSWORD: &str = "/partner/auth/change-password";
pub const LOGOUT: &str = "/partner/auth/logout";
pub const FORGOT_PASSWORD: &str = "/partner/auth/forgot-password";
pub const RESET_PASSWORD: &str = "/partner/auth/reset-password";

/// Default post-login landing page for the area.
pub const DEFAULT_LANDING: &str = "/partner";

/// Change-password URL carrying a pending return URL, if any.
#[must_use]
pub fn change_password_with_return(return_url: Option<&str>) -> String {
    match return_url {
        Some(return_url) => {
            let query: String = form_urlencoded::Serializer::new(String::new())
                .append_pair("return_url", return_url)
                .finish();
            format!("{CHANGE_PASSWORD}?{query}")
        }
        None => CHANGE_PASSWORD.to_string(),
    }
}

/// Validate a caller-supplied post-login redirect target.
///
/// Only same-site relative paths survive; anything that a browser could
/// interpret as an absolute or protocol-relative URL is rejected to prevent
/// open-redirect abuse.
#[must_use]
pub fn validate_return_url(raw: Option<&str>) -> Option<String> {
    let candidate = raw?.trim();
    if candidate.is_empty() {
        return None;
    }
    if !candidate.starts_with('/') {
        return None;
    }
    // "//host" and "/\host" are scheme-relative in browsers.
    if candidate.starts_with("//") || candidate.starts_with("/\\") {
        return None;
    }
    if candidate.contains("://") || candidate.contains('\r') || candidate.contains('\n') {
        return None;
    }
    Some(candidate.to_string())
}
