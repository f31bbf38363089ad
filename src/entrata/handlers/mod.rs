pub mod health;
pub use self::health::health;

pub mod auth;

// common functions for the handlers
use crate::{
    entrata::views,
    flow::{AuthFlow, FlowResponse},
};
use axum::{
    http::{
        header::{InvalidHeaderValue, AUTHORIZATION, COOKIE},
        HeaderMap, HeaderValue, StatusCode,
    },
    response::{IntoResponse, Redirect, Response},
};
use tracing::error;

pub const SESSION_COOKIE_NAME: &str = "entrata_session";

/// Cookie attributes decided at wiring time.
#[derive(Clone, Copy, Debug)]
pub struct CookieSettings {
    pub secure: bool,
}

/// Build the `HttpOnly` session cookie from an upstream grant.
pub fn session_cookie(
    settings: CookieSettings,
    token: &str,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!("{SESSION_COOKIE_NAME}={token}; Path=/; HttpOnly; SameSite=Lax");
    if settings.secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

pub fn clear_session_cookie(settings: CookieSettings) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!("{SESSION_COOKIE_NAME}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    if settings.secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

/// Read the session token from the cookie or a bearer header.
pub fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = extract_bearer_token(headers) {
        return Some(token);
    }
    let header = headers.get(COOKIE)?;
    let value = header.to_str().ok()?;
    for pair in value.split(';') {
        let mut parts = pair.trim().splitn(2, '=');
        let (Some(key), Some(val)) = (parts.next(), parts.next()) else {
            continue;
        };
        if key.trim() == SESSION_COOKIE_NAME {
            return Some(val.trim().to_string());
        }
    }
    None
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let trimmed = value.trim();
    let token = trimmed
        .strip_prefix("Bearer ")
        .or_else(|| trimmed.strip_prefix("bearer "))?
        .trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Turn a flow decision into an HTTP response.
pub fn flow_response(response: FlowResponse) -> Response {
    match response {
        FlowResponse::Render(view) => views::render(&view).into_response(),
        FlowResponse::Redirect(location) => Redirect::to(&location).into_response(),
        FlowResponse::PermanentRedirect(location) => Redirect::permanent(&location).into_response(),
    }
}

/// Resolve the caller's session context; the session token rides along for
/// the handlers that need it (logout, inconsistent-session fallback).
pub async fn resolve_context(
    flow: &AuthFlow,
    headers: &HeaderMap,
) -> Result<(crate::flow::service::SessionContext, Option<String>), Response> {
    let token = extract_session_token(headers);
    match flow.current_context(token.as_deref()).await {
        Ok(context) => Ok((context, token)),
        Err(err) => {
            error!("Failed to resolve session context: {err}");
            Err(StatusCode::INTERNAL_SERVER_ERROR.into_response())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_session_token_from_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; entrata_session=tok-1; lang=en"),
        );
        assert_eq!(extract_session_token(&headers), Some("tok-1".to_string()));
    }

    #[test]
    fn test_extract_session_token_prefers_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer tok-2"));
        headers.insert(
            COOKIE,
            HeaderValue::from_static("entrata_session=tok-1"),
        );
        assert_eq!(extract_session_token(&headers), Some("tok-2".to_string()));
    }

    #[test]
    fn test_extract_session_token_missing() {
        let headers = HeaderMap::new();
        assert_eq!(extract_session_token(&headers), None);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(extract_session_token(&headers), None);
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie(CookieSettings { secure: true }, "tok-1").unwrap();
        let cookie = cookie.to_str().unwrap();
        assert!(cookie.starts_with("entrata_session=tok-1"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Secure"));

        let cookie = session_cookie(CookieSettings { secure: false }, "tok-1").unwrap();
        assert!(!cookie.to_str().unwrap().contains("Secure"));
    }

    #[test]
    fn test_clear_session_cookie_expires_immediately() {
        let cookie = clear_session_cookie(CookieSettings { secure: false }).unwrap();
        let cookie = cookie.to_str().unwrap();
        assert!(cookie.starts_with("entrata_session=;"));
        assert!(cookie.contains("Max-Age=0"));
    }
}
