//! Handlers for the `/partner/auth` routes.
//!
//! Each handler extracts the form/query input, resolves the caller's session
//! context, calls the matching [`AuthFlow`] method and converts the flow's
//! decision into an axum response. Session cookies are issued and cleared
//! here; everything else is the flow's call.

use crate::{
    entrata::handlers::{
        clear_session_cookie, extract_session_token, flow_response, resolve_context,
        session_cookie, CookieSettings,
    },
    flow::{
        commands::{
            ChangePasswordCommand, ForgotPasswordCommand, LoginCommand, PasswordResetCommand,
            ResetRequest,
        },
        AuthFlow,
    },
};
use axum::{
    extract::{Extension, Form, Query},
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::error;

#[derive(Debug, Default, Deserialize)]
pub struct ReturnUrlQuery {
    pub return_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ForgotPasswordQuery {
    pub email: Option<String>,
}

/// GET /partner/auth
pub async fn index(flow: Extension<Arc<AuthFlow>>) -> Response {
    flow_response(flow.index())
}

/// GET /partner/auth/login
pub async fn show_login(flow: Extension<Arc<AuthFlow>>, headers: HeaderMap) -> Response {
    let (context, _) = match resolve_context(&flow, &headers).await {
        Ok(resolved) => resolved,
        Err(response) => return response,
    };
    flow_response(flow.show_login(context))
}

/// POST /partner/auth/login
pub async fn submit_login(
    flow: Extension<Arc<AuthFlow>>,
    settings: Extension<CookieSettings>,
    query: Query<ReturnUrlQuery>,
    payload: Option<Form<LoginCommand>>,
) -> Response {
    let Some(Form(command)) = payload else {
        return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response();
    };

    match flow.submit_login(command, query.return_url.as_deref()).await {
        Ok(result) => {
            let mut response = flow_response(result.response);
            if let Some(grant) = result.session {
                match session_cookie(*settings, &grant.token) {
                    Ok(cookie) => {
                        response.headers_mut().insert(SET_COOKIE, cookie);
                    }
                    Err(err) => {
                        error!("Failed to build session cookie: {err}");
                        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
                    }
                }
            }
            response
        }
        Err(err) => {
            error!("Login failed: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// GET /partner/auth/change-password
pub async fn show_change_password(
    flow: Extension<Arc<AuthFlow>>,
    query: Query<ReturnUrlQuery>,
    headers: HeaderMap,
) -> Response {
    let (context, token) = match resolve_context(&flow, &headers).await {
        Ok(resolved) => resolved,
        Err(response) => return response,
    };
    match flow
        .show_change_password(context, token.as_deref(), query.return_url.as_deref())
        .await
    {
        Ok(response) => flow_response(response),
        Err(err) => {
            error!("Change password failed: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// POST /partner/auth/change-password
pub async fn submit_change_password(
    flow: Extension<Arc<AuthFlow>>,
    query: Query<ReturnUrlQuery>,
    headers: HeaderMap,
    payload: Option<Form<ChangePasswordCommand>>,
) -> Response {
    let Some(Form(mut command)) = payload else {
        return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response();
    };
    if command.return_url.is_none() {
        command.return_url = query.0.return_url;
    }
    let (context, token) = match resolve_context(&flow, &headers).await {
        Ok(resolved) => resolved,
        Err(response) => return response,
    };
    match flow
        .submit_change_password(context, token.as_deref(), command)
        .await
    {
        Ok(response) => flow_response(response),
        Err(err) => {
            error!("Change password failed: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// GET /partner/auth/logout
pub async fn logout(
    flow: Extension<Arc<AuthFlow>>,
    settings: Extension<CookieSettings>,
    headers: HeaderMap,
) -> Response {
    let token = extract_session_token(&headers);
    let mut response = flow_response(flow.logout(token.as_deref()).await);
    // Always clear the cookie, even if no session existed.
    if let Ok(cookie) = clear_session_cookie(*settings) {
        response.headers_mut().insert(SET_COOKIE, cookie);
    }
    response
}

/// GET /partner/auth/forgot-password
pub async fn show_forgot_password(
    flow: Extension<Arc<AuthFlow>>,
    query: Query<ForgotPasswordQuery>,
    headers: HeaderMap,
) -> Response {
    let (context, _) = match resolve_context(&flow, &headers).await {
        Ok(resolved) => resolved,
        Err(response) => return response,
    };
    flow_response(flow.show_forgot_password(context, query.0.email))
}

/// POST /partner/auth/forgot-password
pub async fn submit_forgot_password(
    flow: Extension<Arc<AuthFlow>>,
    payload: Option<Form<ForgotPasswordCommand>>,
) -> Response {
    let Some(Form(command)) = payload else {
        return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response();
    };
    flow_response(flow.submit_forgot_password(command).await)
}

/// GET /partner/auth/reset-password
pub async fn show_reset_password(
    flow: Extension<Arc<AuthFlow>>,
    query: Query<ResetRequest>,
    headers: HeaderMap,
) -> Response {
    let (context, _) = match resolve_context(&flow, &headers).await {
        Ok(resolved) => resolved,
        Err(response) => return response,
    };
    match flow.show_reset_password(context, query.0).await {
        Ok(response) => flow_response(response),
        Err(err) => {
            error!("Reset password failed: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// POST /partner/auth/reset-password
pub async fn submit_reset_password(
    flow: Extension<Arc<AuthFlow>>,
    headers: HeaderMap,
    payload: Option<Form<PasswordResetCommand>>,
) -> Response {
    let Some(Form(command)) = payload else {
        return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response();
    };
    let (context, _) = match resolve_context(&flow, &headers).await {
        Ok(resolved) => resolved,
        Err(response) => return response,
    };
    match flow.submit_reset_password(context, command).await {
        Ok(response) => flow_response(response),
        Err(err) => {
            error!("Reset password failed: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
