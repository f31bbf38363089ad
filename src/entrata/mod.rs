//! Axum adapter: router construction and the serve loop.

pub mod handlers;
pub mod views;

use crate::flow::{urls, AuthFlow};
use anyhow::Result;
use axum::{
    body::Body,
    extract::{Extension, MatchedPath},
    http::{HeaderName, HeaderValue, Request},
    routing::get,
    Router,
};
use handlers::CookieSettings;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::PropagateRequestIdLayer, set_header::SetRequestHeaderLayer, trace::TraceLayer,
};
use tracing::{info, info_span, Span};
use ulid::Ulid;

/// Build the application router.
#[must_use]
pub fn router(flow: Arc<AuthFlow>, cookies: CookieSettings) -> Router {
    Router::new()
        .route(urls::AUTH_ROOT, get(handlers::auth::index))
        .route(
            urls::LOGIN,
            get(handlers::auth::show_login).post(handlers::auth::submit_login),
        )
        .route(
            urls::CHANGE_PASSWORD,
            get(handlers::auth::show_change_password).post(handlers::auth::submit_change_password),
        )
        .route(urls::LOGOUT, get(handlers::auth::logout))
        .route(
            urls::FORGOT_PASSWORD,
            get(handlers::auth::show_forgot_password).post(handlers::auth::submit_forgot_password),
        )
        .route(
            urls::RESET_PASSWORD,
            get(handlers::auth::show_reset_password).post(handlers::auth::submit_reset_password),
        )
        .route("/health", get(handlers::health))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_request: &Request<Body>| {
                        HeaderValue::from_str(Ulid::new().to_string().as_str()).ok()
                    },
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(Extension(flow))
                .layer(Extension(cookies)),
        )
}

/// Start the server
/// # Errors
/// Return error if failed to start the server
pub async fn new(port: u16, flow: Arc<AuthFlow>, cookies: CookieSettings) -> Result<()> {
    let app = router(flow, cookies);

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}
