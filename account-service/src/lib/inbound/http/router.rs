use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::create_user::create_user;
use super::handlers::get_user::get_user;
use super::handlers::login::login;
use super::handlers::signup::signup;
use crate::domain::user::ports::OnboardingServicePort;

#[derive(Clone)]
pub struct AppState {
    pub onboarding: Arc<dyn OnboardingServicePort>,
}

pub fn create_router(onboarding: Arc<dyn OnboardingServicePort>) -> Router {
    let state = AppState { onboarding };

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .route("/auth/login", post(login))
        .route("/users/signup", post(signup))
        .route("/users", post(create_user))
        .route("/users/:email", get(get_user))
        .layer(trace_layer)
        .with_state(state)
}
