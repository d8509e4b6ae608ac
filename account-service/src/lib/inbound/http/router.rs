use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::current_account::current_account;
use super::handlers::login::login;
use super::handlers::register::register;
use super::handlers::verify::verify;
use super::middleware::authenticate as auth_middleware;
use crate::account::ports::AccountServicePort;

pub struct AppState<S: AccountServicePort> {
    pub account_service: Arc<S>,
    pub token_prefix: String,
    pub refresh_token_prefix: String,
}

// Manual impl: #[derive(Clone)] would demand S: Clone
impl<S: AccountServicePort> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            account_service: Arc::clone(&self.account_service),
            token_prefix: self.token_prefix.clone(),
            refresh_token_prefix: self.refresh_token_prefix.clone(),
        }
    }
}

pub fn create_router<S: AccountServicePort>(
    account_service: Arc<S>,
    token_prefix: String,
    refresh_token_prefix: String,
) -> Router {
    let state = AppState {
        account_service,
        token_prefix,
        refresh_token_prefix,
    };

    let public_routes = Router::new()
        .route("/register", post(register::<S>))
        .route("/login", post(login::<S>))
        .route("/verify/:token", get(verify::<S>));

    let protected_routes = Router::new()
        .route("/account", get(current_account))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware::<S>,
        ));

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
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
