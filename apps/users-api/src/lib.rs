//! Users API: HTTP surface over the users domain.

pub mod api;
pub mod config;
pub mod openapi;
pub mod state;

use axum::{Router, middleware, routing::get};
use axum_helpers::{apply_cors, errors::handlers::not_found, health_router, request_logging};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Assembles the full application around the API and readiness routers.
///
/// Adds `/health`, the OpenAPI document, the JSON 404 fallback, per-request
/// tracing span and completion log, and finally the CORS layer so that every
/// response (errors and preflights included) carries its headers.
pub fn build_app(api: Router, ready: Router) -> Router {
    let router = Router::new()
        .merge(health_router())
        .merge(ready)
        .route("/api-docs/openapi.json", get(openapi::openapi_json))
        .merge(api)
        .fallback(not_found)
        .layer(middleware::from_fn(request_logging))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
        );

    apply_cors(router)
}
