//! # Axum Helpers
//!
//! Shared building blocks for the HTTP services in this workspace.
//!
//! - **[`errors`]**: `AppError` and the `{"error": "..."}` response body
//! - **[`extractors`]**: `ValidatedJson`, decoding plus `validator` rules
//! - **[`middleware`]**: request logging and permissive CORS
//! - **[`server`]**: health handlers, shutdown coordinator, drained serving
//!
//! ```ignore
//! use axum::{Router, middleware};
//! use axum_helpers::{apply_cors, create_production_app, errors::handlers::not_found};
//!
//! let app = Router::new()
//!     .merge(axum_helpers::health_router())
//!     .nest("/api/users", users_router)
//!     .fallback(not_found)
//!     .layer(middleware::from_fn(axum_helpers::request_logging));
//! create_production_app(apply_cors(app), &config.server, cleanup).await?;
//! ```

pub mod errors;
pub mod extractors;
pub mod middleware;
pub mod server;

pub use errors::{AppError, ErrorResponse};
pub use extractors::ValidatedJson;
pub use middleware::{apply_cors, request_logging};
pub use server::{
    HealthCheckFuture, ShutdownCoordinator, create_production_app, health_router,
    run_health_checks, serve_with_drain,
};
