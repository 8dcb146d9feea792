//! Server infrastructure module.
//!
//! - Liveness/readiness handlers
//! - Graceful shutdown coordination
//! - Serving with a bounded drain followed by resource cleanup

pub mod app;
pub mod health;
pub mod shutdown;

pub use app::{create_production_app, serve_with_drain};
pub use health::{HealthCheckFuture, HealthResponse, health_handler, health_router, run_health_checks};
pub use shutdown::ShutdownCoordinator;
