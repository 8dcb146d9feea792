use axum::{Router, routing::get};
use domain_users::{PgUserRepository, UserRepository, UserService, handlers};

use crate::state::AppState;

pub mod health;

/// API routes backed by PostgreSQL.
pub fn routes(state: &AppState) -> Router {
    users_routes(PgUserRepository::new(state.db.clone()))
}

/// Mounts the users endpoints under `/api/users` for any repository.
pub fn users_routes<R: UserRepository + 'static>(repository: R) -> Router {
    Router::new().nest("/api/users", handlers::router(UserService::new(repository)))
}

/// Router with the `/ready` endpoint; state is applied so it merges into the
/// stateless app router.
pub fn ready_router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
