use axum_helpers::create_production_app;
use core_config::FromEnv;
use core_config::tracing::{init_tracing, install_color_eyre};
use tracing::{error, info};

use users_api::config::Config;
use users_api::state::AppState;
use users_api::{api, build_app};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Before any fallible operation
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!(
        address = %config.server.address(),
        environment = ?config.environment,
        "Starting users API"
    );

    let db = database::postgres::connect_from_config(config.database.clone())
        .await
        .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))?;

    database::postgres::apply_schema(&db, "users", &domain_users::postgres::SCHEMA)
        .await
        .map_err(|e| eyre::eyre!("Schema bootstrap failed: {}", e))?;

    let state = AppState { config, db };

    let app = build_app(api::routes(&state), api::ready_router(state.clone()));

    let server_config = state.config.server.clone();
    let db = state.db;

    create_production_app(app, &server_config, async move {
        info!("Shutting down: closing database connections");
        match database::postgres::close(db).await {
            Ok(()) => info!("PostgreSQL connection closed successfully"),
            Err(e) => error!("Error closing PostgreSQL: {}", e),
        }
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Users API shutdown complete");
    Ok(())
}
