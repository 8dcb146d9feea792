use super::shutdown::ShutdownCoordinator;
use axum::Router;
use core_config::server::ServerConfig;
use std::future::Future;
use std::io;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinError;
use tracing::{info, warn};

/// Production entry point: binds, serves until SIGINT/SIGTERM, drains and
/// runs `cleanup`.
///
/// The drain deadline comes from `ServerConfig::shutdown_timeout`.
///
/// ```ignore
/// let cleanup = async move {
///     database::postgres::close(db).await.ok();
/// };
/// create_production_app(router, &config.server, cleanup).await?;
/// ```
pub async fn create_production_app<F>(
    router: Router,
    server_config: &ServerConfig,
    cleanup: F,
) -> io::Result<()>
where
    F: Future<Output = ()> + Send,
{
    let listener = TcpListener::bind(server_config.address()).await?;

    let coordinator = ShutdownCoordinator::default();
    let signals = coordinator.clone();
    tokio::spawn(async move { signals.wait_for_signal().await });

    serve_with_drain(
        listener,
        router,
        coordinator,
        server_config.shutdown_timeout(),
        cleanup,
    )
    .await
}

/// Serves `router` on `listener` until `coordinator` signals shutdown.
///
/// Shutdown sequence:
/// 1. stop accepting new connections;
/// 2. wait up to `drain_timeout` for in-flight requests to finish, then drop
///    whatever is still open;
/// 3. run `cleanup` (always, also when the drain timed out).
///
/// If the server fails before shutdown is requested, `cleanup` still runs and
/// the error is returned.
pub async fn serve_with_drain<F>(
    listener: TcpListener,
    router: Router,
    coordinator: ShutdownCoordinator,
    drain_timeout: Duration,
    cleanup: F,
) -> io::Result<()>
where
    F: Future<Output = ()> + Send,
{
    info!("Server starting on {}", listener.local_addr()?);

    let stop_accepting = coordinator.clone();
    let mut server = tokio::spawn(async move {
        axum::serve(listener, router.into_make_service())
            .with_graceful_shutdown(async move { stop_accepting.wait().await })
            .await
    });

    let finished_early = tokio::select! {
        result = &mut server => Some(result),
        _ = coordinator.wait() => None,
    };

    let serve_result = match finished_early {
        Some(result) => flatten(result),
        None => {
            info!("Draining in-flight requests (timeout: {:?})", drain_timeout);
            match tokio::time::timeout(drain_timeout, &mut server).await {
                Ok(result) => {
                    info!("All connections drained");
                    flatten(result)
                }
                Err(_) => {
                    warn!(
                        "Drain exceeded timeout of {:?}, dropping remaining connections",
                        drain_timeout
                    );
                    server.abort();
                    Ok(())
                }
            }
        }
    };

    if let Err(e) = &serve_result {
        tracing::error!("Server encountered an error: {:?}", e);
    }

    info!("Running cleanup tasks");
    cleanup.await;
    info!("Cleanup completed");

    serve_result
}

fn flatten(result: Result<io::Result<()>, JoinError>) -> io::Result<()> {
    result.map_err(io::Error::other)?
}
