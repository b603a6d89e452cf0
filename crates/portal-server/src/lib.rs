//! REST API of the safety portal
//!
//! Every board, the equipment inventory, team scorecards, uploads and the
//! AI assistant are served under `/api`; stored uploads under `/uploads`.

pub mod error;
pub mod extract;
pub mod routes;

use tokio::net::TcpListener;
use tokio::signal;

use portal_app::{Config, Portal};
use portal_types::Result;

pub use error::AppError;
pub use routes::router;

/// Open the portal described by `config` and serve it until ctrl-c or SIGTERM
pub async fn serve(config: &Config) -> Result<()> {
    let portal = Portal::open(config)?;
    tracing::info!(backend = portal.chat.backend_name(), "portal opened");

    let listener = TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(address = %config.bind_addr, "server listening");

    axum::serve(listener, router(portal))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => tracing::info!("received ctrl-c, shutting down"),
            Err(e) => {
                tracing::warn!(error = %e, "ctrl-c handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                tracing::info!("received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::warn!(error = %e, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
