//! Keeps the resolved capabilities alive until the process is asked to stop

use platform_core::CapabilityRegistry;
use std::sync::Arc;
use std::time::Instant;
use tokio::signal;
use tracing::{info, warn};

pub async fn run(registry: Arc<CapabilityRegistry>) {
    let started = Instant::now();

    let capabilities: Vec<_> = registry.resolved().iter().map(|c| c.name()).collect();
    info!(
        capabilities = ?capabilities,
        default_image = registry.default_image().unwrap_or("none"),
        "Platform ready"
    );

    wait_for_shutdown().await;

    info!("Shutdown signal received, stopping...");
    info!(
        uptime_seconds = started.elapsed().as_secs(),
        "Platform service stopped"
    );
}

async fn wait_for_shutdown() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
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
