use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::signal;
use tokio::sync::Notify;
use tracing::{info, warn};

/// Coordinates graceful shutdown between the signal listener, the server
/// and the health probe.
///
/// There is no server-side state to flush: history lives in the client's
/// cookie and upstream connections close with the HTTP client.
pub struct ShutdownCoordinator {
    notify: Arc<Notify>,
    shutting_down: AtomicBool,
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownCoordinator {
    pub fn new() -> Self {
        Self {
            notify: Arc::new(Notify::new()),
            shutting_down: AtomicBool::new(false),
        }
    }

    pub async fn wait_for_shutdown(&self) {
        let notified = self.notify.notified();
        if self.is_shutting_down() {
            return;
        }
        notified.await;
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutting_down.load(Ordering::Relaxed)
    }

    pub async fn shutdown(&self) {
        if self.shutting_down.swap(true, Ordering::Relaxed) {
            warn!("Shutdown already called");
            return;
        }
        info!("Initiating graceful shutdown sequence");

        // Notify all waiting tasks
        self.notify.notify_waiters();

        info!("Graceful shutdown sequence complete");
    }
}

pub async fn listen_for_shutdown_signals() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            info!("Received SIGTERM signal");
        }
    }

    info!("signal received, starting graceful shutdown");
}
