//! Graceful shutdown handling.

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::dispatch::Dispatcher;

/// Spawns a task that cancels `cancel` on Ctrl-C.
///
/// The dispatch loop has no natural end; this is how it stops.
pub fn spawn_interrupt_listener(cancel: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                match result {
                    Ok(()) => log::info!("Interrupt received, finishing the current request"),
                    Err(e) => log::warn!("Failed to listen for Ctrl-C: {}", e),
                }
                cancel.cancel();
            }
            _ = cancel.cancelled() => {}
        }
    })
}

/// Shuts down background work gracefully.
///
/// Waits for outstanding telemetry reports, stops the rate limiter's refill
/// task and the interrupt listener.
pub async fn shutdown_gracefully(
    cancel: CancellationToken,
    dispatcher: &mut Dispatcher,
    interrupt_listener: Option<JoinHandle<()>>,
) {
    cancel.cancel();
    dispatcher.shutdown().await;
    if let Some(listener) = interrupt_listener {
        let _ = listener.await;
    }
}
