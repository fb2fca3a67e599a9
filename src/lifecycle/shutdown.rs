//! Shutdown coordination for the proxy.

use std::fmt;

use tokio::sync::broadcast;

/// Why the proxy is stopping. Carried to every subscriber so the drain is
/// logged with its cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    /// SIGINT / Ctrl+C.
    Interrupt,
    /// SIGTERM.
    Terminate,
    /// Asked for in-process, e.g. by an embedding test.
    Requested,
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShutdownReason::Interrupt => write!(f, "interrupt"),
            ShutdownReason::Terminate => write!(f, "terminate"),
            ShutdownReason::Requested => write!(f, "requested"),
        }
    }
}

/// Broadcasts a single stop request to the server loop and anything else
/// holding a receiver.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<ShutdownReason>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ShutdownReason> {
        self.tx.subscribe()
    }

    /// Stop with [`ShutdownReason::Requested`].
    pub fn trigger(&self) {
        self.trigger_with(ShutdownReason::Requested);
    }

    /// Stop for the given reason. A no-op if nobody is listening.
    pub fn trigger_with(&self, reason: ShutdownReason) {
        let _ = self.tx.send(reason);
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for the stop request on `rx`.
///
/// A closed channel means every [`Shutdown`] handle is gone, which is treated
/// as a request to stop.
pub async fn wait_for(rx: &mut broadcast::Receiver<ShutdownReason>) -> ShutdownReason {
    rx.recv().await.unwrap_or(ShutdownReason::Requested)
}
