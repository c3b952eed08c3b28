use async_trait::async_trait;
use tokio::sync::mpsc;

#[cfg(unix)]
use tokio::signal::unix::{Signal, SignalKind, signal};

/// Source of external stop requests.
#[async_trait]
pub trait StopSignal: Send {
    /// Resolves on the next stop request. May be awaited repeatedly.
    async fn recv(&mut self);
}

/// SIGINT/SIGTERM on unix, Ctrl+C elsewhere.
///
/// Handlers are installed by [`OsStopSignal::register`], before any worker
/// starts, so an early interrupt is not lost.
pub struct OsStopSignal {
    #[cfg(unix)]
    interrupt: Signal,
    #[cfg(unix)]
    terminate: Option<Signal>,
}

impl OsStopSignal {
    /// Installs the process signal handlers.
    ///
    /// # Errors
    ///
    /// Returns an error when the interrupt handler cannot be registered.
    #[cfg(unix)]
    pub fn register() -> std::io::Result<Self> {
        let interrupt = signal(SignalKind::interrupt())?;
        let terminate = match signal(SignalKind::terminate()) {
            Ok(signal) => Some(signal),
            Err(err) => {
                tracing::warn!("Failed to register SIGTERM handler: {}", err);
                None
            }
        };
        Ok(Self {
            interrupt,
            terminate,
        })
    }

    /// Installs the process signal handlers.
    ///
    /// # Errors
    ///
    /// Never fails on this platform; the Ctrl+C handler is installed lazily.
    #[cfg(not(unix))]
    pub fn register() -> std::io::Result<Self> {
        Ok(Self {})
    }
}

#[async_trait]
impl StopSignal for OsStopSignal {
    #[cfg(unix)]
    async fn recv(&mut self) {
        let terminate = &mut self.terminate;
        tokio::select! {
            _ = self.interrupt.recv() => {}
            () = async {
                if let Some(signal) = terminate.as_mut() {
                    signal.recv().await;
                } else {
                    std::future::pending::<()>().await;
                }
            } => {}
        }
    }

    #[cfg(not(unix))]
    async fn recv(&mut self) {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    }
}

/// Stop requests delivered through a channel, for embedding and tests.
///
/// Once every sender is dropped no further request ever arrives.
pub struct ChannelStopSignal {
    rx: mpsc::UnboundedReceiver<()>,
}

impl ChannelStopSignal {
    #[must_use]
    pub fn new() -> (mpsc::UnboundedSender<()>, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, Self { rx })
    }
}

#[async_trait]
impl StopSignal for ChannelStopSignal {
    async fn recv(&mut self) {
        if self.rx.recv().await.is_none() {
            std::future::pending::<()>().await;
        }
    }
}
