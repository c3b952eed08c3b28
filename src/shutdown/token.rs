use std::sync::Arc;

use tokio::sync::watch;

/// Shared stop flag observed by every worker at its iteration boundary.
///
/// Cloning is cheap; all clones see the same flag. Setting it never touches
/// a request that is already in flight.
#[derive(Debug, Clone)]
pub struct ShutdownToken {
    tx: Arc<watch::Sender<bool>>,
}

impl Default for ShutdownToken {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownToken {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Sets the flag. Returns `true` only for the call that flipped it.
    pub fn cancel(&self) -> bool {
        !self.tx.send_replace(true)
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once the flag is set, immediately if it already is.
    pub async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives in `self`, so the channel cannot close here.
        drop(rx.wait_for(|cancelled| *cancelled).await);
    }
}
