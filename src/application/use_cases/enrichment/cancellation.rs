use std::future::pending;
use std::sync::Arc;
use tokio::sync::watch;

/// Fires the paired [`Cancellation`]
#[derive(Clone)]
pub struct CancelHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

/// Cancellation signal observed by a running pipeline
pub struct Cancellation {
    rx: Option<watch::Receiver<bool>>,
}

impl Cancellation {
    pub fn new() -> (CancelHandle, Cancellation) {
        let (tx, rx) = watch::channel(false);
        (
            CancelHandle { tx: Arc::new(tx) },
            Cancellation { rx: Some(rx) },
        )
    }

    /// A signal that never fires
    pub fn never() -> Self {
        Self { rx: None }
    }

    pub fn is_cancelled(&self) -> bool {
        self.rx.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// Resolves once cancelled. Pends forever if the handle is dropped
    /// without cancelling.
    pub async fn cancelled(&mut self) {
        let Some(rx) = self.rx.as_mut() else {
            return pending().await;
        };

        loop {
            if *rx.borrow_and_update() {
                return;
            }
            if rx.changed().await.is_err() {
                return pending().await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_cancel_resolves_waiter() {
        let (handle, mut cancellation) = Cancellation::new();
        assert!(!cancellation.is_cancelled());

        handle.cancel();
        tokio::time::timeout(Duration::from_secs(1), cancellation.cancelled())
            .await
            .expect("cancellation should resolve");
        assert!(cancellation.is_cancelled());
    }

    #[tokio::test]
    async fn test_never_does_not_resolve() {
        let mut cancellation = Cancellation::never();
        let waited =
            tokio::time::timeout(Duration::from_millis(20), cancellation.cancelled()).await;
        assert!(waited.is_err());
    }

    #[tokio::test]
    async fn test_dropped_handle_does_not_cancel() {
        let (handle, mut cancellation) = Cancellation::new();
        drop(handle);
        let waited =
            tokio::time::timeout(Duration::from_millis(20), cancellation.cancelled()).await;
        assert!(waited.is_err());
        assert!(!cancellation.is_cancelled());
    }
}
