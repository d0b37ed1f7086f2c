//! Shutdown coordination and the running-server handle.

use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::store::{ArticleStore, StoreError};

/// One-shot stop flag shared between a [`ServerHandle`] and its serve task.
///
/// Built on a watch channel so a subscriber created after the trigger still
/// observes it.
pub struct Shutdown {
    tx: watch::Sender<bool>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    pub fn subscribe(&self) -> ShutdownSignal {
        ShutdownSignal {
            rx: self.tx.subscribe(),
        }
    }

    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving side of [`Shutdown`].
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

impl ShutdownSignal {
    /// Resolves once shutdown is triggered or the [`Shutdown`] is dropped.
    pub async fn recv(mut self) {
        let _ = self.rx.wait_for(|stopped| *stopped).await;
    }
}

/// Errors from [`ServerHandle::stop`].
#[derive(Debug, Error)]
pub enum StopError {
    #[error("failed to close article store: {0}")]
    Store(#[from] StoreError),

    #[error("HTTP server failed: {0}")]
    Serve(#[from] std::io::Error),

    #[error("HTTP server task panicked or was cancelled: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// A started server. Dropping it without calling [`stop`](Self::stop)
/// stops the listener but leaves the store connection open.
pub struct ServerHandle {
    local_addr: SocketAddr,
    store: Arc<dyn ArticleStore>,
    shutdown: Shutdown,
    task: JoinHandle<Result<(), std::io::Error>>,
}

impl ServerHandle {
    pub(crate) fn new(
        local_addr: SocketAddr,
        store: Arc<dyn ArticleStore>,
        shutdown: Shutdown,
        task: JoinHandle<Result<(), std::io::Error>>,
    ) -> Self {
        Self {
            local_addr,
            store,
            shutdown,
            task,
        }
    }

    /// Address the listener is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Close the store connection, then the listener.
    ///
    /// Both steps always run. The store error wins when both fail.
    pub async fn stop(self) -> Result<(), StopError> {
        let closed = self.store.close().await;
        if let Err(e) = &closed {
            tracing::error!(error = %e, "Failed to close article store");
        }

        tracing::info!(address = %self.local_addr, "Closing server");
        self.shutdown.trigger();
        let served = self.task.await;

        closed?;
        served??;
        Ok(())
    }
}
