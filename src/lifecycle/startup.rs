//! Startup orchestration.
//!
//! # Responsibilities
//! - Connect to the article store and prove the connection with a ping
//! - Bind the listener and spawn the serve task
//! - Hand back a [`ServerHandle`] that owns both
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Store first, listener last (traffic only when the store answers)
//! - A failed ping or bind closes the store before returning

use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::AppConfig;
use crate::http::HttpServer;
use crate::lifecycle::shutdown::{ServerHandle, Shutdown};
use crate::store::{ArticleStore, MongoStore, StoreError};

/// Errors from [`start`] and [`start_with_store`].
#[derive(Debug, Error)]
pub enum StartError {
    #[error("failed to connect to article store: {0}")]
    Connect(#[source] StoreError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

/// Connect to MongoDB at `config.database.url`, then listen on `config.server`.
pub async fn start(config: &AppConfig) -> Result<ServerHandle, StartError> {
    let store = MongoStore::connect(&config.database)
        .await
        .map_err(StartError::Connect)?;
    start_with_store(config, Arc::new(store)).await
}

/// Same as [`start`], over an already constructed store.
pub async fn start_with_store(
    config: &AppConfig,
    store: Arc<dyn ArticleStore>,
) -> Result<ServerHandle, StartError> {
    if let Err(e) = store.ping().await {
        close_quietly(store.as_ref(), "ping failure").await;
        return Err(StartError::Connect(e));
    }
    tracing::info!("Article store reachable");

    let address = config.server.bind_address();
    let bound = match TcpListener::bind(&address).await {
        Ok(listener) => listener.local_addr().map(|addr| (listener, addr)),
        Err(e) => Err(e),
    };
    let (listener, local_addr) = match bound {
        Ok(bound) => bound,
        Err(source) => {
            close_quietly(store.as_ref(), "bind failure").await;
            return Err(StartError::Bind { address, source });
        }
    };

    let server = HttpServer::new(config, Arc::clone(&store));
    let shutdown = Shutdown::new();
    let task = tokio::spawn(server.run(listener, shutdown.subscribe()));

    tracing::info!(address = %local_addr, "Your app is listening");
    Ok(ServerHandle::new(local_addr, store, shutdown, task))
}

async fn close_quietly(store: &dyn ArticleStore, after: &'static str) {
    if let Err(e) = store.close().await {
        tracing::warn!(error = %e, after, "Failed to close article store");
    }
}
