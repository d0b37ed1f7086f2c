//! Shared utilities for integration testing.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use articles_api::config::AppConfig;
use articles_api::models::{Article, ArticleUpdate, NewArticle};
use articles_api::store::{ArticleStore, StoreError, StoreResult};
use articles_api::{start_with_store, MemoryStore, ServerHandle};
use async_trait::async_trait;

/// A running server on an OS-assigned port, backed by a memory store.
#[allow(dead_code)]
pub struct TestServer {
    pub handle: ServerHandle,
    pub store: MemoryStore,
    pub base_url: String,
    pub client: reqwest::Client,
}

#[allow(dead_code)]
impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Config listening on 127.0.0.1 with an ephemeral port.
#[allow(dead_code)]
pub fn local_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.server.host = "127.0.0.1".into();
    config.server.port = 0;
    config
}

/// Start a server over a fresh [`MemoryStore`].
#[allow(dead_code)]
pub async fn spawn_server(config: AppConfig) -> TestServer {
    let store = MemoryStore::new();
    let handle = start_with_store(&config, Arc::new(store.clone()))
        .await
        .expect("server should start");
    let base_url = format!("http://{}", handle.local_addr());

    let client = reqwest::Client::builder()
        .no_proxy()
        .build()
        .unwrap();

    TestServer {
        handle,
        store,
        base_url,
        client,
    }
}

/// A store whose every operation fails. Records whether it was closed.
#[allow(dead_code)]
#[derive(Default)]
pub struct FailingStore {
    pub ping_fails: bool,
    pub closed: AtomicBool,
}

#[allow(dead_code)]
impl FailingStore {
    pub fn unreachable() -> Self {
        Self {
            ping_fails: true,
            ..Default::default()
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

#[async_trait]
impl ArticleStore for FailingStore {
    async fn find_all(&self) -> StoreResult<Vec<Article>> {
        Err(StoreError::Closed)
    }

    async fn find_by_id(&self, _id: &str) -> StoreResult<Option<Article>> {
        Err(StoreError::Closed)
    }

    async fn create(&self, _article: NewArticle) -> StoreResult<Article> {
        Err(StoreError::Closed)
    }

    async fn find_by_id_and_update(
        &self,
        _id: &str,
        _update: ArticleUpdate,
    ) -> StoreResult<Option<Article>> {
        Err(StoreError::Closed)
    }

    async fn find_by_id_and_remove(&self, _id: &str) -> StoreResult<Option<Article>> {
        Err(StoreError::Closed)
    }

    async fn ping(&self) -> StoreResult<()> {
        if self.ping_fails {
            return Err(StoreError::Closed);
        }
        Ok(())
    }

    async fn close(&self) -> StoreResult<()> {
        self.closed.store(true, Ordering::Release);
        Ok(())
    }
}
