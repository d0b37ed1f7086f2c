//! Start/stop ordering tests.

use std::sync::Arc;

use articles_api::lifecycle::StartError;
use articles_api::{start_with_store, MemoryStore};

mod common;

use common::{local_config, spawn_server, FailingStore};

#[tokio::test]
async fn test_stop_closes_store_and_listener() {
    let server = spawn_server(local_config()).await;
    let addr = server.handle.local_addr();

    let res = server.client.get(server.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    assert!(res.headers().contains_key("x-request-id"));

    server.handle.stop().await.unwrap();

    assert!(server.store.is_closed());
    assert!(tokio::net::TcpStream::connect(addr).await.is_err());
}

#[tokio::test]
async fn test_unreachable_store_prevents_listening() {
    let store = Arc::new(FailingStore::unreachable());

    let result = start_with_store(&local_config(), store.clone()).await;

    assert!(matches!(result, Err(StartError::Connect(_))));
    assert!(store.is_closed());
}

#[tokio::test]
async fn test_bind_failure_closes_store() {
    let occupied = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let mut config = local_config();
    config.server.port = occupied.local_addr().unwrap().port();
    let store = MemoryStore::new();

    let result = start_with_store(&config, Arc::new(store.clone())).await;

    assert!(matches!(result, Err(StartError::Bind { .. })));
    assert!(store.is_closed());
}

#[tokio::test]
async fn test_servers_run_side_by_side() {
    let a = spawn_server(local_config()).await;
    let b = spawn_server(local_config()).await;
    assert_ne!(a.handle.local_addr(), b.handle.local_addr());

    a.client
        .post(a.url("/posts"))
        .json(&serde_json::json!({"title": "T", "content": "C", "author": {"firstName": "Jane", "lastName": "Doe"}}))
        .send()
        .await
        .unwrap();

    assert_eq!(a.store.len(), 1);
    assert!(b.store.is_empty());

    a.handle.stop().await.unwrap();
    b.handle.stop().await.unwrap();
}
