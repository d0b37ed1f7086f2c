//! In-process article store.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use mongodb::bson::oid::ObjectId;

use crate::models::{Article, ArticleUpdate, NewArticle};
use crate::store::{parse_id, ArticleStore, StoreError, StoreResult};

/// A thread-safe store holding articles in memory.
///
/// Cloning shares the underlying map. `find_all` returns articles in id
/// order, which is creation order for ids minted by this process.
#[derive(Clone, Default)]
pub struct MemoryStore {
    articles: Arc<DashMap<ObjectId, Article>>,
    closed: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored articles.
    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn ensure_open(&self) -> StoreResult<()> {
        if self.is_closed() {
            return Err(StoreError::Closed);
        }
        Ok(())
    }
}

#[async_trait]
impl ArticleStore for MemoryStore {
    async fn find_all(&self) -> StoreResult<Vec<Article>> {
        self.ensure_open()?;
        let mut articles: Vec<Article> = self.articles.iter().map(|r| r.value().clone()).collect();
        articles.sort_by_key(|a| a.id);
        Ok(articles)
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Article>> {
        self.ensure_open()?;
        let id = parse_id(id)?;
        Ok(self.articles.get(&id).map(|r| r.value().clone()))
    }

    async fn create(&self, article: NewArticle) -> StoreResult<Article> {
        self.ensure_open()?;
        let article = Article::from_new(article)?;
        self.articles.insert(article.id, article.clone());
        tracing::debug!(id = %article.id, "Article stored in memory");
        Ok(article)
    }

    async fn find_by_id_and_update(
        &self,
        id: &str,
        update: ArticleUpdate,
    ) -> StoreResult<Option<Article>> {
        self.ensure_open()?;
        let id = parse_id(id)?;
        Ok(self.articles.get_mut(&id).map(|mut entry| {
            update.apply_to(entry.value_mut());
            entry.value().clone()
        }))
    }

    async fn find_by_id_and_remove(&self, id: &str) -> StoreResult<Option<Article>> {
        self.ensure_open()?;
        let id = parse_id(id)?;
        Ok(self.articles.remove(&id).map(|(_, article)| article))
    }

    async fn ping(&self) -> StoreResult<()> {
        self.ensure_open()
    }

    async fn close(&self) -> StoreResult<()> {
        self.closed.store(true, Ordering::Release);
        Ok(())
    }
}
