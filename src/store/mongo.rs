//! MongoDB-backed article store.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::options::{ClientOptions, ReturnDocument};
use mongodb::{Client, Collection};

use crate::config::DatabaseConfig;
use crate::models::{Article, ArticleUpdate, NewArticle};
use crate::store::{parse_id, ArticleStore, StoreResult};

/// Article store over a single MongoDB collection.
///
/// The driver pools connections internally; clones share the pool.
#[derive(Clone)]
pub struct MongoStore {
    client: Client,
    database: String,
    articles: Collection<Article>,
}

impl MongoStore {
    /// Build a client for `config.url`.
    ///
    /// The driver connects lazily, so a bad host only shows up on the first
    /// round-trip. Call [`ArticleStore::ping`] to find out early.
    pub async fn connect(config: &DatabaseConfig) -> StoreResult<Self> {
        let mut options = ClientOptions::parse(&config.url).await?;
        options.app_name = Some(env!("CARGO_PKG_NAME").to_string());
        options.server_selection_timeout =
            Some(Duration::from_secs(config.server_selection_timeout_secs));

        let client = Client::with_options(options)?;
        let articles = client
            .database(&config.name)
            .collection::<Article>(&config.collection);

        tracing::info!(
            database = %config.name,
            collection = %config.collection,
            "MongoDB client created"
        );

        Ok(Self {
            client,
            database: config.name.clone(),
            articles,
        })
    }
}

/// `$set` body for a partial update: only the supplied fields.
fn set_document(update: &ArticleUpdate) -> StoreResult<Document> {
    Ok(mongodb::bson::to_document(update)?)
}

#[async_trait]
impl ArticleStore for MongoStore {
    async fn find_all(&self) -> StoreResult<Vec<Article>> {
        let cursor = self.articles.find(doc! {}).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Article>> {
        let id = parse_id(id)?;
        Ok(self.articles.find_one(doc! { "_id": id }).await?)
    }

    async fn create(&self, article: NewArticle) -> StoreResult<Article> {
        let article = Article::from_new(article)?;
        self.articles.insert_one(&article).await?;
        Ok(article)
    }

    async fn find_by_id_and_update(
        &self,
        id: &str,
        update: ArticleUpdate,
    ) -> StoreResult<Option<Article>> {
        let oid = parse_id(id)?;
        // MongoDB rejects an empty `$set`.
        if update.is_empty() {
            return Ok(self.articles.find_one(doc! { "_id": oid }).await?);
        }

        let set = set_document(&update)?;
        Ok(self
            .articles
            .find_one_and_update(doc! { "_id": oid }, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await?)
    }

    async fn find_by_id_and_remove(&self, id: &str) -> StoreResult<Option<Article>> {
        let id = parse_id(id)?;
        Ok(self.articles.find_one_and_delete(doc! { "_id": id }).await?)
    }

    async fn ping(&self) -> StoreResult<()> {
        self.client
            .database(&self.database)
            .run_command(doc! { "ping": 1 })
            .await?;
        Ok(())
    }

    async fn close(&self) -> StoreResult<()> {
        self.client.clone().shutdown().await;
        tracing::info!("MongoDB client shut down");
        Ok(())
    }
}
