use crate::models::{article::CODIGO, article::PRECIO, Article, ArticleField};
use crate::services::store::{ArticleStore, StoreError};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{self, doc, Document},
    error::ErrorKind,
    options::{ClientOptions, FindOneOptions, FindOptions},
    Client as MongoClient, Collection,
};
use secrecy::{ExposeSecret, Secret};
use service_core::error::AppError;
use tokio::sync::OnceCell;

/// MongoDB-backed article store.
///
/// The client (and its connection pool) is created on first use and shared
/// by every request afterwards; `shutdown` drains it.
pub struct MongoArticleStore {
    options: ClientOptions,
    database: String,
    collection: String,
    client: OnceCell<MongoClient>,
}

impl MongoArticleStore {
    pub async fn new(
        uri: &Secret<String>,
        database: &str,
        collection: &str,
    ) -> Result<Self, AppError> {
        let mut options = ClientOptions::parse(uri.expose_secret())
            .await
            .map_err(|e| {
                tracing::error!("Failed to parse MongoDB connection string: {}", e);
                AppError::ConfigError(e.into())
            })?;
        options.app_name = Some("article-service".to_string());

        Ok(Self {
            options,
            database: database.to_string(),
            collection: collection.to_string(),
            client: OnceCell::new(),
        })
    }

    async fn client(&self) -> Result<&MongoClient, StoreError> {
        self.client
            .get_or_try_init(|| async {
                tracing::info!(database = %self.database, "Creating MongoDB client pool");
                MongoClient::with_options(self.options.clone()).map_err(|e| {
                    tracing::error!("Failed to create MongoDB client: {}", e);
                    StoreError::Connection(e.into())
                })
            })
            .await
    }

    async fn articles(&self) -> Result<Collection<Document>, StoreError> {
        Ok(self
            .client()
            .await?
            .database(&self.database)
            .collection(&self.collection))
    }

    async fn find_many(&self, filter: Document) -> Result<Vec<Article>, StoreError> {
        let options = FindOptions::builder().projection(doc! { "_id": 0 }).build();
        let cursor = self
            .articles()
            .await?
            .find(filter, options)
            .await
            .map_err(classify)?;
        let documents: Vec<Document> = cursor.try_collect().await.map_err(classify)?;
        Ok(documents.into_iter().map(Article::from).collect())
    }
}

fn classify(err: mongodb::error::Error) -> StoreError {
    let unreachable = matches!(
        err.kind.as_ref(),
        ErrorKind::ServerSelection { .. }
            | ErrorKind::Io(_)
            | ErrorKind::DnsResolve { .. }
            | ErrorKind::ConnectionPoolCleared { .. }
    );
    if unreachable {
        StoreError::Connection(err.into())
    } else {
        StoreError::Operation(err.into())
    }
}

#[async_trait]
impl ArticleStore for MongoArticleStore {
    async fn list(&self) -> Result<Vec<Article>, StoreError> {
        self.find_many(Document::new()).await
    }

    async fn find_by_codigo(&self, codigo: i64) -> Result<Option<Article>, StoreError> {
        let options = FindOneOptions::builder()
            .projection(doc! { "_id": 0 })
            .build();
        let document = self
            .articles()
            .await?
            .find_one(doc! { CODIGO: codigo }, options)
            .await
            .map_err(classify)?;
        Ok(document.map(Article::from))
    }

    async fn search(
        &self,
        field: ArticleField,
        fragment: &str,
    ) -> Result<Vec<Article>, StoreError> {
        let mut filter = Document::new();
        filter.insert(
            field.as_str(),
            doc! { "$regex": regex::escape(fragment), "$options": "i" },
        );
        self.find_many(filter).await
    }

    async fn insert(&self, article: &Article) -> Result<(), StoreError> {
        let document = article
            .to_document()
            .map_err(|e| StoreError::Operation(e.into()))?;
        self.articles()
            .await?
            .insert_one(document, None)
            .await
            .map_err(classify)?;
        Ok(())
    }

    async fn update_precio(
        &self,
        codigo: i64,
        precio: &serde_json::Number,
    ) -> Result<u64, StoreError> {
        let precio = bson::to_bson(precio).map_err(|e| StoreError::Operation(e.into()))?;
        let result = self
            .articles()
            .await?
            .update_one(
                doc! { CODIGO: codigo },
                doc! { "$set": { PRECIO: precio } },
                None,
            )
            .await
            .map_err(classify)?;
        Ok(result.matched_count)
    }

    async fn delete(&self, codigo: i64) -> Result<u64, StoreError> {
        let result = self
            .articles()
            .await?
            .delete_one(doc! { CODIGO: codigo }, None)
            .await
            .map_err(classify)?;
        Ok(result.deleted_count)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.client()
            .await?
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                classify(e)
            })?;
        Ok(())
    }

    async fn shutdown(&self) {
        if let Some(client) = self.client.get() {
            tracing::info!("Shutting down MongoDB client pool");
            client.clone().shutdown().await;
        }
    }
}
