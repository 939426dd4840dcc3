use crate::models::{Article, ArticleField};
use crate::services::store::{substring_pattern, ArticleStore, StoreError};
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Process-local store with the same matching rules as the MongoDB one.
#[derive(Default)]
pub struct InMemoryArticleStore {
    articles: RwLock<Vec<Article>>,
}

impl InMemoryArticleStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ArticleStore for InMemoryArticleStore {
    async fn list(&self) -> Result<Vec<Article>, StoreError> {
        Ok(self.articles.read().await.clone())
    }

    async fn find_by_codigo(&self, codigo: i64) -> Result<Option<Article>, StoreError> {
        let articles = self.articles.read().await;
        Ok(articles.iter().find(|a| a.has_codigo(codigo)).cloned())
    }

    async fn search(
        &self,
        field: ArticleField,
        fragment: &str,
    ) -> Result<Vec<Article>, StoreError> {
        let pattern = substring_pattern(fragment).map_err(|e| StoreError::Operation(e.into()))?;
        let articles = self.articles.read().await;
        Ok(articles
            .iter()
            .filter(|a| a.field_matches(field, &pattern))
            .cloned()
            .collect())
    }

    async fn insert(&self, article: &Article) -> Result<(), StoreError> {
        self.articles.write().await.push(article.clone());
        Ok(())
    }

    async fn update_precio(
        &self,
        codigo: i64,
        precio: &serde_json::Number,
    ) -> Result<u64, StoreError> {
        let mut articles = self.articles.write().await;
        match articles.iter_mut().find(|a| a.has_codigo(codigo)) {
            Some(article) => {
                article.set_precio(precio.clone());
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&self, codigo: i64) -> Result<u64, StoreError> {
        let mut articles = self.articles.write().await;
        match articles.iter().position(|a| a.has_codigo(codigo)) {
            Some(index) => {
                articles.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn shutdown(&self) {}
}
