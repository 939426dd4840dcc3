use crate::models::{Article, ArticleField};
use async_trait::async_trait;
use regex::{Regex, RegexBuilder};
use service_core::error::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached; no operation was performed.
    #[error("store unreachable: {0}")]
    Connection(anyhow::Error),

    #[error("store operation failed: {0}")]
    Operation(anyhow::Error),
}

impl StoreError {
    /// Converts into an HTTP error whose public message is `message`.
    pub fn into_app_error(self, message: &'static str) -> AppError {
        match self {
            StoreError::Connection(err) => AppError::DatabaseUnavailable(err),
            StoreError::Operation(err) => AppError::DatabaseError(err.context(message)),
        }
    }
}

/// Persistence for articles. Each method is exactly one store call.
#[async_trait]
pub trait ArticleStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Article>, StoreError>;

    async fn find_by_codigo(&self, codigo: i64) -> Result<Option<Article>, StoreError>;

    /// Articles whose `field` contains `fragment`, ignoring case.
    async fn search(
        &self,
        field: ArticleField,
        fragment: &str,
    ) -> Result<Vec<Article>, StoreError>;

    async fn insert(&self, article: &Article) -> Result<(), StoreError>;

    /// Returns the number of articles matched by `codigo` (0 or 1).
    async fn update_precio(
        &self,
        codigo: i64,
        precio: &serde_json::Number,
    ) -> Result<u64, StoreError>;

    /// Returns the number of articles removed (0 or 1).
    async fn delete(&self, codigo: i64) -> Result<u64, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;

    /// Releases pooled resources. Failures are logged, never returned.
    async fn shutdown(&self);
}

/// Literal, unanchored, case-insensitive pattern for `fragment`.
pub fn substring_pattern(fragment: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(&regex::escape(fragment))
        .case_insensitive(true)
        .build()
}
