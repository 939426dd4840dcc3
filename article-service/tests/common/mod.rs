#![allow(dead_code)]

use article_service::config::{ArticleConfig, MongoConfig, StoreBackend};
use article_service::services::ArticleStore;
use article_service::startup::Application;
use reqwest::{Client, Response};
use secrecy::Secret;
use serde_json::Value;
use service_core::config::Config as CoreConfig;
use std::sync::Arc;

/// Port 1 on loopback refuses connections; server selection gives up fast.
pub const UNREACHABLE_MONGODB_URI: &str = "mongodb://127.0.0.1:1/?serverSelectionTimeoutMS=200";

fn test_mongodb_uri() -> String {
    std::env::var("TEST_MONGODB_URI").unwrap_or_else(|_| "mongodb://localhost:27017".to_string())
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub store: Arc<dyn ArticleStore>,
    pub backend: StoreBackend,
    pub mongodb_uri: String,
    pub db_name: String,
    pub client: Client,
}

impl TestApp {
    /// Spawns the service on a random port over the in-memory store.
    pub async fn spawn() -> Self {
        Self::spawn_with(StoreBackend::Memory, test_mongodb_uri()).await
    }

    /// Spawns the service against `TEST_MONGODB_URI` (default localhost).
    pub async fn spawn_mongo() -> Self {
        Self::spawn_with(StoreBackend::Mongodb, test_mongodb_uri()).await
    }

    /// Spawns the service over a MongoDB server that never answers.
    pub async fn spawn_unreachable_mongo() -> Self {
        Self::spawn_with(StoreBackend::Mongodb, UNREACHABLE_MONGODB_URI.to_string()).await
    }

    async fn spawn_with(store_backend: StoreBackend, mongodb_uri: String) -> Self {
        let db_name = format!("supermercado_test_{}", uuid::Uuid::new_v4().simple());

        let config = ArticleConfig {
            common: CoreConfig { port: 0 },
            mongodb: MongoConfig {
                uri: Secret::new(mongodb_uri.clone()),
                database: db_name.clone(),
                collection: "supermercado".to_string(),
            },
            store: store_backend,
        };

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let store = app.store();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to accept connections
        let client = Client::new();
        for _ in 0..50 {
            if client.get(format!("{}/", address)).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            store,
            backend: store_backend,
            mongodb_uri,
            db_name,
            client,
        }
    }

    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> Response {
        self.client
            .post(format!("{}{}", self.address, path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn patch_json(&self, path: &str, body: &Value) -> Response {
        self.client
            .patch(format!("{}{}", self.address, path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn delete(&self, path: &str) -> Response {
        self.client
            .delete(format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn put_json(&self, path: &str, body: &Value) -> Response {
        self.client
            .put(format!("{}{}", self.address, path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Drops the MongoDB test database (if any) and tears the store down.
    pub async fn cleanup(&self) {
        if self.backend == StoreBackend::Mongodb && self.mongodb_uri != UNREACHABLE_MONGODB_URI {
            if let Ok(client) = mongodb::Client::with_uri_str(&self.mongodb_uri).await {
                let _ = client.database(&self.db_name).drop(None).await;
            }
        }
        self.store.shutdown().await;
    }
}
