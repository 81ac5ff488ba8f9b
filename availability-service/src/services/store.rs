use crate::models::normalize_product_name;
use async_trait::async_trait;
use mongodb::{
    bson::{doc, Document},
    options::{ClientOptions, FindOneOptions},
    Client, Collection, Database,
};
use service_core::error::AppError;
use std::collections::HashSet;
use std::time::Duration;
use thiserror::Error;

/// Collection holding one document per manufacturable product, keyed by the
/// normalized product name in `_id`.
pub const PRODUCTS_COLLECTION: &str = "products";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("Lookup timed out after {0:?}")]
    Timeout(Duration),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Key-existence capability over the product catalogue.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Whether a product document with this exact key exists.
    async fn exists(&self, key: &str) -> Result<bool, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}

#[derive(Clone)]
pub struct MongoProductStore {
    db: Database,
    products: Collection<Document>,
}

impl MongoProductStore {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!(database = %database, "Connecting to MongoDB");
        let mut client_options = ClientOptions::parse(uri).await.map_err(|e| {
            tracing::error!("Failed to parse MongoDB connection string: {}", e);
            AppError::DatabaseError(e.into())
        })?;
        client_options.app_name = Some("availability-service".to_string());

        let client = Client::with_options(client_options).map_err(|e| {
            tracing::error!("Failed to create MongoDB client: {}", e);
            AppError::DatabaseError(e.into())
        })?;

        Ok(Self::new(client.database(database)))
    }

    pub fn new(db: Database) -> Self {
        let products = db.collection(PRODUCTS_COLLECTION);
        Self { db, products }
    }
}

#[async_trait]
impl ProductStore for MongoProductStore {
    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        let options = FindOneOptions::builder()
            .projection(doc! { "_id": 1 })
            .build();

        let found = self
            .products
            .find_one(doc! { "_id": key }, options)
            .await?;

        Ok(found.is_some())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.db.run_command(doc! { "ping": 1 }, None).await?;
        Ok(())
    }
}

/// Process-local catalogue used by the `memory` backend and in tests.
#[derive(Default)]
pub struct InMemoryProductStore {
    products: HashSet<String>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store holding the given products, normalized.
    pub fn with_products<I, S>(products: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let products = products
            .into_iter()
            .map(|name| normalize_product_name(name.as_ref()))
            .filter(|name| !name.is_empty())
            .collect();

        Self { products }
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.products.contains(key))
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
