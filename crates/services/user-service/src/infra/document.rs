//! Document store connection and initialization.

use mongodb::{bson::doc, error::Error as MongoError, Client, Collection};
use serde::{de::DeserializeOwned, Serialize};

use common::DocumentStoreConfig;

/// MongoDB client bound to the configured database and collection.
#[derive(Clone)]
pub struct DocumentDatabase {
    client: Client,
    database: String,
    collection: String,
}

impl DocumentDatabase {
    /// Connect and verify the server answers a ping.
    pub async fn connect(config: &DocumentStoreConfig) -> Result<Self, MongoError> {
        tracing::debug!("Connecting to document store at {}", config.url);
        let client = Client::with_uri_str(&config.url).await?;

        let db = Self {
            client,
            database: config.database.clone(),
            collection: config.collection.clone(),
        };
        db.ping().await?;
        tracing::info!(
            "Document store connected ({}.{})",
            db.database,
            db.collection
        );

        Ok(db)
    }

    /// Typed handle to the users collection.
    pub fn collection<T>(&self) -> Collection<T>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
    {
        self.client
            .database(&self.database)
            .collection::<T>(&self.collection)
    }

    /// Round-trip a ping command.
    pub async fn ping(&self) -> Result<(), MongoError> {
        self.client
            .database(&self.database)
            .run_command(doc! { "ping": 1 })
            .await?;
        Ok(())
    }

    /// Close the client and its connection pool.
    pub async fn close(self) {
        self.client.shutdown().await;
    }
}
